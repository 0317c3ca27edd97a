use serde::{Deserialize, Serialize};

use super::estimator::{EstimationRequest, Estimator};
use crate::models::{City, EstimateError, Modality};

/// Largest number of samples a single sweep may produce.
pub const MAX_SWEEP_POINTS: u64 = 10_000;

/// Inclusive range of applicant counts, visited every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepRange {
    pub from: u64,
    pub to: u64,
    pub step: u64,
}

impl SweepRange {
    pub fn new(from: u64, to: u64, step: u64) -> Result<Self, EstimateError> {
        if from == 0 {
            return Err(EstimateError::invalid("sweep must start at 1 applicant or more"));
        }
        if step == 0 {
            return Err(EstimateError::invalid("sweep step must be positive"));
        }
        if from > to {
            return Err(EstimateError::invalid(format!(
                "sweep start {} is greater than end {}",
                from, to
            )));
        }
        let point_count = (to - from) / step + 1;
        if point_count > MAX_SWEEP_POINTS {
            return Err(EstimateError::invalid(format!(
                "sweep would produce {} points; the limit is {}",
                point_count, MAX_SWEEP_POINTS
            )));
        }
        Ok(Self { from, to, step })
    }

    pub fn points(&self) -> impl Iterator<Item = u64> {
        let step = usize::try_from(self.step).unwrap_or(usize::MAX);
        (self.from..=self.to).step_by(step)
    }
}

/// One sample of the cost curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub applicant_count: u64,
    pub total_cost: u64,
    pub cost_per_applicant: f64,
    pub site_count: u64,
    pub printing_unit_price: u64,
}

/// Total cost as a function of applicant count for one city and modality.
/// Jumps appear where a new site opens or the printing tier changes.
pub fn cost_curve(
    estimator: &Estimator,
    range: SweepRange,
    city: City,
    modality: Modality,
) -> Result<Vec<CurvePoint>, EstimateError> {
    range
        .points()
        .map(|applicant_count| {
            let count = i64::try_from(applicant_count)
                .map_err(|_| EstimateError::invalid("applicant_count is too large to price"))?;
            let result = estimator.estimate(&EstimationRequest::new(count, city, modality))?;
            Ok(CurvePoint {
                applicant_count,
                total_cost: result.financial.total,
                cost_per_applicant: result.financial.total as f64 / applicant_count as f64,
                site_count: result.logistics.site_count,
                printing_unit_price: result.financial.printing_unit_price,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityQuote {
    pub city: City,
    pub total_cost: u64,
    pub transport_cost: u64,
    pub cost_per_applicant: f64,
}

/// The same exam priced in every supported city.
pub fn compare_cities(
    estimator: &Estimator,
    applicant_count: i64,
    modality: Modality,
) -> Result<Vec<CityQuote>, EstimateError> {
    City::ALL
        .into_iter()
        .map(|city| {
            let request = EstimationRequest::new(applicant_count, city, modality);
            let result = estimator.estimate(&request)?;
            Ok(CityQuote {
                city,
                total_cost: result.financial.total,
                transport_cost: result.financial.transport,
                cost_per_applicant: result.financial.total as f64 / applicant_count as f64,
            })
        })
        .collect()
}
