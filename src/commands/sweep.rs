// Sweep and compare command handlers
use anyhow::Result;

use super::OutputOptions;
use crate::analysis::{Estimator, SweepRange, compare_cities, cost_curve};
use crate::config::settings::GeneralConfig;
use crate::models::{City, Modality};
use crate::output::{CityComparison, CostCurve};

#[allow(clippy::too_many_arguments)]
pub fn handle_sweep_command(
    from: u64,
    to: u64,
    step: u64,
    city: Option<String>,
    modality: Option<String>,
    defaults: &GeneralConfig,
    estimator: &Estimator,
    output: &OutputOptions,
) -> Result<()> {
    let range = SweepRange::new(from, to, step)?;
    let city = match city {
        Some(name) => name.parse::<City>()?,
        None => defaults.default_city,
    };
    let modality = match modality {
        Some(name) => name.parse::<Modality>()?,
        None => defaults.default_modality,
    };

    tracing::debug!(from, to, step, %city, %modality, "sweeping applicant counts");
    let curve = CostCurve(cost_curve(estimator, range, city, modality)?);

    if !output.json {
        println!("Cost curve for {} ({})", city, modality);
    }
    println!("{}", output.render(&curve)?);
    Ok(())
}

pub fn handle_compare_command(
    applicants: i64,
    modality: Option<String>,
    defaults: &GeneralConfig,
    estimator: &Estimator,
    output: &OutputOptions,
) -> Result<()> {
    let modality = match modality {
        Some(name) => name.parse::<Modality>()?,
        None => defaults.default_modality,
    };

    let comparison = CityComparison(compare_cities(estimator, applicants, modality)?);

    if !output.json {
        println!("{} applicants, {} exam, by city", applicants, modality);
    }
    println!("{}", output.render(&comparison)?);
    Ok(())
}
