use serde::{Deserialize, Serialize};
use std::fmt;

use super::estimator::{EstimationRequest, EstimationResult, Estimator};
use crate::models::{EstimateError, Kit, Role};

/// The four cost categories that make up a quote's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Printing,
    Personnel,
    Materials,
    Transport,
}

impl CostCategory {
    pub const ALL: [CostCategory; 4] = [
        CostCategory::Printing,
        CostCategory::Personnel,
        CostCategory::Materials,
        CostCategory::Transport,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CostCategory::Printing => "Printing",
            CostCategory::Personnel => "Personnel",
            CostCategory::Materials => "Materials (kits)",
            CostCategory::Transport => "Transport",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Headline numbers shown above the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub total_cost: u64,
    pub cost_per_applicant: f64,
    pub site_count: u64,
    pub total_staff: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostShare {
    pub category: CostCategory,
    pub amount: u64,
    /// Percentage of the total, 0.0 when the total is zero.
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLine {
    pub resource: String,
    pub quantity: u64,
}

/// An estimate together with everything derived from it for display and
/// export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub request: EstimationRequest,
    pub result: EstimationResult,
    pub summary: QuoteSummary,
    pub breakdown: Vec<CostShare>,
    pub resources: Vec<ResourceLine>,
}

impl Quote {
    pub fn build(estimator: &Estimator, request: EstimationRequest) -> Result<Self, EstimateError> {
        let result = estimator.estimate(&request)?;
        Ok(Self::from_result(request, result))
    }

    pub fn from_result(request: EstimationRequest, result: EstimationResult) -> Self {
        let summary = summarize(&request, &result);
        let breakdown = cost_breakdown(&result);
        let resources = resource_detail(&result);

        Self {
            request,
            result,
            summary,
            breakdown,
            resources,
        }
    }
}

pub fn summarize(request: &EstimationRequest, result: &EstimationResult) -> QuoteSummary {
    let total_cost = result.financial.total;
    let cost_per_applicant = if request.applicant_count > 0 {
        total_cost as f64 / request.applicant_count as f64
    } else {
        0.0
    };

    QuoteSummary {
        total_cost,
        cost_per_applicant,
        site_count: result.logistics.site_count,
        total_staff: result.logistics.total_staff,
    }
}

pub fn category_amount(result: &EstimationResult, category: CostCategory) -> u64 {
    let financial = &result.financial;
    match category {
        CostCategory::Printing => financial.printing,
        CostCategory::Personnel => financial.personnel,
        CostCategory::Materials => financial.materials,
        CostCategory::Transport => financial.transport,
    }
}

pub fn cost_breakdown(result: &EstimationResult) -> Vec<CostShare> {
    let total = result.financial.total;
    CostCategory::ALL
        .into_iter()
        .map(|category| {
            let amount = category_amount(result, category);
            let share_pct = if total == 0 {
                0.0
            } else {
                amount as f64 / total as f64 * 100.0
            };
            CostShare {
                category,
                amount,
                share_pct,
            }
        })
        .collect()
}

/// Rooms, every staff role and every kit type, in a fixed order.
pub fn resource_detail(result: &EstimationResult) -> Vec<ResourceLine> {
    let logistics = &result.logistics;

    let mut lines = vec![
        ResourceLine {
            resource: "Sites".to_string(),
            quantity: logistics.site_count,
        },
        ResourceLine {
            resource: "Rooms".to_string(),
            quantity: logistics.room_count,
        },
    ];
    lines.extend(Role::ALL.into_iter().map(|role| ResourceLine {
        resource: role.label().to_string(),
        quantity: logistics.role_count(role),
    }));
    lines.extend(Kit::ALL.into_iter().map(|kit| ResourceLine {
        resource: kit.label().to_string(),
        quantity: logistics.kit_count(kit),
    }));
    lines.push(ResourceLine {
        resource: "Total staff".to_string(),
        quantity: logistics.total_staff,
    });

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, Modality};

    fn reference_quote() -> Quote {
        let request = EstimationRequest::new(500, City::Bogota, Modality::Written);
        Quote::build(&Estimator::new(), request).unwrap()
    }

    #[test]
    fn test_summary_headline_numbers() {
        let quote = reference_quote();

        assert_eq!(quote.summary.total_cost, 11_465_515);
        assert!((quote.summary.cost_per_applicant - 22_931.03).abs() < 0.001);
        assert_eq!(quote.summary.site_count, 1);
        assert_eq!(quote.summary.total_staff, 36);
    }

    #[test]
    fn test_breakdown_amounts_add_up_to_total() {
        let quote = reference_quote();

        let sum: u64 = quote.breakdown.iter().map(|share| share.amount).sum();
        assert_eq!(sum, quote.result.financial.total);

        let pct: f64 = quote.breakdown.iter().map(|share| share.share_pct).sum();
        assert!((pct - 100.0).abs() < 1e-9, "shares sum to {}", pct);

        assert_eq!(quote.breakdown[0].category, CostCategory::Printing);
        assert_eq!(quote.breakdown[0].amount, 2_852_500);
    }

    #[test]
    fn test_resource_detail_lists_every_role_and_kit() {
        let quote = reference_quote();

        assert_eq!(quote.resources.len(), 2 + Role::ALL.len() + Kit::ALL.len() + 1);

        let find = |name: &str| {
            quote
                .resources
                .iter()
                .find(|line| line.resource == name)
                .map(|line| line.quantity)
        };
        assert_eq!(find("Rooms"), Some(20));
        assert_eq!(find("Fingerprint technicians"), Some(5));
        assert_eq!(find("Cleaning kits"), Some(4));
        assert_eq!(find("Security staff"), Some(2));
        assert_eq!(find("Total staff"), Some(36));
    }

    #[test]
    fn test_invalid_request_builds_no_quote() {
        let request = EstimationRequest::new(0, City::Cali, Modality::Virtual);
        assert!(Quote::build(&Estimator::new(), request).is_err());
    }
}
