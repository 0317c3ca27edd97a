// Analysis module
pub mod estimator;
pub mod quote;
pub mod sweep;

pub use estimator::{
    EstimationRequest, EstimationResult, Estimator, Financial, Logistics, derive_logistics,
    estimate, price,
};
pub use quote::{CostCategory, CostShare, Quote, QuoteSummary, ResourceLine};
pub use sweep::{CityQuote, CurvePoint, SweepRange, compare_cities, cost_curve};
