// excost library crate
// Exposes modules for integration testing

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod output;

pub use analysis::{EstimationRequest, EstimationResult, Estimator, estimate};
pub use models::{City, EstimateError, Modality, PricingTable, StaffingPolicy, Tariff};
