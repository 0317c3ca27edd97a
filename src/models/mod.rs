// Models module
pub mod city;
pub mod error;
pub mod pricing;

pub use city::{City, Modality};
pub use error::EstimateError;
pub use pricing::{
    Kit, KitPrices, PricingTable, Role, RolePrices, StaffingPolicy, Tariff, TariffError, Tier,
    TierTable, TransportRates,
};
