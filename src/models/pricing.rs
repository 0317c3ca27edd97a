use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::num::NonZeroU64;
use std::path::Path;
use thiserror::Error;

use super::city::{City, Modality};

/// Basis points representing a multiplier of exactly 1.0.
pub const MULTIPLIER_SCALE: u64 = 10_000;

/// Problems found while building or loading a tariff.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TariffError {
    #[error("Tier thresholds must be strictly increasing: {next} follows {previous}")]
    UnorderedTiers { previous: u64, next: u64 },

    #[error("Tier threshold must be at least 1")]
    ZeroThreshold,
}

/// Staff roles hired for an exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Delegate,
    RoomChief,
    FingerprintTechnician,
    RoomCoordinator,
    CleaningStaff,
    SecurityStaff,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Delegate,
        Role::RoomChief,
        Role::FingerprintTechnician,
        Role::RoomCoordinator,
        Role::CleaningStaff,
        Role::SecurityStaff,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Delegate => "Site delegates",
            Role::RoomChief => "Room chiefs",
            Role::FingerprintTechnician => "Fingerprint technicians",
            Role::RoomCoordinator => "Room coordinators",
            Role::CleaningStaff => "Cleaning staff",
            Role::SecurityStaff => "Security staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Material bundles issued per room, fingerprint station or cleaning unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kit {
    Room,
    Fingerprint,
    Cleaning,
}

impl Kit {
    pub const ALL: [Kit; 3] = [Kit::Room, Kit::Fingerprint, Kit::Cleaning];

    pub fn label(&self) -> &'static str {
        match self {
            Kit::Room => "Room kits",
            Kit::Fingerprint => "Fingerprint kits",
            Kit::Cleaning => "Cleaning kits",
        }
    }
}

impl fmt::Display for Kit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit price per staff member, by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePrices {
    pub delegate: u64,
    pub room_chief: u64,
    pub fingerprint_technician: u64,
    pub room_coordinator: u64,
    pub cleaning_staff: u64,
    pub security_staff: u64,
}

impl RolePrices {
    pub fn get(&self, role: Role) -> u64 {
        match role {
            Role::Delegate => self.delegate,
            Role::RoomChief => self.room_chief,
            Role::FingerprintTechnician => self.fingerprint_technician,
            Role::RoomCoordinator => self.room_coordinator,
            Role::CleaningStaff => self.cleaning_staff,
            Role::SecurityStaff => self.security_staff,
        }
    }
}

impl Default for RolePrices {
    fn default() -> Self {
        Self {
            delegate: 300_000,
            room_chief: 200_000,
            fingerprint_technician: 214_298,
            room_coordinator: 250_000,
            cleaning_staff: 207_420,
            security_staff: 207_420,
        }
    }
}

/// Unit price per material kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitPrices {
    pub room: u64,
    pub fingerprint: u64,
    pub cleaning: u64,
}

impl KitPrices {
    pub fn get(&self, kit: Kit) -> u64 {
        match kit {
            Kit::Room => self.room,
            Kit::Fingerprint => self.fingerprint,
            Kit::Cleaning => self.cleaning,
        }
    }
}

impl Default for KitPrices {
    fn default() -> Self {
        Self {
            room: 18_183,
            fingerprint: 40_669,
            cleaning: 95_000,
        }
    }
}

/// One bounded step of a tier table: applies while `n <= up_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub up_to: u64,
    pub value: u64,
}

/// Serialized shape of a [`TierTable`], checked on conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTierTable {
    #[serde(default)]
    pub steps: Vec<Tier>,
    pub above: u64,
}

/// Step function over a quantity: ordered bounded tiers followed by an
/// open-ended value that applies above the last threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTierTable", into = "RawTierTable")]
pub struct TierTable {
    steps: Vec<Tier>,
    above: u64,
}

impl TierTable {
    pub fn new(steps: Vec<Tier>, above: u64) -> Result<Self, TariffError> {
        if steps.first().is_some_and(|tier| tier.up_to == 0) {
            return Err(TariffError::ZeroThreshold);
        }
        for pair in steps.windows(2) {
            if pair[1].up_to <= pair[0].up_to {
                return Err(TariffError::UnorderedTiers {
                    previous: pair[0].up_to,
                    next: pair[1].up_to,
                });
            }
        }
        Ok(Self { steps, above })
    }

    /// Value of the first tier whose threshold is not below `quantity`.
    pub fn lookup(&self, quantity: u64) -> u64 {
        self.steps
            .iter()
            .find(|tier| quantity <= tier.up_to)
            .map_or(self.above, |tier| tier.value)
    }

    pub fn steps(&self) -> &[Tier] {
        &self.steps
    }

    pub fn above(&self) -> u64 {
        self.above
    }
}

impl TryFrom<RawTierTable> for TierTable {
    type Error = TariffError;

    fn try_from(raw: RawTierTable) -> Result<Self, Self::Error> {
        TierTable::new(raw.steps, raw.above)
    }
}

impl From<TierTable> for RawTierTable {
    fn from(table: TierTable) -> Self {
        RawTierTable {
            steps: table.steps,
            above: table.above,
        }
    }
}

/// Per-site transport cost, scaled by a city multiplier in basis points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRates {
    pub base_per_site: u64,
    /// Applies to any city missing from `city_multipliers_bps`.
    pub default_multiplier_bps: u64,
    #[serde(default)]
    pub city_multipliers_bps: BTreeMap<City, u64>,
}

impl TransportRates {
    pub fn multiplier_bps(&self, city: City) -> u64 {
        self.city_multipliers_bps
            .get(&city)
            .copied()
            .unwrap_or(self.default_multiplier_bps)
    }

    /// `base * sites * multiplier`, rounded half-up to a whole unit.
    /// Returns `None` on overflow.
    pub fn cost(&self, site_count: u64, city: City) -> Option<u64> {
        let scaled = u128::from(self.base_per_site)
            .checked_mul(u128::from(site_count))?
            .checked_mul(u128::from(self.multiplier_bps(city)))?;
        let scale = u128::from(MULTIPLIER_SCALE);
        u64::try_from(scaled.checked_add(scale / 2)? / scale).ok()
    }
}

impl Default for TransportRates {
    fn default() -> Self {
        Self {
            base_per_site: 50_000,
            default_multiplier_bps: 18_000,
            city_multipliers_bps: BTreeMap::from([(City::CAPITAL, MULTIPLIER_SCALE)]),
        }
    }
}

/// Every unit price the estimator needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTable {
    pub roles: RolePrices,
    pub kits: KitPrices,
    /// Printing price per applicant, keyed by total applicant count.
    pub printing: TierTable,
    pub transport: TransportRates,
}

impl PricingTable {
    pub fn printing_unit_price(&self, applicant_count: u64) -> u64 {
        self.printing.lookup(applicant_count)
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        let printing = TierTable {
            steps: vec![
                Tier { up_to: 1_000, value: 5_705 },
                Tier { up_to: 1_500, value: 4_909 },
            ],
            above: 4_500,
        };

        Self {
            roles: RolePrices::default(),
            kits: KitPrices::default(),
            printing,
            transport: TransportRates::default(),
        }
    }
}

const APPLICANTS_PER_SITE: NonZeroU64 = NonZeroU64::new(500).unwrap();
const APPLICANTS_PER_ROOM: NonZeroU64 = NonZeroU64::new(25).unwrap();
const ROOMS_PER_FINGERPRINT_TECHNICIAN: NonZeroU64 = NonZeroU64::new(4).unwrap();
const ROOMS_PER_ROOM_COORDINATOR: NonZeroU64 = NonZeroU64::new(6).unwrap();
const ROOMS_PER_CLEANING_STAFF: NonZeroU64 = NonZeroU64::new(6).unwrap();

/// Capacity ratios that turn an applicant count into sites, rooms and staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingPolicy {
    pub applicants_per_site: NonZeroU64,
    pub applicants_per_room: NonZeroU64,
    pub rooms_per_fingerprint_technician: NonZeroU64,
    pub rooms_per_room_coordinator: NonZeroU64,
    pub rooms_per_cleaning_staff: NonZeroU64,
    pub security_staff_per_site: u64,
    pub room_chiefs_per_room_written: u64,
    pub room_chiefs_per_room_virtual: u64,
}

impl StaffingPolicy {
    pub fn room_chiefs_per_room(&self, modality: Modality) -> u64 {
        match modality {
            Modality::Written => self.room_chiefs_per_room_written,
            Modality::Virtual => self.room_chiefs_per_room_virtual,
        }
    }
}

impl Default for StaffingPolicy {
    fn default() -> Self {
        Self {
            applicants_per_site: APPLICANTS_PER_SITE,
            applicants_per_room: APPLICANTS_PER_ROOM,
            rooms_per_fingerprint_technician: ROOMS_PER_FINGERPRINT_TECHNICIAN,
            rooms_per_room_coordinator: ROOMS_PER_ROOM_COORDINATOR,
            rooms_per_cleaning_staff: ROOMS_PER_CLEANING_STAFF,
            security_staff_per_site: 2,
            room_chiefs_per_room_written: 1,
            room_chiefs_per_room_virtual: 2,
        }
    }
}

/// Pricing plus staffing policy: everything that can be swapped without
/// touching the derivation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    pub pricing: PricingTable,
    pub staffing: StaffingPolicy,
}

impl Tariff {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tariff file: {}", path.display()))?;

        let tariff: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse tariff file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded tariff");
        Ok(tariff)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize tariff")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write tariff file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printing_tiers_at_thresholds() {
        let pricing = PricingTable::default();

        assert_eq!(pricing.printing_unit_price(1), 5_705);
        assert_eq!(pricing.printing_unit_price(1_000), 5_705);
        assert_eq!(pricing.printing_unit_price(1_001), 4_909);
        assert_eq!(pricing.printing_unit_price(1_500), 4_909);
        assert_eq!(pricing.printing_unit_price(1_501), 4_500);
        assert_eq!(pricing.printing_unit_price(1_000_000), 4_500);
    }

    #[test]
    fn test_tier_table_rejects_unordered_thresholds() {
        let err = TierTable::new(
            vec![Tier { up_to: 1_500, value: 2 }, Tier { up_to: 1_000, value: 1 }],
            0,
        )
        .unwrap_err();
        assert_eq!(err, TariffError::UnorderedTiers { previous: 1_500, next: 1_000 });

        let duplicate = TierTable::new(
            vec![Tier { up_to: 10, value: 2 }, Tier { up_to: 10, value: 1 }],
            0,
        );
        assert!(duplicate.is_err());

        assert_eq!(
            TierTable::new(vec![Tier { up_to: 0, value: 1 }], 0).unwrap_err(),
            TariffError::ZeroThreshold
        );
    }

    #[test]
    fn test_tier_table_without_steps_is_flat() {
        let flat = TierTable::new(Vec::new(), 42).unwrap();
        assert_eq!(flat.lookup(1), 42);
        assert_eq!(flat.lookup(u64::MAX), 42);
    }

    #[test]
    fn test_transport_multiplier_by_city() {
        let transport = TransportRates::default();

        assert_eq!(transport.cost(1, City::Bogota), Some(50_000));
        assert_eq!(transport.cost(3, City::Medellin), Some(270_000));
        assert_eq!(transport.cost(0, City::Cali), Some(0));
    }

    #[test]
    fn test_city_multiplier_table_overrides_default() {
        let mut transport = TransportRates::default();
        transport.city_multipliers_bps.insert(City::Quibdo, 25_000);

        assert_eq!(transport.multiplier_bps(City::Bogota), 10_000);
        assert_eq!(transport.multiplier_bps(City::Quibdo), 25_000);
        assert_eq!(transport.multiplier_bps(City::Cali), 18_000);
        assert_eq!(transport.cost(2, City::Quibdo), Some(250_000));
    }

    #[test]
    fn test_city_multipliers_survive_toml() {
        let mut tariff = Tariff::default();
        tariff
            .pricing
            .transport
            .city_multipliers_bps
            .insert(City::SanAndres, 22_500);

        let parsed: Tariff = toml::from_str(&toml::to_string_pretty(&tariff).unwrap()).unwrap();
        assert_eq!(parsed.pricing.transport.multiplier_bps(City::SanAndres), 22_500);
        assert_eq!(parsed.pricing.transport.multiplier_bps(City::Bogota), 10_000);
    }

    #[test]
    fn test_transport_rounds_half_up() {
        let transport = TransportRates {
            base_per_site: 1,
            default_multiplier_bps: 14_999,
            city_multipliers_bps: BTreeMap::from([(City::Bogota, 15_000)]),
        };

        assert_eq!(transport.cost(1, City::Bogota), Some(2));
        assert_eq!(transport.cost(1, City::Cali), Some(1));
    }

    #[test]
    fn test_price_lookup_by_role_and_kit() {
        let pricing = PricingTable::default();

        assert_eq!(pricing.roles.get(Role::Delegate), 300_000);
        assert_eq!(pricing.roles.get(Role::FingerprintTechnician), 214_298);
        assert_eq!(pricing.roles.get(Role::SecurityStaff), 207_420);
        assert_eq!(pricing.kits.get(Kit::Cleaning), 95_000);
    }

    #[test]
    fn test_tariff_toml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs").join("default.toml");

        let mut tariff = Tariff::default();
        tariff.pricing.kits.room = 20_000;
        tariff.save(&path).unwrap();

        let loaded = Tariff::load(&path).unwrap();
        assert_eq!(loaded, tariff);
    }

    #[test]
    fn test_tariff_with_zero_divisor_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");

        let contents = toml::to_string_pretty(&Tariff::default())
            .unwrap()
            .replace("applicants_per_room = 25", "applicants_per_room = 0");
        fs::write(&path, contents).unwrap();

        assert!(Tariff::load(&path).is_err());
    }

    #[test]
    fn test_tariff_with_unordered_tiers_is_rejected() {
        let contents = r#"
            [pricing.roles]
            delegate = 1
            room_chief = 1
            fingerprint_technician = 1
            room_coordinator = 1
            cleaning_staff = 1
            security_staff = 1

            [pricing.kits]
            room = 1
            fingerprint = 1
            cleaning = 1

            [pricing.printing]
            above = 1
            steps = [{ up_to = 100, value = 3 }, { up_to = 50, value = 2 }]

            [pricing.transport]
            base_per_site = 1
            default_multiplier_bps = 10000

            [staffing]
            applicants_per_site = 500
            applicants_per_room = 25
            rooms_per_fingerprint_technician = 4
            rooms_per_room_coordinator = 6
            rooms_per_cleaning_staff = 6
            security_staff_per_site = 2
            room_chiefs_per_room_written = 1
            room_chiefs_per_room_virtual = 2
        "#;

        let result: Result<Tariff, _> = toml::from_str(contents);
        assert!(result.is_err());
    }
}
