use serde::{Deserialize, Serialize};

use crate::models::{City, EstimateError, Kit, Modality, PricingTable, Role, StaffingPolicy, Tariff};

/// Inputs for one quote. `applicant_count` is signed so that a zero or
/// negative count coming from JSON reaches validation instead of failing
/// to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationRequest {
    pub applicant_count: i64,
    pub city: City,
    pub modality: Modality,
}

impl EstimationRequest {
    pub fn new(applicant_count: i64, city: City, modality: Modality) -> Self {
        Self {
            applicant_count,
            city,
            modality,
        }
    }

    /// The applicant count as an unsigned quantity, rejecting `n <= 0`.
    pub fn validated_count(&self) -> Result<u64, EstimateError> {
        u64::try_from(self.applicant_count)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                EstimateError::invalid(format!(
                    "applicant_count must be a positive integer, got {}",
                    self.applicant_count
                ))
            })
    }
}

/// Physical resources needed to run the exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logistics {
    pub site_count: u64,
    pub room_count: u64,
    pub total_staff: u64,
    pub delegate_count: u64,
    pub room_chief_count: u64,
    pub fingerprint_tech_count: u64,
    pub room_coordinator_count: u64,
    pub cleaning_staff_count: u64,
    pub security_count: u64,
    pub room_kits: u64,
    pub fingerprint_kits: u64,
    pub cleaning_kits: u64,
}

impl Logistics {
    pub fn role_count(&self, role: Role) -> u64 {
        match role {
            Role::Delegate => self.delegate_count,
            Role::RoomChief => self.room_chief_count,
            Role::FingerprintTechnician => self.fingerprint_tech_count,
            Role::RoomCoordinator => self.room_coordinator_count,
            Role::CleaningStaff => self.cleaning_staff_count,
            Role::SecurityStaff => self.security_count,
        }
    }

    pub fn kit_count(&self, kit: Kit) -> u64 {
        match kit {
            Kit::Room => self.room_kits,
            Kit::Fingerprint => self.fingerprint_kits,
            Kit::Cleaning => self.cleaning_kits,
        }
    }
}

/// Itemized costs, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Financial {
    pub printing_unit_price: u64,
    pub printing: u64,
    pub personnel: u64,
    pub materials: u64,
    pub transport: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub logistics: Logistics,
    pub financial: Financial,
}

/// Derives staffing, materials and costs from a tariff.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    tariff: Tariff,
}

impl Estimator {
    /// Estimator using the built-in tariff.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tariff(tariff: Tariff) -> Self {
        Self { tariff }
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn estimate(&self, request: &EstimationRequest) -> Result<EstimationResult, EstimateError> {
        let applicant_count = request.validated_count()?;

        let logistics = derive_logistics(applicant_count, request.modality, &self.tariff.staffing)?;
        let financial = price(applicant_count, request.city, &logistics, &self.tariff.pricing)?;

        tracing::debug!(
            applicants = applicant_count,
            city = %request.city,
            modality = %request.modality,
            sites = logistics.site_count,
            staff = logistics.total_staff,
            total = financial.total,
            "estimated exam cost"
        );

        Ok(EstimationResult {
            logistics,
            financial,
        })
    }
}

/// Estimate with the built-in tariff.
pub fn estimate(
    applicant_count: i64,
    city: City,
    modality: Modality,
) -> Result<EstimationResult, EstimateError> {
    Estimator::new().estimate(&EstimationRequest::new(applicant_count, city, modality))
}

/// Apply the staffing rules in order: sites and rooms first, then roles
/// derived from them, then one kit per room, technician and cleaner.
pub fn derive_logistics(
    applicant_count: u64,
    modality: Modality,
    policy: &StaffingPolicy,
) -> Result<Logistics, EstimateError> {
    let site_count = applicant_count.div_ceil(policy.applicants_per_site.get());
    let room_count = applicant_count.div_ceil(policy.applicants_per_room.get());

    let delegate_count = site_count;
    let room_chief_count = checked_mul(room_count, policy.room_chiefs_per_room(modality))?;
    let fingerprint_tech_count = room_count.div_ceil(policy.rooms_per_fingerprint_technician.get());
    let room_coordinator_count = room_count.div_ceil(policy.rooms_per_room_coordinator.get());
    let cleaning_staff_count = room_count.div_ceil(policy.rooms_per_cleaning_staff.get());
    let security_count = checked_mul(site_count, policy.security_staff_per_site)?;

    let total_staff = checked_sum([
        delegate_count,
        room_chief_count,
        fingerprint_tech_count,
        room_coordinator_count,
        cleaning_staff_count,
        security_count,
    ])?;

    Ok(Logistics {
        site_count,
        room_count,
        total_staff,
        delegate_count,
        room_chief_count,
        fingerprint_tech_count,
        room_coordinator_count,
        cleaning_staff_count,
        security_count,
        room_kits: room_count,
        fingerprint_kits: fingerprint_tech_count,
        cleaning_kits: cleaning_staff_count,
    })
}

/// Price derived quantities. All amounts are exact integers, so `total` is
/// precisely the sum of the four categories.
pub fn price(
    applicant_count: u64,
    city: City,
    logistics: &Logistics,
    pricing: &PricingTable,
) -> Result<Financial, EstimateError> {
    let printing_unit_price = pricing.printing_unit_price(applicant_count);
    let printing = checked_mul(applicant_count, printing_unit_price)?;

    let personnel = Role::ALL.into_iter().try_fold(0u64, |acc, role| {
        let line = checked_mul(logistics.role_count(role), pricing.roles.get(role))?;
        checked_sum([acc, line])
    })?;

    let materials = Kit::ALL.into_iter().try_fold(0u64, |acc, kit| {
        let line = checked_mul(logistics.kit_count(kit), pricing.kits.get(kit))?;
        checked_sum([acc, line])
    })?;

    let transport = pricing
        .transport
        .cost(logistics.site_count, city)
        .ok_or_else(too_large)?;

    let total = checked_sum([printing, personnel, materials, transport])?;

    Ok(Financial {
        printing_unit_price,
        printing,
        personnel,
        materials,
        transport,
        total,
    })
}

fn too_large() -> EstimateError {
    EstimateError::invalid("applicant_count is too large to price")
}

fn checked_mul(count: u64, unit: u64) -> Result<u64, EstimateError> {
    count.checked_mul(unit).ok_or_else(too_large)
}

fn checked_sum<const N: usize>(values: [u64; N]) -> Result<u64, EstimateError> {
    values
        .into_iter()
        .try_fold(0u64, |acc, value| acc.checked_add(value))
        .ok_or_else(too_large)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario_500_bogota_written() {
        let result = estimate(500, City::Bogota, Modality::Written).unwrap();
        let log = &result.logistics;

        assert_eq!(log.site_count, 1);
        assert_eq!(log.room_count, 20);
        assert_eq!(log.delegate_count, 1);
        assert_eq!(log.room_chief_count, 20);
        assert_eq!(log.fingerprint_tech_count, 5);
        assert_eq!(log.room_coordinator_count, 4);
        assert_eq!(log.cleaning_staff_count, 4);
        assert_eq!(log.security_count, 2);
        assert_eq!(log.total_staff, 36);

        let fin = &result.financial;
        assert_eq!(fin.printing_unit_price, 5_705);
        assert_eq!(fin.printing, 2_852_500);
        assert_eq!(fin.personnel, 7_616_010);
        assert_eq!(fin.materials, 947_005);
        assert_eq!(fin.transport, 50_000);
        assert_eq!(fin.total, 11_465_515);
    }

    #[test]
    fn test_room_chiefs_double_for_virtual() {
        let virtual_exam = estimate(100, City::Bogota, Modality::Virtual).unwrap();
        let written_exam = estimate(100, City::Bogota, Modality::Written).unwrap();

        assert_eq!(virtual_exam.logistics.room_chief_count, 8);
        assert_eq!(written_exam.logistics.room_chief_count, 4);
        assert_eq!(
            virtual_exam.logistics.total_staff - written_exam.logistics.total_staff,
            4
        );
    }

    #[test]
    fn test_site_count_boundary() {
        let at_capacity = estimate(500, City::Cali, Modality::Written).unwrap();
        let one_more = estimate(501, City::Cali, Modality::Written).unwrap();

        assert_eq!(at_capacity.logistics.site_count, 1);
        assert_eq!(one_more.logistics.site_count, 2);
    }

    #[test]
    fn test_printing_price_boundaries() {
        let unit = |n| {
            estimate(n, City::Bogota, Modality::Written)
                .unwrap()
                .financial
                .printing_unit_price
        };

        assert_eq!(unit(1_000), 5_705);
        assert_eq!(unit(1_001), 4_909);
        assert_eq!(unit(1_500), 4_909);
        assert_eq!(unit(1_501), 4_500);
    }

    #[test]
    fn test_regional_city_scenario() {
        let result = estimate(1_001, City::Medellin, Modality::Virtual).unwrap();
        let log = &result.logistics;

        assert_eq!(log.site_count, 3);
        assert_eq!(log.room_count, 41);
        assert_eq!(log.room_chief_count, 82);
        assert_eq!(log.fingerprint_tech_count, 11);
        assert_eq!(log.room_coordinator_count, 7);
        assert_eq!(log.cleaning_staff_count, 7);
        assert_eq!(log.security_count, 6);
        assert_eq!(result.financial.printing, 4_913_909);
        assert_eq!(result.financial.transport, 270_000);
    }

    #[test]
    fn test_kits_follow_rooms_and_staff() {
        let result = estimate(777, City::Quibdo, Modality::Written).unwrap();
        let log = &result.logistics;

        assert_eq!(log.room_kits, log.room_count);
        assert_eq!(log.fingerprint_kits, log.fingerprint_tech_count);
        assert_eq!(log.cleaning_kits, log.cleaning_staff_count);
    }

    #[test]
    fn test_single_applicant() {
        let result = estimate(1, City::Bogota, Modality::Written).unwrap();
        let log = &result.logistics;

        assert_eq!(log.site_count, 1);
        assert_eq!(log.room_count, 1);
        assert_eq!(log.fingerprint_tech_count, 1);
        assert_eq!(log.room_coordinator_count, 1);
        assert_eq!(log.cleaning_staff_count, 1);
        assert_eq!(log.security_count, 2);
        assert_eq!(log.total_staff, 7);
    }

    #[test]
    fn test_non_positive_count_is_invalid_input() {
        for n in [0, -1, i64::MIN] {
            let err = estimate(n, City::Bogota, Modality::Written).unwrap_err();
            assert!(matches!(err, EstimateError::InvalidInput(_)), "n = {}", n);
        }
    }

    #[test]
    fn test_overflow_is_invalid_input_not_panic() {
        let err = estimate(i64::MAX, City::Bogota, Modality::Virtual).unwrap_err();
        assert!(matches!(err, EstimateError::InvalidInput(_)));
    }

    #[test]
    fn test_custom_policy_changes_derivation() {
        let mut tariff = Tariff::default();
        tariff.staffing.applicants_per_room = std::num::NonZeroU64::new(50).unwrap();
        tariff.staffing.security_staff_per_site = 3;
        let estimator = Estimator::with_tariff(tariff);

        let result = estimator
            .estimate(&EstimationRequest::new(500, City::Bogota, Modality::Written))
            .unwrap();

        assert_eq!(result.logistics.room_count, 10);
        assert_eq!(result.logistics.security_count, 3);
    }

    #[test]
    fn test_result_json_shape() {
        let result = estimate(500, City::Bogota, Modality::Written).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["logistics"]["site_count"], 1);
        assert_eq!(json["financial"]["total"], 11_465_515);

        let request: EstimationRequest = serde_json::from_str(
            r#"{"applicant_count": 500, "city": "Bogotá", "modality": "Escrita"}"#,
        )
        .unwrap();
        assert_eq!(request, EstimationRequest::new(500, City::Bogota, Modality::Written));
    }
}
