//! Need-prioritization rule cascades.
//!
//! Each cascade appends categories in a fixed precedence order: universal
//! baseline, then family situation, age bracket, profession, sector (and
//! for businesses: declared risk, sector, size). The caller deduplicates
//! by first occurrence and subtracts categories already covered, so "top
//! categories" is deterministic for identical input.

use std::collections::HashSet;

use crate::domain::client::{BusinessProfile, BusinessRiskProfile, IndividualProfile};

pub const HEALTH: &str = "MALADIE";
pub const PERSONAL_ACCIDENT: &str = "INDIVIDUELLE ACCIDENTS";
pub const DEATH: &str = "DECES";
pub const LIFE: &str = "VIE";
pub const RETIREMENT: &str = "CAPITALISATION";
pub const TRAVEL_ASSIST: &str = "ASSISTANCE EN VOYAGES";
pub const LIABILITY: &str = "RESPONSABILITE CIVILE";
pub const THEFT: &str = "VOL";
pub const FIRE_SIMPLE: &str = "INCENDIE RISQUES SIMPLE";
pub const THEFT_ALL: &str = "VOL TOUTE CATEGORIES";
pub const SITE_ALL_RISK: &str = "TOUS RISQUES CHANTIER";
pub const MACHINE_BREAKAGE: &str = "BRIS DE MACHINES";
pub const WATER_DAMAGE: &str = "DEGATS DES EAUX";
pub const LAND_TRANSPORT: &str = "TRANSPORT FACULTE TERRESTRE";
pub const VEHICLE_ASSIST: &str = "ASSISTANCE DES VEHICULES";
pub const DOCTOR_LIABILITY: &str = "R.C MEDECIN";
pub const PARAMEDIC_LIABILITY: &str = "R.C PARAMEDICALE";
pub const HOTEL_MULTIRISK: &str = "MULTIRISQUE HOTELIER";
pub const DECENNIAL_LIABILITY: &str = "RESPONSABILITE DECENNALE";
pub const AGRI_FIRE: &str = "INCENDIE RISQUES AGRICOLES";
pub const BUSINESS_INTERRUPTION: &str = "PERTES D EXPLOITATIONS APRES INCENDIE";
pub const PRO_MULTIRISK: &str = "MULTIRISQUES PROFESSIONNELLES";

/// Priority categories for an individual, in rule-precedence order and
/// possibly repeating; see [`unmet_categories`].
pub fn individual_priority_categories(profile: &IndividualProfile) -> Vec<&'static str> {
    let mut needs = vec![HEALTH, PERSONAL_ACCIDENT];

    let family = profile.family_situation.as_str();
    if matches!(family, "MARIE" | "VEUF(VE)") {
        needs.push(DEATH);
    }
    let age = profile.age.unwrap_or(0);
    if family == "MARIE" && age > 30 {
        needs.extend([LIFE, RETIREMENT]);
    }

    if age > 50 {
        needs.push(RETIREMENT);
    }
    if age < 35 {
        needs.push(TRAVEL_ASSIST);
    }

    match profile.profession_group.as_str() {
        "TECHNICIENS_ET_ARTISANS" | "BATIMENT_ET_TRAVAUX" | "INDUSTRIE_ET_PRODUCTION" => {
            needs.push(PERSONAL_ACCIDENT);
        }
        "CADRES_SUPERIEURS" | "COMMERCE_ET_VENTE" | "SANTE_ET_MEDICAL" => {
            needs.push(LIABILITY);
        }
        _ => {}
    }

    match profile.sector_group.as_str() {
        "TRANSPORTS" | "INDUSTRIE_ET_CONSTRUCTION" => needs.push(PERSONAL_ACCIDENT),
        "COMMERCE_ET_VENTE" | "SERVICES" => needs.extend([LIABILITY, THEFT]),
        _ => {}
    }

    needs
}

/// Priority categories for a business. `large_capital_threshold` gates the
/// large-book coverage rules.
pub fn business_priority_categories(
    profile: &BusinessProfile,
    large_capital_threshold: f64,
) -> Vec<&'static str> {
    let mut needs = vec![LIABILITY, FIRE_SIMPLE, THEFT_ALL];

    // Declared risk defaults to medium when the marker is absent.
    match profile.risk_profile.unwrap_or(BusinessRiskProfile::Medium) {
        BusinessRiskProfile::High => {
            needs.extend([PERSONAL_ACCIDENT, SITE_ALL_RISK, MACHINE_BREAKAGE]);
        }
        BusinessRiskProfile::Medium => needs.extend([PERSONAL_ACCIDENT, WATER_DAMAGE]),
        BusinessRiskProfile::Low => {}
    }

    match profile.sector_group.as_str() {
        "TRANSPORTS_ET_LOGISTIQUE" => needs.extend([LAND_TRANSPORT, VEHICLE_ASSIST]),
        "SANTÉ_ET_SOCIAL" => needs.extend([DOCTOR_LIABILITY, PARAMEDIC_LIABILITY]),
        "COMMERCE_ET_VENTE" => {
            needs.extend(["VOL AVEC EFFRACTION DES MARCHANDISES", WATER_DAMAGE]);
        }
        "HOTELLERIE_ET_TOURISME" => needs.extend([HOTEL_MULTIRISK, TRAVEL_ASSIST]),
        "INDUSTRIE_ET_CONSTRUCTION" => {
            needs.extend([MACHINE_BREAKAGE, SITE_ALL_RISK, DECENNIAL_LIABILITY]);
        }
        "AGRICULTURE_ET_RESSOURCES" => needs.extend([AGRI_FIRE, PERSONAL_ACCIDENT]),
        _ => {}
    }

    if profile.total_capital_assured > large_capital_threshold {
        needs.extend([BUSINESS_INTERRUPTION, PRO_MULTIRISK]);
    }

    needs
}

/// First-occurrence deduplication, then subtraction of categories the
/// client's portfolio already covers. Order is preserved.
pub fn unmet_categories(
    ordered_needs: Vec<&'static str>,
    existing_categories: &HashSet<String>,
) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    ordered_needs
        .into_iter()
        .filter(|category| !existing_categories.contains(*category) && seen.insert(*category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::ClientRef;

    fn individual(age: u32, family: &str, profession: &str, sector: &str) -> IndividualProfile {
        IndividualProfile {
            client_ref: ClientRef::new("1"),
            full_name: "Test Client".to_owned(),
            age: Some(age),
            family_situation: family.to_owned(),
            profession_group: profession.to_owned(),
            sector_group: sector.to_owned(),
        }
    }

    #[test]
    fn single_office_worker_keeps_baseline_needs() {
        let profile = individual(40, "CELIBATAIRE", "ADMINISTRATION_ET_BUREAU", "AUTRE");
        let needs = unmet_categories(individual_priority_categories(&profile), &HashSet::new());
        assert!(needs.contains(&HEALTH));
        assert!(needs.contains(&PERSONAL_ACCIDENT));
    }

    #[test]
    fn married_over_thirty_adds_family_wealth_needs() {
        let profile = individual(42, "MARIE", "CADRES_SUPERIEURS", "SERVICES");
        let needs = individual_priority_categories(&profile);
        assert!(needs.contains(&DEATH));
        assert!(needs.contains(&LIFE));
        assert!(needs.contains(&RETIREMENT));
        assert!(needs.contains(&LIABILITY));
    }

    #[test]
    fn young_client_gets_travel_assistance() {
        let profile = individual(28, "CELIBATAIRE", "ADMINISTRATION_ET_BUREAU", "AUTRE");
        assert!(individual_priority_categories(&profile).contains(&TRAVEL_ASSIST));
    }

    #[test]
    fn cascade_order_is_stable_and_deduplicated() {
        // Both the profession and the sector rule would add personal
        // accident; the deduplicated list keeps its first (baseline) slot.
        let profile = individual(45, "CELIBATAIRE", "TECHNICIENS_ET_ARTISANS", "TRANSPORTS");
        let needs = unmet_categories(individual_priority_categories(&profile), &HashSet::new());
        assert_eq!(needs, vec![HEALTH, PERSONAL_ACCIDENT]);
    }

    #[test]
    fn covered_categories_are_subtracted() {
        let profile = individual(40, "CELIBATAIRE", "ADMINISTRATION_ET_BUREAU", "AUTRE");
        let existing: HashSet<String> = [HEALTH.to_owned()].into();
        let needs = unmet_categories(individual_priority_categories(&profile), &existing);
        assert_eq!(needs, vec![PERSONAL_ACCIDENT]);
    }

    #[test]
    fn business_needs_follow_risk_and_sector() {
        let profile = BusinessProfile {
            client_ref: ClientRef::new("2"),
            company_name: "BTP SA".to_owned(),
            sector_group: "INDUSTRIE_ET_CONSTRUCTION".to_owned(),
            activity_group: "BTP".to_owned(),
            risk_profile: Some(BusinessRiskProfile::High),
            total_capital_assured: 800_000.0,
            total_premiums_paid: 12_000.0,
        };
        let needs = business_priority_categories(&profile, 500_000.0);
        assert_eq!(&needs[..3], &[LIABILITY, FIRE_SIMPLE, THEFT_ALL]);
        assert!(needs.contains(&SITE_ALL_RISK));
        assert!(needs.contains(&DECENNIAL_LIABILITY));
        assert!(needs.contains(&BUSINESS_INTERRUPTION));
    }
}
