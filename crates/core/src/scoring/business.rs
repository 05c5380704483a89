use crate::config::PipelineConfig;
use crate::domain::client::{BusinessProfile, ClientProfile};
use crate::domain::contract::ContractRecord;

use super::individual::normalize_components;
use super::metrics::{aggregate_metrics, ClientMetrics};
use super::{assign_risk_tier, assign_segment, clip_score, safe_ratio, ScoredClient, Segment};

const LOYALTY_POINTS: [f64; 4] = [25.0, 20.0, 15.0, 20.0];
const FINANCIAL_POINTS: [f64; 3] = [40.0, 30.0, 30.0];
const PAYMENT_POINTS: [f64; 3] = [50.0, 25.0, 25.0];

#[derive(Debug, Default)]
struct PopulationMaxima {
    total_contracts: f64,
    product_variety: f64,
    branch_variety: f64,
    total_premiums: f64,
    avg_premium: f64,
    total_capital: f64,
}

impl PopulationMaxima {
    fn compute<'a>(metrics: impl Iterator<Item = &'a ClientMetrics>) -> Self {
        metrics.fold(Self::default(), |mut maxima, m| {
            maxima.total_contracts = maxima.total_contracts.max(f64::from(m.total_contracts));
            maxima.product_variety = maxima.product_variety.max(f64::from(m.product_variety));
            maxima.branch_variety = maxima.branch_variety.max(f64::from(m.branch_variety));
            maxima.total_premiums = maxima.total_premiums.max(m.total_premiums_paid);
            maxima.avg_premium = maxima.avg_premium.max(m.avg_premium_per_contract);
            maxima.total_capital = maxima.total_capital.max(m.total_capital_assured);
            maxima
        })
    }
}

fn raw_loyalty(m: &ClientMetrics, maxima: &PopulationMaxima) -> f64 {
    let denom = f64::from(m.total_contracts.max(1));
    safe_ratio(f64::from(m.total_contracts), maxima.total_contracts) * LOYALTY_POINTS[0]
        + safe_ratio(f64::from(m.product_variety), maxima.product_variety) * LOYALTY_POINTS[1]
        + safe_ratio(f64::from(m.branch_variety), maxima.branch_variety) * LOYALTY_POINTS[2]
        + f64::from(m.active_contracts) / denom * LOYALTY_POINTS[3]
}

fn raw_financial(m: &ClientMetrics, maxima: &PopulationMaxima) -> f64 {
    safe_ratio(m.total_premiums_paid, maxima.total_premiums) * FINANCIAL_POINTS[0]
        + safe_ratio(m.avg_premium_per_contract, maxima.avg_premium) * FINANCIAL_POINTS[1]
        + safe_ratio(m.total_capital_assured, maxima.total_capital) * FINANCIAL_POINTS[2]
}

fn raw_payment(m: &ClientMetrics) -> f64 {
    let denom = f64::from(m.total_contracts.max(1));
    m.paid_ratio * PAYMENT_POINTS[0]
        + (1.0 - f64::from(m.cancelled_contracts) / denom) * PAYMENT_POINTS[1]
        + f64::from(m.total_paid_contracts) / denom * PAYMENT_POINTS[2]
}

/// Size multiplier from the declared total insured capital on the business
/// profile. Larger books get a nudge upward before re-clipping.
fn size_factor(profile: &BusinessProfile, config: &PipelineConfig) -> f64 {
    if profile.total_capital_assured > config.scoring.large_size_capital {
        config.scoring.large_size_factor
    } else if profile.total_capital_assured > config.scoring.mid_size_capital {
        config.scoring.mid_size_factor
    } else {
        1.0
    }
}

/// Score the business population. Beyond the shared blend, business scores
/// carry size and declared-risk multipliers, re-clipped to [0,100].
pub fn score_businesses(
    contracts: &[ContractRecord],
    profiles: &[BusinessProfile],
    config: &PipelineConfig,
) -> Vec<ScoredClient> {
    let metrics = aggregate_metrics(contracts);
    let maxima = PopulationMaxima::compute(metrics.values());
    let components = normalize_components(&metrics, |m| {
        (raw_loyalty(m, &maxima), raw_financial(m, &maxima), raw_payment(m))
    });

    let blend = config.scoring.business_blend;
    profiles
        .iter()
        .map(|profile| {
            let key = &profile.client_ref;
            let loyalty = components.loyalty.get(key).copied().unwrap_or(0.0);
            let financial = components.financial.get(key).copied().unwrap_or(0.0);
            let payment = components.payment.get(key).copied().unwrap_or(0.0);
            let blended = clip_score(
                loyalty * blend.loyalty + financial * blend.financial + payment * blend.payment,
            );
            let risk_factor = profile.risk_profile.map_or(1.0, |risk| risk.score_factor());
            let final_score = clip_score(blended * size_factor(profile, config) * risk_factor);
            ScoredClient {
                client_ref: profile.client_ref.clone(),
                profile: ClientProfile::Business(profile.clone()),
                metrics: metrics.get(key).cloned().unwrap_or_default(),
                loyalty_score: loyalty,
                financial_score: financial,
                payment_score: payment,
                final_score,
                segment: assign_segment(
                    final_score,
                    &config.scoring.business_segments,
                    Segment::Startup,
                ),
                risk_tier: assign_risk_tier(payment, &config.scoring.risk_tiers),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::{BusinessRiskProfile, ClientRef};
    use crate::domain::contract::{ContractState, PaymentStatus};
    use chrono::NaiveDate;

    fn profile(client: &str, capital: f64, risk: BusinessRiskProfile) -> BusinessProfile {
        BusinessProfile {
            client_ref: ClientRef::new(client),
            company_name: format!("Societe {client}"),
            sector_group: "INDUSTRIE_ET_CONSTRUCTION".to_owned(),
            activity_group: "BTP".to_owned(),
            risk_profile: Some(risk),
            total_capital_assured: capital,
            total_premiums_paid: capital * 0.01,
        }
    }

    fn contract(client: &str, id: u32, product: &str, premium: f64) -> ContractRecord {
        ContractRecord {
            client_ref: ClientRef::new(client),
            contract_id: id.to_string(),
            product: product.to_owned(),
            branch: "IARD".to_owned(),
            state: ContractState::Active,
            payment: PaymentStatus::Paid,
            premium,
            insured_capital: premium * 20.0,
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            expiration_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            next_installment: None,
        }
    }

    #[test]
    fn size_factor_brackets() {
        let config = PipelineConfig::default();
        assert_eq!(size_factor(&profile("1", 2_000_000.0, BusinessRiskProfile::Medium), &config), 1.2);
        assert_eq!(size_factor(&profile("2", 200_000.0, BusinessRiskProfile::Medium), &config), 1.1);
        assert_eq!(size_factor(&profile("3", 50_000.0, BusinessRiskProfile::Medium), &config), 1.0);
    }

    #[test]
    fn adjusted_score_stays_in_bounds() {
        let contracts = vec![
            contract("1", 1, "MULTIRISQUES PROFESSIONNELLES", 9_000.0),
            contract("1", 2, "BRIS DE MACHINES", 8_000.0),
            contract("2", 3, "VOL TOUTE CATEGORIES", 100.0),
        ];
        let profiles = vec![
            profile("1", 5_000_000.0, BusinessRiskProfile::Low),
            profile("2", 10_000.0, BusinessRiskProfile::High),
        ];
        for scored in score_businesses(&contracts, &profiles, &PipelineConfig::default()) {
            assert!((0.0..=100.0).contains(&scored.final_score));
        }
    }

    #[test]
    fn low_risk_profile_outscores_high_risk_twin() {
        // Two businesses with identical books; only the declared risk differs.
        let contracts = vec![
            contract("1", 1, "BRIS DE MACHINES", 4_000.0),
            contract("2", 2, "BRIS DE MACHINES", 4_000.0),
            contract("3", 3, "VOL TOUTE CATEGORIES", 500.0),
        ];
        let profiles = vec![
            profile("1", 200_000.0, BusinessRiskProfile::Low),
            profile("2", 200_000.0, BusinessRiskProfile::High),
        ];
        let scored = score_businesses(&contracts, &profiles, &PipelineConfig::default());
        let low = scored.iter().find(|s| s.client_ref.as_str() == "1").unwrap();
        let high = scored.iter().find(|s| s.client_ref.as_str() == "2").unwrap();
        assert!(low.final_score >= high.final_score);
    }

    #[test]
    fn business_segment_uses_business_ladder() {
        let contracts = vec![contract("1", 1, "BRIS DE MACHINES", 1_000.0)];
        let profiles = vec![profile("1", 10_000.0, BusinessRiskProfile::Medium)];
        let scored = score_businesses(&contracts, &profiles, &PipelineConfig::default());
        assert!(matches!(
            scored[0].segment,
            Segment::Startup | Segment::SmallBusiness | Segment::Sme | Segment::Business | Segment::Enterprise
        ));
    }
}
