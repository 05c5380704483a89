use std::collections::BTreeMap;

use crate::config::PipelineConfig;
use crate::domain::client::{ClientProfile, ClientRef, IndividualProfile};
use crate::domain::contract::ContractRecord;

use super::metrics::{aggregate_metrics, ClientMetrics};
use super::{assign_risk_tier, assign_segment, clip_score, min_max_normalize, safe_ratio, ScoredClient, Segment};

// Point budgets of the loyalty components (contract volume, product
// variety, branch variety, active ratio).
const LOYALTY_POINTS: [f64; 4] = [30.0, 25.0, 20.0, 25.0];
// Financial components: premium volume, average premium, insured capital,
// inverse premium spread.
const FINANCIAL_POINTS: [f64; 4] = [35.0, 25.0, 20.0, 20.0];
// Payment components: paid ratio, cancellation-free ratio, paid volume.
const PAYMENT_POINTS: [f64; 3] = [40.0, 30.0, 30.0];

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
    // Spread term rewards even premiums: max_premium close to the average
    // scores near the full point budget.
    let spread = safe_ratio(m.max_premium, m.avg_premium_per_contract.max(1.0));
    let inverse_spread = if spread > 0.0 { 1.0 / spread } else { 0.0 };
    safe_ratio(m.total_premiums_paid, maxima.total_premiums) * FINANCIAL_POINTS[0]
        + safe_ratio(m.avg_premium_per_contract, maxima.avg_premium) * FINANCIAL_POINTS[1]
        + safe_ratio(m.total_capital_assured, maxima.total_capital) * FINANCIAL_POINTS[2]
        + inverse_spread * FINANCIAL_POINTS[3]
}

fn raw_payment(m: &ClientMetrics) -> f64 {
    let denom = f64::from(m.total_contracts.max(1));
    m.paid_ratio * PAYMENT_POINTS[0]
        + (1.0 - f64::from(m.cancelled_contracts) / denom) * PAYMENT_POINTS[1]
        + f64::from(m.total_paid_contracts) / denom * PAYMENT_POINTS[2]
}

/// Normalized component triple per contract-holding client.
pub(super) struct NormalizedComponents {
    pub loyalty: BTreeMap<ClientRef, f64>,
    pub financial: BTreeMap<ClientRef, f64>,
    pub payment: BTreeMap<ClientRef, f64>,
}

pub(super) fn normalize_components(
    metrics: &BTreeMap<ClientRef, ClientMetrics>,
    raw: impl Fn(&ClientMetrics) -> (f64, f64, f64),
) -> NormalizedComponents {
    let keys: Vec<&ClientRef> = metrics.keys().collect();
    let mut loyalty = Vec::with_capacity(keys.len());
    let mut financial = Vec::with_capacity(keys.len());
    let mut payment = Vec::with_capacity(keys.len());
    for m in metrics.values() {
        let (l, f, p) = raw(m);
        loyalty.push(l);
        financial.push(f);
        payment.push(p);
    }
    min_max_normalize(&mut loyalty);
    min_max_normalize(&mut financial);
    min_max_normalize(&mut payment);
    let zip = |values: Vec<f64>| {
        keys.iter().map(|&key| key.clone()).zip(values).collect::<BTreeMap<_, _>>()
    };
    NormalizedComponents { loyalty: zip(loyalty), financial: zip(financial), payment: zip(payment) }
}

/// Score the individual population. Every profile client appears in the
/// output: clients without contracts get zero component scores, the
/// `Prospect` segment, and the `High` risk tier.
pub fn score_individuals(
    contracts: &[ContractRecord],
    profiles: &[IndividualProfile],
    config: &PipelineConfig,
) -> Vec<ScoredClient> {
    let metrics = aggregate_metrics(contracts);
    let maxima = PopulationMaxima::compute(metrics.values());
    let components = normalize_components(&metrics, |m| {
        (raw_loyalty(m, &maxima), raw_financial(m, &maxima), raw_payment(m))
    });

    let blend = config.scoring.individual_blend;
    profiles
        .iter()
        .map(|profile| {
            let key = &profile.client_ref;
            let loyalty = components.loyalty.get(key).copied().unwrap_or(0.0);
            let financial = components.financial.get(key).copied().unwrap_or(0.0);
            let payment = components.payment.get(key).copied().unwrap_or(0.0);
            let final_score = clip_score(
                loyalty * blend.loyalty + financial * blend.financial + payment * blend.payment,
            );
            ScoredClient {
                client_ref: profile.client_ref.clone(),
                profile: ClientProfile::Individual(profile.clone()),
                metrics: metrics.get(key).cloned().unwrap_or_default(),
                loyalty_score: loyalty,
                financial_score: financial,
                payment_score: payment,
                final_score,
                segment: assign_segment(
                    final_score,
                    &config.scoring.individual_segments,
                    Segment::Prospect,
                ),
                risk_tier: assign_risk_tier(payment, &config.scoring.risk_tiers),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::{ContractState, PaymentStatus};
    use crate::scoring::RiskTier;
    use chrono::NaiveDate;

    fn profile(client: &str) -> IndividualProfile {
        IndividualProfile {
            client_ref: ClientRef::new(client),
            full_name: format!("Client {client}"),
            age: Some(40),
            family_situation: "CELIBATAIRE".to_owned(),
            profession_group: "ADMINISTRATION_ET_BUREAU".to_owned(),
            sector_group: "SERVICES".to_owned(),
        }
    }

    fn contract(client: &str, id: u32, product: &str, premium: f64, paid: bool) -> ContractRecord {
        ContractRecord {
            client_ref: ClientRef::new(client),
            contract_id: id.to_string(),
            product: product.to_owned(),
            branch: "IARD".to_owned(),
            state: ContractState::Active,
            payment: if paid { PaymentStatus::Paid } else { PaymentStatus::Unpaid },
            premium,
            insured_capital: premium * 8.0,
            effective_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            expiration_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            next_installment: None,
        }
    }

    #[test]
    fn every_profile_client_is_scored() {
        let contracts = vec![contract("1", 1, "AUTOMOBILE", 900.0, true)];
        let profiles = vec![profile("1"), profile("2")];
        let scored = score_individuals(&contracts, &profiles, &PipelineConfig::default());
        assert_eq!(scored.len(), 2);
        let orphan = scored.iter().find(|s| s.client_ref.as_str() == "2").unwrap();
        assert_eq!(orphan.final_score, 0.0);
        assert_eq!(orphan.segment, Segment::Prospect);
        assert_eq!(orphan.risk_tier, RiskTier::High);
        assert_eq!(orphan.metrics.total_contracts, 0);
    }

    #[test]
    fn final_score_stays_in_bounds() {
        let contracts = vec![
            contract("1", 1, "AUTOMOBILE", 5_000.0, true),
            contract("1", 2, "SANTE ET PREVOYANCE", 5_000.0, true),
            contract("2", 3, "AUTOMOBILE", 10.0, false),
        ];
        let profiles = vec![profile("1"), profile("2")];
        for scored in score_individuals(&contracts, &profiles, &PipelineConfig::default()) {
            assert!((0.0..=100.0).contains(&scored.final_score));
            assert!((0.0..=100.0).contains(&scored.loyalty_score));
            assert!((0.0..=100.0).contains(&scored.financial_score));
            assert!((0.0..=100.0).contains(&scored.payment_score));
        }
    }

    #[test]
    fn stronger_portfolio_scores_higher() {
        let contracts = vec![
            contract("1", 1, "AUTOMOBILE", 4_000.0, true),
            contract("1", 2, "SANTE ET PREVOYANCE", 3_500.0, true),
            contract("1", 3, "TEMPORAIRE DECES", 3_000.0, true),
            contract("2", 4, "AUTOMOBILE", 100.0, false),
        ];
        let profiles = vec![profile("1"), profile("2")];
        let scored = score_individuals(&contracts, &profiles, &PipelineConfig::default());
        let strong = scored.iter().find(|s| s.client_ref.as_str() == "1").unwrap();
        let weak = scored.iter().find(|s| s.client_ref.as_str() == "2").unwrap();
        assert!(strong.final_score > weak.final_score);
        assert!(strong.segment > weak.segment);
    }

    #[test]
    fn single_client_population_normalizes_flat() {
        // With one contract-holding client every component is both the
        // population min and max, so normalization yields 0 across the board.
        let contracts = vec![contract("1", 1, "AUTOMOBILE", 900.0, true)];
        let profiles = vec![profile("1")];
        let scored = score_individuals(&contracts, &profiles, &PipelineConfig::default());
        assert_eq!(scored[0].final_score, 0.0);
    }
}
