//! Recommendation engine: unmet-need prioritization, candidate products,
//! claims/alert-driven cross-sells, candidate scoring, top-3 ranking.

mod business;
mod individual;
pub mod needs;
mod tables;

pub use business::recommend_business;
pub use individual::recommend_individual;

use serde::{Deserialize, Serialize};

use crate::config::BudgetConfig;
use crate::domain::client::{ClientProfile, ClientRef, ClientType};
use crate::scoring::{RiskTier, ScoredClient, Segment};

/// One ranked product proposal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub product: String,
    /// 0–100.
    pub score: f64,
    /// score / 100, capped at 1.0.
    pub confidence: f64,
    pub reason: String,
}

/// Per-client recommendation output record. Replaces (never merges with)
/// any prior recommendation for the client on a resumed run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub client_ref: ClientRef,
    pub display_name: String,
    pub recommended_products: Vec<RecommendedProduct>,
    pub recommendation_count: usize,
    pub client_score: f64,
    pub client_segment: Segment,
    pub risk_tier: RiskTier,
    pub estimated_budget: f64,
    pub client_type: ClientType,
}

/// Estimated yearly insurance budget, never below the type-specific floor.
///
/// Individuals project from premiums actually paid; businesses from the
/// declared book (premiums and insured capital on the profile).
pub fn estimate_budget(scored: &ScoredClient, config: &BudgetConfig) -> f64 {
    match &scored.profile {
        ClientProfile::Individual(_) => {
            let rule = config.individual;
            (scored.metrics.total_premiums_paid * rule.multiplier)
                .max(scored.metrics.avg_premium_per_contract * rule.secondary_ratio)
                .max(rule.minimum)
        }
        ClientProfile::Business(profile) => {
            let rule = config.business;
            (profile.total_premiums_paid * rule.multiplier)
                .max(profile.total_capital_assured * rule.secondary_ratio)
                .max(rule.minimum)
        }
    }
}

/// Deduplicate candidates preserving first occurrence and drop anything the
/// client already holds.
pub(crate) fn dedup_candidates(
    candidates: Vec<String>,
    existing_products: &std::collections::HashSet<&str>,
) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| {
            !existing_products.contains(candidate.as_str()) && seen.insert(candidate.clone())
        })
        .collect()
}

/// Sort descending by score (stable, so equal scores keep candidate order)
/// and keep the top 3.
pub(crate) fn rank_top3(mut products: Vec<RecommendedProduct>) -> Vec<RecommendedProduct> {
    products.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    products.truncate(3);
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::{BusinessProfile, IndividualProfile};
    use crate::scoring::ClientMetrics;
    use std::collections::HashSet;

    fn scored_individual(total_premiums: f64, avg_premium: f64) -> ScoredClient {
        ScoredClient {
            client_ref: ClientRef::new("IND-1"),
            profile: ClientProfile::Individual(IndividualProfile {
                client_ref: ClientRef::new("IND-1"),
                full_name: "DUPONT JEAN".to_owned(),
                age: Some(40),
                family_situation: "CELIBATAIRE".to_owned(),
                profession_group: "ADMINISTRATION_ET_BUREAU".to_owned(),
                sector_group: "PUBLIC".to_owned(),
            }),
            metrics: ClientMetrics {
                total_premiums_paid: total_premiums,
                avg_premium_per_contract: avg_premium,
                ..ClientMetrics::default()
            },
            loyalty_score: 0.0,
            financial_score: 0.0,
            payment_score: 0.0,
            final_score: 0.0,
            segment: Segment::Prospect,
            risk_tier: RiskTier::High,
        }
    }

    fn scored_business(total_premiums: f64, capital: f64) -> ScoredClient {
        ScoredClient {
            client_ref: ClientRef::new("BUS-1"),
            profile: ClientProfile::Business(BusinessProfile {
                client_ref: ClientRef::new("BUS-1"),
                company_name: "TRANSPORTS RAPIDES".to_owned(),
                sector_group: "TRANSPORT".to_owned(),
                activity_group: "LOGISTIQUE".to_owned(),
                risk_profile: None,
                total_capital_assured: capital,
                total_premiums_paid: total_premiums,
            }),
            metrics: ClientMetrics::default(),
            loyalty_score: 0.0,
            financial_score: 0.0,
            payment_score: 0.0,
            final_score: 0.0,
            segment: Segment::Startup,
            risk_tier: RiskTier::High,
        }
    }

    #[test]
    fn individual_budget_never_falls_below_floor() {
        let budget = estimate_budget(&scored_individual(0.0, 0.0), &BudgetConfig::default());
        assert_eq!(budget, 500.0);
    }

    #[test]
    fn individual_budget_takes_largest_projection() {
        // premiums * 1.5 = 3000, avg * 3.0 = 4500.
        let budget = estimate_budget(&scored_individual(2_000.0, 1_500.0), &BudgetConfig::default());
        assert_eq!(budget, 4_500.0);
    }

    #[test]
    fn business_budget_projects_from_insured_capital() {
        // premiums * 1.5 = 15_000, capital * 0.015 = 45_000.
        let budget =
            estimate_budget(&scored_business(10_000.0, 3_000_000.0), &BudgetConfig::default());
        assert_eq!(budget, 45_000.0);
        let floor = estimate_budget(&scored_business(0.0, 0.0), &BudgetConfig::default());
        assert_eq!(floor, 1_000.0);
    }

    fn rec(product: &str, score: f64) -> RecommendedProduct {
        RecommendedProduct {
            product: product.to_owned(),
            score,
            confidence: (score / 100.0).min(1.0),
            reason: String::new(),
        }
    }

    #[test]
    fn ranking_caps_at_three() {
        let ranked = rank_top3(vec![rec("A", 60.0), rec("B", 90.0), rec("C", 70.0), rec("D", 80.0)]);
        let names: Vec<_> = ranked.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(names, vec!["B", "D", "C"]);
    }

    #[test]
    fn equal_scores_keep_candidate_order() {
        let ranked = rank_top3(vec![rec("A", 70.0), rec("B", 70.0), rec("C", 70.0)]);
        let names: Vec<_> = ranked.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn dedup_removes_held_and_repeated_products() {
        let existing: HashSet<&str> = ["AUTOMOBILE"].into_iter().collect();
        let candidates = vec![
            "AUTOMOBILE".to_owned(),
            "VOL TOUTE CATEGORIES".to_owned(),
            "VOL TOUTE CATEGORIES".to_owned(),
            "BRIS DE MACHINES".to_owned(),
        ];
        assert_eq!(
            dedup_candidates(candidates, &existing),
            vec!["VOL TOUTE CATEGORIES".to_owned(), "BRIS DE MACHINES".to_owned()]
        );
    }
}
