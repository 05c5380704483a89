use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::domain::claim::ClaimRecord;
use crate::domain::client::{ClientProfile, ClientRef, ClientType, IndividualProfile};
use crate::domain::contract::{ContractRecord, ContractState};
use crate::domain::product::ProductCatalog;
use crate::errors::DomainError;
use crate::scoring::{ScoredClient, Segment};

use super::needs::{individual_priority_categories, unmet_categories, LIABILITY};
use super::tables::{select_products_for_categories, INDIVIDUAL_CATEGORY_PRIORITY, INDIVIDUAL_CLAIMS_CROSS_SELL};
use super::{dedup_candidates, estimate_budget, rank_top3, RecommendedProduct};

/// Generate up to three ranked product recommendations for a scored
/// individual client. A fully covered client gets an empty list.
pub fn recommend_individual(
    scored: &ScoredClient,
    contracts: &[ContractRecord],
    catalog: &ProductCatalog,
    claims: Option<&[ClaimRecord]>,
    today: NaiveDate,
    config: &PipelineConfig,
) -> Result<Vec<RecommendedProduct>, DomainError> {
    let ClientProfile::Individual(profile) = &scored.profile else {
        return Err(DomainError::ProfileMismatch {
            client: scored.client_ref.clone(),
            expected: ClientType::Individual,
            found: scored.client_type(),
        });
    };

    let client_contracts: Vec<&ContractRecord> =
        contracts.iter().filter(|contract| contract.client_ref == scored.client_ref).collect();
    let existing_products: HashSet<&str> =
        client_contracts.iter().map(|contract| contract.product.as_str()).collect();
    let existing_categories: HashSet<String> = client_contracts
        .iter()
        .filter_map(|contract| catalog.category_of(&contract.product))
        .map(str::to_owned)
        .collect();

    let estimated_budget = estimate_budget(scored, &config.budget);

    let priorities =
        unmet_categories(individual_priority_categories(profile), &existing_categories);
    if priorities.is_empty() {
        debug!(client = %scored.client_ref, "client adequately covered, no recommendations");
        return Ok(Vec::new());
    }

    let top_categories = &priorities[..priorities.len().min(2)];
    let mut candidates = select_products_for_categories(
        top_categories,
        INDIVIDUAL_CATEGORY_PRIORITY,
        catalog,
        &existing_products,
    );

    if let Some(claims) = claims {
        candidates.extend(claims_driven_candidates(&scored.client_ref, claims, config));
    }
    candidates.extend(cancellation_driven_candidates(&client_contracts, catalog, today, config));

    let candidates = dedup_candidates(candidates, &existing_products);

    let scored_products = candidates
        .into_iter()
        // Uncatalogued candidates cannot pass the tier/budget gate.
        .filter(|product| catalog.find(product).is_some())
        .filter(|product| {
            passes_budget_gate(product, estimated_budget, existing_products.len(), config)
        })
        .map(|product| {
            let score = score_product(&product, profile, scored, catalog, config);
            RecommendedProduct {
                reason: format!("Based on client profile and scoring: {score:.0}/100"),
                confidence: (score / 100.0).min(1.0),
                product,
                score,
            }
        })
        .collect();

    Ok(rank_top3(scored_products))
}

/// Repeat-claim cross-sells plus a liability proposal after any
/// full-responsibility claim.
fn claims_driven_candidates(
    client_ref: &ClientRef,
    claims: &[ClaimRecord],
    config: &PipelineConfig,
) -> Vec<String> {
    let client_claims: Vec<&ClaimRecord> =
        claims.iter().filter(|claim| &claim.client_ref == client_ref).collect();
    if client_claims.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for &(category, products) in INDIVIDUAL_CLAIMS_CROSS_SELL {
        let count =
            client_claims.iter().filter(|claim| claim.category == category).count() as u32;
        if count >= config.claims.multiple_claims_threshold {
            candidates.extend(products.iter().map(|&product| product.to_owned()));
        }
    }

    let high_risk = client_claims
        .iter()
        .any(|claim| claim.responsibility_rate >= config.claims.high_risk_responsibility_rate);
    if high_risk {
        candidates.push(LIABILITY.to_owned());
    }
    candidates
}

/// After a recent cancellation, propose a replacement from the same branch.
fn cancellation_driven_candidates(
    client_contracts: &[&ContractRecord],
    catalog: &ProductCatalog,
    today: NaiveDate,
    config: &PipelineConfig,
) -> Vec<String> {
    let window = config.alerts.recent_cancellation_days.max(0) as u64;
    let cutoff = today.checked_sub_days(Days::new(window)).unwrap_or(NaiveDate::MIN);
    client_contracts
        .iter()
        .filter(|contract| contract.state == ContractState::Cancelled)
        .filter(|contract| contract.effective_date.is_some_and(|date| date >= cutoff))
        .filter_map(|contract| catalog.products_in_branch(&contract.branch).next())
        .map(str::to_owned)
        .collect()
}

fn passes_budget_gate(
    product: &str,
    estimated_budget: f64,
    existing_count: usize,
    config: &PipelineConfig,
) -> bool {
    product.contains("BASIQUE")
        || product.contains("STANDARD")
        || estimated_budget > config.products.budget_gate_threshold
        || existing_count == 0
}

fn score_product(
    product: &str,
    profile: &IndividualProfile,
    scored: &ScoredClient,
    catalog: &ProductCatalog,
    config: &PipelineConfig,
) -> f64 {
    let weights = config.products.scoring_weights;
    let mut score = 50.0;

    if let Some(category) = catalog.category_of(product) {
        let age = profile.age.unwrap_or(40);
        if category == "CAPITALISATION" && age > 50 {
            score += 20.0;
        } else if category == "ASSISTANCE EN VOYAGES" && age < 35 {
            score += 15.0;
        }
        if matches!(profile.family_situation.as_str(), "MARIE" | "VEUF(VE)") && category == "DECES"
        {
            score += 15.0;
        }
    }

    score += scored.final_score / 100.0 * weights.product_client_fit * 100.0;
    if config.is_premium_product(product) {
        score += weights.profitability * 100.0;
    }
    if matches!(scored.segment, Segment::Premium | Segment::Gold) {
        score += weights.urgency * 100.0;
    }

    score.min(100.0)
}
