use std::collections::HashSet;

use tracing::debug;

use crate::config::PipelineConfig;
use crate::domain::claim::ClaimRecord;
use crate::domain::client::{BusinessProfile, BusinessRiskProfile, ClientProfile, ClientRef, ClientType};
use crate::domain::contract::ContractRecord;
use crate::domain::product::ProductCatalog;
use crate::errors::DomainError;
use crate::scoring::ScoredClient;

use super::needs::{business_priority_categories, unmet_categories, BUSINESS_INTERRUPTION};
use super::tables::{
    select_products_for_categories, BUSINESS_CATEGORY_PRIORITY, BUSINESS_CLAIMS_CROSS_SELL,
    BUSINESS_IMPACT_CLAIM_CATEGORIES,
};
use super::{dedup_candidates, rank_top3, RecommendedProduct};

/// Generate up to three ranked product recommendations for a scored
/// business client.
pub fn recommend_business(
    scored: &ScoredClient,
    contracts: &[ContractRecord],
    catalog: &ProductCatalog,
    claims: Option<&[ClaimRecord]>,
    config: &PipelineConfig,
) -> Result<Vec<RecommendedProduct>, DomainError> {
    let ClientProfile::Business(profile) = &scored.profile else {
        return Err(DomainError::ProfileMismatch {
            client: scored.client_ref.clone(),
            expected: ClientType::Business,
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

    let priorities = unmet_categories(
        business_priority_categories(
            profile,
            config.products.large_business_capital_threshold,
        ),
        &existing_categories,
    );
    if priorities.is_empty() {
        debug!(client = %scored.client_ref, "business adequately covered, no recommendations");
        return Ok(Vec::new());
    }

    let top_categories = &priorities[..priorities.len().min(2)];
    let mut candidates = select_products_for_categories(
        top_categories,
        BUSINESS_CATEGORY_PRIORITY,
        catalog,
        &existing_products,
    );

    if let Some(claims) = claims {
        candidates.extend(claims_driven_candidates(&scored.client_ref, claims, config));
    }

    let candidates = dedup_candidates(candidates, &existing_products);
    let scored_products = candidates
        .into_iter()
        .map(|product| {
            let score = score_product(&product, profile, scored, catalog, config);
            RecommendedProduct {
                reason: format!("Based on business profile and scoring: {score:.0}/100"),
                confidence: (score / 100.0).min(1.0),
                product,
                score,
            }
        })
        .collect();

    Ok(rank_top3(scored_products))
}

/// Repeat-claim cross-sells plus business-interruption cover once the
/// operationally critical categories accumulate claims.
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
    for &(category, products) in BUSINESS_CLAIMS_CROSS_SELL {
        let count =
            client_claims.iter().filter(|claim| claim.category == category).count() as u32;
        if count >= config.claims.multiple_claims_threshold {
            candidates.extend(products.iter().map(|&product| product.to_owned()));
        }
    }

    let impact_claims = client_claims
        .iter()
        .filter(|claim| BUSINESS_IMPACT_CLAIM_CATEGORIES.contains(&claim.category.as_str()))
        .count();
    if impact_claims >= 2 {
        candidates.push(BUSINESS_INTERRUPTION.to_owned());
    }
    candidates
}

fn score_product(
    product: &str,
    profile: &BusinessProfile,
    scored: &ScoredClient,
    catalog: &ProductCatalog,
    config: &PipelineConfig,
) -> f64 {
    let weights = config.products.scoring_weights;
    let declared_risk = profile.risk_profile.unwrap_or(BusinessRiskProfile::Medium);
    let mut score = 50.0;

    if let Some(category) = catalog.category_of(product) {
        match profile.sector_group.as_str() {
            "INDUSTRIE_ET_CONSTRUCTION"
                if matches!(category, "BRIS DE MACHINES" | "TOUS RISQUES CHANTIER") =>
            {
                score += 25.0;
            }
            "TRANSPORTS_ET_LOGISTIQUE"
                if matches!(
                    category,
                    "TRANSPORT FACULTE TERRESTRE" | "ASSISTANCE DES VEHICULES"
                ) =>
            {
                score += 25.0;
            }
            _ => {}
        }
        if declared_risk == BusinessRiskProfile::High
            && matches!(category, "RESPONSABILITE CIVILE" | "INDIVIDUELLE ACCIDENTS")
        {
            score += 20.0;
        }
    }

    if profile.total_capital_assured > config.scoring.large_size_capital
        && config.is_premium_product(product)
    {
        score += 20.0;
    }

    score += scored.final_score / 100.0 * weights.product_client_fit * 100.0;
    if config.is_premium_product(product) {
        score += weights.profitability * 100.0;
    }
    if declared_risk == BusinessRiskProfile::High {
        score += weights.urgency * 100.0;
    }

    score.min(100.0)
}
