//! Scoring engine: per-client component scores, population normalization,
//! segment and risk-tier assignment.

mod business;
mod individual;
mod metrics;

pub use business::score_businesses;
pub use individual::score_individuals;
pub use metrics::{aggregate_metrics, ClientMetrics};

use serde::{Deserialize, Serialize};

use crate::config::{RiskCut, SegmentCut};
use crate::domain::client::{ClientProfile, ClientRef, ClientType};

/// Client value tier. Individual and business populations each use their
/// own ladder; variants are declared in ascending order per ladder so the
/// derived ordering matches tier value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    Prospect,
    Bronze,
    Silver,
    Gold,
    Premium,
    Startup,
    #[serde(rename = "Small Business")]
    SmallBusiness,
    #[serde(rename = "SME")]
    Sme,
    Business,
    Enterprise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

/// A client with component and final scores attached. Immutable once
/// produced by a scoring pass; the recommendation engine and batch
/// processor only read from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredClient {
    pub client_ref: ClientRef,
    pub profile: ClientProfile,
    pub metrics: ClientMetrics,
    pub loyalty_score: f64,
    pub financial_score: f64,
    pub payment_score: f64,
    pub final_score: f64,
    pub segment: Segment,
    pub risk_tier: RiskTier,
}

impl ScoredClient {
    pub fn client_type(&self) -> ClientType {
        self.profile.client_type()
    }

    pub fn display_name(&self) -> &str {
        self.profile.display_name()
    }
}

/// `value / max`, with an empty or zero population max contributing 0.
pub(crate) fn safe_ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

/// Min-max normalize in place to the 0–100 range. A flat population (all
/// values equal) normalizes to 0 everywhere; an empty slice is a no-op.
pub(crate) fn min_max_normalize(values: &mut [f64]) {
    let Some(first) = values.first().copied() else {
        return;
    };
    let (min, max) = values.iter().fold((first, first), |(min, max), &value| {
        (min.min(value), max.max(value))
    });
    let range = max - min;
    for value in values.iter_mut() {
        *value = if range > 0.0 { (*value - min) / range * 100.0 } else { 0.0 };
    }
}

pub(crate) fn clip_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Walk an ordered ladder top-down; first rung met wins.
pub(crate) fn assign_segment(score: f64, cuts: &[SegmentCut], fallback: Segment) -> Segment {
    cuts.iter().find(|cut| score >= cut.min_score).map(|cut| cut.segment).unwrap_or(fallback)
}

pub(crate) fn assign_risk_tier(payment_score: f64, cuts: &[RiskCut]) -> RiskTier {
    cuts.iter().find(|cut| payment_score >= cut.min_score).map(|cut| cut.tier).unwrap_or(RiskTier::High)
}
