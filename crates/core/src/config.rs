//! Pipeline tunables.
//!
//! Every constant the scoring/recommendation/alert passes branch on lives
//! here, with defaults matching production values. A partial TOML file can
//! override any section; unspecified fields keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::{RiskTier, Segment};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub scoring: ScoringConfig,
    pub budget: BudgetConfig,
    pub claims: ClaimsConfig,
    pub alerts: AlertConfig,
    pub batch: BatchConfig,
    pub products: ProductConfig,
}

/// Blend weights for the three component scores.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentBlend {
    pub loyalty: f64,
    pub financial: f64,
    pub payment: f64,
}

/// One rung of an ordered segment ladder. Ladders are walked top-down;
/// the first rung whose `min_score` the client meets wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentCut {
    pub segment: Segment,
    pub min_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskCut {
    pub tier: RiskTier,
    pub min_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub individual_blend: ComponentBlend,
    pub business_blend: ComponentBlend,
    /// Ordered, descending by `min_score`; fallback is `Segment::Prospect`.
    pub individual_segments: Vec<SegmentCut>,
    /// Ordered, descending by `min_score`; fallback is `Segment::Startup`.
    pub business_segments: Vec<SegmentCut>,
    /// Ordered, descending by `min_score`; fallback is `RiskTier::High`.
    pub risk_tiers: Vec<RiskCut>,
    /// Capital above this gets the large-business score multiplier.
    pub large_size_capital: f64,
    pub large_size_factor: f64,
    /// Capital above this (but not large) gets the mid-size multiplier.
    pub mid_size_capital: f64,
    pub mid_size_factor: f64,
}

/// Budget projection: `max(premiums * multiplier, secondary, minimum)`.
/// The secondary term is average premium times `secondary_ratio` for
/// individuals, and insured capital times `secondary_ratio` for businesses.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetRule {
    pub minimum: f64,
    pub multiplier: f64,
    pub secondary_ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub individual: BudgetRule,
    pub business: BudgetRule,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    pub multiple_claims_threshold: u32,
    pub high_risk_responsibility_rate: f64,
    pub recent_claims_days: i64,
    pub large_claim_threshold: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub expiration_alert_days: i64,
    /// Below this remaining-days count an expiration alert is High severity.
    pub expiration_high_severity_days: i64,
    pub payment_overdue_days: i64,
    pub recent_cancellation_days: i64,
    pub low_premium_threshold: f64,
    /// Scan horizon for the persisted nearest-expiry refresh.
    pub expiry_refresh_days: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub batch_size: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductScoringWeights {
    pub product_client_fit: f64,
    pub client_value: f64,
    pub profitability: f64,
    pub urgency: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// High-margin products that earn the profitability bonus.
    pub premium_products: Vec<String>,
    pub scoring_weights: ProductScoringWeights,
    /// Capital threshold that triggers large-business coverage needs.
    pub large_business_capital_threshold: f64,
    /// Individual budget gate: non-basic products require at least this
    /// estimated budget unless the client holds nothing yet.
    pub budget_gate_threshold: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            individual_blend: ComponentBlend { loyalty: 0.35, financial: 0.40, payment: 0.25 },
            business_blend: ComponentBlend { loyalty: 0.30, financial: 0.45, payment: 0.25 },
            individual_segments: vec![
                SegmentCut { segment: Segment::Premium, min_score: 85.0 },
                SegmentCut { segment: Segment::Gold, min_score: 70.0 },
                SegmentCut { segment: Segment::Silver, min_score: 50.0 },
                SegmentCut { segment: Segment::Bronze, min_score: 30.0 },
            ],
            business_segments: vec![
                SegmentCut { segment: Segment::Enterprise, min_score: 85.0 },
                SegmentCut { segment: Segment::Business, min_score: 70.0 },
                SegmentCut { segment: Segment::Sme, min_score: 50.0 },
                SegmentCut { segment: Segment::SmallBusiness, min_score: 30.0 },
            ],
            risk_tiers: vec![
                RiskCut { tier: RiskTier::Low, min_score: 80.0 },
                RiskCut { tier: RiskTier::Medium, min_score: 50.0 },
            ],
            large_size_capital: 1_000_000.0,
            large_size_factor: 1.2,
            mid_size_capital: 100_000.0,
            mid_size_factor: 1.1,
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            individual: BudgetRule { minimum: 500.0, multiplier: 1.5, secondary_ratio: 3.0 },
            business: BudgetRule { minimum: 1_000.0, multiplier: 1.5, secondary_ratio: 0.015 },
        }
    }
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            multiple_claims_threshold: 2,
            high_risk_responsibility_rate: 100.0,
            recent_claims_days: 365,
            large_claim_threshold: 5_000.0,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            expiration_alert_days: 30,
            expiration_high_severity_days: 15,
            payment_overdue_days: 7,
            recent_cancellation_days: 90,
            low_premium_threshold: 1_000.0,
            expiry_refresh_days: 15,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { batch_size: 1_000 }
    }
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            premium_products: [
                "ASSURANCE VIE COMPLEMENT RETRAITE - HORIZON+",
                "MULTIRISQUES PROFESSIONNELLES",
                "ASSURANCES EN VOYAGES - PLAN GOLDEN",
                "TOUS RISQUES CHANTIER",
                "ASSURANCE DECES VIE ENTIERE",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            scoring_weights: ProductScoringWeights {
                product_client_fit: 0.30,
                client_value: 0.25,
                profitability: 0.25,
                urgency: 0.20,
            },
            large_business_capital_threshold: 500_000.0,
            budget_gate_threshold: 1_000.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            budget: BudgetConfig::default(),
            claims: ClaimsConfig::default(),
            alerts: AlertConfig::default(),
            batch: BatchConfig::default(),
            products: ProductConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from a TOML file; fields the file omits keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str(&raw)
            .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, blend) in [
            ("scoring.individual_blend", self.scoring.individual_blend),
            ("scoring.business_blend", self.scoring.business_blend),
        ] {
            let sum = blend.loyalty + blend.financial + blend.payment;
            if !(0.99..=1.01).contains(&sum) {
                return Err(ConfigError::Validation(format!(
                    "{name} weights must sum to 1.0, got {sum}"
                )));
            }
        }
        for (name, cuts) in [
            ("scoring.individual_segments", &self.scoring.individual_segments),
            ("scoring.business_segments", &self.scoring.business_segments),
        ] {
            if cuts.windows(2).any(|pair| pair[0].min_score <= pair[1].min_score) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be strictly descending by min_score"
                )));
            }
        }
        if self.scoring.risk_tiers.windows(2).any(|pair| pair[0].min_score <= pair[1].min_score) {
            return Err(ConfigError::Validation(
                "scoring.risk_tiers must be strictly descending by min_score".to_owned(),
            ));
        }
        if self.batch.batch_size == 0 {
            return Err(ConfigError::Validation("batch.batch_size must be at least 1".to_owned()));
        }
        if self.alerts.expiration_alert_days < 0
            || self.alerts.payment_overdue_days < 0
            || self.alerts.recent_cancellation_days < 0
            || self.alerts.expiry_refresh_days < 0
        {
            return Err(ConfigError::Validation("alert windows must be non-negative".to_owned()));
        }
        Ok(())
    }

    pub fn is_premium_product(&self, product: &str) -> bool {
        self.products.premium_products.iter().any(|name| name == product)
    }
}
