//! Client scoring and product recommendation engine for insurance
//! portfolios.
//!
//! The pipeline runs in three passes over cleaned portfolio extracts:
//! multi-factor scoring with population-relative normalization, a
//! rule-driven recommendation engine capped at three proposals per client,
//! and operational alert scans. [`services`] ties the passes together and
//! persists their snapshots.

pub mod alerts;
pub mod batch;
pub mod claims;
pub mod config;
pub mod domain;
pub mod errors;
pub mod recommend;
pub mod scoring;
pub mod services;

pub use alerts::{Alert, AlertGenerator, AlertSeverity, AlertStore, AlertType};
pub use batch::{BatchProcessor, ClientKeyed};
pub use claims::{analyze_claims, ClaimsAnalysis, ClaimsTrend};
pub use config::{ConfigError, PipelineConfig};
pub use domain::claim::ClaimRecord;
pub use domain::client::{
    BusinessProfile, BusinessRiskProfile, ClientProfile, ClientRef, ClientType, IndividualProfile,
};
pub use domain::contract::{ContractRecord, ContractState, PaymentStatus};
pub use domain::product::{ProductCatalog, ProductRecord};
pub use errors::{DomainError, PipelineError};
pub use recommend::{
    recommend_business, recommend_individual, Recommendation, RecommendedProduct,
};
pub use scoring::{
    aggregate_metrics, score_businesses, score_individuals, ClientMetrics, RiskTier, ScoredClient,
    Segment,
};
pub use services::{RecommendationOutput, RecommendationService, ScoringService};
