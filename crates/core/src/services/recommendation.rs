use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::alerts::{Alert, AlertGenerator, AlertStore};
use crate::batch::BatchProcessor;
use crate::config::PipelineConfig;
use crate::domain::claim::ClaimRecord;
use crate::domain::client::ClientType;
use crate::domain::contract::ContractRecord;
use crate::domain::product::ProductCatalog;
use crate::errors::PipelineError;
use crate::recommend::{estimate_budget, recommend_business, recommend_individual, Recommendation};
use crate::scoring::ScoredClient;

/// One pipeline run's output: ranked product proposals plus the alert scan.
#[derive(Clone, Debug, Default)]
pub struct RecommendationOutput {
    pub recommendations: Vec<Recommendation>,
    pub alerts: Vec<Alert>,
}

/// Drives the per-client recommendation engines over the scored population
/// in resumable batches, then runs the alert scans.
pub struct RecommendationService {
    config: PipelineConfig,
    processor: BatchProcessor,
    alert_generator: AlertGenerator,
    alert_store: AlertStore,
    output: RecommendationOutput,
}

impl RecommendationService {
    pub fn new(config: PipelineConfig) -> Self {
        let processor = BatchProcessor::new(&config.batch);
        let alert_generator = AlertGenerator::new(config.alerts.clone());
        Self {
            config,
            processor,
            alert_generator,
            alert_store: AlertStore::new(),
            output: RecommendationOutput::default(),
        }
    }

    /// Recommend for every scored client, dispatching each to the engine
    /// matching its type. A failed batch aborts the run; calling again
    /// resumes past the clients already covered.
    pub fn generate_for_all(
        &mut self,
        scored: &[ScoredClient],
        contracts: &[ContractRecord],
        catalog: &ProductCatalog,
        claims: Option<&[ClaimRecord]>,
        today: NaiveDate,
    ) -> Result<&[Recommendation], PipelineError> {
        let config = &self.config;
        let recommendations = self.processor.run(scored, |chunk| {
            let mut batch_output = Vec::with_capacity(chunk.len());
            for client in chunk {
                let products = match client.client_type() {
                    ClientType::Individual => {
                        recommend_individual(client, contracts, catalog, claims, today, config)?
                    }
                    ClientType::Business => {
                        recommend_business(client, contracts, catalog, claims, config)?
                    }
                };
                batch_output.push(Recommendation {
                    client_ref: client.client_ref.clone(),
                    display_name: client.display_name().to_owned(),
                    recommendation_count: products.len(),
                    recommended_products: products,
                    client_score: client.final_score,
                    client_segment: client.segment,
                    risk_tier: client.risk_tier,
                    estimated_budget: estimate_budget(client, &config.budget),
                    client_type: client.client_type(),
                });
            }
            Ok(batch_output)
        })?;
        info!(
            event_name = "recommendation.completed",
            client_count = recommendations.len(),
            with_products =
                recommendations.iter().filter(|rec| rec.recommendation_count > 0).count(),
            "recommendation run complete"
        );
        self.output.recommendations = recommendations;
        Ok(&self.output.recommendations)
    }

    /// Run the four alert scans and refresh the persisted nearest-expiry
    /// rows.
    pub fn generate_alerts(&mut self, contracts: &[ContractRecord], today: NaiveDate) -> &[Alert] {
        self.output.alerts = self.alert_generator.generate(contracts, today);
        self.alert_store.refresh_contract_expiry(contracts, today, &self.config.alerts);
        &self.output.alerts
    }

    pub fn output(&self) -> &RecommendationOutput {
        &self.output
    }

    pub fn alert_store(&self) -> &AlertStore {
        &self.alert_store
    }

    pub fn save_recommendations(&self, path: &Path) -> Result<(), PipelineError> {
        super::save_jsonl(path, &self.output.recommendations)?;
        info!(
            event_name = "recommendation.snapshot_saved",
            path = %path.display(),
            record_count = self.output.recommendations.len(),
            "recommendations persisted"
        );
        Ok(())
    }

    pub fn save_alerts(&self, path: &Path) -> Result<(), PipelineError> {
        super::save_jsonl(path, &self.output.alerts)?;
        info!(
            event_name = "recommendation.alerts_saved",
            path = %path.display(),
            record_count = self.output.alerts.len(),
            "alerts persisted"
        );
        Ok(())
    }

    pub fn load_recommendations(
        &mut self,
        path: &Path,
    ) -> Result<&[Recommendation], PipelineError> {
        self.output.recommendations = super::load_jsonl(path)?;
        Ok(&self.output.recommendations)
    }
}
