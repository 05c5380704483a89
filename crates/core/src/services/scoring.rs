use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::config::PipelineConfig;
use crate::domain::client::{BusinessProfile, ClientType, IndividualProfile};
use crate::domain::contract::ContractRecord;
use crate::errors::PipelineError;
use crate::scoring::{score_businesses, score_individuals, ScoredClient};

/// Runs both scoring engines over their own contract partitions and owns
/// the scored-client snapshot.
///
/// Normalization maxima are computed per client type: an individual's
/// premium history is never ranked against a corporate account's.
pub struct ScoringService {
    config: PipelineConfig,
    scored: Vec<ScoredClient>,
}

impl ScoringService {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, scored: Vec::new() }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Score every profiled client. Contracts belonging to neither
    /// population are dropped; profiled clients without contracts still
    /// come out scored (at zero).
    pub fn score_all_clients(
        &mut self,
        contracts: &[ContractRecord],
        individuals: &[IndividualProfile],
        businesses: &[BusinessProfile],
    ) -> &[ScoredClient] {
        let individual_refs: HashSet<&str> =
            individuals.iter().map(|profile| profile.client_ref.as_str()).collect();
        let business_refs: HashSet<&str> =
            businesses.iter().map(|profile| profile.client_ref.as_str()).collect();

        let individual_contracts: Vec<ContractRecord> = contracts
            .iter()
            .filter(|contract| individual_refs.contains(contract.client_ref.as_str()))
            .cloned()
            .collect();
        let business_contracts: Vec<ContractRecord> = contracts
            .iter()
            .filter(|contract| business_refs.contains(contract.client_ref.as_str()))
            .cloned()
            .collect();
        let orphaned = contracts.len() - individual_contracts.len() - business_contracts.len();

        let mut scored = score_individuals(&individual_contracts, individuals, &self.config);
        scored.extend(score_businesses(&business_contracts, businesses, &self.config));
        info!(
            event_name = "scoring.completed",
            individual_count = individuals.len(),
            business_count = businesses.len(),
            orphaned_contracts = orphaned,
            "client scoring complete"
        );
        self.scored = scored;
        &self.scored
    }

    pub fn scored_clients(&self) -> &[ScoredClient] {
        &self.scored
    }

    pub fn scored_of_type(&self, client_type: ClientType) -> Vec<&ScoredClient> {
        self.scored.iter().filter(|scored| scored.client_type() == client_type).collect()
    }

    pub fn find(&self, client_ref: &str) -> Option<&ScoredClient> {
        self.scored.iter().find(|scored| scored.client_ref.as_str() == client_ref)
    }

    pub fn save_snapshot(&self, path: &Path) -> Result<(), PipelineError> {
        super::save_jsonl(path, &self.scored)?;
        info!(
            event_name = "scoring.snapshot_saved",
            path = %path.display(),
            record_count = self.scored.len(),
            "scored clients persisted"
        );
        Ok(())
    }

    pub fn load_snapshot(&mut self, path: &Path) -> Result<&[ScoredClient], PipelineError> {
        self.scored = super::load_jsonl(path)?;
        info!(
            event_name = "scoring.snapshot_loaded",
            path = %path.display(),
            record_count = self.scored.len(),
            "scored clients restored"
        );
        Ok(&self.scored)
    }
}
