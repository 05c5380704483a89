use std::path::Path;

use anyhow::Context;
use courtage_core::{PipelineConfig, ScoringService};

use crate::input;
use crate::CommonArgs;

use super::CommandResult;

pub fn run(
    contracts: &Path,
    individuals: &Path,
    businesses: &Path,
    output: &Path,
    common: &CommonArgs,
) -> CommandResult {
    CommandResult::from_run("score", execute(contracts, individuals, businesses, output, common))
}

fn execute(
    contracts: &Path,
    individuals: &Path,
    businesses: &Path,
    output: &Path,
    common: &CommonArgs,
) -> anyhow::Result<String> {
    let config = load_config(common)?;
    let contracts = input::load_contracts(contracts)?;
    let individuals = input::load_individuals(individuals)?;
    let businesses = input::load_businesses(businesses)?;

    let mut service = ScoringService::new(config);
    let scored = service.score_all_clients(&contracts, &individuals, &businesses);
    let count = scored.len();
    service.save_snapshot(output)?;
    Ok(format!("scored {count} clients into `{}`", output.display()))
}

pub(super) fn load_config(common: &CommonArgs) -> anyhow::Result<PipelineConfig> {
    match &common.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("could not load config `{}`", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}
