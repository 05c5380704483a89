use std::path::Path;

use courtage_core::RecommendationService;

use crate::input;
use crate::CommonArgs;

use super::recommend::current_date;
use super::score::load_config;
use super::CommandResult;

pub fn run(contracts: &Path, output: &Path, common: &CommonArgs) -> CommandResult {
    CommandResult::from_run("alerts", execute(contracts, output, common))
}

fn execute(contracts: &Path, output: &Path, common: &CommonArgs) -> anyhow::Result<String> {
    let config = load_config(common)?;
    let today = common.as_of.unwrap_or_else(current_date);
    let contracts = input::load_contracts(contracts)?;

    let mut service = RecommendationService::new(config);
    let count = service.generate_alerts(&contracts, today).len();
    service.save_alerts(output)?;
    Ok(format!("generated {count} alerts into `{}`", output.display()))
}
