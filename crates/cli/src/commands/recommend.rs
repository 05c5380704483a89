use std::path::PathBuf;

use anyhow::bail;
use chrono::NaiveDate;
use courtage_core::{RecommendationService, ScoringService};

use crate::input;
use crate::CommonArgs;

use super::score::load_config;
use super::CommandResult;

#[derive(Debug)]
pub struct RecommendArgs {
    pub scored: Option<PathBuf>,
    pub contracts: PathBuf,
    pub individuals: Option<PathBuf>,
    pub businesses: Option<PathBuf>,
    pub products: PathBuf,
    pub claims: Option<PathBuf>,
    pub output: PathBuf,
    pub alerts_output: Option<PathBuf>,
    pub common: CommonArgs,
}

pub fn run(args: RecommendArgs) -> CommandResult {
    CommandResult::from_run("recommend", execute(args))
}

fn execute(args: RecommendArgs) -> anyhow::Result<String> {
    let config = load_config(&args.common)?;
    let today = args.common.as_of.unwrap_or_else(current_date);

    let contracts = input::load_contracts(&args.contracts)?;
    let catalog = input::load_products(&args.products)?;
    let claims = args.claims.as_deref().map(input::load_claims).transpose()?;

    let mut scoring = ScoringService::new(config.clone());
    match &args.scored {
        Some(path) => {
            scoring.load_snapshot(path)?;
        }
        None => {
            let (Some(individuals), Some(businesses)) = (&args.individuals, &args.businesses)
            else {
                bail!("either --scored or both --individuals and --businesses are required");
            };
            let individuals = input::load_individuals(individuals)?;
            let businesses = input::load_businesses(businesses)?;
            scoring.score_all_clients(&contracts, &individuals, &businesses);
        }
    }

    let mut recommender = RecommendationService::new(config);
    let recommendations = recommender.generate_for_all(
        scoring.scored_clients(),
        &contracts,
        &catalog,
        claims.as_deref(),
        today,
    )?;
    let client_count = recommendations.len();
    let product_count: usize =
        recommendations.iter().map(|row| row.recommendation_count).sum();
    recommender.save_recommendations(&args.output)?;

    let mut message = format!(
        "recommended {product_count} products across {client_count} clients into `{}`",
        args.output.display()
    );
    if let Some(alerts_path) = &args.alerts_output {
        let alert_count = recommender.generate_alerts(&contracts, today).len();
        recommender.save_alerts(alerts_path)?;
        message.push_str(&format!(
            "; {alert_count} alerts into `{}`",
            alerts_path.display()
        ));
    }
    Ok(message)
}

pub(super) fn current_date() -> NaiveDate {
    chrono::Local::now().date_naive()
}
