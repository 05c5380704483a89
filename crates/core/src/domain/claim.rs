use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::client::ClientRef;

/// One claim row (`sinistre`). Belongs to a contract and transitively to a
/// client; responsibility rate is a 0–100 percentage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub client_ref: ClientRef,
    pub contract_id: String,
    pub category: String,
    pub responsibility_rate: f64,
    pub amount_collected: f64,
    pub occurred_on: Option<NaiveDate>,
}
