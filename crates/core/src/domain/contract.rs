use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::client::ClientRef;

/// Contract lifecycle state parsed from the upstream `LIB_ETAT_CONTRAT`
/// label. Unmapped labels land in `Other` rather than erroring; cleaning
/// owns label hygiene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractState {
    Active,
    Expired,
    Cancelled,
    Other,
}

impl ContractState {
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "EN COURS" => Self::Active,
            "EXPIRE" => Self::Expired,
            "RESILIE" => Self::Cancelled,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Other,
}

impl PaymentStatus {
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Payé" => Self::Paid,
            "Non payé" => Self::Unpaid,
            _ => Self::Other,
        }
    }
}

/// One insurance contract row. Date ordering (effective ≤ expiration) is
/// corrected upstream; absent dates exclude the row from date-based rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub client_ref: ClientRef,
    pub contract_id: String,
    pub product: String,
    pub branch: String,
    pub state: ContractState,
    pub payment: PaymentStatus,
    pub premium: f64,
    pub insured_capital: f64,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub next_installment: Option<NaiveDate>,
}

impl ContractRecord {
    pub fn is_active(&self) -> bool {
        self.state == ContractState::Active
    }
}
