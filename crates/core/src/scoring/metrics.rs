use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::client::ClientRef;
use crate::domain::contract::{ContractRecord, ContractState, PaymentStatus};

/// Per-client aggregates over the contract frame. A client with no
/// contracts carries the zero default for every field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientMetrics {
    pub total_contracts: u32,
    pub active_contracts: u32,
    pub product_variety: u32,
    pub branch_variety: u32,
    pub total_premiums_paid: f64,
    pub avg_premium_per_contract: f64,
    pub max_premium: f64,
    pub total_capital_assured: f64,
    pub avg_capital_per_contract: f64,
    pub total_paid_contracts: u32,
    pub total_unpaid_contracts: u32,
    pub expired_contracts: u32,
    pub cancelled_contracts: u32,
    pub paid_ratio: f64,
    pub active_ratio: f64,
}

impl ClientMetrics {
    pub fn from_contracts(contracts: &[&ContractRecord]) -> Self {
        if contracts.is_empty() {
            return Self::default();
        }
        let total = contracts.len() as u32;
        let mut products = HashSet::new();
        let mut branches = HashSet::new();
        let mut metrics = Self { total_contracts: total, ..Self::default() };
        for contract in contracts {
            products.insert(contract.product.as_str());
            branches.insert(contract.branch.as_str());
            metrics.total_premiums_paid += contract.premium;
            metrics.max_premium = metrics.max_premium.max(contract.premium);
            metrics.total_capital_assured += contract.insured_capital;
            match contract.state {
                ContractState::Active => metrics.active_contracts += 1,
                ContractState::Expired => metrics.expired_contracts += 1,
                ContractState::Cancelled => metrics.cancelled_contracts += 1,
                ContractState::Other => {}
            }
            match contract.payment {
                PaymentStatus::Paid => metrics.total_paid_contracts += 1,
                PaymentStatus::Unpaid => metrics.total_unpaid_contracts += 1,
                PaymentStatus::Other => {}
            }
        }
        metrics.product_variety = products.len() as u32;
        metrics.branch_variety = branches.len() as u32;
        let denom = f64::from(total);
        metrics.avg_premium_per_contract = metrics.total_premiums_paid / denom;
        metrics.avg_capital_per_contract = metrics.total_capital_assured / denom;
        metrics.paid_ratio = f64::from(metrics.total_paid_contracts) / denom;
        metrics.active_ratio = f64::from(metrics.active_contracts) / denom;
        metrics
    }
}

/// Group the contract frame by client. The map is ordered so every
/// population-level pass (maxima, normalization) is deterministic.
pub fn aggregate_metrics(contracts: &[ContractRecord]) -> BTreeMap<ClientRef, ClientMetrics> {
    let mut grouped: BTreeMap<ClientRef, Vec<&ContractRecord>> = BTreeMap::new();
    for contract in contracts {
        grouped.entry(contract.client_ref.clone()).or_default().push(contract);
    }
    grouped
        .into_iter()
        .map(|(client_ref, slice)| (client_ref, ClientMetrics::from_contracts(&slice)))
        .collect()
}
