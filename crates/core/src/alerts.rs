//! Operational alerts: four independent contract scans plus the persisted
//! nearest-expiry refresh.
//!
//! Scans do not deduplicate across each other; a client may receive several
//! alert rows per run. Only the `contract_expiry` refresh upserts one row
//! per client.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AlertConfig;
use crate::domain::client::ClientRef;
use crate::domain::contract::{ContractRecord, ContractState, PaymentStatus};
use crate::scoring::aggregate_metrics;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Expiry,
    PaymentOverdue,
    RecentCancellation,
    LowCoverage,
    ContractExpiry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    High,
    Medium,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub client_ref: ClientRef,
    pub alert_type: AlertType,
    pub alert_message: String,
    pub alert_severity: AlertSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overdue_days: Option<i64>,
}

/// Stateless scanner over the contract frame.
#[derive(Clone, Debug)]
pub struct AlertGenerator {
    config: AlertConfig,
}

impl AlertGenerator {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    /// Union of the four scans, as of `today`.
    pub fn generate(&self, contracts: &[ContractRecord], today: NaiveDate) -> Vec<Alert> {
        let mut alerts = self.expiration_alerts(contracts, today);
        alerts.extend(self.payment_alerts(contracts, today));
        alerts.extend(self.cancellation_alerts(contracts, today));
        alerts.extend(self.coverage_alerts(contracts));
        info!(
            event_name = "alerts.generated",
            alert_count = alerts.len(),
            contract_count = contracts.len(),
            "alert generation complete"
        );
        alerts
    }

    /// Active contracts expiring inside the alert window. Already-expired
    /// contracts (negative remaining days) are not re-alerted.
    fn expiration_alerts(&self, contracts: &[ContractRecord], today: NaiveDate) -> Vec<Alert> {
        contracts
            .iter()
            .filter(|contract| contract.is_active())
            .filter_map(|contract| {
                let expiration = contract.expiration_date?;
                let remaining = (expiration - today).num_days();
                if !(0..=self.config.expiration_alert_days).contains(&remaining) {
                    return None;
                }
                let severity = if remaining < self.config.expiration_high_severity_days {
                    AlertSeverity::High
                } else {
                    AlertSeverity::Medium
                };
                Some(Alert {
                    client_ref: contract.client_ref.clone(),
                    alert_type: AlertType::Expiry,
                    alert_message: format!(
                        "Policy {} ({}) expires in {} days",
                        contract.contract_id, contract.product, remaining
                    ),
                    alert_severity: severity,
                    contract_id: Some(contract.contract_id.clone()),
                    product: Some(contract.product.clone()),
                    expiration_date: Some(expiration),
                    days_until_expiry: Some(remaining),
                    overdue_days: None,
                })
            })
            .collect()
    }

    fn payment_alerts(&self, contracts: &[ContractRecord], today: NaiveDate) -> Vec<Alert> {
        contracts
            .iter()
            .filter(|contract| {
                contract.is_active() && contract.payment == PaymentStatus::Unpaid
            })
            .filter_map(|contract| {
                let next_term = contract.next_installment?;
                let overdue = (today - next_term).num_days();
                if overdue < self.config.payment_overdue_days {
                    return None;
                }
                Some(Alert {
                    client_ref: contract.client_ref.clone(),
                    alert_type: AlertType::PaymentOverdue,
                    alert_message: format!(
                        "Payment overdue for policy {} ({}) by {} days",
                        contract.contract_id, contract.product, overdue
                    ),
                    alert_severity: AlertSeverity::High,
                    contract_id: Some(contract.contract_id.clone()),
                    product: Some(contract.product.clone()),
                    expiration_date: None,
                    days_until_expiry: None,
                    overdue_days: Some(overdue),
                })
            })
            .collect()
    }

    /// Cancelled contracts whose expiration date (standing in for the
    /// cancellation date) falls inside the recency window.
    fn cancellation_alerts(&self, contracts: &[ContractRecord], today: NaiveDate) -> Vec<Alert> {
        let window = self.config.recent_cancellation_days.max(0) as u64;
        let cutoff = today.checked_sub_days(Days::new(window)).unwrap_or(NaiveDate::MIN);
        contracts
            .iter()
            .filter(|contract| contract.state == ContractState::Cancelled)
            .filter_map(|contract| {
                let cancelled_on = contract.expiration_date?;
                if cancelled_on < cutoff {
                    return None;
                }
                Some(Alert {
                    client_ref: contract.client_ref.clone(),
                    alert_type: AlertType::RecentCancellation,
                    alert_message: format!(
                        "Policy {} ({}) was recently cancelled",
                        contract.contract_id, contract.product
                    ),
                    alert_severity: AlertSeverity::Medium,
                    contract_id: Some(contract.contract_id.clone()),
                    product: Some(contract.product.clone()),
                    expiration_date: Some(cancelled_on),
                    days_until_expiry: None,
                    overdue_days: None,
                })
            })
            .collect()
    }

    /// Clients with at most one active contract and a total premium under
    /// the low-premium threshold.
    fn coverage_alerts(&self, contracts: &[ContractRecord]) -> Vec<Alert> {
        aggregate_metrics(contracts)
            .into_iter()
            .filter(|(_, metrics)| {
                metrics.active_contracts <= 1
                    && metrics.total_premiums_paid < self.config.low_premium_threshold
            })
            .map(|(client_ref, metrics)| Alert {
                client_ref,
                alert_type: AlertType::LowCoverage,
                alert_message: format!(
                    "Client has only {} active policy with low premium coverage",
                    metrics.active_contracts
                ),
                alert_severity: AlertSeverity::Medium,
                contract_id: None,
                product: None,
                expiration_date: None,
                days_until_expiry: None,
                overdue_days: None,
            })
            .collect()
    }
}

/// Persisted nearest-expiry alerts, one row per client, upsert-keyed by
/// client reference. Shared across refresh runs; last writer wins.
#[derive(Clone, Debug, Default)]
pub struct AlertStore {
    entries: BTreeMap<ClientRef, Alert>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, client_ref: &ClientRef) -> Option<&Alert> {
        self.entries.get(client_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.entries.values()
    }

    /// Refresh `contract_expiry` rows from active contracts expiring within
    /// the refresh horizon. For each client the nearest-expiring contract
    /// wins; clients with nothing in the horizon keep any prior row.
    pub fn refresh_contract_expiry(
        &mut self,
        contracts: &[ContractRecord],
        today: NaiveDate,
        config: &AlertConfig,
    ) -> usize {
        let horizon = today
            .checked_add_days(Days::new(config.expiry_refresh_days.max(0) as u64))
            .unwrap_or(NaiveDate::MAX);
        let mut best: BTreeMap<ClientRef, &ContractRecord> = BTreeMap::new();
        for contract in contracts {
            let Some(expiration) = contract.expiration_date else { continue };
            if !contract.is_active() || expiration <= today || expiration > horizon {
                continue;
            }
            best.entry(contract.client_ref.clone())
                .and_modify(|current| {
                    // Both sides are in the horizon, so expiration is Some.
                    if expiration < current.expiration_date.unwrap_or(NaiveDate::MAX) {
                        *current = contract;
                    }
                })
                .or_insert(contract);
        }

        let mut upserts = 0;
        for (client_ref, contract) in best {
            let expiration = contract.expiration_date.unwrap_or(NaiveDate::MAX);
            let remaining = (expiration - today).num_days();
            let alert = Alert {
                client_ref: client_ref.clone(),
                alert_type: AlertType::ContractExpiry,
                alert_message: format!(
                    "Contract {} ({}) expires in {} days",
                    contract.contract_id, contract.product, remaining
                ),
                // Persisted rows are always High: anything close enough to
                // land in the refresh horizon needs operator attention.
                alert_severity: AlertSeverity::High,
                contract_id: Some(contract.contract_id.clone()),
                product: Some(contract.product.clone()),
                expiration_date: Some(expiration),
                days_until_expiry: Some(remaining),
                overdue_days: None,
            };
            self.entries.insert(client_ref, alert);
            upserts += 1;
        }
        info!(
            event_name = "alerts.expiry_refresh",
            upserted = upserts,
            store_size = self.entries.len(),
            "nearest-expiry refresh complete"
        );
        upserts
    }
}
