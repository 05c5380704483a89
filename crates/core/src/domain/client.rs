use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique client reference (`REF_PERSONNE` upstream). Shared by individual
/// and business populations; uniqueness is enforced by ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientRef(pub String);

impl ClientRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Individual,
    Business,
}

/// Individual client profile, already category-grouped upstream
/// (`PROFESSION_GROUP` / `SECTEUR_ACTIVITE_GROUP` are closed sets).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndividualProfile {
    pub client_ref: ClientRef,
    pub full_name: String,
    pub age: Option<u32>,
    pub family_situation: String,
    pub profession_group: String,
    pub sector_group: String,
}

/// Declared risk marker on business records, set by upstream underwriting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessRiskProfile {
    #[serde(rename = "HIGH_RISK")]
    High,
    #[serde(rename = "MEDIUM_RISK")]
    Medium,
    #[serde(rename = "LOW_RISK")]
    Low,
}

impl BusinessRiskProfile {
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "HIGH_RISK" => Some(Self::High),
            "MEDIUM_RISK" => Some(Self::Medium),
            "LOW_RISK" => Some(Self::Low),
            _ => None,
        }
    }

    /// Multiplier applied to the final business score.
    pub fn score_factor(self) -> f64 {
        match self {
            Self::High => 0.9,
            Self::Medium => 1.0,
            Self::Low => 1.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub client_ref: ClientRef,
    pub company_name: String,
    pub sector_group: String,
    pub activity_group: String,
    pub risk_profile: Option<BusinessRiskProfile>,
    pub total_capital_assured: f64,
    pub total_premiums_paid: f64,
}

/// Client attributes the recommendation engine branches on, carried on the
/// scored record so downstream passes need no profile re-join.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "client_type", rename_all = "lowercase")]
pub enum ClientProfile {
    Individual(IndividualProfile),
    Business(BusinessProfile),
}

impl ClientProfile {
    pub fn client_ref(&self) -> &ClientRef {
        match self {
            Self::Individual(profile) => &profile.client_ref,
            Self::Business(profile) => &profile.client_ref,
        }
    }

    pub fn client_type(&self) -> ClientType {
        match self {
            Self::Individual(_) => ClientType::Individual,
            Self::Business(_) => ClientType::Business,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Individual(profile) => &profile.full_name,
            Self::Business(profile) => &profile.company_name,
        }
    }
}
