//! CSV snapshot loaders.
//!
//! Input files keep the upstream extract's French column headers. Dates
//! come in several formats depending on which system exported the file;
//! unparseable dates are treated as absent rather than failing the load.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;

use courtage_core::{
    BusinessProfile, BusinessRiskProfile, ClaimRecord, ClientRef, ContractRecord, ContractState,
    IndividualProfile, PaymentStatus, ProductCatalog, ProductRecord,
};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Lenient date parsing across the known export formats. Timestamps are
/// accepted by dropping the time part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

#[derive(Debug, Deserialize)]
struct ContractRow {
    #[serde(rename = "REF_PERSONNE")]
    client_ref: String,
    #[serde(rename = "NUM_CONTRAT")]
    contract_id: String,
    #[serde(rename = "LIB_PRODUIT")]
    product: String,
    #[serde(rename = "branche", alias = "LIB_BRANCHE")]
    branch: String,
    #[serde(rename = "LIB_ETAT_CONTRAT", default)]
    state: String,
    #[serde(rename = "statut_paiement", default)]
    payment: String,
    #[serde(rename = "somme_quittances", default)]
    premium: f64,
    #[serde(rename = "Capital_assure", default)]
    insured_capital: f64,
    #[serde(rename = "EFFET_CONTRAT", default)]
    effective_date: String,
    #[serde(rename = "DATE_EXPIRATION", default)]
    expiration_date: String,
    #[serde(rename = "PROCHAIN_TERME", default)]
    next_installment: String,
}

pub fn load_contracts(path: &Path) -> anyhow::Result<Vec<ContractRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("could not open contracts file `{}`", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: ContractRow = row
            .with_context(|| format!("malformed contract row in `{}`", path.display()))?;
        records.push(ContractRecord {
            client_ref: ClientRef::new(row.client_ref.trim()),
            contract_id: row.contract_id.trim().to_owned(),
            product: row.product.trim().to_owned(),
            branch: row.branch.trim().to_owned(),
            state: ContractState::parse(&row.state),
            payment: PaymentStatus::parse(&row.payment),
            premium: row.premium,
            insured_capital: row.insured_capital,
            effective_date: parse_date(&row.effective_date),
            expiration_date: parse_date(&row.expiration_date),
            next_installment: parse_date(&row.next_installment),
        });
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct IndividualRow {
    #[serde(rename = "REF_PERSONNE")]
    client_ref: String,
    #[serde(rename = "NOM_PRENOM", default)]
    full_name: String,
    #[serde(rename = "AGE", default)]
    age: Option<u32>,
    #[serde(rename = "SITUATION_FAMILIALE", default)]
    family_situation: String,
    #[serde(rename = "PROFESSION_GROUP", default)]
    profession_group: String,
    #[serde(rename = "SECTEUR_ACTIVITE_GROUP", default)]
    sector_group: String,
}

pub fn load_individuals(path: &Path) -> anyhow::Result<Vec<IndividualProfile>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("could not open clients file `{}`", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: IndividualRow =
            row.with_context(|| format!("malformed client row in `{}`", path.display()))?;
        records.push(IndividualProfile {
            client_ref: ClientRef::new(row.client_ref.trim()),
            full_name: row.full_name.trim().to_owned(),
            age: row.age,
            family_situation: row.family_situation.trim().to_owned(),
            profession_group: row.profession_group.trim().to_owned(),
            sector_group: row.sector_group.trim().to_owned(),
        });
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct BusinessRow {
    #[serde(rename = "REF_PERSONNE")]
    client_ref: String,
    #[serde(rename = "RAISON_SOCIALE", default)]
    company_name: String,
    #[serde(rename = "SECTEUR_GROUP", default)]
    sector_group: String,
    #[serde(rename = "ACTIVITE_GROUP", default)]
    activity_group: String,
    #[serde(rename = "RISK_PROFILE", default)]
    risk_profile: String,
    #[serde(rename = "total_capital_assured", default)]
    total_capital_assured: f64,
    #[serde(rename = "total_premiums_paid", default)]
    total_premiums_paid: f64,
}

pub fn load_businesses(path: &Path) -> anyhow::Result<Vec<BusinessProfile>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("could not open businesses file `{}`", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: BusinessRow =
            row.with_context(|| format!("malformed business row in `{}`", path.display()))?;
        records.push(BusinessProfile {
            client_ref: ClientRef::new(row.client_ref.trim()),
            company_name: row.company_name.trim().to_owned(),
            sector_group: row.sector_group.trim().to_owned(),
            activity_group: row.activity_group.trim().to_owned(),
            risk_profile: BusinessRiskProfile::parse(row.risk_profile.trim()),
            total_capital_assured: row.total_capital_assured,
            total_premiums_paid: row.total_premiums_paid,
        });
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(rename = "LIB_PRODUIT")]
    product: String,
    #[serde(rename = "LIB_SOUS_BRANCHE", default)]
    sub_branch: String,
    #[serde(rename = "LIB_BRANCHE", default)]
    branch: String,
}

pub fn load_products(path: &Path) -> anyhow::Result<ProductCatalog> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("could not open products file `{}`", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: ProductRow =
            row.with_context(|| format!("malformed product row in `{}`", path.display()))?;
        records.push(ProductRecord {
            product: row.product.trim().to_owned(),
            sub_branch: row.sub_branch.trim().to_owned(),
            branch: row.branch.trim().to_owned(),
        });
    }
    Ok(ProductCatalog::new(records))
}

#[derive(Debug, Deserialize)]
struct ClaimRow {
    #[serde(rename = "REF_PERSONNE")]
    client_ref: String,
    #[serde(rename = "NUM_CONTRAT", default)]
    contract_id: String,
    #[serde(rename = "LIB_SOUS_BRANCHE", default)]
    category: String,
    #[serde(rename = "TAUX_RESPONSABILITE", default)]
    responsibility_rate: f64,
    #[serde(rename = "MONTANT_ENCAISSE", default)]
    amount_collected: f64,
    #[serde(rename = "DATE_SURVENANCE", default)]
    occurred_on: String,
}

pub fn load_claims(path: &Path) -> anyhow::Result<Vec<ClaimRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("could not open claims file `{}`", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: ClaimRow =
            row.with_context(|| format!("malformed claim row in `{}`", path.display()))?;
        records.push(ClaimRecord {
            client_ref: ClientRef::new(row.client_ref.trim()),
            contract_id: row.contract_id.trim().to_owned(),
            category: row.category.trim().to_owned(),
            responsibility_rate: row.responsibility_rate,
            amount_collected: row.amount_collected,
            occurred_on: parse_date(&row.occurred_on),
        });
    }
    Ok(records)
}
