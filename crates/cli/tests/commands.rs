//! Command-level tests over temp CSV fixtures.

use std::fs;
use std::path::Path;

use clap::CommandFactory;
use courtage_cli::commands::{self, recommend::RecommendArgs};
use courtage_cli::{Cli, CommonArgs};

fn write_fixtures(dir: &Path) {
    fs::write(
        dir.join("contracts.csv"),
        "REF_PERSONNE,NUM_CONTRAT,LIB_PRODUIT,branche,LIB_ETAT_CONTRAT,statut_paiement,somme_quittances,Capital_assure,EFFET_CONTRAT,DATE_EXPIRATION,PROCHAIN_TERME\n\
         IND-1,C-11,AUTOMOBILE,AUTOMOBILE,EN COURS,Payé,4000,48000,2020-01-01,2026-01-01,\n\
         IND-2,C-21,AUTOMOBILE,AUTOMOBILE,EN COURS,Payé,300,3600,2024-01-01,2026-01-01,\n\
         BUS-1,C-31,RESPONSABILITE CIVILE ENTREPRISE,RC,EN COURS,Payé,30000,360000,2021-01-01,2026-01-01,\n",
    )
    .unwrap();
    fs::write(
        dir.join("individuals.csv"),
        "REF_PERSONNE,NOM_PRENOM,AGE,SITUATION_FAMILIALE,PROFESSION_GROUP,SECTEUR_ACTIVITE_GROUP\n\
         IND-1,Awa Diallo,42,MARIE,ADMINISTRATION_ET_BUREAU,AUTRE\n\
         IND-2,Moussa Traore,28,CELIBATAIRE,COMMERCE_ET_VENTE,AUTRE\n",
    )
    .unwrap();
    fs::write(
        dir.join("businesses.csv"),
        "REF_PERSONNE,RAISON_SOCIALE,SECTEUR_GROUP,ACTIVITE_GROUP,RISK_PROFILE,total_capital_assured,total_premiums_paid\n\
         BUS-1,Atlantique Transit,TRANSPORTS_ET_LOGISTIQUE,TRANSPORT,HIGH_RISK,600000,30000\n",
    )
    .unwrap();
    fs::write(
        dir.join("products.csv"),
        "LIB_PRODUIT,LIB_SOUS_BRANCHE,LIB_BRANCHE\n\
         SANTE ET PREVOYANCE,MALADIE,SANTE\n\
         INDIVIDUELLE ACCIDENTS,INDIVIDUELLE ACCIDENTS,IARD\n\
         TEMPORAIRE DECES,DECES,VIE\n\
         AUTOMOBILE,AUTOMOBILE,AUTOMOBILE\n\
         RESPONSABILITE CIVILE ENTREPRISE,RESPONSABILITE CIVILE,RC\n\
         INCENDIE SIMPLE,INCENDIE RISQUES SIMPLE,INCENDIE\n",
    )
    .unwrap();
}

fn common() -> CommonArgs {
    CommonArgs {
        config: None,
        as_of: Some(chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn score_command_writes_a_scored_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let output = dir.path().join("scored.jsonl");

    let result = commands::score::run(
        &dir.path().join("contracts.csv"),
        &dir.path().join("individuals.csv"),
        &dir.path().join("businesses.csv"),
        &output,
        &common(),
    );
    assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);
    assert!(result.output.contains("\"status\":\"ok\""));
    assert!(result.output.contains("scored 3 clients"));

    let snapshot = fs::read_to_string(&output).unwrap();
    assert_eq!(snapshot.lines().count(), 3);
}

#[test]
fn recommend_command_consumes_a_scored_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let scored = dir.path().join("scored.jsonl");
    commands::score::run(
        &dir.path().join("contracts.csv"),
        &dir.path().join("individuals.csv"),
        &dir.path().join("businesses.csv"),
        &scored,
        &common(),
    );

    let output = dir.path().join("recommendations.jsonl");
    let alerts_output = dir.path().join("alerts.jsonl");
    let result = commands::recommend::run(RecommendArgs {
        scored: Some(scored),
        contracts: dir.path().join("contracts.csv"),
        individuals: None,
        businesses: None,
        products: dir.path().join("products.csv"),
        claims: None,
        output: output.clone(),
        alerts_output: Some(alerts_output.clone()),
        common: common(),
    });
    assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);

    let rows = fs::read_to_string(&output).unwrap();
    assert_eq!(rows.lines().count(), 3);
    assert!(alerts_output.exists());
}

#[test]
fn recommend_without_scored_snapshot_scores_first() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let output = dir.path().join("recommendations.jsonl");
    let result = commands::recommend::run(RecommendArgs {
        scored: None,
        contracts: dir.path().join("contracts.csv"),
        individuals: Some(dir.path().join("individuals.csv")),
        businesses: Some(dir.path().join("businesses.csv")),
        products: dir.path().join("products.csv"),
        claims: None,
        output: output.clone(),
        alerts_output: None,
        common: common(),
    });
    assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);
    assert!(output.exists());
}

#[test]
fn alerts_command_reports_low_coverage() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let output = dir.path().join("alerts.jsonl");
    let result =
        commands::alerts::run(&dir.path().join("contracts.csv"), &output, &common());
    assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);

    let rows = fs::read_to_string(&output).unwrap();
    // IND-2 holds a single low-premium active contract.
    assert!(rows.contains("low_coverage"));
    assert!(rows.contains("IND-2"));
}

#[test]
fn missing_input_file_fails_with_pipeline_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::score::run(
        &dir.path().join("absent.csv"),
        &dir.path().join("absent.csv"),
        &dir.path().join("absent.csv"),
        &dir.path().join("out.jsonl"),
        &common(),
    );
    assert_eq!(result.exit_code, 1);
    assert!(result.output.contains("\"status\":\"error\""));
}
