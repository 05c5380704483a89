//! Category → preferred-product priority tables and claims cross-sell
//! tables. Product names follow the upstream catalog verbatim.

use std::collections::HashSet;

use crate::domain::product::ProductCatalog;

pub(super) const INDIVIDUAL_CATEGORY_PRIORITY: &[(&str, &[&str])] = &[
    ("DECES", &["ASSURANCE DECES VIE ENTIERE", "TEMPORAIRE DECES"]),
    ("MALADIE", &["SANTE ET PREVOYANCE"]),
    ("INDIVIDUELLE ACCIDENTS", &["INDIVIDUELLE ACCIDENTS"]),
    ("VIE", &["ASSURANCE MIXTE VIE", "MIXTE REVALORISABLE (AS)"]),
    (
        "CAPITALISATION",
        &[
            "ASSURANCE VIE COMPLEMENT RETRAITE - HORIZON",
            "ASSURANCE VIE COMPLEMENT RETRAITE - HORIZON+",
        ],
    ),
    (
        "RESPONSABILITE CIVILE",
        &["R.C PARTICULIER-CHEF DE FAMILLE- MAITRE DE MAISON", "RC PROFESSION CULINAIRE"],
    ),
    (
        "ASSISTANCE EN VOYAGES",
        &["ASSISTANCES EN VOYAGES - PLAN BASIQUE", "ASSISTANCES EN VOYAGES - PLAN BUSINESS"],
    ),
    ("VOL", &["VOL AVEC EFFRACTION MOBILIER D HABITATION", "VOL TOUTE CATEGORIES"]),
    ("AUTOMOBILE", &["AUTOMOBILE", "PACK TOUS RISQUES AVEC FRANCHISE"]),
];

pub(super) const BUSINESS_CATEGORY_PRIORITY: &[(&str, &[&str])] = &[
    (
        "RESPONSABILITE CIVILE",
        &[
            "RC ENTREPRISE DE BATIMENT ET TRAVAUX PUBLIC",
            "RC ARTISANTS ET COMMERCANTS",
            "RC HOTELIERS",
            "R.C PARTICULIER-CHEF DE FAMILLE- MAITRE DE MAISON",
        ],
    ),
    ("INCENDIE RISQUES SIMPLE", &["INCENDIE RISQUES SIMPLE", "INCENDIE RISQUES SIMPLE CENTRALISE"]),
    (
        "VOL TOUTE CATEGORIES",
        &["VOL TOUTE CATEGORIES", "VOL AVEC EFFRACTION DES MARCHANDISES DE TOUTE NATURE"],
    ),
    (
        "INDIVIDUELLE ACCIDENTS",
        &["INDIVIDUELLE ACCIDENTS", "INDIVIDUELLE ACCIDENTS ASSOCIE AU CONTRAT AUTO"],
    ),
    ("TOUS RISQUES CHANTIER", &["TOUS RISQUES CHANTIER"]),
    ("BRIS DE MACHINES", &["BRIS DE MACHINES"]),
    ("DEGATS DES EAUX", &["DEGATS DES EAUX"]),
    (
        "TRANSPORT FACULTE TERRESTRE",
        &["POLICE AU VOYAGE(FACULTE TERRESTRE)", "POLICE ABONNEMENT(FACULTE TERRESTRE)"],
    ),
    ("ASSISTANCE DES VEHICULES", &["ASSISTANCE DES VEHICULES"]),
    ("R.C MEDECIN", &["R.C MEDECIN"]),
    ("R.C PARAMEDICALE", &["R.C PARAMEDICALE"]),
    ("MULTIRISQUE HOTELIER", &["MULTIRISQUE HOTELIER"]),
    (
        "ASSISTANCE EN VOYAGES",
        &["ASSISTANCES EN VOYAGES - PLAN BUSINESS", "ASSISTANCES EN VOYAGES - PLAN GOLDEN"],
    ),
    ("RESPONSABILITE DECENNALE", &["RESPONSABILITE DECENNALE"]),
    ("INCENDIE RISQUES AGRICOLES", &["INCENDIE RISQUES AGRICOLES"]),
    ("PERTES D EXPLOITATIONS APRES INCENDIE", &["PERTES D EXPLOITATION APRES INCENDIE"]),
    (
        "MULTIRISQUES PROFESSIONNELLES",
        &["MULTIRISQUES PROFESSIONNELLES", "MULTIRISQUES PROFESSIONNELLES CENTRALISE"],
    ),
];

/// Cross-sells proposed when a category accumulates repeated claims.
pub(super) const INDIVIDUAL_CLAIMS_CROSS_SELL: &[(&str, &[&str])] = &[
    ("AUTOMOBILE", &["AUTOMOBILE", "ASSISTANCE DES VEHICULES"]),
    ("INCENDIE", &["INCENDIE RISQUES SIMPLE", "MULTIRISQUES HABITATIONS"]),
    ("VOL", &["VOL TOUTE CATEGORIES", "ASSISTANCE PROTECTION JURIDIQUE"]),
];

pub(super) const BUSINESS_CLAIMS_CROSS_SELL: &[(&str, &[&str])] = &[
    (
        "RESPONSABILITE CIVILE",
        &["RC ENTREPRISE DE BATIMENT ET TRAVAUX PUBLIC", "RC ARTISANTS ET COMMERCANTS"],
    ),
    ("INCENDIE", &["INCENDIE RISQUES SIMPLE", "MULTIRISQUES PROFESSIONNELLES"]),
    ("BRIS DE MACHINES", &["BRIS DE MACHINES", "TOUS RISQUES CHANTIER"]),
];

/// Claim categories whose recurrence signals an operational impact severe
/// enough to propose business-interruption cover.
pub(super) const BUSINESS_IMPACT_CLAIM_CATEGORIES: &[&str] =
    &["RESPONSABILITE CIVILE", "INCENDIE", "BRIS DE MACHINES"];

/// Pick one product per priority category: the first preferred product that
/// the catalog carries and the client does not hold, else any catalog
/// product in the category not held. Categories with no usable product are
/// silently skipped.
pub(super) fn select_products_for_categories(
    categories: &[&str],
    priority_table: &[(&str, &[&str])],
    catalog: &ProductCatalog,
    existing_products: &HashSet<&str>,
) -> Vec<String> {
    let mut selected = Vec::new();
    for &category in categories {
        let preferred = priority_table
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, products)| *products)
            .unwrap_or(&[]);
        let available: Vec<&str> = catalog.products_in_category(category).collect();
        let choice = preferred
            .iter()
            .copied()
            .find(|product| available.contains(product) && !existing_products.contains(product))
            .or_else(|| {
                available.iter().copied().find(|product| !existing_products.contains(product))
            });
        if let Some(product) = choice {
            selected.push(product.to_owned());
        }
    }
    selected
}
