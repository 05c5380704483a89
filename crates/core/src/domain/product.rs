use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Catalog entry: product name is the unique key, sub-branch is the
/// mid-level category the needs rules speak in, branch is the coarse group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product: String,
    pub sub_branch: String,
    pub branch: String,
}

/// Product catalog with category and branch lookups.
///
/// Enumeration order within a category follows catalog insertion order, so
/// fallback selection ("first available product in the category") is
/// deterministic for a fixed snapshot.
#[derive(Clone, Debug, Default)]
pub struct ProductCatalog {
    records: Vec<ProductRecord>,
    by_product: HashMap<String, usize>,
}

impl ProductCatalog {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        let by_product = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.product.clone(), index))
            .collect();
        Self { records, by_product }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, product: &str) -> Option<&ProductRecord> {
        self.by_product.get(product).map(|&index| &self.records[index])
    }

    /// Sub-branch (category) of a product, if the product is catalogued.
    pub fn category_of(&self, product: &str) -> Option<&str> {
        self.find(product).map(|record| record.sub_branch.as_str())
    }

    /// Products belonging to a category, in catalog order.
    pub fn products_in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a str> {
        self.records
            .iter()
            .filter(move |record| record.sub_branch == category)
            .map(|record| record.product.as_str())
    }

    /// Products belonging to a branch, in catalog order.
    pub fn products_in_branch<'a>(&'a self, branch: &'a str) -> impl Iterator<Item = &'a str> {
        self.records
            .iter()
            .filter(move |record| record.branch == branch)
            .map(|record| record.product.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ProductCatalog {
        ProductCatalog::new(vec![
            ProductRecord {
                product: "SANTE ET PREVOYANCE".to_owned(),
                sub_branch: "MALADIE".to_owned(),
                branch: "VIE".to_owned(),
            },
            ProductRecord {
                product: "INDIVIDUELLE ACCIDENTS".to_owned(),
                sub_branch: "INDIVIDUELLE ACCIDENTS".to_owned(),
                branch: "IARD".to_owned(),
            },
            ProductRecord {
                product: "TEMPORAIRE DECES".to_owned(),
                sub_branch: "DECES".to_owned(),
                branch: "VIE".to_owned(),
            },
        ])
    }

    #[test]
    fn category_lookup_follows_catalog() {
        let catalog = catalog();
        assert_eq!(catalog.category_of("SANTE ET PREVOYANCE"), Some("MALADIE"));
        assert_eq!(catalog.category_of("UNLISTED"), None);
    }

    #[test]
    fn branch_enumeration_keeps_insertion_order() {
        let catalog = catalog();
        let vie: Vec<_> = catalog.products_in_branch("VIE").collect();
        assert_eq!(vie, vec!["SANTE ET PREVOYANCE", "TEMPORAIRE DECES"]);
    }
}
