//! Product categorization: learned overrides first, then the keyword table.

use std::collections::BTreeMap;

use tracing::trace;

use crate::models::config::{CategoryConfig, KeywordRule};
use crate::models::{override_key, Store, DEFAULT_CATEGORY};

/// Categorizer over a borrowed override table, keyword table and category set.
pub struct Categorizer<'a> {
    overrides: &'a BTreeMap<String, String>,
    rules: &'a [KeywordRule],
    categories: &'a [String],
}

impl<'a> Categorizer<'a> {
    pub fn new(
        overrides: &'a BTreeMap<String, String>,
        rules: &'a [KeywordRule],
        categories: &'a [String],
    ) -> Self {
        Self {
            overrides,
            rules,
            categories,
        }
    }

    /// Categorizer for the current state of `store`.
    pub fn for_store(store: &'a Store, config: &'a CategoryConfig) -> Self {
        Self::new(&store.overrides, &config.keywords, &store.categories)
    }

    /// Map a product name to a category label.
    ///
    /// An exact override on the trimmed, lowercased name wins. Otherwise the first rule
    /// (in table order) with a keyword contained in the name wins, provided its
    /// category is still in the category set. Otherwise the default bucket.
    pub fn categorize(&self, product_name: &str) -> String {
        let name = override_key(product_name);

        if let Some(category) = self.overrides.get(&name) {
            trace!("{:?} -> {} (override)", name, category);
            return category.clone();
        }

        for rule in self.rules {
            if !self.categories.iter().any(|c| *c == rule.category) {
                continue;
            }
            if rule
                .keywords
                .iter()
                .any(|k| !k.is_empty() && name.contains(&k.to_lowercase()))
            {
                trace!("{:?} -> {} (keyword)", name, rule.category);
                return rule.category.clone();
            }
        }

        DEFAULT_CATEGORY.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorize(store: &Store, name: &str) -> String {
        let config = CategoryConfig::default();
        Categorizer::for_store(store, &config).categorize(name)
    }

    #[test]
    fn test_keyword_match() {
        let store = Store::new();
        assert_eq!(categorize(&store, "BANANA PRATA KG"), "hortifruti");
        assert_eq!(categorize(&store, "Pao Frances"), "padaria");
        assert_eq!(categorize(&store, "FILE PEITO FRANGO"), "carnes");
        assert_eq!(categorize(&store, "Leite UHT Integral"), "laticinios");
    }

    #[test]
    fn test_table_order_breaks_ties() {
        let store = Store::new();
        // "pao" (padaria) and "queijo" (laticinios): padaria is declared first
        assert_eq!(categorize(&store, "PAO DE QUEIJO"), "padaria");
        // "manga" (hortifruti) beats "leite" (laticinios)
        assert_eq!(categorize(&store, "LEITE SABOR MANGA"), "hortifruti");
    }

    #[test]
    fn test_fallback_to_default() {
        let store = Store::new();
        assert_eq!(categorize(&store, "Detergente Neutro"), DEFAULT_CATEGORY);
        assert_eq!(categorize(&store, "Milk"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_override_takes_precedence() {
        let mut store = Store::new();
        store.learn("Leite UHT Integral", "padaria").unwrap();

        assert_eq!(categorize(&store, "LEITE UHT INTEGRAL"), "padaria");
        // exact match only
        assert_eq!(categorize(&store, "Leite UHT Desnatado"), "laticinios");
    }

    #[test]
    fn test_override_ignores_surrounding_whitespace() {
        let mut store = Store::new();
        store.learn("Leite UHT Integral", "padaria").unwrap();

        assert_eq!(categorize(&store, "  Leite UHT Integral "), "padaria");
    }

    #[test]
    fn test_removed_category_is_skipped() {
        let mut store = Store::new();
        store.remove_category("hortifruti").unwrap();
        assert_eq!(categorize(&store, "Banana"), DEFAULT_CATEGORY);
    }
}
