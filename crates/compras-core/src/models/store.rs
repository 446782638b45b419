//! The store aggregate: lists, purchase history, learned overrides and categories.
//!
//! All mutators work on the in-memory value. Nothing here touches disk; see
//! [`crate::storage::JsonStore`] for `load`/`save`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;

use super::purchase::{month_key, LineItem, Purchase, DEFAULT_CATEGORIES, DEFAULT_CATEGORY};

/// Result type for store mutations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A user-curated shopping checklist.
pub type ShoppingList = Vec<LineItem>;

/// Key under which an override for `product` is stored and looked up.
pub fn override_key(product: &str) -> String {
    product.trim().to_lowercase()
}

/// Whole persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// List name to items.
    #[serde(rename = "listas", default)]
    pub lists: BTreeMap<String, ShoppingList>,

    /// Imported purchases, oldest first.
    #[serde(rename = "historico", default)]
    pub history: Vec<Purchase>,

    /// Lowercase product name to category.
    #[serde(rename = "aprendizado", default)]
    pub overrides: BTreeMap<String, String>,

    /// Valid category labels.
    #[serde(rename = "categorias", default)]
    pub categories: Vec<String>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            lists: BTreeMap::new(),
            history: Vec::new(),
            overrides: BTreeMap::new(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Store {
    /// Create an empty store with the default category set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store around a bare purchase history.
    pub fn from_history(history: Vec<Purchase>) -> Self {
        let mut store = Self {
            history,
            ..Self::default()
        };
        store.normalize();
        store
    }

    /// Repair fields older snapshots may lack.
    pub fn normalize(&mut self) {
        if self.categories.is_empty() {
            self.categories = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
        }
        if !self.has_category(DEFAULT_CATEGORY) {
            self.categories.push(DEFAULT_CATEGORY.to_string());
        }
        if self.overrides.keys().any(|k| *k != override_key(k)) {
            self.overrides = std::mem::take(&mut self.overrides)
                .into_iter()
                .map(|(k, c)| (override_key(&k), c))
                .collect();
        }
        for purchase in &mut self.history {
            if purchase.month_key.is_empty() {
                if let Some(ts) = &purchase.timestamp {
                    purchase.month_key = month_key(ts);
                }
            }
        }
    }

    // ----- lists -----

    /// List names in sorted order.
    pub fn list_names(&self) -> Vec<&str> {
        self.lists.keys().map(String::as_str).collect()
    }

    pub fn list(&self, name: &str) -> Result<&ShoppingList> {
        self.lists
            .get(name)
            .ok_or_else(|| StoreError::ListNotFound(name.to_string()))
    }

    fn list_mut(&mut self, name: &str) -> Result<&mut ShoppingList> {
        self.lists
            .get_mut(name)
            .ok_or_else(|| StoreError::ListNotFound(name.to_string()))
    }

    /// Create an empty list. Returns the trimmed name.
    pub fn create_list(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.lists.contains_key(name) {
            return Err(StoreError::ListExists(name.to_string()));
        }
        self.lists.insert(name.to_string(), Vec::new());
        info!("Created list {}", name);
        Ok(name.to_string())
    }

    /// Remove a list and its items. History is untouched.
    pub fn delete_list(&mut self, name: &str) -> Result<ShoppingList> {
        self.lists
            .remove(name)
            .ok_or_else(|| StoreError::ListNotFound(name.to_string()))
    }

    /// Append independent copies of `items` to a list, unchecked.
    pub fn extend_list(&mut self, name: &str, items: &[LineItem]) -> Result<usize> {
        let list = self.list_mut(name)?;
        list.extend(items.iter().cloned().map(|mut item| {
            item.checked = false;
            item
        }));
        Ok(items.len())
    }

    fn item_mut(&mut self, list: &str, index: usize) -> Result<&mut LineItem> {
        let items = self.list_mut(list)?;
        let len = items.len();
        items.get_mut(index).ok_or_else(|| StoreError::ItemOutOfRange {
            list: list.to_string(),
            index,
            len,
        })
    }

    /// Set the checked flag of one item (0-based index).
    pub fn set_checked(&mut self, list: &str, index: usize, checked: bool) -> Result<()> {
        self.item_mut(list, index)?.checked = checked;
        Ok(())
    }

    /// Check every item in a list.
    pub fn check_all(&mut self, list: &str) -> Result<()> {
        for item in self.list_mut(list)? {
            item.checked = true;
        }
        Ok(())
    }

    /// Drop checked items from a list. Returns how many were removed.
    pub fn clear_checked(&mut self, list: &str) -> Result<usize> {
        let items = self.list_mut(list)?;
        let before = items.len();
        items.retain(|item| !item.checked);
        Ok(before - items.len())
    }

    /// Running total of checked items.
    pub fn checked_total(&self, list: &str) -> Result<Decimal> {
        Ok(self
            .list(list)?
            .iter()
            .filter(|item| item.checked)
            .map(|item| item.price)
            .sum())
    }

    /// Reassign an item's category and remember the choice for its product name.
    pub fn set_item_category(&mut self, list: &str, index: usize, category: &str) -> Result<()> {
        let category = category.trim().to_lowercase();
        if !self.has_category(&category) {
            return Err(StoreError::UnknownCategory(category));
        }
        let item = self.item_mut(list, index)?;
        item.category = category.clone();
        let product = item.product_name.clone();
        self.learn(&product, &category)?;
        Ok(())
    }

    // ----- learned overrides -----

    /// Record that `product` belongs to `category` from now on.
    pub fn learn(&mut self, product: &str, category: &str) -> Result<()> {
        if !self.has_category(category) {
            return Err(StoreError::UnknownCategory(category.to_string()));
        }
        let key = override_key(product);
        debug!("Learned override {:?} -> {}", key, category);
        self.overrides.insert(key, category.to_string());
        Ok(())
    }

    // ----- categories -----

    pub fn has_category(&self, label: &str) -> bool {
        self.categories.iter().any(|c| c == label)
    }

    /// Add a category. Returns `false` if it was already present.
    pub fn add_category(&mut self, label: &str) -> Result<bool> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.has_category(&label) {
            return Ok(false);
        }
        self.categories.push(label);
        Ok(true)
    }

    /// Remove a category, moving every item that carries it to the default bucket.
    ///
    /// Returns the number of reassigned items across lists and history.
    pub fn remove_category(&mut self, label: &str) -> Result<usize> {
        let label = label.trim().to_lowercase();
        if label == DEFAULT_CATEGORY {
            return Err(StoreError::DefaultCategory(label));
        }
        if !self.has_category(&label) {
            return Err(StoreError::UnknownCategory(label));
        }

        self.categories.retain(|c| *c != label);
        self.overrides.retain(|_, c| *c != label);

        let mut moved = 0;
        let items = self
            .lists
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .chain(self.history.iter_mut().flat_map(|p| p.items.iter_mut()));
        for item in items {
            if item.category == label {
                item.category = DEFAULT_CATEGORY.to_string();
                moved += 1;
            }
        }

        info!("Removed category {} ({} items reassigned)", label, moved);
        Ok(moved)
    }

    // ----- history -----

    /// Whether a receipt from `url` was already imported.
    pub fn contains_receipt(&self, url: &str) -> bool {
        self.history.iter().any(|p| p.is_receipt(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn item(name: &str, cents: i64, category: &str) -> LineItem {
        LineItem::new(name, Decimal::new(cents, 2), category)
    }

    fn store_with_list() -> Store {
        let mut store = Store::new();
        store.create_list("Semana").unwrap();
        store
            .extend_list(
                "Semana",
                &[
                    item("Leite Integral", 499, "laticinios"),
                    item("Banana", 350, "hortifruti"),
                    item("Detergente", 229, "outros"),
                ],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_new_store_has_default_categories() {
        let store = Store::new();
        assert_eq!(
            store.categories,
            vec!["carnes", "hortifruti", "laticinios", "padaria", "outros"]
        );
        assert!(store.lists.is_empty());
        assert!(store.history.is_empty());
    }

    #[test]
    fn test_create_list_rejects_duplicates_and_blanks() {
        let mut store = Store::new();
        assert_eq!(store.create_list("  Semana ").unwrap(), "Semana");
        assert!(matches!(store.create_list("Semana"), Err(StoreError::ListExists(_))));
        assert!(matches!(store.create_list("   "), Err(StoreError::EmptyName)));
    }

    #[test]
    fn test_extend_list_copies_unchecked() {
        let mut store = Store::new();
        store.create_list("A").unwrap();
        let mut checked = item("Queijo", 1590, "laticinios");
        checked.checked = true;

        store.extend_list("A", &[checked.clone()]).unwrap();

        assert!(!store.list("A").unwrap()[0].checked);
        assert!(checked.checked);
    }

    #[test]
    fn test_check_and_clear() {
        let mut store = store_with_list();
        store.set_checked("Semana", 0, true).unwrap();
        store.set_checked("Semana", 2, true).unwrap();

        assert_eq!(store.checked_total("Semana").unwrap(), Decimal::new(728, 2));
        assert_eq!(store.clear_checked("Semana").unwrap(), 2);
        assert_eq!(store.list("Semana").unwrap().len(), 1);
        assert_eq!(store.list("Semana").unwrap()[0].product_name, "Banana");

        store.check_all("Semana").unwrap();
        assert_eq!(store.clear_checked("Semana").unwrap(), 1);
        assert!(store.list("Semana").unwrap().is_empty());
    }

    #[test]
    fn test_item_index_out_of_range() {
        let mut store = store_with_list();
        let err = store.set_checked("Semana", 3, true).unwrap_err();
        assert!(matches!(err, StoreError::ItemOutOfRange { index: 3, len: 3, .. }));
        assert!(matches!(
            store.set_checked("Outra", 0, true),
            Err(StoreError::ListNotFound(_))
        ));
    }

    #[test]
    fn test_set_item_category_learns_override() {
        let mut store = store_with_list();
        store.set_item_category("Semana", 2, "Padaria").unwrap();

        assert_eq!(store.list("Semana").unwrap()[2].category, "padaria");
        assert_eq!(store.overrides.get("detergente").map(String::as_str), Some("padaria"));

        assert!(matches!(
            store.set_item_category("Semana", 2, "limpeza"),
            Err(StoreError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_add_category_normalizes_label() {
        let mut store = Store::new();
        assert!(store.add_category("  Limpeza ").unwrap());
        assert!(!store.add_category("limpeza").unwrap());
        assert!(store.has_category("limpeza"));
        assert!(matches!(store.add_category(" "), Err(StoreError::EmptyName)));
    }

    #[test]
    fn test_remove_category_reassigns_items() {
        let mut store = store_with_list();
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        store.history.push(Purchase::new(
            "https://example.com/1",
            "Loja",
            vec![item("Leite", 450, "laticinios"), item("Pao", 100, "padaria")],
            ts,
        ));
        store.learn("iogurte", "laticinios").unwrap();

        let moved = store.remove_category("laticinios").unwrap();

        assert_eq!(moved, 2);
        assert!(!store.has_category("laticinios"));
        assert_eq!(store.list("Semana").unwrap()[0].category, DEFAULT_CATEGORY);
        assert_eq!(store.history[0].items[0].category, DEFAULT_CATEGORY);
        assert_eq!(store.history[0].items[1].category, "padaria");
        assert!(store.overrides.is_empty());
    }

    #[test]
    fn test_default_category_cannot_be_removed() {
        let mut store = Store::new();
        assert!(matches!(
            store.remove_category("outros"),
            Err(StoreError::DefaultCategory(_))
        ));
        assert!(matches!(
            store.remove_category("bebidas"),
            Err(StoreError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_normalize_restores_default_bucket_and_month() {
        let ts = NaiveDate::from_ymd_opt(2023, 2, 10).unwrap().and_hms_opt(8, 30, 0).unwrap();
        let mut purchase = Purchase::new("https://example.com/2", "Loja", Vec::new(), ts);
        purchase.month_key.clear();

        let mut store = Store {
            categories: vec!["carnes".to_string()],
            ..Store::from_history(vec![purchase])
        };
        store.normalize();

        assert!(store.has_category(DEFAULT_CATEGORY));
        assert_eq!(store.history[0].month_key, "2023-02");
    }
}
