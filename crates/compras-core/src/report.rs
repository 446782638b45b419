//! Read-only reports over the purchase history.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{override_key, Purchase, Store};

/// Number of products listed in a monthly summary's ranking.
pub const TOP_PRODUCTS: usize = 5;

/// Spending for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: String,
    /// Category to amount spent.
    pub by_category: BTreeMap<String, Decimal>,
    /// Highest-spend products (uppercased names), largest first.
    pub top_products: Vec<(String, Decimal)>,
    pub total: Decimal,
    pub purchase_count: usize,
}

/// One price seen for a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceObservation {
    pub store_name: String,
    pub price: Decimal,
    pub timestamp: Option<NaiveDateTime>,
}

/// A purchase with its total, as shown in history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry<'a> {
    pub purchase: &'a Purchase,
    pub total: Decimal,
}

impl Store {
    /// Month keys in order of first appearance.
    pub fn months(&self) -> Vec<&str> {
        let mut months: Vec<&str> = Vec::new();
        for purchase in &self.history {
            let month = purchase.month_key.as_str();
            if !month.is_empty() && !months.contains(&month) {
                months.push(month);
            }
        }
        months
    }

    /// Category of an item as reports see it: the learned override if any.
    fn effective_category<'s>(&'s self, product: &str, stored: &'s str) -> &'s str {
        self.overrides
            .get(&override_key(product))
            .map(String::as_str)
            .unwrap_or(stored)
    }

    /// Aggregate spending for `month` (`YYYY-MM`).
    pub fn monthly_summary(&self, month: &str) -> MonthlySummary {
        let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut by_product: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut purchase_count = 0;

        for purchase in self.history.iter().filter(|p| p.month_key == month) {
            purchase_count += 1;
            for item in &purchase.items {
                let category = self.effective_category(&item.product_name, &item.category);
                *by_category.entry(category.to_string()).or_default() += item.price;
                *by_product.entry(item.product_name.to_uppercase()).or_default() += item.price;
            }
        }

        let mut top_products: Vec<(String, Decimal)> = by_product.into_iter().collect();
        // Stable sort keeps alphabetical order among equal amounts
        top_products.sort_by(|a, b| b.1.cmp(&a.1));
        top_products.truncate(TOP_PRODUCTS);

        MonthlySummary {
            month: month.to_string(),
            total: by_category.values().copied().sum(),
            by_category,
            top_products,
            purchase_count,
        }
    }

    /// Purchases newest first.
    pub fn history_newest_first(&self) -> Vec<HistoryEntry<'_>> {
        self.history
            .iter()
            .rev()
            .map(|purchase| HistoryEntry {
                purchase,
                total: purchase.total(),
            })
            .collect()
    }

    /// Distinct uppercased product names, sorted.
    pub fn products(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .history
            .iter()
            .flat_map(|p| p.items.iter())
            .map(|i| i.product_name.to_uppercase())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Every observed price of `product` (case-insensitive), cheapest first.
    pub fn price_comparison(&self, product: &str) -> Vec<PriceObservation> {
        let wanted = product.trim().to_uppercase();
        let mut observations: Vec<PriceObservation> = self
            .history
            .iter()
            .flat_map(|p| {
                p.items
                    .iter()
                    .filter(|i| i.product_name.to_uppercase() == wanted)
                    .map(move |i| PriceObservation {
                        store_name: p.store_name.clone(),
                        price: i.price,
                        timestamp: p.timestamp,
                    })
            })
            .collect();
        observations.sort_by(|a, b| a.price.cmp(&b.price));
        observations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn item(name: &str, amount: i64, category: &str) -> LineItem {
        LineItem::new(name, Decimal::new(amount, 0), category)
    }

    fn store() -> Store {
        let mut store = Store::new();
        store.add_category("a").unwrap();
        store.add_category("b").unwrap();
        store.history = vec![
            Purchase::new(
                "https://r.example/1",
                "Loja Um",
                vec![item("Arroz", 10, "a"), item("Feijao", 3, "b")],
                at(5, 2),
            ),
            Purchase::new("https://r.example/2", "Loja Dois", vec![item("arroz", 5, "a")], at(5, 20)),
            Purchase::new("https://r.example/3", "Loja Um", vec![item("Arroz", 7, "a")], at(6, 1)),
        ];
        store
    }

    #[test]
    fn test_monthly_summary_by_category() {
        let summary = store().monthly_summary("2024-05");

        let expected: BTreeMap<String, Decimal> = [
            ("a".to_string(), Decimal::new(15, 0)),
            ("b".to_string(), Decimal::new(3, 0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(summary.by_category, expected);
        assert_eq!(summary.total, Decimal::new(18, 0));
        assert_eq!(summary.purchase_count, 2);
        assert_eq!(
            summary.top_products,
            vec![
                ("ARROZ".to_string(), Decimal::new(15, 0)),
                ("FEIJAO".to_string(), Decimal::new(3, 0)),
            ]
        );
    }

    #[test]
    fn test_monthly_summary_uses_overrides() {
        let mut store = store();
        store.learn("feijao", "a").unwrap();

        let summary = store.monthly_summary("2024-05");
        assert_eq!(summary.by_category.get("a"), Some(&Decimal::new(18, 0)));
        assert_eq!(summary.by_category.get("b"), None);
    }

    #[test]
    fn test_override_matches_padded_receipt_name() {
        let mut store = store();
        store.history.push(Purchase::new(
            "https://r.example/4",
            "Loja Dois",
            vec![item("  FEIJAO ", 4, "b")],
            at(5, 25),
        ));
        store.learn("Feijao", "a").unwrap();

        let summary = store.monthly_summary("2024-05");
        assert_eq!(summary.by_category.get("a"), Some(&Decimal::new(22, 0)));
        assert_eq!(summary.by_category.get("b"), None);
    }

    #[test]
    fn test_unknown_month_is_empty() {
        let summary = store().monthly_summary("1999-01");
        assert!(summary.by_category.is_empty());
        assert_eq!(summary.total, Decimal::ZERO);
        assert_eq!(summary.purchase_count, 0);
    }

    #[test]
    fn test_months_in_order() {
        assert_eq!(store().months(), vec!["2024-05", "2024-06"]);
    }

    #[test]
    fn test_history_newest_first() {
        let store = store();
        let history = store.history_newest_first();
        assert_eq!(history[0].purchase.id, crate::models::purchase_id("https://r.example/3"));
        assert_eq!(history[2].total, Decimal::new(13, 0));
    }

    #[test]
    fn test_price_comparison() {
        let store = store();
        assert_eq!(store.products(), vec!["ARROZ", "FEIJAO"]);

        let prices = store.price_comparison("arroz");
        let summary: Vec<(&str, Decimal)> = prices
            .iter()
            .map(|o| (o.store_name.as_str(), o.price))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Loja Dois", Decimal::new(5, 0)),
                ("Loja Um", Decimal::new(7, 0)),
                ("Loja Um", Decimal::new(10, 0)),
            ]
        );
        assert!(store.price_comparison("picanha").is_empty());
    }
}
