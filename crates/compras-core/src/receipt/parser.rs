//! NFC-e receipt page parser.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use tracing::{debug, info};

use crate::categorize::Categorizer;
use crate::error::ParseError;
use crate::models::config::ExtractionConfig;
use crate::models::{LineItem, Purchase};

use super::rules::patterns::{ANY_ROW, ITEM_NAME, ITEM_PRICE, ITEM_ROW, STORE_NAME};
use super::rules::{clean_text, is_filler, parse_brl_amount};
use super::Result;

/// Raw rows recovered from a receipt page, before categorization.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedReceipt {
    pub store_name: String,
    pub rows: Vec<(String, Decimal)>,
}

/// Parser for the public NFC-e consultation page.
pub struct NfceParser {
    /// Store name when the page header is missing.
    default_store_name: String,
    /// Tokens marking subtotal/total rows.
    filler_tokens: Vec<String>,
    /// Collapse repeated product names (first occurrence wins).
    dedup_by_name: bool,
}

impl NfceParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            default_store_name: config.default_store_name.clone(),
            filler_tokens: config
                .filler_tokens
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            dedup_by_name: config.dedup_by_name,
        }
    }

    /// Set the fallback store name.
    pub fn with_default_store_name(mut self, name: impl Into<String>) -> Self {
        self.default_store_name = name.into();
        self
    }

    /// Set name deduplication.
    pub fn with_name_dedup(mut self, dedup: bool) -> Self {
        self.dedup_by_name = dedup;
        self
    }

    /// Recover store name and priced rows from the page.
    pub fn scrape(&self, html: &str) -> ScrapedReceipt {
        let document = Html::parse_document(html);

        let store_name = document
            .select(&STORE_NAME)
            .next()
            .map(element_text)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_store_name.clone());

        let candidates = candidate_rows(&document);
        debug!("Found {} candidate item rows", candidates.len());

        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for row in candidates {
            let (Some(name_el), Some(price_el)) =
                (row.select(&ITEM_NAME).next(), row.select(&ITEM_PRICE).next())
            else {
                continue;
            };

            let name = element_text(name_el);
            if name.is_empty() {
                continue;
            }

            if is_filler(&name.to_lowercase(), &self.filler_tokens) {
                debug!("Skipping summary row {:?}", name);
                continue;
            }

            let price = parse_brl_amount(&element_text(price_el));
            if price <= Decimal::ZERO {
                debug!("Skipping {:?}: non-positive price", name);
                continue;
            }

            if self.dedup_by_name && !seen.insert(name.clone()) {
                debug!("Skipping repeated product {:?}", name);
                continue;
            }

            rows.push((name, price));
        }

        ScrapedReceipt { store_name, rows }
    }

    /// Build a purchase from a fetched page.
    pub fn parse(
        &self,
        html: &str,
        url: &str,
        captured_at: NaiveDateTime,
        categorizer: &Categorizer<'_>,
    ) -> Result<Purchase> {
        let scraped = self.scrape(html);

        if scraped.rows.is_empty() {
            return Err(ParseError::NoItems {
                url: url.to_string(),
            });
        }

        let items: Vec<LineItem> = scraped
            .rows
            .into_iter()
            .map(|(name, price)| {
                let category = categorizer.categorize(&name);
                LineItem::new(name, price, category)
            })
            .collect();

        info!(
            "Parsed {} items from {} ({})",
            items.len(),
            scraped.store_name,
            url
        );

        Ok(Purchase::new(url, scraped.store_name, items, captured_at))
    }
}

impl Default for NfceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows with the numbered `Item + N` id, or failing that any innermost row
/// carrying both a title cell and a value cell.
fn candidate_rows(document: &Html) -> Vec<ElementRef<'_>> {
    let rows: Vec<ElementRef<'_>> = document.select(&ITEM_ROW).collect();
    if !rows.is_empty() {
        return rows;
    }

    document
        .select(&ANY_ROW)
        .filter(|tr| !has_nested_row(*tr))
        .filter(|tr| {
            tr.select(&ITEM_NAME).next().is_some() && tr.select(&ITEM_PRICE).next().is_some()
        })
        .collect()
}

/// Layout rows wrapping a whole item table.
fn has_nested_row(tr: ElementRef<'_>) -> bool {
    tr.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().name() == "tr")
}

fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}
