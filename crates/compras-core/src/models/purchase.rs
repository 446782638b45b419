//! Purchase and line item models, persisted with the snapshot's field names.

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Default bucket for products no rule recognizes.
pub const DEFAULT_CATEGORY: &str = "outros";

/// Store name used when the receipt page has no recognizable header.
pub const DEFAULT_STORE_NAME: &str = "Supermercado";

/// Category set of a freshly initialized store.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["carnes", "hortifruti", "laticinios", "padaria", "outros"];

/// One purchased product, either inside a purchase or copied into a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name as scraped; case is preserved.
    #[serde(rename = "produto")]
    pub product_name: String,

    /// Amount paid for the line, rounded to cents.
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Category label.
    #[serde(rename = "categoria", default = "default_category")]
    pub category: String,

    /// Picked for the running total (list context only).
    #[serde(rename = "marcado", default)]
    pub checked: bool,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl LineItem {
    /// Create an unchecked item.
    pub fn new(product_name: impl Into<String>, price: Decimal, category: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            price,
            category: category.into(),
            checked: false,
        }
    }
}

/// One imported receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Receipt identity, see [`purchase_id`].
    pub id: String,

    /// Store name from the receipt header.
    #[serde(rename = "loja", default = "default_store_name")]
    pub store_name: String,

    /// Items in order of appearance on the receipt.
    #[serde(rename = "itens", default)]
    pub items: Vec<LineItem>,

    /// Grouping key, `YYYY-MM`.
    #[serde(rename = "mes", default)]
    pub month_key: String,

    /// Capture time, minute precision.
    #[serde(rename = "data", default, with = "capture_time")]
    pub timestamp: Option<NaiveDateTime>,

    /// Source receipt URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn default_store_name() -> String {
    DEFAULT_STORE_NAME.to_string()
}

impl Purchase {
    /// Build a purchase captured at `captured_at` from `url`.
    pub fn new(
        url: &str,
        store_name: impl Into<String>,
        items: Vec<LineItem>,
        captured_at: NaiveDateTime,
    ) -> Self {
        let timestamp = truncate_to_minute(captured_at);
        Self {
            id: purchase_id(url),
            store_name: store_name.into(),
            items,
            month_key: month_key(&timestamp),
            timestamp: Some(timestamp),
            url: Some(url.trim().to_string()),
        }
    }

    /// Sum of item prices.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|i| i.price).sum()
    }

    /// Whether this purchase is the receipt at `url`.
    ///
    /// Older snapshots used the raw URL as the id.
    pub fn is_receipt(&self, url: &str) -> bool {
        let url = url.trim();
        self.id == purchase_id(url) || self.id == url
    }
}

/// Stable receipt identity: hex SHA-256 of the trimmed URL.
pub fn purchase_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Year-month grouping key.
pub fn month_key(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m").to_string()
}

fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// `dd/mm/YYYY HH:MM` on disk. Unreadable values load as `None`.
mod capture_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%d/%m/%Y %H:%M";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| NaiveDateTime::parse_from_str(s.trim(), FORMAT).ok()))
    }
}
