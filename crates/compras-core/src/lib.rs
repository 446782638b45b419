//! Core library for grocery receipt tracking.
//!
//! This crate provides:
//! - NFC-e receipt page fetching and scraping
//! - Brazilian currency parsing and formatting
//! - Keyword and learned-override product categorization
//! - Shopping lists, purchase history and their JSON snapshot
//! - Monthly spending and price comparison reports
//! - QR code decoding of photographed receipts

pub mod categorize;
pub mod error;
pub mod import;
pub mod models;
pub mod qr;
pub mod receipt;
pub mod report;
pub mod storage;

pub use categorize::Categorizer;
pub use error::{ComprasError, Result};
pub use import::{ImportOutcome, Importer};
pub use models::config::ComprasConfig;
pub use models::{LineItem, Purchase, Store};
pub use receipt::rules::{format_brl_amount, parse_brl_amount};
pub use receipt::{DocumentFetcher, HttpFetcher, NfceParser, ReceiptExtractor};
pub use report::{HistoryEntry, MonthlySummary, PriceObservation};
pub use storage::JsonStore;
