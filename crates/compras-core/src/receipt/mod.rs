//! Receipt extraction: fetch an NFC-e page and turn it into a purchase.

mod fetch;
mod parser;
pub mod rules;

pub use fetch::{validate_url, DocumentFetcher, HttpFetcher};
pub use parser::{NfceParser, ScrapedReceipt};

use chrono::{Local, NaiveDateTime};

use crate::categorize::Categorizer;
use crate::error::ParseError;
use crate::models::config::ComprasConfig;
use crate::models::Purchase;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Fetch + parse pipeline.
pub struct ReceiptExtractor<F> {
    fetcher: F,
    parser: NfceParser,
}

impl ReceiptExtractor<HttpFetcher> {
    /// HTTP extractor configured from `config`.
    pub fn from_config(config: &ComprasConfig) -> crate::Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self::new(fetcher, NfceParser::from_config(&config.extraction)))
    }
}

impl<F: DocumentFetcher> ReceiptExtractor<F> {
    pub fn new(fetcher: F, parser: NfceParser) -> Self {
        Self { fetcher, parser }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch `url` and build a purchase captured now.
    pub fn extract(&self, url: &str, categorizer: &Categorizer<'_>) -> crate::Result<Purchase> {
        self.extract_at(url, categorizer, Local::now().naive_local())
    }

    /// Fetch `url` and build a purchase captured at `captured_at`.
    pub fn extract_at(
        &self,
        url: &str,
        categorizer: &Categorizer<'_>,
        captured_at: NaiveDateTime,
    ) -> crate::Result<Purchase> {
        let url = url.trim();
        let html = self.fetcher.fetch(url)?;
        Ok(self.parser.parse(&html, url, captured_at, categorizer)?)
    }
}
