//! Receipt import: extract, check for duplicates, merge into a list and history.

use tracing::{info, warn};

use crate::categorize::Categorizer;
use crate::error::StoreError;
use crate::models::config::CategoryConfig;
use crate::models::{purchase_id, Store};
use crate::receipt::{DocumentFetcher, ReceiptExtractor};
use crate::storage::JsonStore;
use crate::Result;

/// What an import attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// New receipt appended to history and list.
    Imported {
        purchase_id: String,
        store_name: String,
        item_count: usize,
    },
    /// Receipt already in history; nothing changed.
    AlreadyImported { purchase_id: String },
}

/// Ties the extractor to the store and its snapshot.
pub struct Importer<'a, F> {
    extractor: &'a ReceiptExtractor<F>,
    storage: &'a JsonStore,
    categories: &'a CategoryConfig,
}

impl<'a, F: DocumentFetcher> Importer<'a, F> {
    pub fn new(
        extractor: &'a ReceiptExtractor<F>,
        storage: &'a JsonStore,
        categories: &'a CategoryConfig,
    ) -> Self {
        Self {
            extractor,
            storage,
            categories,
        }
    }

    /// Import the receipt at `url` into `list`, then save the store.
    ///
    /// `store` changes only once the snapshot is written. A receipt
    /// already in history is reported without fetching, since its identity
    /// depends only on the URL.
    pub fn import(&self, store: &mut Store, url: &str, list: &str) -> Result<ImportOutcome> {
        if store.lists.is_empty() {
            return Err(StoreError::NoList.into());
        }
        if !store.lists.contains_key(list) {
            return Err(StoreError::ListNotFound(list.to_string()).into());
        }

        let url = url.trim();
        if store.contains_receipt(url) {
            warn!("Receipt already imported: {}", url);
            return Ok(ImportOutcome::AlreadyImported {
                purchase_id: purchase_id(url),
            });
        }

        let purchase = {
            let categorizer = Categorizer::for_store(store, self.categories);
            self.extractor.extract(url, &categorizer)?
        };

        let outcome = ImportOutcome::Imported {
            purchase_id: purchase.id.clone(),
            store_name: purchase.store_name.clone(),
            item_count: purchase.items.len(),
        };

        let mut updated = store.clone();
        updated.extend_list(list, &purchase.items)?;
        updated.history.push(purchase);
        self.storage.save(&updated)?;
        *store = updated;

        info!("Imported receipt {} into list {}", url, list);
        Ok(outcome)
    }
}
