//! JSON snapshot persistence for [`Store`].
//!
//! The whole store is read and written at once. Saving replaces the file
//! (last writer wins); there is no locking.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::{Purchase, Store};

/// Shapes a snapshot file may have on disk.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Current(Store),
    /// Early snapshots held only the purchase history.
    Legacy(Vec<Purchase>),
}

/// A store snapshot at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing or empty file yields an empty store.
    pub fn load(&self) -> Result<Store, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", self.path.display());
                return Ok(Store::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        if content.trim().is_empty() {
            return Ok(Store::new());
        }

        let store = parse_snapshot(&content).map_err(|source| StoreError::Malformed {
            path: self.path.display().to_string(),
            source,
        })?;

        debug!(
            "Loaded {} lists and {} purchases from {}",
            store.lists.len(),
            store.history.len(),
            self.path.display()
        );
        Ok(store)
    }

    /// Overwrite the snapshot with `store`.
    pub fn save(&self, store: &Store) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(store).map_err(|source| StoreError::Malformed {
            path: self.path.display().to_string(),
            source,
        })?;

        // Write next to the target, then rename over it
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| self.io_error(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;

        info!("Saved store to {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Parse snapshot text in either known shape and normalize it.
pub fn parse_snapshot(content: &str) -> Result<Store, serde_json::Error> {
    let mut store = match serde_json::from_str::<Snapshot>(content)? {
        Snapshot::Current(store) => store,
        Snapshot::Legacy(history) => {
            warn!(
                "Converting legacy snapshot with {} purchases to the current format",
                history.len()
            );
            Store::from_history(history)
        }
    };
    store.normalize();
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineItem, DEFAULT_CATEGORY};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn sample_store() -> Store {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 3)
            .unwrap()
            .and_hms_opt(19, 7, 0)
            .unwrap();
        let mut store = Store::new();
        store.add_category("limpeza").unwrap();
        store.create_list("Semana").unwrap();
        let purchase = Purchase::new(
            "https://r.example/abc",
            "Mercado Central",
            vec![
                LineItem::new("Leite Integral", Decimal::new(499, 2), "laticinios"),
                LineItem::new("Detergente", Decimal::new(1234567, 2), "limpeza"),
            ],
            ts,
        );
        store.extend_list("Semana", &purchase.items).unwrap();
        store.set_checked("Semana", 1, true).unwrap();
        store.history.push(purchase);
        store.learn("detergente", "limpeza").unwrap();
        store
    }

    #[test]
    fn test_missing_file_loads_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nope.json")).load().unwrap();
        assert_eq!(store, Store::new());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let json_store = JsonStore::new(dir.path().join("data").join("compras.json"));
        let store = sample_store();

        json_store.save(&store).unwrap();
        let loaded = json_store.load().unwrap();

        assert_eq!(loaded, store);
        assert!(!dir.path().join("data").join("compras.json.tmp").exists());
    }

    #[test]
    fn test_snapshot_uses_persisted_field_names() {
        let value = serde_json::to_value(sample_store()).unwrap();
        for key in ["listas", "historico", "aprendizado", "categorias"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["historico"][0]["data"], "03/05/2024 19:07");
        assert_eq!(value["historico"][0]["mes"], "2024-05");
    }

    #[test]
    fn test_legacy_bare_array() {
        let legacy = r#"[
            {"id": "https://r.example/old", "loja": "Antigo", "mes": "2023-08",
             "data": "12/08/2023 11:20",
             "itens": [{"produto": "Uva", "valor": 8.5, "categoria": "hortifruti", "marcado": false}]}
        ]"#;

        let store = parse_snapshot(legacy).unwrap();

        assert!(store.lists.is_empty());
        assert_eq!(store.history.len(), 1);
        assert_eq!(store.history[0].store_name, "Antigo");
        assert_eq!(store.history[0].items[0].price, Decimal::new(85, 1));
        assert!(store.has_category(DEFAULT_CATEGORY));
        assert!(store.contains_receipt("https://r.example/old"));
    }

    #[test]
    fn test_partial_snapshot_gets_defaults() {
        let store = parse_snapshot(r#"{"listas": {"Feira": []}, "historico": []}"#).unwrap();

        assert_eq!(store.list_names(), vec!["Feira"]);
        assert!(store.overrides.is_empty());
        assert_eq!(store.categories, Store::new().categories);
    }

    #[test]
    fn test_override_keys_are_normalized_on_load() {
        let store = parse_snapshot(r#"{"aprendizado": {" Arroz ": "padaria"}}"#).unwrap();

        assert_eq!(store.overrides.get("arroz").map(String::as_str), Some("padaria"));
        assert_eq!(store.overrides.len(), 1);
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compras.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
