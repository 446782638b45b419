//! CLI subcommands and the state they share.

pub mod category;
pub mod compare;
pub mod config;
pub mod history;
pub mod import;
pub mod list;
pub mod summary;

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tracing::debug;

use compras_core::models::config::ComprasConfig;
use compras_core::{JsonStore, Store};

/// Output format for reports.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Global options resolved once per invocation.
pub struct Context {
    config_path: Option<PathBuf>,
    store_path: Option<PathBuf>,
}

impl Context {
    pub fn new(config_path: Option<&str>, store_path: Option<PathBuf>) -> Self {
        Self {
            config_path: config_path.map(PathBuf::from),
            store_path,
        }
    }

    /// Config file this invocation reads and writes.
    pub fn config_path(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(default_config_path)
    }

    /// Load the explicit config file, else the default one if it exists, else defaults.
    pub fn load_config(&self) -> anyhow::Result<ComprasConfig> {
        if let Some(path) = &self.config_path {
            return Ok(ComprasConfig::from_file(path)?);
        }

        let path = default_config_path();
        if path.exists() {
            debug!("Using config file {}", path.display());
            Ok(ComprasConfig::from_file(&path)?)
        } else {
            Ok(ComprasConfig::default())
        }
    }

    /// Snapshot location: `--store`, then `store.path`, then the data directory.
    pub fn store_path(&self, config: &ComprasConfig) -> PathBuf {
        self.store_path
            .clone()
            .or_else(|| config.store.path.clone())
            .unwrap_or_else(default_store_path)
    }

    /// Load config, then open and read the store it points at.
    pub fn open_store(&self) -> anyhow::Result<(ComprasConfig, JsonStore, Store)> {
        let config = self.load_config()?;
        let storage = JsonStore::new(self.store_path(&config));
        let store = storage.load()?;
        Ok((config, storage, store))
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("compras")
        .join("config.json")
}

pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("compras").join("compras.json"))
        .unwrap_or_else(|| Path::new("compras.json").to_path_buf())
}

/// Convert a 1-based item number from the command line.
pub fn item_index(number: usize) -> anyhow::Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Item numbers start at 1"))
}

/// Amount with two decimals and a dot separator, for machine-readable output.
pub fn plain_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Serialize CSV rows into a string.
pub fn to_csv<I, R>(header: &[&str], rows: I) -> anyhow::Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}
