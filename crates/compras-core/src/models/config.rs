//! Configuration structures for fetching, extraction and categorization.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ComprasError, Result};

use super::purchase::DEFAULT_STORE_NAME;

/// Main configuration for compras.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComprasConfig {
    /// Snapshot location.
    pub store: StoreConfig,

    /// HTTP fetch settings.
    pub fetch: FetchConfig,

    /// Receipt parsing settings.
    pub extraction: ExtractionConfig,

    /// Heuristic categorization.
    pub categories: CategoryConfig,
}

/// Snapshot location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON snapshot. Unset means the platform data directory.
    pub path: Option<PathBuf>,
}

/// HTTP fetch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header. Some receipt portals refuse non-browser clients.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Store name when the page header is missing.
    pub default_store_name: String,

    /// Rows whose lowercased name contains any of these are summary lines.
    pub filler_tokens: Vec<String>,

    /// Keep only the first row for each exact product name.
    pub dedup_by_name: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_store_name: DEFAULT_STORE_NAME.to_string(),
            filler_tokens: vec!["valor".to_string(), "total".to_string()],
            dedup_by_name: true,
        }
    }
}

/// One heuristic rule: any keyword in the lowercased name selects the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Keyword table, evaluated in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub keywords: Vec<KeywordRule>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            keywords: vec![
                KeywordRule::new("hortifruti", &["uva", "banana", "manga", "tomate", "papaia", "laranja"]),
                KeywordRule::new("padaria", &["pao", "forma", "bisnaguinha"]),
                KeywordRule::new("carnes", &["bovino", "frango", "acem", "alcatra", "peito", "sobrecoxa"]),
                KeywordRule::new(
                    "laticinios",
                    &["queijo", "leite", "mussarela", "muss", "iogurte", "creme leite"],
                ),
            ],
        }
    }
}

impl ComprasConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ComprasError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ComprasError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
