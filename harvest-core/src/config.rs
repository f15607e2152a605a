//! Configuration for the harvest workspace.
//!
//! Maps directly to `harvest.toml`. Every section and field is optional;
//! missing values fall back to the defaults below.
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [patterns]
//! cache_capacity = 128
//!
//! [extraction]
//! maximum_matches = 50
//! max_window = 4096
//!
//! [list]
//! name = "links"
//! unique_values = true
//! ignore_case = true
//! retrieval_order = "fifo"
//!
//! [fetch]
//! timeout_ms = 10000
//! ```

use serde::{Deserialize, Serialize};

use crate::fragment::ExtractOptions;
use crate::retrieval::RetrievalOrder;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Compiled-pattern cache.
    #[serde(default)]
    pub patterns: PatternConfig,
    /// Default fragment extraction bounds.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Retrieval list behaviour.
    #[serde(default)]
    pub list: ListConfig,
    /// Fetch collaborator settings.
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl HarvestConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `HarvestError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::HarvestError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error. `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Compiled-pattern cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Maximum compiled patterns kept; 0 disables caching.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Default bounds applied to extractions built from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Fragment cap; 0 is unbounded.
    #[serde(default)]
    pub maximum_matches: usize,
    /// End-search window in characters; 0 is unbounded.
    #[serde(default)]
    pub max_window: usize,
}

impl ExtractionConfig {
    /// Options with these bounds and every start/end selected.
    #[must_use]
    pub fn options(&self) -> ExtractOptions {
        ExtractOptions::all()
            .with_maximum_matches(self.maximum_matches)
            .with_max_window(self.max_window)
    }
}

/// Retrieval list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Name reported in errors and logs.
    #[serde(default)]
    pub name: String,
    /// Refuse values equal to any value ever stored, consumed or not.
    #[serde(default = "default_true")]
    pub unique_values: bool,
    /// Compare textual values without regard to case.
    #[serde(default)]
    pub ignore_case: bool,
    /// Which unconsumed item `take` returns.
    #[serde(default)]
    pub retrieval_order: RetrievalOrder,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            unique_values: true,
            ignore_case: false,
            retrieval_order: RetrievalOrder::default(),
        }
    }
}

impl ListConfig {
    /// A named list with default behaviour.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set uniqueness.
    #[must_use]
    pub fn with_unique_values(mut self, unique_values: bool) -> Self {
        self.unique_values = unique_values;
        self
    }

    /// Set case handling for textual values.
    #[must_use]
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Set the retrieval order.
    #[must_use]
    pub fn with_order(mut self, retrieval_order: RetrievalOrder) -> Self {
        self.retrieval_order = retrieval_order;
        self
    }
}

/// Fetch collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User agent sent when a request carries no headers of its own.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Hard timeout for one request in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_cache_capacity() -> usize { 64 }
fn default_timeout_ms() -> u64 { 30_000 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string()
}
