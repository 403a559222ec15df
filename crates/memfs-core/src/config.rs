//! Config - セッション全体の設定
//!
//! Defaults match the reference behavior: 4 workers, 2048-byte cap per entry,
//! 48 bytes of fixed overhead charged to every entry.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default worker-pool size.
pub const DEFAULT_WORKERS: usize = 4;

/// Default cap on `overhead + content length` for a single entry.
pub const DEFAULT_MAX_ENTRY_SIZE: usize = 2048;

/// Fixed per-entry header size counted against the cap.
pub const DEFAULT_ENTRY_OVERHEAD: usize = 48;

/// Session configuration.
///
/// Missing fields in a config file fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemfsConfig {
    /// Number of dispatcher worker threads (fixed for the session).
    pub workers: usize,

    /// Maximum serialized size of one entry, overhead included.
    pub max_entry_size: usize,

    /// Fixed overhead charged to every entry.
    pub entry_overhead: usize,
}

/// ConfigError は設定ファイルの読み込みエラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Default for MemfsConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            entry_overhead: DEFAULT_ENTRY_OVERHEAD,
        }
    }
}

impl MemfsConfig {
    /// Load a JSON config file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: MemfsConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_entry_size(mut self, max_entry_size: usize) -> Self {
        self.max_entry_size = max_entry_size;
        self
    }

    /// Fail-fast validation, called before any worker is spawned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.entry_overhead >= self.max_entry_size {
            return Err(ConfigError::Invalid(format!(
                "entry_overhead ({}) must be smaller than max_entry_size ({})",
                self.entry_overhead, self.max_entry_size
            )));
        }
        Ok(())
    }

    /// Content bytes an empty entry can still accept.
    pub fn content_capacity(&self) -> usize {
        self.max_entry_size.saturating_sub(self.entry_overhead)
    }
}
