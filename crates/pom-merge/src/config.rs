use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, MergeResult};

/// Settings for a merge run.
///
/// Every field is optional in a config file; missing fields take their
/// default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Maximum number of pipeline tasks running at once.
    pub parallelism: usize,
    /// Narrate pipeline stages on stdout.
    pub verbose: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            parallelism: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            verbose: false,
        }
    }
}

impl MergeConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> MergeResult<Self> {
        toml::from_str(text).map_err(|e| {
            MergeError::Argument(format!("invalid configuration: {}", e.message()))
        })
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> MergeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MergeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            MergeError::Argument(message) => {
                MergeError::Argument(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Builder: override the worker pool size.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Builder: override verbosity.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
