//! Loader configuration from YAML

use crate::remote::{FetchConfig, GraphApiConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Sqlite database file (defaults to the local data directory)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Scheme of the embedded deep link, as in `"fb://group/123"`
    #[serde(default = "default_deep_link_scheme")]
    pub deep_link_scheme: String,

    /// Group page fetching
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Remote group API
    #[serde(default)]
    pub graph_api: GraphApiConfig,
}

fn default_deep_link_scheme() -> String {
    "fb".to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            deep_link_scheme: default_deep_link_scheme(),
            fetch: FetchConfig::default(),
            graph_api: GraphApiConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LoaderConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values that cannot be defaulted away
    pub fn validate(&self) -> Result<()> {
        if self.deep_link_scheme.trim().is_empty() {
            anyhow::bail!("deep_link_scheme must not be empty");
        }
        if !self
            .deep_link_scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            anyhow::bail!(
                "deep_link_scheme '{}' is not a valid URL scheme",
                self.deep_link_scheme
            );
        }
        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("fetch.timeout_secs must be greater than zero");
        }
        if self.graph_api.timeout_secs == 0 {
            anyhow::bail!("graph_api.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Database path, falling back to `<data dir>/group-loader/groups.db`
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("group-loader")
                .join("groups.db")
        })
    }
}
