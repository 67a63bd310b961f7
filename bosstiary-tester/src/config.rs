use anyhow::{Context, Result};
use bosstiary_game::{MonsterCatalog, ServiceConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings read from `--config`. Command line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TesterConfig {
    #[serde(default = "TesterConfig::default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub content_path: Option<PathBuf>,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            store_path: Self::default_store_path(),
            content_path: None,
            rng_seed: None,
        }
    }
}

impl TesterConfig {
    fn default_store_path() -> PathBuf {
        PathBuf::from("data/boosted_boss.json")
    }

    /// Read the config file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Apply command line overrides.
    #[must_use]
    pub fn with_overrides(
        mut self,
        store_path: Option<PathBuf>,
        content_path: Option<PathBuf>,
        rng_seed: Option<u64>,
    ) -> Self {
        if let Some(store_path) = store_path {
            self.store_path = store_path;
        }
        if content_path.is_some() {
            self.content_path = content_path;
        }
        if rng_seed.is_some() {
            self.rng_seed = rng_seed;
        }
        self
    }

    #[must_use]
    pub const fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            rng_seed: self.rng_seed,
        }
    }

    /// Monster definitions from `content_path`, or the bundled catalog.
    pub fn load_catalog(&self) -> Result<MonsterCatalog> {
        let Some(path) = self.content_path.as_deref() else {
            return Ok(MonsterCatalog::load_from_static());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read monster content {}", path.display()))?;
        MonsterCatalog::from_json(&raw)
            .with_context(|| format!("failed to parse monster content {}", path.display()))
    }
}
