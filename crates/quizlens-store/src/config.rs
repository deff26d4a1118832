//! Configuration loading and store construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizlens_core::engine::AnalyticsConfig;
use quizlens_core::traits::{AttemptStore, ReportStore};

use crate::json::{JsonAttemptStore, JsonReportStore};

/// Where the JSON stores live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the data files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Attempt log file name, relative to `data_dir`.
    #[serde(default = "default_attempts_file")]
    pub attempts_file: String,
    /// Report store file name, relative to `data_dir`.
    #[serde(default = "default_reports_file")]
    pub reports_file: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./quizlens-data")
}
fn default_attempts_file() -> String {
    "attempts.json".to_string()
}
fn default_reports_file() -> String {
    "reports.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            attempts_file: default_attempts_file(),
            reports_file: default_reports_file(),
        }
    }
}

impl StorageConfig {
    pub fn attempts_path(&self) -> PathBuf {
        self.data_dir.join(&self.attempts_file)
    }

    pub fn reports_path(&self) -> PathBuf {
        self.data_dir.join(&self.reports_file)
    }

    /// Open both JSON stores as trait objects ready for engine injection.
    pub fn open_stores(&self) -> Result<(Arc<dyn AttemptStore>, Arc<dyn ReportStore>)> {
        let attempts = JsonAttemptStore::open(self.attempts_path())
            .with_context(|| format!("failed to open attempt store in {}", self.data_dir.display()))?;
        let reports = JsonReportStore::open(self.reports_path())
            .with_context(|| format!("failed to open report store in {}", self.data_dir.display()))?;
        Ok((Arc::new(attempts), Arc::new(reports)))
    }
}

/// Top-level quizlens configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizlensConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    /// Threshold knobs forwarded to the analytics engine.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizlens.toml` in the current directory
/// 2. `~/.config/quizlens/config.toml`
///
/// Environment variable override: `QUIZLENS_DATA_DIR`.
pub fn load_config() -> Result<QuizlensConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizlensConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizlens.toml");
        if local.exists() {
            Some(local)
        } else if let Some(global) = dirs_path().map(|d| d.join("config.toml")) {
            global.exists().then_some(global)
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizlensConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizlensConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZLENS_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(dir);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizlens"))
}

/// Render the default config as commented TOML, for `quizlens init`.
pub fn default_config_toml() -> String {
    let config = QuizlensConfig::default();
    // Defaults always serialize.
    toml::to_string_pretty(&config).unwrap_or_default()
}
