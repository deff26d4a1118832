//! Command implementations.

pub mod details;
pub mod improve;
pub mod init;
pub mod pattern;
pub mod reports;
pub mod stats;
pub mod summary;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use quizlens_core::engine::AnalyticsEngine;
use quizlens_core::traits::ReportStore;
use quizlens_store::load_config_from;

/// Build the engine from config, opening the JSON stores.
pub(crate) fn build_engine(config_path: Option<&Path>) -> Result<AnalyticsEngine> {
    let config = load_config_from(config_path)?;
    let (attempts, reports) = config.storage.open_stores()?;
    Ok(AnalyticsEngine::new(attempts, reports, config.analytics))
}

/// Open just the report store, for the report management commands.
pub(crate) fn open_report_store(config_path: Option<&Path>) -> Result<Arc<dyn ReportStore>> {
    let config = load_config_from(config_path)?;
    let (_, reports) = config.storage.open_stores()?;
    Ok(reports)
}
