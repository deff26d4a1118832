//! JSON-file-backed stores, the CLI's default persistence.
//!
//! Each store owns one JSON file holding an array of rows. The file is
//! decoded once at open time; mutations update the in-memory rows and then
//! rewrite the whole file. Works well at the scale of a quiz site's attempt
//! log; anything bigger belongs in a real database behind the same traits.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use quizlens_core::error::StoreError;
use quizlens_core::model::AttemptRecord;
use quizlens_core::reports::{NewReport, Report, ReportStatus, ReportType, ReportedQuestion};
use quizlens_core::traits::{AttemptFilter, AttemptStore, ReportStore};

use crate::memory::{list_view, most_reported_view, question_counts_view, type_counts_view};

/// Decode a JSON array file; a missing file is an empty store.
fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Rewrite the backing file. Goes through a sibling temp file and rename so
/// a crash mid-write never leaves a truncated store behind.
fn persist_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(rows)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Attempt store
// ---------------------------------------------------------------------------

/// Attempt log persisted as a JSON array file.
#[derive(Debug)]
pub struct JsonAttemptStore {
    path: PathBuf,
    attempts: Mutex<Vec<AttemptRecord>>,
}

impl JsonAttemptStore {
    /// Open the store, decoding the file if it exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let attempts = load_rows(&path)?;
        tracing::debug!(path = %path.display(), rows = attempts.len(), "opened attempt store");
        Ok(Self {
            path,
            attempts: Mutex::new(attempts),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AttemptStore for JsonAttemptStore {
    async fn list_all(
        &self,
        filter: Option<AttemptFilter>,
    ) -> Result<Vec<AttemptRecord>, StoreError> {
        let attempts = self.attempts.lock().unwrap();
        let filter = filter.unwrap_or_default();
        Ok(attempts.iter().filter(|a| filter.matches(a)).cloned().collect())
    }

    async fn record(&self, attempt: AttemptRecord) -> Result<(), StoreError> {
        let mut attempts = self.attempts.lock().unwrap();
        attempts.push(attempt);
        persist_rows(&self.path, &attempts)
    }
}

// ---------------------------------------------------------------------------
// Report store
// ---------------------------------------------------------------------------

/// Report store persisted as a JSON array file.
pub struct JsonReportStore {
    path: PathBuf,
    reports: Mutex<Vec<Report>>,
}

impl JsonReportStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let reports = load_rows(&path)?;
        tracing::debug!(path = %path.display(), rows = reports.len(), "opened report store");
        Ok(Self {
            path,
            reports: Mutex::new(reports),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportStore for JsonReportStore {
    async fn create(&self, params: NewReport) -> Result<Report, StoreError> {
        let report = Report::new(params);
        let mut reports = self.reports.lock().unwrap();
        reports.push(report.clone());
        persist_rows(&self.path, &reports)?;
        Ok(report)
    }

    async fn get_by_question_id(&self, question_id: &str) -> Result<Vec<Report>, StoreError> {
        let reports = self.reports.lock().unwrap();
        let mut rows: Vec<Report> = reports
            .iter()
            .filter(|r| r.question_id == question_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<Report>, StoreError> {
        Ok(list_view(&self.reports.lock().unwrap(), status, limit))
    }

    async fn most_reported(&self, limit: usize) -> Result<Vec<ReportedQuestion>, StoreError> {
        Ok(most_reported_view(&self.reports.lock().unwrap(), limit))
    }

    async fn counts_by_question(&self) -> Result<HashMap<String, u64>, StoreError> {
        Ok(question_counts_view(&self.reports.lock().unwrap()))
    }

    async fn pending_count(&self) -> Result<usize, StoreError> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == ReportStatus::Pending)
            .count())
    }

    async fn counts_by_type(&self) -> Result<BTreeMap<ReportType, u64>, StoreError> {
        Ok(type_counts_view(&self.reports.lock().unwrap()))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
        reviewer: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Option<Report>, StoreError> {
        let mut reports = self.reports.lock().unwrap();
        let updated = match reports.iter_mut().find(|r| r.id == id) {
            Some(report) => {
                report.mark_reviewed(status, reviewer, notes);
                Some(report.clone())
            }
            None => None,
        };
        if updated.is_some() {
            persist_rows(&self.path, &reports)?;
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut reports = self.reports.lock().unwrap();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        let removed = reports.len() < before;
        if removed {
            persist_rows(&self.path, &reports)?;
        }
        Ok(removed)
    }
}
