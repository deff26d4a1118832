//! In-memory stores for testing and ephemeral runs.
//!
//! Both stores keep their rows in a `Mutex<Vec<_>>`, which is plenty for the
//! analytics workloads here (full-scan reads, rare writes). The read-side
//! view helpers are shared with the JSON backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use quizlens_core::error::StoreError;
use quizlens_core::model::AttemptRecord;
use quizlens_core::reports::{NewReport, Report, ReportStatus, ReportType, ReportedQuestion};
use quizlens_core::traits::{AttemptFilter, AttemptStore, ReportStore};

// ---------------------------------------------------------------------------
// Shared read-side views
// ---------------------------------------------------------------------------

/// Group reports into the "most reported questions" view. Snapshots come
/// from the newest report carrying them; ties on count break by question id.
pub(crate) fn most_reported_view(reports: &[Report], limit: usize) -> Vec<ReportedQuestion> {
    let mut by_question: HashMap<&str, Vec<&Report>> = HashMap::new();
    for report in reports {
        by_question
            .entry(report.question_id.as_str())
            .or_default()
            .push(report);
    }

    let mut rows: Vec<ReportedQuestion> = by_question
        .into_iter()
        .map(|(question_id, group)| {
            let newest = group
                .iter()
                .max_by_key(|r| r.created_at)
                .copied()
                .unwrap_or(group[0]);
            ReportedQuestion {
                question_id: question_id.to_string(),
                question_text: newest.question_text.clone(),
                topic: newest.topic.clone(),
                subtopic: newest.subtopic.clone(),
                difficulty: newest.difficulty.clone(),
                report_count: group.len() as u64,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.report_count
            .cmp(&a.report_count)
            .then_with(|| a.question_id.cmp(&b.question_id))
    });
    rows.truncate(limit);
    rows
}

pub(crate) fn question_counts_view(reports: &[Report]) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for report in reports {
        *counts.entry(report.question_id.clone()).or_insert(0) += 1;
    }
    counts
}

pub(crate) fn type_counts_view(reports: &[Report]) -> BTreeMap<ReportType, u64> {
    let mut counts = BTreeMap::new();
    for report in reports {
        *counts.entry(report.report_type).or_insert(0) += 1;
    }
    counts
}

/// Newest-first listing with optional status filter and cap.
pub(crate) fn list_view(
    reports: &[Report],
    status: Option<ReportStatus>,
    limit: Option<usize>,
) -> Vec<Report> {
    let mut rows: Vec<Report> = reports
        .iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

// ---------------------------------------------------------------------------
// Attempt store
// ---------------------------------------------------------------------------

/// In-memory append-only attempt log.
#[derive(Default)]
pub struct MemoryAttemptStore {
    attempts: Mutex<Vec<AttemptRecord>>,
}

impl MemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the log, for tests and fixtures.
    pub fn with_attempts(attempts: Vec<AttemptRecord>) -> Self {
        Self {
            attempts: Mutex::new(attempts),
        }
    }

    pub fn len(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AttemptStore for MemoryAttemptStore {
    async fn list_all(
        &self,
        filter: Option<AttemptFilter>,
    ) -> Result<Vec<AttemptRecord>, StoreError> {
        let attempts = self.attempts.lock().unwrap();
        let filter = filter.unwrap_or_default();
        Ok(attempts.iter().filter(|a| filter.matches(a)).cloned().collect())
    }

    async fn record(&self, attempt: AttemptRecord) -> Result<(), StoreError> {
        self.attempts.lock().unwrap().push(attempt);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report store
// ---------------------------------------------------------------------------

/// In-memory report store with the full review workflow.
#[derive(Default)]
pub struct MemoryReportStore {
    reports: Mutex<Vec<Report>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reports(reports: Vec<Report>) -> Self {
        Self {
            reports: Mutex::new(reports),
        }
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn create(&self, params: NewReport) -> Result<Report, StoreError> {
        let report = Report::new(params);
        self.reports.lock().unwrap().push(report.clone());
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
        match reports.iter_mut().find(|r| r.id == id) {
            Some(report) => {
                report.mark_reviewed(status, reviewer, notes);
                Ok(Some(report.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut reports = self.reports.lock().unwrap();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        Ok(reports.len() < before)
    }
}
