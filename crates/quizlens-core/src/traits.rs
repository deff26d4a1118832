//! Store trait definitions for attempt logs and question reports.
//!
//! These async traits are implemented by the `quizlens-store` crate and
//! injected into the analytics engine by reference, so tests can substitute
//! fakes without any global state.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::AttemptRecord;
use crate::reports::{NewReport, Report, ReportStatus, ReportType, ReportedQuestion};

// ---------------------------------------------------------------------------
// Attempt store
// ---------------------------------------------------------------------------

/// Append-only log of completed quiz attempts.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Bulk-read the attempt log, optionally scoped by a filter.
    async fn list_all(&self, filter: Option<AttemptFilter>)
        -> Result<Vec<AttemptRecord>, StoreError>;

    /// Append one completed attempt to the log.
    async fn record(&self, attempt: AttemptRecord) -> Result<(), StoreError>;
}

/// Optional scoping for attempt reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttemptFilter {
    /// Only attempts completed at or after this instant.
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    /// Only attempts by this user.
    #[serde(default)]
    pub user_name: Option<String>,
}

impl AttemptFilter {
    pub fn matches(&self, attempt: &AttemptRecord) -> bool {
        if let Some(since) = self.since {
            if attempt.created_at < since {
                return false;
            }
        }
        if let Some(user) = &self.user_name {
            if attempt.user_name.as_deref() != Some(user.as_str()) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Report store
// ---------------------------------------------------------------------------

/// User-submitted question reports with their review workflow.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// File a new report; it starts in `pending` status.
    async fn create(&self, params: NewReport) -> Result<Report, StoreError>;

    /// All reports for one question, newest first.
    async fn get_by_question_id(&self, question_id: &str) -> Result<Vec<Report>, StoreError>;

    /// All reports, newest first, optionally filtered by status and capped.
    async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<Report>, StoreError>;

    /// Questions with the most reports, descending by count.
    async fn most_reported(&self, limit: usize) -> Result<Vec<ReportedQuestion>, StoreError>;

    /// Report count per question id, across all statuses.
    async fn counts_by_question(&self) -> Result<HashMap<String, u64>, StoreError>;

    /// Number of reports still pending review.
    async fn pending_count(&self) -> Result<usize, StoreError>;

    /// Report count grouped by report type, in type order.
    async fn counts_by_type(&self) -> Result<BTreeMap<ReportType, u64>, StoreError>;

    /// Apply a review decision. Returns the updated report, or `None` if the
    /// id is unknown.
    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
        reviewer: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Option<Report>, StoreError>;

    /// Delete a report. Returns `true` if one was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
