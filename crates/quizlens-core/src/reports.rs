//! User-submitted question reports and their review workflow types.
//!
//! A report flags a suspected content problem with a question. Status
//! transitions (pending -> reviewed | resolved | dismissed) are owned by the
//! review workflow in the store layer; the analytics engine only reads them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuizMode;

/// What kind of problem the reporter is flagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    IncorrectAnswer,
    UnclearQuestion,
    Typo,
    Outdated,
    Other,
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::IncorrectAnswer => write!(f, "incorrect_answer"),
            ReportType::UnclearQuestion => write!(f, "unclear_question"),
            ReportType::Typo => write!(f, "typo"),
            ReportType::Outdated => write!(f, "outdated"),
            ReportType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "incorrect_answer" => Ok(ReportType::IncorrectAnswer),
            "unclear_question" => Ok(ReportType::UnclearQuestion),
            "typo" => Ok(ReportType::Typo),
            "outdated" => Ok(ReportType::Outdated),
            "other" => Ok(ReportType::Other),
            other => Err(format!("unknown report type: {other}")),
        }
    }
}

/// Review status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Reviewed => write!(f, "reviewed"),
            ReportStatus::Resolved => write!(f, "resolved"),
            ReportStatus::Dismissed => write!(f, "dismissed"),
        }
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "reviewed" => Ok(ReportStatus::Reviewed),
            "resolved" => Ok(ReportStatus::Resolved),
            "dismissed" => Ok(ReportStatus::Dismissed),
            other => Err(format!("unknown report status: {other}")),
        }
    }
}

/// A user-submitted question report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique report identifier.
    pub id: Uuid,
    /// The reported question.
    pub question_id: String,
    /// Category of the reported problem.
    pub report_type: ReportType,
    /// Free-text explanation from the reporter.
    #[serde(default)]
    pub reason: Option<String>,
    /// Name of the reporter.
    #[serde(default)]
    pub reporter: Option<String>,
    /// Question text snapshot for reviewer convenience.
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub subtopic: Option<String>,
    #[serde(default)]
    pub quiz_mode: Option<QuizMode>,
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Full question payload at report time. Opaque to the engine.
    #[serde(default)]
    pub question_data: Option<serde_json::Value>,
    /// Current review status.
    pub status: ReportStatus,
    /// When the report was filed.
    pub created_at: DateTime<Utc>,
    /// Reviewer name, set when the report leaves `pending`.
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_notes: Option<String>,
}

impl Report {
    /// Create a pending report from submission parameters.
    pub fn new(params: NewReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_id: params.question_id,
            report_type: params.report_type,
            reason: params.reason,
            reporter: params.reporter,
            question_text: params.question_text,
            topic: params.topic,
            subtopic: params.subtopic,
            quiz_mode: params.quiz_mode,
            difficulty: params.difficulty,
            question_data: params.question_data,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
        }
    }

    /// Apply a review decision, recording who made it and when.
    pub fn mark_reviewed(
        &mut self,
        status: ReportStatus,
        reviewer: Option<&str>,
        notes: Option<&str>,
    ) {
        self.status = status;
        self.reviewed_by = reviewer.map(str::to_string);
        self.reviewed_at = Some(Utc::now());
        self.review_notes = notes.map(str::to_string);
    }
}

/// Parameters for filing a new report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReport {
    pub question_id: String,
    pub report_type: ReportType,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reporter: Option<String>,
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub subtopic: Option<String>,
    #[serde(default)]
    pub quiz_mode: Option<QuizMode>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub question_data: Option<serde_json::Value>,
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::Other
    }
}

impl NewReport {
    pub fn new(question_id: impl Into<String>, report_type: ReportType) -> Self {
        Self {
            question_id: question_id.into(),
            report_type,
            ..Default::default()
        }
    }
}

/// One row of the "most reported questions" view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportedQuestion {
    pub question_id: String,
    pub question_text: Option<String>,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub difficulty: Option<String>,
    pub report_count: u64,
}
