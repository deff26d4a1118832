//! Core data model types for quizlens.
//!
//! These are the fundamental types the entire quizlens system uses to
//! represent completed quiz attempts and their per-question outcomes.
//! An attempt log is append-only: records are never mutated after creation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed quiz submission with its ordered per-question outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Unique identifier for this attempt.
    pub id: Uuid,
    /// Which quiz mode was played.
    pub mode: QuizMode,
    /// Topic name, if the quiz was scoped to one.
    #[serde(default)]
    pub topic: Option<String>,
    /// Subtopic name, if the quiz was scoped to one.
    #[serde(default)]
    pub subtopic: Option<String>,
    /// Difficulty level ("easy", "average", "difficult", "mixed").
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Name of the quiz taker.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Score as a percentage (0-100).
    #[serde(default)]
    pub score: f64,
    /// Time taken in seconds, when recorded.
    #[serde(default)]
    pub time_taken_secs: Option<u64>,
    /// When the attempt was completed.
    pub created_at: DateTime<Utc>,
    /// The recorded result of each question, in presentation order.
    #[serde(default)]
    pub outcomes: Vec<AnswerOutcome>,
}

impl AttemptRecord {
    /// Build a new attempt record, deriving the score from the outcomes.
    pub fn new(mode: QuizMode, outcomes: Vec<AnswerOutcome>) -> Self {
        let total = outcomes.len();
        let correct = outcomes.iter().filter(|o| o.is_correct).count();
        let score = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        };
        Self {
            id: Uuid::new_v4(),
            mode,
            topic: None,
            subtopic: None,
            difficulty: None,
            user_name: None,
            score,
            time_taken_secs: None,
            created_at: Utc::now(),
            outcomes,
        }
    }
}

/// The recorded result of one question within one attempt.
///
/// Topic/subtopic/difficulty are denormalized snapshots of the question at
/// attempt time; when absent they fall back to the attempt-level values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOutcome {
    /// Identifier of the question. An empty id marks a malformed entry,
    /// which aggregation skips without aborting the scan.
    #[serde(default)]
    pub question_id: String,
    /// The question text as shown to the user.
    #[serde(default)]
    pub question_text: String,
    /// The correct answer (option index or free text).
    #[serde(default)]
    pub correct_answer: Option<AnswerValue>,
    /// Option texts, present only for multiple-choice questions.
    #[serde(default)]
    pub options: Option<Vec<String>>,
    /// What the user answered. Absent entries on incorrect outcomes still
    /// count as incorrect but are excluded from wrong-answer distributions.
    #[serde(default)]
    pub user_answer: Option<AnswerValue>,
    /// Whether the user's answer was correct.
    #[serde(default)]
    pub is_correct: bool,
    /// Topic snapshot at attempt time.
    #[serde(default)]
    pub topic: Option<String>,
    /// Subtopic snapshot at attempt time.
    #[serde(default)]
    pub subtopic: Option<String>,
    /// Difficulty snapshot at attempt time.
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl AnswerOutcome {
    /// True when the outcome carries a usable question id.
    pub fn has_question_id(&self) -> bool {
        !self.question_id.is_empty()
    }
}

/// An answer value: either a multiple-choice option index or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Zero-based option index for multiple-choice questions.
    Choice(u32),
    /// Literal text for identification (free-text) questions.
    Text(String),
}

impl AnswerValue {
    /// The canonical string key used in all distribution maps. A choice
    /// renders as its index ("2"), free text as-is.
    pub fn label(&self) -> String {
        match self {
            AnswerValue::Choice(i) => i.to_string(),
            AnswerValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Choice(i) => write!(f, "{i}"),
            AnswerValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Supported quiz modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Elimination,
    Finals,
    Review,
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Elimination => write!(f, "elimination"),
            QuizMode::Finals => write!(f, "finals"),
            QuizMode::Review => write!(f, "review"),
        }
    }
}

impl FromStr for QuizMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elimination" => Ok(QuizMode::Elimination),
            "finals" => Ok(QuizMode::Finals),
            "review" => Ok(QuizMode::Review),
            other => Err(format!("unknown quiz mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_mode_display_and_parse() {
        assert_eq!(QuizMode::Elimination.to_string(), "elimination");
        assert_eq!(QuizMode::Finals.to_string(), "finals");
        assert_eq!("review".parse::<QuizMode>().unwrap(), QuizMode::Review);
        assert_eq!("Finals".parse::<QuizMode>().unwrap(), QuizMode::Finals);
        assert!("practice".parse::<QuizMode>().is_err());
    }

    #[test]
    fn answer_value_labels() {
        assert_eq!(AnswerValue::Choice(2).label(), "2");
        assert_eq!(
            AnswerValue::Text("Parent-child relationship".into()).label(),
            "Parent-child relationship"
        );
    }

    #[test]
    fn answer_value_untagged_serde() {
        let choice: AnswerValue = serde_json::from_str("3").unwrap();
        assert_eq!(choice, AnswerValue::Choice(3));
        let text: AnswerValue = serde_json::from_str("\"inheritance\"").unwrap();
        assert_eq!(text, AnswerValue::Text("inheritance".into()));
        assert_eq!(serde_json::to_string(&choice).unwrap(), "3");
    }

    #[test]
    fn attempt_record_derives_score() {
        let outcomes = vec![
            AnswerOutcome {
                question_id: "q1".into(),
                question_text: "?".into(),
                correct_answer: Some(AnswerValue::Choice(0)),
                options: None,
                user_answer: Some(AnswerValue::Choice(0)),
                is_correct: true,
                topic: None,
                subtopic: None,
                difficulty: None,
            },
            AnswerOutcome {
                question_id: "q2".into(),
                question_text: "?".into(),
                correct_answer: Some(AnswerValue::Choice(1)),
                options: None,
                user_answer: Some(AnswerValue::Choice(0)),
                is_correct: false,
                topic: None,
                subtopic: None,
                difficulty: None,
            },
        ];
        let attempt = AttemptRecord::new(QuizMode::Elimination, outcomes);
        assert!((attempt.score - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn outcome_missing_fields_decode_with_defaults() {
        let json = r#"{"question_text": "orphan outcome"}"#;
        let outcome: AnswerOutcome = serde_json::from_str(json).unwrap();
        assert!(!outcome.has_question_id());
        assert!(!outcome.is_correct);
        assert!(outcome.user_answer.is_none());
    }
}
