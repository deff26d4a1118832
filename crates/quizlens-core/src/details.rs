//! Detailed per-question report merging attempt statistics with user
//! reports.
//!
//! For multiple-choice questions the answer analysis covers every option
//! index, including options nobody selected, so a caller can render a
//! complete chart. Free-text questions list only the observed wrong answers
//! (top 10 by frequency) since the answer universe is unbounded.

use serde::{Deserialize, Serialize};

use crate::insight::{priority_score, DEFAULT_MAX_SUCCESS_RATE};
use crate::reports::Report;
use crate::statistics::{percentage, QuestionTally};

/// How many observed wrong answers a free-text question exposes.
const FREE_TEXT_ANSWER_LIMIT: usize = 10;

/// Everything a content maintainer needs to judge one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDetails {
    pub question_id: String,
    pub question_text: String,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub difficulty: Option<String>,
    pub total_attempts: u64,
    pub correct_count: u64,
    pub incorrect_count: u64,
    pub success_rate: f64,
    pub report_count: u64,
    /// Same formula as the improvement ranking; zero when the question has
    /// fewer than `min_attempts` attempts.
    pub priority_score: f64,
    pub needs_improvement: bool,
    pub has_sufficient_data: bool,
    pub answer_analysis: Vec<AnswerAnalysis>,
    /// The question's reports, as read from the report store.
    pub reports: Vec<Report>,
}

/// One row of a question's answer breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerAnalysis {
    /// Multiple choice: one entry per option index, zero-selection options
    /// included.
    MultipleChoice {
        option_index: usize,
        option_text: String,
        is_correct: bool,
        frequency: u64,
        percentage: f64,
    },
    /// Free text: one entry per observed wrong answer.
    FreeText {
        answer_text: String,
        is_correct: bool,
        frequency: u64,
        percentage: f64,
    },
}

/// Build the detailed report for one question.
///
/// Returns `None` only when the question is entirely unknown: zero outcomes
/// in the log and zero reports filed. A reported-but-never-attempted
/// question still surfaces with zeroed statistics.
pub fn question_details(
    question_id: &str,
    tally: Option<&QuestionTally>,
    reports: Vec<Report>,
    min_attempts: u64,
) -> Option<QuestionDetails> {
    if tally.is_none() && reports.is_empty() {
        return None;
    }

    let report_count = reports.len() as u64;
    let (total, correct, incorrect, success_rate) = match tally {
        Some(t) => (
            t.total_attempts,
            t.correct_count,
            t.incorrect_count,
            t.success_rate(),
        ),
        None => (0, 0, 0, 0.0),
    };

    let has_sufficient_data = total >= min_attempts;
    let score = if has_sufficient_data {
        priority_score(success_rate, total, report_count)
    } else {
        0.0
    };

    Some(QuestionDetails {
        question_id: question_id.to_string(),
        question_text: tally.map(|t| t.question_text.clone()).unwrap_or_else(|| {
            reports
                .iter()
                .find_map(|r| r.question_text.clone())
                .unwrap_or_default()
        }),
        topic: tally.and_then(|t| t.topic.clone()),
        subtopic: tally.and_then(|t| t.subtopic.clone()),
        difficulty: tally.and_then(|t| t.difficulty.clone()),
        total_attempts: total,
        correct_count: correct,
        incorrect_count: incorrect,
        success_rate,
        report_count,
        priority_score: score,
        needs_improvement: success_rate < DEFAULT_MAX_SUCCESS_RATE && has_sufficient_data,
        has_sufficient_data,
        answer_analysis: tally.map(answer_analysis).unwrap_or_default(),
        reports,
    })
}

/// Per-answer breakdown for one tally.
fn answer_analysis(tally: &QuestionTally) -> Vec<AnswerAnalysis> {
    let correct_label = tally.correct_answer.as_ref().map(|a| a.label());

    match &tally.options {
        // Multiple choice: complete chart over the option universe.
        Some(options) => options
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let label = index.to_string();
                let frequency = tally.answer_counts.get(&label).copied().unwrap_or(0);
                AnswerAnalysis::MultipleChoice {
                    option_index: index,
                    option_text: text.clone(),
                    is_correct: correct_label.as_deref() == Some(label.as_str()),
                    frequency,
                    percentage: percentage(frequency, tally.total_attempts),
                }
            })
            .collect(),
        // Free text: observed wrong answers only, most frequent first.
        None => tally
            .wrong_answer_summary(FREE_TEXT_ANSWER_LIMIT)
            .into_iter()
            .map(|entry| AnswerAnalysis::FreeText {
                answer_text: entry.answer,
                is_correct: false,
                frequency: entry.count,
                percentage: percentage(entry.count, tally.total_attempts),
            })
            .collect(),
    }
}
