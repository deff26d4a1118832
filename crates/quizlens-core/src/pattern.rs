//! Deep single-question answer-pattern analysis.
//!
//! Produces the full answer distribution for one question plus
//! natural-language insights: revision flags, guess detection (evenly
//! distributed answers), and dead-distractor detection (options nobody
//! picks).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::AttemptRecord;
use crate::statistics::{aggregate_outcomes, percentage, QuestionTally};

/// Success rate below which the question is flagged for revision.
const REVISION_THRESHOLD: f64 = 40.0;

/// Minimum distinct observed answers before guess detection applies.
const GUESS_MIN_CHOICES: usize = 3;

/// Deep-dive view of one question's answer behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub question_id: String,
    pub question_info: QuestionInfo,
    pub statistics: PatternStatistics,
    /// Share of every observed answer, keyed by its canonical label.
    pub answer_distribution: BTreeMap<String, AnswerShare>,
    pub insights: Vec<String>,
}

/// Question metadata as first observed in the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionInfo {
    pub question_text: String,
    pub correct_answer: Option<String>,
    /// Option texts, present only for multiple-choice questions.
    pub options: Option<Vec<String>>,
}

/// Core counters for the analyzed question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternStatistics {
    pub total_attempts: u64,
    pub correct_count: u64,
    pub incorrect_count: u64,
    pub success_rate: f64,
}

/// How often one answer was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerShare {
    pub count: u64,
    /// Share of all attempts on this question, one decimal.
    pub percentage: f64,
    pub is_correct: bool,
}

/// Analyze the answer pattern of one question across the whole log.
///
/// Returns `None` when no outcome references the question id, which
/// distinguishes "never attempted" from "zero successes".
pub fn analyze_answer_pattern(
    attempts: &[AttemptRecord],
    question_id: &str,
) -> Option<PatternAnalysis> {
    let tallies = aggregate_outcomes(attempts);
    let tally = tallies.get(question_id)?;
    Some(analyze_tally(tally))
}

/// Build the pattern view from an existing tally.
pub fn analyze_tally(tally: &QuestionTally) -> PatternAnalysis {
    let correct_label = tally.correct_answer.as_ref().map(|a| a.label());

    let answer_distribution: BTreeMap<String, AnswerShare> = tally
        .answer_counts
        .iter()
        .map(|(label, &count)| {
            let share = AnswerShare {
                count,
                percentage: percentage(count, tally.total_attempts),
                is_correct: correct_label.as_deref() == Some(label.as_str()),
            };
            (label.clone(), share)
        })
        .collect();

    let insights = derive_insights(tally, &answer_distribution, correct_label.as_deref());

    PatternAnalysis {
        question_id: tally.question_id.clone(),
        question_info: QuestionInfo {
            question_text: tally.question_text.clone(),
            correct_answer: correct_label,
            options: tally.options.clone(),
        },
        statistics: PatternStatistics {
            total_attempts: tally.total_attempts,
            correct_count: tally.correct_count,
            incorrect_count: tally.incorrect_count,
            success_rate: tally.success_rate(),
        },
        answer_distribution,
        insights,
    }
}

fn derive_insights(
    tally: &QuestionTally,
    distribution: &BTreeMap<String, AnswerShare>,
    correct_label: Option<&str>,
) -> Vec<String> {
    let mut insights = Vec::new();

    if tally.success_rate() < REVISION_THRESHOLD {
        insights.push(format!(
            "Success rate below {REVISION_THRESHOLD}% - consider revising this question"
        ));
    }

    // Evenly spread answers across 3+ choices suggest users are guessing.
    if distribution.len() >= GUESS_MIN_CHOICES {
        let max = distribution.values().map(|s| s.count).max().unwrap_or(0);
        let min = distribution.values().map(|s| s.count).min().unwrap_or(0);
        if ((max - min) as f64) < 0.2 * tally.total_attempts as f64 {
            insights.push(
                "Answers are evenly distributed - may indicate guessing".to_string(),
            );
        }
    }

    // Multiple choice only: a non-correct option nobody picks is dead weight.
    if let Some(options) = &tally.options {
        for (index, text) in options.iter().enumerate() {
            let label = index.to_string();
            if correct_label == Some(label.as_str()) {
                continue;
            }
            if !distribution.contains_key(&label) {
                insights.push(format!(
                    "Option {index} ('{text}') was never selected - may be too obviously wrong"
                ));
            }
        }
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOutcome, AnswerValue, QuizMode};

    fn mc_outcome(user: u32, is_correct: bool) -> AnswerOutcome {
        AnswerOutcome {
            question_id: "q1".into(),
            question_text: "What is encapsulation?".into(),
            correct_answer: Some(AnswerValue::Choice(0)),
            options: Some(vec![
                "Data hiding".into(),
                "Data protection".into(),
                "Data polymorphism".into(),
                "Data abstraction".into(),
            ]),
            user_answer: Some(AnswerValue::Choice(user)),
            is_correct,
            topic: None,
            subtopic: None,
            difficulty: None,
        }
    }

    fn log_of(outcomes: Vec<AnswerOutcome>) -> Vec<AttemptRecord> {
        outcomes
            .into_iter()
            .map(|o| AttemptRecord::new(QuizMode::Finals, vec![o]))
            .collect()
    }

    #[test]
    fn unknown_question_returns_none() {
        let log = log_of(vec![mc_outcome(0, true)]);
        assert!(analyze_answer_pattern(&log, "nope").is_none());
    }

    #[test]
    fn distribution_covers_all_observed_answers() {
        let mut outcomes = vec![mc_outcome(0, true), mc_outcome(0, true)];
        outcomes.push(mc_outcome(2, false));
        outcomes.push(mc_outcome(3, false));
        let pattern = analyze_answer_pattern(&log_of(outcomes), "q1").unwrap();

        assert_eq!(pattern.statistics.total_attempts, 4);
        assert_eq!(pattern.answer_distribution.len(), 3);

        let correct = &pattern.answer_distribution["0"];
        assert!(correct.is_correct);
        assert_eq!(correct.count, 2);
        assert!((correct.percentage - 50.0).abs() < f64::EPSILON);

        let wrong = &pattern.answer_distribution["2"];
        assert!(!wrong.is_correct);
        for share in pattern.answer_distribution.values() {
            assert!(share.percentage >= 0.0 && share.percentage <= 100.0);
        }
    }

    #[test]
    fn low_success_rate_flags_revision() {
        let outcomes = vec![
            mc_outcome(0, true),
            mc_outcome(1, false),
            mc_outcome(2, false),
            mc_outcome(2, false),
        ];
        let pattern = analyze_answer_pattern(&log_of(outcomes), "q1").unwrap();
        assert!(pattern
            .insights
            .iter()
            .any(|i| i.contains("consider revising")));
    }

    /// Scenario: a 4-option question with answers split ~5/5/5/5.
    #[test]
    fn even_spread_indicates_guessing() {
        let mut outcomes = Vec::new();
        for _ in 0..5 {
            outcomes.push(mc_outcome(0, true));
        }
        for option in [1u32, 2, 3] {
            for _ in 0..5 {
                outcomes.push(mc_outcome(option, false));
            }
        }
        let pattern = analyze_answer_pattern(&log_of(outcomes), "q1").unwrap();
        assert!(pattern
            .insights
            .iter()
            .any(|i| i.contains("may indicate guessing")));
    }

    #[test]
    fn lopsided_spread_does_not_indicate_guessing() {
        let mut outcomes = Vec::new();
        for _ in 0..8 {
            outcomes.push(mc_outcome(0, true));
        }
        outcomes.push(mc_outcome(1, false));
        outcomes.push(mc_outcome(2, false));
        let pattern = analyze_answer_pattern(&log_of(outcomes), "q1").unwrap();
        assert!(!pattern
            .insights
            .iter()
            .any(|i| i.contains("may indicate guessing")));
    }

    /// Scenario: an option never chosen and not correct gets flagged.
    #[test]
    fn never_selected_option_is_flagged() {
        let outcomes = vec![
            mc_outcome(0, true),
            mc_outcome(0, true),
            mc_outcome(1, false),
            mc_outcome(2, false),
        ];
        let pattern = analyze_answer_pattern(&log_of(outcomes), "q1").unwrap();
        assert!(pattern
            .insights
            .iter()
            .any(|i| i.contains("Option 3") && i.contains("never selected")));
        // The correct option is never flagged.
        assert!(!pattern.insights.iter().any(|i| i.contains("Option 0")));
    }

    #[test]
    fn free_text_question_has_no_option_insights() {
        let outcomes = vec![AnswerOutcome {
            question_id: "q3".into(),
            question_text: "Explain inheritance".into(),
            correct_answer: Some(AnswerValue::Text("Parent-child relationship".into())),
            options: None,
            user_answer: Some(AnswerValue::Text("Parent-child relationship".into())),
            is_correct: true,
            topic: None,
            subtopic: None,
            difficulty: None,
        }];
        let pattern = analyze_answer_pattern(&log_of(outcomes), "q3").unwrap();
        assert!(pattern.question_info.options.is_none());
        assert!(!pattern
            .insights
            .iter()
            .any(|i| i.contains("never selected")));
    }
}
