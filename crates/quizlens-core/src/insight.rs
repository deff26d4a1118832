//! Priority ranking and qualitative insight generation for content review.
//!
//! Combines the aggregation tallies with per-question report counts to
//! surface the questions most worth a maintainer's attention.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::statistics::{QuestionTally, WrongAnswerCount};

/// Success-rate ceiling below which a question counts as needing work.
pub const DEFAULT_MAX_SUCCESS_RATE: f64 = 60.0;

/// A dominant wrong answer above this share of incorrect responses is
/// flagged as a misleading distractor.
const MISLEADING_DISTRACTOR_SHARE: f64 = 70.0;

/// Additive priority heuristic.
///
/// Rewards low success rate; the sample-size bonus saturates at 20 (reached
/// at 200 attempts) so high-volume questions aren't over-weighted; each user
/// report contributes a flat 10 points since reports are a stronger, rarer
/// signal than a single wrong answer.
pub fn priority_score(success_rate: f64, total_attempts: u64, report_count: u64) -> f64 {
    (100.0 - success_rate)
        + (total_attempts as f64 / 10.0).min(20.0)
        + report_count as f64 * 10.0
}

/// One question flagged for improvement, with its diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementCandidate {
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
    pub priority_score: f64,
    /// What looks wrong, one entry per matched rule.
    pub issues: Vec<String>,
    /// Suggested follow-ups, paired with the issues.
    pub recommendations: Vec<String>,
    /// All wrong answers, sorted by count descending.
    pub wrong_answer_distribution: Vec<WrongAnswerCount>,
}

/// Rank questions for content review.
///
/// Filters to questions with at least `min_attempts` attempts and a success
/// rate at or below `max_success_rate`, then sorts by priority score
/// descending (question id ascending on ties).
pub fn questions_needing_improvement(
    tallies: &HashMap<String, QuestionTally>,
    report_counts: &HashMap<String, u64>,
    limit: usize,
    max_success_rate: f64,
    min_attempts: u64,
) -> Vec<ImprovementCandidate> {
    let mut candidates: Vec<ImprovementCandidate> = tallies
        .values()
        .filter(|t| t.total_attempts >= min_attempts)
        .filter(|t| t.success_rate() <= max_success_rate)
        .map(|tally| {
            let report_count = report_counts
                .get(&tally.question_id)
                .copied()
                .unwrap_or(0);
            let success_rate = tally.success_rate();
            let (issues, recommendations) = diagnose(tally, report_count);

            ImprovementCandidate {
                question_id: tally.question_id.clone(),
                question_text: tally.question_text.clone(),
                topic: tally.topic.clone(),
                subtopic: tally.subtopic.clone(),
                difficulty: tally.difficulty.clone(),
                total_attempts: tally.total_attempts,
                correct_count: tally.correct_count,
                incorrect_count: tally.incorrect_count,
                success_rate,
                report_count,
                priority_score: priority_score(success_rate, tally.total_attempts, report_count),
                issues,
                recommendations,
                wrong_answer_distribution: tally.sorted_wrong_answers(),
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.question_id.cmp(&b.question_id))
    });
    candidates.truncate(limit);
    candidates
}

/// Independently evaluated insight rules; every match is appended.
fn diagnose(tally: &QuestionTally, report_count: u64) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    let success_rate = tally.success_rate();

    if success_rate < 30.0 {
        issues.push(format!("Very low success rate ({success_rate}%)"));
        recommendations.push("Reword the question for clarity".to_string());
        recommendations.push("Verify the recorded correct answer".to_string());
    } else if success_rate < 50.0 {
        issues.push(format!("Low success rate ({success_rate}%)"));
        recommendations.push("Consider adding a hint or simplifying the question".to_string());
    }

    if report_count > 0 {
        issues.push(format!("{report_count} user report(s) filed"));
        recommendations.push("Review the submitted reports for content problems".to_string());
    }

    if let Some(worst) = tally.most_common_wrong_answer() {
        if worst.percentage > MISLEADING_DISTRACTOR_SHARE {
            issues.push(format!(
                "Misleading distractor: '{}' drew {}% of incorrect responses",
                worst.answer, worst.percentage
            ));
            recommendations.push("Reword or replace the dominant wrong option".to_string());
        }
    }

    (issues, recommendations)
}
