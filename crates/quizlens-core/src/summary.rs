//! Attempt-level summary statistics: overall totals, score breakdowns by
//! mode / difficulty / topic, and top performers.
//!
//! These operate on the same full attempt scan as the question analytics and
//! are exposed to dashboards alongside them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{AttemptRecord, QuizMode};
use crate::statistics::round2;

/// Score at or above which an attempt counts as a pass.
const PASS_THRESHOLD: f64 = 70.0;

/// Overall attempt-log summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub total_attempts: usize,
    pub average_score: f64,
    /// Share of attempts scoring at least 70, two decimals.
    pub pass_rate: f64,
    pub most_popular_mode: Option<QuizMode>,
    /// Mean of the recorded completion times, in seconds.
    pub average_time_secs: f64,
}

/// Score statistics for one grouping key (mode, difficulty, or topic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub count: usize,
    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
}

/// One row of the top-performers view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPerformer {
    pub user_name: String,
    pub average_score: f64,
    pub best_score: f64,
    pub total_attempts: usize,
}

/// Summarize the whole attempt log.
pub fn overall_summary(attempts: &[AttemptRecord]) -> AttemptSummary {
    if attempts.is_empty() {
        return AttemptSummary {
            total_attempts: 0,
            average_score: 0.0,
            pass_rate: 0.0,
            most_popular_mode: None,
            average_time_secs: 0.0,
        };
    }

    let total = attempts.len();
    let average_score = attempts.iter().map(|a| a.score).sum::<f64>() / total as f64;
    let passed = attempts.iter().filter(|a| a.score >= PASS_THRESHOLD).count();

    let mut mode_counts: HashMap<QuizMode, usize> = HashMap::new();
    for attempt in attempts {
        *mode_counts.entry(attempt.mode).or_insert(0) += 1;
    }
    // Ties resolve by mode name for reproducible output.
    let most_popular_mode = mode_counts
        .into_iter()
        .max_by(|(a_mode, a_n), (b_mode, b_n)| {
            a_n.cmp(b_n)
                .then_with(|| b_mode.to_string().cmp(&a_mode.to_string()))
        })
        .map(|(mode, _)| mode);

    let timed: Vec<u64> = attempts.iter().filter_map(|a| a.time_taken_secs).collect();
    let average_time_secs = if timed.is_empty() {
        0.0
    } else {
        timed.iter().sum::<u64>() as f64 / timed.len() as f64
    };

    AttemptSummary {
        total_attempts: total,
        average_score: round2(average_score),
        pass_rate: round2(passed as f64 / total as f64 * 100.0),
        most_popular_mode,
        average_time_secs: round2(average_time_secs),
    }
}

/// Score breakdown keyed by quiz mode.
pub fn breakdown_by_mode(attempts: &[AttemptRecord]) -> BTreeMap<String, ScoreBreakdown> {
    breakdown_by(attempts, |a| Some(a.mode.to_string()))
}

/// Score breakdown keyed by difficulty; attempts without one are omitted.
pub fn breakdown_by_difficulty(attempts: &[AttemptRecord]) -> BTreeMap<String, ScoreBreakdown> {
    breakdown_by(attempts, |a| a.difficulty.clone())
}

/// Score breakdown keyed by topic; attempts without one are omitted.
pub fn breakdown_by_topic(attempts: &[AttemptRecord]) -> BTreeMap<String, ScoreBreakdown> {
    breakdown_by(attempts, |a| a.topic.clone())
}

fn breakdown_by(
    attempts: &[AttemptRecord],
    key: impl Fn(&AttemptRecord) -> Option<String>,
) -> BTreeMap<String, ScoreBreakdown> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for attempt in attempts {
        if let Some(k) = key(attempt) {
            grouped.entry(k).or_default().push(attempt.score);
        }
    }

    grouped
        .into_iter()
        .map(|(k, scores)| {
            let count = scores.len();
            let sum: f64 = scores.iter().sum();
            let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
            let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (
                k,
                ScoreBreakdown {
                    count,
                    average_score: round2(sum / count as f64),
                    min_score: min,
                    max_score: max,
                },
            )
        })
        .collect()
}

/// Users with the highest average score; anonymous attempts are skipped.
pub fn top_performers(attempts: &[AttemptRecord], limit: usize) -> Vec<TopPerformer> {
    let mut by_user: HashMap<String, Vec<f64>> = HashMap::new();
    for attempt in attempts {
        if let Some(user) = &attempt.user_name {
            by_user.entry(user.clone()).or_default().push(attempt.score);
        }
    }

    let mut performers: Vec<TopPerformer> = by_user
        .into_iter()
        .map(|(user_name, scores)| TopPerformer {
            average_score: round2(scores.iter().sum::<f64>() / scores.len() as f64),
            best_score: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            total_attempts: scores.len(),
            user_name,
        })
        .collect();

    performers.sort_by(|a, b| {
        b.average_score
            .partial_cmp(&a.average_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.user_name.cmp(&b.user_name))
    });
    performers.truncate(limit);
    performers
}
