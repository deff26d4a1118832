//! Single-pass aggregation over the attempt log and shared statistics
//! helpers.
//!
//! Everything here is a pure function of the input slice: two calls over an
//! unchanged log produce identical output. Cost is O(total outcomes); there
//! is no caching, so bounding scan cost is the caller's responsibility.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, AttemptRecord};

/// Round to one decimal place (the precision of all exposed percentages).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places (used by attempt-level score summaries).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part` as a percentage of `whole`, rounded to one decimal. Zero when
/// `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round1(part as f64 / whole as f64 * 100.0)
    }
}

/// Running per-question counters built by [`aggregate_outcomes`].
#[derive(Debug, Clone, Default)]
pub struct QuestionTally {
    pub question_id: String,
    /// First-seen question text; duplicate ids keep the first snapshot.
    pub question_text: String,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub difficulty: Option<String>,
    pub correct_answer: Option<AnswerValue>,
    /// Option texts, present only for multiple-choice questions.
    pub options: Option<Vec<String>>,
    pub total_attempts: u64,
    pub correct_count: u64,
    pub incorrect_count: u64,
    /// Frequency of each wrong answer, keyed by its canonical label.
    pub wrong_answer_counts: HashMap<String, u64>,
    /// Frequency of every recorded answer (correct ones included).
    pub answer_counts: HashMap<String, u64>,
}

impl QuestionTally {
    /// Correct answers as a percentage of total attempts, one decimal.
    pub fn success_rate(&self) -> f64 {
        percentage(self.correct_count, self.total_attempts)
    }

    /// The wrong answer drawing the most incorrect responses, with its share
    /// of all incorrect responses. `None` when nothing was answered wrong.
    pub fn most_common_wrong_answer(&self) -> Option<MostCommonWrongAnswer> {
        if self.incorrect_count == 0 {
            return None;
        }
        // Highest count wins; ties break on the answer label for determinism.
        self.wrong_answer_counts
            .iter()
            .max_by(|(a_ans, a_n), (b_ans, b_n)| a_n.cmp(b_n).then_with(|| b_ans.cmp(a_ans)))
            .map(|(answer, &frequency)| MostCommonWrongAnswer {
                answer: answer.clone(),
                frequency,
                percentage: percentage(frequency, self.incorrect_count),
            })
    }

    /// All wrong answers sorted by count descending, label ascending on ties.
    pub fn sorted_wrong_answers(&self) -> Vec<WrongAnswerCount> {
        let mut entries: Vec<WrongAnswerCount> = self
            .wrong_answer_counts
            .iter()
            .map(|(answer, &count)| WrongAnswerCount {
                answer: answer.clone(),
                count,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.answer.cmp(&b.answer)));
        entries
    }

    /// The top `n` wrong answers by frequency.
    pub fn wrong_answer_summary(&self, n: usize) -> Vec<WrongAnswerCount> {
        let mut entries = self.sorted_wrong_answers();
        entries.truncate(n);
        entries
    }
}

/// The dominant wrong answer for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostCommonWrongAnswer {
    pub answer: String,
    pub frequency: u64,
    /// Share of all incorrect responses, one decimal.
    pub percentage: f64,
}

/// One wrong answer and how often it was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongAnswerCount {
    pub answer: String,
    pub count: u64,
}

/// Per-question statistics exposed by the ranked list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAggregate {
    pub question_id: String,
    pub question_text: String,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub difficulty: Option<String>,
    pub total_attempts: u64,
    pub correct_count: u64,
    pub incorrect_count: u64,
    pub success_rate: f64,
    pub most_common_wrong_answer: Option<MostCommonWrongAnswer>,
    /// Top 3 wrong answers by frequency.
    pub wrong_answer_summary: Vec<WrongAnswerCount>,
}

impl QuestionAggregate {
    fn from_tally(tally: &QuestionTally) -> Self {
        Self {
            question_id: tally.question_id.clone(),
            question_text: tally.question_text.clone(),
            topic: tally.topic.clone(),
            subtopic: tally.subtopic.clone(),
            difficulty: tally.difficulty.clone(),
            total_attempts: tally.total_attempts,
            correct_count: tally.correct_count,
            incorrect_count: tally.incorrect_count,
            success_rate: tally.success_rate(),
            most_common_wrong_answer: tally.most_common_wrong_answer(),
            wrong_answer_summary: tally.wrong_answer_summary(3),
        }
    }
}

/// Single pass over every outcome in the log, building per-question tallies.
///
/// Malformed entries are isolated, not fatal: an outcome without a question
/// id is skipped entirely; an incorrect outcome without a recorded user
/// answer still increments `incorrect_count` but is excluded from the
/// wrong-answer counts.
pub fn aggregate_outcomes(attempts: &[AttemptRecord]) -> HashMap<String, QuestionTally> {
    let mut tallies: HashMap<String, QuestionTally> = HashMap::new();

    for attempt in attempts {
        for outcome in &attempt.outcomes {
            if !outcome.has_question_id() {
                tracing::debug!(
                    attempt_id = %attempt.id,
                    "skipping outcome without question id"
                );
                continue;
            }

            let tally = tallies
                .entry(outcome.question_id.clone())
                .or_insert_with(|| QuestionTally {
                    question_id: outcome.question_id.clone(),
                    question_text: outcome.question_text.clone(),
                    topic: outcome.topic.clone().or_else(|| attempt.topic.clone()),
                    subtopic: outcome.subtopic.clone().or_else(|| attempt.subtopic.clone()),
                    difficulty: outcome
                        .difficulty
                        .clone()
                        .or_else(|| attempt.difficulty.clone()),
                    correct_answer: outcome.correct_answer.clone(),
                    options: outcome.options.clone(),
                    ..QuestionTally::default()
                });

            tally.total_attempts += 1;

            if let Some(answer) = &outcome.user_answer {
                *tally.answer_counts.entry(answer.label()).or_insert(0) += 1;
            }

            if outcome.is_correct {
                tally.correct_count += 1;
            } else {
                tally.incorrect_count += 1;
                if let Some(answer) = &outcome.user_answer {
                    *tally.wrong_answer_counts.entry(answer.label()).or_insert(0) += 1;
                }
            }
        }
    }

    tallies
}

/// Questions answered incorrectly most often, descending by incorrect count.
/// Ties break on question id ascending for reproducible output.
pub fn most_missed(
    tallies: &HashMap<String, QuestionTally>,
    limit: usize,
) -> Vec<QuestionAggregate> {
    let mut ranked: Vec<QuestionAggregate> =
        tallies.values().map(QuestionAggregate::from_tally).collect();
    ranked.sort_by(|a, b| {
        b.incorrect_count
            .cmp(&a.incorrect_count)
            .then_with(|| a.question_id.cmp(&b.question_id))
    });
    ranked.truncate(limit);
    ranked
}

/// Questions with the lowest success rate, restricted to those attempted at
/// least `min_attempts` times. Ties break on question id ascending.
pub fn lowest_success_rate(
    tallies: &HashMap<String, QuestionTally>,
    limit: usize,
    min_attempts: u64,
) -> Vec<QuestionAggregate> {
    let mut ranked: Vec<QuestionAggregate> = tallies
        .values()
        .filter(|t| t.total_attempts >= min_attempts)
        .map(QuestionAggregate::from_tally)
        .collect();
    ranked.sort_by(|a, b| {
        a.success_rate
            .partial_cmp(&b.success_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.question_id.cmp(&b.question_id))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOutcome, QuizMode};

    fn outcome(question_id: &str, user: Option<AnswerValue>, is_correct: bool) -> AnswerOutcome {
        AnswerOutcome {
            question_id: question_id.into(),
            question_text: format!("text for {question_id}"),
            correct_answer: Some(AnswerValue::Choice(0)),
            options: Some(vec![
                "Many forms".into(),
                "One form".into(),
                "No form".into(),
                "Complex form".into(),
            ]),
            user_answer: user,
            is_correct,
            topic: Some("OOP".into()),
            subtopic: None,
            difficulty: Some("easy".into()),
        }
    }

    fn attempts_for(outcomes: Vec<AnswerOutcome>) -> Vec<AttemptRecord> {
        outcomes
            .into_iter()
            .map(|o| AttemptRecord::new(QuizMode::Elimination, vec![o]))
            .collect()
    }

    /// Scenario: 10 attempts, 3 correct on option 0, 7 incorrect split
    /// {option 2: 5, option 3: 2}.
    fn scenario_q1() -> Vec<AttemptRecord> {
        let mut outcomes = Vec::new();
        for _ in 0..3 {
            outcomes.push(outcome("q1", Some(AnswerValue::Choice(0)), true));
        }
        for _ in 0..5 {
            outcomes.push(outcome("q1", Some(AnswerValue::Choice(2)), false));
        }
        for _ in 0..2 {
            outcomes.push(outcome("q1", Some(AnswerValue::Choice(3)), false));
        }
        attempts_for(outcomes)
    }

    #[test]
    fn counters_add_up() {
        let tallies = aggregate_outcomes(&scenario_q1());
        let tally = &tallies["q1"];
        assert_eq!(tally.total_attempts, 10);
        assert_eq!(tally.correct_count + tally.incorrect_count, tally.total_attempts);
        assert_eq!(
            tally.wrong_answer_counts.values().sum::<u64>(),
            tally.incorrect_count
        );
    }

    #[test]
    fn success_rate_and_dominant_wrong_answer() {
        let tallies = aggregate_outcomes(&scenario_q1());
        let tally = &tallies["q1"];
        assert!((tally.success_rate() - 30.0).abs() < f64::EPSILON);

        let worst = tally.most_common_wrong_answer().unwrap();
        assert_eq!(worst.answer, "2");
        assert_eq!(worst.frequency, 5);
        assert!((worst.percentage - 71.4).abs() < f64::EPSILON);
        assert!(worst.frequency <= tally.incorrect_count);
        assert!(worst.percentage <= 100.0);
    }

    #[test]
    fn missing_question_id_is_skipped() {
        let mut bad = outcome("", Some(AnswerValue::Choice(1)), false);
        bad.question_id = String::new();
        let mut log = scenario_q1();
        log.push(AttemptRecord::new(QuizMode::Elimination, vec![bad]));

        let tallies = aggregate_outcomes(&log);
        assert_eq!(tallies.len(), 1);
        assert_eq!(tallies["q1"].total_attempts, 10);
    }

    #[test]
    fn missing_user_answer_counts_incorrect_but_not_distributed() {
        let mut log = scenario_q1();
        log.push(AttemptRecord::new(
            QuizMode::Elimination,
            vec![outcome("q1", None, false)],
        ));

        let tallies = aggregate_outcomes(&log);
        let tally = &tallies["q1"];
        assert_eq!(tally.total_attempts, 11);
        assert_eq!(tally.incorrect_count, 8);
        // The answerless outcome is absent from the wrong-answer map.
        assert_eq!(tally.wrong_answer_counts.values().sum::<u64>(), 7);
    }

    #[test]
    fn no_incorrect_means_no_wrong_answer_views() {
        let log = attempts_for(vec![
            outcome("q2", Some(AnswerValue::Choice(0)), true),
            outcome("q2", Some(AnswerValue::Choice(0)), true),
        ]);
        let tallies = aggregate_outcomes(&log);
        let tally = &tallies["q2"];
        assert!(tally.most_common_wrong_answer().is_none());
        assert!(tally.wrong_answer_summary(3).is_empty());
        assert!((tally.success_rate() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn most_missed_orders_by_incorrect_count() {
        let mut log = scenario_q1();
        log.extend(attempts_for(vec![
            outcome("q2", Some(AnswerValue::Choice(1)), false),
            outcome("q2", Some(AnswerValue::Choice(0)), true),
        ]));

        let tallies = aggregate_outcomes(&log);
        let ranked = most_missed(&tallies, 10);
        assert_eq!(ranked[0].question_id, "q1");
        assert_eq!(ranked[0].incorrect_count, 7);
        assert_eq!(ranked[1].question_id, "q2");
    }

    #[test]
    fn most_missed_tie_breaks_on_question_id() {
        let log = attempts_for(vec![
            outcome("qb", Some(AnswerValue::Choice(1)), false),
            outcome("qa", Some(AnswerValue::Choice(1)), false),
        ]);
        let tallies = aggregate_outcomes(&log);
        let ranked = most_missed(&tallies, 10);
        assert_eq!(ranked[0].question_id, "qa");
        assert_eq!(ranked[1].question_id, "qb");
    }

    #[test]
    fn lowest_success_rate_respects_min_attempts() {
        let mut log = scenario_q1();
        // q3 has a 0% success rate but only two attempts.
        log.extend(attempts_for(vec![
            outcome("q3", Some(AnswerValue::Choice(1)), false),
            outcome("q3", Some(AnswerValue::Choice(2)), false),
        ]));

        let tallies = aggregate_outcomes(&log);
        let ranked = lowest_success_rate(&tallies, 10, 3);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].question_id, "q1");

        // At the boundary the question becomes eligible.
        let ranked = lowest_success_rate(&tallies, 10, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].question_id, "q3");
        assert!((ranked[0].success_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn wrong_answer_summary_is_top_three_sorted() {
        let mut outcomes = Vec::new();
        for (answer, n) in [(1u32, 4), (2, 3), (3, 2), (4, 1)] {
            for _ in 0..n {
                outcomes.push(outcome("q4", Some(AnswerValue::Choice(answer)), false));
            }
        }
        let tallies = aggregate_outcomes(&attempts_for(outcomes));
        let summary = tallies["q4"].wrong_answer_summary(3);
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].answer, "1");
        assert_eq!(summary[0].count, 4);
        assert_eq!(summary[2].answer, "3");
    }

    #[test]
    fn aggregation_is_idempotent() {
        let log = scenario_q1();
        let a = aggregate_outcomes(&log);
        let b = aggregate_outcomes(&log);
        assert_eq!(a.len(), b.len());
        assert_eq!(a["q1"].wrong_answer_counts, b["q1"].wrong_answer_counts);
        assert_eq!(
            most_missed(&a, 10)
                .iter()
                .map(|q| q.question_id.clone())
                .collect::<Vec<_>>(),
            most_missed(&b, 10)
                .iter()
                .map(|q| q.question_id.clone())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn rounding_helpers() {
        assert!((round1(71.428) - 71.4).abs() < f64::EPSILON);
        assert!((round1(71.45) - 71.5).abs() < f64::EPSILON);
        assert!((round2(66.666) - 66.67).abs() < f64::EPSILON);
        assert!((percentage(5, 7) - 71.4).abs() < f64::EPSILON);
        assert!((percentage(3, 0) - 0.0).abs() < f64::EPSILON);
    }
}
