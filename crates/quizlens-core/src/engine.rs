//! The analytics engine facade.
//!
//! Holds explicitly constructed store handles (dependency injection, no
//! global singletons) and exposes the operations the administrative
//! reporting layer calls. Every request performs a fresh full scan with
//! local aggregation state and writes nothing back, so concurrent calls are
//! trivially safe.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::details::{question_details, QuestionDetails};
use crate::insight::{questions_needing_improvement, ImprovementCandidate};
use crate::pattern::{analyze_tally, PatternAnalysis};
use crate::reports::{ReportType, ReportedQuestion};
use crate::statistics::{aggregate_outcomes, lowest_success_rate, most_missed, QuestionAggregate};
use crate::summary::{
    breakdown_by_difficulty, breakdown_by_mode, breakdown_by_topic, overall_summary,
    top_performers, AttemptSummary, ScoreBreakdown, TopPerformer,
};
use crate::traits::{AttemptStore, ReportStore};

/// Static threshold knobs for the analytics engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Minimum attempts before a question enters ranked views.
    pub min_attempts: u64,
    /// Default number of questions returned by list views.
    pub default_limit: usize,
    /// Default success-rate ceiling for the improvement list.
    pub max_success_rate: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            min_attempts: 3,
            default_limit: 20,
            max_success_rate: crate::insight::DEFAULT_MAX_SUCCESS_RATE,
        }
    }
}

/// The combined question-statistics view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionStatistics {
    pub most_missed: Vec<QuestionAggregate>,
    pub lowest_success_rate: Vec<QuestionAggregate>,
    pub most_reported: Vec<ReportedQuestion>,
    /// Keyed on a `BTreeMap` so serialized output is stable across calls.
    pub report_types: BTreeMap<ReportType, u64>,
}

/// The combined attempt-level dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub overview: AttemptSummary,
    pub by_mode: BTreeMap<String, ScoreBreakdown>,
    pub by_difficulty: BTreeMap<String, ScoreBreakdown>,
    pub by_topic: BTreeMap<String, ScoreBreakdown>,
    pub top_performers: Vec<TopPerformer>,
}

/// Question performance analytics over injected attempt and report stores.
pub struct AnalyticsEngine {
    attempts: Arc<dyn AttemptStore>,
    reports: Arc<dyn ReportStore>,
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new(
        attempts: Arc<dyn AttemptStore>,
        reports: Arc<dyn ReportStore>,
        config: AnalyticsConfig,
    ) -> Self {
        Self {
            attempts,
            reports,
            config,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Comprehensive question statistics: most missed, lowest success rate,
    /// most reported, and the report-type distribution.
    pub async fn question_statistics(&self, limit: Option<usize>) -> Result<QuestionStatistics> {
        let limit = limit.unwrap_or(self.config.default_limit);

        let (attempts, most_reported, report_types) = futures::try_join!(
            self.attempts.list_all(None),
            self.reports.most_reported(limit),
            self.reports.counts_by_type(),
        )?;

        let tallies = aggregate_outcomes(&attempts);
        tracing::debug!(
            questions = tallies.len(),
            attempts = attempts.len(),
            "aggregated attempt log"
        );

        Ok(QuestionStatistics {
            most_missed: most_missed(&tallies, limit),
            lowest_success_rate: lowest_success_rate(&tallies, limit, self.config.min_attempts),
            most_reported,
            report_types,
        })
    }

    /// Questions ranked by priority for content review.
    pub async fn questions_needing_improvement(
        &self,
        limit: Option<usize>,
        max_success_rate: Option<f64>,
    ) -> Result<Vec<ImprovementCandidate>> {
        let limit = limit.unwrap_or(self.config.default_limit);
        let max_success_rate = max_success_rate.unwrap_or(self.config.max_success_rate);

        let (attempts, report_counts) = futures::try_join!(
            self.attempts.list_all(None),
            self.reports.counts_by_question(),
        )?;

        let tallies = aggregate_outcomes(&attempts);
        Ok(questions_needing_improvement(
            &tallies,
            &report_counts,
            limit,
            max_success_rate,
            self.config.min_attempts,
        ))
    }

    /// Deep answer-pattern analysis for one question. `None` when the
    /// question was never attempted.
    pub async fn answer_pattern_analysis(
        &self,
        question_id: &str,
    ) -> Result<Option<PatternAnalysis>> {
        let attempts = self.attempts.list_all(None).await?;
        let tallies = aggregate_outcomes(&attempts);
        Ok(tallies.get(question_id).map(analyze_tally))
    }

    /// Detailed per-question report merging statistics with user reports.
    /// `None` when the question has no attempts and no reports.
    pub async fn question_details(&self, question_id: &str) -> Result<Option<QuestionDetails>> {
        let (attempts, reports) = futures::try_join!(
            self.attempts.list_all(None),
            self.reports.get_by_question_id(question_id),
        )?;

        let tallies = aggregate_outcomes(&attempts);
        Ok(question_details(
            question_id,
            tallies.get(question_id),
            reports,
            self.config.min_attempts,
        ))
    }

    /// Attempt-level dashboard: overall summary, score breakdowns, and the
    /// top performers by average score.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let attempts = self.attempts.list_all(None).await?;
        Ok(DashboardSummary {
            overview: overall_summary(&attempts),
            by_mode: breakdown_by_mode(&attempts),
            by_difficulty: breakdown_by_difficulty(&attempts),
            by_topic: breakdown_by_topic(&attempts),
            top_performers: top_performers(&attempts, self.config.default_limit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::model::{AnswerOutcome, AnswerValue, AttemptRecord, QuizMode};
    use crate::reports::{NewReport, Report, ReportStatus};
    use crate::traits::AttemptFilter;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct FixedAttemptStore(Vec<AttemptRecord>);

    #[async_trait]
    impl AttemptStore for FixedAttemptStore {
        async fn list_all(
            &self,
            filter: Option<AttemptFilter>,
        ) -> Result<Vec<AttemptRecord>, StoreError> {
            let filter = filter.unwrap_or_default();
            Ok(self
                .0
                .iter()
                .filter(|a| filter.matches(a))
                .cloned()
                .collect())
        }

        async fn record(&self, _attempt: AttemptRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only fixture".into()))
        }
    }

    struct FixedReportStore(Mutex<Vec<Report>>);

    #[async_trait]
    impl ReportStore for FixedReportStore {
        async fn create(&self, params: NewReport) -> Result<Report, StoreError> {
            let report = Report::new(params);
            self.0.lock().unwrap().push(report.clone());
            Ok(report)
        }

        async fn get_by_question_id(&self, question_id: &str) -> Result<Vec<Report>, StoreError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.question_id == question_id)
                .cloned()
                .collect())
        }

        async fn list(
            &self,
            _status: Option<ReportStatus>,
            _limit: Option<usize>,
        ) -> Result<Vec<Report>, StoreError> {
            Ok(self.0.lock().unwrap().clone())
        }

        async fn most_reported(
            &self,
            _limit: usize,
        ) -> Result<Vec<ReportedQuestion>, StoreError> {
            Ok(vec![])
        }

        async fn counts_by_question(
            &self,
        ) -> Result<std::collections::HashMap<String, u64>, StoreError> {
            let mut counts = std::collections::HashMap::new();
            for report in self.0.lock().unwrap().iter() {
                *counts.entry(report.question_id.clone()).or_insert(0) += 1;
            }
            Ok(counts)
        }

        async fn pending_count(&self) -> Result<usize, StoreError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.status == ReportStatus::Pending)
                .count())
        }

        async fn counts_by_type(&self) -> Result<BTreeMap<ReportType, u64>, StoreError> {
            let mut counts = BTreeMap::new();
            for report in self.0.lock().unwrap().iter() {
                *counts.entry(report.report_type).or_insert(0) += 1;
            }
            Ok(counts)
        }

        async fn update_status(
            &self,
            _id: Uuid,
            _status: ReportStatus,
            _reviewer: Option<&str>,
            _notes: Option<&str>,
        ) -> Result<Option<Report>, StoreError> {
            Ok(None)
        }

        async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    fn fixture_log() -> Vec<AttemptRecord> {
        let make = |qid: &str, user: u32, is_correct: bool| AnswerOutcome {
            question_id: qid.into(),
            question_text: format!("text for {qid}"),
            correct_answer: Some(AnswerValue::Choice(0)),
            options: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            user_answer: Some(AnswerValue::Choice(user)),
            is_correct,
            topic: Some("OOP".into()),
            subtopic: None,
            difficulty: Some("easy".into()),
        };

        let mut attempts = Vec::new();
        // q1: 3/10 correct, wrong answers mostly option 2.
        for i in 0..10u32 {
            let outcome = if i < 3 {
                make("q1", 0, true)
            } else if i % 2 == 0 {
                make("q1", 2, false)
            } else {
                make("q1", 3, false)
            };
            attempts.push(AttemptRecord::new(QuizMode::Elimination, vec![outcome]));
        }
        // q2: 7/10 correct.
        for i in 0..10u32 {
            let outcome = if i < 7 {
                make("q2", 0, true)
            } else {
                make("q2", 1, false)
            };
            attempts.push(AttemptRecord::new(QuizMode::Elimination, vec![outcome]));
        }
        attempts
    }

    fn engine_over(log: Vec<AttemptRecord>, reports: Vec<Report>) -> AnalyticsEngine {
        AnalyticsEngine::new(
            Arc::new(FixedAttemptStore(log)),
            Arc::new(FixedReportStore(Mutex::new(reports))),
            AnalyticsConfig::default(),
        )
    }

    #[tokio::test]
    async fn question_statistics_combines_views() {
        let engine = engine_over(fixture_log(), vec![]);
        let stats = engine.question_statistics(None).await.unwrap();

        assert_eq!(stats.most_missed[0].question_id, "q1");
        assert_eq!(stats.most_missed[0].incorrect_count, 7);
        assert_eq!(stats.lowest_success_rate[0].question_id, "q1");
        assert!((stats.lowest_success_rate[0].success_rate - 30.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn improvement_list_reflects_reports() {
        let reports = vec![
            Report::new(NewReport::new("q1", ReportType::IncorrectAnswer)),
            Report::new(NewReport::new("q1", ReportType::UnclearQuestion)),
        ];
        let engine = engine_over(fixture_log(), reports);

        let improvements = engine
            .questions_needing_improvement(None, None)
            .await
            .unwrap();
        assert_eq!(improvements.len(), 1);
        let q1 = &improvements[0];
        assert_eq!(q1.report_count, 2);
        // (100 - 30) + 1.0 + 20
        assert!((q1.priority_score - 91.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn pattern_analysis_not_found() {
        let engine = engine_over(fixture_log(), vec![]);
        assert!(engine
            .answer_pattern_analysis("missing")
            .await
            .unwrap()
            .is_none());
        assert!(engine
            .answer_pattern_analysis("q1")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn details_merge_reports() {
        let reports = vec![Report::new(NewReport::new("q2", ReportType::Typo))];
        let engine = engine_over(fixture_log(), reports);

        let details = engine.question_details("q2").await.unwrap().unwrap();
        assert_eq!(details.report_count, 1);
        assert!(details.has_sufficient_data);
        assert!((details.success_rate - 70.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn repeated_calls_are_identical() {
        let reports = vec![
            Report::new(NewReport::new("q1", ReportType::Typo)),
            Report::new(NewReport::new("q1", ReportType::IncorrectAnswer)),
            Report::new(NewReport::new("q2", ReportType::Outdated)),
        ];
        let engine = engine_over(fixture_log(), reports);
        let a = engine.question_statistics(None).await.unwrap();
        let b = engine.question_statistics(None).await.unwrap();
        assert_eq!(a.report_types.len(), 3);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[tokio::test]
    async fn dashboard_ranks_top_performers() {
        let mut log = fixture_log();
        for attempt in log.iter_mut().take(10) {
            attempt.user_name = Some("alice".into());
        }
        for attempt in log.iter_mut().skip(10) {
            attempt.user_name = Some("bob".into());
        }
        let engine = engine_over(log, vec![]);

        let dashboard = engine.dashboard_summary().await.unwrap();
        assert_eq!(dashboard.top_performers.len(), 2);
        // bob played the 70%-success question, alice the 30% one.
        assert_eq!(dashboard.top_performers[0].user_name, "bob");
        assert_eq!(dashboard.top_performers[0].total_attempts, 10);
        assert!(
            dashboard.top_performers[0].average_score
                > dashboard.top_performers[1].average_score
        );
    }
}
