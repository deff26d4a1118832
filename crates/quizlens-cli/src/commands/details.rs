//! The `quizlens details` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizlens_core::details::AnswerAnalysis;

pub async fn execute(question_id: String, format: String, config: Option<PathBuf>) -> Result<()> {
    let engine = super::build_engine(config.as_deref())?;
    let details = engine.question_details(&question_id).await?;

    let Some(details) = details else {
        anyhow::bail!("unknown question: {question_id}");
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("Question: {}", details.question_text);
    if let Some(topic) = &details.topic {
        println!("Topic: {topic}");
    }
    println!(
        "Attempts: {} ({} correct, {:.1}% success)",
        details.total_attempts, details.correct_count, details.success_rate
    );
    println!("Reports: {}", details.report_count);
    if details.has_sufficient_data {
        println!("Priority score: {:.1}", details.priority_score);
        if details.needs_improvement {
            println!("Flagged: needs improvement");
        }
    } else {
        println!("Not enough attempts for reliable statistics.");
    }

    if !details.answer_analysis.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Answer", "Correct", "Count", "Share %"]);
        for row in &details.answer_analysis {
            match row {
                AnswerAnalysis::MultipleChoice {
                    option_index,
                    option_text,
                    is_correct,
                    frequency,
                    percentage,
                } => {
                    table.add_row(vec![
                        Cell::new(format!("{option_index}: {option_text}")),
                        Cell::new(if *is_correct { "yes" } else { "" }),
                        Cell::new(frequency),
                        Cell::new(format!("{percentage:.1}")),
                    ]);
                }
                AnswerAnalysis::FreeText {
                    answer_text,
                    frequency,
                    percentage,
                    ..
                } => {
                    table.add_row(vec![
                        Cell::new(answer_text),
                        Cell::new(""),
                        Cell::new(frequency),
                        Cell::new(format!("{percentage:.1}")),
                    ]);
                }
            }
        }
        println!("\nAnswer breakdown:");
        println!("{table}");
    }

    if !details.reports.is_empty() {
        println!("\nReports:");
        for report in &details.reports {
            println!(
                "  [{}] {} {} - {}",
                report.status,
                report.created_at.format("%Y-%m-%d"),
                report.report_type,
                report.reason.as_deref().unwrap_or("(no reason given)")
            );
        }
    }

    Ok(())
}
