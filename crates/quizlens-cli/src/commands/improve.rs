//! The `quizlens improve` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub async fn execute(
    limit: Option<usize>,
    max_success_rate: Option<f64>,
    format: String,
    config: Option<PathBuf>,
) -> Result<()> {
    let engine = super::build_engine(config.as_deref())?;
    let candidates = engine
        .questions_needing_improvement(limit, max_success_rate)
        .await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    if candidates.is_empty() {
        println!("No questions need improvement at the current thresholds.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Question",
        "Priority",
        "Success %",
        "Attempts",
        "Reports",
        "Issues",
    ]);
    for candidate in &candidates {
        table.add_row(vec![
            Cell::new(&candidate.question_id),
            Cell::new(format!("{:.1}", candidate.priority_score)),
            Cell::new(format!("{:.1}", candidate.success_rate)),
            Cell::new(candidate.total_attempts),
            Cell::new(candidate.report_count),
            Cell::new(candidate.issues.join("; ")),
        ]);
    }
    println!("{table}");

    for candidate in &candidates {
        if candidate.recommendations.is_empty() {
            continue;
        }
        println!("\n{}:", candidate.question_id);
        for rec in &candidate.recommendations {
            println!("  - {rec}");
        }
    }

    Ok(())
}
