//! The `quizlens stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizlens_core::statistics::QuestionAggregate;

pub async fn execute(limit: Option<usize>, format: String, config: Option<PathBuf>) -> Result<()> {
    let engine = super::build_engine(config.as_deref())?;
    let stats = engine.question_statistics(limit).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Most missed questions:");
    println!("{}", aggregate_table(&stats.most_missed));

    println!("\nLowest success rate:");
    println!("{}", aggregate_table(&stats.lowest_success_rate));

    if !stats.most_reported.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Question", "Topic", "Reports"]);
        for row in &stats.most_reported {
            table.add_row(vec![
                Cell::new(&row.question_id),
                Cell::new(row.topic.as_deref().unwrap_or("-")),
                Cell::new(row.report_count),
            ]);
        }
        println!("\nMost reported questions:");
        println!("{table}");
    }

    if !stats.report_types.is_empty() {
        let mut rows: Vec<_> = stats.report_types.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));
        println!("\nReports by type:");
        for (report_type, count) in rows {
            println!("  {report_type}: {count}");
        }
    }

    Ok(())
}

fn aggregate_table(rows: &[QuestionAggregate]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Topic", "Attempts", "Incorrect", "Success %"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.question_id),
            Cell::new(row.topic.as_deref().unwrap_or("-")),
            Cell::new(row.total_attempts),
            Cell::new(row.incorrect_count),
            Cell::new(format!("{:.1}", row.success_rate)),
        ]);
    }
    table
}
