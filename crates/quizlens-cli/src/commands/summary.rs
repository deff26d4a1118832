//! The `quizlens summary` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizlens_core::summary::ScoreBreakdown;

pub async fn execute(format: String, config: Option<PathBuf>) -> Result<()> {
    let engine = super::build_engine(config.as_deref())?;
    let summary = engine.dashboard_summary().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Total attempts: {}", summary.overview.total_attempts);
    println!("Average score: {:.2}", summary.overview.average_score);
    println!("Pass rate: {:.2}%", summary.overview.pass_rate);
    if let Some(mode) = summary.overview.most_popular_mode {
        println!("Most popular mode: {mode}");
    }
    if summary.overview.average_time_secs > 0.0 {
        println!("Average time: {:.0}s", summary.overview.average_time_secs);
    }

    print_breakdown("By mode", &summary.by_mode);
    print_breakdown("By difficulty", &summary.by_difficulty);
    print_breakdown("By topic", &summary.by_topic);

    if !summary.top_performers.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["User", "Attempts", "Avg", "Best"]);
        for performer in &summary.top_performers {
            table.add_row(vec![
                Cell::new(&performer.user_name),
                Cell::new(performer.total_attempts),
                Cell::new(format!("{:.2}", performer.average_score)),
                Cell::new(format!("{:.1}", performer.best_score)),
            ]);
        }
        println!("\nTop performers:");
        println!("{table}");
    }

    Ok(())
}

fn print_breakdown(title: &str, breakdown: &BTreeMap<String, ScoreBreakdown>) {
    if breakdown.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Group", "Attempts", "Avg", "Min", "Max"]);
    for (key, stats) in breakdown {
        table.add_row(vec![
            Cell::new(key),
            Cell::new(stats.count),
            Cell::new(format!("{:.2}", stats.average_score)),
            Cell::new(format!("{:.1}", stats.min_score)),
            Cell::new(format!("{:.1}", stats.max_score)),
        ]);
    }
    println!("\n{title}:");
    println!("{table}");
}
