//! The `quizlens pattern` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub async fn execute(question_id: String, format: String, config: Option<PathBuf>) -> Result<()> {
    let engine = super::build_engine(config.as_deref())?;
    let analysis = engine.answer_pattern_analysis(&question_id).await?;

    let Some(analysis) = analysis else {
        anyhow::bail!("no attempts recorded for question: {question_id}");
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("Question: {}", analysis.question_info.question_text);
    println!(
        "Attempts: {} ({} correct, {} incorrect, {:.1}% success)",
        analysis.statistics.total_attempts,
        analysis.statistics.correct_count,
        analysis.statistics.incorrect_count,
        analysis.statistics.success_rate
    );

    let mut table = Table::new();
    table.set_header(vec!["Answer", "Count", "Share %", "Correct"]);
    for (answer, share) in &analysis.answer_distribution {
        table.add_row(vec![
            Cell::new(answer),
            Cell::new(share.count),
            Cell::new(format!("{:.1}", share.percentage)),
            Cell::new(if share.is_correct { "yes" } else { "" }),
        ]);
    }
    println!("{table}");

    if !analysis.insights.is_empty() {
        println!("\nInsights:");
        for insight in &analysis.insights {
            println!("  - {insight}");
        }
    }

    Ok(())
}
