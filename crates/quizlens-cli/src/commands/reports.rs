//! The `quizlens reports` command family.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use uuid::Uuid;

use quizlens_core::reports::{NewReport, ReportStatus, ReportType};

pub async fn list(
    status: Option<String>,
    limit: Option<usize>,
    format: String,
    config: Option<PathBuf>,
) -> Result<()> {
    let store = super::open_report_store(config.as_deref())?;
    let status = status
        .as_deref()
        .map(|s| s.parse::<ReportStatus>().map_err(anyhow::Error::msg))
        .transpose()?;
    let reports = store.list(status, limit).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("No reports found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Question", "Type", "Status", "Filed", "Reason"]);
    for report in &reports {
        table.add_row(vec![
            Cell::new(report.id),
            Cell::new(&report.question_id),
            Cell::new(report.report_type),
            Cell::new(report.status),
            Cell::new(report.created_at.format("%Y-%m-%d")),
            Cell::new(report.reason.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn file(
    question_id: String,
    report_type: String,
    reason: Option<String>,
    reporter: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let store = super::open_report_store(config.as_deref())?;
    let report_type = report_type
        .parse::<ReportType>()
        .map_err(anyhow::Error::msg)?;

    let report = store
        .create(NewReport {
            reason,
            reporter,
            ..NewReport::new(question_id, report_type)
        })
        .await?;

    println!("Filed report {} for question {}", report.id, report.question_id);
    Ok(())
}

pub async fn review(
    id: String,
    status: String,
    reviewer: Option<String>,
    notes: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let store = super::open_report_store(config.as_deref())?;
    let id = Uuid::parse_str(&id).context("invalid report id")?;
    let status = status.parse::<ReportStatus>().map_err(anyhow::Error::msg)?;

    match store
        .update_status(id, status, reviewer.as_deref(), notes.as_deref())
        .await?
    {
        Some(report) => {
            println!("Report {} is now {}", report.id, report.status);
            Ok(())
        }
        None => anyhow::bail!("no report with id: {id}"),
    }
}

pub async fn delete(id: String, config: Option<PathBuf>) -> Result<()> {
    let store = super::open_report_store(config.as_deref())?;
    let id = Uuid::parse_str(&id).context("invalid report id")?;

    if store.delete(id).await? {
        println!("Deleted report {id}");
        Ok(())
    } else {
        anyhow::bail!("no report with id: {id}")
    }
}
