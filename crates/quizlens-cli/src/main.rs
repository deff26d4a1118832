//! quizlens CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizlens", version, about = "Question performance analytics for quiz logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show comprehensive question statistics
    Stats {
        /// Max questions per ranked list
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rank questions needing content improvement
    Improve {
        /// Max questions to show
        #[arg(long)]
        limit: Option<usize>,

        /// Only questions at or below this success rate
        #[arg(long)]
        max_success_rate: Option<f64>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyze the answer pattern of one question
    Pattern {
        /// Question to analyze
        #[arg(long)]
        question_id: String,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the detailed report for one question
    Details {
        /// Question to inspect
        #[arg(long)]
        question_id: String,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show attempt-level summary statistics
    Summary {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Manage user-submitted question reports
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },

    /// Create a starter config and data directory
    Init,
}

#[derive(Subcommand)]
enum ReportsAction {
    /// List reports, newest first
    List {
        /// Filter by status: pending, reviewed, resolved, dismissed
        #[arg(long)]
        status: Option<String>,

        /// Max reports to show
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// File a new report
    File {
        /// The reported question
        #[arg(long)]
        question_id: String,

        /// Problem category: incorrect_answer, unclear_question, typo, outdated, other
        #[arg(long, default_value = "other")]
        report_type: String,

        /// Free-text explanation
        #[arg(long)]
        reason: Option<String>,

        /// Reporter name
        #[arg(long)]
        reporter: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Apply a review decision to a report
    Review {
        /// Report id
        #[arg(long)]
        id: String,

        /// New status: reviewed, resolved, dismissed
        #[arg(long)]
        status: String,

        /// Reviewer name
        #[arg(long)]
        reviewer: Option<String>,

        /// Review notes
        #[arg(long)]
        notes: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete a report
    Delete {
        /// Report id
        #[arg(long)]
        id: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizlens=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Stats {
            limit,
            format,
            config,
        } => commands::stats::execute(limit, format, config).await,
        Commands::Improve {
            limit,
            max_success_rate,
            format,
            config,
        } => commands::improve::execute(limit, max_success_rate, format, config).await,
        Commands::Pattern {
            question_id,
            format,
            config,
        } => commands::pattern::execute(question_id, format, config).await,
        Commands::Details {
            question_id,
            format,
            config,
        } => commands::details::execute(question_id, format, config).await,
        Commands::Summary { format, config } => commands::summary::execute(format, config).await,
        Commands::Reports { action } => match action {
            ReportsAction::List {
                status,
                limit,
                format,
                config,
            } => commands::reports::list(status, limit, format, config).await,
            ReportsAction::File {
                question_id,
                report_type,
                reason,
                reporter,
                config,
            } => commands::reports::file(question_id, report_type, reason, reporter, config).await,
            ReportsAction::Review {
                id,
                status,
                reviewer,
                notes,
                config,
            } => commands::reports::review(id, status, reviewer, notes, config).await,
            ReportsAction::Delete { id, config } => commands::reports::delete(id, config).await,
        },
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
