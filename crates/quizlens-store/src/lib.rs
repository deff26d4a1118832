//! quizlens-store — Attempt and report storage backends.
//!
//! Implements the `AttemptStore` and `ReportStore` traits over an in-memory
//! backend (tests, ephemeral runs) and a JSON-file backend (the CLI's
//! default), plus the TOML configuration layer that selects between them.

pub mod config;
pub mod json;
pub mod memory;

pub use config::{load_config, load_config_from, QuizlensConfig, StorageConfig};
pub use json::{JsonAttemptStore, JsonReportStore};
pub use memory::{MemoryAttemptStore, MemoryReportStore};
