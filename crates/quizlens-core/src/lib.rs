//! quizlens-core — Question performance analytics over quiz attempt logs.
//!
//! This crate defines the data model, the aggregation and insight
//! algorithms, and the store traits that the rest of the quizlens system
//! builds on.

pub mod details;
pub mod engine;
pub mod error;
pub mod insight;
pub mod model;
pub mod pattern;
pub mod reports;
pub mod statistics;
pub mod summary;
pub mod traits;
