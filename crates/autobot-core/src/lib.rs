//! # autobot-core
//!
//! Core types, traits, and abstractions for the autobot publishing pipeline.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the other autobot crates depend on: keyword scoring records, the
//! error taxonomy, repository/provider seams, and shared configuration.

pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod text;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{AppConfig, ConfigError};
pub use error::{Error, Result};
pub use models::*;
pub use text::{dedup_preserving_order, round1, split_query, strip_html, word_count};
pub use traits::*;
