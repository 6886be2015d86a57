//! # imessage-wrapped-core
//!
//! Core library for imessage-wrapped - your year in iMessage emoji and reactions.
//!
//! This library provides:
//! - Read-only access to the Messages `chat.db`
//! - Timestamp decoding between `chat.db` time and calendar dates
//! - Row classification into messages and tapbacks
//! - Per-year aggregation into [`YearStats`]
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows one way, in a single batch pass:
//! raw rows → classified events → aggregated statistics → rendered report.
//! Rendering lives in the `imessage-wrapped` binary.
//!
//! ## Example
//!
//! ```rust,no_run
//! use imessage_wrapped_core::{generate_wrapped, Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open_read_only(&config.database_path()).expect("failed to open database");
//! let stats = generate_wrapped(&db, 2024).expect("failed to aggregate");
//! println!("sent {} messages", stats.total_sent());
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{aggregate, generate_wrapped, ReactionLabel, YearStats};
pub use classify::classify;
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod time;
pub mod types;
