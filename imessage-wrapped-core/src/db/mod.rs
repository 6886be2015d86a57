//! Database layer for imessage-wrapped
//!
//! Read-only access to the Messages `chat.db`:
//! - Schema probing for columns that vary across macOS releases
//! - Year-range record queries
//!
//! The database is never migrated or written.

pub mod repo;
pub mod schema;

pub use repo::Database;
pub use schema::MessageColumns;
