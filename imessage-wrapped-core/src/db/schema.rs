//! Messages `chat.db` schema knowledge
//!
//! The database belongs to Messages.app and is never migrated or written. Its
//! `message` table has grown columns across macOS releases, so we probe what
//! exists once at open time and build the record query from that.

use crate::error::{Error, Result};
use rusqlite::Connection;
use std::collections::HashSet;

/// Table holding messages and tapbacks alike
pub const MESSAGE_TABLE: &str = "message";

/// Nanoseconds since 2001-01-01 UTC
pub const DATE: &str = "date";
/// 1 when sent by the local user
pub const IS_FROM_ME: &str = "is_from_me";
/// 0 for messages, 2000-2005 for tapbacks
pub const ASSOCIATED_MESSAGE_TYPE: &str = "associated_message_type";
/// `guid` of the message a tapback points at
pub const ASSOCIATED_MESSAGE_GUID: &str = "associated_message_guid";
/// Custom emoji payload, macOS 14 / iOS 17 and later
pub const ASSOCIATED_MESSAGE_EMOJI: &str = "associated_message_emoji";

const REQUIRED_COLUMNS: [&str; 3] = [DATE, IS_FROM_ME, ASSOCIATED_MESSAGE_TYPE];

/// Which optional `message` columns this database has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageColumns {
    pub has_associated_guid: bool,
    pub has_custom_emoji: bool,
}

impl MessageColumns {
    /// Inspect the `message` table, failing if a required column is missing.
    pub fn probe(conn: &Connection) -> Result<Self> {
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let columns = stmt
            .query_map([MESSAGE_TABLE], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;

        if columns.is_empty() {
            return Err(Error::Schema(format!(
                "no `{MESSAGE_TABLE}` table; is this a Messages database?"
            )));
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Schema(format!(
                "`{MESSAGE_TABLE}` table is missing column(s): {}",
                missing.join(", ")
            )));
        }

        let found = Self {
            has_associated_guid: columns.contains(ASSOCIATED_MESSAGE_GUID),
            has_custom_emoji: columns.contains(ASSOCIATED_MESSAGE_EMOJI),
        };
        tracing::debug!(?found, "probed message table");
        Ok(found)
    }

    /// Query for rows with `?1 <= date < ?2`. Absent optional columns read as NULL.
    pub fn records_query(&self) -> String {
        let guid = if self.has_associated_guid {
            ASSOCIATED_MESSAGE_GUID
        } else {
            "NULL"
        };
        let emoji = if self.has_custom_emoji {
            ASSOCIATED_MESSAGE_EMOJI
        } else {
            "NULL"
        };
        format!(
            r#"
            SELECT
                ROWID,
                {DATE},
                {IS_FROM_ME},
                {ASSOCIATED_MESSAGE_TYPE},
                {guid},
                {emoji}
            FROM {MESSAGE_TABLE}
            WHERE {DATE} >= ?1 AND {DATE} < ?2
            "#
        )
    }
}
