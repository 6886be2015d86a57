//! Database repository layer
//!
//! Read-only access to the Messages database. Nothing here ever opens a write
//! transaction: the connection is opened with `SQLITE_OPEN_READ_ONLY` and
//! `query_only` is switched on as well.

use crate::db::schema::{MessageColumns, MESSAGE_TABLE};
use crate::error::{Error, Result};
use crate::types::RawRecord;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long to wait if Messages.app holds a lock on the database
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only handle to a Messages `chat.db`
pub struct Database {
    conn: Connection,
    columns: MessageColumns,
    path: PathBuf,
}

impl Database {
    /// Open an existing database read-only.
    ///
    /// A missing file is [`Error::DatabaseNotFound`]. Anything that stops us
    /// from opening or reading it (most often missing Full Disk Access) is
    /// [`Error::DatabaseAccess`].
    pub fn open_read_only(path: &Path) -> Result<Self> {
        // An unreadable parent directory is an access problem, not a missing file,
        // so only a definite `Ok(false)` counts as not found.
        if let Ok(false) = path.try_exists() {
            return Err(Error::DatabaseNotFound(path.to_path_buf()));
        }

        let access = |source: rusqlite::Error| Error::DatabaseAccess {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(access)?;

        // macOS privacy protection only bites on first read, so probe here
        let db = Self::from_connection(conn, path).map_err(|e| match e {
            Error::Database(source) => access(source),
            other => other,
        })?;

        tracing::info!(path = %path.display(), columns = ?db.columns, "Opened message database");
        Ok(db)
    }

    /// Wrap an already-open connection (for testing).
    pub fn from_connection(conn: Connection, path: &Path) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "query_only", true)?;
        let columns = MessageColumns::probe(&conn)?;
        Ok(Self {
            conn,
            columns,
            path: path.to_path_buf(),
        })
    }

    /// Where this database was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Optional columns found in the `message` table
    pub fn columns(&self) -> MessageColumns {
        self.columns
    }

    /// Total rows in the `message` table.
    pub fn message_count(&self) -> Result<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {MESSAGE_TABLE}"),
            [],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    /// Rows whose native timestamp falls in `range` (end exclusive).
    pub fn get_records_in_range(&self, range: Range<i64>) -> Result<Vec<RawRecord>> {
        let mut stmt = self.conn.prepare(&self.columns.records_query())?;
        let records = stmt
            .query_map(params![range.start, range.end], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(
            start = range.start,
            end = range.end,
            rows = records.len(),
            "Fetched message rows"
        );
        Ok(records)
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<RawRecord> {
        Ok(RawRecord {
            id: row.get(0)?,
            timestamp: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
            is_from_me: row.get::<_, Option<bool>>(2)?.unwrap_or(false),
            associated_type: row.get(3)?,
            associated_guid: row.get(4)?,
            custom_emoji: row.get(5)?,
        })
    }
}
