//! Storage layer for clockbot.
//!
//! Provides an append-only SQLite log of clock events using `rusqlite`, and
//! implements [`cb_core::EventStore`] on top of it.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization. Wrap it in a `Mutex` if
//! several threads need to append or report.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 UTC with a fixed six fractional
//! digits (e.g., `2024-01-15T10:30:00.000000Z`). The fixed width means:
//! - Lexicographic ordering matches chronological ordering
//! - `timestamp >= ?` comparisons work directly on the column
//! - Values stay human-readable in the database
//!
//! ## Ordering
//!
//! Events are returned by `timestamp` then `id`, so two events recorded at the
//! same instant come back in the order they were appended. Users are listed
//! in the order of their first event.

use std::path::Path;

use cb_core::{Action, ClockEvent, EventStore, Identity, StoreError};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for event {event_id}: {timestamp}")]
    TimestampParse {
        event_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row does not describe a valid clock event.
    #[error("invalid event data for {event_id}: {message}")]
    InvalidEventData { event_id: i64, message: String },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::backend(err)
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A stored row, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EventRow {
    id: i64,
    identity: String,
    action: String,
    timestamp: String,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Events table: append-only clock log
            -- timestamp: RFC 3339 UTC, fixed microsecond width
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                identity TEXT NOT NULL,
                action TEXT NOT NULL CHECK (action IN ('in', 'out')),
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_identity_timestamp
                ON events(identity, timestamp);
            ",
        )?;
        Ok(())
    }

    /// Appends one event.
    pub fn insert_event(
        &self,
        user: &Identity,
        action: Action,
        timestamp: DateTime<Utc>,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO events (identity, action, timestamp) VALUES (?, ?, ?)",
            params![user.as_str(), action.as_str(), format_timestamp(timestamp)],
        )?;
        tracing::debug!(%user, %action, %timestamp, "stored clock event");
        Ok(())
    }

    /// Lists `user`'s events at or after `since`, oldest first.
    pub fn list_events(
        &self,
        user: &Identity,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ClockEvent>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, identity, action, timestamp
            FROM events
            WHERE identity = ?1 AND (?2 IS NULL OR timestamp >= ?2)
            ORDER BY timestamp ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(params![user.as_str(), since.map(format_timestamp)], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                identity: row.get(1)?,
                action: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row_to_event(row?)?);
        }
        Ok(events)
    }

    /// Lists every identity with at least one event, by first appearance.
    pub fn list_users(&self) -> Result<Vec<Identity>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT identity, MIN(id) AS first_id
            FROM events
            GROUP BY identity
            ORDER BY first_id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            let identity: String = row.get(0)?;
            let first_id: i64 = row.get(1)?;
            Ok((identity, first_id))
        })?;
        let mut users = Vec::new();
        for row in rows {
            let (identity, first_id) = row?;
            let user = Identity::new(identity).map_err(|err| DbError::InvalidEventData {
                event_id: first_id,
                message: err.to_string(),
            })?;
            users.push(user);
        }
        Ok(users)
    }

    /// Counts all stored events.
    pub fn event_count(&self) -> Result<i64, DbError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Returns the most recently recorded event, if any.
    pub fn last_event(&self) -> Result<Option<ClockEvent>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, identity, action, timestamp
            FROM events
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            ",
        )?;
        let mut rows = stmt.query_map([], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                identity: row.get(1)?,
                action: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;
        rows.next().transpose()?.map(row_to_event).transpose()
    }
}

impl EventStore for Database {
    fn append_event(
        &self,
        user: &Identity,
        action: Action,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Ok(self.insert_event(user, action, timestamp)?)
    }

    fn query_events(
        &self,
        user: &Identity,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ClockEvent>, StoreError> {
        Ok(self.list_events(user, since)?)
    }

    fn list_distinct_users(&self) -> Result<Vec<Identity>, StoreError> {
        Ok(self.list_users()?)
    }
}

fn row_to_event(row: EventRow) -> Result<ClockEvent, DbError> {
    let user = Identity::new(row.identity).map_err(|err| DbError::InvalidEventData {
        event_id: row.id,
        message: err.to_string(),
    })?;
    let action: Action = row
        .action
        .parse()
        .map_err(|err: cb_core::UnknownAction| DbError::InvalidEventData {
            event_id: row.id,
            message: err.to_string(),
        })?;
    let timestamp = parse_timestamp(&row.timestamp, row.id)?;
    Ok(ClockEvent::new(user, action, timestamp))
}

fn parse_timestamp(timestamp: &str, event_id: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            event_id,
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}
