//! Storage layer for timekeep.
//!
//! Provides the time entry store: an append-only log of labelled intervals
//! persisted with `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` is meant to be owned by a single command invocation. Access to the same
//! file from several processes is left to SQLite's own locking.
//!
//! # Schema
//!
//! One table, `time_entries`:
//!
//! | column       | type                              |
//! |--------------|-----------------------------------|
//! | `id`         | `INTEGER PRIMARY KEY AUTOINCREMENT` |
//! | `label`      | `TEXT NOT NULL`                   |
//! | `start_time` | `TIMESTAMP NOT NULL`              |
//! | `end_time`   | `TIMESTAMP` (NULL while open)     |
//!
//! ## Timestamp Format
//!
//! Timestamps are local wall-clock time stored as TEXT without an offset
//! (e.g. `2025-03-14T09:00:00.000000`). This format:
//! - Orders lexicographically the same as chronologically
//! - Is understood by SQLite's date functions, so month/year filters run in SQL
//! - Matches what earlier Python-era `timekeep` databases contain
//!
//! # Invariants
//!
//! - At most one open entry (`end_time IS NULL`) per label.
//! - `start_time` is never updated; `end_time` is written once, by [`Database::stop`].
//! - Rows are never deleted.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use thiserror::Error;
use tk_core::{Label, LabelHours, ReportQuery, hours_between};

/// Format used to write timestamps.
const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Format used to read timestamps; the fractional part is optional.
const TIMESTAMP_READ_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The storage file or its directory could not be created or opened.
    #[error("failed to initialize storage at {}", path.display())]
    StorageInit {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// `start` was called for a label that already has an open session.
    #[error("active session already exists for label '{0}'")]
    SessionAlreadyActive(Label),
    /// `stop` was called for a label with no open session.
    #[error("no active session found for label '{0}'")]
    NoActiveSession(Label),
    /// More than one open session exists for a label.
    #[error(
        "found {count} open sessions for label '{label}' (ids {open_ids:?}), expected at most one",
        count = .open_ids.len()
    )]
    ConsistencyViolation { label: Label, open_ids: Vec<i64> },
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for entry {entry_id}: {timestamp}")]
    TimestampParse {
        entry_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// One row of the `time_entries` log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: i64,
    pub label: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
}

impl TimeEntry {
    /// Whether the session is still running.
    pub const fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Hours elapsed from start to `end_time`, or to `now` while open.
    pub fn elapsed_hours(&self, now: NaiveDateTime) -> f64 {
        hours_between(self.start_time, self.end_time.unwrap_or(now))
    }
}

/// Result of a successful [`Database::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedSession {
    pub id: i64,
    pub label: Label,
    pub start_time: NaiveDateTime,
}

/// Result of a successful [`Database::stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppedSession {
    pub id: i64,
    pub label: Label,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Number of rows the update touched. Always 1 on success.
    pub rows_updated: usize,
}

impl StoppedSession {
    /// Length of the closed session in hours.
    pub fn hours(&self) -> f64 {
        hours_between(self.start_time, self.end_time)
    }
}

/// Row as read from SQLite, before timestamp parsing.
struct RawEntry {
    id: i64,
    label: String,
    start_time: String,
    end_time: Option<String>,
}

impl RawEntry {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            label: row.get(1)?,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
        })
    }

    fn parse(self) -> Result<TimeEntry, DbError> {
        let start_time = parse_timestamp(&self.start_time, self.id)?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|end| parse_timestamp(end, self.id))
            .transpose()?;
        Ok(TimeEntry {
            id: self.id,
            label: self.label,
            start_time,
            end_time,
        })
    }
}

impl Database {
    /// Opens the store at the given path, creating it if necessary.
    ///
    /// Missing parent directories are created and the schema is initialized.
    /// Both steps are idempotent, so this is safe on every process start.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let storage_init = |source: Box<dyn std::error::Error + Send + Sync>| DbError::StorageInit {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| storage_init(Box::new(e)))?;
        }

        let conn = Connection::open(path).map_err(|e| storage_init(Box::new(e)))?;
        let db = Self { conn };
        db.init().map_err(|e| storage_init(Box::new(e)))?;
        tracing::debug!(path = %path.display(), "opened time entry store");
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
    fn init(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "
            -- start_time/end_time: local ISO 8601 without offset
            -- end_time IS NULL marks an open session
            CREATE TABLE IF NOT EXISTS time_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL,
                start_time TIMESTAMP NOT NULL,
                end_time TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_time_entries_label_end ON time_entries(label, end_time);
            ",
        )
    }

    /// Starts a session for `label` at the current local time.
    pub fn start(&mut self, label: &Label) -> Result<StartedSession, DbError> {
        self.start_at(label, now())
    }

    /// Starts a session for `label` at `now`.
    ///
    /// Fails with [`DbError::SessionAlreadyActive`] if the label already has an
    /// open session. The check and the insert share one write transaction.
    pub fn start_at(
        &mut self,
        label: &Label,
        now: NaiveDateTime,
    ) -> Result<StartedSession, DbError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<i64> = tx
            .query_row(
                "
                SELECT id FROM time_entries
                WHERE label = ? AND end_time IS NULL
                ORDER BY id ASC
                LIMIT 1
                ",
                [label.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            tracing::debug!(%label, id, "session already active");
            return Err(DbError::SessionAlreadyActive(label.clone()));
        }

        tx.execute(
            "INSERT INTO time_entries (label, start_time) VALUES (?, ?)",
            params![label.as_str(), format_timestamp(now)],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(%label, id, start_time = %now, "started session");
        Ok(StartedSession {
            id,
            label: label.clone(),
            start_time: now,
        })
    }

    /// Stops the open session for `label` at the current local time.
    pub fn stop(&mut self, label: &Label) -> Result<StoppedSession, DbError> {
        self.stop_at(label, now())
    }

    /// Stops the open session for `label` at `now`.
    ///
    /// Fails with [`DbError::NoActiveSession`] if nothing is open, and with
    /// [`DbError::ConsistencyViolation`] if more than one entry is open. Neither
    /// failure modifies the store.
    pub fn stop_at(
        &mut self,
        label: &Label,
        now: NaiveDateTime,
    ) -> Result<StoppedSession, DbError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut open = {
            let mut stmt = tx.prepare(
                "
                SELECT id, label, start_time, end_time
                FROM time_entries
                WHERE label = ? AND end_time IS NULL
                ORDER BY id ASC
                ",
            )?;
            let rows = stmt.query_map([label.as_str()], RawEntry::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        if open.len() > 1 {
            let open_ids: Vec<i64> = open.iter().map(|entry| entry.id).collect();
            tracing::warn!(%label, ?open_ids, "multiple open sessions for one label");
            return Err(DbError::ConsistencyViolation {
                label: label.clone(),
                open_ids,
            });
        }
        let Some(entry) = open.pop() else {
            return Err(DbError::NoActiveSession(label.clone()));
        };
        let entry = entry.parse()?;

        let rows_updated = tx.execute(
            "UPDATE time_entries SET end_time = ? WHERE id = ? AND end_time IS NULL",
            params![format_timestamp(now), entry.id],
        )?;
        tx.commit()?;

        tracing::debug!(%label, id = entry.id, end_time = %now, rows_updated, "stopped session");
        Ok(StoppedSession {
            id: entry.id,
            label: label.clone(),
            start_time: entry.start_time,
            end_time: now,
            rows_updated,
        })
    }

    /// Sums closed-session hours per label for the queried month.
    ///
    /// Entries are attributed to the month their `start_time` falls in. Open
    /// sessions are ignored. Without a year the month is matched in every year.
    /// Returns an empty vector when nothing matches.
    pub fn report(&self, query: ReportQuery) -> Result<Vec<LabelHours>, DbError> {
        let month = format!("{:02}", query.month.value());
        let year = query.year.map(|year| year.to_string());

        let mut stmt = self.conn.prepare(
            "
            SELECT id, label, start_time, end_time
            FROM time_entries
            WHERE end_time IS NOT NULL
              AND strftime('%m', start_time) = ?1
              AND (?2 IS NULL OR strftime('%Y', start_time) = ?2)
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map(params![month, year], RawEntry::from_row)?;

        let mut intervals = Vec::new();
        for row in rows {
            let entry = row?.parse()?;
            if let Some(end) = entry.end_time {
                intervals.push((entry.label, hours_between(entry.start_time, end)));
            }
        }

        tracing::debug!(
            month = %query.month,
            year = ?query.year,
            entries = intervals.len(),
            "computed monthly report"
        );
        Ok(LabelHours::sum_by_label(intervals))
    }

    /// Lists every entry in insertion order.
    pub fn list_entries(&self) -> Result<Vec<TimeEntry>, DbError> {
        self.query_entries(
            "
            SELECT id, label, start_time, end_time
            FROM time_entries
            ORDER BY id ASC
            ",
            [],
        )
    }

    /// Lists open sessions ordered by start time.
    pub fn open_entries(&self) -> Result<Vec<TimeEntry>, DbError> {
        self.query_entries(
            "
            SELECT id, label, start_time, end_time
            FROM time_entries
            WHERE end_time IS NULL
            ORDER BY start_time ASC, id ASC
            ",
            [],
        )
    }

    /// Lists open sessions for a single label.
    pub fn open_entries_for(&self, label: &Label) -> Result<Vec<TimeEntry>, DbError> {
        self.query_entries(
            "
            SELECT id, label, start_time, end_time
            FROM time_entries
            WHERE label = ? AND end_time IS NULL
            ORDER BY id ASC
            ",
            [label.as_str()],
        )
    }

    fn query_entries<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<TimeEntry>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, RawEntry::from_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.parse()?);
        }
        Ok(entries)
    }
}

/// Current local wall-clock time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn parse_timestamp(timestamp: &str, entry_id: i64) -> Result<NaiveDateTime, DbError> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_READ_FORMAT).map_err(|source| {
        DbError::TimestampParse {
            entry_id,
            timestamp: timestamp.to_string(),
            source,
        }
    })
}

fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_WRITE_FORMAT).to_string()
}
