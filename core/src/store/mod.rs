//! SQLite persistence layer.
//!
//! RULE: only the store talks to the database.
//! The desk calls store methods; it never executes SQL directly.
//! The engine never sees the store at all.

use crate::{
    error::{DeskError, DeskResult},
    event::EventLogEntry,
    types::ShiftDate,
};
use rusqlite::{params, Connection, OptionalExtension};

mod assignment;
mod requirement;
mod roster;

const ROTATION_KEY: &str = "rotation_enabled";

pub struct DeskStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl DeskStore {
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn, path: None })
    }

    /// The file backing this store, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Session ────────────────────────────────────────────────

    pub fn insert_session(&self, session_id: &str, version: &str, opened_on: ShiftDate) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO session (session_id, version, opened_on) VALUES (?1, ?2, ?3)",
            params![session_id, version, opened_on.to_string()],
        )?;
        Ok(())
    }

    pub fn session_count(&self) -> DeskResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM session", [], |row| row.get(0))?;
        Ok(count)
    }

    // ── Settings ───────────────────────────────────────────────

    pub fn save_rotation_enabled(&self, enabled: bool) -> DeskResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO setting (key, value) VALUES (?1, ?2)",
            params![ROTATION_KEY, serde_json::to_string(&enabled)?],
        )?;
        Ok(())
    }

    /// None until the flag has been saved once.
    pub fn load_rotation_enabled(&self) -> DeskResult<Option<bool>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM setting WHERE key = ?1",
                params![ROTATION_KEY],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|v| serde_json::from_str(&v).map_err(DeskError::from))
            .transpose()
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (session_id, shift_date, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.session_id,
                entry.shift_date.to_string(),
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_day(&self, session_id: &str, date: ShiftDate) -> DeskResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, event_type, payload
             FROM event_log WHERE session_id = ?1 AND shift_date = ?2
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![session_id, date.to_string()], |row| {
                Ok(EventLogEntry {
                    id: Some(row.get(0)?),
                    session_id: row.get(1)?,
                    shift_date: date,
                    event_type: row.get(2)?,
                    payload: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, session_id: &str) -> DeskResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn event_type_count(&self, session_id: &str, event_type: &str) -> DeskResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE session_id = ?1 AND event_type = ?2",
            params![session_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

pub(crate) fn parse_date(value: &str) -> DeskResult<ShiftDate> {
    value.parse().map_err(|_| DeskError::InvalidDate {
        value: value.to_string(),
    })
}
