//! SQLite history store: analysis reports and chat logs.
//!
//! Opened once at process start and passed by reference into whatever needs
//! it; no module-level singleton. The engine never reads back its own
//! writes within a request; readers are the history view and the
//! assistant's grounding path.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use stockpilot_engine::IntelligenceReport;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Stored payload is not a valid report: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One persisted analysis run.
#[derive(Debug, Clone)]
pub struct StoredReport {
    pub id: i64,
    pub filename: String,
    pub report: IntelligenceReport,
    pub created_at: String,
}

/// One persisted assistant exchange.
#[derive(Debug, Clone)]
pub struct StoredChat {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: String,
}

/// Headline counters for the history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_predictions: i64,
    pub total_consultations: i64,
}

pub struct HistoryStore {
    // rusqlite connections are Send but not Sync; the mutex makes the store
    // shareable with the async side-effect path.
    conn: Mutex<Connection>,
}

impl HistoryStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS prediction_history (
                id INTEGER PRIMARY KEY,
                filename TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS chat_log (
                id INTEGER PRIMARY KEY,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn save_report(&self, filename: &str, report: &IntelligenceReport) -> StoreResult<i64> {
        let payload = serde_json::to_string(report)?;
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute(
            "INSERT INTO prediction_history (filename, payload, created_at) VALUES (?, ?, ?)",
            params![filename, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The most recently stored report, if any.
    pub fn latest_report(&self) -> StoreResult<Option<StoredReport>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let row = conn
            .query_row(
                "SELECT id, filename, payload, created_at FROM prediction_history
                 ORDER BY created_at DESC, id DESC LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, filename, payload, created_at)| {
            Ok(StoredReport {
                id,
                filename,
                report: serde_json::from_str(&payload)?,
                created_at,
            })
        })
        .transpose()
    }

    pub fn report_by_id(&self, id: i64) -> StoreResult<Option<StoredReport>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let row = conn
            .query_row(
                "SELECT id, filename, payload, created_at FROM prediction_history WHERE id = ?",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, filename, payload, created_at)| {
            Ok(StoredReport {
                id,
                filename,
                report: serde_json::from_str(&payload)?,
                created_at,
            })
        })
        .transpose()
    }

    /// Recent analysis runs, newest first.
    pub fn recent_reports(&self, limit: usize) -> StoreResult<Vec<StoredReport>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, filename, payload, created_at FROM prediction_history
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut reports = Vec::new();
        for row in rows {
            let (id, filename, payload, created_at) = row?;
            reports.push(StoredReport {
                id,
                filename,
                report: serde_json::from_str(&payload)?,
                created_at,
            });
        }
        Ok(reports)
    }

    pub fn log_chat(&self, question: &str, answer: &str) -> StoreResult<i64> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute(
            "INSERT INTO chat_log (question, answer, created_at) VALUES (?, ?, ?)",
            params![question, answer, Utc::now().to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn chat_by_id(&self, id: i64) -> StoreResult<Option<StoredChat>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        Ok(conn
            .query_row(
                "SELECT id, question, answer, created_at FROM chat_log WHERE id = ?",
                params![id],
                |row| {
                    Ok(StoredChat {
                        id: row.get(0)?,
                        question: row.get(1)?,
                        answer: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    /// Recent assistant exchanges, newest first.
    pub fn recent_chats(&self, limit: usize) -> StoreResult<Vec<StoredChat>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, question, answer, created_at FROM chat_log
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(StoredChat {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    pub fn stats(&self) -> StoreResult<HistoryStats> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let total_predictions =
            conn.query_row("SELECT COUNT(*) FROM prediction_history", [], |r| r.get(0))?;
        let total_consultations =
            conn.query_row("SELECT COUNT(*) FROM chat_log", [], |r| r.get(0))?;
        Ok(HistoryStats { total_predictions, total_consultations })
    }
}
