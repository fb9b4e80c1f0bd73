use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use std::sync::Mutex;
use crate::data::types::{HistoryEntry, HistoryRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),

    #[error("history query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Append-only sink for completed predictions.
///
/// Implementations are blocking; async callers go through
/// `tokio::task::spawn_blocking`.
pub trait HistoryStore: Send + Sync {
    /// Persist `entry`, stamping it with the current time.
    fn insert(&self, entry: &HistoryEntry) -> Result<HistoryRecord, StoreError>;

    /// Up to `limit` records, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError>;
}

pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open history database: {}", db_path))?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                batting_team TEXT NOT NULL,
                bowling_team TEXT NOT NULL,
                city TEXT NOT NULL,
                target REAL NOT NULL,
                score REAL NOT NULL,
                overs REAL NOT NULL,
                wickets INTEGER NOT NULL,
                win_probability REAL NOT NULL,
                loss_probability REAL NOT NULL,
                created_at TIMESTAMP NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_predictions_created_at ON predictions(created_at);
            "#
        )
        .context("Failed to initialize history schema")?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn insert(&self, entry: &HistoryEntry) -> Result<HistoryRecord, StoreError> {
        let created_at = Utc::now();
        let req = &entry.request;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO predictions (batting_team, bowling_team, city, target, score, overs, wickets,
                                      win_probability, loss_probability, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                req.batting_team,
                req.bowling_team,
                req.city,
                req.target,
                req.score,
                req.overs,
                req.wickets,
                entry.win_probability,
                entry.loss_probability,
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;

        Ok(HistoryRecord {
            id: conn.last_insert_rowid(),
            batting_team: req.batting_team.clone(),
            bowling_team: req.bowling_team.clone(),
            city: req.city.clone(),
            target: req.target,
            score: req.score,
            overs: req.overs,
            wickets: req.wickets,
            win_probability: entry.win_probability,
            loss_probability: entry.loss_probability,
            created_at,
        })
    }

    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, batting_team, bowling_team, city, target, score, overs, wickets,
                    win_probability, loss_probability, created_at
             FROM predictions
             ORDER BY created_at DESC, id DESC
             LIMIT ?1"
        )?;

        let records = stmt.query_map(params![limit as i64], |row| {
            let created_at_str: String = row.get(10)?;
            let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?
                .with_timezone(&Utc);

            Ok(HistoryRecord {
                id: row.get(0)?,
                batting_team: row.get(1)?,
                bowling_team: row.get(2)?,
                city: row.get(3)?,
                target: row.get(4)?,
                score: row.get(5)?,
                overs: row.get(6)?,
                wickets: row.get(7)?,
                win_probability: row.get(8)?,
                loss_probability: row.get(9)?,
                created_at,
            })
        })?;

        records.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }
}
