//! Daily record storage collaborator.
//!
//! Persists scored [`DailyActivityRecord`]s and reads a user's history back
//! in ascending timestamp order - the precondition the streak and trend
//! analyzers rely on. The store appends; one-record-per-user-per-day is the
//! submission flow's invariant, checked by callers via [`RecordStore::record_for_day`].

use crate::record::DailyActivityRecord;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use uuid::Uuid;

/// SQLite-backed store for daily activity records.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open or create the record database at a path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS daily_records (
                id TEXT PRIMARY KEY,
                user TEXT NOT NULL,
                path_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                home_cooked_meals INTEGER NOT NULL,
                junk_food INTEGER NOT NULL,
                exercise_minutes INTEGER NOT NULL,
                strength_training INTEGER NOT NULL,
                no_spending INTEGER NOT NULL,
                invested_bitcoin INTEGER NOT NULL,
                meditation INTEGER NOT NULL,
                gratitude INTEGER NOT NULL,
                read_or_learned INTEGER NOT NULL,
                environmental_action INTEGER NOT NULL,
                score INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_records_user_time
                ON daily_records(user, timestamp);
            "#,
        )?;
        Ok(Self { conn })
    }

    /// Append a scored record.
    pub fn insert(&self, record: &DailyActivityRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO daily_records
                 (id, user, path_id, timestamp,
                  home_cooked_meals, junk_food, exercise_minutes, strength_training,
                  no_spending, invested_bitcoin, meditation, gratitude,
                  read_or_learned, environmental_action, score)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                Uuid::new_v4().to_string(),
                record.user,
                record.path_id,
                record.timestamp,
                record.home_cooked_meals,
                record.junk_food,
                record.exercise_minutes,
                record.strength_training,
                record.no_spending,
                record.invested_bitcoin,
                record.meditation,
                record.gratitude,
                record.read_or_learned,
                record.environmental_action,
                record.score,
            ],
        )?;
        Ok(())
    }

    /// Full history for a user, ascending by timestamp.
    pub fn history(&self, user: &str) -> Result<Vec<DailyActivityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT user, path_id, timestamp,
                    home_cooked_meals, junk_food, exercise_minutes, strength_training,
                    no_spending, invested_bitcoin, meditation, gratitude,
                    read_or_learned, environmental_action, score
             FROM daily_records
             WHERE user = ?1
             ORDER BY timestamp ASC",
        )?;
        let rows = stmt.query_map(params![user], row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// The user's record for one calendar day, if any.
    pub fn record_for_day(&self, user: &str, day: NaiveDate) -> Result<Option<DailyActivityRecord>> {
        // Timestamps are RFC 3339 in UTC, so the day is a string prefix.
        let prefix = format!("{}%", day);
        let mut stmt = self.conn.prepare(
            "SELECT user, path_id, timestamp,
                    home_cooked_meals, junk_food, exercise_minutes, strength_training,
                    no_spending, invested_bitcoin, meditation, gratitude,
                    read_or_learned, environmental_action, score
             FROM daily_records
             WHERE user = ?1 AND timestamp LIKE ?2
             ORDER BY timestamp ASC
             LIMIT 1",
        )?;
        let mut rows = stmt.query_map(params![user, prefix], row_to_record)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Number of records stored for a user.
    pub fn count(&self, user: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM daily_records WHERE user = ?1",
            params![user],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<DailyActivityRecord> {
    Ok(DailyActivityRecord {
        user: row.get(0)?,
        path_id: row.get(1)?,
        timestamp: row.get(2)?,
        home_cooked_meals: row.get(3)?,
        junk_food: row.get(4)?,
        exercise_minutes: row.get(5)?,
        strength_training: row.get(6)?,
        no_spending: row.get(7)?,
        invested_bitcoin: row.get(8)?,
        meditation: row.get(9)?,
        gratitude: row.get(10)?,
        read_or_learned: row.get(11)?,
        environmental_action: row.get(12)?,
        score: row.get(13)?,
    })
}
