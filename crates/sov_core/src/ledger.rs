//! XP ledger - append-only gamification record.
//!
//! The only component in the core with persistent, mutable state. Every
//! award is one immutable row; totals, levels, and per-source breakdowns are
//! derived on read. Idempotency rests on a single mechanism: a unique index
//! on `(user, reference_id)`. The ledger guarantees uniqueness of whatever
//! key it is given - it does not infer semantic duplicates. Callers that
//! need deduplication must supply a deterministic reference themselves
//! (e.g. `challenge_{id}_{date}`); an omitted reference is synthesized as a
//! fresh UUID and will never deduplicate anything.
//!
//! Duplicate detection is enforced at the storage layer, not by
//! check-then-insert: a constraint violation on the dedup key surfaces as
//! [`AwardOutcome::AlreadyApplied`], while any other storage failure
//! propagates as [`LedgerError::Storage`]. The two are never conflated.

use crate::error::LedgerError;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// XP per level. Flat, non-exponential leveling curve - a deliberate
/// simplification, not a cap on maximum level.
pub const XP_PER_LEVEL: i64 = 100;

/// How many transactions `xp_summary` returns in `recent`.
const RECENT_LIMIT: usize = 10;

/// Rank names per level band, for display.
const TITLE_BANDS: &[(u32, u32, &str)] = &[
    (1, 4, "Initiate"),
    (5, 9, "Apprentice"),
    (10, 19, "Disciplined"),
    (20, 34, "Practitioner"),
    (35, 49, "Architect"),
    (50, 69, "Master"),
    (70, 89, "Luminary"),
];

/// Title for levels past the last band.
const TITLE_SOVEREIGN: &str = "Sovereign";

/// Level for a total XP amount: `total / 100 + 1`.
pub fn level_for_xp(total_xp: i64) -> u32 {
    (total_xp.max(0) / XP_PER_LEVEL) as u32 + 1
}

/// Display title for a level.
pub fn level_title(level: u32) -> &'static str {
    for (lo, hi, title) in TITLE_BANDS {
        if level >= *lo && level <= *hi {
            return title;
        }
    }
    TITLE_SOVEREIGN
}

/// Outcome of an award or challenge-completion attempt.
///
/// `AlreadyApplied` is a recoverable no-op, not an error: "nothing happened
/// because you already did this" must stay distinguishable from "something
/// went wrong, try again" ([`LedgerError`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    Applied,
    AlreadyApplied,
}

/// Closed set of award sources. Persisted as plain strings for storage
/// portability, validated here at the system boundary so unknown tags are
/// rejected early instead of accumulating silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpSource {
    DailyChallenge,
    Achievement,
    Debug,
}

impl XpSource {
    pub fn as_str(self) -> &'static str {
        match self {
            XpSource::DailyChallenge => "daily_challenge",
            XpSource::Achievement => "achievement",
            XpSource::Debug => "debug",
        }
    }

    pub fn parse(tag: &str) -> Result<Self, LedgerError> {
        match tag {
            "daily_challenge" => Ok(XpSource::DailyChallenge),
            "achievement" => Ok(XpSource::Achievement),
            "debug" => Ok(XpSource::Debug),
            _ => Err(LedgerError::UnknownSource(tag.to_string())),
        }
    }
}

/// Closed set of daily challenge categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
    Meditation,
    Gratitude,
    Exercise,
    Nutrition,
    Financial,
    Learning,
    Environmental,
}

impl ChallengeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChallengeType::Meditation => "meditation",
            ChallengeType::Gratitude => "gratitude",
            ChallengeType::Exercise => "exercise",
            ChallengeType::Nutrition => "nutrition",
            ChallengeType::Financial => "financial",
            ChallengeType::Learning => "learning",
            ChallengeType::Environmental => "environmental",
        }
    }

    pub fn parse(tag: &str) -> Result<Self, LedgerError> {
        match tag {
            "meditation" => Ok(ChallengeType::Meditation),
            "gratitude" => Ok(ChallengeType::Gratitude),
            "exercise" => Ok(ChallengeType::Exercise),
            "nutrition" => Ok(ChallengeType::Nutrition),
            "financial" => Ok(ChallengeType::Financial),
            "learning" => Ok(ChallengeType::Learning),
            "environmental" => Ok(ChallengeType::Environmental),
            _ => Err(LedgerError::UnknownChallengeType(tag.to_string())),
        }
    }
}

/// One immutable ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpTransaction {
    pub id: String,
    pub user: String,
    /// Effective XP written: `round(amount * multiplier)`.
    pub amount: i64,
    pub source: String,
    pub description: String,
    pub reference_id: String,
    pub multiplier: f64,
    pub created_at: DateTime<Utc>,
}

/// Read model for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpSummary {
    pub total_xp: i64,
    pub level: u32,
    pub xp_into_level: i64,
    pub title: String,
    pub by_source: BTreeMap<String, i64>,
    pub recent: Vec<XpTransaction>,
}

/// SQLite-backed XP ledger.
pub struct XpLedger {
    conn: Connection,
}

impl XpLedger {
    /// Open or create the ledger database at a path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS xp_transactions (
                id TEXT PRIMARY KEY,
                user TEXT NOT NULL,
                amount INTEGER NOT NULL,
                source TEXT NOT NULL,
                description TEXT NOT NULL,
                reference_id TEXT NOT NULL,
                multiplier REAL NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(user, reference_id)
            );

            CREATE INDEX IF NOT EXISTS idx_xp_user ON xp_transactions(user);
            CREATE INDEX IF NOT EXISTS idx_xp_user_time
                ON xp_transactions(user, created_at);

            CREATE TABLE IF NOT EXISTS challenge_completions (
                id TEXT PRIMARY KEY,
                user TEXT NOT NULL,
                challenge_id TEXT NOT NULL,
                challenge_type TEXT NOT NULL,
                xp_reward INTEGER NOT NULL,
                completed_on TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                UNIQUE(user, challenge_id, completed_on)
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    /// Record an XP award.
    ///
    /// Supply `reference` when the award must be idempotent; the same
    /// `(user, reference)` pair is only ever credited once. With no
    /// reference a UUID is synthesized and every call applies.
    pub fn award_xp(
        &self,
        user: &str,
        amount: i64,
        source: XpSource,
        description: &str,
        reference: Option<&str>,
        multiplier: f64,
    ) -> Result<AwardOutcome, LedgerError> {
        let outcome = insert_award(
            &self.conn,
            user,
            amount,
            source,
            description,
            reference,
            multiplier,
        )?;
        match outcome {
            AwardOutcome::Applied => {
                info!(user, amount, source = source.as_str(), "xp awarded");
            }
            AwardOutcome::AlreadyApplied => {
                debug!(user, reference = reference.unwrap_or(""), "duplicate xp award skipped");
            }
        }
        Ok(outcome)
    }

    /// Complete a daily challenge for today (UTC).
    pub fn complete_daily_challenge(
        &self,
        user: &str,
        challenge_id: &str,
        challenge_type: ChallengeType,
        xp_reward: i64,
    ) -> Result<AwardOutcome, LedgerError> {
        self.complete_challenge_on(user, challenge_id, challenge_type, xp_reward, Utc::now().date_naive())
    }

    /// Complete a daily challenge for an explicit calendar day.
    ///
    /// The completion row and the ledger entry are written in one
    /// transaction: either both land or neither does. The ledger reference
    /// is `challenge_{id}_{day}`, so the award is idempotent per day.
    pub fn complete_challenge_on(
        &self,
        user: &str,
        challenge_id: &str,
        challenge_type: ChallengeType,
        xp_reward: i64,
        day: NaiveDate,
    ) -> Result<AwardOutcome, LedgerError> {
        let tx = self.conn.unchecked_transaction()?;

        let done: bool = tx.query_row(
            "SELECT EXISTS(
                 SELECT 1 FROM challenge_completions
                 WHERE user = ?1 AND challenge_id = ?2 AND completed_on = ?3
             )",
            params![user, challenge_id, day.to_string()],
            |row| row.get(0),
        )?;
        if done {
            debug!(user, challenge_id, %day, "challenge already completed");
            return Ok(AwardOutcome::AlreadyApplied);
        }

        let insert = tx.execute(
            "INSERT INTO challenge_completions
                 (id, user, challenge_id, challenge_type, xp_reward, completed_on, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Uuid::new_v4().to_string(),
                user,
                challenge_id,
                challenge_type.as_str(),
                xp_reward,
                day.to_string(),
                Utc::now(),
            ],
        );
        if let Err(e) = insert {
            // Concurrent completion raced us to the unique index.
            if is_constraint_violation(&e) {
                tx.rollback()?;
                return Ok(AwardOutcome::AlreadyApplied);
            }
            return Err(e.into());
        }

        let reference = format!("challenge_{}_{}", challenge_id, day);
        let description = format!("Daily challenge: {}", challenge_id);
        let outcome = insert_award(
            &tx,
            user,
            xp_reward,
            XpSource::DailyChallenge,
            &description,
            Some(&reference),
            1.0,
        )?;

        match outcome {
            AwardOutcome::Applied => {
                tx.commit()?;
                info!(user, challenge_id, xp_reward, %day, "challenge completed");
                Ok(AwardOutcome::Applied)
            }
            AwardOutcome::AlreadyApplied => {
                // A ledger entry exists without a completion row for today.
                // Roll the completion insert back so the two never diverge.
                warn!(user, challenge_id, %day, "ledger already holds challenge award; rolling back completion");
                tx.rollback()?;
                Ok(AwardOutcome::AlreadyApplied)
            }
        }
    }

    /// Total XP ever awarded to a user.
    pub fn total_xp(&self, user: &str) -> Result<i64, LedgerError> {
        let total: Option<i64> = self.conn.query_row(
            "SELECT SUM(amount) FROM xp_transactions WHERE user = ?1",
            params![user],
            |row| row.get(0),
        )?;
        Ok(total.unwrap_or(0))
    }

    /// Total XP, level, per-source breakdown, and recent transactions.
    pub fn xp_summary(&self, user: &str) -> Result<XpSummary, LedgerError> {
        let total_xp = self.total_xp(user)?;
        let level = level_for_xp(total_xp);

        let mut by_source = BTreeMap::new();
        let mut stmt = self.conn.prepare(
            "SELECT source, SUM(amount) FROM xp_transactions
             WHERE user = ?1 GROUP BY source",
        )?;
        let rows = stmt.query_map(params![user], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (source, amount) = row?;
            by_source.insert(source, amount);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, user, amount, source, description, reference_id, multiplier, created_at
             FROM xp_transactions
             WHERE user = ?1
             ORDER BY created_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user, RECENT_LIMIT as i64], |row| {
            Ok(XpTransaction {
                id: row.get(0)?,
                user: row.get(1)?,
                amount: row.get(2)?,
                source: row.get(3)?,
                description: row.get(4)?,
                reference_id: row.get(5)?,
                multiplier: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;
        let mut recent = Vec::new();
        for row in rows {
            recent.push(row?);
        }

        Ok(XpSummary {
            total_xp,
            level,
            xp_into_level: total_xp.max(0) % XP_PER_LEVEL,
            title: level_title(level).to_string(),
            by_source,
            recent,
        })
    }

    /// Days on which the user completed at least one challenge, ascending.
    pub fn completion_days(&self, user: &str) -> Result<Vec<NaiveDate>, LedgerError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT completed_on FROM challenge_completions
             WHERE user = ?1 ORDER BY completed_on ASC",
        )?;
        let rows = stmt.query_map(params![user], |row| row.get::<_, String>(0))?;
        let mut days = Vec::new();
        for row in rows {
            let raw = row?;
            if let Ok(day) = raw.parse::<NaiveDate>() {
                days.push(day);
            }
        }
        Ok(days)
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Insert one award row on any connection (plain or inside a transaction).
fn insert_award(
    conn: &Connection,
    user: &str,
    amount: i64,
    source: XpSource,
    description: &str,
    reference: Option<&str>,
    multiplier: f64,
) -> Result<AwardOutcome, LedgerError> {
    let effective = (amount as f64 * multiplier).round() as i64;
    let reference = reference
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let result = conn.execute(
        "INSERT INTO xp_transactions
             (id, user, amount, source, description, reference_id, multiplier, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            Uuid::new_v4().to_string(),
            user,
            effective,
            source.as_str(),
            description,
            reference,
            multiplier,
            Utc::now(),
        ],
    );

    match result {
        Ok(_) => Ok(AwardOutcome::Applied),
        Err(e) if is_constraint_violation(&e) => Ok(AwardOutcome::AlreadyApplied),
        Err(e) => Err(e.into()),
    }
}
