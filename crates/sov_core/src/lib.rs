//! Sovereignty Score core - behavioral scoring and gamification engine.
//!
//! Converts a day's self-reported habits into a bounded score under a chosen
//! path, records XP awards idempotently in an append-only ledger, and turns a
//! user's history into streak, trend, and behavioral-insight signals for the
//! presentation and narrative layers.

pub mod achievements;
pub mod challenges;
pub mod config;
pub mod error;
pub mod insight;
pub mod ledger;
pub mod paths;
pub mod record;
pub mod score;
pub mod store;
pub mod streaks;
pub mod trends;

pub use error::{LedgerError, ScoreError};
pub use insight::{BehavioralProfile, CoachingNeed, HabitPhase, InsightThresholds, MotivationState};
pub use ledger::{AwardOutcome, ChallengeType, XpLedger, XpSource, XpSummary};
pub use paths::{ActivityRule, PathConfig, PathRegistry};
pub use record::{ActivityValue, DailyActivityRecord};
pub use score::compute_score;
pub use store::RecordStore;
pub use streaks::StreakStats;
pub use trends::{HistoryAnalysis, TrendConfig, TrendDirection};
