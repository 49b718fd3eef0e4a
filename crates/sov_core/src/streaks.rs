//! Streak and consistency calculation.
//!
//! Pure functions over a user's chronological history. Callers must pass
//! records already sorted ascending by timestamp; the walk is
//! order-sensitive and the functions do not re-sort.
//!
//! "Current" is calendar-aware: a streak only counts as current when the
//! most recent record falls on `as_of` or the day before. A user whose last
//! entry is older than that reports `current_streak = 0` no matter how long
//! the final run was. `longest_streak` and the consistency rate are
//! unaffected by the decay.

use crate::record::DailyActivityRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Streak statistics for one `(user, activity)` pair. Derived on demand,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakStats {
    /// Consecutive performed days up to and including the last record,
    /// 0 when the history has gone stale relative to `as_of`.
    pub current_streak: u32,
    /// Longest run anywhere in the history.
    pub longest_streak: u32,
    /// Days on which the activity was performed at all.
    pub total_true_days: u32,
    /// `total_true_days / total_days * 100`.
    pub consistency_rate: f64,
}

/// Walk one activity through the history.
pub fn streak_stats(
    history: &[DailyActivityRecord],
    activity: &str,
    as_of: NaiveDate,
) -> StreakStats {
    if history.is_empty() {
        return StreakStats::default();
    }

    let mut current = 0u32;
    let mut longest = 0u32;
    let mut true_days = 0u32;

    for record in history {
        if record.performed(activity) {
            current += 1;
            true_days += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    if is_stale(history, as_of) {
        current = 0;
    }

    StreakStats {
        current_streak: current,
        longest_streak: longest,
        total_true_days: true_days,
        consistency_rate: true_days as f64 / history.len() as f64 * 100.0,
    }
}

/// Streak stats for every requested activity in one pass over the input.
pub fn all_streaks(
    history: &[DailyActivityRecord],
    activities: &[&str],
    as_of: NaiveDate,
) -> BTreeMap<String, StreakStats> {
    activities
        .iter()
        .map(|activity| (activity.to_string(), streak_stats(history, activity, as_of)))
        .collect()
}

/// Whole days between the last record and `as_of`. `None` for an empty
/// history (never tracked).
pub fn days_since_last_entry(
    history: &[DailyActivityRecord],
    as_of: NaiveDate,
) -> Option<i64> {
    history
        .last()
        .map(|record| as_of.signed_duration_since(record.day()).num_days())
}

fn is_stale(history: &[DailyActivityRecord], as_of: NaiveDate) -> bool {
    matches!(days_since_last_entry(history, as_of), Some(gap) if gap > 1)
}
