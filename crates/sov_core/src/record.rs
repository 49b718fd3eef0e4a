//! Daily activity record.
//!
//! One record per user per calendar day, created by the submission flow.
//! Scoring is lenient about partial input: every activity field carries a
//! serde default, so a record missing fields still deserializes and scores
//! with those activities treated as 0 / not done. The core does not enforce
//! one-record-per-day uniqueness; callers own that invariant.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Value of a single tracked activity, as seen by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityValue {
    /// Unit-counted activity (meals cooked, minutes exercised).
    Count(u32),
    /// Done / not done.
    Flag(bool),
}

impl ActivityValue {
    /// Whether the activity counts as performed for streak purposes.
    pub fn as_flag(self) -> bool {
        match self {
            ActivityValue::Count(n) => n > 0,
            ActivityValue::Flag(b) => b,
        }
    }
}

/// The boolean activities tracked by the streak analyzer, in rule-key form.
pub const BOOLEAN_ACTIVITIES: &[&str] = &[
    "no_junk_food",
    "strength_training",
    "no_spending",
    "invested_bitcoin",
    "meditation",
    "gratitude",
    "read_or_learned",
    "environmental_action",
];

/// One day of self-reported habits, with its computed score.
///
/// Count fields are unsigned, which enforces the scoring rule's lower clamp
/// (`max(value, 0)`) at the type level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyActivityRecord {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub path_id: String,

    #[serde(default)]
    pub home_cooked_meals: u32,
    /// True when junk food *was* eaten; the rule key `no_junk_food` awards
    /// points for the inverse.
    #[serde(default)]
    pub junk_food: bool,
    #[serde(default)]
    pub exercise_minutes: u32,
    #[serde(default)]
    pub strength_training: bool,
    #[serde(default)]
    pub no_spending: bool,
    #[serde(default)]
    pub invested_bitcoin: bool,
    #[serde(default)]
    pub meditation: bool,
    #[serde(default)]
    pub gratitude: bool,
    #[serde(default)]
    pub read_or_learned: bool,
    #[serde(default)]
    pub environmental_action: bool,

    /// Computed by the score rule engine; 0..=max_score for the record's path.
    #[serde(default)]
    pub score: u32,
}

impl DailyActivityRecord {
    /// Empty record for a user and path: all activities at 0 / not done.
    pub fn new(user: &str, path_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            user: user.to_string(),
            path_id: path_id.to_string(),
            home_cooked_meals: 0,
            junk_food: false,
            exercise_minutes: 0,
            strength_training: false,
            no_spending: false,
            invested_bitcoin: false,
            meditation: false,
            gratitude: false,
            read_or_learned: false,
            environmental_action: false,
            score: 0,
        }
    }

    /// Look up an activity by its rule key. `None` for keys this record
    /// shape does not know; the engine treats those as 0 (leniency).
    pub fn activity(&self, name: &str) -> Option<ActivityValue> {
        use ActivityValue::{Count, Flag};
        Some(match name {
            "home_cooked_meals" => Count(self.home_cooked_meals),
            "no_junk_food" => Flag(!self.junk_food),
            "exercise_minutes" => Count(self.exercise_minutes),
            "strength_training" => Flag(self.strength_training),
            "no_spending" => Flag(self.no_spending),
            "invested_bitcoin" => Flag(self.invested_bitcoin),
            "meditation" => Flag(self.meditation),
            "gratitude" => Flag(self.gratitude),
            "read_or_learned" => Flag(self.read_or_learned),
            "environmental_action" => Flag(self.environmental_action),
            _ => return None,
        })
    }

    /// Whether the named activity counts as performed on this day.
    pub fn performed(&self, name: &str) -> bool {
        self.activity(name).map(ActivityValue::as_flag).unwrap_or(false)
    }

    /// Calendar day of the record (UTC).
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self.timestamp.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_activity_lookup() {
        let mut record = DailyActivityRecord::new("kari", "default", Utc::now());
        record.home_cooked_meals = 2;
        record.meditation = true;

        assert_eq!(record.activity("home_cooked_meals"), Some(ActivityValue::Count(2)));
        assert_eq!(record.activity("meditation"), Some(ActivityValue::Flag(true)));
        assert_eq!(record.activity("gratitude"), Some(ActivityValue::Flag(false)));
        assert_eq!(record.activity("unknown_thing"), None);
    }

    #[test]
    fn test_no_junk_food_is_inverted() {
        let mut record = DailyActivityRecord::new("kari", "default", Utc::now());
        assert!(record.performed("no_junk_food"));

        record.junk_food = true;
        assert!(!record.performed("no_junk_food"));
    }

    #[test]
    fn test_partial_json_deserializes_with_defaults() {
        let json = r#"{
            "timestamp": "2026-08-01T09:00:00Z",
            "user": "kari",
            "path_id": "default",
            "meditation": true
        }"#;

        let record: DailyActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.home_cooked_meals, 0);
        assert!(record.meditation);
        assert!(!record.junk_food);
        assert_eq!(record.score, 0);
    }

    #[test]
    fn test_weekend_detection() {
        // 2026-08-01 is a Saturday.
        let sat = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let mon = Utc.with_ymd_and_hms(2026, 8, 3, 12, 0, 0).unwrap();

        assert!(DailyActivityRecord::new("k", "default", sat).is_weekend());
        assert!(!DailyActivityRecord::new("k", "default", mon).is_weekend());
    }
}
