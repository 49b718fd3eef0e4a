//! Score rule engine.
//!
//! Pure function from one day's record and a path's rule set to a bounded
//! integer score. No side effects, no shared state; safe to call from any
//! number of threads.

use crate::error::ScoreError;
use crate::paths::{ActivityRule, PathConfig, PathRegistry};
use crate::record::{ActivityValue, DailyActivityRecord};

/// Compute the record's sovereignty score under its declared path.
///
/// An unknown `path_id` is fatal ([`ScoreError::UnknownPath`]); it is never
/// silently defaulted to another path.
pub fn compute_score(
    record: &DailyActivityRecord,
    registry: &PathRegistry,
) -> Result<u32, ScoreError> {
    let config = registry
        .get(&record.path_id)
        .ok_or_else(|| ScoreError::UnknownPath(record.path_id.clone()))?;
    Ok(score_against(record, config))
}

/// Score a record against an explicit path config.
///
/// Activities the record does not know, and rules the record has no value
/// for, contribute 0. That leniency is deliberate: scoring must not fail on
/// partial input.
pub fn score_against(record: &DailyActivityRecord, config: &PathConfig) -> u32 {
    let mut total = 0.0;
    for (activity, rule) in &config.rules {
        total += contribution(record.activity(activity), rule);
    }
    total.clamp(0.0, config.max_score as f64).round() as u32
}

fn contribution(value: Option<ActivityValue>, rule: &ActivityRule) -> f64 {
    let value = match value {
        Some(v) => v,
        None => return 0.0,
    };

    match rule {
        ActivityRule::Metered { points_per_unit, max_units } => {
            let units = match value {
                ActivityValue::Count(n) => n.min(*max_units),
                // A bare flag against a metered rule counts as one unit.
                ActivityValue::Flag(true) => 1.min(*max_units),
                ActivityValue::Flag(false) => 0,
            };
            units as f64 * points_per_unit
        }
        ActivityRule::Flat { points } => {
            if value.as_flag() {
                *points
            } else {
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn full_day(user: &str, path_id: &str) -> DailyActivityRecord {
        let mut record = DailyActivityRecord::new(user, path_id, Utc::now());
        record.home_cooked_meals = 3;
        record.junk_food = false;
        record.exercise_minutes = 40;
        record.strength_training = true;
        record.no_spending = true;
        record.invested_bitcoin = true;
        record.meditation = true;
        record.gratitude = true;
        record.read_or_learned = true;
        record.environmental_action = true;
        record
    }

    #[test]
    fn test_perfect_day_scores_max() {
        let registry = PathRegistry::builtin();
        let record = full_day("kari", "default");
        let score = compute_score(&record, &registry).unwrap();
        assert_eq!(score, 100);
    }

    #[test]
    fn test_zero_day_scores_zero() {
        let registry = PathRegistry::builtin();
        let mut record = DailyActivityRecord::new("kari", "default", Utc::now());
        // Every virtue flag false: for junk food that means it was eaten.
        record.junk_food = true;
        let score = compute_score(&record, &registry).unwrap();
        assert_eq!(score, 0);
    }

    #[test]
    fn test_untouched_record_earns_only_junk_avoidance() {
        let registry = PathRegistry::builtin();
        let record = DailyActivityRecord::new("kari", "default", Utc::now());
        assert_eq!(compute_score(&record, &registry).unwrap(), 10);
    }

    #[test]
    fn test_metered_values_are_capped() {
        let registry = PathRegistry::builtin();
        let mut record = full_day("kari", "default");
        record.exercise_minutes = 400;
        record.home_cooked_meals = 12;

        // Over-delivering on metered activities cannot push past max_score.
        let score = compute_score(&record, &registry).unwrap();
        assert_eq!(score, 100);
    }

    #[test]
    fn test_bounds_hold_for_every_builtin_path() {
        let registry = PathRegistry::builtin();
        for config in registry.configs() {
            let full = full_day("kari", &config.path_id);
            let empty = DailyActivityRecord::new("kari", &config.path_id, Utc::now());

            let high = compute_score(&full, &registry).unwrap();
            let low = compute_score(&empty, &registry).unwrap();

            assert!(high <= config.max_score, "path {}", config.path_id);
            assert!(low <= config.max_score, "path {}", config.path_id);
            assert!(high >= low);
        }
    }

    #[test]
    fn test_missing_field_is_lenient() {
        // The same perfect day with home_cooked_meals omitted entirely.
        let json = r#"{
            "timestamp": "2026-08-03T20:00:00Z",
            "user": "kari",
            "path_id": "default",
            "junk_food": false,
            "exercise_minutes": 40,
            "strength_training": true,
            "no_spending": true,
            "invested_bitcoin": true,
            "meditation": true,
            "gratitude": true,
            "read_or_learned": true,
            "environmental_action": true
        }"#;
        let record: DailyActivityRecord = serde_json::from_str(json).unwrap();

        let registry = PathRegistry::builtin();
        let score = compute_score(&record, &registry).unwrap();
        // Meals contribution (20.01 points) treated as 0, not an error.
        assert_eq!(score, 80);
    }

    #[test]
    fn test_unknown_path_is_fatal() {
        let registry = PathRegistry::builtin();
        let record = DailyActivityRecord::new("kari", "warrior_path", Utc::now());
        let err = compute_score(&record, &registry).unwrap_err();
        assert!(matches!(err, ScoreError::UnknownPath(ref p) if p == "warrior_path"));
    }

    #[test]
    fn test_flat_rule_against_count_value() {
        // A path that weights meals as flat rather than metered still works.
        let mut config = PathRegistry::builtin().get("default").unwrap().clone();
        config
            .rules
            .insert("home_cooked_meals".into(), ActivityRule::Flat { points: 15.0 });

        let mut record = DailyActivityRecord::new("kari", "default", Utc::now());
        record.home_cooked_meals = 2;
        record.junk_food = true; // suppress the free no_junk_food points

        assert_eq!(score_against(&record, &config), 15);
    }
}
