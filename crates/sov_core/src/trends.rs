//! Score trend and consistency analysis.
//!
//! Partitions a chronological history into comparison windows and
//! weekday/weekend buckets, and assembles the [`HistoryAnalysis`] aggregate
//! the behavioral classifier consumes. Pure functions of the input slice;
//! like the streak walk, they require the history sorted ascending by
//! timestamp.

use crate::record::{DailyActivityRecord, BOOLEAN_ACTIVITIES};
use crate::streaks::{all_streaks, days_since_last_entry, StreakStats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tunable window sizes and noise threshold for trend classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// First N records form the early comparison window.
    #[serde(default = "default_early_window")]
    pub early_window: usize,
    /// Last N records form the recent comparison window.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    /// Mean-score delta below which the trend reads as stable. Keeps
    /// day-to-day noise from flapping the classification.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_early_window() -> usize {
    30
}

fn default_recent_window() -> usize {
    90
}

fn default_epsilon() -> f64 {
    3.0
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            early_window: default_early_window(),
            recent_window: default_recent_window(),
            epsilon: default_epsilon(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

/// Early-vs-recent mean score comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub early_mean: f64,
    pub recent_mean: f64,
    /// `recent_mean - early_mean`.
    pub delta: f64,
    pub direction: TrendDirection,
}

/// Weekday (Mon-Fri) vs weekend (Sat-Sun) score comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekendAnalysis {
    pub weekday_mean: f64,
    pub weekday_std: f64,
    pub weekend_mean: f64,
    pub weekend_std: f64,
    /// Positive when weekend performance is weaker.
    pub weekend_drop: f64,
}

/// Everything the behavioral classifier needs about one user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryAnalysis {
    pub total_days_tracked: usize,
    /// `None` when the user has never tracked.
    pub days_since_last_entry: Option<i64>,
    pub overall_avg_score: f64,
    /// Mean over the recent trend window.
    pub recent_avg_score: f64,
    pub best_score: u32,
    /// Standard deviation of all scores.
    pub volatility: f64,
    pub trend: TrendAnalysis,
    pub weekend: WeekendAnalysis,
    pub streaks: BTreeMap<String, StreakStats>,
}

/// Classify the score trend of a chronological history.
pub fn trend_analysis(history: &[DailyActivityRecord], config: &TrendConfig) -> TrendAnalysis {
    let scores: Vec<f64> = history.iter().map(|r| r.score as f64).collect();

    let early_end = scores.len().min(config.early_window);
    let recent_start = scores.len().saturating_sub(config.recent_window);

    let early_mean = mean(&scores[..early_end]);
    let recent_mean = mean(&scores[recent_start..]);
    let delta = recent_mean - early_mean;

    let direction = if delta > config.epsilon {
        TrendDirection::Improving
    } else if delta < -config.epsilon {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    TrendAnalysis { early_mean, recent_mean, delta, direction }
}

/// Compare weekday and weekend scoring behavior.
pub fn weekend_analysis(history: &[DailyActivityRecord]) -> WeekendAnalysis {
    let mut weekday = Vec::new();
    let mut weekend = Vec::new();
    for record in history {
        if record.is_weekend() {
            weekend.push(record.score as f64);
        } else {
            weekday.push(record.score as f64);
        }
    }

    let weekday_mean = mean(&weekday);
    let weekend_mean = mean(&weekend);

    WeekendAnalysis {
        weekday_mean,
        weekday_std: std_dev(&weekday),
        weekend_mean,
        weekend_std: std_dev(&weekend),
        weekend_drop: weekday_mean - weekend_mean,
    }
}

/// Run the full analysis over one user's chronological history.
///
/// `activities` is the subset of boolean activities to walk for streaks
/// (usually [`BOOLEAN_ACTIVITIES`]); `as_of` anchors the calendar-decay
/// rule and the days-since-last-entry gap.
pub fn analyze_history(
    history: &[DailyActivityRecord],
    activities: &[&str],
    as_of: NaiveDate,
    config: &TrendConfig,
) -> HistoryAnalysis {
    let scores: Vec<f64> = history.iter().map(|r| r.score as f64).collect();
    let trend = trend_analysis(history, config);

    HistoryAnalysis {
        total_days_tracked: history.len(),
        days_since_last_entry: days_since_last_entry(history, as_of),
        overall_avg_score: mean(&scores),
        recent_avg_score: trend.recent_mean,
        best_score: history.iter().map(|r| r.score).max().unwrap_or(0),
        volatility: std_dev(&scores),
        trend,
        weekend: weekend_analysis(history),
        streaks: all_streaks(history, activities, as_of),
    }
}

/// Analysis over the default boolean activity set.
pub fn analyze_default(
    history: &[DailyActivityRecord],
    as_of: NaiveDate,
    config: &TrendConfig,
) -> HistoryAnalysis {
    analyze_history(history, BOOLEAN_ACTIVITIES, as_of, config)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    /// Consecutive-day history with the given scores, ending on `end`.
    fn history_with_scores(scores: &[u32], end: NaiveDate) -> Vec<DailyActivityRecord> {
        let start = end - Duration::days(scores.len() as i64 - 1);
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                let day = start + Duration::days(i as i64);
                let ts = Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).unwrap());
                let mut record = DailyActivityRecord::new("kari", "default", ts);
                record.score = score;
                record
            })
            .collect()
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_improving_trend() {
        let mut scores = vec![40u32; 30];
        scores.extend(vec![80u32; 30]);
        let history = history_with_scores(&scores, day("2026-08-10"));

        let trend = trend_analysis(&history, &TrendConfig::default());
        assert_eq!(trend.direction, TrendDirection::Improving);
        assert!((trend.early_mean - 40.0).abs() < f64::EPSILON);
        // Recent window (90) covers everything here: mean of 40s and 80s.
        assert!((trend.recent_mean - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_declining_trend_with_tight_windows() {
        let config = TrendConfig { early_window: 5, recent_window: 5, epsilon: 3.0 };
        let mut scores = vec![80u32; 5];
        scores.extend(vec![40u32; 5]);
        let history = history_with_scores(&scores, day("2026-08-10"));

        let trend = trend_analysis(&history, &config);
        assert_eq!(trend.direction, TrendDirection::Declining);
        assert!((trend.delta - -40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_small_delta_reads_stable() {
        let config = TrendConfig { early_window: 5, recent_window: 5, epsilon: 3.0 };
        let mut scores = vec![70u32; 5];
        scores.extend(vec![72u32; 5]);
        let history = history_with_scores(&scores, day("2026-08-10"));

        // A 2-point delta sits inside the noise threshold.
        let trend = trend_analysis(&history, &config);
        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_empty_history_is_stable() {
        let trend = trend_analysis(&[], &TrendConfig::default());
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.early_mean, 0.0);
    }

    #[test]
    fn test_weekend_drop() {
        // Two full weeks ending Sunday 2026-08-16: weekdays 80, weekends 50.
        let end = day("2026-08-16");
        let scores: Vec<u32> = (0..14)
            .map(|i| {
                let d = end - Duration::days(13 - i);
                match d.format("%a").to_string().as_str() {
                    "Sat" | "Sun" => 50,
                    _ => 80,
                }
            })
            .collect();
        let history = history_with_scores(&scores, end);

        let weekend = weekend_analysis(&history);
        assert!((weekend.weekday_mean - 80.0).abs() < f64::EPSILON);
        assert!((weekend.weekend_mean - 50.0).abs() < f64::EPSILON);
        assert!((weekend.weekend_drop - 30.0).abs() < f64::EPSILON);
        assert_eq!(weekend.weekday_std, 0.0);
    }

    #[test]
    fn test_analyze_history_aggregate() {
        let history = history_with_scores(&[50, 60, 70, 80], day("2026-08-10"));
        let analysis = analyze_default(&history, day("2026-08-10"), &TrendConfig::default());

        assert_eq!(analysis.total_days_tracked, 4);
        assert_eq!(analysis.days_since_last_entry, Some(0));
        assert!((analysis.overall_avg_score - 65.0).abs() < f64::EPSILON);
        assert_eq!(analysis.best_score, 80);
        assert!(analysis.volatility > 0.0);
        assert!(analysis.streaks.contains_key("meditation"));
    }

    #[test]
    fn test_volatility_zero_for_constant_scores() {
        let history = history_with_scores(&[60; 10], day("2026-08-10"));
        let analysis = analyze_default(&history, day("2026-08-10"), &TrendConfig::default());
        assert_eq!(analysis.volatility, 0.0);
    }
}
