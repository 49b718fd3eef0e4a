//! Behavioral insight classifier.
//!
//! Turns a [`HistoryAnalysis`] into a categorical profile - motivation
//! state, habit-formation phase, coaching need - through a deterministic
//! decision table. Identical inputs always produce identical outputs;
//! downstream prose generation and tests depend on that. No probabilistic
//! elements, no side effects.
//!
//! Every cut-off lives in [`InsightThresholds`], which is serde-loadable so
//! the behavior stays auditable and tunable without touching the tables.

use crate::trends::{HistoryAnalysis, TrendDirection};
use serde::{Deserialize, Serialize};

/// Named threshold table for the decision logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightThresholds {
    /// Recent average at or above this reads as strong performance.
    #[serde(default = "default_high_score")]
    pub high_score: f64,
    /// Average below this reads as struggling.
    #[serde(default = "default_low_score")]
    pub low_score: f64,
    /// Average below this, with enough history, reads as crisis.
    #[serde(default = "default_crisis_score")]
    pub crisis_score: f64,
    /// Days of silence before motivation reads as low.
    #[serde(default = "default_inactivity_days")]
    pub inactivity_days: i64,
    /// Current streaks at or past this length count as long-running.
    #[serde(default = "default_long_streak_days")]
    pub long_streak_days: u32,
    /// Days of tracking before a habit leaves the formation phase.
    #[serde(default = "default_formation_days")]
    pub formation_days: usize,
    /// Days of tracking required for the mastery phase.
    #[serde(default = "default_mastery_days")]
    pub mastery_days: usize,
    /// Average score required for the mastery phase.
    #[serde(default = "default_mastery_score")]
    pub mastery_score: f64,
    /// Long-running streaks required for the mastery phase.
    #[serde(default = "default_mastery_streaks")]
    pub mastery_streaks: usize,
}

fn default_high_score() -> f64 {
    75.0
}

fn default_low_score() -> f64 {
    50.0
}

fn default_crisis_score() -> f64 {
    30.0
}

fn default_inactivity_days() -> i64 {
    7
}

fn default_long_streak_days() -> u32 {
    14
}

fn default_formation_days() -> usize {
    21
}

fn default_mastery_days() -> usize {
    90
}

fn default_mastery_score() -> f64 {
    85.0
}

fn default_mastery_streaks() -> usize {
    3
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            high_score: default_high_score(),
            low_score: default_low_score(),
            crisis_score: default_crisis_score(),
            inactivity_days: default_inactivity_days(),
            long_streak_days: default_long_streak_days(),
            formation_days: default_formation_days(),
            mastery_days: default_mastery_days(),
            mastery_score: default_mastery_score(),
            mastery_streaks: default_mastery_streaks(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationState {
    High,
    Moderate,
    Low,
    Burnout,
    Rebuilding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitPhase {
    Formation,
    Maintenance,
    Mastery,
    Erosion,
    Crisis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingNeed {
    Celebration,
    Optimization,
    CourseCorrection,
    Intervention,
    Education,
    ReEngagement,
}

/// The numbers the classification leaned on, surfaced so the narrative
/// generator can cite them without seeing raw history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMetrics {
    pub total_days_tracked: usize,
    pub days_since_last_entry: Option<i64>,
    pub overall_avg_score: f64,
    pub recent_avg_score: f64,
    pub volatility: f64,
    pub trend_direction: TrendDirection,
    pub long_streak_count: usize,
}

/// Categorical behavioral profile. Computed per analysis request; carries
/// no identity beyond the call that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralProfile {
    pub motivation: MotivationState,
    pub phase: HabitPhase,
    pub coaching_need: CoachingNeed,
    pub metrics: ProfileMetrics,
}

/// Run the full decision table.
pub fn classify(analysis: &HistoryAnalysis, thresholds: &InsightThresholds) -> BehavioralProfile {
    let long_streaks = long_streak_count(analysis, thresholds);
    let motivation = classify_motivation(analysis, thresholds);
    let phase = classify_phase(analysis, thresholds, long_streaks);
    let coaching_need = classify_coaching_need(motivation, phase, analysis, thresholds);

    BehavioralProfile {
        motivation,
        phase,
        coaching_need,
        metrics: ProfileMetrics {
            total_days_tracked: analysis.total_days_tracked,
            days_since_last_entry: analysis.days_since_last_entry,
            overall_avg_score: analysis.overall_avg_score,
            recent_avg_score: analysis.recent_avg_score,
            volatility: analysis.volatility,
            trend_direction: analysis.trend.direction,
            long_streak_count: long_streaks,
        },
    }
}

/// Activities whose current streak qualifies as long-running.
fn long_streak_count(analysis: &HistoryAnalysis, thresholds: &InsightThresholds) -> usize {
    analysis
        .streaks
        .values()
        .filter(|s| s.current_streak >= thresholds.long_streak_days)
        .count()
}

/// Motivation decision table. Order matters: inactivity dominates, then
/// clear improvement, then decline patterns.
fn classify_motivation(
    analysis: &HistoryAnalysis,
    thresholds: &InsightThresholds,
) -> MotivationState {
    let gap = analysis.days_since_last_entry;
    let improving = analysis.trend.direction == TrendDirection::Improving;
    let declining = analysis.trend.direction == TrendDirection::Declining;

    match gap {
        None => return MotivationState::Low,
        Some(days) if days > thresholds.inactivity_days => return MotivationState::Low,
        _ => {}
    }

    if improving && analysis.recent_avg_score >= thresholds.high_score {
        MotivationState::High
    } else if declining && analysis.overall_avg_score < thresholds.low_score {
        MotivationState::Burnout
    } else if improving && analysis.overall_avg_score < thresholds.low_score {
        MotivationState::Rebuilding
    } else {
        MotivationState::Moderate
    }
}

/// Habit phase from history depth, average score, and long streaks.
fn classify_phase(
    analysis: &HistoryAnalysis,
    thresholds: &InsightThresholds,
    long_streaks: usize,
) -> HabitPhase {
    if analysis.total_days_tracked < thresholds.formation_days {
        return HabitPhase::Formation;
    }

    if analysis.overall_avg_score < thresholds.crisis_score {
        return HabitPhase::Crisis;
    }

    if analysis.overall_avg_score < thresholds.low_score
        || analysis.trend.direction == TrendDirection::Declining
    {
        return HabitPhase::Erosion;
    }

    if analysis.total_days_tracked >= thresholds.mastery_days
        && analysis.overall_avg_score >= thresholds.mastery_score
        && long_streaks >= thresholds.mastery_streaks
    {
        return HabitPhase::Mastery;
    }

    HabitPhase::Maintenance
}

/// Coaching need from the motivation/phase combination, with the recent
/// average standing in as the path-alignment score.
fn classify_coaching_need(
    motivation: MotivationState,
    phase: HabitPhase,
    analysis: &HistoryAnalysis,
    thresholds: &InsightThresholds,
) -> CoachingNeed {
    let aligned = analysis.recent_avg_score >= thresholds.high_score;

    if motivation == MotivationState::Low {
        return CoachingNeed::ReEngagement;
    }
    if motivation == MotivationState::Burnout || phase == HabitPhase::Crisis {
        return CoachingNeed::Intervention;
    }
    if phase == HabitPhase::Erosion {
        return CoachingNeed::CourseCorrection;
    }
    if phase == HabitPhase::Formation {
        return CoachingNeed::Education;
    }
    if motivation == MotivationState::High && aligned {
        return CoachingNeed::Celebration;
    }
    CoachingNeed::Optimization
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaks::StreakStats;
    use crate::trends::{TrendAnalysis, WeekendAnalysis};
    use std::collections::BTreeMap;

    fn base_analysis() -> HistoryAnalysis {
        HistoryAnalysis {
            total_days_tracked: 60,
            days_since_last_entry: Some(0),
            overall_avg_score: 65.0,
            recent_avg_score: 65.0,
            best_score: 80,
            volatility: 5.0,
            trend: TrendAnalysis {
                early_mean: 65.0,
                recent_mean: 65.0,
                delta: 0.0,
                direction: TrendDirection::Stable,
            },
            weekend: WeekendAnalysis::default(),
            streaks: BTreeMap::new(),
        }
    }

    fn with_trend(mut analysis: HistoryAnalysis, direction: TrendDirection, recent: f64) -> HistoryAnalysis {
        analysis.trend.direction = direction;
        analysis.trend.recent_mean = recent;
        analysis.recent_avg_score = recent;
        analysis
    }

    #[test]
    fn test_inactivity_dominates_motivation() {
        let mut analysis = with_trend(base_analysis(), TrendDirection::Improving, 90.0);
        analysis.days_since_last_entry = Some(10);

        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.motivation, MotivationState::Low);
        assert_eq!(profile.coaching_need, CoachingNeed::ReEngagement);
    }

    #[test]
    fn test_never_tracked_reads_low_and_formation() {
        let mut analysis = base_analysis();
        analysis.total_days_tracked = 0;
        analysis.days_since_last_entry = None;
        analysis.overall_avg_score = 0.0;
        analysis.recent_avg_score = 0.0;

        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.motivation, MotivationState::Low);
        assert_eq!(profile.phase, HabitPhase::Formation);
        assert_eq!(profile.coaching_need, CoachingNeed::ReEngagement);
    }

    #[test]
    fn test_improving_and_high_scores_reads_high() {
        let analysis = with_trend(base_analysis(), TrendDirection::Improving, 85.0);
        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.motivation, MotivationState::High);
        assert_eq!(profile.coaching_need, CoachingNeed::Celebration);
    }

    #[test]
    fn test_declining_low_scores_reads_burnout() {
        let mut analysis = with_trend(base_analysis(), TrendDirection::Declining, 35.0);
        analysis.overall_avg_score = 40.0;

        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.motivation, MotivationState::Burnout);
        assert_eq!(profile.coaching_need, CoachingNeed::Intervention);
    }

    #[test]
    fn test_improving_from_low_reads_rebuilding() {
        let mut analysis = with_trend(base_analysis(), TrendDirection::Improving, 55.0);
        analysis.overall_avg_score = 45.0;

        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.motivation, MotivationState::Rebuilding);
    }

    #[test]
    fn test_short_history_is_formation_education() {
        let mut analysis = base_analysis();
        analysis.total_days_tracked = 10;

        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.phase, HabitPhase::Formation);
        assert_eq!(profile.coaching_need, CoachingNeed::Education);
    }

    #[test]
    fn test_mastery_requires_depth_scores_and_streaks() {
        let mut analysis = base_analysis();
        analysis.total_days_tracked = 120;
        analysis.overall_avg_score = 90.0;
        analysis.recent_avg_score = 90.0;

        let mut streaks = BTreeMap::new();
        for name in ["meditation", "gratitude", "read_or_learned"] {
            streaks.insert(
                name.to_string(),
                StreakStats { current_streak: 20, longest_streak: 30, total_true_days: 100, consistency_rate: 85.0 },
            );
        }
        analysis.streaks = streaks;

        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.phase, HabitPhase::Mastery);
        assert_eq!(profile.metrics.long_streak_count, 3);

        // Two long streaks instead of three drops back to maintenance.
        analysis.streaks.remove("meditation");
        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.phase, HabitPhase::Maintenance);
    }

    #[test]
    fn test_crisis_phase_triggers_intervention() {
        let mut analysis = base_analysis();
        analysis.overall_avg_score = 20.0;
        analysis.recent_avg_score = 20.0;

        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.phase, HabitPhase::Crisis);
        assert_eq!(profile.coaching_need, CoachingNeed::Intervention);
    }

    #[test]
    fn test_erosion_triggers_course_correction() {
        let mut analysis = with_trend(base_analysis(), TrendDirection::Declining, 60.0);
        analysis.overall_avg_score = 60.0;

        let profile = classify(&analysis, &InsightThresholds::default());
        assert_eq!(profile.phase, HabitPhase::Erosion);
        assert_eq!(profile.coaching_need, CoachingNeed::CourseCorrection);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let analysis = with_trend(base_analysis(), TrendDirection::Improving, 85.0);
        let thresholds = InsightThresholds::default();

        let a = classify(&analysis, &thresholds);
        let b = classify(&analysis, &thresholds);
        assert_eq!(a.motivation, b.motivation);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.coaching_need, b.coaching_need);
    }

    #[test]
    fn test_thresholds_deserialize_with_defaults() {
        let thresholds: InsightThresholds = toml::from_str("high_score = 80.0").unwrap();
        assert_eq!(thresholds.high_score, 80.0);
        assert_eq!(thresholds.inactivity_days, 7);
        assert_eq!(thresholds.long_streak_days, 14);
    }
}
