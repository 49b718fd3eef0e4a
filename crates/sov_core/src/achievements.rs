//! Achievement badges for the gamification layer.
//!
//! A static badge table checked against a user's analysis and XP summary.
//! Unlocks are credited through the ledger with the deterministic reference
//! `achievement_{id}`, so each badge pays out at most once ever - the
//! ledger's idempotency does the bookkeeping, not this module.

use crate::error::LedgerError;
use crate::ledger::{AwardOutcome, XpLedger, XpSource, XpSummary};
use crate::trends::HistoryAnalysis;
use serde::{Deserialize, Serialize};

/// Achievement badge with ASCII symbol and description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: &'static str,
    /// ASCII badge symbol (e.g. "[1]", "<7d>").
    pub badge: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// XP credited on unlock.
    pub xp_reward: i64,
    pub unlocked: bool,
}

impl Achievement {
    const fn new(
        id: &'static str,
        badge: &'static str,
        name: &'static str,
        description: &'static str,
        xp_reward: i64,
    ) -> Self {
        Self { id, badge, name, description, xp_reward, unlocked: false }
    }
}

/// All available achievements.
pub fn all_achievements() -> Vec<Achievement> {
    vec![
        // Tracking milestones
        Achievement::new("first_day", "[1]", "First Step", "Log your first day", 10),
        Achievement::new("week_tracked", "[7]", "One Week In", "Track 7 days", 25),
        Achievement::new("month_tracked", "[30]", "Month of Data", "Track 30 days", 50),
        Achievement::new("quarter_tracked", "[90]", "Quarter Logged", "Track 90 days", 100),

        // Streak achievements
        Achievement::new("streak_3", "<3d>", "On Fire", "Hold a 3-day streak on any habit", 15),
        Achievement::new("streak_7", "<7d>", "Week Warrior", "Hold a 7-day streak on any habit", 35),
        Achievement::new("streak_30", "<30d>", "Monthly Master", "Hold a 30-day streak on any habit", 100),

        // Score achievements
        Achievement::new("perfect_day", "(100)", "Perfect Day", "Score 95 or better in a single day", 50),
        Achievement::new("steady_70", "(70+)", "Steady Hand", "Keep a 70+ average over your history", 40),

        // XP milestones
        Achievement::new("xp_500", "{500}", "Halfway There", "Accumulate 500 XP", 25),
        Achievement::new("xp_1000", "{1k}", "Four Digits", "Accumulate 1000 XP", 50),
        Achievement::new("level_10", "{L10}", "Double Digits", "Reach level 10", 75),
    ]
}

/// Check which achievements are unlocked for the given state.
pub fn check_achievements(analysis: &HistoryAnalysis, xp: &XpSummary) -> Vec<Achievement> {
    let mut achievements = all_achievements();
    for ach in &mut achievements {
        ach.unlocked = is_unlocked(ach.id, analysis, xp);
    }
    achievements
}

/// Only the unlocked achievements.
pub fn unlocked_achievements(analysis: &HistoryAnalysis, xp: &XpSummary) -> Vec<Achievement> {
    check_achievements(analysis, xp)
        .into_iter()
        .filter(|a| a.unlocked)
        .collect()
}

fn is_unlocked(id: &str, analysis: &HistoryAnalysis, xp: &XpSummary) -> bool {
    match id {
        "first_day" => analysis.total_days_tracked >= 1,
        "week_tracked" => analysis.total_days_tracked >= 7,
        "month_tracked" => analysis.total_days_tracked >= 30,
        "quarter_tracked" => analysis.total_days_tracked >= 90,

        "streak_3" => best_streak(analysis) >= 3,
        "streak_7" => best_streak(analysis) >= 7,
        "streak_30" => best_streak(analysis) >= 30,

        "perfect_day" => analysis.best_score >= 95,
        "steady_70" => analysis.total_days_tracked >= 7 && analysis.overall_avg_score >= 70.0,

        "xp_500" => xp.total_xp >= 500,
        "xp_1000" => xp.total_xp >= 1000,
        "level_10" => xp.level >= 10,

        _ => false,
    }
}

fn best_streak(analysis: &HistoryAnalysis) -> u32 {
    analysis
        .streaks
        .values()
        .map(|s| s.longest_streak)
        .max()
        .unwrap_or(0)
}

/// Credit every unlocked achievement through the ledger. Returns the
/// achievements that were newly applied this call; ones credited on an
/// earlier call come back `AlreadyApplied` from the ledger and are skipped.
pub fn award_unlocked(
    ledger: &XpLedger,
    user: &str,
    analysis: &HistoryAnalysis,
    xp: &XpSummary,
) -> Result<Vec<Achievement>, LedgerError> {
    let mut newly_applied = Vec::new();
    for ach in unlocked_achievements(analysis, xp) {
        let reference = format!("achievement_{}", ach.id);
        let outcome = ledger.award_xp(
            user,
            ach.xp_reward,
            XpSource::Achievement,
            ach.description,
            Some(&reference),
            1.0,
        )?;
        if outcome == AwardOutcome::Applied {
            newly_applied.push(ach);
        }
    }
    Ok(newly_applied)
}

/// Format unlocked badges for display.
pub fn format_achievements(achievements: &[Achievement], max_display: usize) -> String {
    let unlocked: Vec<_> = achievements.iter().filter(|a| a.unlocked).collect();
    if unlocked.is_empty() {
        return String::new();
    }

    let badges: String = unlocked
        .iter()
        .take(max_display)
        .map(|a| a.badge)
        .collect::<Vec<_>>()
        .join(" ");

    if unlocked.len() > max_display {
        format!("{} +{} more", badges, unlocked.len() - max_display)
    } else {
        badges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::level_for_xp;
    use crate::streaks::StreakStats;
    use crate::trends::{TrendAnalysis, TrendDirection, WeekendAnalysis};
    use std::collections::BTreeMap;

    fn mock_analysis(days: usize, best_streak: u32, best_score: u32, avg: f64) -> HistoryAnalysis {
        let mut streaks = BTreeMap::new();
        streaks.insert(
            "meditation".to_string(),
            StreakStats {
                current_streak: best_streak,
                longest_streak: best_streak,
                total_true_days: best_streak,
                consistency_rate: 80.0,
            },
        );
        HistoryAnalysis {
            total_days_tracked: days,
            days_since_last_entry: Some(0),
            overall_avg_score: avg,
            recent_avg_score: avg,
            best_score,
            volatility: 0.0,
            trend: TrendAnalysis {
                early_mean: avg,
                recent_mean: avg,
                delta: 0.0,
                direction: TrendDirection::Stable,
            },
            weekend: WeekendAnalysis::default(),
            streaks,
        }
    }

    fn mock_summary(total_xp: i64) -> XpSummary {
        XpSummary {
            total_xp,
            level: level_for_xp(total_xp),
            xp_into_level: total_xp % 100,
            title: String::new(),
            by_source: BTreeMap::new(),
            recent: Vec::new(),
        }
    }

    #[test]
    fn test_first_day_unlocks_immediately() {
        let achievements = check_achievements(&mock_analysis(1, 1, 40, 40.0), &mock_summary(0));
        let first = achievements.iter().find(|a| a.id == "first_day").unwrap();
        assert!(first.unlocked);
        assert_eq!(first.badge, "[1]");
    }

    #[test]
    fn test_streak_badges_track_longest_streak() {
        let achievements = check_achievements(&mock_analysis(10, 7, 60, 60.0), &mock_summary(0));

        assert!(achievements.iter().find(|a| a.id == "streak_3").unwrap().unlocked);
        assert!(achievements.iter().find(|a| a.id == "streak_7").unwrap().unlocked);
        assert!(!achievements.iter().find(|a| a.id == "streak_30").unwrap().unlocked);
    }

    #[test]
    fn test_xp_milestones() {
        let unlocked = unlocked_achievements(&mock_analysis(1, 1, 40, 40.0), &mock_summary(1200));
        assert!(unlocked.iter().any(|a| a.id == "xp_500"));
        assert!(unlocked.iter().any(|a| a.id == "xp_1000"));
        assert!(unlocked.iter().any(|a| a.id == "level_10"));
    }

    #[test]
    fn test_award_unlocked_is_idempotent() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let ledger = XpLedger::open_at(tmp.path()).unwrap();
        let analysis = mock_analysis(7, 7, 96, 75.0);

        let xp = ledger.xp_summary("kari").unwrap();
        let first = award_unlocked(&ledger, "kari", &analysis, &xp).unwrap();
        assert!(!first.is_empty());

        // Same state again: everything already credited.
        let xp = ledger.xp_summary("kari").unwrap();
        let second = award_unlocked(&ledger, "kari", &analysis, &xp).unwrap();
        let repeat_ids: Vec<_> = first.iter().map(|a| a.id).collect();
        assert!(second.iter().all(|a| !repeat_ids.contains(&a.id)));
    }

    #[test]
    fn test_format_achievements_caps_display() {
        let mut achievements = all_achievements();
        for a in achievements.iter_mut().take(5) {
            a.unlocked = true;
        }
        let formatted = format_achievements(&achievements, 3);
        assert!(formatted.ends_with("+2 more"));
    }
}
