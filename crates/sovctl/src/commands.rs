//! Command implementations for sovctl.

use anyhow::{Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use sov_core::achievements::{check_achievements, format_achievements};
use sov_core::challenges::{find_challenge, DAILY_CHALLENGES};
use sov_core::config::SovereignConfig;
use sov_core::insight::{classify, CoachingNeed, HabitPhase, MotivationState};
use sov_core::ledger::{AwardOutcome, XpLedger, XP_PER_LEVEL};
use sov_core::paths::{ActivityRule, PathRegistry};
use sov_core::record::DailyActivityRecord;
use sov_core::score::compute_score;
use sov_core::store::RecordStore;
use sov_core::trends::{analyze_default, HistoryAnalysis, TrendDirection};
use std::fs;

/// Everything a command needs, opened once.
pub struct AppContext {
    pub config: SovereignConfig,
    pub registry: PathRegistry,
    pub store: RecordStore,
    pub ledger: XpLedger,
}

impl AppContext {
    pub fn open() -> Result<Self> {
        let config = SovereignConfig::load()?;

        let registry = match &config.paths_file {
            Some(file) => PathRegistry::load_from(file)
                .with_context(|| format!("Failed to load paths from {}", file.display()))?,
            None => PathRegistry::builtin(),
        };

        let db_path = config.database_path()?;
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let store = RecordStore::open_at(&db_path)?;
        let ledger = XpLedger::open_at(&db_path)
            .with_context(|| format!("Failed to open ledger at {}", db_path.display()))?;

        Ok(Self { config, registry, store, ledger })
    }
}

/// Fields for `sovctl log`, collected from the CLI flags.
pub struct LogArgs {
    pub path: Option<String>,
    pub meals: u32,
    pub junk_food: bool,
    pub exercise: u32,
    pub strength: bool,
    pub no_spending: bool,
    pub invested: bool,
    pub meditation: bool,
    pub gratitude: bool,
    pub learned: bool,
    pub environmental: bool,
}

pub fn log_day(user: &str, args: LogArgs) -> Result<()> {
    let ctx = AppContext::open()?;
    let path_id = args.path.unwrap_or_else(|| ctx.config.default_path.clone());

    // One record per user per calendar day; the store appends blindly,
    // so the submission flow checks first.
    let today = Utc::now().date_naive();
    if let Some(existing) = ctx.store.record_for_day(user, today)? {
        println!(
            "{} {} already has a record for {} (score {}). Keeping it.",
            "Skipped:".yellow().bold(),
            user,
            today,
            existing.score
        );
        return Ok(());
    }

    let mut record = DailyActivityRecord::new(user, &path_id, Utc::now());
    record.home_cooked_meals = args.meals;
    record.junk_food = args.junk_food;
    record.exercise_minutes = args.exercise;
    record.strength_training = args.strength;
    record.no_spending = args.no_spending;
    record.invested_bitcoin = args.invested;
    record.meditation = args.meditation;
    record.gratitude = args.gratitude;
    record.read_or_learned = args.learned;
    record.environmental_action = args.environmental;

    record.score = compute_score(&record, &ctx.registry)?;
    ctx.store.insert(&record)?;

    let max = ctx
        .registry
        .get(&path_id)
        .map(|p| p.max_score)
        .unwrap_or(100);
    println!(
        "Logged {} on {}: {}",
        record.day(),
        path_id.cyan(),
        format!("{}/{}", record.score, max).bold().green()
    );
    Ok(())
}

pub fn status(user: &str) -> Result<()> {
    let ctx = AppContext::open()?;
    let history = ctx.store.history(user)?;

    println!("{}", format!("Sovereignty status for {}", user).bold());
    println!();

    let xp = ctx.ledger.xp_summary(user)?;
    println!(
        "  Level {} {} - {} XP ({}/{} into level)",
        xp.level.to_string().bold().yellow(),
        xp.title.magenta(),
        xp.total_xp,
        xp.xp_into_level,
        XP_PER_LEVEL,
    );
    for (source, amount) in &xp.by_source {
        println!("    {:<16} {:>6} XP", source, amount);
    }

    if history.is_empty() {
        println!();
        println!("  No days logged yet. Start with `sovctl log`.");
        return Ok(());
    }

    let analysis = analysis_for(&ctx, &history);
    println!();
    println!(
        "  {} days tracked, best day {}, average {:.1}",
        analysis.total_days_tracked,
        analysis.best_score.to_string().green(),
        analysis.overall_avg_score,
    );
    println!(
        "  Trend: {} (recent {:.1} vs early {:.1})",
        direction_label(analysis.trend.direction),
        analysis.trend.recent_mean,
        analysis.trend.early_mean,
    );

    println!();
    println!("  Streaks:");
    let mut streaks: Vec<_> = analysis.streaks.iter().collect();
    streaks.sort_by(|a, b| b.1.current_streak.cmp(&a.1.current_streak));
    for (activity, s) in streaks.iter().take(5) {
        println!(
            "    {:<22} current {:>3}  longest {:>3}  ({:.0}% of days)",
            activity,
            s.current_streak.to_string().green(),
            s.longest_streak,
            s.consistency_rate,
        );
    }

    let achievements = check_achievements(&analysis, &xp);
    let badges = format_achievements(&achievements, 8);
    if !badges.is_empty() {
        println!();
        println!("  Achievements: {}", badges.yellow());
    }
    Ok(())
}

pub fn insight(user: &str) -> Result<()> {
    let ctx = AppContext::open()?;
    let history = ctx.store.history(user)?;
    if history.is_empty() {
        println!("No days logged yet for {}.", user);
        return Ok(());
    }

    let analysis = analysis_for(&ctx, &history);
    let profile = classify(&analysis, &ctx.config.thresholds);

    println!("{}", format!("Behavioral profile for {}", user).bold());
    println!("  Motivation: {}", motivation_label(profile.motivation).bold());
    println!("  Phase:      {}", phase_label(profile.phase).bold());
    println!("  Coaching:   {}", coaching_label(profile.coaching_need).bold());
    println!();
    println!(
        "  Based on {} tracked days, average {:.1}, recent {:.1}, volatility {:.1}",
        profile.metrics.total_days_tracked,
        profile.metrics.overall_avg_score,
        profile.metrics.recent_avg_score,
        profile.metrics.volatility,
    );
    if let Some(days) = profile.metrics.days_since_last_entry {
        if days > 0 {
            println!("  Last entry was {} days ago.", days.to_string().red());
        }
    }
    if analysis.weekend.weekend_drop > 5.0 {
        println!(
            "  Weekend scores run {:.1} points below weekdays.",
            analysis.weekend.weekend_drop
        );
    }
    Ok(())
}

pub fn challenge(user: &str, id: &str) -> Result<()> {
    let ctx = AppContext::open()?;
    let def = find_challenge(id)
        .with_context(|| format!("Unknown challenge '{}'. Try `sovctl challenges`.", id))?;

    let outcome =
        ctx.ledger
            .complete_daily_challenge(user, def.id, def.challenge_type, def.xp_reward)?;
    match outcome {
        AwardOutcome::Applied => {
            println!(
                "{} {} (+{} XP)",
                "Completed:".green().bold(),
                def.description,
                def.xp_reward
            );
        }
        AwardOutcome::AlreadyApplied => {
            println!("Already completed '{}' today.", def.id.yellow());
        }
    }
    Ok(())
}

pub fn challenges() -> Result<()> {
    println!("{}", "Daily challenges".bold());
    for def in DAILY_CHALLENGES {
        println!(
            "  {:<20} {:>3} XP  {}",
            def.id.cyan(),
            def.xp_reward,
            def.description
        );
    }
    Ok(())
}

pub fn paths() -> Result<()> {
    let ctx = AppContext::open()?;
    println!("{}", "Paths".bold());
    for config in ctx.registry.configs() {
        println!(
            "  {} - {} (max {})",
            config.path_id.cyan().bold(),
            config.name,
            config.max_score
        );
        for (activity, rule) in &config.rules {
            match rule {
                ActivityRule::Metered { points_per_unit, max_units } => {
                    println!(
                        "    {:<22} {:.2} pts/unit, up to {} units",
                        activity, points_per_unit, max_units
                    );
                }
                ActivityRule::Flat { points } => {
                    println!("    {:<22} {:.0} pts", activity, points);
                }
            }
        }
    }
    Ok(())
}

// CLI output is always relative to today.
fn analysis_for(ctx: &AppContext, history: &[DailyActivityRecord]) -> HistoryAnalysis {
    analyze_default(history, Utc::now().date_naive(), &ctx.config.trend)
}

fn direction_label(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Improving => "improving",
        TrendDirection::Declining => "declining",
        TrendDirection::Stable => "stable",
    }
}

fn motivation_label(state: MotivationState) -> &'static str {
    match state {
        MotivationState::High => "high",
        MotivationState::Moderate => "moderate",
        MotivationState::Low => "low",
        MotivationState::Burnout => "burnout",
        MotivationState::Rebuilding => "rebuilding",
    }
}

fn phase_label(phase: HabitPhase) -> &'static str {
    match phase {
        HabitPhase::Formation => "formation",
        HabitPhase::Maintenance => "maintenance",
        HabitPhase::Mastery => "mastery",
        HabitPhase::Erosion => "erosion",
        HabitPhase::Crisis => "crisis",
    }
}

fn coaching_label(need: CoachingNeed) -> &'static str {
    match need {
        CoachingNeed::Celebration => "celebration",
        CoachingNeed::Optimization => "optimization",
        CoachingNeed::CourseCorrection => "course correction",
        CoachingNeed::Intervention => "intervention",
        CoachingNeed::Education => "education",
        CoachingNeed::ReEngagement => "re-engagement",
    }
}
