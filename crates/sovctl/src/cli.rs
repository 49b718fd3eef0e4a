//! CLI - command-line argument parsing.
//!
//! Defines the CLI structure using clap; execution logic lives in the
//! command modules.

use clap::{Parser, Subcommand};

/// Sovereignty Score CLI
#[derive(Parser)]
#[command(name = "sovctl")]
#[command(about = "Sovereignty Score - habit scoring and gamification", long_about = None)]
#[command(version)]
pub struct Cli {
    /// User to operate on (defaults to $USER)
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score and record today's habits
    Log {
        /// Path to score against (defaults to the configured path)
        #[arg(long)]
        path: Option<String>,

        /// Home-cooked meals eaten
        #[arg(long, default_value_t = 0)]
        meals: u32,

        /// Junk food was eaten today
        #[arg(long)]
        junk_food: bool,

        /// Minutes of exercise
        #[arg(long, default_value_t = 0)]
        exercise: u32,

        /// Strength training done
        #[arg(long)]
        strength: bool,

        /// No discretionary spending
        #[arg(long)]
        no_spending: bool,

        /// Invested in bitcoin
        #[arg(long)]
        invested: bool,

        /// Meditated
        #[arg(long)]
        meditation: bool,

        /// Gratitude practice done
        #[arg(long)]
        gratitude: bool,

        /// Read or learned something
        #[arg(long)]
        learned: bool,

        /// Took an environmental action
        #[arg(long)]
        environmental: bool,
    },

    /// Show XP, level, streaks, and achievements
    Status,

    /// Show the behavioral insight profile
    Insight,

    /// Complete a daily challenge
    Challenge {
        /// Challenge id (see `sovctl challenges`)
        id: String,
    },

    /// List the daily challenge catalog
    Challenges,

    /// List available paths and their rules
    Paths,
}
