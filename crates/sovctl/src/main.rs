//! Sovereignty Control - CLI client for the Sovereignty Score engine.
//!
//! Scores and records days, shows XP and streaks, completes daily
//! challenges. All state lives in the shared SQLite database.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use commands::LogArgs;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let user = match cli.user {
        Some(user) => user,
        None => std::env::var("USER").context("Cannot determine user; pass --user")?,
    };

    match cli.command {
        Commands::Log {
            path,
            meals,
            junk_food,
            exercise,
            strength,
            no_spending,
            invested,
            meditation,
            gratitude,
            learned,
            environmental,
        } => commands::log_day(
            &user,
            LogArgs {
                path,
                meals,
                junk_food,
                exercise,
                strength,
                no_spending,
                invested,
                meditation,
                gratitude,
                learned,
                environmental,
            },
        ),
        Commands::Status => commands::status(&user),
        Commands::Insight => commands::insight(&user),
        Commands::Challenge { id } => commands::challenge(&user, &id),
        Commands::Challenges => commands::challenges(),
        Commands::Paths => commands::paths(),
    }
}
