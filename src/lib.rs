//! rAlarm library root.
//! Exposes the CLI parser, the high-level run() function, and the alarm
//! store, scheduling engine and recovery modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod host;
pub mod models;
pub mod ui;
pub mod utils;

use chrono::{DateTime, Local};
use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Add { .. } => commands::add::handle(&cli.command, cfg, now),
        Commands::List { .. } => commands::list::handle(&cli.command, cfg, now),
        Commands::Enable { .. } | Commands::Disable { .. } => {
            commands::switch::handle(&cli.command, cfg, now)
        }
        Commands::Del { .. } => commands::del::handle(&cli.command, cfg, now),
        Commands::Fire { .. } | Commands::Snooze { .. } | Commands::Dismiss { .. } | Commands::Tick => {
            commands::ring::handle(&cli.command, cfg, now)
        }
        Commands::Recover | Commands::Watch { .. } => {
            commands::recover::handle(&cli.command, cfg, now)
        }
        Commands::Status => commands::status::handle(cfg, now),
        Commands::Observance { .. } => commands::observance::handle(&cli.command, cfg, now),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line overrides
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    let now = cli
        .now
        .as_deref()
        .map(utils::time::parse_local_datetime)
        .transpose()?;

    dispatch(&cli, &cfg, now)
}
