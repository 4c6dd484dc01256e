use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::recovery::{RecoveryManager, RecoveryTrigger};
use crate::errors::AppResult;
use crate::host::open_engine;
use crate::host::watch::{WatchOptions, print_report, watch};
use chrono::{DateTime, Duration, Local};
use std::time;

pub fn handle(cmd: &Commands, cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<()> {
    match cmd {
        Commands::Recover => {
            let mut engine = open_engine(cfg, now)?;
            let report = RecoveryManager::replay(&mut engine, RecoveryTrigger::Boot);
            print_report(&report);
        }
        Commands::Watch { iterations } => {
            // The loop measures real elapsed time, so the clock is never pinned
            let mut engine = open_engine(cfg, None)?;
            let opts = WatchOptions {
                poll: time::Duration::from_secs(cfg.poll_interval_secs.max(1)),
                jump_threshold: Duration::seconds(cfg.clock_jump_threshold_secs),
                iterations: *iterations,
            };
            watch(&mut engine, &opts)?;
        }
        _ => {}
    }

    Ok(())
}
