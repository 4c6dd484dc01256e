use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::coordinator::AlarmCoordinator;
use crate::errors::{AppError, AppResult};
use crate::host::open_engine;
use chrono::{DateTime, Local};

/// `enable ID` saves the alarm back (which arms it); `disable ID` stops it.
pub fn handle(cmd: &Commands, cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<()> {
    let mut engine = open_engine(cfg, now)?;

    match cmd {
        Commands::Enable { id } => {
            let record = engine
                .store_mut()
                .get(*id)?
                .ok_or(AppError::AlarmNotFound(*id))?;
            let outcome = AlarmCoordinator::new(&mut engine).save(record)?;
            super::report(outcome)
        }
        Commands::Disable { id } => super::report(engine.stop(*id)),
        _ => Ok(()),
    }
}
