use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::coordinator::AlarmCoordinator;
use crate::errors::{AppError, AppResult};
use crate::host::open_engine;
use crate::models::observance;
use crate::utils::time::parse_required_time;
use chrono::{DateTime, Local, Timelike};

/// Observance reminders are never created or deleted, only tuned and
/// switched on or off.
pub fn handle(cmd: &Commands, cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<()> {
    if let Commands::Observance {
        code,
        time,
        sound,
        on,
        off,
    } = cmd
    {
        let entry = observance::find(*code).ok_or(AppError::InvalidCategory(*code))?;
        let time = time.as_deref().map(parse_required_time).transpose()?;

        let mut engine = open_engine(cfg, now)?;
        let mut record = engine
            .store_mut()
            .get(*code)?
            .ok_or(AppError::AlarmNotFound(*code))?;

        if let Some(t) = time {
            record.hour = t.hour();
            record.minute = t.minute();
        }
        if let Some(s) = sound {
            record.sound = s.clone();
        }

        if *off {
            // Keep the new settings, then switch off
            engine.store_mut().upsert(&record)?;
            return super::report(engine.stop(*code));
        }

        if *on || record.enabled {
            let outcome = AlarmCoordinator::new(&mut engine).save(record)?;
            super::report(outcome)?;
        } else {
            engine.store_mut().upsert(&record)?;
            println!("🗓️ {} set for {} (off)", entry.name, record.time_str());
        }
    }

    Ok(())
}
