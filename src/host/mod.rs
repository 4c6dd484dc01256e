//! Process-level wiring: builds a `SchedulingEngine` on top of the
//! configured database with terminal collaborators.

pub mod console;
pub mod oracle;
pub mod timers;
pub mod watch;

use crate::config::Config;
use crate::core::engine::{AlarmChange, Collaborators, SchedulingEngine};
use crate::core::services::{Clock, FixedClock, SystemClock};
use crate::core::sound::SoundManager;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::store::AlarmStore;
use crate::errors::AppResult;
use crate::ui::messages::info;
use chrono::{DateTime, Local};
use console::{ConsoleNotifier, ConsolePlayer, ConsoleVibrator};
use oracle::CalendarFileOracle;
use timers::SqliteWakeTimers;

/// Open the engine on `cfg.database`. `now` pins the clock.
pub fn open_engine(cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<SchedulingEngine> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    // Timers get their own connection on the same file
    let timers = SqliteWakeTimers::new(DbPool::new(&cfg.database)?);
    let store = AlarmStore::new(pool, &cfg.default_sound);

    let clock: Box<dyn Clock> = match now {
        Some(at) => Box::new(FixedClock(at)),
        None => Box::new(SystemClock),
    };

    let sound = SoundManager::new(
        Box::new(ConsolePlayer::default()),
        Box::new(ConsoleVibrator::default()),
        &cfg.default_sound,
    );

    let mut engine = SchedulingEngine::new(
        store,
        Collaborators {
            timers: Box::new(timers),
            notifier: Box::new(ConsoleNotifier),
            sound,
            oracle: Box::new(CalendarFileOracle::new(&cfg.observance_calendar)),
            clock,
        },
    );

    engine.subscribe(|change| match change {
        AlarmChange::Saved(id) => info(format!("Alarm #{} saved", id)),
        AlarmChange::Disabled(id) => info(format!("Alarm #{} switched off", id)),
        AlarmChange::Removed(id) => info(format!("Alarm #{} removed", id)),
    });

    Ok(engine)
}
