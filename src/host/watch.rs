//! Foreground delivery loop: replays on start, fires due timers on every
//! poll and replays again when the wall clock jumps.

use crate::core::engine::SchedulingEngine;
use crate::core::recovery::{RecoveryManager, RecoveryReport, RecoveryTrigger};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use chrono::Duration;
use std::thread;
use std::time::{self, Instant};

pub struct WatchOptions {
    pub poll: time::Duration,
    pub jump_threshold: Duration,
    /// Stop after this many polls; `None` runs until killed.
    pub iterations: Option<u64>,
}

pub fn print_report(report: &RecoveryReport) {
    for outcome in &report.replayed {
        println!("{}", outcome);
    }
    for id in &report.orphans_cancelled {
        info(format!("Stray wake timer #{} cancelled", id));
    }
    for id in &report.reset {
        info(format!("Alarm #{} reset to idle", id));
    }
    for kind in &report.unreadable {
        warning(format!("{} alarms could not be read", kind));
    }

    if report.failures() == 0 {
        success(format!("{} alarm(s) replayed", report.replayed.len()));
    } else {
        warning(format!(
            "{} alarm(s) replayed, {} failure(s)",
            report.replayed.len(),
            report.failures()
        ));
    }
}

pub fn watch(engine: &mut SchedulingEngine, opts: &WatchOptions) -> AppResult<()> {
    print_report(&RecoveryManager::replay(engine, RecoveryTrigger::Boot));

    let mut last_wall = engine.now();
    let mut last_mono = Instant::now();
    let mut polls: u64 = 0;

    loop {
        for outcome in engine.deliver_due() {
            println!("{}", outcome);
        }

        polls += 1;
        if let Some(max) = opts.iterations
            && polls >= max
        {
            break;
        }

        thread::sleep(opts.poll);

        let wall = engine.now();
        let mono = Instant::now();
        let elapsed = Duration::from_std(mono - last_mono)
            .map_err(|e| AppError::Other(format!("elapsed time: {}", e)))?;
        let drift = (wall - last_wall) - elapsed;
        let zone_changed = wall.offset() != last_wall.offset();

        if drift.num_seconds().abs() > opts.jump_threshold.num_seconds() || zone_changed {
            warning(format!(
                "Clock discontinuity detected ({}s), replaying alarms",
                drift.num_seconds()
            ));
            print_report(&RecoveryManager::replay(engine, RecoveryTrigger::ClockChange));
        }

        last_wall = wall;
        last_mono = mono;
    }

    Ok(())
}
