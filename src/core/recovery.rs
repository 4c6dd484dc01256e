//! RecoveryManager: replay every enabled alarm after a restart or a clock
//! discontinuity.

use crate::core::engine::{Outcome, SchedulingEngine};
use crate::db::log::ttlog;
use crate::models::alarm::CategoryKind;
use crate::models::state::AlarmState;
use crate::ui::messages::warning;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryTrigger {
    Boot,
    ClockChange,
}

impl fmt::Display for RecoveryTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryTrigger::Boot => write!(f, "boot"),
            RecoveryTrigger::ClockChange => write!(f, "clock change"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecoveryReport {
    /// One START outcome per enabled record, in replay order.
    pub replayed: Vec<Outcome>,
    /// Wake timers with no enabled record behind them.
    pub orphans_cancelled: Vec<i64>,
    /// Disabled records whose persisted state was not idle.
    pub reset: Vec<i64>,
    /// Categories that could not be listed.
    pub unreadable: Vec<CategoryKind>,
}

impl RecoveryReport {
    pub fn failures(&self) -> usize {
        self.replayed.iter().filter(|o| o.is_failure()).count() + self.unreadable.len()
    }
}

pub struct RecoveryManager;

impl RecoveryManager {
    pub fn replay(engine: &mut SchedulingEngine, trigger: RecoveryTrigger) -> RecoveryReport {
        let mut report = RecoveryReport::default();
        let mut enabled = Vec::new();
        let mut disabled = Vec::new();

        // 1️⃣ Read both tables
        for kind in CategoryKind::ALL {
            match engine.store_mut().list(kind) {
                Ok(records) => {
                    for r in records {
                        if r.enabled {
                            enabled.push(r);
                        } else {
                            disabled.push(r.id);
                        }
                    }
                }
                Err(e) => {
                    warning(format!("Recovery: cannot read {} alarms: {}", kind, e));
                    report.unreadable.push(kind);
                }
            }
        }

        // 2️⃣ Reconcile: timers nobody owns, disabled rows left armed
        let wanted: BTreeSet<i64> = enabled.iter().map(|r| r.id).collect();
        let mut orphan_ids: Vec<i64> = engine
            .registered_timers()
            .into_iter()
            .map(|(id, _)| id)
            .filter(|id| !wanted.contains(id))
            .collect();

        // A table we could not read may still own its timers
        orphan_ids.retain(|id| !report.unreadable.contains(&CategoryKind::for_id(*id)));

        for id in orphan_ids {
            if engine.drop_timer(id) {
                report.orphans_cancelled.push(id);
            }
        }

        for id in disabled {
            if engine.store().state(id).ok().flatten() != Some(AlarmState::Idle) {
                engine.reset_state(id);
                report.reset.push(id);
            }
        }

        // 3️⃣ Replay every enabled alarm
        for record in &enabled {
            report.replayed.push(engine.start(record, true));
        }

        let _ = ttlog(
            engine.store().conn(),
            "recover",
            &trigger.to_string(),
            &format!(
                "{} replayed, {} orphan timers cancelled, {} reset, {} failures",
                report.replayed.len(),
                report.orphans_cancelled.len(),
                report.reset.len(),
                report.failures()
            ),
        );

        report
    }
}
