//! SchedulingEngine: the per-alarm Idle / Armed / Ringing state machine.
//!
//! Every operation runs to completion and reports an `Outcome`. Faults from
//! the store or from a collaborator are written to the audit log and never
//! returned as errors.

use crate::core::services::{
    ALERT_ACTIONS, Clock, NotificationService, ObservanceOracle, WakeTimerService,
};
use crate::core::sound::{Playback, SoundManager};
use crate::db::log::ttlog;
use crate::db::store::AlarmStore;
use crate::errors::AppError;
use crate::models::alarm::{AlarmRecord, Category};
use crate::models::state::AlarmState;
use crate::ui::messages::warning;
use crate::utils::time::{format_instant, next_occurrence};
use chrono::{DateTime, Datelike, Duration, Local};
use std::fmt;

pub const SNOOZE_MINUTES: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A wake timer is registered for `at`.
    Armed { id: i64, at: DateTime<Local> },
    /// START without force on an alarm that was already armed.
    AlreadyArmed { id: i64 },
    Ringing { id: i64, playback: Playback },
    AlreadyRinging { id: i64 },
    /// Another alarm holds the speaker; this one comes back at `at`.
    Deferred { id: i64, at: DateTime<Local>, ringing: i64 },
    /// Not due today; silently re-armed for the next day.
    Skipped { id: i64, at: DateTime<Local> },
    Idle { id: i64 },
    Removed { id: i64 },
    Missing { id: i64 },
    Failed { id: i64, reason: String },
}

impl Outcome {
    pub fn id(&self) -> i64 {
        match self {
            Outcome::Armed { id, .. }
            | Outcome::AlreadyArmed { id }
            | Outcome::Ringing { id, .. }
            | Outcome::AlreadyRinging { id }
            | Outcome::Deferred { id, .. }
            | Outcome::Skipped { id, .. }
            | Outcome::Idle { id }
            | Outcome::Removed { id }
            | Outcome::Missing { id }
            | Outcome::Failed { id, .. } => *id,
        }
    }

    /// Instant of the wake timer left behind, if any.
    pub fn fire_at(&self) -> Option<DateTime<Local>> {
        match self {
            Outcome::Armed { at, .. } | Outcome::Deferred { at, .. } | Outcome::Skipped { at, .. } => {
                Some(*at)
            }
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Armed { id, at } => {
                write!(f, "⏰ Alarm #{} armed for {}", id, format_instant(at))
            }
            Outcome::AlreadyArmed { id } => write!(f, "⏰ Alarm #{} already armed", id),
            Outcome::Ringing { id, playback } => {
                write!(f, "🔔 Alarm #{} ringing ({})", id, playback)
            }
            Outcome::AlreadyRinging { id } => write!(f, "🔔 Alarm #{} is already ringing", id),
            Outcome::Deferred { id, at, ringing } => write!(
                f,
                "💤 Alarm #{} deferred to {}: #{} is ringing",
                id,
                format_instant(at),
                ringing
            ),
            Outcome::Skipped { id, at } => write!(
                f,
                "⏭️ Alarm #{} not due today, re-armed for {}",
                id,
                format_instant(at)
            ),
            Outcome::Idle { id } => write!(f, "⏹️ Alarm #{} is off", id),
            Outcome::Removed { id } => write!(f, "🗑️ Alarm #{} deleted", id),
            Outcome::Missing { id } => write!(f, "❔ Alarm #{} not found", id),
            Outcome::Failed { id, reason } => write!(f, "❌ Alarm #{}: {}", id, reason),
        }
    }
}

/// Change signal for observers (UI refresh).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmChange {
    Saved(i64),
    Disabled(i64),
    Removed(i64),
}

pub struct Collaborators {
    pub timers: Box<dyn WakeTimerService>,
    pub notifier: Box<dyn NotificationService>,
    pub sound: SoundManager,
    pub oracle: Box<dyn ObservanceOracle>,
    pub clock: Box<dyn Clock>,
}

type Observer = Box<dyn Fn(&AlarmChange)>;

pub struct SchedulingEngine {
    store: AlarmStore,
    timers: Box<dyn WakeTimerService>,
    notifier: Box<dyn NotificationService>,
    sound: SoundManager,
    oracle: Box<dyn ObservanceOracle>,
    clock: Box<dyn Clock>,
    observers: Vec<Observer>,
}

impl SchedulingEngine {
    pub fn new(store: AlarmStore, parts: Collaborators) -> Self {
        let mut engine = Self {
            store,
            timers: parts.timers,
            notifier: parts.notifier,
            sound: parts.sound,
            oracle: parts.oracle,
            clock: parts.clock,
            observers: Vec::new(),
        };

        // The ringer recorded by a previous process still owns the speaker
        match engine.store.ringing() {
            Ok(owner) => engine.sound.adopt(owner),
            Err(e) => engine.fault("init", 0, &e),
        }

        engine
    }

    pub fn store(&self) -> &AlarmStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AlarmStore {
        &mut self.store
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&AlarmChange) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn notify(&self, change: AlarmChange) {
        for observer in &self.observers {
            observer(&change);
        }
    }

    /// Id currently ringing, if any.
    pub fn ringing(&self) -> Option<i64> {
        self.sound.owner()
    }

    /// `(id, fire_at_millis)` of every wake timer registration.
    pub fn registered_timers(&self) -> Vec<(i64, i64)> {
        self.timers.registered()
    }

    /// Observed state: the persisted state, downgraded to Idle when an
    /// armed row has lost its wake timer registration.
    pub fn state_of(&self, id: i64) -> AlarmState {
        match self.store.state(id) {
            Ok(Some(AlarmState::Armed)) if !self.timers.exists(id) => AlarmState::Idle,
            Ok(Some(state)) => state,
            Ok(None) => AlarmState::Idle,
            Err(e) => {
                self.fault("state", id, &e);
                AlarmState::Idle
            }
        }
    }

    // ------------------------------------------------
    // START
    // ------------------------------------------------

    /// Arm `record` for its next `hour:minute`. Without `force_restart` an
    /// already armed alarm is left alone.
    pub fn start(&mut self, record: &AlarmRecord, force_restart: bool) -> Outcome {
        let id = record.id;

        if !force_restart && self.state_of(id) == AlarmState::Armed {
            return Outcome::AlreadyArmed { id };
        }

        if self.sound.owner() == Some(id) {
            self.release(id);
        }

        let now = self.now();
        match next_occurrence(record.hour, record.minute, now) {
            Ok(at) => match self.arm(id, at, "start") {
                Ok(at) => Outcome::Armed { id, at },
                Err(failed) => failed,
            },
            Err(e) => self.fail("start", id, e),
        }
    }

    // ------------------------------------------------
    // FIRE
    // ------------------------------------------------

    /// Wake timer callback for `id`.
    pub fn fire(&mut self, id: i64) -> Outcome {
        // The registration that fired is consumed
        if let Err(e) = self.timers.cancel(id) {
            self.fault("fire", id, &e);
        }

        let record = match self.store.get(id) {
            Ok(Some(r)) => r,
            Ok(None) => {
                self.audit("fire", id, "no such alarm, stray timer dropped");
                return Outcome::Missing { id };
            }
            Err(e) => return self.fail("fire", id, e),
        };

        if !record.enabled {
            self.persist_state(id, AlarmState::Idle);
            self.audit("fire", id, "alarm disabled, timer dropped");
            return Outcome::Idle { id };
        }

        if self.sound.owner() == Some(id) {
            return Outcome::AlreadyRinging { id };
        }

        let now = self.now();

        if !self.due_today(&record, now) {
            return match next_occurrence(record.hour, record.minute, now) {
                Ok(at) => match self.arm(id, at, "skip") {
                    Ok(at) => Outcome::Skipped { id, at },
                    Err(failed) => failed,
                },
                Err(e) => self.fail("skip", id, e),
            };
        }

        if let Some(other) = self.sound.owner() {
            let at = now + Duration::minutes(SNOOZE_MINUTES);
            return match self.arm(id, at, "defer") {
                Ok(at) => Outcome::Deferred {
                    id,
                    at,
                    ringing: other,
                },
                Err(failed) => failed,
            };
        }

        self.ring(&record)
    }

    /// Fire every registration whose instant has passed, earliest first.
    pub fn deliver_due(&mut self) -> Vec<Outcome> {
        let now = self.now().timestamp_millis();
        let due = self.timers.due(now);
        due.into_iter().map(|id| self.fire(id)).collect()
    }

    /// Checked against the day the timer fires, so a snooze or defer that
    /// crosses midnight is judged by the new day.
    fn due_today(&self, record: &AlarmRecord, now: DateTime<Local>) -> bool {
        let today = now.date_naive();

        match &record.category {
            Category::Standard => record.repeat.rings_on(today.weekday()),
            Category::Observance { .. } => match self.oracle.special_on(today) {
                Ok(codes) => codes.contains(&record.id),
                Err(e) => {
                    self.fault("oracle", record.id, &e);
                    false
                }
            },
        }
    }

    fn ring(&mut self, record: &AlarmRecord) -> Outcome {
        let id = record.id;
        let playback = self.sound.start(id, &record.sound, record.vibrate);

        let title = record.title();
        let body = format!("{} ({})", record.time_str(), record.repeat);

        if let Err(e) = self.notifier.post(id, &title, &body, &ALERT_ACTIONS) {
            self.fault("notify", id, &e);
        }
        if let Err(e) = self.notifier.show_full_screen(id, &title) {
            self.fault("notify", id, &e);
        }

        self.persist_state(id, AlarmState::Ringing);
        self.audit("ring", id, &playback.to_string());

        Outcome::Ringing { id, playback }
    }

    // ------------------------------------------------
    // Operator actions
    // ------------------------------------------------

    /// Silence and come back in ten minutes, whatever the repeat rule.
    pub fn snooze(&mut self, id: i64) -> Outcome {
        self.release(id);

        match self.store.contains(id) {
            Ok(true) => {}
            Ok(false) => return Outcome::Missing { id },
            Err(e) => return self.fail("snooze", id, e),
        }

        let at = self.now() + Duration::minutes(SNOOZE_MINUTES);
        match self.arm(id, at, "snooze") {
            Ok(at) => Outcome::Armed { id, at },
            Err(failed) => failed,
        }
    }

    /// Silence; one-shot alarms switch off, repeating ones re-arm for the
    /// next day.
    pub fn dismiss(&mut self, id: i64) -> Outcome {
        self.release(id);

        let record = match self.store.get(id) {
            Ok(Some(r)) => r,
            Ok(None) => return Outcome::Missing { id },
            Err(e) => return self.fail("dismiss", id, e),
        };

        if record.repeat.is_once() {
            self.persist_state(id, AlarmState::Idle);
            self.persist_enabled(id, false);
            self.audit("dismiss", id, "one-shot alarm switched off");
            self.notify(AlarmChange::Disabled(id));
            return Outcome::Idle { id };
        }

        match next_occurrence(record.hour, record.minute, self.now()) {
            Ok(at) => match self.arm(id, at, "dismiss") {
                Ok(at) => Outcome::Armed { id, at },
                Err(failed) => failed,
            },
            Err(e) => self.fail("dismiss", id, e),
        }
    }

    /// Operator switched the alarm off: no re-arm, whatever the repeat rule.
    pub fn stop(&mut self, id: i64) -> Outcome {
        self.release(id);

        match self.store.contains(id) {
            Ok(true) => {}
            Ok(false) => return Outcome::Missing { id },
            Err(e) => return self.fail("stop", id, e),
        }

        self.persist_state(id, AlarmState::Idle);
        self.persist_enabled(id, false);
        self.audit("stop", id, "switched off");
        self.notify(AlarmChange::Disabled(id));

        Outcome::Idle { id }
    }

    pub fn delete(&mut self, id: i64) -> Outcome {
        match self.stop(id) {
            Outcome::Idle { .. } => {}
            other => return other,
        }

        match self.store.remove(id) {
            Ok(_) => {
                self.audit("delete", id, "removed from store");
                self.notify(AlarmChange::Removed(id));
                Outcome::Removed { id }
            }
            Err(e) => self.fail("delete", id, e),
        }
    }

    // ------------------------------------------------
    // Recovery support
    // ------------------------------------------------

    /// Cancel a registration nothing should own any more.
    pub fn drop_timer(&mut self, id: i64) -> bool {
        match self.timers.cancel(id) {
            Ok(()) => {
                self.audit("orphan", id, "stray wake timer cancelled");
                true
            }
            Err(e) => {
                self.fault("orphan", id, &e);
                false
            }
        }
    }

    /// Bring a record's persisted state back to Idle.
    pub fn reset_state(&mut self, id: i64) {
        self.release(id);
        self.persist_state(id, AlarmState::Idle);
    }

    // ------------------------------------------------
    // Internals
    // ------------------------------------------------

    fn arm(&mut self, id: i64, at: DateTime<Local>, op: &str) -> Result<DateTime<Local>, Outcome> {
        if let Err(e) = self.timers.register(id, at.timestamp_millis(), true) {
            // Not retried here: the next replay re-arms it
            self.persist_state(id, AlarmState::Idle);
            return Err(self.fail(op, id, e));
        }

        self.persist_state(id, AlarmState::Armed);
        self.audit(op, id, &format!("armed for {}", format_instant(&at)));
        Ok(at)
    }

    /// Stop sound if `id` owns it, drop its wake timer and alert.
    fn release(&mut self, id: i64) {
        self.sound.stop(id);

        if let Err(e) = self.timers.cancel(id) {
            self.fault("cancel", id, &e);
        }
        if let Err(e) = self.notifier.cancel(id) {
            self.fault("cancel", id, &e);
        }
    }

    fn persist_state(&mut self, id: i64, state: AlarmState) {
        if let Err(e) = self.store.set_state(id, state) {
            self.fault("state", id, &e);
        }
    }

    fn persist_enabled(&mut self, id: i64, enabled: bool) {
        if let Err(e) = self.store.set_enabled(id, enabled) {
            self.fault("enable", id, &e);
        }
    }

    fn audit(&self, op: &str, id: i64, message: &str) {
        let _ = ttlog(self.store.conn(), op, &format!("#{}", id), message);
    }

    fn fault(&self, op: &str, id: i64, err: &AppError) {
        warning(format!("{} #{}: {}", op, id, err));
        let _ = ttlog(
            self.store.conn(),
            "fault",
            &format!("{} #{}", op, id),
            &err.to_string(),
        );
    }

    fn fail(&self, op: &str, id: i64, err: AppError) -> Outcome {
        self.fault(op, id, &err);
        Outcome::Failed {
            id,
            reason: err.to_string(),
        }
    }
}
