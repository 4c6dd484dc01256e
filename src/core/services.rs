//! Collaborators the scheduling engine drives but does not own the
//! implementation of: the wake timer facility, the notification surface,
//! the ringtone player and vibrator, the observance oracle and the clock.

use crate::errors::AppResult;
use chrono::{DateTime, Local, NaiveDate};
use std::collections::BTreeSet;
use std::fmt;

/// Actions offered on a ringing alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    Snooze,
    Dismiss,
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertAction::Snooze => write!(f, "Snooze"),
            AlertAction::Dismiss => write!(f, "Dismiss"),
        }
    }
}

pub const ALERT_ACTIONS: [AlertAction; 2] = [AlertAction::Snooze, AlertAction::Dismiss];

/// Default vibration pattern in milliseconds: wait, buzz, wait, buzz.
pub const VIBRATION_PATTERN: [u64; 4] = [0, 800, 400, 800];

/// OS wake timer facility. One registration per alarm id; registering an
/// id again replaces its previous instant.
pub trait WakeTimerService {
    fn register(&mut self, id: i64, fire_at_millis: i64, exact: bool) -> AppResult<()>;
    fn cancel(&mut self, id: i64) -> AppResult<()>;
    fn exists(&self, id: i64) -> bool;

    /// `(id, fire_at_millis)` of every live registration.
    fn registered(&self) -> Vec<(i64, i64)>;

    /// Ids whose instant is at or before `now_millis`, earliest first.
    fn due(&self, now_millis: i64) -> Vec<i64> {
        let mut due: Vec<(i64, i64)> = self
            .registered()
            .into_iter()
            .filter(|(_, at)| *at <= now_millis)
            .collect();
        due.sort_by_key(|(id, at)| (*at, *id));
        due.into_iter().map(|(id, _)| id).collect()
    }
}

pub trait NotificationService {
    fn post(&mut self, id: i64, title: &str, body: &str, actions: &[AlertAction]) -> AppResult<()>;
    fn cancel(&mut self, id: i64) -> AppResult<()>;

    /// Full-attention display for a ringing alarm.
    fn show_full_screen(&mut self, _id: i64, _title: &str) -> AppResult<()> {
        Ok(())
    }
}

pub trait RingtonePlayer {
    fn play(&mut self, sound: &str, looping: bool) -> AppResult<()>;
    fn stop(&mut self);
}

pub trait Vibrator {
    fn vibrate(&mut self, pattern: &[u64]) -> AppResult<()>;
    fn cancel(&mut self);
}

/// Calendar engine answering "which observances fall on this date".
pub trait ObservanceOracle {
    fn special_on(&self, date: NaiveDate) -> AppResult<BTreeSet<i64>>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to one instant (`--now` on the command line).
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

