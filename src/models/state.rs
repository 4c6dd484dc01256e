use serde::Serialize;
use std::fmt;

/// Scheduling state persisted per alarm row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum AlarmState {
    #[default]
    Idle,
    Armed,
    Ringing,
}

impl AlarmState {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AlarmState::Idle => "idle",
            AlarmState::Armed => "armed",
            AlarmState::Ringing => "ringing",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(AlarmState::Idle),
            "armed" => Some(AlarmState::Armed),
            "ringing" => Some(AlarmState::Ringing),
            _ => None,
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
