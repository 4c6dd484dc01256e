use super::repeat::RepeatSpec;
use serde::Serialize;
use std::fmt;

/// First id handed out to Standard alarms. Observance ids are their event
/// codes and all sit below this value.
pub const STANDARD_ID_BASE: i64 = 500;
pub const OBSERVANCE_ID_BASE: i64 = 1;

/// Which table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryKind {
    Standard,
    Observance,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 2] = [CategoryKind::Standard, CategoryKind::Observance];

    pub fn table(&self) -> &'static str {
        match self {
            CategoryKind::Standard => "standard_alarms",
            CategoryKind::Observance => "observance_alarms",
        }
    }

    pub fn id_base(&self) -> i64 {
        match self {
            CategoryKind::Standard => STANDARD_ID_BASE,
            CategoryKind::Observance => OBSERVANCE_ID_BASE,
        }
    }

    /// Resolve the owning table from the id range.
    pub fn for_id(id: i64) -> Self {
        if id >= STANDARD_ID_BASE {
            CategoryKind::Standard
        } else {
            CategoryKind::Observance
        }
    }

    /// The `category` column is a boolean flag: 1 = observance.
    pub fn to_db_flag(&self) -> bool {
        matches!(self, CategoryKind::Observance)
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKind::Standard => write!(f, "standard"),
            CategoryKind::Observance => write!(f, "observance"),
        }
    }
}

/// Category with its category-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Standard,
    Observance { icon: i64 },
}

impl Category {
    pub fn kind(&self) -> CategoryKind {
        match self {
            Category::Standard => CategoryKind::Standard,
            Category::Observance { .. } => CategoryKind::Observance,
        }
    }

    pub fn icon(&self) -> Option<i64> {
        match self {
            Category::Standard => None,
            Category::Observance { icon } => Some(*icon),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRecord {
    pub id: i64,              // ⇔ <table>.id (PK)
    pub category: Category,   // ⇔ <table>.category (+ icon for observances)
    pub enabled: bool,        // ⇔ <table>.enabled
    pub hour: u32,            // ⇔ <table>.hour (0-23)
    pub minute: u32,          // ⇔ <table>.minute (0-59)
    pub sound: String,        // ⇔ <table>.sound
    pub vibrate: bool,        // ⇔ <table>.vibrate
    pub label: String,        // ⇔ <table>.label
    pub repeat: RepeatSpec,   // ⇔ <table>.repeat + <table>.weekdays
}

impl AlarmRecord {
    /// New standard alarm, enabled, vibrating, ringing once.
    pub fn standard(id: i64, hour: u32, minute: u32, sound: &str) -> Self {
        Self {
            id,
            category: Category::Standard,
            enabled: true,
            hour,
            minute,
            sound: sound.to_string(),
            vibrate: true,
            label: String::new(),
            repeat: RepeatSpec::Once,
        }
    }

    pub fn kind(&self) -> CategoryKind {
        self.category.kind()
    }

    pub fn time_str(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// Title shown on the alert: the label, or a generic fallback.
    pub fn title(&self) -> String {
        if self.label.trim().is_empty() {
            match self.kind() {
                CategoryKind::Standard => format!("Alarm {}", self.time_str()),
                CategoryKind::Observance => format!("Observance #{}", self.id),
            }
        } else {
            self.label.clone()
        }
    }
}
