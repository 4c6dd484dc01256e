//! Catalogue of the observances the calendar oracle knows about.
//! Each event code doubles as the id of the matching reminder row.

use super::alarm::{AlarmRecord, Category};
use super::repeat::RepeatSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observance {
    pub code: i64,
    pub name: &'static str,
    pub icon: i64,
}

pub const OBSERVANCES: &[Observance] = &[
    Observance { code: 1, name: "Ekadashi", icon: 101 },
    Observance { code: 2, name: "Purnima", icon: 102 },
    Observance { code: 3, name: "Amavasya", icon: 103 },
    Observance { code: 4, name: "Sankashti Chaturthi", icon: 104 },
    Observance { code: 5, name: "Vinayaka Chaturthi", icon: 105 },
    Observance { code: 6, name: "Pradosh Vrat", icon: 106 },
    Observance { code: 7, name: "Masik Shivaratri", icon: 107 },
    Observance { code: 8, name: "Sankranti", icon: 108 },
    Observance { code: 9, name: "Masik Durgashtami", icon: 109 },
    Observance { code: 10, name: "Skanda Sashti", icon: 110 },
    Observance { code: 11, name: "Masik Janmashtami", icon: 111 },
    Observance { code: 12, name: "Kalashtami", icon: 112 },
];

/// Default reminder time for freshly seeded rows.
pub const SEED_HOUR: u32 = 6;
pub const SEED_MINUTE: u32 = 0;

pub fn find(code: i64) -> Option<&'static Observance> {
    OBSERVANCES.iter().find(|o| o.code == code)
}

impl Observance {
    /// Row inserted the first time the observance table is read.
    /// Seeded reminders start disabled until the operator opts in.
    pub fn seed_record(&self, sound: &str) -> AlarmRecord {
        AlarmRecord {
            id: self.code,
            category: Category::Observance { icon: self.icon },
            enabled: false,
            hour: SEED_HOUR,
            minute: SEED_MINUTE,
            sound: sound.to_string(),
            vibrate: true,
            label: self.name.to_string(),
            repeat: RepeatSpec::EveryOccurrence,
        }
    }
}
