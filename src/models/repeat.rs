//! Repeat rules for alarms and their two on-disk encodings.
//!
//! The `repeat` column keeps the historical integer codes: 7/8/9 for the
//! fixed rules and, for custom schedules, the selected weekday numbers
//! (Sun=0 … Sat=6) concatenated as decimal digits. That digit form cannot
//! represent a leading Sunday, so the authoritative copy of a custom
//! schedule lives in the `weekdays` bit-set column.

use chrono::Weekday;
use std::fmt;
use std::str::FromStr;

pub const REPEAT_ONCE: i64 = 7;
pub const REPEAT_DAILY: i64 = 8;
pub const REPEAT_EVERY_OCCURRENCE: i64 = 9;

/// Weekdays in canonical Sun→Sat order.
pub const CANONICAL_WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Weekday number with Sunday = 0.
pub fn weekday_number(day: Weekday) -> u32 {
    day.num_days_from_sunday()
}

pub fn weekday_from_number(n: u32) -> Option<Weekday> {
    CANONICAL_WEEK.get(n as usize).copied()
}

/// Set of weekdays stored as a bit mask (bit n = weekday n).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x7f)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << weekday_number(day);
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << weekday_number(day)) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the selected days Sun→Sat, whatever order they were added in.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        CANONICAL_WEEK.into_iter().filter(move |d| self.contains(*d))
    }

    /// Digit-concatenated code written to the legacy `repeat` column.
    pub fn to_legacy_code(self) -> i64 {
        self.iter()
            .fold(0_i64, |acc, d| acc * 10 + i64::from(weekday_number(d)))
    }

    /// Decode a legacy digit code. A Sunday that was the first digit is
    /// gone by the time the value reaches us and cannot be restored.
    pub fn from_legacy_code(code: i64) -> Option<Self> {
        if code < 0 {
            return None;
        }

        let mut set = WeekdaySet::EMPTY;
        for c in code.to_string().chars() {
            let n = c.to_digit(10)?;
            set.insert(weekday_from_number(n)?);
        }
        Some(set)
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for d in iter {
            set.insert(d);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatSpec {
    Once,
    Daily,
    EveryOccurrence,
    Custom(WeekdaySet),
}

impl RepeatSpec {
    /// Convert enum → DB columns (`repeat`, `weekdays`)
    pub fn to_db(&self) -> (i64, u8) {
        match self {
            RepeatSpec::Once => (REPEAT_ONCE, 0),
            RepeatSpec::Daily => (REPEAT_DAILY, 0),
            RepeatSpec::EveryOccurrence => (REPEAT_EVERY_OCCURRENCE, 0),
            RepeatSpec::Custom(days) => (days.to_legacy_code(), days.bits()),
        }
    }

    /// Convert DB columns → enum.
    /// The bit-set wins; the digit code is only consulted for legacy rows.
    pub fn from_db(repeat: i64, weekdays: u8) -> Option<Self> {
        match repeat {
            REPEAT_ONCE => Some(RepeatSpec::Once),
            REPEAT_DAILY => Some(RepeatSpec::Daily),
            REPEAT_EVERY_OCCURRENCE => Some(RepeatSpec::EveryOccurrence),
            _ if weekdays != 0 => Some(RepeatSpec::Custom(WeekdaySet::from_bits(weekdays))),
            code => WeekdaySet::from_legacy_code(code)
                .filter(|s| !s.is_empty())
                .map(RepeatSpec::Custom),
        }
    }

    /// Standard alarms ring on this weekday?
    pub fn rings_on(&self, day: Weekday) -> bool {
        match self {
            RepeatSpec::Once | RepeatSpec::Daily => true,
            RepeatSpec::Custom(days) => days.contains(day),
            RepeatSpec::EveryOccurrence => false,
        }
    }

    pub fn is_once(&self) -> bool {
        matches!(self, RepeatSpec::Once)
    }
}

impl FromStr for RepeatSpec {
    type Err = String;

    /// Accepts `once`, `daily`, `every`, or a comma separated list of days
    /// given either by name (`mon,wed`) or by number (`1,3`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "once" => return Ok(RepeatSpec::Once),
            "daily" => return Ok(RepeatSpec::Daily),
            "every" | "every-occurrence" => return Ok(RepeatSpec::EveryOccurrence),
            _ => {}
        }

        let mut set = WeekdaySet::EMPTY;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let day = match part.parse::<u32>() {
                Ok(n) => weekday_from_number(n),
                Err(_) => part.parse::<Weekday>().ok(),
            }
            .ok_or_else(|| format!("unknown weekday '{}'", part))?;
            set.insert(day);
        }

        if set.is_empty() {
            return Err(format!("'{}' selects no weekday", s));
        }
        Ok(RepeatSpec::Custom(set))
    }
}

impl fmt::Display for RepeatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatSpec::Once => write!(f, "once"),
            RepeatSpec::Daily => write!(f, "daily"),
            RepeatSpec::EveryOccurrence => write!(f, "every"),
            RepeatSpec::Custom(days) => {
                let names: Vec<String> = days
                    .iter()
                    .map(|d| d.to_string().to_lowercase())
                    .collect();
                write!(f, "{}", names.join(","))
            }
        }
    }
}
