use crate::errors::AppError;
use chrono::Weekday;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    It,
}

impl Locale {
    pub fn once(&self) -> &'static str {
        match self {
            Locale::En => "Once",
            Locale::It => "Una volta",
        }
    }

    pub fn daily(&self) -> &'static str {
        match self {
            Locale::En => "Every day",
            Locale::It => "Ogni giorno",
        }
    }

    pub fn every_occurrence(&self) -> &'static str {
        match self {
            Locale::En => "Every occurrence",
            Locale::It => "Ogni ricorrenza",
        }
    }

    pub fn weekday_abbr(&self, day: Weekday) -> &'static str {
        match (self, day) {
            (Locale::En, Weekday::Sun) => "Sun",
            (Locale::En, Weekday::Mon) => "Mon",
            (Locale::En, Weekday::Tue) => "Tue",
            (Locale::En, Weekday::Wed) => "Wed",
            (Locale::En, Weekday::Thu) => "Thu",
            (Locale::En, Weekday::Fri) => "Fri",
            (Locale::En, Weekday::Sat) => "Sat",
            (Locale::It, Weekday::Sun) => "Dom",
            (Locale::It, Weekday::Mon) => "Lun",
            (Locale::It, Weekday::Tue) => "Mar",
            (Locale::It, Weekday::Wed) => "Mer",
            (Locale::It, Weekday::Thu) => "Gio",
            (Locale::It, Weekday::Fri) => "Ven",
            (Locale::It, Weekday::Sat) => "Sab",
        }
    }
}

impl FromStr for Locale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            "it" | "it-it" | "italiano" => Ok(Locale::It),
            other => Err(AppError::InvalidLocale(other.to_string())),
        }
    }
}
