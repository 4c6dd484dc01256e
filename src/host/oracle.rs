//! Observance oracle backed by a YAML calendar:
//!
//! ```yaml
//! 2026-10-19: [1, 6]
//! 2026-10-25: [2]
//! ```

use crate::core::services::ObservanceOracle;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

pub struct CalendarFileOracle {
    path: PathBuf,
}

impl CalendarFileOracle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ObservanceOracle for CalendarFileOracle {
    /// A missing calendar means nothing is special.
    fn special_on(&self, date: NaiveDate) -> AppResult<BTreeSet<i64>> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let calendar: BTreeMap<String, Vec<i64>> = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Calendar(format!("{}: {}", self.path.display(), e)))?;

        let key = date.format("%Y-%m-%d").to_string();
        Ok(calendar
            .get(&key)
            .map(|codes| codes.iter().copied().collect())
            .unwrap_or_default())
    }
}
