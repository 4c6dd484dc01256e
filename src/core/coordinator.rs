//! AlarmCoordinator: id allocation, create/update and repeat labels.

use crate::core::engine::{AlarmChange, Outcome, SchedulingEngine};
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::models::alarm::{AlarmRecord, CategoryKind};
use crate::models::locale::Locale;
use crate::models::repeat::RepeatSpec;

pub struct AlarmCoordinator<'a> {
    engine: &'a mut SchedulingEngine,
}

impl<'a> AlarmCoordinator<'a> {
    pub fn new(engine: &'a mut SchedulingEngine) -> Self {
        Self { engine }
    }

    /// Smallest free id at or above the category base.
    /// `None` only when the whole integer range is taken.
    pub fn allocate_id(&self, kind: CategoryKind) -> AppResult<Option<i64>> {
        let taken = self.engine.store().ids(kind)?;
        Ok((kind.id_base()..=i64::MAX).find(|id| !taken.contains(id)))
    }

    /// Insert or overwrite `record`, always leaving it enabled and armed.
    /// Existing alarms are restarted, new ones started.
    pub fn save(&mut self, mut record: AlarmRecord) -> AppResult<Outcome> {
        validate(&record)?;

        let existed = self.engine.store().contains(record.id)?;
        record.enabled = true;
        self.engine.store_mut().upsert(&record)?;

        let _ = ttlog(
            self.engine.store().conn(),
            "save",
            &format!("#{}", record.id),
            &format!(
                "{} {} {}",
                if existed { "updated" } else { "created" },
                record.time_str(),
                record.repeat
            ),
        );
        self.engine.notify(AlarmChange::Saved(record.id));

        Ok(self.engine.start(&record, existed))
    }

    /// Allocate an id for a new standard alarm and save it.
    pub fn create(&mut self, mut record: AlarmRecord) -> AppResult<(i64, Outcome)> {
        let id = self
            .allocate_id(record.kind())?
            .ok_or(AppError::IdsExhausted)?;
        record.id = id;
        let outcome = self.save(record)?;
        Ok((id, outcome))
    }
}

fn validate(record: &AlarmRecord) -> AppResult<()> {
    if record.hour > 23 || record.minute > 59 {
        return Err(AppError::InvalidTime(format!(
            "{:02}:{:02}",
            record.hour, record.minute
        )));
    }

    if let RepeatSpec::Custom(days) = &record.repeat
        && days.is_empty()
    {
        return Err(AppError::InvalidRepeat(
            "a custom repeat needs at least one weekday".into(),
        ));
    }

    // Only the observance calendar knows when an "every occurrence" is due
    if record.repeat == RepeatSpec::EveryOccurrence && record.kind() == CategoryKind::Standard {
        return Err(AppError::InvalidRepeat(
            "'every' is reserved for observance alarms".into(),
        ));
    }

    if CategoryKind::for_id(record.id) != record.kind() {
        return Err(AppError::InvalidCategory(record.id));
    }

    Ok(())
}

/// Human-readable repeat rule. Custom days always come out Sun→Sat.
pub fn render_repeat_label(repeat: &RepeatSpec, locale: Locale) -> String {
    match repeat {
        RepeatSpec::Once => locale.once().to_string(),
        RepeatSpec::Daily => locale.daily().to_string(),
        RepeatSpec::EveryOccurrence => locale.every_occurrence().to_string(),
        RepeatSpec::Custom(days) => days
            .iter()
            .map(|d| locale.weekday_abbr(d))
            .collect::<Vec<_>>()
            .join(" "),
    }
}
