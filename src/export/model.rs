use crate::core::coordinator::render_repeat_label;
use crate::models::alarm::AlarmRecord;
use crate::models::locale::Locale;
use crate::models::state::AlarmState;
use serde::Serialize;

/// Flat export row for one alarm.
#[derive(Serialize, Clone, Debug)]
pub struct AlarmExport {
    pub id: i64,
    pub category: String,
    pub enabled: bool,
    pub state: String,
    pub time: String,
    pub repeat: String,
    pub repeat_label: String,
    pub weekdays: u8,
    pub sound: String,
    pub vibrate: bool,
    pub label: String,
    pub icon: Option<i64>,
}

impl AlarmExport {
    pub fn from_record(r: &AlarmRecord, state: AlarmState, locale: Locale) -> Self {
        let (_, weekdays) = r.repeat.to_db();
        Self {
            id: r.id,
            category: r.kind().to_string(),
            enabled: r.enabled,
            state: state.to_string(),
            time: r.time_str(),
            repeat: r.repeat.to_string(),
            repeat_label: render_repeat_label(&r.repeat, locale),
            weekdays,
            sound: r.sound.clone(),
            vibrate: r.vibrate,
            label: r.label.clone(),
            icon: r.category.icon(),
        }
    }
}
