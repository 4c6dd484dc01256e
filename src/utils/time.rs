//! Time utilities: parsing HH:MM, next-fire computation, instant formatting.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Days, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

pub fn parse_required_time(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

/// Parse `YYYY-MM-DD HH:MM` (or with a `T` separator) as local wall time.
pub fn parse_local_datetime(s: &str) -> AppResult<DateTime<Local>> {
    let s = s.trim();
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| AppError::InvalidTime(s.to_string()))?;
    Ok(local_instant(naive))
}

/// Resolve a local wall-clock time to an instant. Ambiguous times (DST
/// fall-back) take the earlier instant; skipped times (DST spring-forward)
/// move one hour later.
pub fn local_instant(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(early, _) => early,
        LocalResult::None => {
            let shifted = naive + chrono::Duration::hours(1);
            Local
                .from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| Local.from_utc_datetime(&naive))
        }
    }
}

/// Next instant at `hour:minute` strictly after `now`: today if still
/// ahead, otherwise the following day.
pub fn next_occurrence(hour: u32, minute: u32, now: DateTime<Local>) -> AppResult<DateTime<Local>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::InvalidTime(format!("{:02}:{:02}", hour, minute)))?;

    let today = now.date_naive();
    let candidate = local_instant(today.and_time(time));
    if candidate > now {
        return Ok(candidate);
    }

    let tomorrow = today
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::InvalidTime(format!("no day after {}", today)))?;
    Ok(local_instant(tomorrow.and_time(time)))
}

pub fn from_millis(millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(millis).single()
}

pub fn format_instant(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_millis(millis: i64) -> String {
    from_millis(millis)
        .map(|at| format_instant(&at))
        .unwrap_or_else(|| format!("@{}ms", millis))
}
