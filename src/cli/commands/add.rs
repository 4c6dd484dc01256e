use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::coordinator::{AlarmCoordinator, render_repeat_label};
use crate::errors::{AppError, AppResult};
use crate::host::open_engine;
use crate::models::alarm::{AlarmRecord, CategoryKind};
use crate::models::repeat::RepeatSpec;
use crate::ui::messages::success;
use crate::utils::time::parse_required_time;
use chrono::{DateTime, Local, Timelike};

pub fn handle(cmd: &Commands, cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<()> {
    if let Commands::Add {
        time,
        repeat,
        sound,
        label,
        vibrate,
        no_vibrate,
        id,
    } = cmd
    {
        let t = parse_required_time(time)?;
        let repeat = repeat
            .as_deref()
            .map(|r| r.parse::<RepeatSpec>().map_err(AppError::InvalidRepeat))
            .transpose()?;

        let mut engine = open_engine(cfg, now)?;

        //
        // 1️⃣ Start from the stored alarm when updating
        //
        let mut record = match id {
            Some(id) => {
                if CategoryKind::for_id(*id) != CategoryKind::Standard {
                    return Err(AppError::InvalidCategory(*id));
                }
                engine
                    .store_mut()
                    .get(*id)?
                    .ok_or(AppError::AlarmNotFound(*id))?
            }
            None => AlarmRecord::standard(0, 0, 0, &cfg.default_sound),
        };

        //
        // 2️⃣ Apply the requested fields
        //
        record.hour = t.hour();
        record.minute = t.minute();
        // An update keeps the stored vibration unless a flag says otherwise
        if *no_vibrate {
            record.vibrate = false;
        } else if *vibrate || id.is_none() {
            record.vibrate = true;
        }
        if let Some(r) = repeat {
            record.repeat = r;
        }
        if let Some(s) = sound {
            record.sound = s.clone();
        }
        if let Some(l) = label {
            record.label = l.clone();
        }

        let repeat_label = render_repeat_label(&record.repeat, cfg.locale());

        //
        // 3️⃣ Save and arm
        //
        let mut coordinator = AlarmCoordinator::new(&mut engine);
        let (id, outcome) = match id {
            Some(id) => (*id, coordinator.save(record)?),
            None => coordinator.create(record)?,
        };

        super::report(outcome)?;
        success(format!("Alarm #{} set for {} ({})", id, t.format("%H:%M"), repeat_label));
    }

    Ok(())
}
