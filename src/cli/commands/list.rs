use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::coordinator::render_repeat_label;
use crate::errors::{AppError, AppResult};
use crate::export::AlarmExport;
use crate::host::open_engine;
use crate::models::alarm::CategoryKind;
use crate::ui::messages::info;
use crate::utils::colors::{GREY, color_for_enabled, color_for_state, paint};
use crate::utils::table::{Column, Table};
use crate::utils::time::format_millis;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

pub fn handle(cmd: &Commands, cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<()> {
    if let Commands::List {
        observances,
        all,
        json,
    } = cmd
    {
        let kinds: Vec<CategoryKind> = if *all {
            CategoryKind::ALL.to_vec()
        } else if *observances {
            vec![CategoryKind::Observance]
        } else {
            vec![CategoryKind::Standard]
        };

        let locale = cfg.locale();
        let mut engine = open_engine(cfg, now)?;
        let timers: BTreeMap<i64, i64> = engine.registered_timers().into_iter().collect();

        let mut records = Vec::new();
        for kind in &kinds {
            records.extend(engine.store_mut().list(*kind)?);
        }

        if *json {
            let rows: Vec<AlarmExport> = records
                .iter()
                .map(|r| AlarmExport::from_record(r, engine.state_of(r.id), locale))
                .collect();
            let out = serde_json::to_string_pretty(&rows)
                .map_err(|e| AppError::Other(format!("JSON: {}", e)))?;
            println!("{}", out);
            return Ok(());
        }

        if records.is_empty() {
            info("No alarms configured.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID", 4),
            Column::new("TIME", 5),
            Column::new("REPEAT", 8),
            Column::new("ON", 3),
            Column::new("STATE", 7),
            Column::new("NEXT", 16),
            Column::new("SOUND", 8),
            Column::new("LABEL", 10),
        ]);

        for r in &records {
            let state = engine.state_of(r.id).to_string();
            let next = timers
                .get(&r.id)
                .map(|at| format_millis(*at))
                .unwrap_or_else(|| paint(GREY, "--"));

            table.add_row(vec![
                r.id.to_string(),
                r.time_str(),
                render_repeat_label(&r.repeat, locale),
                paint(color_for_enabled(r.enabled), if r.enabled { "yes" } else { "no" }),
                paint(color_for_state(&state), &state),
                next,
                r.sound.clone(),
                r.title(),
            ]);
        }

        print!("{}", table.render());
    }

    Ok(())
}
