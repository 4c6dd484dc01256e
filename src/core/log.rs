use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;

const MAX_OP_WIDTH: usize = 40;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// ANSI colour per audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "save" | "start" => Colour::Green,
        "delete" | "fault" => Colour::Red,
        "ring" => Colour::Yellow,
        "snooze" | "defer" | "skip" => Colour::Cyan,
        "dismiss" | "stop" => Colour::Blue,
        "recover" | "orphan" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        "backup" | "init" => Colour::White,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Print the audit log, oldest first.
    pub fn print_log(pool: &DbPool, limit: Option<usize>) -> AppResult<()> {
        let mut entries = load_log(&pool.conn, limit)?;
        entries.reverse();

        if entries.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]")
            .map_err(|e| crate::errors::AppError::Other(e.to_string()))?;

        let entries: Vec<(String, String, String, String)> = entries
            .into_iter()
            .map(|(raw_date, op, target, msg)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%F %T").to_string())
                    .unwrap_or(raw_date);
                (date, op, target, msg)
            })
            .collect();

        let date_w = entries.iter().map(|(d, _, _, _)| d.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (date, operation, target, message) in entries {
            let colored = if target.is_empty() {
                color_for_operation(&operation).paint(operation.as_str()).to_string()
            } else {
                format!(
                    "{} ({})",
                    color_for_operation(&operation).paint(operation.as_str()),
                    target
                )
            };

            let visible = strip_ansi(&ansi, &colored).chars().count();
            let padding = " ".repeat(MAX_OP_WIDTH.saturating_sub(visible));

            println!(
                "{:<date_w$} | {}{} => {}",
                date,
                colored,
                padding,
                message,
                date_w = date_w
            );
        }

        Ok(())
    }
}
