use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::host::open_engine;
use crate::models::alarm::CategoryKind;
use crate::ui::messages::{info, warning};
use chrono::{DateTime, Local};
use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<()> {
    if let Commands::Del { id, force } = cmd {
        // Observance rows are fixed; switch them off instead
        if CategoryKind::for_id(*id) != CategoryKind::Standard {
            return Err(AppError::InvalidCategory(*id));
        }

        if !*force
            && !ask_confirmation(&format!(
                "Delete alarm #{}? This action is irreversible.",
                id
            ))
        {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut engine = open_engine(cfg, now)?;
        super::report(engine.delete(*id))?;
    }

    Ok(())
}
