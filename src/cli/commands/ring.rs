use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::host::open_engine;
use crate::ui::messages::info;
use chrono::{DateTime, Local};

/// Wake timer delivery and the actions offered on a ringing alert.
pub fn handle(cmd: &Commands, cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<()> {
    let mut engine = open_engine(cfg, now)?;

    match cmd {
        Commands::Fire { id } => super::report(engine.fire(*id)),
        Commands::Snooze { id } => super::report(engine.snooze(*id)),
        Commands::Dismiss { id } => super::report(engine.dismiss(*id)),
        Commands::Tick => {
            let outcomes = engine.deliver_due();
            if outcomes.is_empty() {
                info("Nothing due.");
            }
            // One bad alarm must not hide the others
            for outcome in outcomes {
                println!("{}", outcome);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
