pub mod add;
pub mod backup;
pub mod config;
pub mod db;
pub mod del;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod observance;
pub mod recover;
pub mod ring;
pub mod status;
pub mod switch;

use crate::core::engine::Outcome;
use crate::errors::{AppError, AppResult};

/// Print an engine outcome; a missing alarm or a failure becomes the
/// command's error.
pub(crate) fn report(outcome: Outcome) -> AppResult<()> {
    match outcome {
        Outcome::Missing { id } => Err(AppError::AlarmNotFound(id)),
        Outcome::Failed { id, reason } => Err(AppError::Other(format!("alarm #{}: {}", id, reason))),
        other => {
            println!("{}", other);
            Ok(())
        }
    }
}
