//! Unified application error type.
//! Store, coordinator, config and CLI layers all return AppError so the
//! error handling stays consistent. The scheduling engine never lets one
//! escape: it logs and reports an `Outcome` instead.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid repeat specification: {0}")]
    InvalidRepeat(String),

    #[error("Invalid category for alarm #{0}")]
    InvalidCategory(i64),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    // ---------------------------
    // Alarm logic errors
    // ---------------------------
    #[error("Alarm #{0} not found")]
    AlarmNotFound(i64),

    #[error("No free alarm id left in the reserved range")]
    IdsExhausted,

    // ---------------------------
    // Host collaborators
    // ---------------------------
    #[error("Wake timer error: {0}")]
    Timer(String),

    #[error("Device error: {0}")]
    Device(String),

    #[error("Observance calendar error: {0}")]
    Calendar(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
