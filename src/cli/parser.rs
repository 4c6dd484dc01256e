use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rAlarm
/// Personal alarm scheduler with standard and observance alarms on SQLite
#[derive(Parser)]
#[command(
    name = "ralarm",
    version = env!("CARGO_PKG_VERSION"),
    about = "A personal alarm scheduler: weekday alarms and observance reminders stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pin the clock to a local instant (YYYY-MM-DD HH:MM)
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", help = "Only the most recent N rows")]
        limit: Option<usize>,
    },

    /// Create a standard alarm, or update one with --id
    Add {
        /// Ring time (HH:MM, 24h)
        time: String,

        /// Repeat rule: once, daily, or weekdays such as mon,wed,fri
        #[arg(long, short = 'r')]
        repeat: Option<String>,

        /// Ringtone name or file path (default: config default_sound)
        #[arg(long)]
        sound: Option<String>,

        #[arg(long)]
        label: Option<String>,

        /// Vibrate while ringing (default for new alarms)
        #[arg(long, conflicts_with = "no_vibrate")]
        vibrate: bool,

        /// Ring without vibration
        #[arg(long = "no-vibrate")]
        no_vibrate: bool,

        /// Existing alarm id to update
        #[arg(long)]
        id: Option<i64>,
    },

    /// List alarms
    List {
        /// Show observance alarms instead of standard ones
        #[arg(long, conflicts_with = "all")]
        observances: bool,

        /// Show both categories
        #[arg(long)]
        all: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Switch an alarm on and arm it
    Enable { id: i64 },

    /// Switch an alarm off (no re-arm)
    Disable { id: i64 },

    /// Delete a standard alarm
    Del {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Deliver the wake timer callback for an alarm
    Fire { id: i64 },

    /// Silence a ringing alarm and ring again in ten minutes
    Snooze { id: i64 },

    /// Silence a ringing alarm
    Dismiss { id: i64 },

    /// Deliver every wake timer that is due
    Tick,

    /// Re-arm every enabled alarm (after reboot or a clock change)
    Recover,

    /// Run in the foreground and deliver alarms as they come due
    Watch {
        /// Stop after N polls
        #[arg(long)]
        iterations: Option<u64>,
    },

    /// Show the ringing alarm and the pending wake timers
    Status,

    /// Configure an observance reminder
    Observance {
        /// Observance code (1-12)
        code: i64,

        /// Ring time (HH:MM, 24h)
        #[arg(long)]
        time: Option<String>,

        #[arg(long)]
        sound: Option<String>,

        /// Switch the reminder on
        #[arg(long, conflicts_with = "off")]
        on: bool,

        /// Switch the reminder off
        #[arg(long)]
        off: bool,
    },

    /// Export alarms
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Only standard alarms (default: both categories)
        #[arg(long, conflicts_with = "observances")]
        standard: bool,

        /// Only observance alarms
        #[arg(long)]
        observances: bool,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        /// Destination file path
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Compress the backup as zip
        #[arg(long)]
        compress: bool,

        /// Overwrite without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}
