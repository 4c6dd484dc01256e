/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Enabled alarms in green, disabled ones greyed out.
pub fn color_for_enabled(enabled: bool) -> &'static str {
    if enabled { GREEN } else { GREY }
}

/// Ringing stands out, idle fades.
pub fn color_for_state(state: &str) -> &'static str {
    match state {
        "ringing" => YELLOW,
        "armed" => GREEN,
        _ => GREY,
    }
}

pub fn paint(color: &str, value: &str) -> String {
    format!("{color}{value}{RESET}")
}
