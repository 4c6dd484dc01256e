//! rAlarm main entrypoint.

use ralarm::run;
use ralarm::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
