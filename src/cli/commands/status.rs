use crate::config::Config;
use crate::errors::AppResult;
use crate::host::open_engine;
use crate::ui::messages::info;
use crate::utils::colors::{CYAN, RESET, YELLOW};
use crate::utils::time::format_millis;
use chrono::{DateTime, Local};

pub fn handle(cfg: &Config, now: Option<DateTime<Local>>) -> AppResult<()> {
    let mut engine = open_engine(cfg, now)?;

    match engine.ringing() {
        Some(id) => {
            let title = engine
                .store_mut()
                .get(id)?
                .map(|r| r.title())
                .unwrap_or_default();
            println!("{}🔔 Ringing:{} {}#{} {}{}", CYAN, RESET, YELLOW, id, title, RESET);
        }
        None => println!("{}🔕 Nothing ringing{}", CYAN, RESET),
    }

    let timers = engine.registered_timers();
    if timers.is_empty() {
        info("No wake timers registered.");
        return Ok(());
    }

    println!("{}⏰ Wake timers:{}", CYAN, RESET);
    for (id, at) in timers {
        println!("   #{:<5} {}", id, format_millis(at));
    }

    Ok(())
}
