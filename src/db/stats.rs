use crate::db::pool::DbPool;
use crate::models::alarm::CategoryKind;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::time::format_millis;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) ALARMS PER CATEGORY
    //
    for kind in CategoryKind::ALL {
        let (total, enabled): (i64, i64) = pool.conn.query_row(
            &format!(
                "SELECT COUNT(*), COALESCE(SUM(enabled), 0) FROM {}",
                kind.table()
            ),
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        println!(
            "{}• {} alarms:{} {}{}{} ({} enabled)",
            CYAN, kind, RESET, GREEN, total, RESET, enabled
        );
    }

    //
    // 3) WAKE TIMERS
    //
    let timers: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM wake_timers", [], |row| row.get(0))?;
    println!("{}• Wake timers:{} {}{}{}", CYAN, RESET, GREEN, timers, RESET);

    let next: Option<(i64, i64)> = pool
        .conn
        .query_row(
            "SELECT id, fire_at FROM wake_timers ORDER BY fire_at ASC, id ASC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match next {
        Some((id, at)) => println!("{}• Next:{} #{} at {}", CYAN, RESET, id, format_millis(at)),
        None => println!("{}• Next:{} {}--{}", CYAN, RESET, GREY, RESET),
    }

    println!();
    Ok(())
}
