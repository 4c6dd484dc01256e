//! Wake timer registrations kept in the `wake_timers` table, so they
//! outlive the process that armed them.

use crate::core::services::WakeTimerService;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use rusqlite::params;

pub struct SqliteWakeTimers {
    pool: DbPool,
}

impl SqliteWakeTimers {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl WakeTimerService for SqliteWakeTimers {
    fn register(&mut self, id: i64, fire_at_millis: i64, exact: bool) -> AppResult<()> {
        self.pool
            .conn
            .execute(
                "INSERT INTO wake_timers (id, fire_at, exact) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET fire_at = excluded.fire_at, exact = excluded.exact",
                params![id, fire_at_millis, exact],
            )
            .map_err(|e| AppError::Timer(format!("register #{}: {}", id, e)))?;
        Ok(())
    }

    fn cancel(&mut self, id: i64) -> AppResult<()> {
        self.pool
            .conn
            .execute("DELETE FROM wake_timers WHERE id = ?1", [id])
            .map_err(|e| AppError::Timer(format!("cancel #{}: {}", id, e)))?;
        Ok(())
    }

    fn exists(&self, id: i64) -> bool {
        let found = self
            .pool
            .conn
            .prepare_cached("SELECT 1 FROM wake_timers WHERE id = ?1")
            .and_then(|mut stmt| stmt.exists([id]));

        match found {
            Ok(found) => found,
            Err(e) => {
                warning(format!("Wake timer lookup for #{} failed: {}", id, e));
                false
            }
        }
    }

    fn registered(&self) -> Vec<(i64, i64)> {
        let rows = self
            .pool
            .conn
            .prepare("SELECT id, fire_at FROM wake_timers ORDER BY fire_at ASC, id ASC")
            .and_then(|mut stmt| {
                let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
                rows.collect::<rusqlite::Result<Vec<(i64, i64)>>>()
            });

        rows.unwrap_or_else(|e| {
            warning(format!("Cannot read wake timers: {}", e));
            Vec::new()
        })
    }
}
