//! AlarmStore: the durable alarm tables.
//!
//! One table per category, rows keyed by id. Every call runs its own short
//! transaction, nothing is held open between calls.

use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::alarm::{AlarmRecord, Category, CategoryKind};
use crate::models::observance::OBSERVANCES;
use crate::models::repeat::RepeatSpec;
use crate::models::state::AlarmState;
use crate::ui::messages::warning;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeSet;

pub struct AlarmStore {
    pool: DbPool,
    default_sound: String,
}

/// Map a row of either alarm table to an AlarmRecord.
pub fn map_row(kind: CategoryKind, row: &Row) -> rusqlite::Result<AlarmRecord> {
    let id: i64 = row.get("id")?;
    let repeat_code: i64 = row.get("repeat")?;
    let weekdays: u8 = row.get("weekdays")?;

    let repeat = RepeatSpec::from_db(repeat_code, weekdays).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            Box::new(AppError::InvalidRepeat(format!(
                "alarm #{}: repeat={} weekdays={}",
                id, repeat_code, weekdays
            ))),
        )
    })?;

    let category = match kind {
        CategoryKind::Standard => Category::Standard,
        CategoryKind::Observance => Category::Observance {
            icon: row.get("icon")?,
        },
    };

    Ok(AlarmRecord {
        id,
        category,
        enabled: row.get("enabled")?,
        hour: row.get("hour")?,
        minute: row.get("minute")?,
        sound: row.get("sound")?,
        vibrate: row.get("vibrate")?,
        label: row.get("label")?,
        repeat,
    })
}

fn write_record(conn: &Connection, record: &AlarmRecord) -> rusqlite::Result<()> {
    let (repeat, weekdays) = record.repeat.to_db();
    let kind = record.kind();

    match &record.category {
        Category::Standard => {
            conn.execute(
                &format!(
                    "INSERT INTO {} (id, category, enabled, hour, minute, sound, vibrate, repeat, label, weekdays)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                     ON CONFLICT(id) DO UPDATE SET
                        category = excluded.category, enabled = excluded.enabled,
                        hour = excluded.hour, minute = excluded.minute,
                        sound = excluded.sound, vibrate = excluded.vibrate,
                        repeat = excluded.repeat, label = excluded.label,
                        weekdays = excluded.weekdays",
                    kind.table()
                ),
                params![
                    record.id,
                    kind.to_db_flag(),
                    record.enabled,
                    record.hour,
                    record.minute,
                    record.sound,
                    record.vibrate,
                    repeat,
                    record.label,
                    weekdays,
                ],
            )?;
        }
        Category::Observance { icon } => {
            conn.execute(
                &format!(
                    "INSERT INTO {} (id, category, enabled, hour, minute, sound, vibrate, repeat, label, icon, weekdays)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                     ON CONFLICT(id) DO UPDATE SET
                        category = excluded.category, enabled = excluded.enabled,
                        hour = excluded.hour, minute = excluded.minute,
                        sound = excluded.sound, vibrate = excluded.vibrate,
                        repeat = excluded.repeat, label = excluded.label,
                        icon = excluded.icon, weekdays = excluded.weekdays",
                    kind.table()
                ),
                params![
                    record.id,
                    kind.to_db_flag(),
                    record.enabled,
                    record.hour,
                    record.minute,
                    record.sound,
                    record.vibrate,
                    repeat,
                    record.label,
                    icon,
                    weekdays,
                ],
            )?;
        }
    }
    Ok(())
}

impl AlarmStore {
    pub fn new(pool: DbPool, default_sound: &str) -> Self {
        Self {
            pool,
            default_sound: default_sound.to_string(),
        }
    }

    /// Raw connection, used for the audit log.
    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    /// All records of a category, ascending by hour then minute.
    /// Rows that cannot be decoded are reported and skipped.
    pub fn list(&mut self, kind: CategoryKind) -> AppResult<Vec<AlarmRecord>> {
        if kind == CategoryKind::Observance {
            self.ensure_observances_seeded()?;
        }

        let mut stmt = self.pool.conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY hour ASC, minute ASC, id ASC",
            kind.table()
        ))?;

        let rows = stmt.query_map([], |row| map_row(kind, row))?;

        let mut out = Vec::new();
        for r in rows {
            match r {
                Ok(record) => out.push(record),
                Err(e) => warning(format!("Skipping unreadable {} row: {}", kind, e)),
            }
        }
        Ok(out)
    }

    /// Ids currently present in a category table.
    pub fn ids(&self, kind: CategoryKind) -> AppResult<BTreeSet<i64>> {
        let mut stmt = self
            .pool
            .conn
            .prepare(&format!("SELECT id FROM {}", kind.table()))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<BTreeSet<i64>>>()?;
        Ok(ids)
    }

    pub fn get(&mut self, id: i64) -> AppResult<Option<AlarmRecord>> {
        let kind = CategoryKind::for_id(id);
        if kind == CategoryKind::Observance {
            self.ensure_observances_seeded()?;
        }

        let record = self
            .pool
            .conn
            .query_row(
                &format!("SELECT * FROM {} WHERE id = ?1", kind.table()),
                [id],
                |row| map_row(kind, row),
            )
            .optional()?;
        Ok(record)
    }

    /// Full overwrite, insert-or-replace by id. The persisted schedule
    /// state is left untouched on replace.
    pub fn upsert(&mut self, record: &AlarmRecord) -> AppResult<()> {
        if CategoryKind::for_id(record.id) != record.kind() {
            return Err(AppError::InvalidCategory(record.id));
        }

        let tx = self.pool.conn.transaction()?;
        write_record(&tx, record)?;
        tx.commit()?;
        Ok(())
    }

    /// Returns false when no row matched.
    pub fn set_enabled(&mut self, id: i64, enabled: bool) -> AppResult<bool> {
        let table = CategoryKind::for_id(id).table();
        let tx = self.pool.conn.transaction()?;
        let n = tx.execute(
            &format!("UPDATE {} SET enabled = ?1 WHERE id = ?2", table),
            params![enabled, id],
        )?;
        tx.commit()?;
        Ok(n > 0)
    }

    /// Returns false when no row matched.
    pub fn remove(&mut self, id: i64) -> AppResult<bool> {
        let table = CategoryKind::for_id(id).table();
        let tx = self.pool.conn.transaction()?;
        let n = tx.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
        tx.commit()?;
        Ok(n > 0)
    }

    pub fn contains(&self, id: i64) -> AppResult<bool> {
        let table = CategoryKind::for_id(id).table();
        let mut stmt = self
            .pool
            .conn
            .prepare(&format!("SELECT 1 FROM {} WHERE id = ?1", table))?;
        Ok(stmt.exists([id])?)
    }

    pub fn state(&self, id: i64) -> AppResult<Option<AlarmState>> {
        let table = CategoryKind::for_id(id).table();
        let raw: Option<String> = self
            .pool
            .conn
            .query_row(
                &format!("SELECT state FROM {} WHERE id = ?1", table),
                [id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(raw.map(|s| AlarmState::from_db_str(&s).unwrap_or_default()))
    }

    pub fn set_state(&mut self, id: i64, state: AlarmState) -> AppResult<()> {
        let table = CategoryKind::for_id(id).table();
        let tx = self.pool.conn.transaction()?;
        tx.execute(
            &format!("UPDATE {} SET state = ?1 WHERE id = ?2", table),
            params![state.to_db_str(), id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// The id persisted as ringing, if any.
    pub fn ringing(&self) -> AppResult<Option<i64>> {
        let id = self
            .pool
            .conn
            .query_row(
                "SELECT id FROM standard_alarms WHERE state = 'ringing'
                 UNION ALL
                 SELECT id FROM observance_alarms WHERE state = 'ringing'
                 LIMIT 1",
                [],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Seed one row per known observance when the table is incomplete.
    /// Existing rows are never touched.
    fn ensure_observances_seeded(&mut self) -> AppResult<usize> {
        let table = CategoryKind::Observance.table();
        let count: i64 =
            self.pool
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;

        if count as usize >= OBSERVANCES.len() {
            return Ok(0);
        }

        let tx = self.pool.conn.transaction()?;
        let mut inserted = 0;
        for obs in OBSERVANCES {
            let exists = tx
                .prepare_cached(&format!("SELECT 1 FROM {} WHERE id = ?1", table))?
                .exists([obs.code])?;
            if !exists {
                write_record(&tx, &obs.seed_record(&self.default_sound))?;
                inserted += 1;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }
}
