use crate::core::backup::zip_file;
use crate::models::alarm::CategoryKind;
use crate::models::repeat::{REPEAT_DAILY, REPEAT_EVERY_OCCURRENCE, REPEAT_ONCE, WeekdaySet};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, Error, OptionalExtension, Result, params};
use std::path::Path;

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create an alarm table with the current schema.
/// Only the observance table carries `icon`.
fn create_alarm_table(conn: &Connection, kind: CategoryKind) -> Result<()> {
    let icon_column = match kind {
        CategoryKind::Standard => "",
        CategoryKind::Observance => "icon      INTEGER NOT NULL DEFAULT 0,",
    };
    let table = kind.table();

    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id        INTEGER PRIMARY KEY,
            category  INTEGER NOT NULL DEFAULT 0,
            enabled   INTEGER NOT NULL DEFAULT 1,
            hour      INTEGER NOT NULL CHECK(hour BETWEEN 0 AND 23),
            minute    INTEGER NOT NULL CHECK(minute BETWEEN 0 AND 59),
            sound     TEXT NOT NULL DEFAULT '',
            vibrate   INTEGER NOT NULL DEFAULT 1,
            repeat    INTEGER NOT NULL DEFAULT {REPEAT_ONCE},
            label     TEXT NOT NULL DEFAULT '',
            {icon_column}
            weekdays  INTEGER NOT NULL DEFAULT 0,
            state     TEXT NOT NULL DEFAULT 'idle' CHECK(state IN ('idle','armed','ringing'))
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_time ON {table}(hour, minute);
        "#
    ))?;
    Ok(())
}

/// Host-side wake timer registrations (one per alarm id).
fn create_wake_timers_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS wake_timers (
            id       INTEGER PRIMARY KEY,
            fire_at  INTEGER NOT NULL,
            exact    INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_wake_timers_fire_at ON wake_timers(fire_at);
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![version, message],
    )?;
    Ok(())
}

fn is_legacy_table(conn: &Connection, kind: CategoryKind) -> Result<bool> {
    if !table_exists(conn, kind.table())? {
        return Ok(false);
    }
    Ok(!table_has_column(conn, kind.table(), "weekdays")?
        || !table_has_column(conn, kind.table(), "state")?)
}

/// Add the `weekdays` bit-set and the `state` column to a legacy alarm
/// table, then rebuild `weekdays` from the digit-encoded `repeat` values.
fn migrate_add_schedule_columns(conn: &Connection, kind: CategoryKind) -> Result<()> {
    let table = kind.table();
    let version = format!("20260301_0001_{}_schedule_columns", table);

    if migration_applied(conn, &version)? {
        return Ok(());
    }

    let added_weekdays = !table_has_column(conn, table, "weekdays")?;
    if added_weekdays {
        conn.execute(
            &format!("ALTER TABLE {table} ADD COLUMN weekdays INTEGER NOT NULL DEFAULT 0"),
            [],
        )
        .map_err(|e| {
            Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(format!("Failed to add 'weekdays' column to {}: {}", table, e)),
            )
        })?;
    }

    if !table_has_column(conn, table, "state")? {
        conn.execute(
            &format!("ALTER TABLE {table} ADD COLUMN state TEXT NOT NULL DEFAULT 'idle'"),
            [],
        )
        .map_err(|e| {
            Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(format!("Failed to add 'state' column to {}: {}", table, e)),
            )
        })?;
    }

    let mut rebuilt = 0;
    if added_weekdays {
        // Collect first, the statement must be dropped before updating
        let legacy: Vec<(i64, i64)> = {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, repeat FROM {table} WHERE repeat NOT IN (?1, ?2, ?3)"
            ))?;
            let rows = stmt.query_map(
                params![REPEAT_ONCE, REPEAT_DAILY, REPEAT_EVERY_OCCURRENCE],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            rows.collect::<Result<Vec<_>>>()?
        };

        for (id, code) in legacy {
            match WeekdaySet::from_legacy_code(code) {
                Some(days) if !days.is_empty() => {
                    conn.execute(
                        &format!("UPDATE {table} SET weekdays = ?1 WHERE id = ?2"),
                        params![days.bits(), id],
                    )?;
                    rebuilt += 1;
                }
                _ => warning(format!(
                    "Alarm #{} in {} has an unreadable repeat code {}; left as is.",
                    id, table, code
                )),
            }
        }
    }

    mark_applied(
        conn,
        &version,
        &format!("Added schedule columns to {} ({} custom rows rebuilt)", table, rebuilt),
    )?;

    success(format!(
        "Migration applied: {} → added 'weekdays'/'state' to {}",
        version, table
    ));

    Ok(())
}

fn backup_before_migration(db_path: &str) -> Result<()> {
    use chrono::Local;

    let backup_name = format!(
        "{}-backup_db_pre_schedule_state.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let src = Path::new(db_path);
    let backup_path = src
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&backup_name);

    zip_file(src, &backup_path, "database.sqlite")
        .map_err(|e| Error::ToSqlConversionFailure(Box::new(e)))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Called by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Detect legacy alarm tables (no explicit state / weekday bit-set)
    let mut legacy = Vec::new();
    for kind in CategoryKind::ALL {
        if is_legacy_table(conn, kind)? {
            legacy.push(kind);
        }
    }

    // 3) If legacy → perform PRE-MIGRATION BACKUP
    if !legacy.is_empty() {
        warning("Legacy alarm schema detected, creating a safety backup before migrating...");

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if !db_path.is_empty() {
            backup_before_migration(&db_path)?;
        } else {
            warning("Could not determine the database path, backup skipped.");
        }
    }

    // 4) Create missing tables, upgrade legacy ones
    for kind in CategoryKind::ALL {
        if legacy.contains(&kind) {
            migrate_add_schedule_columns(conn, kind)?;
            create_alarm_table(conn, kind)?; // indexes only, table exists
        } else if !table_exists(conn, kind.table())? {
            create_alarm_table(conn, kind)?;
            success(format!("Created {} table.", kind.table()));
        } else {
            create_alarm_table(conn, kind)?;
        }
    }

    create_wake_timers_table(conn)?;

    Ok(())
}
