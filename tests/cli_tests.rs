use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::Path;

mod common;
use common::{init_env, ral, temp_out};

#[test]
fn init_creates_the_database() {
    let (home, db) = init_env("cli_init");

    assert!(Path::new(&db).exists());

    ral(&home)
        .args(["--db", &db, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("standard alarms"))
        .stdout(contains("Wake timers"));
}

#[test]
fn daily_alarm_rings_and_dismiss_rearms_it() {
    let (home, db) = init_env("cli_daily");

    ral(&home)
        .args([
            "--db",
            &db,
            "--now",
            "2026-10-19 07:00",
            "add",
            "07:30",
            "--repeat",
            "daily",
            "--sound",
            "chime",
        ])
        .assert()
        .success()
        .stdout(contains("Alarm #500 armed for 2026-10-19 07:30"))
        .stdout(contains("Every day"));

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 07:30", "tick"])
        .assert()
        .success()
        .stdout(contains("Alarm #500 ringing"))
        .stdout(contains("chime"));

    ral(&home)
        .args(["--db", &db, "status"])
        .assert()
        .success()
        .stdout(contains("Ringing"))
        .stdout(contains("#500"));

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 07:31", "dismiss", "500"])
        .assert()
        .success()
        .stdout(contains("Alarm #500 armed for 2026-10-20 07:30"));

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 07:32", "list"])
        .assert()
        .success()
        .stdout(contains("07:30"))
        .stdout(contains("armed"))
        .stdout(contains("2026-10-20 07:30"));
}

#[test]
fn ringer_is_remembered_between_invocations() {
    let (home, db) = init_env("cli_defer");

    for time in ["07:00", "07:00"] {
        ral(&home)
            .args([
                "--db",
                &db,
                "--now",
                "2026-10-19 06:00",
                "add",
                time,
                "--repeat",
                "daily",
            ])
            .assert()
            .success();
    }

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 07:00", "tick"])
        .assert()
        .success()
        .stdout(contains("Alarm #500 ringing"))
        .stdout(contains(
            "Alarm #501 deferred to 2026-10-19 07:10: #500 is ringing",
        ));

    // New process, #500 still holds the speaker
    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 07:10", "fire", "501"])
        .assert()
        .success()
        .stdout(contains("deferred to 2026-10-19 07:20"));
}

#[test]
fn weekday_alarm_is_skipped_on_other_days() {
    let (home, db) = init_env("cli_custom");

    ral(&home)
        .args([
            "--db",
            &db,
            "--now",
            "2026-10-20 06:00",
            "add",
            "07:30",
            "--repeat",
            "mon,wed",
            "--label",
            "Swim",
        ])
        .assert()
        .success()
        .stdout(contains("Mon Wed"));

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-20 07:30", "fire", "500"])
        .assert()
        .success()
        .stdout(contains("not due today, re-armed for 2026-10-21 07:30"));
}

#[test]
fn editing_the_time_keeps_vibration_off() {
    let (home, db) = init_env("cli_edit_vibrate");

    ral(&home)
        .args([
            "--db",
            &db,
            "--now",
            "2026-10-19 06:00",
            "add",
            "07:00",
            "--no-vibrate",
        ])
        .assert()
        .success();

    ral(&home)
        .args([
            "--db",
            &db,
            "--now",
            "2026-10-19 06:00",
            "add",
            "07:15",
            "--id",
            "500",
        ])
        .assert()
        .success()
        .stdout(contains("Alarm #500 set for 07:15"));

    ral(&home)
        .args(["--db", &db, "list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"time\": \"07:15\""))
        .stdout(contains("\"vibrate\": false"));

    ral(&home)
        .args([
            "--db",
            &db,
            "--now",
            "2026-10-19 06:00",
            "add",
            "07:15",
            "--id",
            "500",
            "--vibrate",
        ])
        .assert()
        .success();

    ral(&home)
        .args(["--db", &db, "list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"vibrate\": true"));
}

#[test]
fn disable_and_delete() {
    let (home, db) = init_env("cli_disable");

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 06:00", "add", "07:00"])
        .assert()
        .success();

    ral(&home)
        .args(["--db", &db, "disable", "500"])
        .assert()
        .success()
        .stdout(contains("Alarm #500 is off"));

    ral(&home)
        .args(["--db", &db, "list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"enabled\": false"))
        .stdout(contains("\"state\": \"idle\""));

    ral(&home)
        .args(["--db", &db, "del", "500", "--force"])
        .assert()
        .success()
        .stdout(contains("Alarm #500 deleted"));

    ral(&home)
        .args(["--db", &db, "del", "500", "--force"])
        .assert()
        .failure()
        .stderr(contains("Alarm #500 not found"));
}

#[test]
fn observance_rings_on_calendar_days_only() {
    let (home, db) = init_env("cli_observance");

    let calendar = Path::new(&home).join(".ralarm").join("observances.yaml");
    fs::write(&calendar, "\"2026-10-19\": [4]\n").unwrap();

    ral(&home)
        .args([
            "--db",
            &db,
            "--now",
            "2026-10-19 05:00",
            "observance",
            "4",
            "--time",
            "05:30",
            "--on",
        ])
        .assert()
        .success()
        .stdout(contains("Alarm #4 armed for 2026-10-19 05:30"));

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 05:30", "tick"])
        .assert()
        .success()
        .stdout(contains("Alarm #4 ringing"))
        .stdout(contains("SANKASHTI CHATURTHI"));

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 05:35", "dismiss", "4"])
        .assert()
        .success()
        .stdout(contains("Alarm #4 armed for 2026-10-20 05:30"));

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-20 05:30", "tick"])
        .assert()
        .success()
        .stdout(contains("not due today"));
}

#[test]
fn observances_are_listed_switched_off() {
    let (home, db) = init_env("cli_obs_list");

    ral(&home)
        .args(["--db", &db, "list", "--observances"])
        .assert()
        .success()
        .stdout(contains("Ekadashi"))
        .stdout(contains("Kalashtami"))
        .stdout(contains("Every occurrence"));
}

#[test]
fn recover_replays_enabled_alarms() {
    let (home, db) = init_env("cli_recover");

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 06:00", "add", "07:00"])
        .assert()
        .success();

    ral(&home)
        .args(["--db", &db, "--now", "2026-10-19 08:00", "recover"])
        .assert()
        .success()
        .stdout(contains("Alarm #500 armed for 2026-10-20 07:00"))
        .stdout(contains("1 alarm(s) replayed"));

    ral(&home)
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("recover"))
        .stdout(contains("save"));
}

#[test]
fn export_json_writes_every_alarm() {
    let (home, db) = init_env("cli_export");
    let out = temp_out("cli_export", "json");

    ral(&home)
        .args([
            "--db",
            &db,
            "--now",
            "2026-10-19 06:00",
            "add",
            "06:45",
            "--repeat",
            "sun,sat",
        ])
        .assert()
        .success();

    ral(&home)
        .args([
            "--db", &db, "export", "--format", "json", "--file", &out, "--force",
        ])
        .assert()
        .success()
        .stdout(contains("export completed"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("\"id\": 500"));
    assert!(content.contains("\"repeat\": \"sun,sat\""));
    assert!(content.contains("\"category\": \"observance\""));
}

#[test]
fn backup_copies_the_database() {
    let (home, db) = init_env("cli_backup");
    let out = temp_out("cli_backup", "sqlite");

    ral(&home)
        .args(["--db", &db, "backup", "--file", &out, "--force"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(Path::new(&out).exists());
}

#[test]
fn invalid_input_is_rejected() {
    let (home, db) = init_env("cli_invalid");

    ral(&home)
        .args(["--db", &db, "add", "25:00"])
        .assert()
        .failure()
        .stderr(contains("Invalid time format"));

    ral(&home)
        .args(["--db", &db, "add", "07:00", "--repeat", "funday"])
        .assert()
        .failure()
        .stderr(contains("Invalid repeat").and(contains("funday")));

    ral(&home)
        .args(["--db", &db, "add", "07:00", "--repeat", "every"])
        .assert()
        .failure()
        .stderr(contains("reserved for observance alarms"));

    ral(&home)
        .args(["--db", &db, "observance", "42", "--on"])
        .assert()
        .failure();
}
