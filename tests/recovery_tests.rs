use ralarm::core::coordinator::AlarmCoordinator;
use ralarm::core::engine::Outcome;
use ralarm::core::recovery::{RecoveryManager, RecoveryTrigger};
use ralarm::models::alarm::AlarmRecord;
use ralarm::models::repeat::RepeatSpec;
use ralarm::models::state::AlarmState;

mod common;
use common::{Harness, at};

fn daily(id: i64, hour: u32, minute: u32) -> AlarmRecord {
    let mut r = AlarmRecord::standard(id, hour, minute, "chime");
    r.repeat = RepeatSpec::Daily;
    r
}

#[test]
fn replay_rearms_every_enabled_alarm_after_a_reboot() {
    let mut h = Harness::new("2026-10-19 06:00");
    {
        let mut c = AlarmCoordinator::new(&mut h.engine);
        c.save(daily(500, 7, 0)).unwrap();
        c.save(daily(501, 5, 0)).unwrap();
    }
    h.engine.stop(501);
    h.engine.store_mut().upsert(&daily(502, 8, 0)).unwrap();

    // Reboot wipes every registration
    h.timers.borrow_mut().registered.clear();
    h.set_now("2026-10-19 06:30");

    let report = RecoveryManager::replay(&mut h.engine, RecoveryTrigger::Boot);

    assert_eq!(report.failures(), 0);
    let replayed: Vec<i64> = report.replayed.iter().map(Outcome::id).collect();
    assert_eq!(replayed, vec![500, 502]);

    assert_eq!(h.timer_at(500), Some(at("2026-10-19 07:00")));
    assert_eq!(h.timer_at(502), Some(at("2026-10-19 08:00")));
    assert!(h.timer_at(501).is_none());
    assert_eq!(h.engine.state_of(502), AlarmState::Armed);
}

#[test]
fn clock_change_moves_timers_to_the_new_next_occurrence() {
    let mut h = Harness::new("2026-10-19 06:00");
    AlarmCoordinator::new(&mut h.engine)
        .save(daily(500, 7, 0))
        .unwrap();

    // Wall clock jumped past the alarm
    h.set_now("2026-10-19 09:00");
    RecoveryManager::replay(&mut h.engine, RecoveryTrigger::ClockChange);

    assert_eq!(h.timer_at(500), Some(at("2026-10-20 07:00")));
}

#[test]
fn stray_timers_are_cancelled_and_stale_states_reset() {
    let mut h = Harness::new("2026-10-19 06:00");
    AlarmCoordinator::new(&mut h.engine)
        .save(daily(500, 7, 0))
        .unwrap();

    // Disabled behind the engine's back, timer and state left over
    h.engine.store_mut().set_enabled(500, false).unwrap();
    h.timers.borrow_mut().registered.insert(900, 0);

    let report = RecoveryManager::replay(&mut h.engine, RecoveryTrigger::Boot);

    assert!(report.replayed.is_empty());
    assert_eq!(report.orphans_cancelled, vec![500, 900]);
    assert_eq!(report.reset, vec![500]);
    assert!(h.timers.borrow().registered.is_empty());
    assert_eq!(
        h.engine.store().state(500).unwrap(),
        Some(AlarmState::Idle)
    );
}

#[test]
fn replay_releases_an_alarm_left_ringing() {
    let mut h = Harness::new("2026-10-19 06:00");
    AlarmCoordinator::new(&mut h.engine)
        .save(daily(500, 7, 0))
        .unwrap();
    h.set_now("2026-10-19 07:00");
    h.engine.fire(500);

    h.set_now("2026-10-19 07:05");
    let report = RecoveryManager::replay(&mut h.engine, RecoveryTrigger::Boot);

    assert_eq!(
        report.replayed,
        vec![Outcome::Armed {
            id: 500,
            at: at("2026-10-20 07:00")
        }]
    );
    assert_eq!(h.engine.ringing(), None);
}
