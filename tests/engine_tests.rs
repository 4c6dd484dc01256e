use chrono::Weekday;
use ralarm::core::coordinator::AlarmCoordinator;
use ralarm::core::engine::{AlarmChange, Outcome};
use ralarm::core::services::AlertAction;
use ralarm::core::sound::Playback;
use ralarm::db::log::load_log;
use ralarm::models::alarm::AlarmRecord;
use ralarm::models::repeat::RepeatSpec;
use ralarm::models::state::AlarmState;

mod common;
use common::{Harness, at};

fn daily(id: i64, hour: u32, minute: u32, sound: &str) -> AlarmRecord {
    let mut r = AlarmRecord::standard(id, hour, minute, sound);
    r.repeat = RepeatSpec::Daily;
    r
}

fn save(h: &mut Harness, record: AlarmRecord) -> Outcome {
    AlarmCoordinator::new(&mut h.engine)
        .save(record)
        .expect("save alarm")
}

#[test]
fn daily_alarm_rings_and_dismiss_rearms_next_day() {
    // Monday
    let mut h = Harness::new("2026-10-19 07:00");
    let armed = save(&mut h, daily(500, 7, 30, "chime"));
    assert_eq!(
        armed,
        Outcome::Armed {
            id: 500,
            at: at("2026-10-19 07:30")
        }
    );

    h.set_now("2026-10-19 07:30");
    let fired = h.engine.deliver_due();
    assert!(matches!(
        fired.as_slice(),
        [Outcome::Ringing { id: 500, .. }]
    ));
    assert_eq!(h.engine.state_of(500), AlarmState::Ringing);
    assert_eq!(h.sound.borrow().playing.as_deref(), Some("chime"));
    assert!(h.sound.borrow().vibrating);
    assert_eq!(
        h.notes.borrow().posted.get(&500).map(|(_, a)| a.clone()),
        Some(vec![AlertAction::Snooze, AlertAction::Dismiss])
    );
    assert_eq!(h.notes.borrow().full_screen, vec![500]);

    let dismissed = h.engine.dismiss(500);
    assert_eq!(
        dismissed,
        Outcome::Armed {
            id: 500,
            at: at("2026-10-20 07:30")
        }
    );
    assert_eq!(h.engine.state_of(500), AlarmState::Armed);
    assert!(h.sound.borrow().playing.is_none());
    assert!(!h.notes.borrow().posted.contains_key(&500));

    let stored = h.engine.store_mut().get(500).unwrap().unwrap();
    assert!(stored.enabled);
}

#[test]
fn custom_alarm_skips_a_day_it_does_not_cover() {
    // Tuesday
    let mut h = Harness::new("2026-10-20 07:00");
    let mut r = AlarmRecord::standard(500, 7, 30, "chime");
    r.repeat = "mon,wed".parse().unwrap();
    save(&mut h, r);

    h.set_now("2026-10-20 07:30");
    let out = h.engine.fire(500);

    assert_eq!(
        out,
        Outcome::Skipped {
            id: 500,
            at: at("2026-10-21 07:30")
        }
    );
    assert_eq!(h.timer_at(500), Some(at("2026-10-21 07:30")));
    assert_eq!(h.engine.state_of(500), AlarmState::Armed);
    assert!(h.sound.borrow().playing.is_none());
    assert!(h.notes.borrow().posted.is_empty());
}

#[test]
fn custom_alarm_rings_on_a_selected_day() {
    // Wednesday
    let mut h = Harness::new("2026-10-21 07:00");
    let mut r = AlarmRecord::standard(500, 7, 30, "chime");
    r.repeat = "mon,wed".parse().unwrap();
    save(&mut h, r);

    h.set_now("2026-10-21 07:30");
    assert!(matches!(h.engine.fire(500), Outcome::Ringing { id: 500, .. }));
}

#[test]
fn second_alarm_due_while_first_rings_is_deferred() {
    let mut h = Harness::new("2026-10-19 06:00");
    save(&mut h, daily(500, 7, 0, "first"));
    save(&mut h, daily(501, 7, 0, "second"));

    h.set_now("2026-10-19 07:00");
    let fired = h.engine.deliver_due();

    assert_eq!(fired.len(), 2);
    assert!(matches!(fired[0], Outcome::Ringing { id: 500, .. }));
    assert_eq!(
        fired[1],
        Outcome::Deferred {
            id: 501,
            at: at("2026-10-19 07:10"),
            ringing: 500
        }
    );

    // The first one keeps ringing untouched
    assert_eq!(h.engine.ringing(), Some(500));
    assert_eq!(h.sound.borrow().playing.as_deref(), Some("first"));
    assert_eq!(h.sound.borrow().stops, 0);
    assert_eq!(h.engine.state_of(501), AlarmState::Armed);

    h.engine.dismiss(500);
    h.set_now("2026-10-19 07:10");
    let fired = h.engine.deliver_due();
    assert!(matches!(
        fired.as_slice(),
        [Outcome::Ringing { id: 501, .. }]
    ));
    assert_eq!(h.sound.borrow().playing.as_deref(), Some("second"));
}

#[test]
fn stop_while_ringing_switches_a_daily_alarm_off() {
    let mut h = Harness::new("2026-10-19 07:00");
    save(&mut h, daily(500, 7, 30, "chime"));
    h.set_now("2026-10-19 07:30");
    h.engine.fire(500);

    let out = h.engine.stop(500);

    assert_eq!(out, Outcome::Idle { id: 500 });
    assert_eq!(h.engine.state_of(500), AlarmState::Idle);
    assert!(h.timer_at(500).is_none());
    assert!(h.sound.borrow().playing.is_none());
    assert!(!h.engine.store_mut().get(500).unwrap().unwrap().enabled);
    assert!(h.changes.borrow().contains(&AlarmChange::Disabled(500)));
}

#[test]
fn start_without_force_leaves_an_armed_alarm_alone() {
    let mut h = Harness::new("2026-10-19 07:00");
    let record = daily(500, 7, 30, "chime");
    save(&mut h, record.clone());

    h.set_now("2026-10-19 07:10");
    assert_eq!(
        h.engine.start(&record, false),
        Outcome::AlreadyArmed { id: 500 }
    );
    assert_eq!(h.timer_at(500), Some(at("2026-10-19 07:30")));

    assert_eq!(
        h.engine.start(&record, true),
        Outcome::Armed {
            id: 500,
            at: at("2026-10-19 07:30")
        }
    );
}

#[test]
fn armed_state_without_a_timer_reads_as_idle() {
    let mut h = Harness::new("2026-10-19 07:00");
    let record = daily(500, 7, 30, "chime");
    save(&mut h, record.clone());

    // Host lost its registration behind our back
    h.timers.borrow_mut().registered.clear();

    assert_eq!(h.engine.state_of(500), AlarmState::Idle);
    assert!(matches!(
        h.engine.start(&record, false),
        Outcome::Armed { id: 500, .. }
    ));
}

#[test]
fn start_past_todays_time_arms_tomorrow() {
    let mut h = Harness::new("2026-10-19 08:00");
    let out = save(&mut h, daily(500, 7, 30, "chime"));
    assert_eq!(out.fire_at(), Some(at("2026-10-20 07:30")));
}

#[test]
fn snooze_comes_back_in_ten_minutes() {
    let mut h = Harness::new("2026-10-19 07:00");
    save(&mut h, daily(500, 7, 30, "chime"));
    h.set_now("2026-10-19 07:30");
    h.engine.fire(500);

    h.set_now("2026-10-19 07:32");
    let out = h.engine.snooze(500);

    assert_eq!(
        out,
        Outcome::Armed {
            id: 500,
            at: at("2026-10-19 07:42")
        }
    );
    assert_eq!(h.engine.ringing(), None);
    assert!(h.sound.borrow().playing.is_none());
    assert!(!h.sound.borrow().vibrating);
}

#[test]
fn snoozing_a_one_shot_alarm_keeps_it_on() {
    let mut h = Harness::new("2026-10-19 07:00");
    save(&mut h, AlarmRecord::standard(500, 7, 30, "chime"));
    h.set_now("2026-10-19 07:30");
    assert!(matches!(h.engine.fire(500), Outcome::Ringing { .. }));

    h.set_now("2026-10-19 07:31");
    assert_eq!(
        h.engine.snooze(500),
        Outcome::Armed {
            id: 500,
            at: at("2026-10-19 07:41")
        }
    );
    assert_eq!(h.timer_at(500), Some(at("2026-10-19 07:41")));
    assert!(h.engine.store_mut().get(500).unwrap().unwrap().enabled);
    assert_eq!(h.engine.state_of(500), AlarmState::Armed);
}

#[test]
fn dismissing_a_weekday_alarm_rearms_the_next_day() {
    // Monday only
    let mut h = Harness::new("2026-10-19 07:00");
    let mut r = AlarmRecord::standard(500, 7, 30, "chime");
    r.repeat = RepeatSpec::Custom([Weekday::Mon].into_iter().collect());
    save(&mut h, r);

    h.set_now("2026-10-19 07:30");
    assert!(matches!(h.engine.fire(500), Outcome::Ringing { .. }));

    h.set_now("2026-10-19 07:35");
    assert_eq!(
        h.engine.dismiss(500),
        Outcome::Armed {
            id: 500,
            at: at("2026-10-20 07:30")
        }
    );
    assert!(h.engine.store_mut().get(500).unwrap().unwrap().enabled);
}

#[test]
fn dismissing_an_observance_keeps_it_on_for_the_next_day() {
    let mut h = Harness::new("2026-10-19 05:00");
    let record = h.engine.store_mut().get(4).unwrap().unwrap();
    save(&mut h, record);
    h.mark_special("2026-10-19", 4);

    h.set_now("2026-10-19 06:00");
    assert!(matches!(h.engine.fire(4), Outcome::Ringing { id: 4, .. }));

    h.set_now("2026-10-19 06:05");
    assert_eq!(
        h.engine.dismiss(4),
        Outcome::Armed {
            id: 4,
            at: at("2026-10-20 06:00")
        }
    );
    assert!(h.engine.store_mut().get(4).unwrap().unwrap().enabled);
    assert_eq!(h.engine.ringing(), None);
}

#[test]
fn dismiss_switches_a_one_shot_alarm_off() {
    let mut h = Harness::new("2026-10-19 07:00");
    save(&mut h, AlarmRecord::standard(500, 7, 30, "chime"));
    h.set_now("2026-10-19 07:30");
    assert!(matches!(h.engine.fire(500), Outcome::Ringing { .. }));

    assert_eq!(h.engine.dismiss(500), Outcome::Idle { id: 500 });
    assert!(h.timer_at(500).is_none());
    assert!(!h.engine.store_mut().get(500).unwrap().unwrap().enabled);
    assert!(h.changes.borrow().contains(&AlarmChange::Disabled(500)));
}

#[test]
fn unplayable_sound_falls_back_then_goes_silent() {
    let mut h = Harness::new("2026-10-19 07:00");
    save(&mut h, daily(500, 7, 30, "broken"));
    h.sound.borrow_mut().broken.insert("broken".into());

    h.set_now("2026-10-19 07:30");
    assert_eq!(
        h.engine.fire(500),
        Outcome::Ringing {
            id: 500,
            playback: Playback::Fallback("default".into())
        }
    );

    h.engine.dismiss(500);
    h.sound.borrow_mut().broken.insert("default".into());
    h.set_now("2026-10-20 07:30");
    assert_eq!(
        h.engine.fire(500),
        Outcome::Ringing {
            id: 500,
            playback: Playback::Silent
        }
    );
    assert_eq!(h.engine.state_of(500), AlarmState::Ringing);
}

#[test]
fn fire_for_unknown_or_disabled_alarm_drops_the_timer() {
    let mut h = Harness::new("2026-10-19 07:00");
    assert_eq!(h.engine.fire(777), Outcome::Missing { id: 777 });

    save(&mut h, daily(500, 7, 30, "chime"));
    h.engine.store_mut().set_enabled(500, false).unwrap();

    h.set_now("2026-10-19 07:30");
    assert_eq!(h.engine.fire(500), Outcome::Idle { id: 500 });
    assert!(h.timer_at(500).is_none());
    assert_eq!(h.engine.state_of(500), AlarmState::Idle);
    assert!(h.sound.borrow().playing.is_none());
}

#[test]
fn observance_rings_only_on_special_days() {
    let mut h = Harness::new("2026-10-19 05:00");
    let record = h.engine.store_mut().get(4).unwrap().unwrap();
    assert!(!record.enabled);

    assert_eq!(
        save(&mut h, record),
        Outcome::Armed {
            id: 4,
            at: at("2026-10-19 06:00")
        }
    );

    // Nothing special today: quietly re-armed
    h.set_now("2026-10-19 06:00");
    assert_eq!(
        h.engine.fire(4),
        Outcome::Skipped {
            id: 4,
            at: at("2026-10-20 06:00")
        }
    );

    h.mark_special("2026-10-20", 4);
    h.set_now("2026-10-20 06:00");
    assert!(matches!(h.engine.fire(4), Outcome::Ringing { id: 4, .. }));
    assert_eq!(
        h.notes.borrow().posted.get(&4).map(|(t, _)| t.clone()),
        Some("Sankashti Chaturthi".to_string())
    );
}

#[test]
fn refused_timer_registration_is_reported_not_raised() {
    let mut h = Harness::new("2026-10-19 07:00");
    h.timers.borrow_mut().fail_register = true;

    let out = save(&mut h, daily(500, 7, 30, "chime"));

    assert!(out.is_failure());
    assert_eq!(h.engine.state_of(500), AlarmState::Idle);

    let log = load_log(h.engine.store().conn(), None).unwrap();
    assert!(log.iter().any(|(_, op, _, _)| op == "fault"));
}

#[test]
fn delete_while_ringing_silences_and_removes() {
    let mut h = Harness::new("2026-10-19 07:00");
    save(&mut h, daily(500, 7, 30, "chime"));
    h.set_now("2026-10-19 07:30");
    h.engine.fire(500);

    assert_eq!(h.engine.delete(500), Outcome::Removed { id: 500 });
    assert!(!h.engine.store().contains(500).unwrap());
    assert!(h.timer_at(500).is_none());
    assert!(h.sound.borrow().playing.is_none());
    assert!(h.changes.borrow().contains(&AlarmChange::Removed(500)));

    assert_eq!(h.engine.delete(500), Outcome::Missing { id: 500 });
}

#[test]
fn transitions_are_written_to_the_audit_log() {
    let mut h = Harness::new("2026-10-19 07:00");
    save(&mut h, daily(500, 7, 30, "chime"));
    h.set_now("2026-10-19 07:30");
    h.engine.fire(500);
    h.engine.dismiss(500);

    let ops: Vec<String> = load_log(h.engine.store().conn(), None)
        .unwrap()
        .into_iter()
        .map(|(_, op, _, _)| op)
        .collect();

    for expected in ["save", "start", "ring", "dismiss"] {
        assert!(ops.iter().any(|op| op == expected), "missing {}", expected);
    }
}
