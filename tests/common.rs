#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, NaiveDate};
use ralarm::core::engine::{AlarmChange, Collaborators, SchedulingEngine};
use ralarm::core::services::{
    AlertAction, Clock, NotificationService, ObservanceOracle, RingtonePlayer, Vibrator,
    WakeTimerService,
};
use ralarm::core::sound::SoundManager;
use ralarm::db::initialize::init_db;
use ralarm::db::pool::DbPool;
use ralarm::db::store::AlarmStore;
use ralarm::errors::{AppError, AppResult};
use ralarm::utils::time::parse_local_datetime;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

// ------------------------------------------------
// CLI helpers
// ------------------------------------------------

/// Binary under test, isolated from the developer's own config and
/// pinned to UTC so `--now` instants are stable.
pub fn ral(home: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("ralarm");
    cmd.env("HOME", home).env("TZ", "UTC");
    cmd
}

/// Fresh temp HOME for one test (removed and recreated).
pub fn setup_home(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_ralarm_home", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp home");
    path.to_string_lossy().to_string()
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_ralarm.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Temp HOME plus an initialized database.
pub fn init_env(name: &str) -> (String, String) {
    let home = setup_home(name);
    let db = setup_test_db(name);
    ral(&home)
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success();
    (home, db)
}

// ------------------------------------------------
// Library helpers
// ------------------------------------------------

pub fn at(s: &str) -> DateTime<Local> {
    parse_local_datetime(s).expect("valid test instant")
}

pub fn memory_store() -> AlarmStore {
    let pool = DbPool::in_memory().expect("in-memory db");
    init_db(&pool.conn).expect("init db");
    AlarmStore::new(pool, "default")
}

#[derive(Default)]
pub struct TimerState {
    pub registered: BTreeMap<i64, i64>,
    pub fail_register: bool,
}

pub struct FakeTimers(pub Rc<RefCell<TimerState>>);

impl WakeTimerService for FakeTimers {
    fn register(&mut self, id: i64, fire_at_millis: i64, _exact: bool) -> AppResult<()> {
        let mut s = self.0.borrow_mut();
        if s.fail_register {
            return Err(AppError::Timer("refused".into()));
        }
        s.registered.insert(id, fire_at_millis);
        Ok(())
    }

    fn cancel(&mut self, id: i64) -> AppResult<()> {
        self.0.borrow_mut().registered.remove(&id);
        Ok(())
    }

    fn exists(&self, id: i64) -> bool {
        self.0.borrow().registered.contains_key(&id)
    }

    fn registered(&self) -> Vec<(i64, i64)> {
        self.0
            .borrow()
            .registered
            .iter()
            .map(|(id, at)| (*id, *at))
            .collect()
    }
}

#[derive(Default)]
pub struct NoteState {
    pub posted: BTreeMap<i64, (String, Vec<AlertAction>)>,
    pub full_screen: Vec<i64>,
}

pub struct FakeNotifier(pub Rc<RefCell<NoteState>>);

impl NotificationService for FakeNotifier {
    fn post(&mut self, id: i64, title: &str, _body: &str, actions: &[AlertAction]) -> AppResult<()> {
        self.0
            .borrow_mut()
            .posted
            .insert(id, (title.to_string(), actions.to_vec()));
        Ok(())
    }

    fn cancel(&mut self, id: i64) -> AppResult<()> {
        self.0.borrow_mut().posted.remove(&id);
        Ok(())
    }

    fn show_full_screen(&mut self, id: i64, _title: &str) -> AppResult<()> {
        self.0.borrow_mut().full_screen.push(id);
        Ok(())
    }
}

#[derive(Default)]
pub struct SoundState {
    pub playing: Option<String>,
    pub broken: BTreeSet<String>,
    pub stops: usize,
    pub vibrating: bool,
}

pub struct FakePlayer(pub Rc<RefCell<SoundState>>);

impl RingtonePlayer for FakePlayer {
    fn play(&mut self, sound: &str, _looping: bool) -> AppResult<()> {
        let mut s = self.0.borrow_mut();
        if s.broken.contains(sound) {
            return Err(AppError::Device(format!("cannot open {}", sound)));
        }
        s.playing = Some(sound.to_string());
        Ok(())
    }

    fn stop(&mut self) {
        let mut s = self.0.borrow_mut();
        s.playing = None;
        s.stops += 1;
    }
}

pub struct FakeVibrator(pub Rc<RefCell<SoundState>>);

impl Vibrator for FakeVibrator {
    fn vibrate(&mut self, _pattern: &[u64]) -> AppResult<()> {
        self.0.borrow_mut().vibrating = true;
        Ok(())
    }

    fn cancel(&mut self) {
        self.0.borrow_mut().vibrating = false;
    }
}

pub struct FakeOracle(pub Rc<RefCell<BTreeMap<NaiveDate, BTreeSet<i64>>>>);

impl ObservanceOracle for FakeOracle {
    fn special_on(&self, date: NaiveDate) -> AppResult<BTreeSet<i64>> {
        Ok(self.0.borrow().get(&date).cloned().unwrap_or_default())
    }
}

pub struct ManualClock(pub Rc<Cell<DateTime<Local>>>);

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.0.get()
    }
}

/// Engine on an in-memory store with every collaborator observable.
pub struct Harness {
    pub engine: SchedulingEngine,
    pub timers: Rc<RefCell<TimerState>>,
    pub notes: Rc<RefCell<NoteState>>,
    pub sound: Rc<RefCell<SoundState>>,
    pub special: Rc<RefCell<BTreeMap<NaiveDate, BTreeSet<i64>>>>,
    pub clock: Rc<Cell<DateTime<Local>>>,
    pub changes: Rc<RefCell<Vec<AlarmChange>>>,
}

impl Harness {
    pub fn new(now: &str) -> Self {
        let timers = Rc::new(RefCell::new(TimerState::default()));
        let notes = Rc::new(RefCell::new(NoteState::default()));
        let sound = Rc::new(RefCell::new(SoundState::default()));
        let special = Rc::new(RefCell::new(BTreeMap::new()));
        let clock = Rc::new(Cell::new(at(now)));
        let changes = Rc::new(RefCell::new(Vec::new()));

        let mut engine = SchedulingEngine::new(
            memory_store(),
            Collaborators {
                timers: Box::new(FakeTimers(timers.clone())),
                notifier: Box::new(FakeNotifier(notes.clone())),
                sound: SoundManager::new(
                    Box::new(FakePlayer(sound.clone())),
                    Box::new(FakeVibrator(sound.clone())),
                    "default",
                ),
                oracle: Box::new(FakeOracle(special.clone())),
                clock: Box::new(ManualClock(clock.clone())),
            },
        );

        let sink = changes.clone();
        engine.subscribe(move |c| sink.borrow_mut().push(*c));

        Self {
            engine,
            timers,
            notes,
            sound,
            special,
            clock,
            changes,
        }
    }

    pub fn set_now(&self, now: &str) {
        self.clock.set(at(now));
    }

    pub fn timer_at(&self, id: i64) -> Option<DateTime<Local>> {
        self.timers
            .borrow()
            .registered
            .get(&id)
            .and_then(|ms| ralarm::utils::time::from_millis(*ms))
    }

    pub fn mark_special(&self, date: &str, code: i64) {
        let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date");
        self.special.borrow_mut().entry(d).or_default().insert(code);
    }
}
