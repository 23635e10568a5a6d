use anyhow::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use westtek::app_state::{Phase, StopReason};
use westtek::automation::timing::{Clock, Timings};
use westtek::automation::{Command, Platform, Variant};
use westtek::config_file::{ConfigStore, Profiles};
use westtek::input::{InputSink, ProcessProbe};
use westtek::utils::keycode::{parse_key_name, KeyTarget};
use westtek::WestTekCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Press(KeyTarget),
    Release(KeyTarget),
}

type Log = Arc<Mutex<Vec<Event>>>;

struct RecordingSink {
    log: Log,
    fail_presses: bool,
}

impl InputSink for RecordingSink {
    fn press(&mut self, target: KeyTarget) -> Result<()> {
        if self.fail_presses {
            anyhow::bail!("input system unavailable");
        }
        self.log.lock().push(Event::Press(target));
        Ok(())
    }

    fn release(&mut self, target: KeyTarget) -> Result<()> {
        self.log.lock().push(Event::Release(target));
        Ok(())
    }
}

/// Reports the process as running for the first `checks` queries
struct CountingProbe {
    checks: AtomicUsize,
    asked: Mutex<Vec<String>>,
}

impl CountingProbe {
    fn new(checks: usize) -> Arc<Self> {
        Arc::new(Self {
            checks: AtomicUsize::new(checks),
            asked: Mutex::new(Vec::new()),
        })
    }
}

impl ProcessProbe for CountingProbe {
    fn is_running(&self, name: &str) -> bool {
        self.asked.lock().push(name.to_string());
        self.checks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

struct FixedClock(AtomicU32);

impl Clock for FixedClock {
    fn second_of_minute(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

struct Harness {
    _dir: TempDir,
    core: WestTekCore,
    log: Log,
    probe: Arc<CountingProbe>,
    clock: Arc<FixedClock>,
}

fn fast_profiles() -> Profiles {
    let mut profiles = Profiles::default();
    for elevator in [&mut profiles.primary, &mut profiles.timed_run] {
        elevator.shots = 2;
        elevator.shot_min_time = 1;
        elevator.shot_max_time = 2;
        elevator.shot_wait_min = 1;
        elevator.shot_wait_max = 2;
        elevator.quick_min_time = 1;
        elevator.quick_max_time = 2;
        elevator.load_screen_min = 1;
        elevator.load_screen_max = 2;
        elevator.wait_time = 0;
    }
    profiles.alt.walk_min_time = 1;
    profiles.alt.walk_max_time = 2;
    profiles.alt.sleep_min_time = 1;
    profiles.alt.sleep_max_time = 2;
    profiles.alt.walk_cycles = 2;
    profiles.alt.action_cycles = 3;
    profiles.alt.action_press_time = 1;
    profiles.alt.wait_time = 0;
    profiles
}

fn harness(profiles: &Profiles, process_checks: usize, second: u32, fail_presses: bool) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path());
    store.save_profiles(profiles).unwrap();

    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let probe = CountingProbe::new(process_checks);
    let clock = Arc::new(FixedClock(AtomicU32::new(second)));

    let sink_log = log.clone();
    let platform = Platform {
        sink: Arc::new(move || -> Result<Box<dyn InputSink>> {
            Ok(Box::new(RecordingSink {
                log: sink_log.clone(),
                fail_presses,
            }))
        }),
        probe: probe.clone(),
        clock: clock.clone(),
    };

    let mut core = WestTekCore::new(store, platform)
        .unwrap()
        .with_timings(Timings::instant());
    core.set_process_override(None);

    Harness {
        _dir: dir,
        core,
        log,
        probe,
        clock,
    }
}

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

fn wait_for_finish(core: &mut WestTekCore) -> StopReason {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(reason) = core.reap() {
            return reason;
        }
        assert!(Instant::now() < deadline, "worker did not finish");
        thread::sleep(Duration::from_millis(2));
    }
}

fn key(name: &str) -> KeyTarget {
    parse_key_name(name).unwrap()
}

/// Presses minus releases per key; all zero means nothing is left held
fn held_keys(events: &[Event]) -> Vec<KeyTarget> {
    let mut balance: HashMap<KeyTarget, i64> = HashMap::new();
    for event in events {
        match event {
            Event::Press(k) => *balance.entry(*k).or_default() += 1,
            Event::Release(k) => *balance.entry(*k).or_default() -= 1,
        }
    }
    balance
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(k, _)| k)
        .collect()
}

fn tap(name: &str) -> [Event; 2] {
    [Event::Press(key(name)), Event::Release(key(name))]
}

fn elevator_opening(shots: usize) -> Vec<Event> {
    let mut expected = Vec::new();
    for _ in 0..shots {
        expected.extend(tap("left mouse"));
    }
    expected.extend(tap("numpad1"));
    expected.extend(tap("numpad2"));
    for _ in 0..4 {
        expected.push(Event::Press(key("d")));
        expected.push(Event::Press(key("left shift")));
        expected.push(Event::Release(key("d")));
        expected.push(Event::Release(key("left shift")));
    }
    expected.extend(tap("left ctrl"));
    expected
}

#[test]
fn test_absent_process_emits_nothing() {
    for variant in Variant::ALL {
        let mut h = harness(&fast_profiles(), 0, 1, false);
        h.core.select_variant(variant).unwrap();

        assert!(h.core.start().unwrap());
        let reason = wait_for_finish(&mut h.core);

        assert_eq!(reason, StopReason::ProcessMissing, "{:?}", variant);
        assert!(h.log.lock().is_empty(), "{:?} emitted input", variant);
        assert_eq!(h.core.state.phase(), Phase::Idle);
        assert_eq!(h.core.state.last_stop(), Some(StopReason::ProcessMissing));
    }
}

#[test]
fn test_status_snapshot_changes_when_worker_reaped() {
    let mut h = harness(&fast_profiles(), 0, 1, false);
    h.core.select_variant(Variant::TimedRun).unwrap();
    assert!(h.core.start().unwrap());

    let state = h.core.state.clone();
    assert!(wait_until(Duration::from_secs(5), || {
        state.last_stop() == Some(StopReason::ProcessMissing)
    }));
    let before_reap = h.core.status_snapshot();
    assert!(before_reap.1, "worker not reaped yet");

    wait_for_finish(&mut h.core);
    let after_reap = h.core.status_snapshot();

    assert_eq!(before_reap.0, after_reap.0);
    assert_ne!(before_reap, after_reap);
    assert!(!after_reap.1);
}

#[test]
fn test_timed_run_cycle_sequence() {
    // entry, cycle start and the reset check pass; the next cycle's check fails
    let mut h = harness(&fast_profiles(), 3, 30, false);
    h.core.select_variant(Variant::TimedRun).unwrap();

    h.core.start().unwrap();
    assert_eq!(wait_for_finish(&mut h.core), StopReason::ProcessMissing);

    let mut expected = elevator_opening(2);
    expected.extend(tap("numpad1"));
    expected.extend(tap("numpad2"));
    expected.extend(tap("e"));

    assert_eq!(*h.log.lock(), expected);
    assert_eq!(h.core.state.cycles_completed(), 1);
}

#[test]
fn test_primary_cycle_sequence() {
    let mut h = harness(&fast_profiles(), 3, 1, false);
    h.core.select_variant(Variant::Primary).unwrap();

    h.core.start().unwrap();
    assert_eq!(wait_for_finish(&mut h.core), StopReason::ProcessMissing);

    let mut expected = elevator_opening(2);
    expected.extend(tap("e"));
    expected.extend(tap("numpad1"));
    expected.extend(tap("numpad2"));

    assert_eq!(*h.log.lock(), expected);
    assert_eq!(h.core.state.cycles_completed(), 1);
}

#[test]
fn test_alt_cycle_sequence() {
    // entry and one cycle start pass
    let mut h = harness(&fast_profiles(), 2, 1, false);
    h.core.select_variant(Variant::Alt).unwrap();

    h.core.start().unwrap();
    assert_eq!(wait_for_finish(&mut h.core), StopReason::ProcessMissing);

    let mut expected = Vec::new();
    for _ in 0..2 {
        expected.push(Event::Press(key("s")));
        expected.push(Event::Press(key("d")));
        expected.push(Event::Release(key("s")));
        expected.push(Event::Release(key("d")));
    }
    for _ in 0..3 {
        expected.extend(tap("e"));
    }

    assert_eq!(*h.log.lock(), expected);
}

#[test]
fn test_countdown_holds_until_sync_second() {
    let mut h = harness(&fast_profiles(), usize::MAX, 30, false);
    h.core.select_variant(Variant::Primary).unwrap();
    h.core.start().unwrap();

    assert!(wait_until(Duration::from_secs(2), || {
        h.core.state.countdown_remaining() == Some(30)
    }));
    assert_eq!(h.core.state.phase(), Phase::Countdown);
    assert!(h.log.lock().is_empty());

    // Reaching second 01 releases the run
    h.clock.0.store(1, Ordering::SeqCst);
    assert!(wait_until(Duration::from_secs(2), || !h.log.lock().is_empty()));

    assert_eq!(h.core.stop(), Some(StopReason::Requested));
}

#[test]
fn test_stop_during_countdown() {
    let mut h = harness(&fast_profiles(), usize::MAX, 45, false);
    h.core.select_variant(Variant::Alt).unwrap();
    h.core.start().unwrap();
    assert!(wait_until(Duration::from_secs(2), || {
        h.core.state.phase() == Phase::Countdown
    }));

    assert_eq!(h.core.stop(), Some(StopReason::Requested));
    assert!(h.log.lock().is_empty());
    assert_eq!(h.core.state.phase(), Phase::Idle);
}

#[test]
fn test_stop_halts_emission_promptly() {
    let mut profiles = fast_profiles();
    profiles.timed_run.wait_time = 60_000;
    let mut h = harness(&profiles, usize::MAX, 1, false);
    h.core.select_variant(Variant::TimedRun).unwrap();
    h.core.start().unwrap();

    assert!(wait_until(Duration::from_secs(2), || {
        h.core.state.phase() == Phase::Waiting
    }));

    let started = Instant::now();
    assert_eq!(h.core.stop(), Some(StopReason::Requested));
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "stop took {:?}",
        started.elapsed()
    );

    let emitted = h.log.lock().len();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(h.log.lock().len(), emitted, "input after stop");
    assert!(held_keys(&h.log.lock()).is_empty());
}

#[test]
fn test_stop_releases_held_keys() {
    let mut profiles = fast_profiles();
    profiles.timed_run.shot_min_time = 10_000;
    profiles.timed_run.shot_max_time = 10_000;
    let mut h = harness(&profiles, usize::MAX, 1, false);
    h.core.select_variant(Variant::TimedRun).unwrap();
    h.core.start().unwrap();

    let shoot = key("left mouse");
    assert!(wait_until(Duration::from_secs(2), || {
        held_keys(&h.log.lock()) == vec![shoot]
    }));

    h.core.dispatch(Command::Stop).unwrap();

    assert!(held_keys(&h.log.lock()).is_empty());
    assert_eq!(h.log.lock().last(), Some(&Event::Release(shoot)));
    assert!(!h.core.is_running());
}

#[test]
fn test_pause_releases_keys_and_resume_continues() {
    let mut profiles = fast_profiles();
    profiles.alt.walk_min_time = 20;
    profiles.alt.walk_max_time = 20;
    profiles.alt.sleep_min_time = 20;
    profiles.alt.sleep_max_time = 20;
    profiles.alt.walk_cycles = 10_000;
    let mut h = harness(&profiles, usize::MAX, 1, false);
    h.core.select_variant(Variant::Alt).unwrap();
    h.core.start().unwrap();

    assert!(wait_until(Duration::from_secs(2), || h.log.lock().len() >= 3));

    h.core.dispatch(Command::TogglePause).unwrap();
    assert!(wait_until(Duration::from_secs(2), || h.core.state.is_paused()));

    assert!(held_keys(&h.log.lock()).is_empty(), "keys held while paused");
    let frozen = h.log.lock().len();
    thread::sleep(Duration::from_millis(100));
    assert_eq!(h.log.lock().len(), frozen, "input while paused");

    h.core.dispatch(Command::TogglePause).unwrap();
    assert!(wait_until(Duration::from_secs(2), || !h.core.state.is_paused()));
    assert!(wait_until(Duration::from_secs(2), || h.log.lock().len() > frozen + 2));

    assert_eq!(h.core.stop(), Some(StopReason::Requested));
    assert!(held_keys(&h.log.lock()).is_empty());
}

#[test]
fn test_stop_while_paused() {
    let mut profiles = fast_profiles();
    profiles.timed_run.wait_time = 60_000;
    let mut h = harness(&profiles, usize::MAX, 1, false);
    h.core.select_variant(Variant::TimedRun).unwrap();
    h.core.start().unwrap();
    assert!(wait_until(Duration::from_secs(2), || {
        h.core.state.phase() == Phase::Waiting
    }));

    h.core.dispatch(Command::TogglePause).unwrap();
    assert!(wait_until(Duration::from_secs(2), || h.core.state.is_paused()));

    assert_eq!(h.core.stop(), Some(StopReason::Requested));
    assert!(!h.core.state.is_paused());
}

#[test]
fn test_start_ignored_while_running() {
    let mut profiles = fast_profiles();
    profiles.timed_run.wait_time = 60_000;
    let mut h = harness(&profiles, usize::MAX, 1, false);
    h.core.select_variant(Variant::TimedRun).unwrap();

    assert!(h.core.start().unwrap());
    assert!(!h.core.start().unwrap());
    h.core.dispatch(Command::Start).unwrap();
    assert!(h.core.is_running());

    h.core.stop();
}

#[test]
fn test_exit_stops_and_requests_exit() {
    let mut profiles = fast_profiles();
    profiles.alt.wait_time = 60_000;
    let mut h = harness(&profiles, usize::MAX, 1, false);
    h.core.select_variant(Variant::Alt).unwrap();
    h.core.start().unwrap();

    h.core.dispatch(Command::Exit).unwrap();

    assert!(!h.core.is_running());
    assert!(h.core.state.should_exit());
    assert_eq!(h.core.state.last_stop(), Some(StopReason::Requested));
}

#[test]
fn test_resident_exit_ends_session_only() {
    let mut profiles = fast_profiles();
    profiles.alt.wait_time = 60_000;
    let mut h = harness(&profiles, usize::MAX, 1, false);
    h.core = h.core.stay_resident();
    h.core.select_variant(Variant::Alt).unwrap();
    h.core.start().unwrap();

    h.core.dispatch(Command::Exit).unwrap();

    assert!(!h.core.is_running());
    assert!(!h.core.state.should_exit());
    assert_eq!(h.core.state.last_stop(), Some(StopReason::Requested));
    assert!(held_keys(&h.log.lock()).is_empty());

    // Controller still accepts a new run
    assert!(h.core.start().unwrap());
    assert!(h.core.is_running());
    h.core.exit();
    assert!(h.core.state.should_exit());
}

#[test]
fn test_reload_rereads_settings() {
    let mut h = harness(&fast_profiles(), usize::MAX, 1, false);
    assert_eq!(h.core.profiles().primary.shots, 2);

    let mut changed = h.core.profiles().clone();
    changed.primary.shots = 7;
    changed.alt.action_key = "f".to_string();
    h.core.store().save_profiles(&changed).unwrap();

    h.core.dispatch(Command::Reload).unwrap();

    assert_eq!(h.core.profiles().primary.shots, 7);
    assert_eq!(h.core.profiles().alt.action_key, "f");
}

#[test]
fn test_invalid_key_in_file_falls_back_to_default() {
    let mut profiles = fast_profiles();
    profiles.primary.use_key = "not a key".to_string();
    let mut h = harness(&profiles, usize::MAX, 1, false);

    // The loader already replaced the bad name with its default
    assert_eq!(h.core.profiles().primary.use_key, "e");
    assert!(h.core.start().unwrap());
    h.core.stop();
}

#[test]
fn test_injection_failure_ends_run() {
    let mut h = harness(&fast_profiles(), usize::MAX, 1, true);
    h.core.select_variant(Variant::TimedRun).unwrap();
    h.core.start().unwrap();

    assert_eq!(wait_for_finish(&mut h.core), StopReason::Failed);
    assert_eq!(h.core.state.phase(), Phase::Idle);
}

#[test]
fn test_process_override_is_watched() {
    let mut h = harness(&fast_profiles(), 0, 1, false);
    h.core.set_process_override(Some("Other.exe".to_string()));
    h.core.start().unwrap();
    wait_for_finish(&mut h.core);

    assert_eq!(h.probe.asked.lock().as_slice(), ["Other.exe".to_string()]);
}
