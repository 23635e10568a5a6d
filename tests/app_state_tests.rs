use std::thread;
use westtek::app_state::{AppState, Phase, StopReason};
use westtek::automation::Variant;

#[test]
fn test_initial_state() {
    let state = AppState::new();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(!state.is_running());
    assert!(!state.is_paused());
    assert!(!state.hotkeys_registered());
    assert_eq!(state.cycles_completed(), 0);
    assert!(state.last_stop().is_none());
}

#[test]
fn test_phase_transitions() {
    let state = AppState::new();
    for phase in [
        Phase::Countdown,
        Phase::Acting,
        Phase::Waiting,
        Phase::Resetting,
        Phase::Acting,
    ] {
        state.set_phase(phase);
        assert_eq!(state.phase(), phase);
        assert!(state.is_running());
    }

    state.finish_run(StopReason::Requested);
    assert!(!state.is_running());
}

#[test]
fn test_exit_flag_cleared_after_read() {
    let state = AppState::new();
    assert!(!state.should_exit());

    state.request_exit();
    assert!(state.should_exit());
    assert!(state.should_exit_and_clear());
    assert!(!state.should_exit_and_clear());
}

#[test]
fn test_hotkeys_registered_flag() {
    let state = AppState::new();
    state.set_hotkeys_registered(true);
    assert!(state.hotkeys_registered());
    state.set_hotkeys_registered(false);
    assert!(!state.hotkeys_registered());
}

#[test]
fn test_thread_safety_cycle_counter() {
    let state = AppState::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let state_clone = state.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    state_clone.increment_cycles();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(state.cycles_completed(), 1000);
}

#[test]
fn test_clones_share_state() {
    let state = AppState::new();
    let ui_view = state.clone();

    state.begin_run(Variant::Alt);
    state.set_phase(Phase::Waiting);

    assert_eq!(ui_view.phase(), Phase::Waiting);
    assert_eq!(ui_view.variant(), Variant::Alt);
    assert!(ui_view.status_line().starts_with("AltWestTek: Waiting"));
}
