use crate::automation::Variant;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Where a run currently is in its script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Countdown,
    Acting,
    Waiting,
    Resetting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "Idle",
            Phase::Countdown => "Countdown",
            Phase::Acting => "Acting",
            Phase::Waiting => "Waiting",
            Phase::Resetting => "Resetting",
        };
        f.write_str(name)
    }
}

/// Why the last run returned to idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Stop, exit or reload was requested
    Requested,
    /// The watched game process was not running
    ProcessMissing,
    /// Input injection failed or the worker panicked
    Failed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::Requested => "stopped",
            StopReason::ProcessMissing => "game process not running",
            StopReason::Failed => "failed",
        };
        f.write_str(text)
    }
}

/// Status snapshot shared between the worker, the controller and the UI
///
/// This is not a control channel: commands travel over channels, this only
/// records what happened so it can be displayed.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<AppStateInner>>,
}

pub struct AppStateInner {
    /// Current phase of the active run (Idle when nothing runs)
    pub phase: Phase,
    /// Whether the active run is suspended
    pub paused: bool,
    /// Whether at least one hotkey binding is registered
    pub hotkeys_registered: bool,
    /// Script selected in the controller
    pub variant: Variant,
    /// Full cycles finished by the active (or last) run
    pub cycles_completed: u64,
    /// Seconds left before the countdown releases the run
    pub countdown_remaining: Option<u32>,
    /// When the active run started
    pub run_started: Option<Instant>,
    /// Outcome of the last finished run
    pub last_stop: Option<StopReason>,
    /// Flag to signal that the app should exit
    pub should_exit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(AppStateInner {
                phase: Phase::Idle,
                paused: false,
                hotkeys_registered: false,
                variant: Variant::Primary,
                cycles_completed: 0,
                countdown_remaining: None,
                run_started: None,
                last_stop: None,
                should_exit: false,
            })),
        }
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    pub fn set_phase(&self, phase: Phase) {
        let mut state = self.inner.lock();
        if state.phase != phase {
            log::info!("Phase: {} -> {}", state.phase, phase);
            state.phase = phase;
        }
        if phase != Phase::Countdown {
            state.countdown_remaining = None;
        }
    }

    /// True while a worker owns the phase
    pub fn is_running(&self) -> bool {
        self.inner.lock().phase != Phase::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock().paused
    }

    pub fn set_paused(&self, paused: bool) {
        self.inner.lock().paused = paused;
    }

    pub fn hotkeys_registered(&self) -> bool {
        self.inner.lock().hotkeys_registered
    }

    pub fn set_hotkeys_registered(&self, registered: bool) {
        self.inner.lock().hotkeys_registered = registered;
    }

    pub fn variant(&self) -> Variant {
        self.inner.lock().variant
    }

    pub fn set_variant(&self, variant: Variant) {
        self.inner.lock().variant = variant;
    }

    pub fn cycles_completed(&self) -> u64 {
        self.inner.lock().cycles_completed
    }

    pub fn increment_cycles(&self) -> u64 {
        let mut state = self.inner.lock();
        state.cycles_completed += 1;
        state.cycles_completed
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        self.inner.lock().countdown_remaining
    }

    pub fn set_countdown_remaining(&self, remaining: Option<u32>) {
        self.inner.lock().countdown_remaining = remaining;
    }

    pub fn last_stop(&self) -> Option<StopReason> {
        self.inner.lock().last_stop
    }

    /// Reset per-run counters when a worker is spawned
    pub fn begin_run(&self, variant: Variant) {
        let mut state = self.inner.lock();
        state.variant = variant;
        state.cycles_completed = 0;
        state.countdown_remaining = None;
        state.paused = false;
        state.last_stop = None;
        state.run_started = Some(Instant::now());
    }

    /// Record the outcome of a run and return to Idle
    pub fn finish_run(&self, reason: StopReason) {
        let mut state = self.inner.lock();
        if state.phase != Phase::Idle {
            log::info!("Phase: {} -> {}", state.phase, Phase::Idle);
        }
        state.phase = Phase::Idle;
        state.paused = false;
        state.countdown_remaining = None;
        state.run_started = None;
        state.last_stop = Some(reason);
    }

    /// Get the elapsed time since the active run started (in seconds)
    pub fn run_elapsed_secs(&self) -> Option<u64> {
        self.inner.lock().run_started.map(|t| t.elapsed().as_secs())
    }

    /// One-line description for tooltips and the status command
    pub fn status_line(&self) -> String {
        let state = self.inner.lock();
        match (state.phase, state.paused) {
            (Phase::Idle, _) => match state.last_stop {
                Some(reason) => format!("{}: Idle ({})", state.variant.name(), reason),
                None => format!("{}: Idle", state.variant.name()),
            },
            (_, true) => format!("{}: Paused", state.variant.name()),
            (Phase::Countdown, false) => match state.countdown_remaining {
                Some(secs) => format!("{}: Starting in {}s", state.variant.name(), secs),
                None => format!("{}: Countdown", state.variant.name()),
            },
            (phase, false) => format!(
                "{}: {} (cycle {})",
                state.variant.name(),
                phase,
                state.cycles_completed + 1
            ),
        }
    }

    /// Request that the application exit
    pub fn request_exit(&self) {
        self.inner.lock().should_exit = true;
    }

    pub fn should_exit(&self) -> bool {
        self.inner.lock().should_exit
    }

    /// Check if app should exit and clear the flag
    pub fn should_exit_and_clear(&self) -> bool {
        let mut state = self.inner.lock();
        let should_exit = state.should_exit;
        state.should_exit = false;
        should_exit
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
