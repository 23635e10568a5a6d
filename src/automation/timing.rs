use crate::constants::{
    COUNTDOWN_POLL_MS, CROUCH_SETTLE_MS, KEY_TAP_MS, OPK_SETTLE_MS, RELEASE_GAP_MS,
    SPRINT_HOLD_MS, STEP_GAP_MS, USE_HOLD_MS, USE_SETTLE_MS, WAIT_POLL_MS,
};
use chrono::Timelike;

/// Fixed delays of the scripts, in milliseconds
///
/// Configured `[min, max]` ranges come from the settings record. These are
/// the hard-wired gaps between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub key_tap: u64,
    pub opk_settle: u64,
    pub step_gap: u64,
    pub sprint_hold: u64,
    pub crouch_settle: u64,
    pub use_hold: u64,
    pub use_settle: u64,
    pub release_gap: u64,
    pub countdown_poll: u64,
    pub wait_poll: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            key_tap: KEY_TAP_MS,
            opk_settle: OPK_SETTLE_MS,
            step_gap: STEP_GAP_MS,
            sprint_hold: SPRINT_HOLD_MS,
            crouch_settle: CROUCH_SETTLE_MS,
            use_hold: USE_HOLD_MS,
            use_settle: USE_SETTLE_MS,
            release_gap: RELEASE_GAP_MS,
            countdown_poll: COUNTDOWN_POLL_MS,
            wait_poll: WAIT_POLL_MS,
        }
    }
}

impl Timings {
    /// No fixed delays at all; polls every millisecond
    pub fn instant() -> Self {
        Self {
            key_tap: 0,
            opk_settle: 0,
            step_gap: 0,
            sprint_hold: 0,
            crouch_settle: 0,
            use_hold: 0,
            use_settle: 0,
            release_gap: 0,
            countdown_poll: 1,
            wait_poll: 1,
        }
    }
}

/// Wall clock as seen by the countdown
pub trait Clock: Send + Sync {
    /// Current second of the minute (0-59)
    fn second_of_minute(&self) -> u32;
}

/// Local time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn second_of_minute(&self) -> u32 {
        chrono::Local::now().second()
    }
}

/// Seconds shown while counting down to the sync second
pub fn countdown_remaining(second: u32) -> u32 {
    if second > 1 {
        60 - second
    } else {
        1
    }
}
