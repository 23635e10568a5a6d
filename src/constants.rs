//! Centralized constants for WestTek automation
//!
//! This module contains the fixed numerical values used by the scripts and
//! the controllers. Values that players tune live in the per-script settings
//! files instead (see the `settings` module).

// ============================================================================
// COUNTDOWN SYNCHRONIZATION
// ============================================================================

/// Second of the minute the countdown waits for before the first cycle.
/// Unit: seconds (0-59)
/// Range: Fixed, matches the in-game event tick
pub const SYNC_SECOND: u32 = 1;

/// Countdown wall-clock polling interval.
/// Unit: milliseconds
/// Recommended range: 50-250 (must be well under one second)
pub const COUNTDOWN_POLL_MS: u64 = 100;

// ============================================================================
// WAIT PHASE
// ============================================================================

/// Granularity of the elapsed-time check in the wait phase.
/// Unit: milliseconds
/// Recommended range: 250-1000
pub const WAIT_POLL_MS: u64 = 1000;

// ============================================================================
// SCRIPTED RESET SEQUENCE
// ============================================================================

/// How long a single tapped key (OPK keys, crouch) is held down.
/// Unit: milliseconds
pub const KEY_TAP_MS: u64 = 30;

/// Pause after each OPK key so the game registers the toggle.
/// Unit: milliseconds
pub const OPK_SETTLE_MS: u64 = 1000;

/// Gap between pressing/releasing the two keys of a sprint step.
/// Unit: milliseconds
pub const STEP_GAP_MS: u64 = 30;

/// How long sprint is held during each repositioning step.
/// Unit: milliseconds
pub const SPRINT_HOLD_MS: u64 = 400;

/// Number of sprint steps used to reach the standing position.
pub const SPRINT_STEPS: u32 = 4;

/// Pause after the crouch tap.
/// Unit: milliseconds
pub const CROUCH_SETTLE_MS: u64 = 100;

/// How long the use key is held to ride the elevator.
/// Unit: milliseconds
pub const USE_HOLD_MS: u64 = 60;

/// Pause after using the elevator before checking the game again.
/// Unit: milliseconds
pub const USE_SETTLE_MS: u64 = 1000;

/// Gap between key releases when a run is stopped or paused.
/// Unit: milliseconds
pub const RELEASE_GAP_MS: u64 = 90;

// ============================================================================
// CONTROLLER POLLING
// ============================================================================

/// Event loop wake-up interval for draining hotkey commands and reaping workers.
/// Unit: milliseconds
/// Recommended range: 50-500 (lower = snappier hotkeys, higher = less CPU)
pub const CONTROLLER_POLL_MS: u64 = 100;

/// Standard notification display duration.
/// Unit: milliseconds
pub const NOTIFICATION_TIMEOUT_MS: u32 = 3000;

// ============================================================================
// SETTINGS STORAGE
// ============================================================================

/// Folder name created under the user's Documents directory.
pub const CONFIG_FOLDER_NAME: &str = "WestTekAuto";

/// Process name every script watches unless overridden.
pub const DEFAULT_GAME_PROCESS: &str = "Fallout76.exe";
