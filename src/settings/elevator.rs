//! Settings for the shoot-and-ride-the-elevator scripts (primary and timed run)

use super::{FieldKind, FieldSpec, SettingsRecord};
use crate::constants::DEFAULT_GAME_PROCESS;
use serde::{Deserialize, Serialize};

const TIMING: &str = "Timing Settings";
const CONFIG: &str = "Config Settings";
const KEYS: &str = "Key Settings";
const HOTKEYS: &str = "Hotkey Settings";
const PROCESS: &str = "Process Settings";

static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("shot_min_time", "Shot Min Time", TIMING, FieldKind::Millis),
    FieldSpec::new("shot_max_time", "Shot Max Time", TIMING, FieldKind::Millis),
    FieldSpec::new("quick_min_time", "Quick Min Time", TIMING, FieldKind::Millis),
    FieldSpec::new("quick_max_time", "Quick Max Time", TIMING, FieldKind::Millis),
    FieldSpec::new("shot_wait_min", "Shot Wait Min", TIMING, FieldKind::Millis),
    FieldSpec::new("shot_wait_max", "Shot Wait Max", TIMING, FieldKind::Millis),
    FieldSpec::new("slow_min_time", "Slow Min Time", TIMING, FieldKind::Millis),
    FieldSpec::new("slow_max_time", "Slow Max Time", TIMING, FieldKind::Millis),
    FieldSpec::new("load_screen_min", "Load Screen Min", TIMING, FieldKind::Millis),
    FieldSpec::new("load_screen_max", "Load Screen Max", TIMING, FieldKind::Millis),
    FieldSpec::new("elevator_reset_min", "Elevator Reset Min", TIMING, FieldKind::Millis),
    FieldSpec::new("elevator_reset_max", "Elevator Reset Max", TIMING, FieldKind::Millis),
    FieldSpec::new("shots", "Number of Shots", CONFIG, FieldKind::Count),
    FieldSpec::new("wait_time", "Wait Time (ms)", CONFIG, FieldKind::Millis),
    FieldSpec::new("shoot_key", "Shoot Key", KEYS, FieldKind::InputKey),
    FieldSpec::new("right_key", "Right Movement Key", KEYS, FieldKind::InputKey),
    FieldSpec::new("sprint_key", "Sprint Key", KEYS, FieldKind::InputKey),
    FieldSpec::new("crouch_key", "Crouch Key", KEYS, FieldKind::InputKey),
    FieldSpec::new("use_key", "Use/Interact Key", KEYS, FieldKind::InputKey),
    FieldSpec::new("opk_enable1", "OPK Enable Key 1", KEYS, FieldKind::InputKey),
    FieldSpec::new("opk_enable2", "OPK Enable Key 2", KEYS, FieldKind::InputKey),
    FieldSpec::new("pause_hotkey", "Pause Hotkey", HOTKEYS, FieldKind::Hotkey),
    FieldSpec::new("exit_hotkey", "Exit Hotkey", HOTKEYS, FieldKind::Hotkey),
    FieldSpec::new("start_hotkey", "Start Hotkey", HOTKEYS, FieldKind::Hotkey),
    FieldSpec::new("reload_hotkey", "Reload Hotkey", HOTKEYS, FieldKind::Hotkey),
    FieldSpec::new("game_process", "Game Process Name", PROCESS, FieldKind::Process),
];

/// Record shared by the primary and timed-run scripts (each has its own file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorSettings {
    pub shot_min_time: u64,
    pub shot_max_time: u64,
    pub quick_min_time: u64,
    pub quick_max_time: u64,
    pub shot_wait_min: u64,
    pub shot_wait_max: u64,
    /// Reserved, kept so existing files round-trip
    pub slow_min_time: u64,
    pub slow_max_time: u64,
    pub load_screen_min: u64,
    pub load_screen_max: u64,
    /// Reserved, kept so existing files round-trip
    pub elevator_reset_min: u64,
    pub elevator_reset_max: u64,

    /// Shots fired per cycle
    pub shots: u64,
    /// Minimum cycle length before taking the elevator (ms)
    pub wait_time: u64,

    pub shoot_key: String,
    pub right_key: String,
    pub sprint_key: String,
    pub crouch_key: String,
    pub use_key: String,
    pub opk_enable1: String,
    pub opk_enable2: String,

    pub pause_hotkey: String,
    pub exit_hotkey: String,
    pub start_hotkey: String,
    pub reload_hotkey: String,

    pub game_process: String,
}

impl Default for ElevatorSettings {
    fn default() -> Self {
        Self {
            shot_min_time: 63,
            shot_max_time: 88,
            quick_min_time: 50,
            quick_max_time: 150,
            shot_wait_min: 100,
            shot_wait_max: 105,
            slow_min_time: 1000,
            slow_max_time: 1500,
            load_screen_min: 10000,
            load_screen_max: 12000,
            elevator_reset_min: 8000,
            elevator_reset_max: 12000,
            shots: 60,
            wait_time: 60000,
            shoot_key: "left mouse".to_string(),
            right_key: "d".to_string(),
            sprint_key: "left shift".to_string(),
            crouch_key: "left ctrl".to_string(),
            use_key: "e".to_string(),
            opk_enable1: "numpad1".to_string(),
            opk_enable2: "numpad2".to_string(),
            pause_hotkey: "f1".to_string(),
            exit_hotkey: "f2".to_string(),
            start_hotkey: "f3".to_string(),
            reload_hotkey: "f4".to_string(),
            game_process: DEFAULT_GAME_PROCESS.to_string(),
        }
    }
}

impl SettingsRecord for ElevatorSettings {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn game_process(&self) -> &str {
        &self.game_process
    }
}
