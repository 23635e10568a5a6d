//! Settings for the alt walk-and-interact script

use super::{FieldKind, FieldSpec, SettingsRecord};
use crate::constants::DEFAULT_GAME_PROCESS;
use serde::{Deserialize, Serialize};

const MOVEMENT: &str = "Movement Settings";
const ACTION: &str = "Action Settings";
const KEYS: &str = "Key Settings";
const HOTKEYS: &str = "Hotkey Settings";
const PROCESS: &str = "Process Settings";

static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("walk_min_time", "Walk Min Time", MOVEMENT, FieldKind::Millis),
    FieldSpec::new("walk_max_time", "Walk Max Time", MOVEMENT, FieldKind::Millis),
    FieldSpec::new("sleep_min_time", "Sleep Min Time", MOVEMENT, FieldKind::Millis),
    FieldSpec::new("sleep_max_time", "Sleep Max Time", MOVEMENT, FieldKind::Millis),
    FieldSpec::new("walk_cycles", "Walk Cycles", MOVEMENT, FieldKind::Count),
    FieldSpec::new("wait_time", "Wait Time (ms)", MOVEMENT, FieldKind::Millis),
    FieldSpec::new("action_key", "Action Key", ACTION, FieldKind::InputKey),
    FieldSpec::new("action_press_time", "Action Press Time (ms)", ACTION, FieldKind::Millis),
    FieldSpec::new("action_cycles", "Action Cycles", ACTION, FieldKind::Count),
    FieldSpec::new("backward_key", "Backward Movement Key", KEYS, FieldKind::InputKey),
    FieldSpec::new("right_key", "Right Movement Key", KEYS, FieldKind::InputKey),
    FieldSpec::new("start_hotkey", "Start Hotkey", HOTKEYS, FieldKind::Hotkey),
    FieldSpec::new("stop_hotkey", "Stop Hotkey", HOTKEYS, FieldKind::Hotkey),
    FieldSpec::new("game_process", "Game Process Name", PROCESS, FieldKind::Process),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkSettings {
    pub walk_min_time: u64,
    pub walk_max_time: u64,
    pub sleep_min_time: u64,
    pub sleep_max_time: u64,
    pub walk_cycles: u64,
    pub wait_time: u64,
    pub action_key: String,
    pub action_press_time: u64,
    pub action_cycles: u64,
    pub backward_key: String,
    pub right_key: String,
    pub start_hotkey: String,
    pub stop_hotkey: String,
    pub game_process: String,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            walk_min_time: 63,
            walk_max_time: 88,
            sleep_min_time: 80,
            sleep_max_time: 100,
            walk_cycles: 8,
            wait_time: 60000,
            action_key: "e".to_string(),
            action_press_time: 60,
            action_cycles: 15,
            backward_key: "s".to_string(),
            right_key: "d".to_string(),
            start_hotkey: "f3".to_string(),
            stop_hotkey: "f2".to_string(),
            game_process: DEFAULT_GAME_PROCESS.to_string(),
        }
    }
}

impl SettingsRecord for WalkSettings {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn game_process(&self) -> &str {
        &self.game_process
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_table_matches_struct() {
        let map = WalkSettings::default().to_map();
        assert_eq!(map.len(), FIELDS.len());
        for spec in FIELDS {
            assert!(map.contains_key(spec.key), "missing field {}", spec.key);
        }
    }

    #[test]
    fn test_hotkey_edit_is_normalized() {
        let mut settings = WalkSettings::default();
        settings.set_from_str("stop_hotkey", " F10 ").unwrap();
        assert_eq!(settings.stop_hotkey, "f10");
    }
}
