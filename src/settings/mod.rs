//! Per-script settings records
//!
//! Each script reads one flat record of millisecond timings, counts, key
//! names and the watched process name. Records are typed structs, but they
//! are also addressed by their string keys (the keys used in the JSON files)
//! so the settings editor can show, edit and reset individual fields.

pub mod elevator;
pub mod walk;

pub use elevator::ElevatorSettings;
pub use walk::WalkSettings;

use crate::utils::keycode::{normalize_key_name, parse_hotkey_name, parse_key_name};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),
    #[error("Invalid numeric value for {key}: '{value}'")]
    InvalidNumber { key: String, value: String },
    #[error("Invalid key name for {key}: '{value}'")]
    InvalidKey { key: String, value: String },
    #[error("{key} cannot be empty")]
    Empty { key: String },
    #[error("{key} expects {expected}")]
    WrongType { key: String, expected: &'static str },
    #[error("Failed to rebuild settings record: {0}")]
    Serde(#[from] serde_json::Error),
}

/// What a field holds, which decides how text typed by the user is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Duration in milliseconds
    Millis,
    /// Repetition count
    Count,
    /// Key or mouse button the script presses
    InputKey,
    /// Global hotkey that controls the script
    Hotkey,
    /// Executable name of the watched game process
    Process,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Millis | FieldKind::Count)
    }
}

/// Description of one recognized key in a record
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub group: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(
        key: &'static str,
        label: &'static str,
        group: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            key,
            label,
            group,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Number(u64),
    Text(String),
}

impl FieldValue {
    fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(n) => Value::from(*n),
            FieldValue::Text(s) => Value::from(s.as_str()),
        }
    }

    /// Read a persisted JSON value for a field, validating it like user input
    pub fn from_json(spec: &FieldSpec, value: &Value) -> Result<Self, SettingsError> {
        if spec.kind.is_numeric() {
            value
                .as_u64()
                .map(FieldValue::Number)
                .ok_or_else(|| SettingsError::WrongType {
                    key: spec.key.to_string(),
                    expected: "a non-negative integer",
                })
        } else {
            match value.as_str() {
                Some(text) => parse_field(spec, text),
                None => Err(SettingsError::WrongType {
                    key: spec.key.to_string(),
                    expected: "a string",
                }),
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Parse text entered for a field
///
/// Numbers must be non-negative integers, key names must be recognized and
/// are stored normalized, the process name must not be blank.
pub fn parse_field(spec: &FieldSpec, text: &str) -> Result<FieldValue, SettingsError> {
    let trimmed = text.trim();
    match spec.kind {
        FieldKind::Millis | FieldKind::Count => trimmed
            .parse::<u64>()
            .map(FieldValue::Number)
            .map_err(|_| SettingsError::InvalidNumber {
                key: spec.key.to_string(),
                value: text.to_string(),
            }),
        FieldKind::InputKey => match parse_key_name(trimmed) {
            Some(_) => Ok(FieldValue::Text(normalize_key_name(trimmed))),
            None => Err(SettingsError::InvalidKey {
                key: spec.key.to_string(),
                value: text.to_string(),
            }),
        },
        FieldKind::Hotkey => match parse_hotkey_name(trimmed) {
            Some(_) => Ok(FieldValue::Text(normalize_key_name(trimmed))),
            None => Err(SettingsError::InvalidKey {
                key: spec.key.to_string(),
                value: text.to_string(),
            }),
        },
        FieldKind::Process if trimmed.is_empty() => Err(SettingsError::Empty {
            key: spec.key.to_string(),
        }),
        FieldKind::Process => Ok(FieldValue::Text(trimmed.to_string())),
    }
}

/// A flat settings record addressable by its JSON keys
pub trait SettingsRecord:
    Default + Clone + fmt::Debug + Serialize + DeserializeOwned + Send + 'static
{
    /// Every recognized key, in display and file order
    fn fields() -> &'static [FieldSpec];

    /// Name of the executable this record's script watches
    fn game_process(&self) -> &str;

    fn field(key: &str) -> Option<&'static FieldSpec> {
        Self::fields().iter().find(|f| f.key == key)
    }

    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    fn get(&self, key: &str) -> Option<FieldValue> {
        let spec = Self::field(key)?;
        let map = self.to_map();
        FieldValue::from_json(spec, map.get(key)?).ok()
    }

    /// Store an already-parsed value, checking it matches the field kind
    fn put(&mut self, key: &str, value: FieldValue) -> Result<(), SettingsError> {
        let spec = Self::field(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        match (&value, spec.kind.is_numeric()) {
            (FieldValue::Number(_), true) | (FieldValue::Text(_), false) => {}
            (_, true) => {
                return Err(SettingsError::WrongType {
                    key: key.to_string(),
                    expected: "a number",
                })
            }
            (_, false) => {
                return Err(SettingsError::WrongType {
                    key: key.to_string(),
                    expected: "text",
                })
            }
        }

        let mut map = self.to_map();
        map.insert(key.to_string(), value.to_json());
        *self = serde_json::from_value(Value::Object(map))?;
        Ok(())
    }

    /// Apply text typed by the user; on error the previous value is kept
    fn set_from_str(&mut self, key: &str, text: &str) -> Result<(), SettingsError> {
        let spec = Self::field(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        let value = parse_field(spec, text)?;
        self.put(key, value)
    }

    /// Restore one field to its documented default and return that default
    fn reset_field(&mut self, key: &str) -> Result<FieldValue, SettingsError> {
        let default = Self::default()
            .get(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        self.put(key, default.clone())?;
        Ok(default)
    }

    /// Overlay persisted values onto this record
    ///
    /// Unknown keys are ignored and recognized keys with unusable values keep
    /// their current value. Returns one message per rejected value.
    fn merge_map(&mut self, persisted: &Map<String, Value>) -> Vec<String> {
        let mut rejected = Vec::new();
        for (key, raw) in persisted {
            let Some(spec) = Self::field(key) else {
                debug!("Ignoring unknown setting '{}'", key);
                continue;
            };
            let outcome = FieldValue::from_json(spec, raw).and_then(|value| self.put(key, value));
            if let Err(e) = outcome {
                warn!("{} (keeping {})", e, self.get(key).unwrap_or(FieldValue::Number(0)));
                rejected.push(e.to_string());
            }
        }
        rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOTS: FieldSpec = FieldSpec::new("shots", "Number of Shots:", "Config", FieldKind::Count);
    const SHOOT: FieldSpec = FieldSpec::new("shoot_key", "Shoot Key:", "Keys", FieldKind::InputKey);
    const START: FieldSpec = FieldSpec::new("start_hotkey", "Start Hotkey:", "Hotkeys", FieldKind::Hotkey);
    const PROCESS: FieldSpec =
        FieldSpec::new("game_process", "Game Process Name:", "Process", FieldKind::Process);

    #[test]
    fn test_parse_numeric_field() {
        assert_eq!(parse_field(&SHOTS, " 75 ").unwrap(), FieldValue::Number(75));
        assert!(matches!(
            parse_field(&SHOTS, "sixty"),
            Err(SettingsError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_field(&SHOTS, "-5"),
            Err(SettingsError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_key_fields_normalize() {
        assert_eq!(
            parse_field(&SHOOT, "Left  Mouse").unwrap(),
            FieldValue::Text("left mouse".to_string())
        );
        assert!(parse_field(&SHOOT, "hyper key").is_err());
    }

    #[test]
    fn test_hotkey_field_rejects_mouse_buttons() {
        assert!(parse_field(&START, "F3").is_ok());
        assert!(matches!(
            parse_field(&START, "left mouse"),
            Err(SettingsError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_process_field_cannot_be_blank() {
        assert!(matches!(parse_field(&PROCESS, "   "), Err(SettingsError::Empty { .. })));
        assert_eq!(
            parse_field(&PROCESS, " Game.exe ").unwrap(),
            FieldValue::Text("Game.exe".to_string())
        );
    }

    #[test]
    fn test_from_json_type_checks() {
        assert_eq!(
            FieldValue::from_json(&SHOTS, &Value::from(12)).unwrap(),
            FieldValue::Number(12)
        );
        assert!(FieldValue::from_json(&SHOTS, &Value::from("12")).is_err());
        assert!(FieldValue::from_json(&SHOOT, &Value::from(3)).is_err());
    }
}
