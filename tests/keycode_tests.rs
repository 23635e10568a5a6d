use global_hotkey::hotkey::Code;
use westtek::utils::keycode::{
    key_name, normalize_key_name, parse_hotkey_name, parse_key_name, KeyTarget, MouseButton,
    NamedKey,
};

const DOCUMENTED_NAMES: &[&str] = &[
    "a", "z", "0", "9", "f1", "f12", "esc", "tab", "caps lock", "shift", "left shift",
    "right shift", "ctrl", "left ctrl", "right ctrl", "alt", "left alt", "right alt", "space",
    "enter", "backspace", "delete", "insert", "home", "end", "page up", "page down", "up",
    "down", "left", "right", "num lock", "numpad0", "numpad9", "numpad*", "numpad+", "numpad-",
    "numpad/", "left mouse", "right mouse", "middle mouse",
];

#[test]
fn test_every_documented_name_parses() {
    for name in DOCUMENTED_NAMES {
        assert!(parse_key_name(name).is_some(), "'{}' should parse", name);
    }
}

#[test]
fn test_names_are_case_and_space_insensitive() {
    assert_eq!(
        parse_key_name("  Left   Mouse "),
        Some(KeyTarget::Mouse(MouseButton::Left))
    );
    assert_eq!(
        parse_key_name("NUMPAD1"),
        Some(KeyTarget::Named(NamedKey::Numpad(1)))
    );
    assert_eq!(parse_key_name("E"), Some(KeyTarget::Char('e')));
    assert_eq!(normalize_key_name(" Page   Up "), "page up");
}

#[test]
fn test_side_specific_modifiers_bind_their_own_key() {
    assert_eq!(parse_hotkey_name("right ctrl"), Some(Code::ControlRight));
    assert_eq!(parse_hotkey_name("right shift"), Some(Code::ShiftRight));
    assert_eq!(parse_hotkey_name("right alt"), Some(Code::AltRight));
    assert_eq!(parse_hotkey_name("left ctrl"), Some(Code::ControlLeft));
    assert_eq!(parse_hotkey_name("ctrl"), Some(Code::ControlLeft));
    assert_ne!(parse_key_name("right shift"), parse_key_name("left shift"));
    assert_eq!(
        key_name(parse_key_name("Right  Alt").unwrap()),
        "right alt"
    );
}

#[test]
fn test_invalid_names_rejected() {
    for name in ["", "   ", "f0", "f13", "numpad10", "hyper", "left foot", "ab"] {
        assert!(parse_key_name(name).is_none(), "'{}' should not parse", name);
    }
}

#[test]
fn test_key_name_round_trips_canonical_names() {
    for name in DOCUMENTED_NAMES {
        let target = parse_key_name(name).unwrap();
        assert_eq!(parse_key_name(&key_name(target)), Some(target));
    }
}

#[test]
fn test_hotkey_codes() {
    assert_eq!(parse_hotkey_name("f1"), Some(Code::F1));
    assert_eq!(parse_hotkey_name("F4"), Some(Code::F4));
    assert_eq!(parse_hotkey_name("numpad2"), Some(Code::Numpad2));
    assert_eq!(parse_hotkey_name("p"), Some(Code::KeyP));
    assert_eq!(parse_hotkey_name("page down"), Some(Code::PageDown));
}

#[test]
fn test_hotkeys_reject_mouse_buttons() {
    assert_eq!(parse_hotkey_name("left mouse"), None);
    assert_eq!(parse_hotkey_name("middle mouse"), None);
}
