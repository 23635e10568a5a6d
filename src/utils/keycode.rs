use global_hotkey::hotkey::Code;

/// Mouse button named in a settings file ("left mouse", ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Non-character keys that settings files refer to by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    /// Function key F1-F12
    F(u8),
    Escape,
    Tab,
    CapsLock,
    /// Either shift; sent and bound as the left one
    Shift,
    LeftShift,
    RightShift,
    Control,
    LeftControl,
    RightControl,
    Alt,
    LeftAlt,
    RightAlt,
    Space,
    Enter,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    NumLock,
    /// Keypad digit 0-9
    Numpad(u8),
    NumpadMultiply,
    NumpadAdd,
    NumpadSubtract,
    NumpadDivide,
}

/// Something a script can press and release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyTarget {
    Mouse(MouseButton),
    Named(NamedKey),
    /// Printable key, stored lowercase
    Char(char),
}

/// Normalize a key name: trimmed, lowercase, single spaces
pub fn normalize_key_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse a settings key name ("left mouse", "numpad1", "f3", "e") into a target
pub fn parse_key_name(name: &str) -> Option<KeyTarget> {
    let name = normalize_key_name(name);

    let named = match name.as_str() {
        "left mouse" => return Some(KeyTarget::Mouse(MouseButton::Left)),
        "right mouse" => return Some(KeyTarget::Mouse(MouseButton::Right)),
        "middle mouse" => return Some(KeyTarget::Mouse(MouseButton::Middle)),
        "esc" | "escape" => NamedKey::Escape,
        "tab" => NamedKey::Tab,
        "caps lock" => NamedKey::CapsLock,
        "shift" => NamedKey::Shift,
        "left shift" => NamedKey::LeftShift,
        "right shift" => NamedKey::RightShift,
        "ctrl" => NamedKey::Control,
        "left ctrl" => NamedKey::LeftControl,
        "right ctrl" => NamedKey::RightControl,
        "alt" => NamedKey::Alt,
        "left alt" => NamedKey::LeftAlt,
        "right alt" => NamedKey::RightAlt,
        "space" => NamedKey::Space,
        "enter" | "return" => NamedKey::Enter,
        "backspace" => NamedKey::Backspace,
        "delete" => NamedKey::Delete,
        "insert" => NamedKey::Insert,
        "home" => NamedKey::Home,
        "end" => NamedKey::End,
        "page up" => NamedKey::PageUp,
        "page down" => NamedKey::PageDown,
        "up" => NamedKey::Up,
        "down" => NamedKey::Down,
        "left" => NamedKey::Left,
        "right" => NamedKey::Right,
        "num lock" => NamedKey::NumLock,
        "numpad*" => NamedKey::NumpadMultiply,
        "numpad+" => NamedKey::NumpadAdd,
        "numpad-" => NamedKey::NumpadSubtract,
        "numpad/" => NamedKey::NumpadDivide,
        other => return parse_numbered_or_char(other),
    };

    Some(KeyTarget::Named(named))
}

fn parse_numbered_or_char(name: &str) -> Option<KeyTarget> {
    if let Some(digit) = name.strip_prefix("numpad") {
        let digit: u8 = digit.parse().ok().filter(|d| *d <= 9)?;
        return Some(KeyTarget::Named(NamedKey::Numpad(digit)));
    }

    if let Some(number) = name.strip_prefix('f') {
        if let Ok(n) = number.parse::<u8>() {
            return (1..=12)
                .contains(&n)
                .then_some(KeyTarget::Named(NamedKey::F(n)));
        }
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_whitespace() && !ch.is_control() => Some(KeyTarget::Char(ch)),
        _ => None,
    }
}

/// Canonical settings name for a target (inverse of `parse_key_name`)
pub fn key_name(target: KeyTarget) -> String {
    match target {
        KeyTarget::Mouse(MouseButton::Left) => "left mouse".to_string(),
        KeyTarget::Mouse(MouseButton::Right) => "right mouse".to_string(),
        KeyTarget::Mouse(MouseButton::Middle) => "middle mouse".to_string(),
        KeyTarget::Char(ch) => ch.to_string(),
        KeyTarget::Named(named) => match named {
            NamedKey::F(n) => format!("f{}", n),
            NamedKey::Numpad(d) => format!("numpad{}", d),
            NamedKey::Escape => "esc".to_string(),
            NamedKey::Tab => "tab".to_string(),
            NamedKey::CapsLock => "caps lock".to_string(),
            NamedKey::Shift => "shift".to_string(),
            NamedKey::LeftShift => "left shift".to_string(),
            NamedKey::RightShift => "right shift".to_string(),
            NamedKey::Control => "ctrl".to_string(),
            NamedKey::LeftControl => "left ctrl".to_string(),
            NamedKey::RightControl => "right ctrl".to_string(),
            NamedKey::Alt => "alt".to_string(),
            NamedKey::LeftAlt => "left alt".to_string(),
            NamedKey::RightAlt => "right alt".to_string(),
            NamedKey::Space => "space".to_string(),
            NamedKey::Enter => "enter".to_string(),
            NamedKey::Backspace => "backspace".to_string(),
            NamedKey::Delete => "delete".to_string(),
            NamedKey::Insert => "insert".to_string(),
            NamedKey::Home => "home".to_string(),
            NamedKey::End => "end".to_string(),
            NamedKey::PageUp => "page up".to_string(),
            NamedKey::PageDown => "page down".to_string(),
            NamedKey::Up => "up".to_string(),
            NamedKey::Down => "down".to_string(),
            NamedKey::Left => "left".to_string(),
            NamedKey::Right => "right".to_string(),
            NamedKey::NumLock => "num lock".to_string(),
            NamedKey::NumpadMultiply => "numpad*".to_string(),
            NamedKey::NumpadAdd => "numpad+".to_string(),
            NamedKey::NumpadSubtract => "numpad-".to_string(),
            NamedKey::NumpadDivide => "numpad/".to_string(),
        },
    }
}

/// Convert a key target to a global_hotkey Code
/// Returns None for mouse buttons and characters without a physical key code
pub fn target_to_code(target: KeyTarget) -> Option<Code> {
    match target {
        KeyTarget::Mouse(_) => None,
        KeyTarget::Char(ch) => char_to_code(ch),
        KeyTarget::Named(named) => named_to_code(named),
    }
}

/// Parse a hotkey name ("f3", "numpad1", "p") to a Code
pub fn parse_hotkey_name(name: &str) -> Option<Code> {
    parse_key_name(name).and_then(target_to_code)
}

fn named_to_code(named: NamedKey) -> Option<Code> {
    let code = match named {
        NamedKey::F(n) => return function_code(n),
        NamedKey::Numpad(d) => return numpad_code(d),
        NamedKey::Escape => Code::Escape,
        NamedKey::Tab => Code::Tab,
        NamedKey::CapsLock => Code::CapsLock,
        NamedKey::Shift | NamedKey::LeftShift => Code::ShiftLeft,
        NamedKey::RightShift => Code::ShiftRight,
        NamedKey::Control | NamedKey::LeftControl => Code::ControlLeft,
        NamedKey::RightControl => Code::ControlRight,
        NamedKey::Alt | NamedKey::LeftAlt => Code::AltLeft,
        NamedKey::RightAlt => Code::AltRight,
        NamedKey::Space => Code::Space,
        NamedKey::Enter => Code::Enter,
        NamedKey::Backspace => Code::Backspace,
        NamedKey::Delete => Code::Delete,
        NamedKey::Insert => Code::Insert,
        NamedKey::Home => Code::Home,
        NamedKey::End => Code::End,
        NamedKey::PageUp => Code::PageUp,
        NamedKey::PageDown => Code::PageDown,
        NamedKey::Up => Code::ArrowUp,
        NamedKey::Down => Code::ArrowDown,
        NamedKey::Left => Code::ArrowLeft,
        NamedKey::Right => Code::ArrowRight,
        NamedKey::NumLock => Code::NumLock,
        NamedKey::NumpadMultiply => Code::NumpadMultiply,
        NamedKey::NumpadAdd => Code::NumpadAdd,
        NamedKey::NumpadSubtract => Code::NumpadSubtract,
        NamedKey::NumpadDivide => Code::NumpadDivide,
    };
    Some(code)
}

fn function_code(n: u8) -> Option<Code> {
    match n {
        1 => Some(Code::F1),
        2 => Some(Code::F2),
        3 => Some(Code::F3),
        4 => Some(Code::F4),
        5 => Some(Code::F5),
        6 => Some(Code::F6),
        7 => Some(Code::F7),
        8 => Some(Code::F8),
        9 => Some(Code::F9),
        10 => Some(Code::F10),
        11 => Some(Code::F11),
        12 => Some(Code::F12),
        _ => None,
    }
}

fn numpad_code(d: u8) -> Option<Code> {
    match d {
        0 => Some(Code::Numpad0),
        1 => Some(Code::Numpad1),
        2 => Some(Code::Numpad2),
        3 => Some(Code::Numpad3),
        4 => Some(Code::Numpad4),
        5 => Some(Code::Numpad5),
        6 => Some(Code::Numpad6),
        7 => Some(Code::Numpad7),
        8 => Some(Code::Numpad8),
        9 => Some(Code::Numpad9),
        _ => None,
    }
}

fn char_to_code(ch: char) -> Option<Code> {
    match ch.to_ascii_lowercase() {
        'a' => Some(Code::KeyA),
        'b' => Some(Code::KeyB),
        'c' => Some(Code::KeyC),
        'd' => Some(Code::KeyD),
        'e' => Some(Code::KeyE),
        'f' => Some(Code::KeyF),
        'g' => Some(Code::KeyG),
        'h' => Some(Code::KeyH),
        'i' => Some(Code::KeyI),
        'j' => Some(Code::KeyJ),
        'k' => Some(Code::KeyK),
        'l' => Some(Code::KeyL),
        'm' => Some(Code::KeyM),
        'n' => Some(Code::KeyN),
        'o' => Some(Code::KeyO),
        'p' => Some(Code::KeyP),
        'q' => Some(Code::KeyQ),
        'r' => Some(Code::KeyR),
        's' => Some(Code::KeyS),
        't' => Some(Code::KeyT),
        'u' => Some(Code::KeyU),
        'v' => Some(Code::KeyV),
        'w' => Some(Code::KeyW),
        'x' => Some(Code::KeyX),
        'y' => Some(Code::KeyY),
        'z' => Some(Code::KeyZ),
        '0' => Some(Code::Digit0),
        '1' => Some(Code::Digit1),
        '2' => Some(Code::Digit2),
        '3' => Some(Code::Digit3),
        '4' => Some(Code::Digit4),
        '5' => Some(Code::Digit5),
        '6' => Some(Code::Digit6),
        '7' => Some(Code::Digit7),
        '8' => Some(Code::Digit8),
        '9' => Some(Code::Digit9),
        '-' => Some(Code::Minus),
        '=' => Some(Code::Equal),
        ',' => Some(Code::Comma),
        '.' => Some(Code::Period),
        '/' => Some(Code::Slash),
        ';' => Some(Code::Semicolon),
        '\'' => Some(Code::Quote),
        '[' => Some(Code::BracketLeft),
        ']' => Some(Code::BracketRight),
        '\\' => Some(Code::Backslash),
        '`' => Some(Code::Backquote),
        _ => None, // No physical key for this character
    }
}
