//! Simulated key and mouse events
//!
//! Scripts press and release `KeyTarget`s through an `InputSink`. The real
//! sink drives enigo; the dry-run sink only logs what would be sent.

use crate::utils::keycode::{key_name, KeyTarget, MouseButton, NamedKey};
use anyhow::{Context, Result};
use enigo::{Button, Direction, Enigo, Key, Keyboard, Mouse, Settings};

/// Destination for simulated input events
pub trait InputSink {
    fn press(&mut self, target: KeyTarget) -> Result<()>;
    fn release(&mut self, target: KeyTarget) -> Result<()>;
}

/// Injects events into the OS input queue
pub struct EnigoSink {
    enigo: Enigo,
}

impl EnigoSink {
    pub fn new() -> Result<Self> {
        let enigo =
            Enigo::new(&Settings::default()).context("Failed to connect to the input system")?;
        Ok(Self { enigo })
    }

    fn send(&mut self, target: KeyTarget, direction: Direction) -> Result<()> {
        match target {
            KeyTarget::Mouse(button) => self
                .enigo
                .button(to_enigo_button(button), direction)
                .with_context(|| format!("Failed to send {:?} for {}", direction, key_name(target))),
            _ => {
                let key = to_enigo_key(target);
                self.enigo
                    .key(key, direction)
                    .with_context(|| format!("Failed to send {:?} for {}", direction, key_name(target)))
            }
        }
    }
}

impl InputSink for EnigoSink {
    fn press(&mut self, target: KeyTarget) -> Result<()> {
        self.send(target, Direction::Press)
    }

    fn release(&mut self, target: KeyTarget) -> Result<()> {
        self.send(target, Direction::Release)
    }
}

/// Logs events instead of sending them (`--dry-run`)
#[derive(Debug, Default)]
pub struct LogSink;

impl InputSink for LogSink {
    fn press(&mut self, target: KeyTarget) -> Result<()> {
        log::info!("[dry-run] press {}", key_name(target));
        Ok(())
    }

    fn release(&mut self, target: KeyTarget) -> Result<()> {
        log::info!("[dry-run] release {}", key_name(target));
        Ok(())
    }
}

fn to_enigo_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        MouseButton::Middle => Button::Middle,
    }
}

fn to_enigo_key(target: KeyTarget) -> Key {
    match target {
        KeyTarget::Char(ch) => Key::Unicode(ch),
        KeyTarget::Named(named) => named_to_key(named),
        // Mouse buttons are routed to `button` before reaching here
        KeyTarget::Mouse(_) => Key::Space,
    }
}

fn named_to_key(named: NamedKey) -> Key {
    match named {
        NamedKey::F(n) => function_key(n),
        NamedKey::Escape => Key::Escape,
        NamedKey::Tab => Key::Tab,
        NamedKey::CapsLock => Key::CapsLock,
        NamedKey::Shift => Key::Shift,
        NamedKey::LeftShift => Key::LShift,
        NamedKey::RightShift => Key::RShift,
        NamedKey::Control => Key::Control,
        NamedKey::LeftControl => Key::LControl,
        NamedKey::RightControl => Key::RControl,
        NamedKey::Alt => Key::Alt,
        NamedKey::LeftAlt => raw::left_alt(),
        NamedKey::RightAlt => raw::right_alt(),
        NamedKey::Space => Key::Space,
        NamedKey::Enter => Key::Return,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,
        NamedKey::Up => Key::UpArrow,
        NamedKey::Down => Key::DownArrow,
        NamedKey::Left => Key::LeftArrow,
        NamedKey::Right => Key::RightArrow,
        NamedKey::Insert
        | NamedKey::NumLock
        | NamedKey::Numpad(_)
        | NamedKey::NumpadMultiply
        | NamedKey::NumpadAdd
        | NamedKey::NumpadSubtract
        | NamedKey::NumpadDivide => Key::Other(raw::code(named)),
    }
}

fn function_key(n: u8) -> Key {
    match n {
        1 => Key::F1,
        2 => Key::F2,
        3 => Key::F3,
        4 => Key::F4,
        5 => Key::F5,
        6 => Key::F6,
        7 => Key::F7,
        8 => Key::F8,
        9 => Key::F9,
        10 => Key::F10,
        11 => Key::F11,
        _ => Key::F12,
    }
}

/// Raw platform codes for keys enigo has no portable variant for
mod raw {
    use crate::utils::keycode::NamedKey;
    use enigo::Key;

    #[cfg(target_os = "windows")]
    pub fn left_alt() -> Key {
        Key::LMenu
    }

    #[cfg(target_os = "windows")]
    pub fn right_alt() -> Key {
        Key::RMenu
    }

    #[cfg(target_os = "macos")]
    pub fn left_alt() -> Key {
        Key::Option
    }

    #[cfg(target_os = "macos")]
    pub fn right_alt() -> Key {
        Key::ROption
    }

    /// enigo sends Alt_L for the generic alt
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    pub fn left_alt() -> Key {
        Key::Alt
    }

    /// Alt_R keysym
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    pub fn right_alt() -> Key {
        Key::Other(0xffea)
    }

    /// Windows virtual-key codes
    #[cfg(target_os = "windows")]
    pub fn code(named: NamedKey) -> u32 {
        match named {
            NamedKey::Insert => 0x2D,
            NamedKey::NumLock => 0x90,
            NamedKey::Numpad(d) => 0x60 + u32::from(d),
            NamedKey::NumpadMultiply => 0x6A,
            NamedKey::NumpadAdd => 0x6B,
            NamedKey::NumpadSubtract => 0x6D,
            NamedKey::NumpadDivide => 0x6F,
            _ => 0,
        }
    }

    /// macOS virtual key codes
    #[cfg(target_os = "macos")]
    pub fn code(named: NamedKey) -> u32 {
        match named {
            NamedKey::Insert => 0x72,
            NamedKey::NumLock => 0x47,
            NamedKey::Numpad(d) => match d {
                0 => 0x52,
                1 => 0x53,
                2 => 0x54,
                3 => 0x55,
                4 => 0x56,
                5 => 0x57,
                6 => 0x58,
                7 => 0x59,
                8 => 0x5B,
                _ => 0x5C,
            },
            NamedKey::NumpadMultiply => 0x43,
            NamedKey::NumpadAdd => 0x45,
            NamedKey::NumpadSubtract => 0x4E,
            NamedKey::NumpadDivide => 0x4B,
            _ => 0,
        }
    }

    /// X11 keysyms
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    pub fn code(named: NamedKey) -> u32 {
        match named {
            NamedKey::Insert => 0xff63,
            NamedKey::NumLock => 0xff7f,
            NamedKey::Numpad(d) => 0xffb0 + u32::from(d),
            NamedKey::NumpadMultiply => 0xffaa,
            NamedKey::NumpadAdd => 0xffab,
            NamedKey::NumpadSubtract => 0xffad,
            NamedKey::NumpadDivide => 0xffaf,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_keys_use_raw_codes() {
        for d in 0..=9 {
            assert!(matches!(
                named_to_key(NamedKey::Numpad(d)),
                Key::Other(code) if code != 0
            ));
        }
        assert!(matches!(named_to_key(NamedKey::Insert), Key::Other(_)));
    }

    #[test]
    fn test_modifier_sides_are_kept() {
        assert_eq!(named_to_key(NamedKey::RightShift), Key::RShift);
        assert_eq!(named_to_key(NamedKey::RightControl), Key::RControl);
        assert_eq!(named_to_key(NamedKey::LeftControl), Key::LControl);
        assert_ne!(
            named_to_key(NamedKey::LeftAlt),
            named_to_key(NamedKey::RightAlt)
        );
    }

    #[test]
    fn test_function_keys_map() {
        assert_eq!(named_to_key(NamedKey::F(1)), Key::F1);
        assert_eq!(named_to_key(NamedKey::F(12)), Key::F12);
    }

    #[test]
    fn test_log_sink_accepts_everything() {
        let mut sink = LogSink;
        sink.press(KeyTarget::Mouse(MouseButton::Left)).unwrap();
        sink.release(KeyTarget::Char('e')).unwrap();
    }
}
