use crate::automation::Command;
use crate::utils::keycode::parse_hotkey_name;
use anyhow::{Context, Result};
use global_hotkey::{
    hotkey::HotKey, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
};
use log::{info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

/// Hotkey id to command lookup, shared with the listener thread
pub type HotkeyTable = Arc<Mutex<HashMap<u32, Command>>>;

/// A configured hotkey name and the command it triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub setting: &'static str,
    pub key_name: String,
    pub command: Command,
}

pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
    table: HotkeyTable,
}

impl HotkeyManager {
    pub fn new() -> Result<Self> {
        let manager =
            GlobalHotKeyManager::new().context("Failed to create global hotkey manager")?;

        Ok(Self {
            manager,
            registered: Vec::new(),
            table: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn table(&self) -> HotkeyTable {
        self.table.clone()
    }

    /// Register every binding, skipping (and logging) ones that fail
    ///
    /// Returns the number of bindings registered.
    pub fn register_bindings(&mut self, bindings: &[Binding]) -> usize {
        let mut count = 0;
        for binding in bindings {
            match self.register(binding) {
                Ok(()) => count += 1,
                Err(e) => warn!("Hotkey {} not registered: {:#}", binding.setting, e),
            }
        }
        count
    }

    fn register(&mut self, binding: &Binding) -> Result<()> {
        let code = parse_hotkey_name(&binding.key_name)
            .with_context(|| format!("'{}' is not a keyboard key", binding.key_name))?;
        let hotkey = HotKey::new(None, code);

        self.manager
            .register(hotkey)
            .with_context(|| format!("Failed to register '{}'", binding.key_name))?;

        self.registered.push(hotkey);
        self.table.lock().insert(hotkey.id(), binding.command);
        info!(
            "Hotkey registered: {} -> {:?}",
            binding.key_name, binding.command
        );
        Ok(())
    }

    /// Unregister all hotkeys
    pub fn unregister_all(&mut self) {
        for hotkey in self.registered.drain(..) {
            if let Err(e) = self.manager.unregister(hotkey) {
                warn!("Failed to unregister hotkey {}: {}", hotkey.id(), e);
            }
        }
        self.table.lock().clear();
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        self.unregister_all();
    }
}

/// Forward hotkey presses as commands until the receiving side goes away
pub fn spawn_listener(table: HotkeyTable, commands: Sender<Command>) -> Result<()> {
    thread::Builder::new()
        .name("hotkey-listener".to_string())
        .spawn(move || {
            let receiver = GlobalHotKeyEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if event.state != HotKeyState::Pressed {
                    continue;
                }
                let Some(command) = table.lock().get(&event.id).copied() else {
                    continue;
                };
                info!("Hotkey triggered: {:?}", command);
                if commands.send(command).is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn hotkey listener thread")?;
    Ok(())
}
