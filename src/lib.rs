// Library interface for WestTek
// This allows tests and both binaries to share the controller

pub mod app_state;
pub mod automation;
pub mod config;
pub mod config_file;
pub mod constants;
pub mod input;
pub mod settings;
pub mod utils;

use anyhow::{Context, Result};
use app_state::{AppState, StopReason};
use automation::timing::Timings;
use automation::{bindings_for, Command, Platform, RunConfig, Variant, Worker};
use config_file::{ConfigStore, Profiles};
use input::hotkeys::{self, HotkeyManager, HotkeyTable};
use log::{info, warn};
use std::sync::mpsc::Sender;

/// Controller shared between the CLI and the tray app
///
/// Owns the loaded settings, the selected script, the hotkey registrations
/// and at most one worker.
pub struct WestTekCore {
    pub state: AppState,
    store: ConfigStore,
    profiles: Profiles,
    platform: Platform,
    timings: Timings,
    process_override: Option<String>,
    hotkey_manager: Option<HotkeyManager>,
    worker: Option<Worker>,
    exit_quits: bool,
}

impl WestTekCore {
    /// Load every script's settings from `store`
    pub fn new(store: ConfigStore, platform: Platform) -> Result<Self> {
        let profiles = store
            .load_profiles()
            .context("Failed to load settings")?;
        info!("Settings loaded from {}", store.dir().display());

        Ok(Self {
            state: AppState::new(),
            store,
            profiles,
            platform,
            timings: Timings::default(),
            process_override: config::parse_game_process_override(),
            hotkey_manager: None,
            worker: None,
            exit_quits: true,
        })
    }

    /// Replace the fixed script delays (tests use `Timings::instant`)
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Keep the controller open when a script's exit hotkey is pressed
    ///
    /// `Command::Exit` then only ends the session; `exit` still quits.
    pub fn stay_resident(mut self) -> Self {
        self.exit_quits = false;
        self
    }

    /// Watch this process instead of the configured one
    pub fn set_process_override(&mut self, name: Option<String>) {
        if let Some(ref name) = name {
            info!("Watching process {} for every script", name);
        }
        self.process_override = name;
    }

    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn variant(&self) -> Variant {
        self.state.variant()
    }

    /// Process name the selected script watches
    pub fn game_process(&self) -> String {
        self.process_override
            .clone()
            .unwrap_or_else(|| self.profiles.game_process(self.variant()).to_string())
    }

    pub fn is_game_running(&self) -> bool {
        self.platform.probe.is_running(&self.game_process())
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Status line plus whether a worker is still held
    ///
    /// A run reports Idle before its worker is reaped, so menus keyed on the
    /// line alone would miss the reap.
    pub fn status_snapshot(&self) -> (String, bool) {
        (self.state.status_line(), self.is_running())
    }

    /// Switch scripts, stopping a running one and swapping hotkeys
    pub fn select_variant(&mut self, variant: Variant) -> Result<()> {
        if variant == self.variant() {
            return Ok(());
        }
        self.stop();
        self.state.set_variant(variant);
        info!("Selected {}", variant.name());
        if self.hotkey_manager.is_some() {
            self.register_hotkeys();
        }
        Ok(())
    }

    /// Create the hotkey manager and register the selected script's bindings
    ///
    /// Must be called on the thread that runs the event loop.
    pub fn start_hotkeys(&mut self) -> Result<()> {
        let manager = HotkeyManager::new().context("Failed to create hotkey manager")?;
        self.hotkey_manager = Some(manager);
        self.register_hotkeys();
        Ok(())
    }

    fn register_hotkeys(&mut self) {
        let bindings = bindings_for(self.variant(), &self.profiles);
        let Some(manager) = self.hotkey_manager.as_mut() else {
            return;
        };
        manager.unregister_all();
        let count = manager.register_bindings(&bindings);
        self.state.set_hotkeys_registered(count > 0);
        if count == 0 {
            warn!("No hotkeys registered; use the menu or Ctrl+C");
        } else {
            info!("{} of {} hotkeys registered", count, bindings.len());
        }
    }

    fn unregister_hotkeys(&mut self) {
        if let Some(manager) = self.hotkey_manager.as_mut() {
            manager.unregister_all();
            self.state.set_hotkeys_registered(false);
        }
    }

    /// Lookup table for the hotkey listener thread
    pub fn hotkey_table(&self) -> Option<HotkeyTable> {
        self.hotkey_manager.as_ref().map(HotkeyManager::table)
    }

    /// Background thread turning hotkey presses into commands on `commands`
    pub fn start_hotkey_listener_thread(&self, commands: Sender<Command>) -> Result<()> {
        match self.hotkey_table() {
            Some(table) => hotkeys::spawn_listener(table, commands),
            None => anyhow::bail!("Hotkeys are not started"),
        }
    }

    /// Handle one command
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Start => {
                self.start()?;
            }
            Command::Stop => {
                self.stop();
            }
            Command::TogglePause => self.toggle_pause(),
            Command::Reload => self.reload()?,
            Command::Exit if self.exit_quits => self.exit(),
            Command::Exit => self.end_session(),
        }
        Ok(())
    }

    /// Start the selected script. Returns false if one is already running.
    pub fn start(&mut self) -> Result<bool> {
        self.reap();
        if let Some(ref worker) = self.worker {
            info!("{} is already running", worker.variant().name());
            return Ok(false);
        }

        let variant = self.variant();
        let config = RunConfig {
            platform: self.platform.clone(),
            timings: self.timings,
            process_name: self.game_process(),
        };
        let worker = Worker::spawn(variant, &self.profiles, config, self.state.clone())?;
        self.worker = Some(worker);
        Ok(true)
    }

    /// Stop the running script and wait for it to release its keys
    pub fn stop(&mut self) -> Option<StopReason> {
        let worker = self.worker.take()?;
        info!("Stopping {}", worker.variant().name());
        Some(worker.stop())
    }

    pub fn toggle_pause(&mut self) {
        match self.worker {
            Some(ref worker) if !worker.is_finished() => worker.toggle_pause(),
            _ => info!("Nothing running to pause"),
        }
    }

    /// Stop, reread every settings file and re-register hotkeys
    pub fn reload(&mut self) -> Result<()> {
        info!("Reloading settings");
        self.stop();
        self.unregister_hotkeys();
        let loaded = self.store.load_profiles();
        if let Ok(ref profiles) = loaded {
            self.profiles = profiles.clone();
        }
        // Previous settings stay bound if the reload failed
        if self.hotkey_manager.is_some() {
            self.register_hotkeys();
        }
        loaded.map(|_| ()).context("Failed to reload settings")
    }

    /// Stop the running script but keep hotkeys and the event loop alive
    pub fn end_session(&mut self) {
        if self.stop().is_some() {
            info!("{} session ended", self.variant().name());
        }
    }

    /// Stop, unregister hotkeys and ask the event loop to quit
    pub fn exit(&mut self) {
        info!("Exit requested");
        self.stop();
        self.unregister_hotkeys();
        self.state.request_exit();
    }

    /// Collect a worker that finished on its own
    pub fn reap(&mut self) -> Option<StopReason> {
        if !self.worker.as_ref().is_some_and(Worker::is_finished) {
            return None;
        }
        self.worker.take().map(Worker::join)
    }
}

impl Drop for WestTekCore {
    fn drop(&mut self) {
        self.stop();
    }
}
