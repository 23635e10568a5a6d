// WestTek Tray App - pick a script, start/stop/pause it from the tray menu
// Hotkeys keep working while the menu is closed

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tray_icon::menu::{CheckMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::TrayIconBuilder;
use westtek::app_state::{Phase, StopReason};
use westtek::automation::{Command, Platform, Variant};
use westtek::config_file::ConfigStore;
use westtek::constants::{CONTROLLER_POLL_MS, NOTIFICATION_TIMEOUT_MS};
use westtek::WestTekCore;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting WestTek Tray App v{}", VERSION);

    let store = ConfigStore::resolve(None)?;
    // The script exit hotkey ends a run; only Quit closes the tray
    let mut core = WestTekCore::new(store, Platform::system())
        .context("Failed to initialize WestTek")?
        .stay_resident();

    // Create event loop for tray app
    let event_loop = EventLoopBuilder::new().build();

    let (tx, rx) = mpsc::channel();
    match core.start_hotkeys() {
        Ok(()) => core
            .start_hotkey_listener_thread(tx)
            .context("Failed to start hotkey listener")?,
        Err(e) => warn!("Hotkeys unavailable, use the menu: {:#}", e),
    }

    // Build tray menu
    let variant_items: Vec<(Variant, CheckMenuItem)> = Variant::ALL
        .into_iter()
        .map(|v| (v, CheckMenuItem::new(v.name(), true, v == core.variant(), None)))
        .collect();
    let start_item = MenuItem::new("Start", true, None);
    let stop_item = MenuItem::new("Stop", false, None);
    let pause_item = MenuItem::new("Pause", false, None);
    let reload_item = MenuItem::new("Reload Settings", true, None);
    let status_item = MenuItem::new(core.state.status_line(), false, None);
    let quit_item = MenuItem::new("Quit", true, None);

    let menu = Menu::new();
    for (_, item) in &variant_items {
        menu.append(item).context("Failed to add script menu item")?;
    }
    menu.append(&PredefinedMenuItem::separator())
        .context("Failed to add separator")?;
    menu.append(&start_item).context("Failed to add start menu item")?;
    menu.append(&stop_item).context("Failed to add stop menu item")?;
    menu.append(&pause_item).context("Failed to add pause menu item")?;
    menu.append(&reload_item).context("Failed to add reload menu item")?;
    menu.append(&PredefinedMenuItem::separator())
        .context("Failed to add separator")?;
    menu.append(&status_item).context("Failed to add status menu item")?;
    menu.append(&quit_item).context("Failed to add quit menu item")?;

    // Create tray icon
    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip(format!("WestTek - {}", core.state.status_line()))
        .with_icon(create_icon(Phase::Idle, false)?)
        .build()
        .context("Failed to create tray icon")?;

    info!("Tray icon created, running event loop");

    // Clone IDs for event handling
    let start_id = start_item.id().clone();
    let stop_id = stop_item.id().clone();
    let pause_id = pause_item.id().clone();
    let reload_id = reload_item.id().clone();
    let quit_id = quit_item.id().clone();

    let mut last_status = (String::new(), false);
    let mut last_look = (Phase::Idle, false);

    // Run event loop
    event_loop.run(move |_event, _, control_flow| {
        *control_flow =
            ControlFlow::WaitUntil(Instant::now() + Duration::from_millis(CONTROLLER_POLL_MS));

        // Handle menu events
        while let Ok(event) = MenuEvent::receiver().try_recv() {
            let event_id = event.id;
            let command = if event_id == start_id {
                Some(Command::Start)
            } else if event_id == stop_id {
                Some(Command::Stop)
            } else if event_id == pause_id {
                Some(Command::TogglePause)
            } else if event_id == reload_id {
                Some(Command::Reload)
            } else if event_id == quit_id {
                info!("Quit menu item clicked, exiting");
                core.exit();
                None
            } else {
                if let Some((variant, _)) =
                    variant_items.iter().find(|(_, item)| *item.id() == event_id)
                {
                    if let Err(e) = core.select_variant(*variant) {
                        error!("Failed to select {}: {:#}", variant.name(), e);
                    }
                }
                None
            };
            if let Some(command) = command {
                handle_command(&mut core, command);
            }
        }

        // Handle hotkey commands
        while let Ok(command) = rx.try_recv() {
            handle_command(&mut core, command);
        }

        if let Some(reason) = core.reap() {
            notify_finished(core.variant(), core.state.cycles_completed(), reason);
        }

        if core.state.should_exit_and_clear() {
            *control_flow = ControlFlow::Exit;
            return;
        }

        // Refresh menu and icon when the status or worker presence changed
        let status = core.status_snapshot();
        if status != last_status {
            let (ref line, running) = status;
            let selected = core.variant();
            for (variant, item) in &variant_items {
                item.set_checked(*variant == selected);
            }
            start_item.set_enabled(!running);
            stop_item.set_enabled(running);
            pause_item.set_enabled(running);
            pause_item.set_text(if core.state.is_paused() { "Resume" } else { "Pause" });
            status_item.set_text(line);
            if let Err(e) = tray.set_tooltip(Some(format!("WestTek - {}", line))) {
                error!("Failed to update tray tooltip: {}", e);
            }
            last_status = status;
        }

        let look = (core.state.phase(), core.state.is_paused());
        if look != last_look {
            match create_icon(look.0, look.1) {
                Ok(icon) => {
                    if let Err(e) = tray.set_icon(Some(icon)) {
                        error!("Failed to update tray icon: {}", e);
                    }
                }
                Err(e) => error!("{:#}", e),
            }
            last_look = look;
        }
    });
}

fn handle_command(core: &mut WestTekCore, command: Command) {
    if let Err(e) = core.dispatch(command) {
        error!("{:?} failed: {:#}", command, e);
        show_notification(&format!("{:?} failed", command), &format!("{:#}", e));
    }
}

fn notify_finished(variant: Variant, cycles: u64, reason: StopReason) {
    info!("{} finished after {} cycle(s): {}", variant.name(), cycles, reason);
    show_notification(
        variant.name(),
        &format!("Finished after {} cycle(s): {}", cycles, reason),
    );
}

fn show_notification(summary: &str, body: &str) {
    let result = notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .timeout(notify_rust::Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS))
        .show();
    if let Err(e) = result {
        warn!("Failed to show notification: {}", e);
    }
}

/// Solid 32x32 square colored by phase
fn create_icon(phase: Phase, paused: bool) -> Result<tray_icon::Icon> {
    let color: [u8; 4] = match (phase, paused) {
        (Phase::Idle, _) => [128, 128, 128, 255],
        (_, true) => [255, 191, 0, 255],
        (Phase::Countdown, false) => [255, 255, 0, 255],
        (Phase::Acting, false) => [0, 200, 0, 255],
        (Phase::Waiting, false) => [0, 120, 255, 255],
        (Phase::Resetting, false) => [255, 120, 0, 255],
    };

    let size = 32;
    let rgba: Vec<u8> = color
        .iter()
        .copied()
        .cycle()
        .take((size * size * 4) as usize)
        .collect();

    tray_icon::Icon::from_rgba(rgba, size, size).context("Failed to create icon")
}
