// WestTek CLI - run a script from the terminal and edit its settings
// Hotkeys control the run; `config` subcommands replace the settings window

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use westtek::automation::{bindings_for, Command, Platform, Variant};
use westtek::config_file::{ConfigStore, Profiles};
use westtek::constants::CONTROLLER_POLL_MS;
use westtek::input::{AlwaysRunning, InputSink, LogSink};
use westtek::WestTekCore;

/// Hotkey-driven input automation for WestTek runs
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Hotkey-driven input automation for WestTek runs",
    long_about = "Hotkey-driven input automation for WestTek runs.

Scripts:
 - primary     main character with AFK alts (shooting, OPK, elevator)
 - alt         AFK alt (walk pattern and interact presses)
 - timed-run   single player (no countdown, no waiting on others)

Each script reads its own JSON settings file from:
  ~/Documents/WestTekAuto/
Override with --config-dir or WESTTEK_CONFIG_DIR.

HOTKEYS (defaults):
  primary / timed-run:  F3 start, F1 pause/resume, F4 reload settings, F2 exit
  alt:                  F3 start, F2 exit"
)]
struct Args {
    /// Folder holding the settings files
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List the available scripts
    List,

    /// Run a script until its exit hotkey or Ctrl+C
    Run {
        /// primary, alt or timed-run
        variant: Variant,

        /// Start immediately instead of waiting for the start hotkey
        #[arg(long)]
        start: bool,

        /// Log key presses instead of sending them
        #[arg(long)]
        dry_run: bool,

        /// Do not require the game process to be running
        #[arg(long)]
        no_process_check: bool,
    },

    /// Show or edit script settings
    #[command(subcommand)]
    Config(ConfigCmd),
}

#[derive(Subcommand, Debug)]
enum ConfigCmd {
    /// Print the settings folder
    Path,

    /// Print every setting with its default
    Show { variant: Variant },

    /// Change settings: westtek config set primary shots=80 use_key=f
    Set {
        variant: Variant,

        /// key=value pairs
        #[arg(required = true)]
        assignments: Vec<String>,
    },

    /// Restore settings to their defaults
    Reset {
        variant: Variant,

        /// Settings to reset
        keys: Vec<String>,

        /// Reset every setting of the script
        #[arg(long, conflicts_with = "keys")]
        all: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let store = ConfigStore::resolve(args.config_dir)?;

    match args.command {
        Cmd::List => {
            list_variants();
            Ok(())
        }
        Cmd::Config(cmd) => run_config(&store, cmd),
        Cmd::Run {
            variant,
            start,
            dry_run,
            no_process_check,
        } => run_script(store, variant, start, dry_run, no_process_check),
    }
}

fn list_variants() {
    for variant in Variant::ALL {
        println!("{:<10} {}", variant.id(), variant.name());
        println!("           {}", variant.description());
    }
}

fn run_config(store: &ConfigStore, cmd: ConfigCmd) -> Result<()> {
    match cmd {
        ConfigCmd::Path => {
            println!("{}", store.dir().display());
            Ok(())
        }
        ConfigCmd::Show { variant } => {
            let profiles = store.load_profiles()?;
            print_settings(store, &profiles, variant);
            Ok(())
        }
        ConfigCmd::Set {
            variant,
            assignments,
        } => {
            let mut profiles = store.load_profiles()?;
            let mut changed = 0;
            for assignment in &assignments {
                let Some((key, value)) = assignment.split_once('=') else {
                    warn!("Expected key=value, got '{}'", assignment);
                    continue;
                };
                let key = key.trim();
                match profiles.set_from_str(variant, key, value) {
                    Ok(()) => {
                        changed += 1;
                        if let Some(value) = profiles.get(variant, key) {
                            println!("{} = {}", key, value);
                        }
                    }
                    Err(e) => warn!("{}", profiles.rejected_edit_message(variant, key, &e)),
                }
            }
            store
                .save_variant(&profiles, variant)
                .context("Could not save settings")?;
            println!(
                "{} setting(s) saved to {}",
                changed,
                store.path_for(variant).display()
            );
            Ok(())
        }
        ConfigCmd::Reset { variant, keys, all } => {
            let mut profiles = store.load_profiles()?;
            if all {
                profiles.reset_all(variant);
                println!("All {} settings reset to defaults", variant.name());
            } else if keys.is_empty() {
                anyhow::bail!("Name at least one setting to reset, or pass --all");
            } else {
                for key in &keys {
                    match profiles.reset_field(variant, key) {
                        Ok(default) => println!("{} = {}", key, default),
                        Err(e) => warn!("{}", e),
                    }
                }
            }
            store
                .save_variant(&profiles, variant)
                .context("Could not save settings")?;
            Ok(())
        }
    }
}

fn print_settings(store: &ConfigStore, profiles: &Profiles, variant: Variant) {
    println!("{} ({})", variant.name(), store.path_for(variant).display());
    let mut group = "";
    for field in Profiles::fields(variant) {
        if field.group != group {
            group = field.group;
            println!("\n[{}]", group);
        }
        let value = profiles
            .get(variant, field.key)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let default = Profiles::default_value(variant, field.key)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let marker = if value == default { "" } else { " *" };
        println!(
            "  {:<20} {:<16} (default {}){}",
            field.key, value, default, marker
        );
    }
}

fn run_script(
    store: ConfigStore,
    variant: Variant,
    start: bool,
    dry_run: bool,
    no_process_check: bool,
) -> Result<()> {
    info!("Starting {}", variant.name());

    let mut platform = Platform::system();
    if dry_run {
        info!("Dry run: key presses will only be logged");
        platform.sink = Arc::new(|| -> Result<Box<dyn InputSink>> { Ok(Box::new(LogSink)) });
    }
    if no_process_check {
        platform.probe = Arc::new(AlwaysRunning);
    }

    let mut core = WestTekCore::new(store, platform).context("Failed to initialize WestTek")?;
    core.select_variant(variant)?;

    if !core.is_game_running() {
        warn!(
            "{} is not running; a started script will stop immediately",
            core.game_process()
        );
    }

    // The hotkey manager must live on the event loop thread
    let event_loop = EventLoopBuilder::new().build();
    let (tx, rx) = mpsc::channel();
    match core.start_hotkeys() {
        Ok(()) => core
            .start_hotkey_listener_thread(tx)
            .context("Failed to start hotkey listener")?,
        Err(e) => warn!("Hotkeys unavailable: {:#}", e),
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, interrupted.clone())
            .context("Failed to install signal handler")?;
    }

    for binding in bindings_for(variant, core.profiles()) {
        info!("  {:<6} {:?}", binding.key_name.to_uppercase(), binding.command);
    }
    if start {
        info!("Starting immediately (--start)");
        core.dispatch(Command::Start)?;
    } else {
        info!("Waiting for the start hotkey - press Ctrl+C to quit");
    }

    event_loop.run(move |_event, _, control_flow| {
        *control_flow =
            ControlFlow::WaitUntil(Instant::now() + Duration::from_millis(CONTROLLER_POLL_MS));

        while let Ok(command) = rx.try_recv() {
            if let Err(e) = core.dispatch(command) {
                error!("{:?} failed: {:#}", command, e);
            }
        }

        if interrupted.swap(false, Ordering::SeqCst) {
            info!("Interrupted");
            core.exit();
        }

        if let Some(reason) = core.reap() {
            info!(
                "{} finished after {} cycle(s): {}",
                core.variant().name(),
                core.state.cycles_completed(),
                reason
            );
        }

        if core.state.should_exit_and_clear() {
            info!("CLI shutdown complete");
            *control_flow = ControlFlow::Exit;
        }
    });
}
