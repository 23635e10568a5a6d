//! The automation scripts and the worker thread that runs them
//!
//! A run is one worker thread executing one script until it is told to stop
//! or the game process disappears. The controller talks to the worker only
//! through a `Signal` channel; the worker reports progress through
//! `AppState`.

pub mod driver;
pub mod elevator;
pub mod timing;
pub mod walk;

use crate::app_state::{AppState, StopReason};
use crate::config_file::Profiles;
use crate::input::hotkeys::Binding;
use crate::input::{EnigoSink, InputSink, ProcessProbe, SysinfoProbe};
use crate::utils::keycode::{parse_key_name, KeyTarget};
use anyhow::{anyhow, Context, Result};
use driver::{Driver, Halt};
use elevator::ElevatorScript;
use log::{error, info, warn};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use timing::{Clock, SystemClock, Timings};
use walk::WalkScript;

/// The three interchangeable scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Primary,
    Alt,
    TimedRun,
}

#[derive(Debug, Error)]
#[error("Unknown script '{0}' (expected primary, alt or timed-run)")]
pub struct UnknownVariant(String);

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Primary, Variant::Alt, Variant::TimedRun];

    pub fn id(self) -> &'static str {
        match self {
            Variant::Primary => "primary",
            Variant::Alt => "alt",
            Variant::TimedRun => "timed-run",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Primary => "PrimaryAltWestTek",
            Variant::Alt => "AltWestTek",
            Variant::TimedRun => "TimedRun",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Variant::Primary => "PrimaryAltWestTek is for your main character with AFK players. It handles shooting, OPK toggling, and elevator usage.",
            Variant::Alt => "AltWestTek is designed for AFK players. It performs automated movement patterns and key presses to keep your character active.",
            Variant::TimedRun => "TimedRun is optimized for single player mode. It focuses on efficient shooting and movement without waiting for other players.",
        }
    }

    /// Settings file name inside the settings folder
    pub fn file_name(self) -> &'static str {
        match self {
            Variant::Primary => "primary_config.json",
            Variant::Alt => "alt_config.json",
            Variant::TimedRun => "timed_run_config.json",
        }
    }

    pub fn has_countdown(self) -> bool {
        !matches!(self, Variant::TimedRun)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Variant::ALL
            .into_iter()
            .find(|v| v.id() == wanted || v.name().to_lowercase() == wanted)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Requests handled by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    TogglePause,
    Reload,
    Exit,
}

/// Requests delivered to a running worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Stop,
    TogglePause,
}

/// Hotkey bindings a variant listens for
pub fn bindings_for(variant: Variant, profiles: &Profiles) -> Vec<Binding> {
    let bind = |setting: &'static str, key_name: &str, command| Binding {
        setting,
        key_name: key_name.to_string(),
        command,
    };
    let elevator = |s: &crate::settings::ElevatorSettings| {
        vec![
            bind("pause_hotkey", &s.pause_hotkey, Command::TogglePause),
            bind("exit_hotkey", &s.exit_hotkey, Command::Exit),
            bind("start_hotkey", &s.start_hotkey, Command::Start),
            bind("reload_hotkey", &s.reload_hotkey, Command::Reload),
        ]
    };
    match variant {
        Variant::Primary => elevator(&profiles.primary),
        Variant::TimedRun => elevator(&profiles.timed_run),
        Variant::Alt => vec![
            bind("start_hotkey", &profiles.alt.start_hotkey, Command::Start),
            bind("stop_hotkey", &profiles.alt.stop_hotkey, Command::Exit),
        ],
    }
}

pub(crate) fn resolve_key(setting: &str, name: &str) -> Result<KeyTarget> {
    parse_key_name(name).ok_or_else(|| anyhow!("Invalid key name for {}: '{}'", setting, name))
}

/// Builds the input sink inside the worker thread
pub type SinkFactory = Arc<dyn Fn() -> Result<Box<dyn InputSink>> + Send + Sync>;

/// OS-facing collaborators of a run
#[derive(Clone)]
pub struct Platform {
    pub sink: SinkFactory,
    pub probe: Arc<dyn ProcessProbe>,
    pub clock: Arc<dyn Clock>,
}

impl Platform {
    /// Real input injection, process table and local clock
    pub fn system() -> Self {
        Self {
            sink: Arc::new(|| -> Result<Box<dyn InputSink>> { Ok(Box::new(EnigoSink::new()?)) }),
            probe: Arc::new(SysinfoProbe::new()),
            clock: Arc::new(SystemClock),
        }
    }
}

#[derive(Debug, Clone)]
enum Script {
    Elevator(ElevatorScript),
    Walk(WalkScript),
}

impl Script {
    fn build(variant: Variant, profiles: &Profiles) -> Result<Self> {
        let script = match variant {
            Variant::Primary => Script::Elevator(ElevatorScript::new(&profiles.primary, variant)?),
            Variant::TimedRun => {
                Script::Elevator(ElevatorScript::new(&profiles.timed_run, variant)?)
            }
            Variant::Alt => Script::Walk(WalkScript::new(&profiles.alt)?),
        };
        Ok(script)
    }

    fn run(&self, driver: &mut Driver) -> Halt {
        let outcome = match self {
            Script::Elevator(script) => script.run(driver),
            Script::Walk(script) => script.run(driver),
        };
        match outcome {
            Err(halt) => halt,
            Ok(()) => Halt::Stopped,
        }
    }
}

/// Everything a worker needs besides the script itself
pub struct RunConfig {
    pub platform: Platform,
    pub timings: Timings,
    pub process_name: String,
}

/// Handle to one running script
pub struct Worker {
    variant: Variant,
    signals: Sender<Signal>,
    handle: JoinHandle<StopReason>,
}

impl Worker {
    /// Validate the variant's keys and start its script on a new thread
    pub fn spawn(
        variant: Variant,
        profiles: &Profiles,
        config: RunConfig,
        state: AppState,
    ) -> Result<Self> {
        let script = Script::build(variant, profiles)
            .with_context(|| format!("Cannot start {}", variant.name()))?;
        let (tx, rx) = mpsc::channel();

        state.begin_run(variant);
        let thread_state = state.clone();
        let handle = thread::Builder::new()
            .name(format!("worker-{}", variant.id()))
            .spawn(move || {
                let RunConfig {
                    platform,
                    timings,
                    process_name,
                } = config;

                let sink = match (platform.sink)() {
                    Ok(sink) => sink,
                    Err(e) => {
                        error!("{}: {:#}", variant.name(), e);
                        thread_state.finish_run(StopReason::Failed);
                        return StopReason::Failed;
                    }
                };

                info!("{} started (watching {})", variant.name(), process_name);
                let mut driver = Driver::new(
                    sink,
                    rx,
                    platform.probe,
                    platform.clock,
                    timings,
                    thread_state.clone(),
                    process_name,
                );
                let halt = script.run(&mut driver);
                driver.release_all();

                let reason = match halt {
                    Halt::Stopped => StopReason::Requested,
                    Halt::ProcessMissing(_) => StopReason::ProcessMissing,
                    Halt::Input(ref e) => {
                        error!("{}: {:#}", variant.name(), e);
                        StopReason::Failed
                    }
                };
                let elapsed = thread_state.run_elapsed_secs().unwrap_or_default();
                info!("{} {} after {}s", variant.name(), reason, elapsed);
                thread_state.finish_run(reason);
                reason
            })
            .context("Failed to spawn worker thread")?;

        Ok(Self {
            variant,
            signals: tx,
            handle,
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn toggle_pause(&self) {
        if self.signals.send(Signal::TogglePause).is_err() {
            warn!("Worker already finished, pause ignored");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signal the worker to stop and wait for it
    pub fn stop(self) -> StopReason {
        let _ = self.signals.send(Signal::Stop);
        self.join()
    }

    /// Wait for the worker to finish on its own
    pub fn join(self) -> StopReason {
        match self.handle.join() {
            Ok(reason) => reason,
            Err(_) => {
                error!("{} worker panicked", self.variant.name());
                StopReason::Failed
            }
        }
    }
}
