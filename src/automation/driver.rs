//! Execution context shared by every script
//!
//! The driver owns the input sink, the signal receiver and the set of keys
//! currently held down. All waiting goes through `sleep`, which is a
//! `recv_timeout` on the signal channel: a stop ends the run at the current
//! suspension point and a pause toggle suspends it there.

use super::timing::{countdown_remaining, Clock, Timings};
use super::Signal;
use crate::app_state::{AppState, Phase};
use crate::constants::SYNC_SECOND;
use crate::input::{InputSink, ProcessProbe};
use crate::utils::keycode::{key_name, KeyTarget};
use crate::utils::sample_millis;
use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Why a script stopped emitting actions
#[derive(Debug, Error)]
pub enum Halt {
    #[error("stop requested")]
    Stopped,
    #[error("game process {0} is not running")]
    ProcessMissing(String),
    #[error(transparent)]
    Input(#[from] anyhow::Error),
}

pub type Step = Result<(), Halt>;

pub struct Driver {
    sink: Box<dyn InputSink>,
    signals: Receiver<Signal>,
    probe: Arc<dyn ProcessProbe>,
    clock: Arc<dyn Clock>,
    pub timings: Timings,
    state: AppState,
    process_name: String,
    held: Vec<KeyTarget>,
    rng: ThreadRng,
}

impl Driver {
    pub fn new(
        sink: Box<dyn InputSink>,
        signals: Receiver<Signal>,
        probe: Arc<dyn ProcessProbe>,
        clock: Arc<dyn Clock>,
        timings: Timings,
        state: AppState,
        process_name: String,
    ) -> Self {
        Self {
            sink,
            signals,
            probe,
            clock,
            timings,
            state,
            process_name,
            held: Vec::new(),
            rng: rand::thread_rng(),
        }
    }

    pub fn set_phase(&self, phase: Phase) {
        self.state.set_phase(phase);
    }

    pub fn cycle_done(&self) {
        let cycles = self.state.increment_cycles();
        info!("Cycle {} complete", cycles);
    }

    /// Random duration from an inclusive millisecond range
    pub fn sample(&mut self, min: u64, max: u64) -> u64 {
        sample_millis(&mut self.rng, min, max)
    }

    pub fn ensure_process(&self) -> Step {
        if self.probe.is_running(&self.process_name) {
            Ok(())
        } else {
            warn!("{} is not running, stopping", self.process_name);
            Err(Halt::ProcessMissing(self.process_name.clone()))
        }
    }

    pub fn press(&mut self, target: KeyTarget) -> Step {
        self.sink.press(target)?;
        if !self.held.contains(&target) {
            self.held.push(target);
        }
        Ok(())
    }

    pub fn release(&mut self, target: KeyTarget) -> Step {
        self.sink.release(target)?;
        self.held.retain(|k| *k != target);
        Ok(())
    }

    /// Press, hold for `hold_ms`, release
    pub fn tap(&mut self, target: KeyTarget, hold_ms: u64) -> Step {
        self.press(target)?;
        self.sleep(hold_ms)?;
        self.release(target)
    }

    /// Wait for `ms`, honouring stop and pause signals
    ///
    /// Time spent paused does not count against `ms`.
    pub fn sleep(&mut self, ms: u64) -> Step {
        let mut remaining = Duration::from_millis(ms);
        loop {
            let started = Instant::now();
            match self.signals.recv_timeout(remaining) {
                Err(RecvTimeoutError::Timeout) => return Ok(()),
                Err(RecvTimeoutError::Disconnected) | Ok(Signal::Stop) => {
                    return Err(Halt::Stopped)
                }
                Ok(Signal::TogglePause) => {
                    remaining = remaining.saturating_sub(started.elapsed());
                    self.pause()?;
                }
            }
        }
    }

    /// Suspend until the next pause toggle, holding no keys meanwhile
    fn pause(&mut self) -> Step {
        let suspended = self.held.clone();
        self.release_all();
        self.state.set_paused(true);
        info!("Paused");

        let outcome = loop {
            match self.signals.recv() {
                Ok(Signal::TogglePause) => break Ok(()),
                Ok(Signal::Stop) | Err(_) => break Err(Halt::Stopped),
            }
        };
        self.state.set_paused(false);
        outcome?;

        info!("Resumed");
        for target in suspended {
            self.press(target)?;
        }
        Ok(())
    }

    /// Release every key still held, `release_gap` apart
    ///
    /// Failures are logged; this runs on the way out of a run.
    pub fn release_all(&mut self) {
        let held = std::mem::take(&mut self.held);
        for (i, target) in held.into_iter().enumerate() {
            if i > 0 && self.timings.release_gap > 0 {
                thread::sleep(Duration::from_millis(self.timings.release_gap));
            }
            if let Err(e) = self.sink.release(target) {
                warn!("Failed to release {}: {:#}", key_name(target), e);
            }
        }
    }

    /// Wait until the wall clock reaches the sync second
    pub fn countdown(&mut self) -> Step {
        self.set_phase(Phase::Countdown);
        loop {
            let second = self.clock.second_of_minute();
            if second == SYNC_SECOND {
                info!("Countdown complete");
                return Ok(());
            }
            let remaining = countdown_remaining(second);
            self.state.set_countdown_remaining(Some(remaining));
            debug!("Starting in {} seconds", remaining);
            self.sleep(self.timings.countdown_poll)?;
        }
    }

    /// Wait until `wait_ms` have passed since `cycle_start`
    pub fn wait_phase(&mut self, cycle_start: Instant, wait_ms: u64) -> Step {
        self.set_phase(Phase::Waiting);
        let target = Duration::from_millis(wait_ms);
        loop {
            let elapsed = cycle_start.elapsed();
            if elapsed >= target {
                return Ok(());
            }
            let left = (target - elapsed).as_millis() as u64;
            debug!("Waiting, {} ms left", left);
            self.sleep(left.clamp(1, self.timings.wait_poll.max(1)))?;
        }
    }
}
