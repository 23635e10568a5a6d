//! Shoot, toggle OPK, reposition and ride the elevator
//!
//! Shared by the primary script (countdown first, then a settle after the
//! use key) and the timed-run script (no countdown, the use key is held for
//! a quick random duration instead).

use super::driver::{Driver, Step};
use super::{resolve_key, Variant};
use crate::app_state::Phase;
use crate::constants::SPRINT_STEPS;
use crate::settings::ElevatorSettings;
use crate::utils::keycode::KeyTarget;
use anyhow::Result;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Keys {
    shoot: KeyTarget,
    right: KeyTarget,
    sprint: KeyTarget,
    crouch: KeyTarget,
    use_key: KeyTarget,
    opk1: KeyTarget,
    opk2: KeyTarget,
}

#[derive(Debug, Clone)]
pub struct ElevatorScript {
    settings: ElevatorSettings,
    keys: Keys,
    timed_run: bool,
}

impl ElevatorScript {
    pub fn new(settings: &ElevatorSettings, variant: Variant) -> Result<Self> {
        let keys = Keys {
            shoot: resolve_key("shoot_key", &settings.shoot_key)?,
            right: resolve_key("right_key", &settings.right_key)?,
            sprint: resolve_key("sprint_key", &settings.sprint_key)?,
            crouch: resolve_key("crouch_key", &settings.crouch_key)?,
            use_key: resolve_key("use_key", &settings.use_key)?,
            opk1: resolve_key("opk_enable1", &settings.opk_enable1)?,
            opk2: resolve_key("opk_enable2", &settings.opk_enable2)?,
        };
        Ok(Self {
            settings: settings.clone(),
            keys,
            timed_run: variant == Variant::TimedRun,
        })
    }

    pub fn run(&self, driver: &mut Driver) -> Step {
        driver.ensure_process()?;
        if !self.timed_run {
            driver.countdown()?;
        }
        loop {
            self.cycle(driver)?;
            driver.cycle_done();
        }
    }

    fn cycle(&self, driver: &mut Driver) -> Step {
        let s = &self.settings;
        let k = &self.keys;
        let cycle_start = Instant::now();

        driver.ensure_process()?;
        driver.set_phase(Phase::Acting);
        for _ in 0..s.shots {
            let hold = driver.sample(s.shot_min_time, s.shot_max_time);
            let gap = driver.sample(s.shot_wait_min, s.shot_wait_max);
            driver.press(k.shoot)?;
            driver.sleep(hold)?;
            driver.release(k.shoot)?;
            driver.sleep(gap)?;
        }

        self.toggle_opk(driver)?;
        self.reposition(driver)?;

        driver.wait_phase(cycle_start, s.wait_time)?;

        driver.set_phase(Phase::Resetting);
        if self.timed_run {
            driver.ensure_process()?;
            self.toggle_opk(driver)?;
            let hold = driver.sample(s.quick_min_time, s.quick_max_time);
            driver.tap(k.use_key, hold)?;
        } else {
            let t = driver.timings;
            driver.tap(k.use_key, t.use_hold)?;
            driver.sleep(t.use_settle)?;
            driver.ensure_process()?;
            self.toggle_opk(driver)?;
        }

        let load = driver.sample(s.load_screen_min, s.load_screen_max);
        driver.sleep(load)
    }

    fn toggle_opk(&self, driver: &mut Driver) -> Step {
        let t = driver.timings;
        driver.tap(self.keys.opk1, t.key_tap)?;
        driver.sleep(t.opk_settle)?;
        driver.tap(self.keys.opk2, t.key_tap)?;
        driver.sleep(t.opk_settle)
    }

    /// Sprint-strafe right, then crouch
    fn reposition(&self, driver: &mut Driver) -> Step {
        let t = driver.timings;
        let k = &self.keys;
        for _ in 0..SPRINT_STEPS {
            driver.press(k.right)?;
            driver.sleep(t.step_gap)?;
            driver.press(k.sprint)?;
            driver.sleep(t.sprint_hold)?;
            driver.release(k.right)?;
            driver.sleep(t.step_gap)?;
            driver.release(k.sprint)?;
        }
        driver.sleep(t.step_gap)?;
        driver.tap(k.crouch, t.key_tap)?;
        driver.sleep(t.crouch_settle)
    }
}
