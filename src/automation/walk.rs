//! Walk pattern plus repeated interact presses, for AFK alts

use super::driver::{Driver, Step};
use super::resolve_key;
use crate::app_state::Phase;
use crate::settings::WalkSettings;
use crate::utils::keycode::KeyTarget;
use anyhow::Result;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct WalkScript {
    settings: WalkSettings,
    action: KeyTarget,
    backward: KeyTarget,
    right: KeyTarget,
}

impl WalkScript {
    pub fn new(settings: &WalkSettings) -> Result<Self> {
        Ok(Self {
            settings: settings.clone(),
            action: resolve_key("action_key", &settings.action_key)?,
            backward: resolve_key("backward_key", &settings.backward_key)?,
            right: resolve_key("right_key", &settings.right_key)?,
        })
    }

    pub fn run(&self, driver: &mut Driver) -> Step {
        driver.ensure_process()?;
        driver.countdown()?;
        loop {
            self.cycle(driver)?;
            driver.cycle_done();
        }
    }

    fn cycle(&self, driver: &mut Driver) -> Step {
        let s = &self.settings;
        let cycle_start = Instant::now();

        driver.ensure_process()?;
        driver.set_phase(Phase::Acting);
        for _ in 0..s.walk_cycles {
            let walk = driver.sample(s.walk_min_time, s.walk_max_time);
            let pause = driver.sample(s.sleep_min_time, s.sleep_max_time);
            driver.press(self.backward)?;
            driver.sleep(walk)?;
            driver.press(self.right)?;
            driver.sleep(pause)?;
            driver.release(self.backward)?;
            driver.sleep(walk)?;
            driver.release(self.right)?;
            driver.sleep(walk)?;
        }

        driver.wait_phase(cycle_start, s.wait_time)?;

        driver.set_phase(Phase::Resetting);
        for _ in 0..s.action_cycles {
            driver.tap(self.action, s.action_press_time)?;
        }
        Ok(())
    }
}
