use serde::{Deserialize, Serialize};

use crate::core::constants::{AU, DAY, DEFAULT_THRESHOLD, SUN_MASS};
use crate::error::Error;
use crate::Result;

/// Upper bound on simulation steps per fixed tick.
pub const MAX_STEPS_PER_TICK: u32 = 1_000;

/// Configuration for a running orrery, provided by the host page.
/// Every field has a default, so a partial JSON object is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Real seconds per fixed tick (default: 1/60).
    pub frame_dt: f64,
    /// Simulated days per step (default: 10).
    pub step_days: f64,
    /// Simulation steps run per fixed tick (default: 1).
    pub steps_per_tick: u32,
    /// Cap on fixed ticks per frame (default: 10).
    pub max_ticks_per_frame: u32,
    /// Central mass in kilograms (default: the sun).
    pub central_mass: f64,
    /// Clamp magnitude for each potential term (default: 100).
    pub potential_threshold: f64,
    /// Maximum number of bodies the position buffer holds (default: 64).
    pub max_bodies: usize,
    /// Potential grid samples per side (default: 32).
    pub grid_resolution: usize,
    /// Half-width of the potential grid in AU (default: 2).
    pub grid_extent_au: f64,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            frame_dt: 1.0 / 60.0,
            step_days: 10.0,
            steps_per_tick: 1,
            max_ticks_per_frame: 10,
            central_mass: SUN_MASS,
            potential_threshold: DEFAULT_THRESHOLD,
            max_bodies: 64,
            grid_resolution: 32,
            grid_extent_au: 2.0,
        }
    }
}

impl OrreryConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step_days > 0.0) {
            return Err(Error::NonPositiveTimeStep(self.step_days));
        }
        if !(self.frame_dt > 0.0) {
            return Err(Error::NonPositiveTimeStep(self.frame_dt));
        }
        if !(1..=MAX_STEPS_PER_TICK).contains(&self.steps_per_tick) {
            return Err(Error::InvalidStepsPerTick(self.steps_per_tick));
        }
        Ok(())
    }

    /// Simulation step length in seconds.
    pub fn step_seconds(&self) -> f64 {
        self.step_days * DAY
    }

    /// Grid half-width in metres.
    pub fn grid_extent(&self) -> f64 {
        self.grid_extent_au * AU
    }
}
