use orrery::field::potential;
use orrery::{
    BodyCatalog, DVec3, FixedTimestep, OrbitalSystem, OrreryConfig, PositionBuffer,
    PositionLayout, PotentialGrid, SimClock,
};

/// Owns one orbital system and drives it from frame ticks.
///
/// Plain Rust so it can be tested natively; `OrreryHandle` wraps it for
/// wasm-bindgen, which cannot export it directly.
pub struct OrreryRunner {
    config: OrreryConfig,
    system: OrbitalSystem,
    clock: SimClock,
    timestep: FixedTimestep,
    buffer: PositionBuffer,
    grid: PotentialGrid,
    paused: bool,
    /// Whether the grid is refreshed each frame (off unless the renderer asks).
    grid_enabled: bool,
}

impl OrreryRunner {
    pub fn new(config: OrreryConfig, catalog: &BodyCatalog) -> orrery::Result<Self> {
        config.validate()?;
        let system = catalog.build_system(config.step_seconds(), config.central_mass)?;
        let layout = PositionLayout::from_config(&config);
        let grid = PotentialGrid::new(layout.grid_resolution, config.grid_extent(), 0.0);
        let timestep = FixedTimestep::with_max_steps(config.frame_dt, config.max_ticks_per_frame);

        let mut runner = Self {
            buffer: PositionBuffer::new(layout),
            config,
            system,
            clock: SimClock::new(),
            timestep,
            grid,
            paused: false,
            grid_enabled: false,
        };
        runner.buffer.write_bodies(&runner.system, &runner.clock);
        log::info!(
            "orrery: {} bodies, step = {} days",
            runner.system.len(),
            runner.config.step_days
        );
        Ok(runner)
    }

    /// Built-in planets with default settings.
    pub fn solar_system() -> orrery::Result<Self> {
        Self::new(OrreryConfig::default(), &BodyCatalog::solar_system())
    }

    /// Run one frame: convert `dt` real seconds into fixed ticks, step the system,
    /// then refresh the shared buffer.
    pub fn tick(&mut self, dt: f64) {
        if !self.paused {
            let ticks = self.timestep.accumulate(dt);
            for _ in 0..ticks.saturating_mul(self.config.steps_per_tick) {
                self.advance();
            }
        }
        self.publish();
    }

    /// Advance exactly one simulation step regardless of pause state.
    pub fn step_once(&mut self) {
        self.advance();
        self.publish();
    }

    fn advance(&mut self) {
        self.system.step();
        self.clock.advance(self.system.dt());
    }

    fn publish(&mut self) {
        self.buffer.write_bodies(&self.system, &self.clock);
        if self.grid_enabled {
            self.grid.sample(&self.system, self.config.potential_threshold);
            self.buffer.write_grid(&self.grid);
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            self.timestep.reset();
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_grid_enabled(&mut self, enabled: bool) {
        self.grid_enabled = enabled;
        if enabled {
            self.publish();
        }
    }

    /// Change simulated days per step.
    pub fn set_step_days(&mut self, days: f64) -> orrery::Result<()> {
        if !(days > 0.0) {
            return Err(orrery::Error::NonPositiveTimeStep(days));
        }
        self.config.step_days = days;
        self.system.set_dt(self.config.step_seconds());
        Ok(())
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.config.potential_threshold = threshold;
    }

    /// Potential at a point given in AU, using `threshold` for the clamp.
    pub fn sample_potential(&self, x_au: f64, y_au: f64, z_au: f64, threshold: f64) -> f64 {
        potential::evaluate_au(DVec3::new(x_au, y_au, z_au), &self.system, threshold)
    }

    // ---- Accessors ----

    pub fn system(&self) -> &OrbitalSystem {
        &self.system
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn buffer(&self) -> &PositionBuffer {
        &self.buffer
    }

    pub fn grid(&self) -> &PotentialGrid {
        &self.grid
    }

    pub fn body_count(&self) -> u32 {
        self.system.len() as u32
    }

    pub fn body_name(&self, index: usize) -> Option<&str> {
        self.system.body(index).map(|b| b.name())
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.buffer.layout().buffer_total_floats as u32
    }

    pub fn grid_ptr(&self) -> *const f32 {
        self.buffer.grid_ptr()
    }

    pub fn elapsed_days(&self) -> f64 {
        self.clock.days()
    }
}
