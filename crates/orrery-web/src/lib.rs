pub mod runner;

pub use runner::OrreryRunner;

use orrery::{BodyCatalog, OrreryConfig};
use wasm_bindgen::prelude::*;

/// Browser-side handle to one running orrery.
///
/// The page creates it, keeps it, and calls `tick` from its animation loop; every
/// piece of simulation state lives inside the handle.
///
/// ```ignore
/// const orrery = new OrreryHandle(undefined, undefined);
/// function frame(dt) {
///     orrery.tick(dt);
///     const view = new Float32Array(memory.buffer, orrery.buffer_ptr(), orrery.buffer_total_floats());
///     // ... draw bodies from view ...
/// }
/// ```
#[wasm_bindgen]
pub struct OrreryHandle {
    runner: OrreryRunner,
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js(err: orrery::Error) -> JsValue {
    let msg = JsValue::from_str(&err.to_string());
    web_sys::console::error_1(&msg);
    msg
}

#[wasm_bindgen]
impl OrreryHandle {
    /// Build from optional config and catalog JSON. Missing arguments fall back to
    /// the default config and the built-in planets.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        catalog_json: Option<String>,
    ) -> Result<OrreryHandle, JsValue> {
        init_logging();

        let config = match config_json {
            Some(json) => OrreryConfig::from_json(&json).map_err(to_js)?,
            None => OrreryConfig::default(),
        };
        let catalog = match catalog_json {
            Some(json) => BodyCatalog::from_json(&json).map_err(to_js)?,
            None => BodyCatalog::solar_system(),
        };
        let runner = OrreryRunner::new(config, &catalog).map_err(to_js)?;
        Ok(OrreryHandle { runner })
    }

    pub fn tick(&mut self, dt: f64) {
        self.runner.tick(dt);
    }

    pub fn step_once(&mut self) {
        self.runner.step_once();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.runner.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.runner.is_paused()
    }

    pub fn set_step_days(&mut self, days: f64) -> Result<(), JsValue> {
        self.runner.set_step_days(days).map_err(to_js)
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.runner.set_threshold(threshold);
    }

    pub fn set_grid_enabled(&mut self, enabled: bool) {
        self.runner.set_grid_enabled(enabled);
    }

    /// Potential at (x, y, z) in AU.
    pub fn sample_potential(&self, x: f64, y: f64, z: f64, threshold: f64) -> f64 {
        self.runner.sample_potential(x, y, z, threshold)
    }

    // ---- Data accessors ----

    pub fn body_count(&self) -> u32 {
        self.runner.body_count()
    }

    pub fn body_name(&self, index: u32) -> Option<String> {
        self.runner.body_name(index as usize).map(str::to_string)
    }

    /// All body names in buffer order.
    pub fn body_names(&self) -> js_sys::Array {
        self.runner
            .system()
            .bodies()
            .iter()
            .map(|b| JsValue::from_str(b.name()))
            .collect()
    }

    pub fn elapsed_days(&self) -> f64 {
        self.runner.elapsed_days()
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.runner.buffer_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.runner.buffer_total_floats()
    }

    pub fn grid_ptr(&self) -> *const f32 {
        self.runner.grid_ptr()
    }

    pub fn grid_resolution(&self) -> u32 {
        self.runner.grid().resolution() as u32
    }
}
