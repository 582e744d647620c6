use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod dynamics;
pub mod error;
pub mod flight;
pub mod graph;
pub mod logging;
pub mod math;
pub mod plant;
pub mod simulation;
pub mod wind;

pub use config::SceneConfig;
pub use error::{ErrorKind, Result};
pub use plant::{Dandelion, DrawTarget, Material};
pub use simulation::Simulation;

use math::Vec3;
use plant::DrawList;

/// Install the panic hook and route `log` records to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}

fn to_js(err: ErrorKind) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Dandelion scene exposed to JavaScript. The page owns the canvas and the meshes;
/// this side only simulates and reports what to draw.
#[wasm_bindgen]
pub struct DandelionScene {
    sim: Simulation,
    material: Material,
    draw_list: DrawList,
}

#[wasm_bindgen]
impl DandelionScene {
    /// Build a scene from a YAML config; an empty string uses the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_yaml: &str) -> std::result::Result<DandelionScene, JsValue> {
        let config = if config_yaml.trim().is_empty() {
            SceneConfig::default()
        } else {
            SceneConfig::from_yaml(config_yaml).map_err(to_js)?
        };

        Ok(Self {
            sim: Simulation::from_config(&config).map_err(to_js)?,
            material: Material::default(),
            draw_list: DrawList::new(),
        })
    }

    /// Advance by one rendered frame of `dt` seconds; returns the physics ticks run
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> std::result::Result<u32, JsValue> {
        self.sim.frame(dt).map(|n| n as u32).map_err(to_js)
    }

    /// Gust along (dx, dy, dz)
    #[wasm_bindgen]
    pub fn blow(&mut self, dx: f32, dy: f32, dz: f32, strength: f32) -> std::result::Result<(), JsValue> {
        self.sim.blow(Vec3::new(dx, dy, dz), strength).map_err(to_js)
    }

    /// One record per visible body and flying seed:
    /// mesh id, 16 column-major matrix entries, RGBA
    #[wasm_bindgen]
    pub fn draw_data(&mut self) -> std::result::Result<Float32Array, JsValue> {
        self.draw_list.clear();
        self.sim
            .draw(&mut self.draw_list, &(), &self.material)
            .map_err(to_js)?;
        Ok(Float32Array::from(self.draw_list.as_slice()))
    }

    /// Floats per record in `draw_data`
    #[wasm_bindgen]
    pub fn record_len() -> u32 {
        plant::DRAW_RECORD_LEN as u32
    }

    #[wasm_bindgen]
    pub fn detached_count(&self) -> u32 {
        self.sim.plant().detached_count() as u32
    }

    #[wasm_bindgen]
    pub fn in_flight_count(&self) -> u32 {
        self.sim.plant().in_flight_count() as u32
    }

    #[wasm_bindgen]
    pub fn attached_count(&self) -> u32 {
        self.sim.plant().attached_count() as u32
    }

    #[wasm_bindgen]
    pub fn wind_strength(&self) -> f32 {
        self.sim.wind_strength()
    }

    #[wasm_bindgen]
    pub fn time(&self) -> f32 {
        self.sim.time()
    }
}
