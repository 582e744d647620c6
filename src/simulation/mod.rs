//! Frame loop: fixed-step physics over the plant and its wind fields

mod stepper;

pub use stepper::{FixedStepper, StepperParams};

use log::debug;

use crate::config::SceneConfig;
use crate::error::Result;
use crate::math::Vec3;
use crate::plant::{Dandelion, DrawTarget, Material};
use crate::wind::{AmbientWind, AmbientWindParams, WindField};

/// Distance upwind of the receptacle where a gust field is placed
const GUST_STANDOFF: f32 = 3.0;

/// Gust field used when there is no ambient driver. The field stays in the
/// active list and is zeroed once the hold runs out.
#[derive(Debug, Clone, Copy)]
struct Gust {
    slot: usize,
    remaining: f32,
}

/// Owns the plant, every active wind field and the ambient driver.
/// Nothing outside `frame` and `tick` mutates them.
pub struct Simulation {
    plant: Dandelion,
    winds: Vec<WindField>,
    /// Driver and the index of the field it steers in `winds`
    ambient: Option<(AmbientWind, usize)>,
    gust: Option<Gust>,
    /// Seconds of simulated time a gust lasts
    gust_hold: f32,
    stepper: FixedStepper,
    time: f32,
    ticks: u64,
}

impl Simulation {
    pub fn new(plant: Dandelion, winds: Vec<WindField>, stepper: FixedStepper) -> Self {
        Self {
            plant,
            winds,
            ambient: None,
            gust: None,
            gust_hold: AmbientWindParams::default().blow_hold,
            stepper,
            time: 0.0,
            ticks: 0,
        }
    }

    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        config.validate()?;
        let plant = Dandelion::with_params(config.ground, config.plant.clone(), config.flight)?;
        let winds = config.winds.iter().map(|&p| WindField::new(p)).collect();

        let mut sim = Self::new(plant, winds, FixedStepper::new(config.stepper)).with_gust_hold(config.gust_hold);
        if let Some(params) = config.ambient {
            sim = sim.with_ambient(AmbientWind::new(params));
        }

        debug!(
            "scene ready: {} wind field(s), ambient {}",
            sim.winds.len(),
            if sim.ambient.is_some() { "on" } else { "off" }
        );
        Ok(sim)
    }

    /// Add a drifting breeze; its field joins the active list
    pub fn with_ambient(mut self, ambient: AmbientWind) -> Self {
        self.winds.push(ambient.spawn_field());
        self.ambient = Some((ambient, self.winds.len() - 1));
        self
    }

    pub fn with_gust_hold(mut self, seconds: f32) -> Self {
        self.gust_hold = seconds;
        self
    }

    /// Advance by one rendered frame. Returns the number of physics ticks run.
    pub fn frame(&mut self, frame_dt: f32) -> Result<usize> {
        if let Some((driver, slot)) = &mut self.ambient {
            driver.advance(frame_dt);
            driver.apply(&mut self.winds[*slot]);
        }

        let ticks = self.stepper.ticks_for(frame_dt);
        let dt = self.stepper.params.step;
        for _ in 0..ticks {
            self.tick(dt)?;
        }
        Ok(ticks)
    }

    /// Wind clocks first, then the plant (joints, detachment, flights)
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        for field in &mut self.winds {
            field.update(dt);
        }
        self.plant.update(dt, &self.winds)?;

        if let Some(gust) = &mut self.gust {
            if gust.remaining > 0.0 {
                gust.remaining -= dt;
                if gust.remaining <= 0.0 {
                    gust.remaining = 0.0;
                    self.winds[gust.slot].set_magnitude(0.0);
                    debug!("gust ended at {:.3}s", self.time);
                }
            }
        }

        self.time += dt;
        self.ticks += 1;
        Ok(())
    }

    /// Directed gust. With an ambient driver the driver holds it; otherwise a
    /// single gust field upwind of the receptacle is (re)aimed and held for `gust_hold`.
    pub fn blow(&mut self, direction: Vec3, strength: f32) -> Result<()> {
        if let Some((driver, slot)) = &mut self.ambient {
            driver.blow(direction, strength);
            driver.apply(&mut self.winds[*slot]);
            return Ok(());
        }

        let source = self.plant.receptacle_position()? - direction.normalize().scale(GUST_STANDOFF);
        match &mut self.gust {
            Some(gust) => {
                let field = &mut self.winds[gust.slot];
                field.params.source = source;
                field.set_direction(direction);
                field.set_magnitude(strength);
                gust.remaining = self.gust_hold;
            }
            None => {
                self.winds.push(WindField::with_source(source, direction, strength));
                self.gust = Some(Gust {
                    slot: self.winds.len() - 1,
                    remaining: self.gust_hold,
                });
            }
        }
        Ok(())
    }

    /// True while a gust without an ambient driver is still being held
    pub fn is_gusting(&self) -> bool {
        self.gust.map_or(false, |g| g.remaining > 0.0)
    }

    pub fn draw<U, T: DrawTarget<U>>(&self, target: &mut T, uniforms: &U, material: &Material) -> Result<()> {
        self.plant.draw(target, uniforms, material)
    }

    pub fn plant(&self) -> &Dandelion {
        &self.plant
    }

    pub fn winds(&self) -> &[WindField] {
        &self.winds
    }

    /// Combined magnitude of every active field
    pub fn wind_strength(&self) -> f32 {
        self.winds.iter().map(|w| w.params.magnitude).sum()
    }

    /// Simulated seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}
