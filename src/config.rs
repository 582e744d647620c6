//! Scene configuration loaded from YAML

use serde::{Deserialize, Serialize};

use crate::dynamics::DynamicsParams;
use crate::error::{ErrorKind, Result};
use crate::flight::FlightParams;
use crate::math::Vec3;
use crate::plant::PlantParams;
use crate::simulation::StepperParams;
use crate::wind::{AmbientWindParams, WindParams};

/// Everything needed to assemble a scene; every field may be omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Where the stem meets the ground
    pub ground: Vec3,
    pub plant: PlantParams,
    /// Fixed wind fields, active from the first frame
    pub winds: Vec<WindParams>,
    /// Drifting breeze steered over time; `null` turns it off
    pub ambient: Option<AmbientWindParams>,
    pub flight: FlightParams,
    pub stepper: StepperParams,
    /// Seconds a blow lasts when there is no ambient driver
    pub gust_hold: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground: Vec3::ZERO,
            plant: PlantParams::default(),
            winds: Vec::new(),
            ambient: Some(AmbientWindParams::default()),
            flight: FlightParams::default(),
            stepper: StepperParams::default(),
            gust_hold: AmbientWindParams::default().blow_hold,
        }
    }
}

impl SceneConfig {
    /// Parse and validate
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SceneConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ErrorKind::config(format!("YAML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.plant;

        if p.stem_segments == 0 {
            return Err(ErrorKind::config("plant.stem_segments must be at least 1"));
        }
        if p.seed_count == 0 {
            return Err(ErrorKind::config("plant.seed_count must be at least 1"));
        }
        for (name, value) in [
            ("plant.stem_length", p.stem_length),
            ("plant.receptacle_radius", p.receptacle_radius),
            ("plant.seed_length", p.seed_length),
            ("plant.detach_threshold", p.detach_threshold),
            ("flight.speed", self.flight.speed),
            ("stepper.step", self.stepper.step),
            ("stepper.max_frame", self.stepper.max_frame),
            ("gust_hold", self.gust_hold),
        ] {
            if !(value > 0.0) {
                return Err(ErrorKind::config(format!("{} must be positive, got {}", name, value)));
            }
        }

        check_dynamics("plant.stem_dynamics", &p.stem_dynamics)?;
        check_dynamics("plant.seed_dynamics", &p.seed_dynamics)?;

        if p.seed_axes.is_empty() || p.seed_axes.iter().any(|a| !a.is_rotation()) {
            return Err(ErrorKind::config("plant.seed_axes must list one or more rotation axes"));
        }
        if self.flight.seed_mass <= 0.0 {
            return Err(ErrorKind::config("flight.seed_mass must be positive"));
        }

        Ok(())
    }
}

fn check_dynamics(name: &str, params: &DynamicsParams) -> Result<()> {
    if !(params.inertia > 0.0) {
        return Err(ErrorKind::config(format!("{}.inertia must be positive, got {}", name, params.inertia)));
    }
    if params.spring < 0.0 || params.damper < 0.0 {
        return Err(ErrorKind::config(format!("{} spring and damper must not be negative", name)));
    }
    Ok(())
}
