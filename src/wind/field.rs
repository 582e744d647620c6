//! Turbulent wind force field with inverse-square falloff from a source point

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Tunables for one wind field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindParams {
    pub source: Vec3,
    /// Base direction; normalized on construction
    pub direction: Vec3,
    pub magnitude: f32,
    /// Amplitude of the sinusoidal direction wobble
    pub variability: f32,
    pub frequency: f32,
    pub drag_coefficient: f32,
    pub air_density: f32,
    /// Visual calibration multiplier on the drag force, not a physical constant
    pub force_scale: f32,
}

impl Default for WindParams {
    fn default() -> Self {
        Self {
            source: Vec3::ZERO,
            direction: Vec3::RIGHT,
            magnitude: 1.0,
            variability: 0.3,
            frequency: 0.2,
            drag_coefficient: 0.47,
            air_density: 1.225,
            force_scale: 10.0,
        }
    }
}

/// Per-axis frequency multipliers of the wobble
const WOBBLE_RATES: [f32; 3] = [1.0, 1.3, 0.7];
/// Per-axis weight of the position-dependent phase term
const PHASE_BIAS: [f32; 3] = [0.2, 0.1, 0.15];

#[derive(Debug, Clone)]
pub struct WindField {
    pub params: WindParams,
    time: f32,
}

impl WindField {
    pub fn new(params: WindParams) -> Self {
        let direction = params.direction.normalize();
        Self {
            params: WindParams {
                direction: if direction.is_zero() { Vec3::RIGHT } else { direction },
                ..params
            },
            time: 0.0,
        }
    }

    pub fn with_source(source: Vec3, direction: Vec3, magnitude: f32) -> Self {
        Self::new(WindParams {
            source,
            direction,
            magnitude,
            ..Default::default()
        })
    }

    /// Advance the internal clock
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        let d = direction.normalize();
        if !d.is_zero() {
            self.params.direction = d;
        }
    }

    pub fn set_magnitude(&mut self, magnitude: f32) {
        self.params.magnitude = magnitude;
    }

    /// Source strength after inverse-square falloff, flat inside unit distance
    pub fn strength_at(&self, position: Vec3) -> f32 {
        let falloff = position.distance(&self.params.source).max(1.0);
        self.params.magnitude / (falloff * falloff)
    }

    /// Base direction perturbed by time and position, renormalized
    pub fn direction_at(&self, position: Vec3) -> Vec3 {
        let p = &self.params;
        let t = self.time;

        let wobble_x = (t * p.frequency * WOBBLE_RATES[0]).sin() * p.variability;
        let wobble_y = (t * p.frequency * WOBBLE_RATES[1]).sin() * p.variability * 0.5;
        let wobble_z = (t * p.frequency * WOBBLE_RATES[2]).sin() * p.variability;

        let phase = (position.x * 0.1 + position.y * 0.2 + position.z * 0.15 + t * 0.3).sin() * 0.5;

        let perturbed = p.direction
            + Vec3::new(
                wobble_x + phase * PHASE_BIAS[0],
                wobble_y + phase * PHASE_BIAS[1],
                wobble_z + phase * PHASE_BIAS[2],
            );
        perturbed.normalize()
    }

    /// Drag force on a disc of `radius` at `position`
    pub fn force_at(&self, position: Vec3, radius: f32) -> Vec3 {
        let p = &self.params;
        let strength = self.strength_at(position);
        let area = PI * radius * radius;
        let magnitude = 0.5 * p.air_density * strength * strength * p.drag_coefficient * area * p.force_scale;

        self.direction_at(position).scale(magnitude)
    }
}

/// Sum of all active fields at one sample point
pub fn total_force(fields: &[WindField], position: Vec3, radius: f32) -> Vec3 {
    fields.iter().map(|f| f.force_at(position, radius)).sum()
}
