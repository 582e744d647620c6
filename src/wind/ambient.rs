//! Slowly drifting breeze that a user can temporarily override with a blow

use serde::{Deserialize, Serialize};

use crate::math::Vec3;
use super::field::{WindField, WindParams};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientWindParams {
    /// Field the driver steers (direction and magnitude get overwritten)
    pub field: WindParams,
    pub base_strength: f32,
    /// Amplitude of the strength swing around `base_strength`
    pub strength_swing: f32,
    /// Seconds a blow overrides the drift
    pub blow_hold: f32,
}

impl Default for AmbientWindParams {
    fn default() -> Self {
        Self {
            field: WindParams {
                source: Vec3::new(-4.0, 3.0, 0.0),
                ..Default::default()
            },
            base_strength: 2.0,
            strength_swing: 1.5,
            blow_hold: 1.0,
        }
    }
}

/// Frame times outside (0, MAX_FRAME_DT] are treated as one nominal frame
const MAX_FRAME_DT: f32 = 0.1;
const NOMINAL_FRAME_DT: f32 = 0.016;

/// Steers one wind field. The field itself lives with the other active fields
/// so it is ticked and sampled like any of them.
#[derive(Debug, Clone)]
pub struct AmbientWind {
    pub params: AmbientWindParams,
    clock: f32,
    blow_remaining: f32,
    direction: Vec3,
    strength: f32,
}

impl AmbientWind {
    pub fn new(params: AmbientWindParams) -> Self {
        let mut wind = Self {
            params,
            clock: 0.0,
            blow_remaining: 0.0,
            direction: Vec3::RIGHT,
            strength: params.base_strength,
        };
        wind.drift();
        wind
    }

    /// A fresh field already pointing where the driver wants it
    pub fn spawn_field(&self) -> WindField {
        let mut field = WindField::new(self.params.field);
        self.apply(&mut field);
        field
    }

    /// Advance the drift clock and the blow timer by one frame
    pub fn advance(&mut self, frame_dt: f32) {
        let dt = if frame_dt <= 0.0 || frame_dt > MAX_FRAME_DT {
            NOMINAL_FRAME_DT
        } else {
            frame_dt
        };

        self.clock += dt;
        if self.blow_remaining > 0.0 {
            self.blow_remaining = (self.blow_remaining - dt).max(0.0);
        }
        if !self.is_blowing() {
            self.drift();
        }
    }

    fn drift(&mut self) {
        let t = self.clock;
        let angle = t * 0.05;
        self.strength = self.params.base_strength + (t * 0.2).sin() * self.params.strength_swing;
        self.direction = Vec3::new(angle.cos(), 0.2 + (angle * 0.3).sin() * 0.1, angle.sin());
    }

    /// Override the drift with a directed gust for `blow_hold` seconds
    pub fn blow(&mut self, direction: Vec3, strength: f32) {
        if !direction.is_zero() {
            self.direction = direction;
        }
        self.strength = strength;
        self.blow_remaining = self.params.blow_hold;
    }

    pub fn is_blowing(&self) -> bool {
        self.blow_remaining > 0.0
    }

    /// Write the current direction and strength into `field`
    pub fn apply(&self, field: &mut WindField) {
        field.set_direction(self.direction);
        field.set_magnitude(self.strength);
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}
