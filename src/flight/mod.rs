//! Detached-seed flight: curve construction, per-seed state machine, and the
//! collection that owns seeds until they complete

mod detached_seed;
mod path;

pub use detached_seed::{DetachedSeed, FlightState, Trajectory};
pub use path::{build_flight_path, random_upward};

use log::info;
use serde::{Deserialize, Serialize};

use crate::wind::WindField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightMode {
    #[default]
    Spline,
    Ballistic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightParams {
    pub mode: FlightMode,
    /// Curve parameter per second
    pub speed: f32,
    /// Length of the random tangent used when no wind was felt
    pub tangent_scale: f32,
    /// Multiplier from last wind force to the initial tangent
    pub wind_tangent_gain: f32,
    /// Upper bound of the random upward nudge on later tangents
    pub upward_jitter: f32,
    pub ground_level: f32,
    /// Height above ground that clamped control points are lifted to
    pub ground_epsilon: f32,
    pub gravity: f32,
    /// Linear velocity damping for ballistic flight
    pub drag: f32,
    pub seed_mass: f32,
    /// Disc radius used when sampling wind on a flying seed
    pub pappus_radius: f32,
    /// Ballistic seeds further than this from the plant are dropped
    pub bound_radius: f32,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            mode: FlightMode::Spline,
            speed: 0.05,
            tangent_scale: 2.0,
            wind_tangent_gain: 1.0,
            upward_jitter: 1.0,
            ground_level: 0.0,
            ground_epsilon: 0.01,
            gravity: 1.5,
            drag: 0.8,
            seed_mass: 0.05,
            pappus_radius: 0.25,
            bound_radius: 30.0,
        }
    }
}

/// Owns every seed in flight and drops them as they complete
#[derive(Debug, Clone, Default)]
pub struct FlightTracker {
    seeds: Vec<DetachedSeed>,
    launched: usize,
    landed: usize,
}

impl FlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launch(&mut self, seed: DetachedSeed) {
        self.launched += 1;
        self.seeds.push(seed);
    }

    /// Advance every seed once, then remove completed ones. Returns how many completed.
    pub fn advance(&mut self, dt: f32, winds: &[WindField], params: &FlightParams) -> usize {
        for seed in &mut self.seeds {
            seed.advance(dt, winds, params);
        }

        let before = self.seeds.len();
        self.seeds.retain(|s| !s.is_completed());
        let completed = before - self.seeds.len();

        if completed > 0 {
            self.landed += completed;
            info!("{} seed flight(s) completed, {} still airborne", completed, self.seeds.len());
        }
        completed
    }

    pub fn iter(&self) -> impl Iterator<Item = &DetachedSeed> {
        self.seeds.iter()
    }

    /// Seeds currently airborne
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Seeds ever handed to this tracker
    pub fn launched(&self) -> usize {
        self.launched
    }

    pub fn landed(&self) -> usize {
        self.landed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MeshHandle, Visual};
    use crate::math::{Mat4, Vec3};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn seed_with_speed(speed: f32, rng: &mut SmallRng) -> DetachedSeed {
        let params = FlightParams::default();
        let path = build_flight_path(Vec3::new(0.0, 5.0, 0.0), Vec3::RIGHT, &params, rng);
        DetachedSeed::on_spline(Visual::new(MeshHandle(2), [1.0; 4]), Mat4::identity(), path, speed)
    }

    #[test]
    fn test_tracker_removes_completed() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut tracker = FlightTracker::new();
        tracker.launch(seed_with_speed(1.0, &mut rng));
        tracker.launch(seed_with_speed(0.1, &mut rng));
        assert_eq!(tracker.len(), 2);

        let params = FlightParams::default();
        let done = tracker.advance(1.0, &[], &params);
        assert_eq!(done, 1);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.launched(), 2);
        assert_eq!(tracker.landed(), 1);
        assert!(tracker.iter().all(|s| s.state() == FlightState::Flying));
    }

    #[test]
    fn test_empty_tracker_is_noop() {
        let mut tracker = FlightTracker::new();
        assert_eq!(tracker.advance(0.1, &[], &FlightParams::default()), 0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_mode_from_yaml() {
        let params: FlightParams = serde_yaml::from_str("mode: ballistic\nspeed: 0.2\n").unwrap();
        assert_eq!(params.mode, FlightMode::Ballistic);
        assert_eq!(params.speed, 0.2);
        assert_eq!(params.tangent_scale, 2.0);
    }
}
