//! A seed that has left the receptacle and flies on its own

use crate::graph::Visual;
use crate::math::{HermiteSpline, Mat4, Vec3};
use crate::wind::{total_force, WindField};
use super::FlightParams;

/// Progress within this distance of 1 counts as arrival
const COMPLETION_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    Flying,
    /// Terminal; the owning tracker drops the entry once it sees this
    Completed,
}

#[derive(Debug, Clone)]
pub enum Trajectory {
    /// Follows a fixed curve; `t` runs 0 to 1 at `speed` per second
    Spline {
        path: HermiteSpline,
        t: f64,
        speed: f32,
    },
    /// Free particle pushed by wind, pulled by gravity
    Ballistic {
        position: Vec3,
        velocity: Vec3,
        anchor: Vec3,
    },
}

#[derive(Debug, Clone)]
pub struct DetachedSeed {
    pub visual: Visual,
    /// Global pose at detachment with translation stripped
    orientation: Mat4,
    trajectory: Trajectory,
    state: FlightState,
}

impl DetachedSeed {
    pub fn on_spline(visual: Visual, orientation: Mat4, path: HermiteSpline, speed: f32) -> Self {
        Self {
            visual,
            orientation: orientation.with_translation(Vec3::ZERO),
            trajectory: Trajectory::Spline { path, t: 0.0, speed },
            state: FlightState::Flying,
        }
    }

    pub fn ballistic(visual: Visual, orientation: Mat4, position: Vec3, velocity: Vec3, anchor: Vec3) -> Self {
        Self {
            visual,
            orientation: orientation.with_translation(Vec3::ZERO),
            trajectory: Trajectory::Ballistic { position, velocity, anchor },
            state: FlightState::Flying,
        }
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == FlightState::Completed
    }

    /// Curve parameter for spline flights, `None` for ballistic ones
    pub fn progress(&self) -> Option<f32> {
        match &self.trajectory {
            Trajectory::Spline { t, .. } => Some(*t as f32),
            Trajectory::Ballistic { .. } => None,
        }
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Advance one tick; completed seeds do not move
    pub fn advance(&mut self, dt: f32, winds: &[WindField], params: &FlightParams) {
        if self.state == FlightState::Completed {
            return;
        }

        match &mut self.trajectory {
            Trajectory::Spline { t, speed, .. } => {
                *t += (*speed as f64) * (dt as f64);
                if *t >= 1.0 - COMPLETION_EPSILON {
                    *t = 1.0;
                    self.state = FlightState::Completed;
                }
            }
            Trajectory::Ballistic { position, velocity, anchor } => {
                let wind = total_force(winds, *position, params.pappus_radius);
                let accel = wind.scale(1.0 / params.seed_mass)
                    + Vec3::new(0.0, -params.gravity, 0.0)
                    - velocity.scale(params.drag);
                *velocity += accel.scale(dt);
                *position += velocity.scale(dt);

                let escaped = position.distance(anchor) > params.bound_radius;
                if position.y < params.ground_level || escaped {
                    self.state = FlightState::Completed;
                }
            }
        }
    }

    pub fn position(&self) -> Vec3 {
        match &self.trajectory {
            Trajectory::Spline { path, t, .. } => path.evaluate(*t as f32),
            Trajectory::Ballistic { position, .. } => *position,
        }
    }

    /// Translation to the current position, then the frozen orientation/scale
    pub fn transform(&self) -> Mat4 {
        Mat4::translation_vec(self.position()).mul(&self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MeshHandle;
    use crate::math::HermitePoint;

    fn visual() -> Visual {
        Visual::new(MeshHandle(2), [1.0, 1.0, 1.0, 1.0])
    }

    fn path() -> HermiteSpline {
        HermiteSpline::new(vec![
            HermitePoint::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 1.0, 0.0)),
            HermitePoint::new(Vec3::new(1.0, 6.0, 0.0), Vec3::new(1.0, 1.5, 0.0)),
            HermitePoint::new(Vec3::new(2.0, 7.5, 0.0), Vec3::new(1.0, 2.0, 0.0)),
        ])
    }

    #[test]
    fn test_completes_after_exact_tick_count() {
        let speed = 0.05f32;
        let dt = 1.0f32 / 60.0;
        let expected_ticks = (1.0 / (speed * dt)).ceil() as usize;

        let mut seed = DetachedSeed::on_spline(visual(), Mat4::identity(), path(), speed);
        let params = FlightParams::default();

        let mut ticks = 0;
        while !seed.is_completed() {
            seed.advance(dt, &[], &params);
            ticks += 1;
            assert!(seed.progress().unwrap() <= 1.0);
            assert!(ticks <= expected_ticks, "still flying after {} ticks", ticks);
        }
        assert_eq!(ticks, expected_ticks);
        assert_eq!(seed.progress(), Some(1.0));
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut seed = DetachedSeed::on_spline(visual(), Mat4::identity(), path(), 10.0);
        let params = FlightParams::default();
        seed.advance(1.0, &[], &params);
        assert_eq!(seed.state(), FlightState::Completed);

        let end = seed.position();
        seed.advance(1.0, &[], &params);
        assert_eq!(seed.position(), end);
        assert!(end.distance(&Vec3::new(2.0, 7.5, 0.0)) < 1e-5);
    }

    #[test]
    fn test_transform_keeps_orientation() {
        let orientation = Mat4::translation(9.0, 9.0, 9.0).mul(&Mat4::scale(0.05, 0.05, 1.2));
        let seed = DetachedSeed::on_spline(visual(), orientation, path(), 0.05);
        let m = seed.transform();
        assert!(m.translation_part().distance(&Vec3::new(0.0, 5.0, 0.0)) < 1e-6);
        assert!((m.at(2, 2) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_ballistic_lands() {
        let params = FlightParams::default();
        let mut seed = DetachedSeed::ballistic(
            visual(), Mat4::identity(), Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, Vec3::ZERO,
        );
        let mut ticks = 0;
        while !seed.is_completed() && ticks < 100_000 {
            seed.advance(0.01, &[], &params);
            ticks += 1;
        }
        assert!(seed.is_completed());
        assert!(seed.position().y < params.ground_level);
        assert_eq!(seed.progress(), None);
    }

    #[test]
    fn test_ballistic_escapes_bounds() {
        let params = FlightParams {
            gravity: 0.0,
            drag: 0.0,
            bound_radius: 2.0,
            ..FlightParams::default()
        };
        let mut seed = DetachedSeed::ballistic(
            visual(), Mat4::identity(), Vec3::new(0.0, 5.0, 0.0), Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 5.0, 0.0),
        );
        for _ in 0..30 {
            seed.advance(0.01, &[], &params);
        }
        assert!(seed.is_completed());
    }
}
