//! Procedural three-point flight curve for a freshly detached seed

use rand::Rng;

use crate::math::{HermitePoint, HermiteSpline, Vec3};
use super::FlightParams;

/// Random upward-biased direction used when the seed saw no wind
pub fn random_upward<R: Rng>(rng: &mut R, scale: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(0.5..1.5),
        rng.gen_range(-1.0..1.0),
    )
    .normalize()
    .scale(scale)
}

fn above_ground(mut p: Vec3, params: &FlightParams) -> Vec3 {
    if p.y < params.ground_level {
        p.y = params.ground_level + params.ground_epsilon;
    }
    p
}

fn lift<R: Rng>(tangent: Vec3, rng: &mut R, params: &FlightParams) -> Vec3 {
    if params.upward_jitter > 0.0 {
        tangent + Vec3::new(0.0, rng.gen_range(0.0..params.upward_jitter), 0.0)
    } else {
        tangent
    }
}

/// Control points: start, start + tangent, then one more tangent step,
/// each later tangent lifted by a random upward nudge and kept above ground
pub fn build_flight_path<R: Rng>(
    start: Vec3,
    initial_tangent: Vec3,
    params: &FlightParams,
    rng: &mut R,
) -> HermiteSpline {
    let t0 = if initial_tangent.is_zero() {
        random_upward(rng, params.tangent_scale)
    } else {
        initial_tangent
    };

    let p1 = above_ground(start + t0, params);
    let t1 = lift(t0, rng, params);

    let p2 = above_ground(p1 + t1, params);
    let t2 = lift(t1, rng, params);

    HermiteSpline::new(vec![
        HermitePoint::new(start, t0),
        HermitePoint::new(p1, t1),
        HermitePoint::new(p2, t2),
    ])
}
