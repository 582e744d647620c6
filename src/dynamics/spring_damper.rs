//! Per-joint rotational spring-damper state

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, Result};
use crate::graph::{Axis, BodyId, DofMask};
use crate::math::Vec3;

/// Inertia, spring and damper constants for one joint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicsParams {
    pub inertia: f32,
    /// k_s
    pub spring: f32,
    /// k_d
    pub damper: f32,
}

impl DynamicsParams {
    pub const fn new(inertia: f32, spring: f32, damper: f32) -> Self {
        Self { inertia, spring, damper }
    }
}

/// Angular state of one joint, stored per world axis (x, y, z).
/// Axes the joint cannot rotate about stay at zero.
#[derive(Debug, Clone, Default)]
pub struct SpringDamper {
    params: Option<DynamicsParams>,
    axes: Vec3,
    pub theta: Vec3,
    pub omega: Vec3,
    /// Total torque applied in the last step
    pub torque: Vec3,
}

impl SpringDamper {
    pub fn new(params: DynamicsParams, mask: DofMask) -> Self {
        Self {
            params: Some(params),
            ..Self::uninitialized(mask)
        }
    }

    /// State with no constants yet; stepping it fails with `Uninitialized`
    pub fn uninitialized(mask: DofMask) -> Self {
        Self {
            params: None,
            axes: mask.rotation_selector(),
            theta: Vec3::ZERO,
            omega: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    pub fn configure(&mut self, params: DynamicsParams) {
        self.params = Some(params);
    }

    pub fn is_initialized(&self) -> bool {
        self.params.is_some()
    }

    pub fn params(&self, owner: BodyId) -> Result<DynamicsParams> {
        self.params.ok_or(ErrorKind::Uninitialized(owner))
    }

    /// -k_s * theta - k_d * omega, per axis
    pub fn restoring_torque(&self, owner: BodyId) -> Result<Vec3> {
        let p = self.params(owner)?;
        Ok(self.theta.scale(-p.spring) + self.omega.scale(-p.damper))
    }

    /// One semi-implicit Euler step: velocity first, then angle with the new velocity
    pub fn integrate(&mut self, owner: BodyId, external: Vec3, dt: f32) -> Result<()> {
        let p = self.params(owner)?;

        let total = (external + self.restoring_torque(owner)?).mul_elem(&self.axes);
        self.omega += total.scale(dt / p.inertia);
        self.theta += self.omega.scale(dt);
        self.torque = total;
        Ok(())
    }

    /// Generalized coordinates for `mask`, in its canonical axis order
    pub fn coordinates(&self, mask: &DofMask) -> Vec<f32> {
        mask.axes()
            .map(|axis| match axis {
                Axis::RotateX => self.theta.x,
                Axis::RotateY => self.theta.y,
                Axis::RotateZ => self.theta.z,
                _ => 0.0,
            })
            .collect()
    }

    /// Euclidean norm of the angular position
    pub fn deflection(&self) -> f32 {
        self.theta.length()
    }

    pub fn reset(&mut self) {
        self.theta = Vec3::ZERO;
        self.omega = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_axes() -> DofMask {
        DofMask::new(&[Axis::RotateX, Axis::RotateY, Axis::RotateZ])
    }

    #[test]
    fn test_equilibrium_is_fixed_point() {
        let mut sd = SpringDamper::new(DynamicsParams::new(2.0, 30.0, 10.0), all_axes());
        for _ in 0..1000 {
            sd.integrate(BodyId(0), Vec3::ZERO, 0.001).unwrap();
        }
        assert_eq!(sd.theta, Vec3::ZERO);
        assert_eq!(sd.omega, Vec3::ZERO);
    }

    #[test]
    fn test_damped_settling_to_torque_over_spring() {
        let mut sd = SpringDamper::new(DynamicsParams::new(2.0, 30.0, 10.0), all_axes());
        let tau = Vec3::new(5.0, 0.0, 5.0);
        for _ in 0..10_000 {
            sd.integrate(BodyId(0), tau, 0.001).unwrap();
        }
        let target = tau.scale(1.0 / 30.0);
        assert!(sd.theta.distance(&target) < 0.01, "theta = {:?}", sd.theta);
    }

    #[test]
    fn test_undamped_keeps_oscillating() {
        let mut sd = SpringDamper::new(DynamicsParams::new(2.0, 30.0, 0.0), all_axes());
        let tau = Vec3::new(5.0, 0.0, 5.0);
        let target = tau.scale(1.0 / 30.0);

        let mut max_late_error = 0.0f32;
        for i in 0..10_000 {
            sd.integrate(BodyId(0), tau, 0.001).unwrap();
            if i > 9_000 {
                max_late_error = max_late_error.max(sd.theta.distance(&target));
            }
        }
        // Amplitude of the swing around target does not decay
        assert!(max_late_error > 0.1, "error = {}", max_late_error);
    }

    #[test]
    fn test_semi_implicit_order() {
        let mut sd = SpringDamper::new(DynamicsParams::new(1.0, 0.0, 0.0), all_axes());
        sd.integrate(BodyId(0), Vec3::new(1.0, 0.0, 0.0), 0.5).unwrap();
        // omega' = 0.5, theta' = omega' * dt = 0.25
        assert!((sd.omega.x - 0.5).abs() < 1e-6);
        assert!((sd.theta.x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_axes_ignore_torque() {
        let mask = DofMask::new(&[Axis::RotateX, Axis::RotateZ]);
        let mut sd = SpringDamper::new(DynamicsParams::new(2.0, 30.0, 10.0), mask);
        for _ in 0..100 {
            sd.integrate(BodyId(0), Vec3::new(1.0, 7.0, 1.0), 0.01).unwrap();
        }
        assert_eq!(sd.theta.y, 0.0);
        assert_eq!(sd.coordinates(&mask), vec![sd.theta.x, sd.theta.z]);
    }

    #[test]
    fn test_uninitialized_fails_fast() {
        let mut sd = SpringDamper::uninitialized(all_axes());
        assert_eq!(
            sd.integrate(BodyId(4), Vec3::RIGHT, 0.001),
            Err(ErrorKind::Uninitialized(BodyId(4)))
        );
        assert_eq!(sd.theta, Vec3::ZERO);

        sd.configure(DynamicsParams::new(1.0, 1.0, 1.0));
        assert!(sd.integrate(BodyId(4), Vec3::RIGHT, 0.001).is_ok());
    }
}
