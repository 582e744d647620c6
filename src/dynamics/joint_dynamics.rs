//! Drives a body's spring-damper and writes the new angles back into the graph

use crate::error::{ErrorKind, Result};
use crate::graph::{BodyId, KinematicGraph};
use crate::math::Vec3;

/// Integrate the dynamics attached to `body` under `external_torque`, then push the
/// resulting angles into its incoming joint. Returns the new deflection norm.
pub fn step_body(graph: &mut KinematicGraph, body: BodyId, external_torque: Vec3, dt: f32) -> Result<f32> {
    let joint = graph.parent_joint(body)?;
    let mask = graph.dof(joint)?;

    let dynamics = graph
        .body_mut(body)?
        .dynamics
        .as_mut()
        .ok_or(ErrorKind::Uninitialized(body))?;
    dynamics.integrate(body, external_torque, dt)?;

    let coordinates = dynamics.coordinates(&mask);
    let deflection = dynamics.deflection();

    graph.set_articulation(joint, &coordinates)?;
    Ok(deflection)
}

/// Lever-arm torque of `force` applied at `sample_point` about `pivot`
pub fn torque_about(pivot: Vec3, sample_point: Vec3, force: Vec3) -> Vec3 {
    (sample_point - pivot).cross(&force)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{DynamicsParams, SpringDamper};
    use crate::graph::{Axis, Body, DofMask, Joint, MeshHandle, Visual};
    use crate::math::Mat4;

    fn single_joint(dynamics: Option<SpringDamper>) -> KinematicGraph {
        let mask = DofMask::new(&[Axis::RotateX, Axis::RotateZ]);
        let mut body = Body::new("segment", Mat4::translation(0.0, 0.5, 0.0),
                                 Visual::new(MeshHandle(0), [0.0, 1.0, 0.0, 1.0]));
        body.dynamics = dynamics;
        KinematicGraph::new(Joint::new("root", Mat4::identity(), mask), body)
    }

    #[test]
    fn test_step_updates_articulation() {
        let mask = DofMask::new(&[Axis::RotateX, Axis::RotateZ]);
        let sd = SpringDamper::new(DynamicsParams::new(2.0, 30.0, 10.0), mask);
        let mut graph = single_joint(Some(sd));

        for _ in 0..10 {
            step_body(&mut graph, BodyId(0), Vec3::new(0.0, 0.0, 3.0), 0.001).unwrap();
        }

        let theta = graph.body(BodyId(0)).unwrap().dynamics.as_ref().unwrap().theta;
        let coords = graph.joint(graph.root()).unwrap().coordinates().to_vec();
        assert_eq!(coords, vec![theta.x, theta.z]);
        assert!(theta.z > 0.0);

        // Positive Z rotation tips the segment toward -X
        assert!(graph.global_position(BodyId(0)).unwrap().x < 0.0);
    }

    #[test]
    fn test_zero_wind_keeps_rest_pose() {
        let mask = DofMask::new(&[Axis::RotateX, Axis::RotateZ]);
        let sd = SpringDamper::new(DynamicsParams::new(2.0, 30.0, 10.0), mask);
        let mut graph = single_joint(Some(sd));
        for _ in 0..500 {
            assert_eq!(step_body(&mut graph, BodyId(0), Vec3::ZERO, 0.001).unwrap(), 0.0);
        }
        assert_eq!(graph.joint(graph.root()).unwrap().coordinates(), &[0.0, 0.0]);
    }

    #[test]
    fn test_missing_component_is_uninitialized() {
        let mut graph = single_joint(None);
        assert_eq!(
            step_body(&mut graph, BodyId(0), Vec3::ZERO, 0.001),
            Err(ErrorKind::Uninitialized(BodyId(0)))
        );
    }

    #[test]
    fn test_torque_about_pivot() {
        let t = torque_about(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 3.0, 0.0), Vec3::RIGHT);
        assert!((t.z + 2.0).abs() < 1e-6);
    }
}
