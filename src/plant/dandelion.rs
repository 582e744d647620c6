//! The animated plant: stem and seeds bend under wind, seeds let go and fly

use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::dynamics::{step_body, torque_about};
use crate::error::{ErrorKind, Result};
use crate::flight::{build_flight_path, random_upward, DetachedSeed, FlightMode, FlightParams, FlightTracker};
use crate::graph::{BodyId, JointId, KinematicGraph};
use crate::math::{Mat4, Vec3};
use crate::wind::{total_force, WindField};
use super::builder::{self, SeedSlot};
use super::draw::{DrawTarget, Material};
use super::params::PlantParams;

/// Tip markers are drawn at this uniform scale
const TIP_MARKER_SCALE: f32 = 0.1;

pub struct Dandelion {
    params: PlantParams,
    flight: FlightParams,
    graph: KinematicGraph,
    ground: Vec3,
    stems: Vec<BodyId>,
    receptacle_joint: JointId,
    seeds: Vec<SeedSlot>,
    flights: FlightTracker,
    leaf: Option<Mat4>,
    detached: usize,
    rng: SmallRng,
}

impl Dandelion {
    /// Plant with default geometry, a custom stem length and detachment on or off
    pub fn construct(ground_position: Vec3, stem_length: f32, detach_enabled: bool) -> Result<Self> {
        let params = PlantParams {
            stem_length,
            detach_enabled,
            ..PlantParams::default()
        };
        Self::with_params(ground_position, params, FlightParams::default())
    }

    pub fn with_params(ground_position: Vec3, params: PlantParams, flight: FlightParams) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(params.rng_seed);
        let layout = builder::build(ground_position, &params, &mut rng)?;

        Ok(Self {
            params,
            flight,
            graph: layout.graph,
            ground: ground_position,
            stems: layout.stems,
            receptacle_joint: layout.receptacle_joint,
            seeds: layout.seeds,
            flights: FlightTracker::new(),
            leaf: layout.leaf,
            detached: 0,
            rng,
        })
    }

    /// One physics tick against the given wind fields (already advanced in time):
    /// stem segments, then seeds, then detachment, then seeds in flight
    pub fn update(&mut self, dt: f32, winds: &[WindField]) -> Result<()> {
        self.integrate_stem(dt, winds)?;
        let over_threshold = self.integrate_seeds(dt, winds)?;

        if self.params.detach_enabled {
            for joint in over_threshold {
                self.detach_seed(joint)?;
            }
        }

        self.flights.advance(dt, winds, &self.flight);
        Ok(())
    }

    /// Wind is sampled once at the receptacle; each segment feels it through its lever arm
    /// about the ground anchor
    fn integrate_stem(&mut self, dt: f32, winds: &[WindField]) -> Result<()> {
        let receptacle = self.graph.end_effector_position(self.receptacle_joint)?;
        let force = total_force(winds, receptacle, self.params.receptacle_radius);
        let anchor = self.graph.joint_position(self.graph.root())?;

        for &segment in &self.stems {
            let torque = if winds.is_empty() {
                Vec3::ZERO
            } else {
                torque_about(anchor, self.graph.global_position(segment)?, force)
            };
            step_body(&mut self.graph, segment, torque, dt)?;
        }
        Ok(())
    }

    /// Returns joints of seeds whose deflection passed the threshold this tick
    fn integrate_seeds(&mut self, dt: f32, winds: &[WindField]) -> Result<Vec<JointId>> {
        let mut over = Vec::new();

        for slot in &mut self.seeds {
            let tip = self.graph.end_effector_position(slot.joint)?;
            let pivot = self.graph.joint_position(slot.joint)?;
            let force = total_force(winds, tip, self.params.pappus_radius);
            slot.last_force = force;

            let deflection = step_body(&mut self.graph, slot.body, torque_about(pivot, tip, force), dt)?;
            if deflection > self.params.detach_threshold {
                over.push(slot.joint);
            }
        }
        Ok(over)
    }

    /// Cut a seed loose and hand it to the flight tracker. Stem and receptacle
    /// joints are refused with `NotASeed`.
    pub fn detach_seed(&mut self, joint: JointId) -> Result<()> {
        let index = match self.seeds.iter().position(|s| s.joint == joint) {
            Some(i) => i,
            None if self.graph.is_attached(joint)? => return Err(ErrorKind::NotASeed(joint)),
            None => return Err(ErrorKind::AlreadyDetached(joint)),
        };

        let body = self.graph.detach(joint)?;
        let last_force = self.seeds.remove(index).last_force;

        let pose = self.graph.global_transform(body)?;
        let start = pose.translation_part();
        let b = self.graph.body_mut(body)?;
        b.dynamics = None;
        let visual = b.visual;

        let tangent = last_force.scale(self.flight.wind_tangent_gain);
        let seed = match self.flight.mode {
            FlightMode::Spline => {
                let path = build_flight_path(start, tangent, &self.flight, &mut self.rng);
                DetachedSeed::on_spline(visual, pose, path, self.flight.speed)
            }
            FlightMode::Ballistic => {
                let velocity = if tangent.is_zero() {
                    random_upward(&mut self.rng, self.flight.tangent_scale)
                } else {
                    tangent
                };
                DetachedSeed::ballistic(visual, pose, start, velocity, self.ground)
            }
        };

        self.flights.launch(seed);
        self.detached += 1;
        info!(
            "seed {:?} detached at ({:.2}, {:.2}, {:.2}), {} left on the plant",
            joint, start.x, start.y, start.z, self.seeds.len()
        );
        Ok(())
    }

    /// Pre-order walk of the attached tree, then tip markers, seeds in flight and the leaf
    pub fn draw<U, T: DrawTarget<U>>(&self, target: &mut T, uniforms: &U, material: &Material) -> Result<()> {
        for (body, transform) in self.graph.iter_preorder() {
            let visual = self.graph.body(body)?.visual;
            target.draw(visual.mesh, uniforms, &transform, &material.with_color(visual.color));
        }

        if self.params.show_tips {
            let tip_material = material.with_color(self.params.palette.tip);
            for slot in &self.seeds {
                let tip = self.graph.end_effector_position(slot.joint)?;
                let marker = Mat4::translation_vec(tip).mul(&Mat4::scale(
                    TIP_MARKER_SCALE,
                    TIP_MARKER_SCALE,
                    TIP_MARKER_SCALE,
                ));
                target.draw(self.params.meshes.tip, uniforms, &marker, &tip_material);
            }
        }

        for seed in self.flights.iter() {
            target.draw(seed.visual.mesh, uniforms, &seed.transform(), &material.with_color(seed.visual.color));
        }

        if let Some(leaf) = &self.leaf {
            target.draw(self.params.meshes.leaf, uniforms, leaf, &material.with_color(self.params.palette.leaf));
        }
        Ok(())
    }

    pub fn graph(&self) -> &KinematicGraph {
        &self.graph
    }

    pub fn params(&self) -> &PlantParams {
        &self.params
    }

    pub fn stems(&self) -> &[BodyId] {
        &self.stems
    }

    pub fn seeds(&self) -> &[SeedSlot] {
        &self.seeds
    }

    pub fn receptacle_position(&self) -> Result<Vec3> {
        self.graph.end_effector_position(self.receptacle_joint)
    }

    pub fn flights(&self) -> &FlightTracker {
        &self.flights
    }

    /// Seeds still on the receptacle
    pub fn attached_count(&self) -> usize {
        self.seeds.len()
    }

    /// Seeds detached since construction, landed or not
    pub fn detached_count(&self) -> usize {
        self.detached
    }

    pub fn in_flight_count(&self) -> usize {
        self.flights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::FlightState;
    use crate::plant::DrawList;
    use crate::wind::WindParams;

    fn quiet_plant(detach: bool) -> Dandelion {
        Dandelion::construct(Vec3::new(0.0, 0.0, 0.0), 5.0, detach).unwrap()
    }

    fn gale() -> WindField {
        WindField::new(WindParams {
            source: Vec3::new(-3.0, 5.0, 0.0),
            direction: Vec3::RIGHT,
            magnitude: 8.0,
            variability: 0.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_root_child_at_ground_when_resting() {
        let plant = Dandelion::construct(Vec3::new(2.0, 0.5, -1.0), 5.0, false).unwrap();
        let g = plant.graph();
        let first = g.joint(g.root()).unwrap().child_body();
        let origin = g.joint_position(g.parent_joint(first).unwrap()).unwrap();
        assert!(origin.distance(&Vec3::new(2.0, 0.5, -1.0)) < 1e-6);
        assert!((plant.receptacle_position().unwrap().y - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_wind_stays_at_rest() {
        let mut plant = quiet_plant(true);
        for _ in 0..2000 {
            plant.update(0.001, &[]).unwrap();
        }
        for &stem in plant.stems() {
            let sd = plant.graph().body(stem).unwrap().dynamics.clone().unwrap();
            assert_eq!(sd.theta, Vec3::ZERO);
            assert_eq!(sd.omega, Vec3::ZERO);
        }
        assert_eq!(plant.attached_count(), 15);
        assert_eq!(plant.detached_count(), 0);
    }

    #[test]
    fn test_wind_bends_stem_downwind() {
        let mut plant = quiet_plant(false);
        let rest = plant.receptacle_position().unwrap();
        let winds = [gale()];
        for _ in 0..500 {
            plant.update(0.001, &winds).unwrap();
        }
        let bent = plant.receptacle_position().unwrap();
        assert!(bent.x > rest.x);
        assert!(bent.y < rest.y);
    }

    #[test]
    fn test_seed_detaches_once_past_threshold() {
        let mut plant = quiet_plant(true);
        let slot = plant.seeds()[3];
        let receptacle = plant.graph().joint(slot.joint).unwrap().parent_body().unwrap();

        // Drive the seed joint with a synthetic torque until it passes 0.8
        let mut deflection = 0.0;
        while deflection <= 0.8 {
            deflection = step_body(&mut plant.graph, slot.body, Vec3::new(40.0, 0.0, 0.0), 0.001).unwrap();
        }
        plant.update(0.001, &[]).unwrap();

        let children = plant.graph().body(receptacle).unwrap().children();
        assert!(!children.contains(&slot.joint));
        assert_eq!(children.len(), 14);
        assert_eq!(plant.attached_count(), 14);
        assert_eq!(plant.detached_count(), 1);
        assert_eq!(plant.in_flight_count(), 1);
        assert!(plant.flights().iter().all(|s| s.state() == FlightState::Flying));
        assert!(plant.graph().body(slot.body).unwrap().dynamics.is_none());

        assert_eq!(plant.detach_seed(slot.joint), Err(ErrorKind::AlreadyDetached(slot.joint)));
        assert_eq!(plant.detached_count(), 1);
    }

    #[test]
    fn test_only_seeds_can_detach() {
        let mut plant = quiet_plant(true);
        let stem_joint = plant.graph().parent_joint(plant.stems()[3]).unwrap();
        let receptacle_joint = plant.receptacle_joint;

        assert_eq!(plant.detach_seed(stem_joint), Err(ErrorKind::NotASeed(stem_joint)));
        assert_eq!(plant.detach_seed(receptacle_joint), Err(ErrorKind::NotASeed(receptacle_joint)));

        assert!(plant.graph().is_attached(stem_joint).unwrap());
        assert!(plant.graph().is_attached(receptacle_joint).unwrap());
        assert!(plant.graph().body(plant.stems()[3]).unwrap().dynamics.is_some());
        assert_eq!(plant.in_flight_count(), 0);
        assert_eq!(plant.detached_count(), 0);
        assert_eq!(plant.attached_count(), 15);

        let winds = [gale()];
        for _ in 0..10 {
            plant.update(0.001, &winds).unwrap();
        }
    }

    #[test]
    fn test_detach_disabled_keeps_seeds() {
        let mut plant = quiet_plant(false);
        let slot = plant.seeds()[0];
        for _ in 0..3000 {
            step_body(&mut plant.graph, slot.body, Vec3::new(40.0, 0.0, 0.0), 0.001).unwrap();
        }
        plant.update(0.001, &[]).unwrap();
        assert_eq!(plant.attached_count(), 15);
        assert_eq!(plant.in_flight_count(), 0);
    }

    #[test]
    fn test_flight_completes_and_is_dropped() {
        let mut plant = quiet_plant(true);
        let joint = plant.seeds()[0].joint;
        plant.detach_seed(joint).unwrap();
        assert_eq!(plant.in_flight_count(), 1);

        // speed 0.05 at 0.01 per tick: 2000 ticks
        for _ in 0..2000 {
            plant.update(0.01, &[]).unwrap();
        }
        assert_eq!(plant.in_flight_count(), 0);
        assert_eq!(plant.detached_count(), 1);
        assert_eq!(plant.flights().landed(), 1);
    }

    #[test]
    fn test_ballistic_seed_starts_at_detachment() {
        let params = PlantParams::default();
        let flight = FlightParams { mode: FlightMode::Ballistic, ..FlightParams::default() };
        let mut plant = Dandelion::with_params(Vec3::ZERO, params, flight).unwrap();
        let slot = plant.seeds()[5];
        let start = plant.graph().global_position(slot.body).unwrap();

        plant.detach_seed(slot.joint).unwrap();
        let seed = plant.flights().iter().next().unwrap();
        assert_eq!(seed.progress(), None);
        assert!(seed.position().distance(&start) < 1e-6);
    }

    #[test]
    fn test_draw_emits_every_part() {
        let mut plant = quiet_plant(true);
        let mut list = DrawList::new();
        plant.draw(&mut list, &(), &Material::default()).unwrap();
        // 7 stem segments, receptacle, 15 seeds, leaf
        assert_eq!(list.len(), 7 + 1 + 15 + 1);

        let (_, first, color) = list.record(0).unwrap();
        assert!(first.approx_eq(&plant.graph().global_transform(plant.stems()[0]).unwrap(), 1e-6));
        assert_eq!(color, plant.params().palette.stem);

        let joint = plant.seeds()[0].joint;
        plant.detach_seed(joint).unwrap();
        list.clear();
        plant.draw(&mut list, &(), &Material::default()).unwrap();
        assert_eq!(list.len(), 7 + 1 + 14 + 1 + 1);
    }

    #[test]
    fn test_tip_markers_sit_on_seed_tips() {
        let params = PlantParams { show_tips: true, ..PlantParams::default() };
        let plant = Dandelion::with_params(Vec3::ZERO, params, FlightParams::default()).unwrap();
        let mut list = DrawList::new();
        plant.draw(&mut list, &(), &Material::default()).unwrap();
        // 7 stem segments, receptacle, 15 seeds, 15 tip markers, leaf
        assert_eq!(list.len(), 7 + 1 + 15 + 15 + 1);

        let first_marker = 7 + 1 + 15;
        for (i, slot) in plant.seeds().iter().enumerate() {
            let (mesh, transform, color) = list.record(first_marker + i).unwrap();
            assert_eq!(mesh, plant.params().meshes.tip);
            assert_eq!(color, plant.params().palette.tip);
            assert!((transform.at(0, 0) - TIP_MARKER_SCALE).abs() < 1e-6);
            assert!((transform.at(1, 1) - TIP_MARKER_SCALE).abs() < 1e-6);
            assert!((transform.at(2, 2) - TIP_MARKER_SCALE).abs() < 1e-6);
            let tip = plant.graph().end_effector_position(slot.joint).unwrap();
            assert!(transform.translation_part().distance(&tip) < 1e-5);
        }
    }

    #[test]
    fn test_preorder_matches_root_walk() {
        let mut plant = quiet_plant(false);
        let winds = [gale()];
        for _ in 0..200 {
            plant.update(0.001, &winds).unwrap();
        }
        for (body, transform) in plant.graph().iter_preorder() {
            let walked = plant.graph().global_transform(body).unwrap();
            assert!(transform.approx_eq(&walked, 1e-4));
        }
    }

    #[test]
    fn test_bad_seed_axes_surface_as_mismatch() {
        let mut plant = quiet_plant(false);
        let joint = plant.seeds()[0].joint;
        let err = plant.graph.set_articulation(joint, &[0.1, 0.2, 0.3]).unwrap_err();
        assert_eq!(err, ErrorKind::DofMismatch { joint, expected: 2, got: 3 });
    }
}
