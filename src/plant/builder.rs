//! One-shot construction of the plant's joint tree

use std::f32::consts::PI;

use log::debug;
use rand::Rng;

use crate::dynamics::SpringDamper;
use crate::error::Result;
use crate::graph::{Body, BodyId, DofMask, Joint, JointId, KinematicGraph, Visual};
use crate::math::{Mat4, Vec3};
use super::params::{PlantParams, STEM_DOF};

/// Seed tip on the unit cylinder spanning z in [-0.5, 0.5]
pub const SEED_TIP: Vec3 = Vec3::new(0.0, 0.0, 0.5);

/// A seed still hanging on the receptacle
#[derive(Debug, Clone, Copy)]
pub struct SeedSlot {
    pub joint: JointId,
    pub body: BodyId,
    /// Wind force sampled at the tip on the latest tick
    pub last_force: Vec3,
}

/// Everything the plant needs to find its parts again after construction
#[derive(Debug, Clone)]
pub struct PlantLayout {
    pub graph: KinematicGraph,
    /// Stem segment bodies, ground first
    pub stems: Vec<BodyId>,
    /// Fixed joint carrying the receptacle; its end effector is the receptacle centre
    pub receptacle_joint: JointId,
    pub receptacle: BodyId,
    pub seeds: Vec<SeedSlot>,
    pub leaf: Option<Mat4>,
}

/// Evenly spread `samples` points over a sphere of `radius` with a golden-angle spiral,
/// from the top pole down
pub fn fibonacci_sphere(samples: usize, radius: f32) -> Vec<Vec3> {
    let golden_angle = PI * (5.0f32.sqrt() - 1.0);
    let last = samples.saturating_sub(1).max(1) as f32;

    (0..samples)
        .map(|i| {
            let y = radius - (i as f32 / last) * radius * 2.0;
            let ring = (radius * radius - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f32;
            Vec3::new(theta.cos() * ring, y, theta.sin() * ring)
        })
        .collect()
}

/// Build the stem chain, receptacle and seeds rooted at `ground`
pub fn build<R: Rng>(ground: Vec3, params: &PlantParams, rng: &mut R) -> Result<PlantLayout> {
    let stem_dof = DofMask::new(&STEM_DOF);
    let seg_len = params.segment_length();

    let stem_transform = Mat4::translation(0.0, seg_len / 2.0, 0.0)
        .mul(&Mat4::rotation_x(PI / 2.0))
        .mul(&Mat4::scale(params.stem_width, params.stem_width, seg_len));
    let stem_body = |i: usize| {
        Body::new(
            &format!("stem_{}", i),
            stem_transform,
            Visual::new(params.meshes.stem, params.palette.stem),
        )
        .with_dynamics(SpringDamper::new(params.stem_dynamics, stem_dof))
    };

    let mut graph = KinematicGraph::new(
        Joint::new("root", Mat4::translation_vec(ground), stem_dof),
        stem_body(0),
    );
    let mut stems = vec![graph.joint(graph.root())?.child_body()];

    for i in 1..params.stem_segments {
        let parent = stems[i - 1];
        let joint = Joint::new("stem_joint", Mat4::translation(0.0, seg_len, 0.0), stem_dof);
        let (_, body) = graph.attach(parent, joint, stem_body(i))?;
        stems.push(body);
    }

    let r = params.receptacle_radius;
    let tip_of_stem = stems[stems.len() - 1];
    let receptacle_body = Body::new(
        "receptacle",
        Mat4::translation(0.0, r, 0.0).mul(&Mat4::scale(r, r, r)),
        Visual::new(params.meshes.receptacle, params.palette.receptacle),
    );
    let receptacle_joint = Joint::new("receptacle_joint", Mat4::translation(0.0, seg_len, 0.0), DofMask::NONE)
        .with_end_effector(Vec3::ZERO);
    let (receptacle_joint, receptacle) = graph.attach(tip_of_stem, receptacle_joint, receptacle_body)?;

    let seed_dof = DofMask::new(&params.seed_axes);
    let mut seeds = Vec::with_capacity(params.seed_count);
    for (i, point) in fibonacci_sphere(params.seed_count, r).into_iter().enumerate() {
        let normal = point.normalize();
        let seed_transform = Mat4::translation_vec(normal.scale(params.seed_length / 2.0))
            .mul(&Mat4::align_z(normal))
            .mul(&Mat4::scale(params.seed_width, params.seed_width, params.seed_length));

        let body = Body::new(
            &format!("seed_{}", i),
            seed_transform,
            Visual::new(params.meshes.seed, params.palette.seed),
        )
        .with_dynamics(SpringDamper::new(params.seed_dynamics, seed_dof));

        let attach = Joint::new(
            "attach_joint",
            Mat4::translation(point.x, point.y + r, point.z),
            seed_dof,
        )
        .with_end_effector(SEED_TIP);

        let (joint, body) = graph.attach(receptacle, attach, body)?;
        seeds.push(SeedSlot { joint, body, last_force: Vec3::ZERO });
    }

    let leaf = params.leaf.then(|| {
        let yaw = rng.gen_range(0.0..2.0 * PI);
        let s = params.leaf_scale;
        Mat4::translation_vec(ground + params.leaf_offset)
            .mul(&Mat4::rotation_y(yaw))
            .mul(&Mat4::scale(s, s, s))
    });

    debug!(
        "built plant: {} stem segments, {} seeds, {} bodies",
        stems.len(),
        seeds.len(),
        graph.body_count()
    );

    Ok(PlantLayout {
        graph,
        stems,
        receptacle_joint,
        receptacle,
        seeds,
        leaf,
    })
}
