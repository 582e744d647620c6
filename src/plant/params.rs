use serde::{Deserialize, Serialize};

use crate::dynamics::DynamicsParams;
use crate::graph::{Axis, MeshHandle};
use crate::math::Vec3;

/// Stem joints bend about X and Z
pub const STEM_DOF: [Axis; 2] = [Axis::RotateX, Axis::RotateZ];

/// Seed joints swing about X and Y
pub const SEED_DOF: [Axis; 2] = [Axis::RotateX, Axis::RotateY];

/// Deflection norm past which a seed lets go
pub const DETACH_THRESHOLD: f32 = 0.8;

/// Mesh tokens the asset side assigns once; the plant never interprets them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantMeshes {
    pub stem: MeshHandle,
    pub receptacle: MeshHandle,
    pub seed: MeshHandle,
    pub tip: MeshHandle,
    pub leaf: MeshHandle,
}

impl Default for PlantMeshes {
    fn default() -> Self {
        Self {
            stem: MeshHandle(0),     // cylinder, unit length along z
            receptacle: MeshHandle(1), // unit sphere
            seed: MeshHandle(0),
            tip: MeshHandle(1),
            leaf: MeshHandle(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantPalette {
    pub stem: [f32; 4],
    pub receptacle: [f32; 4],
    pub seed: [f32; 4],
    pub tip: [f32; 4],
    pub leaf: [f32; 4],
}

impl Default for PlantPalette {
    fn default() -> Self {
        Self {
            stem: [0.0, 1.0, 0.0, 1.0],
            receptacle: [1.0, 1.0, 1.0, 1.0],
            seed: [1.0, 1.0, 1.0, 1.0],
            tip: [1.0, 1.0, 1.0, 1.0],
            leaf: [0.2, 0.6, 0.2, 1.0],
        }
    }
}

/// Geometry and physics constants for one plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParams {
    pub stem_segments: usize,
    pub stem_length: f32,
    pub stem_width: f32,
    pub receptacle_radius: f32,
    pub seed_count: usize,
    pub seed_length: f32,
    pub seed_width: f32,
    /// Disc radius used when sampling wind at a seed tip
    pub pappus_radius: f32,
    pub seed_axes: Vec<Axis>,
    pub stem_dynamics: DynamicsParams,
    pub seed_dynamics: DynamicsParams,
    pub detach_enabled: bool,
    pub detach_threshold: f32,
    /// Static ground leaf drawn beside the stem
    pub leaf: bool,
    /// Leaf placement relative to the ground point
    pub leaf_offset: Vec3,
    pub leaf_scale: f32,
    /// Small marker at each attached seed tip
    pub show_tips: bool,
    pub rng_seed: u64,
    pub meshes: PlantMeshes,
    pub palette: PlantPalette,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            stem_segments: 7,
            stem_length: 5.0,
            stem_width: 0.15,
            receptacle_radius: 0.5,
            seed_count: 15,
            seed_length: 1.2,
            seed_width: 0.05,
            pappus_radius: 0.25,
            seed_axes: SEED_DOF.to_vec(),
            stem_dynamics: DynamicsParams::new(2.0, 30.0, 10.0),
            seed_dynamics: DynamicsParams::new(5.0, 20.0, 4.0),
            detach_enabled: true,
            detach_threshold: DETACH_THRESHOLD,
            leaf: true,
            leaf_offset: Vec3::new(0.0, 1.0, 0.0),
            leaf_scale: 2.0,
            show_tips: false,
            rng_seed: 42,
            meshes: PlantMeshes::default(),
            palette: PlantPalette::default(),
        }
    }
}

impl PlantParams {
    pub fn segment_length(&self) -> f32 {
        self.stem_length / self.stem_segments.max(1) as f32
    }
}
