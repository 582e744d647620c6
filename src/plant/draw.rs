//! Rendering boundary: the plant emits draw calls, something else rasterizes them

use crate::graph::MeshHandle;
use crate::math::Mat4;

/// Shading parameters passed through to the renderer; only `color` is overridden per body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: f32,
    pub diffusivity: f32,
    pub specularity: f32,
    pub color: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: 0.3,
            diffusivity: 0.8,
            specularity: 0.2,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Material {
    pub fn with_color(&self, color: [f32; 4]) -> Self {
        Self { color, ..*self }
    }
}

/// Anything that can draw a mesh at a transform. `U` is the renderer's own
/// per-frame uniform bundle (camera, lights), opaque to the plant.
pub trait DrawTarget<U> {
    fn draw(&mut self, mesh: MeshHandle, uniforms: &U, transform: &Mat4, material: &Material);
}

/// Floats per record in a [`DrawList`]: mesh id, 16 matrix entries, RGBA
pub const DRAW_RECORD_LEN: usize = 21;

/// Flattens draw calls into one float buffer for upload across the wasm boundary
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    data: Vec<f32>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len() / DRAW_RECORD_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mesh, transform and color of record `i`
    pub fn record(&self, i: usize) -> Option<(MeshHandle, Mat4, [f32; 4])> {
        let r = self.data.get(i * DRAW_RECORD_LEN..(i + 1) * DRAW_RECORD_LEN)?;
        let mut m = Mat4::identity();
        m.data.copy_from_slice(&r[1..17]);
        Some((MeshHandle(r[0] as u32), m, [r[17], r[18], r[19], r[20]]))
    }
}

impl<U> DrawTarget<U> for DrawList {
    fn draw(&mut self, mesh: MeshHandle, _uniforms: &U, transform: &Mat4, material: &Material) {
        self.data.push(mesh.0 as f32);
        self.data.extend_from_slice(transform.as_slice());
        self.data.extend_from_slice(&material.color);
    }
}
