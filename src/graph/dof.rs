//! Degree-of-freedom masks and the articulation they produce

use serde::{Deserialize, Serialize};

use crate::math::{Mat4, Vec3};

/// A single articulable axis; declaration order is the canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    RotateX,
    RotateY,
    RotateZ,
    TranslateX,
    TranslateY,
    TranslateZ,
}

impl Axis {
    pub const CANONICAL: [Axis; 6] = [
        Axis::RotateX,
        Axis::RotateY,
        Axis::RotateZ,
        Axis::TranslateX,
        Axis::TranslateY,
        Axis::TranslateZ,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    pub fn is_rotation(self) -> bool {
        matches!(self, Axis::RotateX | Axis::RotateY | Axis::RotateZ)
    }

    /// World-fixed unit vector for this axis
    pub fn direction(self) -> Vec3 {
        match self {
            Axis::RotateX | Axis::TranslateX => Vec3::RIGHT,
            Axis::RotateY | Axis::TranslateY => Vec3::UP,
            Axis::RotateZ | Axis::TranslateZ => Vec3::FORWARD,
        }
    }

    /// Pure rotation or translation of `amount` along this axis
    pub fn transform(self, amount: f32) -> Mat4 {
        match self {
            Axis::RotateX => Mat4::rotation_x(amount),
            Axis::RotateY => Mat4::rotation_y(amount),
            Axis::RotateZ => Mat4::rotation_z(amount),
            Axis::TranslateX => Mat4::translation(amount, 0.0, 0.0),
            Axis::TranslateY => Mat4::translation(0.0, amount, 0.0),
            Axis::TranslateZ => Mat4::translation(0.0, 0.0, amount),
        }
    }
}

/// Ordered subset of the six axes a joint may move along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DofMask {
    enabled: [bool; 6],
}

impl DofMask {
    /// Fixed joint
    pub const NONE: DofMask = DofMask { enabled: [false; 6] };

    /// Input order is irrelevant; axes are always walked canonically
    pub fn new(axes: &[Axis]) -> Self {
        let mut enabled = [false; 6];
        for axis in axes {
            enabled[axis.slot()] = true;
        }
        Self { enabled }
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.enabled[axis.slot()]
    }

    /// Number of generalized coordinates this mask consumes
    pub fn count(&self) -> usize {
        self.enabled.iter().filter(|&&e| e).count()
    }

    pub fn is_fixed(&self) -> bool {
        self.count() == 0
    }

    /// Enabled axes in canonical order
    pub fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::CANONICAL.into_iter().filter(move |a| self.contains(*a))
    }

    pub fn rotation_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        self.axes().filter(|a| a.is_rotation())
    }

    pub fn is_rotation_only(&self) -> bool {
        self.axes().all(|a| a.is_rotation())
    }

    /// 1.0 on enabled rotation axes, 0.0 elsewhere
    pub fn rotation_selector(&self) -> Vec3 {
        let pick = |axis| if self.contains(axis) { 1.0 } else { 0.0 };
        Vec3::new(pick(Axis::RotateX), pick(Axis::RotateY), pick(Axis::RotateZ))
    }

    /// Articulation for `coords`, each enabled axis left-composed in canonical order.
    /// Caller guarantees `coords.len() == self.count()`.
    pub fn articulation(&self, coords: &[f32]) -> Mat4 {
        self.axes()
            .zip(coords.iter())
            .fold(Mat4::identity(), |acc, (axis, &q)| axis.transform(q).mul(&acc))
    }
}
