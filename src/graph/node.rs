use serde::{Deserialize, Serialize};

use crate::dynamics::SpringDamper;
use crate::math::{Mat4, Vec3};
use super::dof::DofMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub usize);

/// Opaque mesh token handed out by the asset collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// What a renderer needs to draw a body; the core never looks inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub mesh: MeshHandle,
    pub color: [f32; 4],
}

impl Visual {
    pub fn new(mesh: MeshHandle, color: [f32; 4]) -> Self {
        Self { mesh, color }
    }
}

/// A rigid segment of the plant
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    /// Position/scale relative to the incoming joint
    pub local_transform: Mat4,
    pub visual: Visual,
    /// Present only on bodies that respond to forces
    pub dynamics: Option<SpringDamper>,
    pub(crate) parent: Option<JointId>,
    pub(crate) children: Vec<JointId>,
}

impl Body {
    pub fn new(name: &str, local_transform: Mat4, visual: Visual) -> Self {
        Self {
            name: name.to_string(),
            local_transform,
            visual,
            dynamics: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_dynamics(mut self, dynamics: SpringDamper) -> Self {
        self.dynamics = Some(dynamics);
        self
    }

    pub fn parent_joint(&self) -> Option<JointId> {
        self.parent
    }

    /// Outgoing joints that are still attached
    pub fn children(&self) -> &[JointId] {
        &self.children
    }
}

/// An articulated connector between a parent body (none for the root) and one child
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub(crate) parent: Option<BodyId>,
    pub(crate) child: BodyId,
    /// Rest offset from the parent body's frame
    pub placement: Mat4,
    pub(crate) dof: DofMask,
    pub(crate) coordinates: Vec<f32>,
    pub(crate) articulation: Mat4,
    /// Reference point in the child body's local frame
    pub end_effector: Option<Vec3>,
    pub(crate) detached: bool,
}

impl Joint {
    pub fn new(name: &str, placement: Mat4, dof: DofMask) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            child: BodyId(usize::MAX),
            placement,
            dof,
            coordinates: vec![0.0; dof.count()],
            articulation: Mat4::identity(),
            end_effector: None,
            detached: false,
        }
    }

    pub fn with_end_effector(mut self, local_point: Vec3) -> Self {
        self.end_effector = Some(local_point);
        self
    }

    pub fn parent_body(&self) -> Option<BodyId> {
        self.parent
    }

    pub fn child_body(&self) -> BodyId {
        self.child
    }

    pub fn dof(&self) -> DofMask {
        self.dof
    }

    pub fn coordinates(&self) -> &[f32] {
        &self.coordinates
    }

    pub fn articulation(&self) -> &Mat4 {
        &self.articulation
    }

    /// placement * articulation
    pub fn local_transform(&self) -> Mat4 {
        self.placement.mul(&self.articulation)
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}
