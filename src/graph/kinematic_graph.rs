//! Tree of bodies connected by articulated joints, with forward kinematics
//!
//! Bodies and joints live in flat arenas indexed by [`BodyId`] / [`JointId`].
//! Global transforms are never cached: each query walks the parent chain, so
//! a `set_articulation` is visible to the very next read.

use log::debug;

use crate::error::{ErrorKind, Result};
use crate::math::{Mat4, Vec3};
use super::dof::DofMask;
use super::node::{Body, BodyId, Joint, JointId};

#[derive(Debug, Clone)]
pub struct KinematicGraph {
    bodies: Vec<Body>,
    joints: Vec<Joint>,
    root: JointId,
}

impl KinematicGraph {
    /// Start a graph from its root joint (no parent body) and the body it carries
    pub fn new(root: Joint, root_body: Body) -> Self {
        let mut graph = Self {
            bodies: Vec::new(),
            joints: Vec::new(),
            root: JointId(0),
        };
        graph.root = graph.insert(None, root, root_body).0;
        graph
    }

    /// Hang `joint` and its child `body` off an existing body
    pub fn attach(&mut self, parent: BodyId, joint: Joint, body: Body) -> Result<(JointId, BodyId)> {
        self.body(parent)?;
        let (joint_id, body_id) = self.insert(Some(parent), joint, body);
        self.bodies[parent.0].children.push(joint_id);
        Ok((joint_id, body_id))
    }

    fn insert(&mut self, parent: Option<BodyId>, mut joint: Joint, mut body: Body) -> (JointId, BodyId) {
        let joint_id = JointId(self.joints.len());
        let body_id = BodyId(self.bodies.len());

        joint.parent = parent;
        joint.child = body_id;
        body.parent = Some(joint_id);
        body.children.clear();

        self.joints.push(joint);
        self.bodies.push(body);
        (joint_id, body_id)
    }

    pub fn root(&self) -> JointId {
        self.root
    }

    pub fn joint(&self, id: JointId) -> Result<&Joint> {
        self.joints.get(id.0).ok_or(ErrorKind::UnknownJoint(id))
    }

    pub fn joint_mut(&mut self, id: JointId) -> Result<&mut Joint> {
        self.joints.get_mut(id.0).ok_or(ErrorKind::UnknownJoint(id))
    }

    pub fn body(&self, id: BodyId) -> Result<&Body> {
        self.bodies.get(id.0).ok_or(ErrorKind::UnknownBody(id))
    }

    pub fn body_mut(&mut self, id: BodyId) -> Result<&mut Body> {
        self.bodies.get_mut(id.0).ok_or(ErrorKind::UnknownBody(id))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Incoming joint of a body
    pub fn parent_joint(&self, body: BodyId) -> Result<JointId> {
        self.body(body)?.parent.ok_or(ErrorKind::UnknownBody(body))
    }

    /// Recompute a joint's articulation from generalized coordinates
    pub fn set_articulation(&mut self, joint: JointId, coordinates: &[f32]) -> Result<()> {
        let j = self.joint_mut(joint)?;
        let expected = j.dof.count();
        if coordinates.len() != expected {
            return Err(ErrorKind::DofMismatch {
                joint,
                expected,
                got: coordinates.len(),
            });
        }

        j.articulation = j.dof.articulation(coordinates);
        j.coordinates.clear();
        j.coordinates.extend_from_slice(coordinates);
        Ok(())
    }

    /// Product of placement * articulation from the root down to `joint` inclusive
    pub fn joint_global_transform(&self, joint: JointId) -> Result<Mat4> {
        let mut transform = Mat4::identity();
        let mut current = Some(joint);

        while let Some(id) = current {
            let j = self.joint(id)?;
            transform = j.local_transform().mul(&transform);
            current = match j.parent {
                Some(parent_body) => self.body(parent_body)?.parent,
                None => None,
            };
        }

        Ok(transform)
    }

    pub fn joint_position(&self, joint: JointId) -> Result<Vec3> {
        Ok(self.joint_global_transform(joint)?.translation_part())
    }

    /// Accumulated joint chain post-multiplied by the body's own transform
    pub fn global_transform(&self, body: BodyId) -> Result<Mat4> {
        let b = self.body(body)?;
        let chain = match b.parent {
            Some(joint) => self.joint_global_transform(joint)?,
            None => Mat4::identity(),
        };
        Ok(chain.mul(&b.local_transform))
    }

    pub fn global_position(&self, body: BodyId) -> Result<Vec3> {
        Ok(self.global_transform(body)?.translation_part())
    }

    /// World position of a joint's end effector, or of its child body origin if it has none
    pub fn end_effector_position(&self, joint: JointId) -> Result<Vec3> {
        let j = self.joint(joint)?;
        let body_transform = self.global_transform(j.child)?;
        Ok(match j.end_effector {
            Some(local) => body_transform.transform_point(local),
            None => body_transform.translation_part(),
        })
    }

    /// Remove a joint from its parent body's child list, returning the orphaned child body.
    /// The joint keeps its parent link so the body's last pose stays readable.
    pub fn detach(&mut self, joint: JointId) -> Result<BodyId> {
        let j = self.joint(joint)?;
        if j.detached {
            return Err(ErrorKind::AlreadyDetached(joint));
        }
        let (parent, child) = (j.parent, j.child);

        if let Some(parent) = parent {
            self.bodies[parent.0].children.retain(|&c| c != joint);
        }
        self.joints[joint.0].detached = true;

        debug!("detached joint {:?} ({}) carrying body {:?}", joint, self.joints[joint.0].name, child);
        Ok(child)
    }

    pub fn is_attached(&self, joint: JointId) -> Result<bool> {
        Ok(!self.joint(joint)?.detached)
    }

    /// Number of joints between the root and this body, inclusive
    pub fn depth(&self, body: BodyId) -> Result<usize> {
        let mut depth = 0;
        let mut current = self.body(body)?.parent;
        while let Some(joint) = current {
            depth += 1;
            current = match self.joint(joint)?.parent {
                Some(parent_body) => self.body(parent_body)?.parent,
                None => None,
            };
        }
        Ok(depth)
    }

    /// Attached bodies in pre-order with their global transforms,
    /// composed incrementally from the root
    pub fn iter_preorder(&self) -> PreorderTransforms<'_> {
        let stack = if self.joints[self.root.0].detached {
            Vec::new()
        } else {
            vec![(self.root, Mat4::identity())]
        };
        PreorderTransforms { graph: self, stack }
    }

    pub fn dof(&self, joint: JointId) -> Result<DofMask> {
        Ok(self.joint(joint)?.dof)
    }
}

/// Iterator over `(body, global transform)` for every attached body
pub struct PreorderTransforms<'a> {
    graph: &'a KinematicGraph,
    stack: Vec<(JointId, Mat4)>,
}

impl<'a> Iterator for PreorderTransforms<'a> {
    type Item = (BodyId, Mat4);

    fn next(&mut self) -> Option<Self::Item> {
        let (joint_id, parent_frame) = self.stack.pop()?;
        let joint = &self.graph.joints[joint_id.0];
        let joint_frame = parent_frame.mul(&joint.local_transform());
        let body = &self.graph.bodies[joint.child.0];

        // Reverse so the first child is visited first
        for &child in body.children.iter().rev() {
            self.stack.push((child, joint_frame));
        }

        Some((joint.child, joint_frame.mul(&body.local_transform)))
    }
}
