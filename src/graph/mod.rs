//! Kinematic scene graph: bodies, joints and forward kinematics

pub mod dof;
pub mod node;
pub mod kinematic_graph;

pub use dof::{Axis, DofMask};
pub use node::{Body, BodyId, Joint, JointId, MeshHandle, Visual};
pub use kinematic_graph::{KinematicGraph, PreorderTransforms};
