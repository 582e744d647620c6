//! Joint dynamics: rotational spring-damper integration under external torque

mod spring_damper;
mod joint_dynamics;

pub use spring_damper::{DynamicsParams, SpringDamper};
pub use joint_dynamics::{step_body, torque_about};
