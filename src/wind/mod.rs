//! Wind force fields and the ambient breeze driver

mod field;
mod ambient;

pub use field::{WindField, WindParams, total_force};
pub use ambient::{AmbientWind, AmbientWindParams};
