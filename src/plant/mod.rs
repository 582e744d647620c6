//! The dandelion: construction, per-tick update, detachment and draw traversal

mod builder;
mod dandelion;
mod draw;
mod params;

pub use builder::{fibonacci_sphere, PlantLayout, SeedSlot, SEED_TIP};
pub use dandelion::Dandelion;
pub use draw::{DrawList, DrawTarget, Material, DRAW_RECORD_LEN};
pub use params::{PlantMeshes, PlantPalette, PlantParams, DETACH_THRESHOLD, SEED_DOF, STEM_DOF};
