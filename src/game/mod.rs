//! Simulation core modules

pub mod engine;
pub mod entity;
pub mod geometry;
pub mod intent;
pub mod snapshot;
pub mod weapon;

pub use engine::World;
