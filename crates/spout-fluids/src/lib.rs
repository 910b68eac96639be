pub mod emitter;
pub mod field;
pub mod grid;
pub mod kernels;
pub mod manager;
pub mod params;
pub mod particle;
pub mod solver;
pub mod world;

pub use emitter::Emitter;
pub use manager::{Diagnostics, ParticleManager};
pub use params::{ConfigError, FluidParams};
pub use particle::{Particle, ParticleId};
pub use world::{Body, PhysicsWorld};
