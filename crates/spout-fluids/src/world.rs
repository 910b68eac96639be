use glam::Vec3;

use crate::particle::ParticleId;

/// A body handed over to the host physics world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Body {
    /// A fluid particle. The host integrates its position from the velocity the core computes
    /// and resolves its collisions against solid geometry.
    Fluid {
        id: ParticleId,
        position: Vec3,
        velocity: Vec3,
        radius: f32,
        mass: f32,
    },
    /// The static box particles are emitted from.
    Emitter {
        position: Vec3,
        half_extents: Vec3,
    },
}

/// The rigid body world hosting the fluid.
///
/// The fluid core only registers bodies. Integration, collision and removal of particles that
/// leave the play area are up to the host.
pub trait PhysicsWorld {
    fn add_body(&mut self, body: Body);
}
