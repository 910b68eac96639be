use glam::Vec3;

use crate::{params::ConfigError, particle::Particle};

/// Spawns particles just in front of a box-shaped source volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emitter {
    /// Center of the source volume.
    source: Vec3,
    /// Unit emission direction.
    forward: Vec3,
    /// Width of the source volume along `forward`.
    width: f32,
}

impl Emitter {
    pub fn new(source: Vec3, forward: Vec3, width: f32) -> Result<Self, ConfigError> {
        if !source.is_finite() {
            return Err(ConfigError::NotFinite { name: "emitter source" });
        }

        if !width.is_finite() {
            return Err(ConfigError::NotFinite { name: "emitter width" });
        }

        if width < 0.0 {
            return Err(ConfigError::Negative { name: "emitter width", value: width });
        }

        let forward = forward.try_normalize().ok_or(ConfigError::EmitterDirection)?;

        Ok(Self { source, forward, width })
    }

    #[inline(always)]
    pub fn source(&self) -> Vec3 {
        self.source
    }

    #[inline(always)]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Where the next particle will appear.
    pub fn spawn_position(&self) -> Vec3 {
        self.source + self.forward * self.width
    }

    /// Creates a particle at the spawn position, moving along the emission direction.
    pub fn emit(&self, radius: f32, mass: f32) -> Particle {
        Particle::new(self.spawn_position(), self.forward, radius, mass)
    }
}
