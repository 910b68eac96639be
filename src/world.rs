use glam::Vec3;
use spout_fluids::{Body, Particle, PhysicsWorld};

/// Static axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solid {
    pub min: Vec3,
    pub max: Vec3,
}

impl Solid {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            min: center - 0.5 * size,
            max: center + 0.5 * size,
        }
    }

    /// Pushes a sphere out of the box along the axis of least penetration and stops its motion
    /// along that axis.
    fn resolve(&self, p: &mut Particle) {
        let min = self.min - p.radius;
        let max = self.max + p.radius;

        if p.position.cmplt(min).any() || p.position.cmpgt(max).any() {
            return;
        }

        let below = p.position - min;
        let above = max - p.position;

        let mut axis = 0;
        let mut depth = f32::MAX;
        let mut target = 0.0;

        for i in 0..3 {
            if below[i] < depth {
                axis = i;
                depth = below[i];
                target = min[i];
            }

            if above[i] < depth {
                axis = i;
                depth = above[i];
                target = max[i];
            }
        }

        p.position[axis] = target;
        p.velocity[axis] = 0.0;
    }
}

/// Minimal rigid body world: gravity, static boxes and a kill plane.
pub struct DemoWorld {
    gravity: Vec3,
    solids: Vec<Solid>,
    /// Particles below this height are no longer simulated.
    kill_height: f32,
    /// Whether each fluid particle (by id) is still simulated by the world.
    active: Vec<bool>,
}

impl DemoWorld {
    pub fn new(gravity: Vec3, kill_height: f32) -> Self {
        Self {
            gravity,
            solids: Vec::new(),
            kill_height,
            active: Vec::new(),
        }
    }

    pub fn add_solid(&mut self, solid: Solid) {
        self.solids.push(solid);
    }

    /// Number of particles the world still integrates.
    pub fn active_particles(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Applies gravity, integrates positions and resolves collisions against static geometry.
    pub fn step(&mut self, dt: f32, particles: &mut [Particle]) {
        for (i, p) in particles.iter_mut().enumerate() {
            if !self.active.get(i).copied().unwrap_or(false) {
                continue;
            }

            p.velocity += self.gravity * dt;
            p.position += p.velocity * dt;

            for solid in self.solids.iter() {
                solid.resolve(p);
            }

            if p.position.y < self.kill_height {
                self.active[i] = false;
                log::debug!("particle {i} left the play area at {}", p.position);
            }
        }
    }
}

impl PhysicsWorld for DemoWorld {
    fn add_body(&mut self, body: Body) {
        match body {
            Body::Fluid { id, .. } => {
                if self.active.len() <= id.0 {
                    self.active.resize(id.0 + 1, false);
                }
                self.active[id.0] = true;
            },
            Body::Emitter { position, half_extents } => {
                self.add_solid(Solid::new(position, 2.0 * half_extents));
            },
        }
    }
}
