use std::fmt;

use glam::Vec3;
use ndarray::Array3;

use crate::{
    emitter::Emitter,
    field::FieldRasterizer,
    grid::SpatialGrid,
    params::{ConfigError, FluidParams},
    particle::{Particle, ParticleId},
    solver::ForceSolver,
    world::{Body, PhysicsWorld},
};

/// Owns every particle of a fluid and drives the grid, the solver, the emitter and the field
/// rasterizer.
#[derive(Debug, Clone)]
pub struct ParticleManager {
    /// Particles in spawn order. A particle's index is its `ParticleId`.
    particles: Vec<Particle>,
    /// Spatial grid, rebuilt at the start of every update.
    grid: SpatialGrid,
    solver: ForceSolver,
    emitter: Emitter,
    rasterizer: FieldRasterizer,
    params: FluidParams,
}

impl ParticleManager {
    /// Validates `params` and registers the emitter's source volume with `world`.
    pub fn new<W: PhysicsWorld>(params: FluidParams, emitter: Emitter, world: &mut W) -> Result<Self, ConfigError> {
        params.validate()?;

        world.add_body(Body::Emitter {
            position: emitter.source(),
            half_extents: Vec3::splat(0.5 * emitter.width()),
        });

        log::info!(
            "fluid ready: {0}x{0}x{0} grid at {1}, kernel radius {2}",
            params.grid_size,
            params.grid_origin,
            params.kernel_radius,
        );

        Ok(Self {
            particles: Vec::new(),
            grid: SpatialGrid::new(params.grid_size, params.cell_size, params.grid_origin),
            solver: ForceSolver::new(&params),
            emitter,
            rasterizer: FieldRasterizer::new(params.splat_level),
            params,
        })
    }

    /// Advances the fluid by one step: rebuilds the grid, accumulates all forces and adds them to
    /// the particle velocities. Positions are left to the host world.
    pub fn update(&mut self) {
        self.grid.rebuild(&self.particles);
        self.solver.solve(&mut self.particles, &self.grid);

        log::trace!(
            "stepped {} particles ({} gridded in {} cells)",
            self.particles.len(),
            self.grid.len(),
            self.grid.occupied_len(),
        );
    }

    /// Spawns a particle from the emitter, registers it with `world` and puts it in the grid
    /// right away.
    pub fn emit_particle<W: PhysicsWorld>(&mut self, world: &mut W) -> ParticleId {
        let particle = self.emitter.emit(self.params.particle_scale, self.params.particle_mass);
        let id = ParticleId(self.particles.len());

        world.add_body(Body::Fluid {
            id,
            position: particle.position,
            velocity: particle.velocity,
            radius: particle.radius,
            mass: particle.mass,
        });

        self.particles.push(particle);
        let cell = self.grid.insert(id.0, particle.position);

        log::debug!("emitted particle {} at {} (cell {:?})", id.0, particle.position, cell);

        id
    }

    /// Rasterizes the current particles into a density field of shape `dims`. See
    /// [`FieldRasterizer::sample`].
    pub fn field(&self, dims: [usize; 3], translation: Vec3, scale: Vec3) -> Array3<f64> {
        self.rasterizer.sample(&self.particles, dims, translation, scale)
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            particle_count: self.particles.len(),
            gridded_count: self.grid.len(),
            occupied_cells: self.grid.occupied_len(),
            kernel_radius: self.params.kernel_radius,
            pressure_scale: self.params.pressure_scale,
            viscosity_scale: self.params.viscosity_scale,
            tension_scale: self.params.tension_scale,
            tension_threshold: self.params.tension_threshold,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.0)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for the host world, which owns particle positions.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter_particles(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.particles.iter().enumerate().map(|(i, p)| (ParticleId(i), p))
    }

    #[inline(always)]
    pub fn params(&self) -> &FluidParams {
        &self.params
    }

    #[inline(always)]
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    #[inline(always)]
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }
}

/// Snapshot of the fluid for on-screen display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub particle_count: usize,
    /// Particles inside the grid as of the last rebuild or emission.
    pub gridded_count: usize,
    pub occupied_cells: usize,
    pub kernel_radius: f32,
    pub pressure_scale: f32,
    pub viscosity_scale: f32,
    pub tension_scale: f32,
    pub tension_threshold: f32,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Particles:")?;
        writeln!(f, "Count: {}", self.particle_count)?;
        writeln!(f, "In grid: {} ({} cells)", self.gridded_count, self.occupied_cells)?;
        writeln!(f, "Kernel size: {}", self.kernel_radius)?;
        writeln!(f, "Viscosity: {}", self.viscosity_scale)?;
        writeln!(f, "Pressure: {}", self.pressure_scale)?;
        write!(f, "Tension: {} (threshold {})", self.tension_scale, self.tension_threshold)
    }
}
