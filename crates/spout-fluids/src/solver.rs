use glam::Vec3;

use crate::{grid::SpatialGrid, kernels::Kernels, params::FluidParams, particle::Particle};

/// Two-pass SPH force solver.
///
/// The first pass accumulates pressure, viscosity and the color field derivatives of every
/// gridded particle from its 3x3x3 cell neighborhood. The second pass turns the color field
/// into a surface tension force. Velocities are only touched once both passes are done.
#[derive(Debug, Clone)]
pub struct ForceSolver {
    kernels: Kernels,
    tension_scale: f32,
    tension_threshold: f32,
}

#[derive(Default)]
struct Accumulator {
    force: Vec3,
    gradient: Vec3,
    second_gradient: Vec3,
}

impl ForceSolver {
    pub fn new(params: &FluidParams) -> Self {
        Self {
            kernels: Kernels::new(params),
            tension_scale: params.tension_scale,
            tension_threshold: params.tension_threshold,
        }
    }

    #[inline(always)]
    pub fn kernels(&self) -> &Kernels {
        &self.kernels
    }

    /// Runs one full step: reset, accumulate, apply tension, integrate velocities.
    ///
    /// `grid` must have been built from `particles`.
    pub fn solve(&self, particles: &mut [Particle], grid: &SpatialGrid) {
        for p in particles.iter_mut() {
            p.reset_accumulators();
        }

        self.accumulate(particles, grid);

        for p in particles.iter_mut() {
            self.apply_tension(p);
            p.velocity += p.computed_force;
        }
    }

    fn accumulate(&self, particles: &mut [Particle], grid: &SpatialGrid) {
        for &cell in grid.occupied_cells() {
            for &i in grid.cell(cell) {
                let p = &particles[i];
                let mut acc = Accumulator::default();

                for j in grid.neighbors(cell) {
                    if j == i {
                        continue;
                    }

                    let q = &particles[j];
                    let Some(terms) = self.kernels.pair(p.position, p.velocity, q.position, q.velocity, q.mass) else {
                        continue;
                    };

                    acc.force += terms.pressure + terms.viscosity;
                    acc.gradient += terms.gradient;
                    acc.second_gradient += terms.second_gradient;
                }

                let p = &mut particles[i];
                p.computed_force += acc.force;
                p.color_field_gradient += acc.gradient;
                p.color_field_second_gradient += acc.second_gradient;
            }
        }
    }

    /// Adds the surface tension force of `p` if its color field gradient is strictly above the
    /// threshold.
    pub fn apply_tension(&self, p: &mut Particle) {
        let level = p.color_field_gradient.length();
        if level <= self.tension_threshold {
            return;
        }

        let force = -self.tension_scale * p.color_field_second_gradient * p.color_field_gradient / level;

        p.color_field = force;
        p.computed_force += force;
        p.tension_level = level;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn solve(params: &FluidParams, particles: &mut [Particle]) {
        let mut grid = SpatialGrid::new(params.grid_size, params.cell_size, params.grid_origin);
        grid.rebuild(particles);
        ForceSolver::new(params).solve(particles, &grid);
    }

    #[test]
    fn lone_particle_is_unaffected() {
        let params = FluidParams::default();
        let velocity = Vec3::new(0.3, -1.0, 2.0);
        let mut particles = [
            Particle::new(Vec3::splat(10.5), velocity, 0.1, 1.0),
            Particle::new(Vec3::splat(20.5), Vec3::ZERO, 0.1, 1.0),
        ];

        solve(&params, &mut particles);

        assert_eq!(particles[0].velocity, velocity);
        assert_eq!(particles[0].computed_force, Vec3::ZERO);
        assert_eq!(particles[0].color_field_gradient, Vec3::ZERO);
        assert_eq!(particles[0].tension_level, 0.0);
        assert_eq!(particles[1].velocity, Vec3::ZERO);
    }

    #[test]
    fn tension_threshold_is_exclusive() {
        let gradient = Vec3::new(0.5, 0.0, 0.0);
        let mut p = Particle::new(Vec3::ZERO, Vec3::ZERO, 0.1, 1.0);
        p.color_field_gradient = gradient;
        p.color_field_second_gradient = Vec3::ONE;

        let at = FluidParams { tension_threshold: gradient.length(), ..Default::default() };
        let mut q = p;
        ForceSolver::new(&at).apply_tension(&mut q);
        assert_eq!(q.computed_force, Vec3::ZERO);
        assert_eq!(q.tension_level, 0.0);

        let below = FluidParams { tension_threshold: 0.49, ..Default::default() };
        let mut q = p;
        ForceSolver::new(&below).apply_tension(&mut q);
        assert_relative_eq!(q.computed_force.x, -30.0);
        assert_eq!(q.computed_force.y, 0.0);
        assert_eq!(q.color_field, q.computed_force);
        assert_relative_eq!(q.tension_level, 0.5);
    }

    #[test]
    fn accumulators_do_not_carry_over() {
        let params = FluidParams::default();
        let mut particles = [
            Particle::new(Vec3::splat(5.2), Vec3::ZERO, 0.1, 1.0),
            Particle::new(Vec3::new(5.6, 5.2, 5.2), Vec3::ZERO, 0.1, 1.0),
        ];

        solve(&params, &mut particles);
        let first = particles[0].color_field_gradient;
        assert!(first.length() > 0.0);

        particles[1].position = Vec3::splat(30.0);
        solve(&params, &mut particles);

        assert_eq!(particles[0].color_field_gradient, Vec3::ZERO);
        assert_eq!(particles[0].computed_force, Vec3::ZERO);
    }

    #[test]
    fn pair_forces_balance() {
        let params = FluidParams { tension_scale: 0.0, ..Default::default() };
        let mut particles = [
            Particle::new(Vec3::new(3.9, 4.1, 4.0), Vec3::new(0.1, 0.0, 0.0), 0.1, 0.01),
            Particle::new(Vec3::new(4.2, 4.3, 3.8), Vec3::new(-0.2, 0.1, 0.0), 0.1, 0.01),
        ];

        solve(&params, &mut particles);

        let a = particles[0].computed_force;
        let b = particles[1].computed_force;
        assert!(a.length() > 0.0);
        assert_relative_eq!(a.x, -b.x, max_relative = 1e-5);
        assert_relative_eq!(a.y, -b.y, max_relative = 1e-5);
        assert_relative_eq!(a.z, -b.z, max_relative = 1e-5);
    }

    #[test]
    fn particles_outside_grid_exert_no_force() {
        let params = FluidParams::default();
        let mut particles = [
            Particle::new(Vec3::new(0.2, 0.2, 0.2), Vec3::ZERO, 0.1, 1.0),
            Particle::new(Vec3::new(-0.2, 0.2, 0.2), Vec3::ZERO, 0.1, 1.0),
        ];

        solve(&params, &mut particles);

        for p in particles.iter() {
            assert_eq!(p.velocity, Vec3::ZERO);
            assert_eq!(p.computed_force, Vec3::ZERO);
        }
    }
}
