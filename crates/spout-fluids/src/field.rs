use glam::Vec3;
use ndarray::Array3;

use crate::particle::Particle;

/// Splats particles onto a dense voxel lattice for isosurface extraction.
///
/// Every in-bounds particle adds `level` to its own voxel and `level / 2` to the four voxels
/// next to it along X and Z. The field is not normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRasterizer {
    level: f64,
}

/// Neighbors receiving half a splat. Y is left out.
const SPREAD: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl FieldRasterizer {
    pub fn new(level: f64) -> Self {
        Self { level }
    }

    #[inline(always)]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Voxel of `position` in a lattice of shape `dims`, or `None` if it falls outside.
    pub fn voxel_of(position: Vec3, dims: [usize; 3], translation: Vec3, scale: Vec3) -> Option<[usize; 3]> {
        let v = (position - translation) / scale;
        if !v.is_finite() {
            return None;
        }

        let mut voxel = [0; 3];
        for axis in 0..3 {
            if v[axis] < 0.0 || v[axis] >= dims[axis] as f32 {
                return None;
            }

            voxel[axis] = (v[axis] as usize).min(dims[axis] - 1);
        }

        Some(voxel)
    }

    /// Rasterizes `particles` into a field of shape `dims`. Voxel `(i, j, k)` covers world space
    /// `translation + scale * [i, i + 1)` (and likewise for the other axes).
    pub fn sample<'a, I>(&self, particles: I, dims: [usize; 3], translation: Vec3, scale: Vec3) -> Array3<f64>
    where
        I: IntoIterator<Item = &'a Particle>,
    {
        let mut field = Array3::zeros(dims);
        let half = 0.5 * self.level;

        for particle in particles {
            let Some([x, y, z]) = Self::voxel_of(particle.position, dims, translation, scale) else {
                continue;
            };

            field[(x, y, z)] += self.level;

            for (dx, dz) in SPREAD {
                let (Some(x), Some(z)) = (x.checked_add_signed(dx), z.checked_add_signed(dz)) else {
                    continue;
                };

                if x < dims[0] && z < dims[2] {
                    field[(x, y, z)] += half;
                }
            }
        }

        field
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn particle_at(p: Vec3) -> Particle {
        Particle::new(p, Vec3::ZERO, 0.1, 1.0)
    }

    #[test]
    fn isolated_particle_sums_to_five_halves() {
        let rasterizer = FieldRasterizer::new(0.09);
        let particles = [particle_at(Vec3::new(4.5, 4.5, 4.5))];

        let field = rasterizer.sample(&particles, [8, 8, 8], Vec3::ZERO, Vec3::ONE);

        assert_relative_eq!(field.sum(), 0.09 + 4.0 * 0.045, epsilon = 1e-12);
        assert_relative_eq!(field[(4, 4, 4)], 0.09);
        assert_relative_eq!(field[(3, 4, 4)], 0.045);
        assert_relative_eq!(field[(5, 4, 4)], 0.045);
        assert_relative_eq!(field[(4, 4, 3)], 0.045);
        assert_relative_eq!(field[(4, 4, 5)], 0.045);
        assert_eq!(field[(4, 3, 4)], 0.0);
        assert_eq!(field[(4, 5, 4)], 0.0);
        assert_eq!(field[(5, 4, 5)], 0.0);
    }

    #[test]
    fn translation_and_scale_select_voxel() {
        let rasterizer = FieldRasterizer::new(1.0);
        let particles = [particle_at(Vec3::new(-3.0, 2.2, 7.9))];

        let field = rasterizer.sample(&particles, [4, 4, 4], Vec3::new(-4.0, 0.0, 4.0), Vec3::new(0.5, 1.0, 2.0));

        assert_eq!(field[(2, 2, 1)], 1.0);
    }

    #[test]
    fn out_of_bounds_particles_are_skipped() {
        let rasterizer = FieldRasterizer::new(1.0);
        let particles = [
            particle_at(Vec3::new(-0.5, 1.0, 1.0)),
            particle_at(Vec3::new(1.0, 4.0, 1.0)),
            particle_at(Vec3::new(1.0, 1.0, f32::NAN)),
        ];

        let field = rasterizer.sample(&particles, [4, 4, 4], Vec3::ZERO, Vec3::ONE);

        assert_eq!(field.sum(), 0.0);
    }

    #[test]
    fn spread_is_clipped_at_lattice_edge() {
        let rasterizer = FieldRasterizer::new(1.0);
        let particles = [particle_at(Vec3::new(0.5, 0.5, 3.5))];

        let field = rasterizer.sample(&particles, [4, 4, 4], Vec3::ZERO, Vec3::ONE);

        assert_eq!(field.sum(), 2.0);
        assert_eq!(field[(0, 0, 3)], 1.0);
        assert_eq!(field[(1, 0, 3)], 0.5);
        assert_eq!(field[(0, 0, 2)], 0.5);
    }

    #[test]
    fn overlapping_particles_accumulate() {
        let rasterizer = FieldRasterizer::new(1.0);
        let particles = [particle_at(Vec3::splat(1.5)), particle_at(Vec3::new(2.5, 1.5, 1.5))];

        let field = rasterizer.sample(&particles, [4, 4, 4], Vec3::ZERO, Vec3::ONE);

        assert_eq!(field[(1, 1, 1)], 1.5);
        assert_eq!(field[(2, 1, 1)], 1.5);
        assert_eq!(field.sum(), 6.0);
    }
}
