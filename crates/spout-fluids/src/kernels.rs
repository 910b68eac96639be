use std::f32::consts::PI;

use glam::Vec3;

use crate::params::FluidParams;

/// `15 / π`
pub const PRESSURE_KERNEL_SCALE: f32 = 15.0 / PI;
/// `45 / π`
pub const VISCOSITY_KERNEL_SCALE: f32 = 45.0 / PI;
/// `315 / 64π`
pub const TENSION_KERNEL_SCALE: f32 = 315.0 / (64.0 * PI);

/// Contributions of one neighbor to a particle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairTerms {
    pub pressure: Vec3,
    pub viscosity: Vec3,
    pub gradient: Vec3,
    pub second_gradient: Vec3,
}

/// Radially symmetric smoothing kernels with their coefficients folded in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernels {
    /// Kernel support radius (`H`).
    h: f32,
    h2: f32,
    /// `-pressure_scale * 15/π`
    pressure: f32,
    /// `viscosity_scale * 45/π`
    viscosity: f32,
    /// `315/64π`
    tension: f32,
}

impl Kernels {
    pub fn new(params: &FluidParams) -> Self {
        let h = params.kernel_radius;

        Self {
            h,
            h2: h * h,
            pressure: -params.pressure_scale * PRESSURE_KERNEL_SCALE,
            viscosity: params.viscosity_scale * VISCOSITY_KERNEL_SCALE,
            tension: TENSION_KERNEL_SCALE,
        }
    }

    #[inline(always)]
    pub fn radius(&self) -> f32 {
        self.h
    }

    /// Evaluates every kernel for the influence of particle `q` on particle `p`. Returns `None`
    /// when `q` is outside the kernel support.
    ///
    /// Terms that divide by the distance are left at zero for coincident particles.
    #[inline]
    pub fn pair(&self, p_pos: Vec3, p_vel: Vec3, q_pos: Vec3, q_vel: Vec3, q_mass: f32) -> Option<PairTerms> {
        let delta = p_pos - q_pos;
        let r = delta.length();

        if !(r <= self.h) {
            return None;
        }

        let mut terms = PairTerms {
            viscosity: self.viscosity(r, p_vel, q_vel) * q_mass,
            ..Default::default()
        };

        if r != 0.0 {
            terms.pressure = self.pressure(delta, r) * q_mass;
            terms.gradient = self.color_gradient(delta, r) * q_mass;
            terms.second_gradient = self.color_second_gradient(delta, r) * q_mass;
        }

        Some(terms)
    }

    /// Spiky kernel gradient. Pushes `p` away from its neighbor.
    #[inline(always)]
    fn pressure(&self, delta: Vec3, r: f32) -> Vec3 {
        let d = r - self.h;
        -3.0 * delta * d * d / r * self.pressure
    }

    /// Viscosity kernel laplacian applied to the relative velocity.
    #[inline(always)]
    fn viscosity(&self, r: f32, p_vel: Vec3, q_vel: Vec3) -> Vec3 {
        (q_vel - p_vel) * (self.h - r) * self.viscosity
    }

    /// Poly6 kernel gradient.
    #[inline(always)]
    fn color_gradient(&self, delta: Vec3, r: f32) -> Vec3 {
        let d = r * r - self.h2;
        -6.0 * delta * d * d * self.tension
    }

    /// Diagonal of the poly6 kernel hessian.
    #[inline(always)]
    fn color_second_gradient(&self, delta: Vec3, r: f32) -> Vec3 {
        let r2 = r * r;
        let d = r2 - self.h2;
        -6.0 * d * (Vec3::splat(r2 - self.h2) + 4.0 * delta * delta) * self.tension
    }
}
