use glam::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub radius: f32,

    /// Tension force applied during the last step.
    pub color_field: Vec3,
    /// Color field gradient, an approximation of the surface normal.
    pub color_field_gradient: Vec3,
    /// Per-axis second derivative of the color field.
    pub color_field_second_gradient: Vec3,
    /// Force accumulated during the last step, added to the velocity once all
    /// neighborhoods have been scanned.
    pub computed_force: Vec3,
    /// Magnitude of the color field gradient if it triggered tension, `0.0` otherwise.
    pub tension_level: f32,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3, radius: f32, mass: f32) -> Self {
        Self {
            position,
            velocity,
            mass,
            radius,
            color_field: Vec3::ZERO,
            color_field_gradient: Vec3::ZERO,
            color_field_second_gradient: Vec3::ZERO,
            computed_force: Vec3::ZERO,
            tension_level: 0.0,
        }
    }

    #[inline(always)]
    pub fn reset_accumulators(&mut self) {
        self.color_field = Vec3::ZERO;
        self.color_field_gradient = Vec3::ZERO;
        self.color_field_second_gradient = Vec3::ZERO;
        self.computed_force = Vec3::ZERO;
        self.tension_level = 0.0;
    }
}
