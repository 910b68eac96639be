use glam::Vec3;
use thiserror::Error;

/// Tunable constants of a fluid simulation. Fixed once the simulation is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidParams {
    /// Neighbor search radius and support of every kernel (`H`).
    pub kernel_radius: f32,
    pub pressure_scale: f32,
    pub viscosity_scale: f32,
    pub tension_scale: f32,
    /// Minimum color field gradient magnitude before any tension force is applied.
    pub tension_threshold: f32,
    /// Number of grid cells along each axis.
    pub grid_size: u32,
    /// Edge length of a grid cell. Must not be smaller than the kernel radius.
    pub cell_size: f32,
    /// World position of the grid's minimum corner.
    pub grid_origin: Vec3,
    /// Radius of emitted particles.
    pub particle_scale: f32,
    /// Mass of emitted particles.
    pub particle_mass: f32,
    /// Density a single particle splats into the scalar field.
    pub splat_level: f64,
}

impl Default for FluidParams {
    fn default() -> Self {
        let particle_scale = 0.1;

        Self {
            kernel_radius: 1.0,
            pressure_scale: 5.5,
            viscosity_scale: 10.5,
            tension_scale: 30.0,
            tension_threshold: 0.0001,
            grid_size: 64,
            cell_size: 1.0,
            grid_origin: Vec3::ZERO,
            particle_scale,
            particle_mass: particle_scale / 10000.0,
            splat_level: 0.09,
        }
    }
}

impl FluidParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::GridSize);
        }

        positive("cell_size", self.cell_size)?;
        positive("kernel_radius", self.kernel_radius)?;
        positive("particle_scale", self.particle_scale)?;
        positive("particle_mass", self.particle_mass)?;

        if self.kernel_radius > self.cell_size {
            return Err(ConfigError::KernelExceedsCell {
                kernel_radius: self.kernel_radius,
                cell_size: self.cell_size,
            });
        }

        finite("pressure_scale", self.pressure_scale)?;
        finite("viscosity_scale", self.viscosity_scale)?;
        finite("tension_scale", self.tension_scale)?;

        if !(self.tension_threshold >= 0.0 && self.tension_threshold.is_finite()) {
            return Err(ConfigError::Negative { name: "tension_threshold", value: self.tension_threshold });
        }

        if !self.grid_origin.is_finite() {
            return Err(ConfigError::NotFinite { name: "grid_origin" });
        }

        if !self.splat_level.is_finite() {
            return Err(ConfigError::NotFinite { name: "splat_level" });
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;

    if value <= 0.0 {
        return Err(ConfigError::NotPositive { name, value });
    }

    Ok(())
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { name });
    }

    Ok(())
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid size must be at least one cell")]
    GridSize,
    #[error("`{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("`{name}` must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("`{name}` must be finite")]
    NotFinite { name: &'static str },
    #[error("kernel radius {kernel_radius} does not fit in a grid cell of size {cell_size}")]
    KernelExceedsCell { kernel_radius: f32, cell_size: f32 },
    #[error("emitter direction must be a non-zero, finite vector")]
    EmitterDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(FluidParams::default().validate(), Ok(()));
    }

    #[test]
    fn zero_grid_is_rejected() {
        let params = FluidParams { grid_size: 0, ..Default::default() };
        assert_eq!(params.validate(), Err(ConfigError::GridSize));
    }

    #[test]
    fn kernel_must_fit_in_cell() {
        let params = FluidParams { kernel_radius: 1.5, ..Default::default() };
        assert!(matches!(params.validate(), Err(ConfigError::KernelExceedsCell { .. })));

        let params = FluidParams { kernel_radius: 1.5, cell_size: 2.0, ..Default::default() };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn non_positive_values_are_rejected() {
        let params = FluidParams { kernel_radius: 0.0, ..Default::default() };
        assert_eq!(params.validate(), Err(ConfigError::NotPositive { name: "kernel_radius", value: 0.0 }));

        let params = FluidParams { particle_mass: -1.0, ..Default::default() };
        assert!(matches!(params.validate(), Err(ConfigError::NotPositive { name: "particle_mass", .. })));

        let params = FluidParams { pressure_scale: f32::NAN, ..Default::default() };
        assert_eq!(params.validate(), Err(ConfigError::NotFinite { name: "pressure_scale" }));

        let params = FluidParams { tension_threshold: -0.1, ..Default::default() };
        assert!(matches!(params.validate(), Err(ConfigError::Negative { name: "tension_threshold", .. })));
    }
}
