use std::error::Error;

use glam::Vec3;
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use spout_fluids::{Diagnostics, Emitter, FluidParams, ParticleManager};

use crate::{world::{DemoWorld, Solid}, Cli};

const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
const KILL_HEIGHT: f32 = -20.0;

const EMITTER_POSITION: Vec3 = Vec3::new(-2.5, 15.0, 28.0);
const EMITTER_SIZE: f32 = 3.0;

/// Minimum corner of the simulation grid, chosen so the emitter, trough and ground all fit in
/// the default 64-cell grid.
const GRID_ORIGIN: Vec3 = Vec3::new(-32.0, -8.0, -32.0);

pub fn run(cli: &Cli) -> Result<Diagnostics, Box<dyn Error>> {
    let params = FluidParams {
        kernel_radius: cli.kernel_radius,
        pressure_scale: cli.pressure,
        viscosity_scale: cli.viscosity,
        tension_scale: cli.tension,
        grid_size: cli.grid_size,
        grid_origin: GRID_ORIGIN,
        ..Default::default()
    };

    let mut world = DemoWorld::new(GRAVITY, KILL_HEIGHT);
    // Ground
    world.add_solid(Solid::new(Vec3::ZERO, Vec3::new(30.0, 1.0, 30.0)));
    // Trough below the emitter
    world.add_solid(Solid::new(Vec3::new(-2.5, 10.0, 20.0), Vec3::new(10.0, 0.2, 20.0)));

    let emitter = Emitter::new(EMITTER_POSITION, Vec3::NEG_Z, EMITTER_SIZE)?;
    let mut fluid = ParticleManager::new(params, emitter, &mut world)?;

    let dt = 1.0 / cli.fps as f32;
    let field_dim = cli.field_dim as usize;
    let extent = params.grid_size as f32 * params.cell_size;
    let field_scale = Vec3::splat(extent / field_dim as f32);

    let bar_template = "Running Simulation {spinner:.green} [{elapsed}] [{bar:50.white/white}] {pos}/{len} ({eta})";
    let style = ProgressStyle::with_template(bar_template)?
        .progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress = ProgressBar::new(cli.frames).with_style(style);

    for frame in (0..cli.frames).progress_with(progress) {
        if frame % cli.emit_every == 0 && fluid.len() < cli.max_particles {
            fluid.emit_particle(&mut world);
        }

        world.step(dt, fluid.particles_mut());
        fluid.update();

        if (frame + 1) % cli.sample_every == 0 {
            let field = fluid.field([field_dim; 3], params.grid_origin, field_scale);
            let surface = field.iter().filter(|&&v| v >= cli.iso_level).count();

            log::info!(
                "frame {}: {} particles ({} in world), {} voxels at iso-level {}",
                frame + 1,
                fluid.len(),
                world.active_particles(),
                surface,
                cli.iso_level,
            );
        }
    }

    Ok(fluid.diagnostics())
}
