use std::error::Error;

use clap::Parser;

mod run;
mod world;

/// Headless fluid demo: a stream of particles poured from an emitter onto a trough and the
/// ground, with the density field sampled periodically.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Frames per simulated second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Emit one particle every this many frames.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    emit_every: u64,

    /// Stop emitting once this many particles exist.
    #[arg(long, default_value_t = 2000)]
    max_particles: usize,

    /// Kernel support radius (H).
    #[arg(long, default_value_t = 1.0)]
    kernel_radius: f32,

    #[arg(long, default_value_t = 5.5)]
    pressure: f32,

    #[arg(long, default_value_t = 10.5)]
    viscosity: f32,

    #[arg(long, default_value_t = 30.0)]
    tension: f32,

    /// Grid cells per axis.
    #[arg(long, default_value_t = 64)]
    grid_size: u32,

    /// Voxels per axis of the sampled density field.
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u64).range(1..))]
    field_dim: u64,

    /// Density at which the fluid surface lies.
    #[arg(long, default_value_t = 0.09)]
    iso_level: f64,

    /// Sample the density field every this many frames.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    sample_every: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let diagnostics = run::run(&cli)?;

    println!("{diagnostics}");

    Ok(())
}
