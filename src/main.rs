use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use ocean_synth::export::{save_height_tga, save_normal_tga, save_surface_glb};
use ocean_synth::{Backend, GradientMode, Ocean, OceanError, SpectrumParameters};

/// Command-line tool to synthesize ocean height and normal maps from the Phillips spectrum
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grid columns (power of two > 1)
    #[arg(long, default_value_t = 32)]
    nx: usize,

    /// Grid rows (power of two > 1)
    #[arg(long, default_value_t = 32)]
    ny: usize,

    /// Ocean extent along x in meters
    #[arg(long, default_value_t = 1000.0)]
    lx: f64,

    /// Ocean extent along y in meters
    #[arg(long, default_value_t = 1000.0)]
    ly: f64,

    /// Wind velocity X component
    #[arg(long, default_value_t = 31.0, allow_hyphen_values = true)]
    vx: f64,

    /// Wind velocity Y component
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    vy: f64,

    /// Wave amplitude (independent of ocean size)
    #[arg(short, long, default_value_t = 10.0)]
    amplitude: f64,

    /// Small-wavelength cutoff length
    #[arg(short = 'l', long, default_value_t = 1.0)]
    cutoff: f64,

    /// Simulation time in seconds
    #[arg(short, long, default_value_t = 0.0)]
    time: f64,

    /// Random seed for the spectrum
    #[arg(long, default_value_t = 0, conflicts_with = "random_seed")]
    seed: u32,

    /// Draw a fresh seed instead of using --seed
    #[arg(long)]
    random_seed: bool,

    /// Use spectral differentiation for the normal map
    #[arg(long)]
    accurate_normals: bool,

    /// Transform engine
    #[arg(long, value_enum, default_value_t = Backend::default())]
    backend: Backend,

    /// Height map output path (grayscale TGA)
    #[arg(long, default_value = "height_map.tga")]
    height_map: PathBuf,

    /// Normal map output path (RGB TGA)
    #[arg(long, default_value = "normal_map.tga")]
    normal_map: PathBuf,

    /// Optional GLB mesh of the surface
    #[arg(long)]
    mesh: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args = Args::parse();

    let seed = if args.random_seed {
        rand::random::<u32>()
    } else {
        args.seed
    };

    let params = SpectrumParameters {
        nx: args.nx,
        ny: args.ny,
        lx: args.lx,
        ly: args.ly,
        vx: args.vx,
        vy: args.vy,
        amplitude: args.amplitude,
        cutoff: args.cutoff,
        time: args.time,
        seed,
    };

    let gradient_mode = if args.accurate_normals {
        GradientMode::Spectral
    } else {
        GradientMode::FiniteDifference
    };

    info!(
        "Ocean dimensions: {}x{} m on a {}x{} grid",
        params.lx, params.ly, params.nx, params.ny
    );
    info!(
        "Wave parameters: wind=({}, {}), amplitude={}, cutoff={}, time={}, seed={}",
        params.vx, params.vy, params.amplitude, params.cutoff, params.time, params.seed
    );

    let ocean = Ocean::new(args.backend, gradient_mode);
    let surface = match ocean.generate(&params) {
        Ok(surface) => surface,
        Err(OceanError::InvalidParameters(errors)) => {
            for message in errors.messages() {
                error!("{}", message);
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    save_height_tga(&surface, &args.height_map)
        .with_context(|| format!("writing height map to {}", args.height_map.display()))?;
    info!("Height map written to {}", args.height_map.display());

    save_normal_tga(&surface, &args.normal_map)
        .with_context(|| format!("writing normal map to {}", args.normal_map.display()))?;
    info!("Normal map written to {}", args.normal_map.display());

    if let Some(mesh) = &args.mesh {
        save_surface_glb(&surface, &params, mesh)
            .with_context(|| format!("writing mesh to {}", mesh.display()))?;
        info!("Mesh exported to {}", mesh.display());
    }

    Ok(ExitCode::SUCCESS)
}
