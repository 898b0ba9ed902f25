use std::path::PathBuf;
use std::time::Instant;

use ocean_synth::export::{save_height_tga, save_normal_tga};
use ocean_synth::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("Generating animated ocean height maps...");

    let base = SpectrumParameters {
        nx: 128,
        ny: 128,
        seed: 42,
        ..Default::default()
    };
    let ocean = Ocean::new(Backend::default(), GradientMode::Spectral);

    // Animation parameters
    let frame_count = 30;
    let time_step = 0.5;

    let output_dir = PathBuf::from("./animation_output");
    std::fs::create_dir_all(&output_dir)?;

    let start = Instant::now();
    for frame in 0..frame_count {
        let params = SpectrumParameters {
            time: frame as f64 * time_step,
            ..base.clone()
        };
        let surface = ocean.generate(&params)?;

        save_height_tga(&surface, output_dir.join(format!("height_{:03}.tga", frame)))?;
        save_normal_tga(&surface, output_dir.join(format!("normal_{:03}.tga", frame)))?;

        println!(
            "Frame {:3}: t = {:5.2}s, heights {:.4}..{:.4}",
            frame, params.time, surface.min_height, surface.max_height
        );
    }

    println!(
        "Wrote {} frames to {} in {:.2?}",
        frame_count,
        output_dir.display(),
        start.elapsed()
    );
    Ok(())
}
