use std::f64::consts::{FRAC_1_SQRT_2, PI};

use approx::assert_relative_eq;
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use ocean_synth::prelude::*;
use ocean_synth::surface::{finite_difference_gradient, spectral_gradient};
use ocean_synth::transform::ScalarEngine;
use ocean_synth::{phillips, synthesize, ParamErrors};

fn scenario(time: f64) -> SpectrumParameters {
    SpectrumParameters {
        nx: 32,
        ny: 32,
        lx: 1000.0,
        ly: 1000.0,
        vx: 31.0,
        vy: 0.0,
        amplitude: 10.0,
        cutoff: 1.0,
        time,
        seed: 42,
    }
}

/// Per-bin magnitudes `(|h0a|, |h0b|)` drawn the same way the synthesizer draws them
fn base_amplitudes(params: &SpectrumParameters) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(u64::from(params.seed));
    let mut draw = || {
        let re: f64 = rng.sample(StandardNormal);
        let im: f64 = rng.sample(StandardNormal);
        (re * re + im * im).sqrt()
    };

    let mut out = Vec::with_capacity(params.nx * params.ny);
    for y in 0..params.ny {
        for x in 0..params.nx {
            let (kx, ky) = params.wavevector(x, y);
            let a = draw() * FRAC_1_SQRT_2 * phillips(kx, ky, params).sqrt();
            let b = draw() * FRAC_1_SQRT_2 * phillips(-kx, -ky, params).sqrt();
            out.push((a, b));
        }
    }
    out
}

fn energy(surface: &Surface) -> f64 {
    surface.height.iter().map(|&h| f64::from(h) * f64::from(h)).sum()
}

#[test]
fn test_scenario_parameters_validate() {
    assert!(scenario(0.0).validate().is_empty());

    let bad = SpectrumParameters {
        nx: 3,
        ..scenario(0.0)
    };
    assert!(bad.validate().contains(ParamErrors::INVALID_GRID_SIZE));
}

#[test]
fn test_same_seed_reproduces_surface() {
    for mode in [GradientMode::FiniteDifference, GradientMode::Spectral] {
        for backend in [Backend::Scalar, Backend::default()] {
            let ocean = Ocean::new(backend, mode);
            let first = ocean.generate(&scenario(0.0)).unwrap();
            let second = ocean.generate(&scenario(0.0)).unwrap();
            assert_eq!(first.height, second.height);
            assert_eq!(first.normals, second.normals);
            assert!(first.height.iter().all(|&h| h >= 0.0));
        }
    }
}

#[test]
fn test_heights_satisfy_parseval() {
    let params = scenario(3.0);
    let spectrum = synthesize(&params);
    let surface = Ocean::default().generate(&params).unwrap();

    let spectral_energy: f64 = spectrum.iter().map(|c| c.norm_sqr()).sum();
    let n = (params.nx * params.ny) as f64;
    assert_relative_eq!(energy(&surface), n * spectral_energy, max_relative = 1e-4);
}

#[test]
fn test_time_changes_heights_within_amplitude_range() {
    let ocean = Ocean::default();
    let at_zero = ocean.generate(&scenario(0.0)).unwrap();
    let later = ocean.generate(&scenario(10.0)).unwrap();
    assert_ne!(at_zero.height, later.height);

    let amplitudes = base_amplitudes(&scenario(0.0));

    // |signal| can never exceed the sum of every bin's largest magnitude
    let bound: f64 = amplitudes.iter().map(|(a, b)| a + b).sum();
    for surface in [&at_zero, &later] {
        assert!(f64::from(surface.max_height) <= bound * (1.0 + 1e-5));
    }

    // Averaged over time the cross terms cancel and the energy settles on
    // N * sum(|h0a|^2 + |h0b|^2)
    let frames = 200;
    let mean_energy = (0..frames)
        .map(|i| energy(&ocean.generate(&scenario(i as f64 * 1.7)).unwrap()))
        .sum::<f64>()
        / frames as f64;
    let expected = 32.0 * 32.0 * amplitudes.iter().map(|(a, b)| a * a + b * b).sum::<f64>();
    assert_relative_eq!(mean_energy, expected, max_relative = 0.1);
}

#[test]
fn test_gradient_modes_share_heights() {
    let params = scenario(0.0);
    let fd = Ocean::new(Backend::Scalar, GradientMode::FiniteDifference)
        .generate(&params)
        .unwrap();
    let spectral = Ocean::new(Backend::Scalar, GradientMode::Spectral)
        .generate(&params)
        .unwrap();

    assert_eq!(fd.height, spectral.height);
    assert_eq!(fd.min_height, spectral.min_height);
    assert_eq!(fd.max_height, spectral.max_height);
    assert_ne!(fd.normals, spectral.normals);
}

/// Mean `1 - dot` between the unit normals the two gradient modes produce
/// for a smooth periodic field sampled on an `n x n` grid
fn normal_disagreement(n: usize) -> f64 {
    let (lx, ly) = (1000.0, 1000.0);
    let height = Grid::from_fn(n, n, |x, y| {
        let u = 2.0 * PI * x as f64 / n as f64;
        let v = 2.0 * PI * y as f64 / n as f64;
        50.0 * ((2.0 * u).sin() + (3.0 * v).cos())
    });

    let (fd_x, fd_y) = finite_difference_gradient(&height, lx, ly);
    let (sp_x, sp_y) = spectral_gradient(&height, lx, ly, &ScalarEngine);

    let unit_normal = |gx: f64, gy: f64| DVec3::new(-gx, -gy, 1.0).normalize();
    let total: f64 = (0..n * n)
        .map(|i| {
            let a = unit_normal(fd_x.as_slice()[i], fd_y.as_slice()[i]);
            let b = unit_normal(sp_x.as_slice()[i], sp_y.as_slice()[i]);
            1.0 - a.dot(b)
        })
        .sum();
    total / (n * n) as f64
}

#[test]
fn test_gradient_modes_converge_with_resolution() {
    let disagreement: Vec<f64> = [32, 64, 128].iter().map(|&n| normal_disagreement(n)).collect();

    assert!(disagreement[0] > 0.0);
    for pair in disagreement.windows(2) {
        // Central differences are second order, so each doubling should cut
        // the slope error by about four and the normal error by more
        assert!(
            pair[1] < pair[0] / 4.0,
            "normal disagreement did not shrink: {:?}",
            disagreement
        );
    }
    assert!(disagreement[2] < 1e-4, "{:?}", disagreement);
}
