use std::f64::consts::PI;

use glam::{DVec3, Vec3};

use crate::grid::Grid;
use crate::spectrum::SpectrumParameters;
use crate::transform::TransformEngine;
use crate::Complex;

/// How the height field gradient is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GradientMode {
    /// Periodic central differences. One pass, limited by grid spacing.
    #[default]
    FiniteDifference,
    /// Multiply the spectrum of the height field by `i k` and transform back.
    /// Costs three more 2D transforms.
    Spectral,
}

/// Height and normal maps of one synthesized ocean
#[derive(Debug, Clone)]
pub struct Surface {
    pub height: Grid<f32>,
    /// Unit normals remapped to `[0, 1]^3` with `(n + 1) / 2`
    pub normals: Grid<Vec3>,
    pub min_height: f32,
    pub max_height: f32,
}

impl Surface {
    pub fn dims(&self) -> (usize, usize) {
        self.height.dims()
    }

    /// Unit normal at `(x, y)` mapped back to `[-1, 1]^3`
    pub fn normal(&self, x: usize, y: usize) -> Vec3 {
        self.normals[(x, y)] * 2.0 - Vec3::ONE
    }
}

/// Turn a synthesized spectrum into height and normal maps.
///
/// The inverse transform of the spectrum is generally complex, so the height
/// of each cell is the magnitude of the signal. Heights are never negative.
pub fn derive_surface(
    spectrum: &Grid<Complex>,
    params: &SpectrumParameters,
    mode: GradientMode,
    engine: &dyn TransformEngine,
) -> Surface {
    assert_eq!(
        spectrum.dims(),
        (params.nx, params.ny),
        "spectrum dimensions do not match parameters"
    );

    let signal = engine.inverse_2d(spectrum);
    let magnitude = signal.map(|c| c.norm());

    let (grad_x, grad_y) = match mode {
        GradientMode::FiniteDifference => finite_difference_gradient(&magnitude, params.lx, params.ly),
        GradientMode::Spectral => spectral_gradient(&magnitude, params.lx, params.ly, engine),
    };

    let height = magnitude.map(|&h| h as f32);
    let (min_height, max_height) = height.min_max().unwrap_or((0.0, 0.0));

    let normals = Grid::from_fn(params.nx, params.ny, |x, y| {
        normal_from_gradient(grad_x[(x, y)], grad_y[(x, y)])
    });

    Surface {
        height,
        normals,
        min_height,
        max_height,
    }
}

/// Central difference gradient with periodic wraparound
pub fn finite_difference_gradient(height: &Grid<f64>, lx: f64, ly: f64) -> (Grid<f64>, Grid<f64>) {
    let (nx, ny) = height.dims();
    let dx2 = 2.0 * lx / nx as f64;
    let dy2 = 2.0 * ly / ny as f64;

    let grad_x = Grid::from_fn(nx, ny, |x, y| {
        let left = (x + nx - 1) % nx;
        let right = (x + 1) % nx;
        (height[(right, y)] - height[(left, y)]) / dx2
    });

    let grad_y = Grid::from_fn(nx, ny, |x, y| {
        let below = (y + ny - 1) % ny;
        let above = (y + 1) % ny;
        (height[(x, above)] - height[(x, below)]) / dy2
    });

    (grad_x, grad_y)
}

/// Gradient by spectral differentiation.
///
/// Forward transform the (real) height field, normalize by `nx * ny`, multiply
/// by `i kx` and `i ky` and inverse transform each. The real part of the result
/// is the gradient component.
pub fn spectral_gradient(
    height: &Grid<f64>,
    lx: f64,
    ly: f64,
    engine: &dyn TransformEngine,
) -> (Grid<f64>, Grid<f64>) {
    let (nx, ny) = height.dims();
    let signal = height.map(|&h| Complex::new(h, 0.0));
    let spectrum = engine.forward_2d(&signal);
    let scale = 1.0 / (nx * ny) as f64;

    let spectrum_x = Grid::from_fn(nx, ny, |x, y| {
        spectrum[(x, y)] * scale * Complex::new(0.0, signed_wavenumber(x, nx, lx))
    });
    let spectrum_y = Grid::from_fn(nx, ny, |x, y| {
        spectrum[(x, y)] * scale * Complex::new(0.0, signed_wavenumber(y, ny, ly))
    });

    let grad_x = engine.inverse_2d(&spectrum_x).map(|c| c.re);
    let grad_y = engine.inverse_2d(&spectrum_y).map(|c| c.re);
    (grad_x, grad_y)
}

/// Wavenumber of DFT bin `index`. Bins above `n / 2` are the negative
/// frequencies; the Nyquist bin itself has no well-defined sign and maps to 0.
pub fn signed_wavenumber(index: usize, n: usize, length: f64) -> f64 {
    let half = n / 2;
    if index < half {
        2.0 * PI * index as f64 / length
    } else if index > half {
        2.0 * PI * (index as f64 - n as f64) / length
    } else {
        0.0
    }
}

/// Normal of the surface `z = h(x, y)` from its gradient, stored in `[0, 1]^3`
pub fn normal_from_gradient(grad_x: f64, grad_y: f64) -> Vec3 {
    let tangent = DVec3::new(1.0, 0.0, grad_x);
    let bitangent = DVec3::new(0.0, 1.0, grad_y);
    let normal = tangent.cross(bitangent).normalize();
    ((normal + DVec3::ONE) * 0.5).as_vec3()
}
