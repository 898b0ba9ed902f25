use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{OceanError, OceanResult};
use crate::grid::Grid;
use crate::transform::is_power_of_two;
use crate::Complex;

/// Gravitational acceleration in m/s^2
pub const GRAVITY: f64 = 9.81;

/// Parameters of the Phillips-spectrum ocean model (Tessendorf, "Simulating Ocean Water")
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumParameters {
    pub nx: usize,       // Grid columns, power of two > 1
    pub ny: usize,       // Grid rows, power of two > 1
    pub lx: f64,         // Physical extent along x in meters
    pub ly: f64,         // Physical extent along y in meters
    pub vx: f64,         // Wind velocity x component
    pub vy: f64,         // Wind velocity y component
    pub amplitude: f64,  // A, before normalization by patch area
    pub cutoff: f64,     // l, small-wavelength suppression length
    pub time: f64,       // t in seconds
    pub seed: u32,       // Seed of the gaussian draws
}

impl Default for SpectrumParameters {
    fn default() -> Self {
        Self {
            nx: 32,
            ny: 32,
            lx: 1000.0,
            ly: 1000.0,
            vx: 31.0,
            vy: 0.0,
            amplitude: 10.0,
            cutoff: 1.0,
            time: 0.0,
            seed: 0,
        }
    }
}

/// Independent parameter validation failures, combined as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParamErrors(u8);

impl ParamErrors {
    pub const INVALID_GRID_SIZE: Self = Self(1 << 0);
    pub const INVALID_OCEAN_SIZE: Self = Self(1 << 1);
    pub const INVALID_WIND_VELOCITY: Self = Self(1 << 2);

    const ALL: [(ParamErrors, &'static str); 3] = [
        (Self::INVALID_GRID_SIZE, "invalid grid size"),
        (Self::INVALID_OCEAN_SIZE, "invalid ocean size"),
        (Self::INVALID_WIND_VELOCITY, "invalid wind velocity"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Human-readable message of every set flag
    pub fn messages(self) -> impl Iterator<Item = &'static str> {
        Self::ALL
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, message)| message)
    }
}

impl BitOr for ParamErrors {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ParamErrors {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Display for ParamErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self.messages().collect();
        if messages.is_empty() {
            write!(f, "no errors")
        } else {
            write!(f, "{}", messages.join(", "))
        }
    }
}

impl SpectrumParameters {
    /// Check the parameters, returning every failure at once
    pub fn validate(&self) -> ParamErrors {
        let mut errors = ParamErrors::empty();

        let valid_dim = |n: usize| n > 1 && is_power_of_two(n);
        if !valid_dim(self.nx) || !valid_dim(self.ny) {
            errors |= ParamErrors::INVALID_GRID_SIZE;
        }

        // Written negated so NaN extents are rejected too
        if !(self.lx > 0.0) || !(self.ly > 0.0) {
            errors |= ParamErrors::INVALID_OCEAN_SIZE;
        }

        if self.vx == 0.0 && self.vy == 0.0 {
            errors |= ParamErrors::INVALID_WIND_VELOCITY;
        }

        errors
    }

    pub fn check(&self) -> OceanResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(OceanError::InvalidParameters(errors))
        }
    }

    /// Wavevector of grid cell `(x, y)`
    pub fn wavevector(&self, x: usize, y: usize) -> (f64, f64) {
        (
            2.0 * PI * x as f64 / self.lx,
            2.0 * PI * y as f64 / self.ly,
        )
    }
}

/// Phillips spectral density at wavevector `(kx, ky)`.
///
/// The amplitude is divided by the patch area `lx * ly` so that `A` does not
/// depend on the physical size of the ocean. Zero at `k = 0` and for zero wind.
pub fn phillips(kx: f64, ky: f64, params: &SpectrumParameters) -> f64 {
    let k2 = kx * kx + ky * ky;
    let v2 = params.vx * params.vx + params.vy * params.vy;

    if k2 == 0.0 || v2 == 0.0 {
        return 0.0;
    }

    let k_dot_v = (kx * params.vx + ky * params.vy) / (k2.sqrt() * v2.sqrt());

    // Largest wave arising from a continuous wind of speed |V|
    let l = v2 / GRAVITY;
    let a = params.amplitude / (params.lx * params.ly);
    let small = params.cutoff * params.cutoff;

    a * (-1.0 / (k2 * l * l)).exp() / (k2 * k2) * (k_dot_v * k_dot_v) * (-k2 * small).exp()
}

/// Deep water dispersion relation `w(k) = sqrt(g |k|)`
pub fn dispersion(k: f64) -> f64 {
    (GRAVITY * k).sqrt()
}

/// Build the time-evolved frequency-domain ocean `h(k, t)`.
///
/// Gaussian draws are taken in row-major order, four per cell: real and
/// imaginary parts of `xi_a`, then of `xi_b`. The same parameters always
/// produce the same grid.
///
/// Panics if `params` does not validate.
pub fn synthesize(params: &SpectrumParameters) -> Grid<Complex> {
    let errors = params.validate();
    assert!(errors.is_empty(), "synthesize called with invalid parameters: {}", errors);

    let mut rng = StdRng::seed_from_u64(u64::from(params.seed));
    let t = params.time;

    Grid::from_fn(params.nx, params.ny, |x, y| {
        let (kx, ky) = params.wavevector(x, y);

        let xi_a = gaussian(&mut rng);
        let xi_b = gaussian(&mut rng);

        let h0a = xi_a * (FRAC_1_SQRT_2 * phillips(kx, ky, params).sqrt());
        let h0b = (xi_b * (FRAC_1_SQRT_2 * phillips(-kx, -ky, params).sqrt())).conj();

        let omega = dispersion((kx * kx + ky * ky).sqrt());
        h0a * Complex::from_polar(1.0, omega * t) + h0b * Complex::from_polar(1.0, -omega * t)
    })
}

fn gaussian(rng: &mut StdRng) -> Complex {
    let re: f64 = rng.sample(StandardNormal);
    let im: f64 = rng.sample(StandardNormal);
    Complex::new(re, im)
}
