//! Unnormalized radix-2 discrete Fourier transforms.
//!
//! Every transform here is unnormalized: a forward transform followed by an
//! inverse transform scales the signal by `N` (by `N1 * N2` in 2D). Callers
//! divide explicitly when they need the round trip to be the identity.
//!
//! Two engines implement [`TransformEngine`]:
//! - [`ScalarEngine`] is the reference implementation.
//! - [`VectorEngine`] (feature `simd`) runs the same recurrence two complex
//!   samples at a time and is validated against the scalar engine.
//!
//! Sizes must be powers of two greater than one. Anything else is a bug in the
//! caller and panics.

use std::f64::consts::PI;

use crate::grid::Grid;
use crate::Complex;

pub mod scalar;

#[cfg(feature = "simd")]
pub mod lanes;
#[cfg(feature = "simd")]
pub mod simd;

pub use scalar::ScalarEngine;
#[cfg(feature = "simd")]
pub use simd::VectorEngine;

/// Sign convention of the transform kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `exp(-i 2pi jk/N)`
    Forward,
    /// `exp(+i 2pi jk/N)`
    Inverse,
}

impl Direction {
    /// Sign of the twiddle exponent
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        }
    }

    /// Principal twiddle factor for a butterfly block of size `m`
    pub fn twiddle(self, m: usize) -> Complex {
        Complex::from_polar(1.0, self.sign() * 2.0 * PI / m as f64)
    }

    /// Multiply by the quarter-turn twiddle: `-i` forward, `+i` inverse
    #[inline]
    pub fn rotate_quarter(self, x: Complex) -> Complex {
        match self {
            Direction::Forward => Complex::new(x.im, -x.re),
            Direction::Inverse => Complex::new(-x.im, x.re),
        }
    }
}

/// A 1D/2D DFT implementation.
pub trait TransformEngine {
    fn name(&self) -> &'static str;

    /// Transform `input` into `output`. Both must have the same power-of-two
    /// length greater than one.
    fn transform_1d(&self, direction: Direction, input: &[Complex], output: &mut [Complex]);

    /// Separable 2D transform of an `nx` x `ny` grid: rows, transpose, rows
    /// (the original columns), transpose back.
    fn transform_2d(&self, direction: Direction, input: &Grid<Complex>, output: &mut Grid<Complex>) {
        assert_eq!(
            input.dims(),
            output.dims(),
            "2D transform input and output dimensions differ"
        );
        let (n2, n1) = input.dims();
        assert_transform_len(n1);
        assert_transform_len(n2);

        let mut aux = vec![Complex::default(); n1 * n2];

        for (src, dst) in input.rows().zip(aux.chunks_exact_mut(n2)) {
            self.transform_1d(direction, src, dst);
        }

        transpose_into(&aux, output.as_mut_slice(), n1, n2);

        for (src, dst) in output.as_slice().chunks_exact(n1).zip(aux.chunks_exact_mut(n1)) {
            self.transform_1d(direction, src, dst);
        }

        transpose_into(&aux, output.as_mut_slice(), n2, n1);
    }

    fn forward_2d(&self, input: &Grid<Complex>) -> Grid<Complex> {
        let mut output = Grid::new(input.nx(), input.ny());
        self.transform_2d(Direction::Forward, input, &mut output);
        output
    }

    fn inverse_2d(&self, input: &Grid<Complex>) -> Grid<Complex> {
        let mut output = Grid::new(input.nx(), input.ny());
        self.transform_2d(Direction::Inverse, input, &mut output);
        output
    }
}

/// Which engine runs the transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    Scalar,
    #[cfg(feature = "simd")]
    Vector,
}

impl Default for Backend {
    fn default() -> Self {
        #[cfg(feature = "simd")]
        {
            Backend::Vector
        }
        #[cfg(not(feature = "simd"))]
        {
            Backend::Scalar
        }
    }
}

impl Backend {
    pub fn engine(self) -> &'static dyn TransformEngine {
        static SCALAR: ScalarEngine = ScalarEngine;
        #[cfg(feature = "simd")]
        static VECTOR: VectorEngine = VectorEngine;

        match self {
            Backend::Scalar => &SCALAR,
            #[cfg(feature = "simd")]
            Backend::Vector => &VECTOR,
        }
    }
}

pub fn is_power_of_two(n: usize) -> bool {
    n.is_power_of_two()
}

/// `log2(n)` for a power of two
pub fn log2(n: usize) -> u32 {
    n.trailing_zeros()
}

/// Reverse the low `bits` bits of `i`
#[inline]
pub fn bit_reverse(i: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    i.reverse_bits() >> (usize::BITS - bits)
}

/// Transpose a row-major `n1` x `n2` buffer into `output` (`n2` x `n1`)
pub fn transpose_into<T: Copy>(input: &[T], output: &mut [T], n1: usize, n2: usize) {
    debug_assert_eq!(input.len(), n1 * n2);
    debug_assert_eq!(output.len(), n1 * n2);
    for r in 0..n1 {
        for c in 0..n2 {
            output[c * n1 + r] = input[r * n2 + c];
        }
    }
}

fn assert_transform_len(n: usize) {
    assert!(n > 1, "transform length must be greater than 1, got {}", n);
    assert!(is_power_of_two(n), "transform length must be a power of two, got {}", n);
}

/// Validate lengths and scatter `input` into `output` in bit-reversed order.
/// Returns `log2(N)`, the number of butterfly stages.
pub(crate) fn bit_reverse_copy(input: &[Complex], output: &mut [Complex]) -> u32 {
    let n = input.len();
    assert_transform_len(n);
    assert_eq!(
        n,
        output.len(),
        "transform input and output lengths differ"
    );

    let p = log2(n);
    for (i, &x) in input.iter().enumerate() {
        output[bit_reverse(i, p)] = x;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    pub(crate) fn random_signal(n: usize, seed: u64) -> Vec<Complex> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect()
    }

    #[test]
    fn test_bit_reverse_is_self_inverse() {
        for bits in 1..=12 {
            for i in 0..(1usize << bits) {
                let r = bit_reverse(i, bits);
                assert!(r < (1 << bits));
                assert_eq!(bit_reverse(r, bits), i);
            }
        }
    }

    #[test]
    fn test_bit_reverse_known_values() {
        assert_eq!(bit_reverse(1, 3), 4);
        assert_eq!(bit_reverse(3, 3), 6);
        assert_eq!(bit_reverse(6, 4), 6);
        assert_eq!(bit_reverse(1, 10), 512);
    }

    #[test]
    fn test_transpose_into() {
        let input = [1, 2, 3, 4, 5, 6];
        let mut out = [0; 6];
        transpose_into(&input, &mut out, 2, 3);
        assert_eq!(out, [1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_quarter_rotation_matches_multiplication() {
        let x = Complex::new(0.3, -1.7);
        assert_eq!(Direction::Forward.rotate_quarter(x), x * Complex::new(0.0, -1.0));
        assert_eq!(Direction::Inverse.rotate_quarter(x), x * Complex::new(0.0, 1.0));
    }

    #[test]
    fn test_twiddle_is_root_of_unity() {
        let w = Direction::Forward.twiddle(8);
        let mut acc = Complex::new(1.0, 0.0);
        for _ in 0..8 {
            acc *= w;
        }
        assert_abs_diff_eq!(acc.re, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(acc.im, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w.im, -(PI / 4.0).sin(), epsilon = 1e-15);
    }

    #[test]
    fn test_default_backend_engine() {
        let engine = Backend::default().engine();
        #[cfg(feature = "simd")]
        assert_eq!(engine.name(), "vector");
        #[cfg(not(feature = "simd"))]
        assert_eq!(engine.name(), "scalar");
    }
}
