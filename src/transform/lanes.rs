//! Two-lane `f64` vector used by the vectorized transform.
//!
//! On `x86_64` this wraps an SSE2 register (SSE2 is part of the baseline
//! target). Elsewhere it is a plain `[f64; 2]` that the compiler is free to
//! auto-vectorize. Lane 0 is `lo`, lane 1 is `hi`.

use std::ops::{Add, Mul, Sub};

use crate::Complex;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "x86_64")]
#[derive(Clone, Copy, Debug)]
pub struct F64x2 {
    v: __m128d,
}

#[cfg(not(target_arch = "x86_64"))]
#[derive(Clone, Copy, Debug)]
pub struct F64x2 {
    lo: f64,
    hi: f64,
}

#[cfg(target_arch = "x86_64")]
impl F64x2 {
    #[inline(always)]
    pub fn new(lo: f64, hi: f64) -> Self {
        // SAFETY: SSE2 is always available on x86_64.
        Self {
            v: unsafe { _mm_set_pd(hi, lo) },
        }
    }

    #[inline(always)]
    pub fn splat(x: f64) -> Self {
        // SAFETY: SSE2 is always available on x86_64.
        Self {
            v: unsafe { _mm_set1_pd(x) },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f64; 2] {
        let mut out = [0.0; 2];
        // SAFETY: `out` holds two f64s; the store is unaligned.
        unsafe { _mm_storeu_pd(out.as_mut_ptr(), self.v) };
        out
    }

    /// Exchange the two lanes
    #[inline(always)]
    pub fn swap(self) -> Self {
        // SAFETY: SSE2 is always available on x86_64.
        Self {
            v: unsafe { _mm_shuffle_pd::<0b01>(self.v, self.v) },
        }
    }

    /// `(a.lo, b.lo)`
    #[inline(always)]
    pub fn unpack_lo(a: Self, b: Self) -> Self {
        // SAFETY: SSE2 is always available on x86_64.
        Self {
            v: unsafe { _mm_unpacklo_pd(a.v, b.v) },
        }
    }

    /// `(a.hi, b.hi)`
    #[inline(always)]
    pub fn unpack_hi(a: Self, b: Self) -> Self {
        // SAFETY: SSE2 is always available on x86_64.
        Self {
            v: unsafe { _mm_unpackhi_pd(a.v, b.v) },
        }
    }
}

#[cfg(target_arch = "x86_64")]
impl Add for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is always available on x86_64.
        Self {
            v: unsafe { _mm_add_pd(self.v, rhs.v) },
        }
    }
}

#[cfg(target_arch = "x86_64")]
impl Sub for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is always available on x86_64.
        Self {
            v: unsafe { _mm_sub_pd(self.v, rhs.v) },
        }
    }
}

#[cfg(target_arch = "x86_64")]
impl Mul for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is always available on x86_64.
        Self {
            v: unsafe { _mm_mul_pd(self.v, rhs.v) },
        }
    }
}

#[cfg(not(target_arch = "x86_64"))]
impl F64x2 {
    #[inline(always)]
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    #[inline(always)]
    pub fn splat(x: f64) -> Self {
        Self { lo: x, hi: x }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f64; 2] {
        [self.lo, self.hi]
    }

    #[inline(always)]
    pub fn swap(self) -> Self {
        Self {
            lo: self.hi,
            hi: self.lo,
        }
    }

    #[inline(always)]
    pub fn unpack_lo(a: Self, b: Self) -> Self {
        Self { lo: a.lo, hi: b.lo }
    }

    #[inline(always)]
    pub fn unpack_hi(a: Self, b: Self) -> Self {
        Self { lo: a.hi, hi: b.hi }
    }
}

#[cfg(not(target_arch = "x86_64"))]
impl Add for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            lo: self.lo + rhs.lo,
            hi: self.hi + rhs.hi,
        }
    }
}

#[cfg(not(target_arch = "x86_64"))]
impl Sub for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            lo: self.lo - rhs.lo,
            hi: self.hi - rhs.hi,
        }
    }
}

#[cfg(not(target_arch = "x86_64"))]
impl Mul for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            lo: self.lo * rhs.lo,
            hi: self.hi * rhs.hi,
        }
    }
}

impl F64x2 {
    /// Load a complex sample as `(re, im)`
    #[inline(always)]
    pub fn from_complex(c: Complex) -> Self {
        Self::new(c.re, c.im)
    }

    /// Read `(lo, hi)` back as `re + i im`
    #[inline(always)]
    pub fn to_complex(self) -> Complex {
        let [re, im] = self.to_array();
        Complex::new(re, im)
    }

    #[cfg(test)]
    fn lo(self) -> f64 {
        self.to_array()[0]
    }

    #[cfg(test)]
    fn hi(self) -> f64 {
        self.to_array()[1]
    }
}

/// Two complex numbers held as split real and imaginary lanes.
#[derive(Clone, Copy, Debug)]
pub struct ComplexPair {
    pub re: F64x2,
    pub im: F64x2,
}

impl ComplexPair {
    #[inline(always)]
    pub fn new(a: Complex, b: Complex) -> Self {
        Self {
            re: F64x2::new(a.re, b.re),
            im: F64x2::new(a.im, b.im),
        }
    }

    /// Gather two interleaved `(re, im)` registers into split lanes
    #[inline(always)]
    pub fn gather(a: F64x2, b: F64x2) -> Self {
        Self {
            re: F64x2::unpack_lo(a, b),
            im: F64x2::unpack_hi(a, b),
        }
    }

    /// Inverse of [`ComplexPair::gather`]: the two samples as interleaved registers
    #[inline(always)]
    pub fn scatter(self) -> (F64x2, F64x2) {
        (
            F64x2::unpack_lo(self.re, self.im),
            F64x2::unpack_hi(self.re, self.im),
        )
    }

    #[inline(always)]
    pub fn splat(c: Complex) -> Self {
        Self {
            re: F64x2::splat(c.re),
            im: F64x2::splat(c.im),
        }
    }
}

impl Add for ComplexPair {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Sub for ComplexPair {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl Mul for ComplexPair {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}
