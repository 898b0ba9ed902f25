use super::lanes::{ComplexPair, F64x2};
use super::{bit_reverse_copy, Direction, TransformEngine};
use crate::Complex;

/// Radix-2 transform that processes two complex samples per step.
///
/// Stages 1 and 2 perform the same operations as [`super::ScalarEngine`] in the
/// same order and agree bit for bit. From stage 3 on, butterflies `j` and `j+1`
/// run in lock-step with twiddles `(W^j, W^(j+1))` advanced by `Wm^2`, so results
/// differ from the scalar engine only by rounding.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorEngine;

impl Direction {
    /// Lane mask applied after swapping `(re, im)` to multiply by the quarter twiddle
    fn quarter_mask(self) -> F64x2 {
        match self {
            Direction::Forward => F64x2::new(1.0, -1.0),
            Direction::Inverse => F64x2::new(-1.0, 1.0),
        }
    }
}

impl TransformEngine for VectorEngine {
    fn name(&self) -> &'static str {
        "vector"
    }

    fn transform_1d(&self, direction: Direction, input: &[Complex], output: &mut [Complex]) {
        let p = bit_reverse_copy(input, output);

        for pair in output.chunks_exact_mut(2) {
            let x0 = F64x2::from_complex(pair[0]);
            let x1 = F64x2::from_complex(pair[1]);
            pair[0] = (x0 + x1).to_complex();
            pair[1] = (x0 - x1).to_complex();
        }

        if p >= 2 {
            let mask = direction.quarter_mask();

            for quad in output.chunks_exact_mut(4) {
                let x0 = F64x2::from_complex(quad[0]);
                let x2 = F64x2::from_complex(quad[2]);
                quad[0] = (x0 + x2).to_complex();
                quad[2] = (x0 - x2).to_complex();

                let x1 = F64x2::from_complex(quad[1]);
                let x3 = F64x2::from_complex(quad[3]).swap() * mask;
                quad[1] = (x1 + x3).to_complex();
                quad[3] = (x1 - x3).to_complex();
            }
        }

        for s in 3..=p {
            let m = 1usize << s;
            let wm = direction.twiddle(m);
            let wm2 = ComplexPair::splat(direction.twiddle(m / 2));
            let w_init = ComplexPair::new(Complex::new(1.0, 0.0), wm);

            for block in output.chunks_exact_mut(m) {
                let (lo, hi) = block.split_at_mut(m / 2);
                let mut w = w_init;

                for (a, b) in lo.chunks_exact_mut(2).zip(hi.chunks_exact_mut(2)) {
                    let x02 = ComplexPair::gather(F64x2::from_complex(a[0]), F64x2::from_complex(a[1]));
                    let x13 = ComplexPair::gather(F64x2::from_complex(b[0]), F64x2::from_complex(b[1]));

                    let t = x13 * w;
                    let (y0, y2) = (x02 + t).scatter();
                    let (y1, y3) = (x02 - t).scatter();

                    a[0] = y0.to_complex();
                    a[1] = y2.to_complex();
                    b[0] = y1.to_complex();
                    b[1] = y3.to_complex();

                    w = w * wm2;
                }
            }
        }
    }
}
