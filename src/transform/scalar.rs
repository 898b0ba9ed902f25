use super::{bit_reverse_copy, Direction, TransformEngine};
use crate::Complex;

/// Reference radix-2 decimation-in-time transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarEngine;

impl TransformEngine for ScalarEngine {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn transform_1d(&self, direction: Direction, input: &[Complex], output: &mut [Complex]) {
        let p = bit_reverse_copy(input, output);

        // m = 2: twiddle is 1
        for pair in output.chunks_exact_mut(2) {
            let x0 = pair[0];
            let x1 = pair[1];
            pair[0] = x0 + x1;
            pair[1] = x0 - x1;
        }

        // m = 4: twiddles are 1 and -/+i
        if p >= 2 {
            for quad in output.chunks_exact_mut(4) {
                let x0 = quad[0];
                let x2 = quad[2];
                quad[0] = x0 + x2;
                quad[2] = x0 - x2;

                let x1 = quad[1];
                let x3 = direction.rotate_quarter(quad[3]);
                quad[1] = x1 + x3;
                quad[3] = x1 - x3;
            }
        }

        for s in 3..=p {
            let m = 1usize << s;
            let wm = direction.twiddle(m);

            for block in output.chunks_exact_mut(m) {
                let (lo, hi) = block.split_at_mut(m / 2);
                let mut w = Complex::new(1.0, 0.0);

                for (a, b) in lo.iter_mut().zip(hi.iter_mut()) {
                    let x0 = *a;
                    let x1 = *b * w;
                    *a = x0 + x1;
                    *b = x0 - x1;
                    w *= wm;
                }
            }
        }
    }
}
