use crate::common::*;

const CUBIC_COEFF: f64 = -0.75;

/// Pixel interpolation used when resizing along a spatial axis.
///
/// The sampling grid follows pixel-center alignment, so resizing to the same
/// length is the identity for every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    Linear,
    Cubic,
}

impl Default for Interpolation {
    fn default() -> Self {
        Self::Linear
    }
}

impl Interpolation {
    /// Compute the source indices and weights for every output position.
    pub fn taps(&self, src_len: usize, dst_len: usize) -> Result<Vec<Vec<(usize, f32)>>> {
        ensure!(
            src_len > 0 && dst_len > 0,
            "cannot resize between lengths {} and {}",
            src_len,
            dst_len
        );
        let scale = src_len as f64 / dst_len as f64;
        let last = src_len - 1;

        let taps = (0..dst_len)
            .map(|dst| match self {
                Self::Nearest => {
                    let src = ((dst as f64 * scale).floor() as usize).min(last);
                    vec![(src, 1.0)]
                }
                Self::Linear => {
                    let pos = (dst as f64 + 0.5) * scale - 0.5;
                    let lower = pos.floor();
                    let frac = pos - lower;

                    if lower < 0.0 {
                        vec![(0, 1.0)]
                    } else if lower as usize >= last {
                        vec![(last, 1.0)]
                    } else {
                        let lower = lower as usize;
                        [(lower, 1.0 - frac), (lower + 1, frac)]
                            .into_iter()
                            .filter(|&(_, weight)| weight != 0.0)
                            .map(|(index, weight)| (index, weight as f32))
                            .collect()
                    }
                }
                Self::Cubic => {
                    let pos = (dst as f64 + 0.5) * scale - 0.5;
                    let lower = pos.floor();
                    let frac = pos - lower;
                    let lower = lower as i64;

                    cubic_weights(frac)
                        .into_iter()
                        .enumerate()
                        .filter(|&(_, weight)| weight != 0.0)
                        .map(|(offset, weight)| {
                            let index = (lower - 1 + offset as i64).clamp(0, last as i64);
                            (index as usize, weight as f32)
                        })
                        .collect()
                }
            })
            .collect();

        Ok(taps)
    }
}

fn cubic_weights(frac: f64) -> [f64; 4] {
    let a = CUBIC_COEFF;
    let x = frac + 1.0;
    let w0 = ((a * x - 5.0 * a) * x + 8.0 * a) * x - 4.0 * a;
    let w1 = ((a + 2.0) * frac - (a + 3.0)) * frac * frac + 1.0;
    let y = 1.0 - frac;
    let w2 = ((a + 2.0) * y - (a + 3.0)) * y * y + 1.0;
    let w3 = 1.0 - w0 - w1 - w2;
    [w0, w1, w2, w3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn taps_identity() {
        for interp in [
            Interpolation::Nearest,
            Interpolation::Linear,
            Interpolation::Cubic,
        ] {
            let taps = interp.taps(7, 7).unwrap();
            taps.iter().enumerate().for_each(|(dst, taps)| {
                let value: f32 = taps
                    .iter()
                    .filter(|&&(src, _)| src == dst)
                    .map(|&(_, weight)| weight)
                    .sum();
                assert_abs_diff_eq!(value, 1.0, epsilon = 1e-6);
            });
        }
    }

    #[test]
    fn taps_weights_sum_to_one() {
        for interp in [
            Interpolation::Nearest,
            Interpolation::Linear,
            Interpolation::Cubic,
        ] {
            for (src, dst) in [(4, 9), (9, 4), (512, 97)] {
                interp.taps(src, dst).unwrap().iter().for_each(|taps| {
                    let sum: f32 = taps.iter().map(|&(_, weight)| weight).sum();
                    assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
                    assert!(taps.iter().all(|&(index, _)| index < src));
                });
            }
        }
    }

    #[test]
    fn taps_linear_upsample() {
        let taps = Interpolation::Linear.taps(2, 4).unwrap();
        assert_eq!(taps[0], vec![(0, 1.0)]);
        assert_eq!(taps[1], vec![(0, 0.75), (1, 0.25)]);
        assert_eq!(taps[2], vec![(0, 0.25), (1, 0.75)]);
        assert_eq!(taps[3], vec![(1, 1.0)]);
    }

    #[test]
    fn taps_reject_empty() {
        assert!(Interpolation::Linear.taps(0, 3).is_err());
        assert!(Interpolation::Nearest.taps(3, 0).is_err());
    }
}
