use crate::{common::*, geometry::bbox_where};
use nd_goodies::{distance_transform, gaussian};

/// The simulated clicks, each given as `[y, x]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuidancePoints {
    /// The foreground pixel farthest from the object boundary.
    pub inside: [i64; 2],
    /// The top-left and bottom-right corners of the object extent, pushed outward.
    pub outside: [[i64; 2]; 2],
}

/// Renders inside and outside click heatmaps from a crop-space mask.
#[derive(Debug, Clone, PartialEq, CopyGetters)]
pub struct GuidanceSynthesizer {
    /// Full width at half maximum of each peak in pixels.
    #[getset(get_copy = "pub")]
    sigma: f64,
    /// Outward offset of the outside points from the object extent.
    #[getset(get_copy = "pub")]
    pad_pixel: i64,
}

impl GuidanceSynthesizer {
    pub fn new(sigma: f64, pad_pixel: i64) -> Result<Self> {
        ensure!(
            sigma.is_finite() && sigma > 0.0,
            "sigma must be positive, but get {}",
            sigma
        );
        ensure!(
            pad_pixel >= 0,
            "pad_pixel must be non-negative, but get {}",
            pad_pixel
        );
        Ok(Self { sigma, pad_pixel })
    }

    /// Locate the clicks on the pixels of `mask` above 0.5.
    ///
    /// Returns `None` if no pixel qualifies. Ties of the inside point are broken
    /// by the first pixel in row-major order.
    pub fn points(&self, mask: ArrayView2<'_, f32>) -> Option<GuidancePoints> {
        let (height, width) = mask.dim();
        let extent = bbox_where(mask, |value| value > 0.5)?;

        let foreground = mask.mapv(|value| value > 0.5);
        let distance = distance_transform(foreground.view());
        let (inside, _) = distance.indexed_iter().fold(
            ((0, 0), f64::NEG_INFINITY),
            |(best, best_dist), (index, &dist)| {
                if dist > best_dist {
                    (index, dist)
                } else {
                    (best, best_dist)
                }
            },
        );

        let pad = self.pad_pixel;
        let max_y = height as i64 - 1;
        let max_x = width as i64 - 1;
        let top_left = [(extent.t() - pad).max(0), (extent.l() - pad).max(0)];
        let bottom_right = [
            (extent.b() - 1 + pad).min(max_y),
            (extent.r() - 1 + pad).min(max_x),
        ];

        Some(GuidancePoints {
            inside: [inside.0 as i64, inside.1 as i64],
            outside: [top_left, bottom_right],
        })
    }

    /// Render the `[H, W, 2]` guidance map of `mask`.
    ///
    /// Channel 0 holds the inside peak and channel 1 the pixelwise maximum of the
    /// two outside peaks. An empty mask yields all zeros.
    pub fn synthesize(&self, mask: ArrayView2<'_, f32>) -> Result<Array3<f32>> {
        let shape = mask.dim();
        let mut guidance = Array3::zeros((shape.0, shape.1, 2));

        let points = match self.points(mask) {
            Some(points) => points,
            None => {
                debug!("no foreground in the guidance mask");
                return Ok(guidance);
            }
        };
        let peak = |[y, x]: [i64; 2]| gaussian(shape, [y as f64, x as f64], self.sigma);

        let inside = peak(points.inside)?;
        let [lhs, rhs] = points.outside;
        let mut outside = peak(lhs)?;
        Zip::from(&mut outside)
            .and(&peak(rhs)?)
            .for_each(|dst, &src| *dst = dst.max(src));

        guidance.index_axis_mut(Axis(2), 0).assign(&inside);
        guidance.index_axis_mut(Axis(2), 1).assign(&outside);
        Ok(guidance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square_mask() -> Array2<f32> {
        Array2::from_shape_fn((64, 64), |(y, x)| {
            if (10..30).contains(&y) && (20..40).contains(&x) {
                1.0
            } else {
                0.0
            }
        })
    }

    #[test]
    fn points_of_square() {
        let synthesizer = GuidanceSynthesizer::new(10.0, 10).unwrap();
        let points = synthesizer.points(square_mask().view()).unwrap();

        // four center pixels tie, the first in row-major order wins
        assert_eq!(points.inside, [19, 29]);
        assert_eq!(points.outside, [[0, 10], [39, 49]]);
    }

    #[test]
    fn points_are_clamped() {
        let mask = Array2::from_shape_fn((32, 32), |(y, x)| {
            if y < 5 && x >= 28 {
                1.0
            } else {
                0.0
            }
        });
        let synthesizer = GuidanceSynthesizer::new(10.0, 10).unwrap();
        let points = synthesizer.points(mask.view()).unwrap();
        assert_eq!(points.outside, [[0, 18], [14, 31]]);
    }

    #[test]
    fn points_ignore_weak_pixels() {
        let mask = Array2::from_elem((8, 8), 0.5f32);
        let synthesizer = GuidanceSynthesizer::new(10.0, 10).unwrap();
        assert_eq!(synthesizer.points(mask.view()), None);
    }

    #[test]
    fn synthesize_peaks() {
        let synthesizer = GuidanceSynthesizer::new(10.0, 10).unwrap();
        let guidance = synthesizer.synthesize(square_mask().view()).unwrap();

        assert_eq!(guidance.dim(), (64, 64, 2));
        assert_abs_diff_eq!(guidance[[19, 29, 0]], 1.0);
        assert_abs_diff_eq!(guidance[[0, 10, 1]], 1.0);
        assert_abs_diff_eq!(guidance[[39, 49, 1]], 1.0);
        assert_abs_diff_eq!(guidance[[19, 34, 0]], 0.5, epsilon = 1e-6);
        assert!(guidance[[19, 29, 1]] < 1e-3);
        assert!(guidance.iter().all(|&value| (0.0..=1.0).contains(&value)));
    }

    #[test]
    fn synthesize_is_deterministic() {
        let synthesizer = GuidanceSynthesizer::new(10.0, 10).unwrap();
        let mask = square_mask();
        let lhs = synthesizer.synthesize(mask.view()).unwrap();
        let rhs = synthesizer.synthesize(mask.view()).unwrap();
        assert!(lhs
            .iter()
            .zip(rhs.iter())
            .all(|(lhs, rhs)| lhs.to_bits() == rhs.to_bits()));
    }

    #[test]
    fn synthesize_empty_mask() {
        let synthesizer = GuidanceSynthesizer::new(10.0, 10).unwrap();
        let guidance = synthesizer.synthesize(Array2::zeros((16, 12)).view()).unwrap();
        assert_eq!(guidance.dim(), (16, 12, 2));
        assert!(guidance.iter().all(|&value| value == 0.0));
    }

    #[test]
    fn synthesizer_rejects_bad_parameters() {
        assert!(GuidanceSynthesizer::new(0.0, 10).is_err());
        assert!(GuidanceSynthesizer::new(10.0, -1).is_err());
    }
}
