use crate::common::*;

/// Render a 2D Gaussian peak of height 1 centered at `center = [y, x]`.
///
/// `sigma` is the full width at half maximum in pixels.
pub fn gaussian(shape: (usize, usize), center: [f64; 2], sigma: f64) -> Result<Array2<f32>> {
    ensure!(sigma > 0.0, "sigma must be positive, but get {}", sigma);
    let [cy, cx] = center;
    let factor = -4.0 * std::f64::consts::LN_2 / (sigma * sigma);

    let heatmap = Array2::from_shape_fn(shape, |(y, x)| {
        let dy = y as f64 - cy;
        let dx = x as f64 - cx;
        (factor * (dy * dy + dx * dx)).exp() as f32
    });
    Ok(heatmap)
}

/// Exact Euclidean distance from every foreground pixel to the nearest background pixel.
///
/// Background pixels have distance zero. Pixels beyond the array border count as background.
pub fn distance_transform(foreground: ArrayView2<'_, bool>) -> Array2<f64> {
    let (height, width) = foreground.dim();

    // background pixels are the seeds, with one pixel of border on every side
    let seeds = GrayImage::from_fn(width as u32 + 2, height as u32 + 2, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let inside = (1..=height).contains(&y) && (1..=width).contains(&x);
        if inside && foreground[[y - 1, x - 1]] {
            Luma([0])
        } else {
            Luma([255])
        }
    });
    let squared = euclidean_squared_distance_transform(&seeds);

    Array2::from_shape_fn((height, width), |(y, x)| {
        squared.get_pixel(x as u32 + 1, y as u32 + 1)[0].sqrt()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn gaussian_peak_and_half_width() {
        let heatmap = gaussian((21, 31), [10.0, 15.0], 10.0).unwrap();
        assert_abs_diff_eq!(heatmap[[10, 15]], 1.0);
        // sigma is the full width at half maximum
        assert_abs_diff_eq!(heatmap[[10, 20]], 0.5, epsilon = 1e-6);
        assert!(heatmap.iter().all(|&value| (0.0..=1.0).contains(&value)));

        assert!(gaussian((3, 3), [1.0, 1.0], 0.0).is_err());
    }

    #[test]
    fn distance_transform_square() {
        let foreground = Array2::from_shape_fn((7, 7), |(y, x)| {
            (1..6).contains(&y) && (1..6).contains(&x)
        });
        let distance = distance_transform(foreground.view());

        assert_abs_diff_eq!(distance[[0, 0]], 0.0);
        assert_abs_diff_eq!(distance[[1, 1]], 1.0);
        assert_abs_diff_eq!(distance[[3, 3]], 3.0);
        assert_abs_diff_eq!(distance[[2, 3]], 2.0);
    }

    #[test]
    fn distance_transform_touches_border() {
        let foreground = Array2::from_elem((3, 5), true);
        let distance = distance_transform(foreground.view());

        assert_abs_diff_eq!(distance[[0, 0]], 1.0);
        assert_abs_diff_eq!(distance[[1, 2]], 2.0);
    }

    #[test]
    fn distance_transform_diagonal() {
        let foreground = Array2::from_shape_fn((5, 5), |(y, x)| !(y == 0 && x == 0));
        let distance = distance_transform(foreground.view());
        assert_abs_diff_eq!(distance[[1, 1]], 2f64.sqrt(), epsilon = 1e-9);
    }
}
