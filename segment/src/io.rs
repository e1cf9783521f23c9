//! Image file conversions.

use crate::common::*;

/// Load an image file as an `[H, W, 3]` RGB array with values in `[0, 255]`.
pub fn load_image(path: &Path) -> Result<Array3<f32>> {
    let image = image::open(path)
        .with_context(|| format!("failed to load image file '{}'", path.display()))?
        .to_rgb8();
    Ok(rgb_to_array(&image))
}

pub fn rgb_to_array(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn((height as usize, width as usize, 3), |(y, x, c)| {
        image.get_pixel(x as u32, y as u32)[c] as f32
    })
}

/// Scale a `[0, 1]` mask to an 8-bit grayscale image.
pub fn mask_to_gray(mask: ArrayView2<'_, f32>) -> GrayImage {
    let (height, width) = mask.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let value = mask[[y as usize, x as usize]].clamp(0.0, 1.0);
        Luma([(value * 255.0).round() as u8])
    })
}

pub fn save_mask(mask: ArrayView2<'_, f32>, path: &Path) -> Result<()> {
    mask_to_gray(mask)
        .save(path)
        .with_context(|| format!("failed to save mask file '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use ndarray::array;

    #[test]
    fn rgb_image_layout() {
        let mut image = RgbImage::new(3, 2);
        image.put_pixel(2, 1, Rgb([10, 20, 30]));
        let array = rgb_to_array(&image);

        assert_eq!(array.dim(), (2, 3, 3));
        assert_eq!(array[[1, 2, 0]], 10.0);
        assert_eq!(array[[1, 2, 2]], 30.0);
        assert_eq!(array[[0, 2, 0]], 0.0);
    }

    #[test]
    fn mask_gray_levels() {
        let mask = array![[0.0f32, 0.5, 1.0]];
        let gray = mask_to_gray(mask.view());
        assert_eq!(gray.dimensions(), (3, 1));
        assert_eq!(gray.get_pixel(0, 0)[0], 0);
        assert_eq!(gray.get_pixel(1, 0)[0], 128);
        assert_eq!(gray.get_pixel(2, 0)[0], 255);
    }
}
