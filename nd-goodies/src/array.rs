use crate::{common::*, interpolation::Interpolation};

/// Extension methods for arrays whose first two axes are the image height and width.
///
/// Masks are `[H, W]` and images are `[H, W, C]`. Trailing axes are carried along untouched.
pub trait ArrayExt {
    type Output;

    /// The spatial size of the first two axes.
    fn spatial_size(&self) -> Result<HW<i64>>;

    /// Copy the rectangle `rect` out of the array.
    ///
    /// With `zero_pad`, the parts of `rect` outside the array are filled with zeros.
    /// Otherwise `rect` must lie within the array.
    fn crop_tlbr(&self, rect: &TLBR<i64>, zero_pad: bool) -> Result<Self::Output>;

    /// Resize the spatial axes to `new_h` by `new_w`.
    fn resize2d(&self, new_h: usize, new_w: usize, interp: Interpolation) -> Result<Self::Output>;

    fn sigmoid(&self) -> Self::Output;

    /// Linearly rescale all values into `[0, max]`.
    fn normalize_range(&self, max: f32) -> Self::Output;
}

impl<S, D> ArrayExt for ArrayBase<S, D>
where
    S: Data<Elem = f32>,
    D: Dimension + RemoveAxis,
{
    type Output = Array<f32, D>;

    fn spatial_size(&self) -> Result<HW<i64>> {
        ensure!(
            self.ndim() >= 2,
            "expect at least two dimensions, but get shape {:?}",
            self.shape()
        );
        let shape = self.shape();
        HW::from_shape((shape[0], shape[1]))
    }

    fn crop_tlbr(&self, rect: &TLBR<i64>, zero_pad: bool) -> Result<Self::Output> {
        let size = self.spatial_size()?;
        let frame = size.frame();
        ensure!(
            zero_pad || frame.contains_rect(rect),
            "crop rectangle {:?} exceeds the array of size {:?}",
            rect.tlbr(),
            [size.h(), size.w()]
        );

        let mut shape = self.raw_dim();
        shape[0] = rect.h() as usize;
        shape[1] = rect.w() as usize;
        let mut output = Array::zeros(shape);

        if let Some(valid) = frame.intersect_with(rect) {
            let mut src = self.view();
            src.slice_axis_inplace(Axis(0), Slice::from(valid.t() as isize..valid.b() as isize));
            src.slice_axis_inplace(Axis(1), Slice::from(valid.l() as isize..valid.r() as isize));

            let dst_rect = valid.translate(-rect.t(), -rect.l());
            let mut dst = output.view_mut();
            dst.slice_axis_inplace(
                Axis(0),
                Slice::from(dst_rect.t() as isize..dst_rect.b() as isize),
            );
            dst.slice_axis_inplace(
                Axis(1),
                Slice::from(dst_rect.l() as isize..dst_rect.r() as isize),
            );
            dst.assign(&src);
        }

        Ok(output)
    }

    fn resize2d(&self, new_h: usize, new_w: usize, interp: Interpolation) -> Result<Self::Output> {
        self.spatial_size()?;
        let resized = resize_axis(self, Axis(0), new_h, interp)?;
        let resized = resize_axis(&resized, Axis(1), new_w, interp)?;
        Ok(resized)
    }

    fn sigmoid(&self) -> Self::Output {
        self.mapv(|value| 1.0 / (1.0 + (-value).exp()))
    }

    fn normalize_range(&self, max: f32) -> Self::Output {
        let (min_value, max_value) = self
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &value| {
                (lo.min(value), hi.max(value))
            });
        if !min_value.is_finite() {
            return self.to_owned();
        }
        let span = max_value - min_value + 1e-10;
        self.mapv(|value| max * (value - min_value) / span)
    }
}

fn resize_axis<S, D>(
    src: &ArrayBase<S, D>,
    axis: Axis,
    new_len: usize,
    interp: Interpolation,
) -> Result<Array<f32, D>>
where
    S: Data<Elem = f32>,
    D: Dimension + RemoveAxis,
{
    let old_len = src.len_of(axis);
    if old_len == new_len {
        return Ok(src.to_owned());
    }

    let taps = interp.taps(old_len, new_len)?;
    let mut shape = src.raw_dim();
    shape[axis.index()] = new_len;
    let mut output = Array::zeros(shape);

    taps.iter().enumerate().for_each(|(index, taps)| {
        let mut dst = output.index_axis_mut(axis, index);
        taps.iter().for_each(|&(src_index, weight)| {
            dst.scaled_add(weight, &src.index_axis(axis, src_index));
        });
    });

    Ok(output)
}

/// Stack `[H, W, C]` arrays into a channel-first `[N, C, H, W]` batch.
pub fn stack_nchw(samples: &[ArrayView3<'_, f32>]) -> Result<Array4<f32>> {
    let first = samples
        .first()
        .ok_or_else(|| format_err!("cannot stack an empty list of arrays"))?;
    let (height, width, channels) = first.dim();

    let mut batch = Array4::zeros((samples.len(), channels, height, width));
    for (index, sample) in samples.iter().enumerate() {
        ensure!(
            sample.dim() == (height, width, channels),
            "sample {} has shape {:?}, but expect {:?}",
            index,
            sample.shape(),
            [height, width, channels]
        );
        batch
            .index_axis_mut(Axis(0), index)
            .assign(&sample.view().permuted_axes([2, 0, 1]));
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array3};

    #[test]
    fn crop_inside() {
        let mask = Array2::from_shape_fn((4, 5), |(y, x)| (y * 5 + x) as f32);
        let rect = TLBR::try_from_tlbr([1, 2, 3, 5]).unwrap();
        let crop = mask.crop_tlbr(&rect, false).unwrap();
        assert_eq!(crop, array![[7.0, 8.0, 9.0], [12.0, 13.0, 14.0]]);
    }

    #[test]
    fn crop_zero_pad() {
        let mask = Array2::from_elem((3, 3), 1.0f32);
        let rect = TLBR::try_from_tlbr([-1, -2, 2, 4]).unwrap();
        let crop = mask.crop_tlbr(&rect, true).unwrap();
        assert_eq!(crop.dim(), (3, 6));
        assert_eq!(
            crop,
            array![
                [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 1.0, 1.0, 0.0],
                [0.0, 0.0, 1.0, 1.0, 1.0, 0.0],
            ]
        );

        assert!(mask.crop_tlbr(&rect, false).is_err());
    }

    #[test]
    fn crop_outside_is_all_zero() {
        let image = Array3::from_elem((3, 3, 3), 5.0f32);
        let rect = TLBR::try_from_tlbr([10, 10, 12, 14]).unwrap();
        let crop = image.crop_tlbr(&rect, true).unwrap();
        assert_eq!(crop.dim(), (2, 4, 3));
        assert!(crop.iter().all(|&value| value == 0.0));
    }

    #[test]
    fn resize_keeps_constant() {
        let image = Array3::from_elem((13, 7, 3), 0.25f32);
        for interp in [
            Interpolation::Nearest,
            Interpolation::Linear,
            Interpolation::Cubic,
        ] {
            let resized = image.resize2d(32, 20, interp).unwrap();
            assert_eq!(resized.dim(), (32, 20, 3));
            resized
                .iter()
                .for_each(|&value| assert_abs_diff_eq!(value, 0.25, epsilon = 1e-5));
        }
    }

    #[test]
    fn resize_nearest_upsample() {
        let mask = array![[1.0f32, 0.0], [0.0, 1.0]];
        let resized = mask.resize2d(4, 4, Interpolation::Nearest).unwrap();
        assert_eq!(
            resized,
            array![
                [1.0, 1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
            ]
        );
    }

    #[test]
    fn sigmoid_values() {
        let logits = array![[0.0f32, 100.0, -100.0]];
        let probs = logits.sigmoid();
        assert_abs_diff_eq!(probs[[0, 0]], 0.5);
        assert_abs_diff_eq!(probs[[0, 1]], 1.0);
        assert_abs_diff_eq!(probs[[0, 2]], 0.0);
    }

    #[test]
    fn normalize_range_scales_to_max() {
        let values = array![[1.0f32, 2.0], [3.0, 5.0]];
        let normalized = values.normalize_range(255.0);
        assert_abs_diff_eq!(normalized[[0, 0]], 0.0);
        assert_abs_diff_eq!(normalized[[1, 1]], 255.0, epsilon = 1e-3);

        let flat = Array2::<f32>::zeros((2, 2)).normalize_range(255.0);
        assert!(flat.iter().all(|&value| value == 0.0));
    }

    #[test]
    fn stack_to_nchw() {
        let lhs = Array3::from_shape_fn((2, 3, 4), |(y, x, c)| (y * 100 + x * 10 + c) as f32);
        let rhs = lhs.mapv(|value| -value);
        let batch = stack_nchw(&[lhs.view(), rhs.view()]).unwrap();
        assert_eq!(batch.dim(), (2, 4, 2, 3));
        assert_eq!(batch[[0, 3, 1, 2]], 123.0);
        assert_eq!(batch[[1, 1, 0, 2]], -21.0);

        let odd = Array3::zeros((2, 2, 4));
        assert!(stack_nchw(&[lhs.view(), odd.view()]).is_err());
        assert!(stack_nchw(&[]).is_err());
    }
}
