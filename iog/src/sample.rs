use crate::{
    common::*,
    geometry::{self, EmptyMaskPolicy},
    guidance::GuidanceSynthesizer,
};

/// Interpolation used to resize each crop to the network resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResizePolicy {
    #[serde(default)]
    pub image: Interpolation,
    #[serde(default)]
    pub region_mask: Interpolation,
    #[serde(default)]
    pub void_mask: Interpolation,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            image: Interpolation::Linear,
            region_mask: Interpolation::Linear,
            void_mask: Interpolation::Linear,
        }
    }
}

/// The network input derived from one box, together with its intermediates.
#[derive(Debug, Clone)]
pub struct Sample<'a> {
    /// The untouched source image in `[H, W, 3]`.
    pub image: ArrayView3<'a, f32>,
    /// Ones inside the box and zeros elsewhere, in full image size.
    pub region_mask: Array2<f32>,
    /// The complement of the region mask.
    pub void_mask: Array2<f32>,
    /// The padded box in image coordinates. It may extend past the image.
    pub crop_bbox: TLBR<i64>,
    pub crop_image: Array3<f32>,
    pub crop_region_mask: Array2<f32>,
    pub crop_void_mask: Array2<f32>,
    /// Inside and outside heatmaps in `[R, R, 2]`, scaled to `[0, 255]`.
    pub guidance: Array3<f32>,
    /// Crop image channels followed by guidance channels, in `[R, R, 5]`.
    pub concat: Array3<f32>,
}

/// Turns one box into a network-ready [Sample].
#[derive(Debug, Clone, CopyGetters, Getters)]
pub struct SampleBuilder {
    /// Context margin around the box in pixels.
    #[getset(get_copy = "pub")]
    relax: i64,
    #[getset(get_copy = "pub")]
    zero_pad: bool,
    /// Side length of the square network input.
    #[getset(get_copy = "pub")]
    resolution: usize,
    #[getset(get_copy = "pub")]
    resize: ResizePolicy,
    #[getset(get = "pub")]
    guidance: GuidanceSynthesizer,
}

impl SampleBuilder {
    pub fn new(
        relax: i64,
        zero_pad: bool,
        resolution: usize,
        resize: ResizePolicy,
        guidance: GuidanceSynthesizer,
    ) -> Result<Self> {
        ensure!(relax >= 0, "relax must be non-negative, but get {}", relax);
        ensure!(resolution > 0, "resolution must be positive");
        Ok(Self {
            relax,
            zero_pad,
            resolution,
            resize,
            guidance,
        })
    }

    pub fn build<'a>(
        &self,
        image: ArrayView3<'a, f32>,
        bbox: &XYWH<i64>,
    ) -> Result<Sample<'a>, SegmentError> {
        let (height, width, channels) = image.dim();
        if channels != 3 {
            return Err(SegmentError::ShapeMismatch {
                what: "input image",
                expected: vec![height, width, 3],
                actual: image.shape().to_vec(),
            });
        }
        if bbox.is_degenerate() {
            return Err(SegmentError::DegenerateBox {
                bbox: *bbox,
                reason: "width and height must be positive".into(),
            });
        }

        let size = HW::from_shape((height, width))?;
        let region_mask = geometry::box_to_region_mask(&size, bbox);
        let void_mask = geometry::void_mask(&region_mask);

        let crop_bbox = geometry::crop_bbox(
            region_mask.view(),
            self.relax,
            self.zero_pad,
            EmptyMaskPolicy::Nothing,
        )?
        .ok_or_else(|| SegmentError::DegenerateBox {
            bbox: *bbox,
            reason: "the box does not overlap the image".into(),
        })?;

        let res = self.resolution;
        let ResizePolicy {
            image: image_interp,
            region_mask: region_interp,
            void_mask: void_interp,
        } = self.resize;
        let crop_image = geometry::extract_crop(&image, &crop_bbox, self.zero_pad)?
            .resize2d(res, res, image_interp)?;
        let crop_region_mask = geometry::extract_crop(&region_mask, &crop_bbox, self.zero_pad)?
            .resize2d(res, res, region_interp)?;
        let crop_void_mask = geometry::extract_crop(&void_mask, &crop_bbox, self.zero_pad)?
            .resize2d(res, res, void_interp)?;

        let guidance = self
            .guidance
            .synthesize(crop_region_mask.view())?
            .normalize_range(255.0);
        let concat = ndarray::concatenate(Axis(2), &[crop_image.view(), guidance.view()])
            .map_err(|err| SegmentError::Geometry(err.into()))?;

        Ok(Sample {
            image,
            region_mask,
            void_mask,
            crop_bbox,
            crop_image,
            crop_region_mask,
            crop_void_mask,
            guidance,
            concat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn builder(resolution: usize) -> SampleBuilder {
        let guidance = GuidanceSynthesizer::new(10.0, 10).unwrap();
        SampleBuilder::new(30, true, resolution, ResizePolicy::default(), guidance).unwrap()
    }

    #[test]
    fn sample_shapes() {
        let image = Array3::from_elem((120, 160, 3), 100.0f32);
        let bbox = XYWH {
            x: 40,
            y: 30,
            w: 50,
            h: 20,
        };
        let sample = builder(64).build(image.view(), &bbox).unwrap();

        assert_eq!(sample.crop_bbox.tlbr(), [0, 10, 80, 120]);
        assert_eq!(sample.region_mask.sum(), 1000.0);
        assert_eq!(sample.crop_image.dim(), (64, 64, 3));
        assert_eq!(sample.crop_region_mask.dim(), (64, 64));
        assert_eq!(sample.crop_void_mask.dim(), (64, 64));
        assert_eq!(sample.guidance.dim(), (64, 64, 2));
        assert_eq!(sample.concat.dim(), (64, 64, 5));

        assert_abs_diff_eq!(sample.concat[[32, 32, 0]], 100.0, epsilon = 1e-3);
        let max_guidance = sample
            .guidance
            .iter()
            .fold(f32::NEG_INFINITY, |max, &value| max.max(value));
        assert_abs_diff_eq!(max_guidance, 255.0, epsilon = 1e-2);
    }

    #[test]
    fn sample_zero_pads_near_border() {
        let image = Array3::from_elem((100, 100, 3), 50.0f32);
        let bbox = XYWH {
            x: 0,
            y: 0,
            w: 40,
            h: 40,
        };
        let sample = builder(100).build(image.view(), &bbox).unwrap();

        // the crop spans [-30, 70) on both axes
        assert_eq!(sample.crop_bbox.tlbr(), [-30, -30, 70, 70]);
        assert_eq!(sample.crop_image[[0, 0, 0]], 0.0);
        assert_eq!(sample.crop_image[[50, 50, 1]], 50.0);
        assert_eq!(sample.crop_void_mask[[0, 0]], 0.0);
        assert_eq!(sample.crop_region_mask[[50, 50]], 1.0);
    }

    #[test]
    fn sample_rejects_degenerate_box() {
        let image = Array3::zeros((50, 50, 3));
        let flat = XYWH {
            x: 10,
            y: 10,
            w: 0,
            h: 5,
        };
        assert!(matches!(
            builder(32).build(image.view(), &flat),
            Err(SegmentError::DegenerateBox { .. })
        ));

        let outside = XYWH {
            x: 60,
            y: 10,
            w: 10,
            h: 5,
        };
        assert!(matches!(
            builder(32).build(image.view(), &outside),
            Err(SegmentError::DegenerateBox { .. })
        ));
    }

    #[test]
    fn sample_rejects_non_rgb_image() {
        let image = Array3::zeros((50, 50, 4));
        let bbox = XYWH {
            x: 10,
            y: 10,
            w: 10,
            h: 10,
        };
        assert!(matches!(
            builder(32).build(image.view(), &bbox),
            Err(SegmentError::ShapeMismatch { .. })
        ));
    }
}
