use crate::{
    annotation,
    common::*,
    geometry::{self, EmptyMaskPolicy},
    guidance::GuidanceSynthesizer,
    network::Network,
    sample::{ResizePolicy, Sample, SampleBuilder},
};
use serde_json::Value;

/// What to do with a box that covers no pixel of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateBoxPolicy {
    /// Drop the box with a warning.
    Skip,
    /// Abort the whole request.
    Fail,
}

impl Default for DegenerateBoxPolicy {
    fn default() -> Self {
        Self::Skip
    }
}

/// Options of [Segmenter].
#[derive(Debug, Clone, PartialEq)]
pub struct SegmenterInit {
    /// Context margin around each box in pixels.
    pub relax: i64,
    /// Fill the parts of a crop outside the image with zeros instead of shrinking the crop.
    pub zero_pad: bool,
    /// Side length of the square network input.
    pub resolution: usize,
    /// Full width at half maximum of the guidance peaks.
    pub sigma: R64,
    /// Outward offset of the outside guidance points.
    pub pad_pixel: i64,
    pub resize: ResizePolicy,
    /// Interpolation used to resize predictions back to the crop size.
    pub restore_interpolation: Interpolation,
    /// Expected channel count of the network input.
    pub input_channels: usize,
    /// Zero the values of the final mask below the threshold.
    pub threshold: Option<Ratio>,
    pub degenerate_box: DegenerateBoxPolicy,
}

impl Default for SegmenterInit {
    fn default() -> Self {
        Self {
            relax: 30,
            zero_pad: true,
            resolution: 512,
            sigma: r64(10.0),
            pad_pixel: 10,
            resize: ResizePolicy::default(),
            restore_interpolation: Interpolation::Cubic,
            input_channels: 5,
            threshold: None,
            degenerate_box: DegenerateBoxPolicy::Skip,
        }
    }
}

impl SegmenterInit {
    pub fn build<N>(self, network: N) -> Result<Segmenter<N>>
    where
        N: Network,
    {
        let Self {
            relax,
            zero_pad,
            resolution,
            sigma,
            pad_pixel,
            resize,
            restore_interpolation,
            input_channels,
            threshold,
            degenerate_box,
        } = self;

        ensure!(
            input_channels == 5,
            "the input is made of 3 image and 2 guidance channels, but input_channels is {}",
            input_channels
        );
        let guidance = GuidanceSynthesizer::new(sigma.raw(), pad_pixel)?;
        let builder = SampleBuilder::new(relax, zero_pad, resolution, resize, guidance)?;

        Ok(Segmenter {
            network,
            builder,
            restore_interpolation,
            input_channels,
            threshold: threshold.map(f32::from),
            degenerate_box,
        })
    }
}

/// Merges the per-box predictions of a network into one full image mask.
#[derive(Debug, CopyGetters, Getters)]
pub struct Segmenter<N> {
    #[getset(get = "pub")]
    network: N,
    #[getset(get = "pub")]
    builder: SampleBuilder,
    restore_interpolation: Interpolation,
    input_channels: usize,
    #[getset(get_copy = "pub")]
    threshold: Option<f32>,
    #[getset(get_copy = "pub")]
    degenerate_box: DegenerateBoxPolicy,
}

impl<N> Segmenter<N>
where
    N: Network,
{
    /// Segment the objects in the `[H, W, 3]` image marked by `boxes`.
    ///
    /// The result is an `[H, W]` mask in `[0, 1]`. Overlapping predictions are
    /// summed and clamped into `[0, 1]` after every addition.
    pub fn segment(
        &self,
        image: ArrayView3<'_, f32>,
        boxes: &[XYWH<i64>],
    ) -> Result<Array2<f32>, SegmentError> {
        let (height, width, channels) = image.dim();
        if channels != 3 {
            return Err(SegmentError::ShapeMismatch {
                what: "input image",
                expected: vec![height, width, 3],
                actual: image.shape().to_vec(),
            });
        }
        let full_size = HW::from_shape((height, width))?;
        let mut full_mask = Array2::zeros((height, width));

        if boxes.is_empty() {
            debug!("no box is given, return an empty mask");
            return Ok(full_mask);
        }

        let samples: Vec<Sample<'_>> = boxes
            .iter()
            .enumerate()
            .filter_map(|(index, bbox)| match self.builder.build(image, bbox) {
                Ok(sample) => Some(Ok(sample)),
                Err(err @ SegmentError::DegenerateBox { .. })
                    if self.degenerate_box == DegenerateBoxPolicy::Skip =>
                {
                    warn!("skip box {}: {}", index, err);
                    None
                }
                Err(err) => Some(Err(err)),
            })
            .collect::<Result<_, _>>()?;

        if samples.is_empty() {
            warn!("all {} boxes are skipped, return an empty mask", boxes.len());
            return Ok(full_mask);
        }

        let since = Instant::now();
        let predictions = self.predict(&samples)?;
        debug!("network inference takes {:?}", since.elapsed());

        let relax = self.builder.relax();
        let zero_pad = self.builder.zero_pad();
        for (index, sample) in samples.iter().enumerate() {
            let crop_bbox = geometry::crop_bbox(
                sample.region_mask.view(),
                relax,
                zero_pad,
                EmptyMaskPolicy::Nothing,
            )?
            .ok_or_else(|| format_err!("the region mask of sample {} is empty", index))?;

            let pasted = geometry::crop_to_full_mask(
                predictions.slice(s![index, 0, .., ..]),
                &crop_bbox,
                &full_size,
                zero_pad,
                0,
                false,
                self.restore_interpolation,
            )?;

            full_mask += &pasted;
            full_mask.mapv_inplace(|value| value.clamp(0.0, 1.0));
        }
        info!("merge {} predictions in {:?}", samples.len(), since.elapsed());

        if let Some(threshold) = self.threshold {
            apply_threshold(&mut full_mask, threshold);
        }

        Ok(full_mask)
    }

    /// Segment the boxes in raw annotation records.
    pub fn segment_records(
        &self,
        image: ArrayView3<'_, f32>,
        records: &[Value],
    ) -> Result<Array2<f32>, SegmentError> {
        let boxes = annotation::adapt_records(records)?;
        self.segment(image, &boxes)
    }

    /// Run the network on the samples and return the `[N, 1, R, R]` probabilities.
    fn predict(&self, samples: &[Sample<'_>]) -> Result<Array4<f32>, SegmentError> {
        let res = self.builder.resolution();
        let inputs: Vec<_> = samples.iter().map(|sample| sample.concat.view()).collect();
        let batch = nd_goodies::stack_nchw(&inputs)?;

        let expected = [samples.len(), self.input_channels, res, res];
        if batch.shape() != &expected[..] {
            return Err(SegmentError::ShapeMismatch {
                what: "network input",
                expected: expected.to_vec(),
                actual: batch.shape().to_vec(),
            });
        }

        info!("run network on {} samples", samples.len());
        let outputs = self
            .network
            .forward(&batch)
            .map_err(SegmentError::ModelExecution)?;
        let finest = outputs.last().ok_or_else(|| {
            SegmentError::ModelExecution(format_err!("the network returns no output"))
        })?;

        let expected = [samples.len(), 1, res, res];
        if finest.shape() != &expected[..] {
            return Err(SegmentError::ShapeMismatch {
                what: "network output",
                expected: expected.to_vec(),
                actual: finest.shape().to_vec(),
            });
        }

        Ok(finest.sigmoid())
    }
}

/// Zero the values below `threshold`. The others are kept as is.
pub fn apply_threshold(mask: &mut Array2<f32>, threshold: f32) {
    mask.mapv_inplace(|value| if value < threshold { 0.0 } else { value });
}
