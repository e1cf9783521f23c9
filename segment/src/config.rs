use crate::common::*;

pub use postprocess::*;
pub use preprocess::*;

pub static CONFIG_VERSION: Lazy<VersionReq> = Lazy::new(|| VersionReq::parse("0.1.0").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_version")]
    pub version: Version,
    pub model: NetworkInit,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub postprocess: PostprocessConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }

    /// Collect the pipeline options scattered over the config sections.
    pub fn segmenter_init(&self) -> SegmenterInit {
        let PreprocessConfig {
            relax,
            zero_pad,
            resolution,
            sigma,
            pad_pixel,
            resize,
        } = self.preprocess;
        let PostprocessConfig {
            threshold,
            degenerate_box,
            interpolation,
        } = self.postprocess;

        SegmenterInit {
            relax,
            zero_pad,
            resolution,
            sigma,
            pad_pixel,
            resize,
            restore_interpolation: interpolation,
            input_channels: self.model.input_channels,
            threshold,
            degenerate_box,
        }
    }
}

mod preprocess {
    use super::*;

    /// Crop and guidance options.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct PreprocessConfig {
        /// The context margin around each box in pixels.
        pub relax: i64,
        /// Fill the crop parts outside the image with zeros.
        pub zero_pad: bool,
        /// The side length of the square network input.
        pub resolution: usize,
        /// The full width at half maximum of the guidance peaks.
        pub sigma: R64,
        /// The outward offset of the outside guidance points.
        pub pad_pixel: i64,
        /// The interpolation modes to resize the crops.
        pub resize: ResizePolicy,
    }

    impl Default for PreprocessConfig {
        fn default() -> Self {
            let SegmenterInit {
                relax,
                zero_pad,
                resolution,
                sigma,
                pad_pixel,
                resize,
                ..
            } = SegmenterInit::default();

            Self {
                relax,
                zero_pad,
                resolution,
                sigma,
                pad_pixel,
                resize,
            }
        }
    }
}

mod postprocess {
    use super::*;

    /// Mask merging options.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct PostprocessConfig {
        /// The optional hard cutoff on the final mask.
        pub threshold: Option<Ratio>,
        /// Skip boxes that cover no pixel, or abort on them.
        pub degenerate_box: DegenerateBoxPolicy,
        /// The interpolation mode to resize predictions back to the crop size.
        pub interpolation: Interpolation,
    }

    impl Default for PostprocessConfig {
        fn default() -> Self {
            Self {
                threshold: None,
                degenerate_box: DegenerateBoxPolicy::Skip,
                interpolation: Interpolation::Cubic,
            }
        }
    }
}

pub fn deserialize_version<'de, D>(deserializer: D) -> Result<Version, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    let version = Version::parse(&text).map_err(|err| {
        D::Error::custom(format!(
            "failed to parse version number '{}': {:?}",
            text, err
        ))
    })?;

    if !CONFIG_VERSION.matches(&version) {
        return Err(D::Error::custom(format!(
            "incompatible version: get '{}', but it is incompatible with requirement '{}'",
            version, &*CONFIG_VERSION,
        )));
    }

    Ok(version)
}
