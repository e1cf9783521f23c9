pub use anyhow::{bail, Context as _, Result};
pub use image::{GrayImage, Luma, RgbImage};
pub use iog::{AnnotationSet, DegenerateBoxPolicy, Network, NetworkInit, ResizePolicy, SegmenterInit};
pub use log::info;
pub use nd_goodies::{Interpolation, Ratio};
pub use ndarray::{Array2, Array3, ArrayView2};
pub use noisy_float::prelude::*;
pub use once_cell::sync::Lazy;
pub use semver::{Version, VersionReq};
pub use serde::{de::Error as DeserializeError, Deserialize, Deserializer, Serialize};
pub use std::{
    fs,
    path::{Path, PathBuf},
};
