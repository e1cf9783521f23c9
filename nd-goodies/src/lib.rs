//! Array helpers for image crops, masks and heatmaps.

mod common;
pub mod array;
pub mod heatmap;
pub mod interpolation;
pub mod ratio;
#[cfg(feature = "tch")]
pub mod tensor;

pub use array::*;
pub use heatmap::*;
pub use interpolation::*;
pub use ratio::*;
#[cfg(feature = "tch")]
pub use tensor::*;
