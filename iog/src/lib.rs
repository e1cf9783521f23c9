//! Box-guided interactive instance segmentation.
//!
//! Every annotated box is cropped with context, paired with inside and outside
//! guidance heatmaps, and fed to a segmentation network. The per-box predictions
//! are pasted back and merged into one mask covering the full image.

mod common;
pub mod annotation;
pub mod error;
pub mod geometry;
pub mod guidance;
pub mod network;
pub mod sample;
pub mod segmenter;

pub use annotation::*;
pub use error::*;
pub use network::*;
pub use sample::*;
pub use segmenter::*;
