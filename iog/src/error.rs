use bbox::XYWH;
use thiserror::Error;

/// Failures of the segmentation pipeline.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("annotation record {index} is malformed: {reason}")]
    MalformedAnnotation { index: usize, reason: String },

    #[error("degenerate box {bbox:?}: {reason}")]
    DegenerateBox { bbox: XYWH<i64>, reason: String },

    #[error("network execution failed")]
    ModelExecution(#[source] anyhow::Error),

    #[error("shape mismatch in {what}: expect {expected:?}, but get {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error(transparent)]
    Geometry(#[from] anyhow::Error),
}
