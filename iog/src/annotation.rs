use crate::common::*;
use serde_json::Value;

/// The annotation file envelope.
///
/// Records are kept as raw JSON values so that a single malformed record can be
/// reported with its position instead of failing the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    pub analysis_results: Vec<Value>,
}

impl AnnotationSet {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read annotation file '{}'", path.display()))?;
        let set = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse annotation file '{}'", path.display()))?;
        Ok(set)
    }

    /// Convert every record into a box, in record order.
    pub fn boxes(&self) -> Result<Vec<XYWH<i64>>, SegmentError> {
        adapt_records(&self.analysis_results)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub bbox: BBoxRecord,
}

/// Box corners in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBoxRecord {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl AnnotationRecord {
    /// Convert the corners to a box. Each component is truncated toward zero.
    ///
    /// Fails if a component or the far corner does not fit in `i64`.
    pub fn to_xywh(&self) -> Result<XYWH<i64>> {
        let BBoxRecord {
            xmin,
            ymin,
            xmax,
            ymax,
        } = self.bbox;

        let to_i64 = |name: &str, value: f64| -> Result<i64> {
            ensure!(
                value.is_finite() && value.abs() < i64::MAX as f64,
                "{} = {} is out of range",
                name,
                value
            );
            Ok(value as i64)
        };
        let x = to_i64("xmin", xmin)?;
        let y = to_i64("ymin", ymin)?;
        let w = to_i64("xmax - xmin", xmax - xmin)?;
        let h = to_i64("ymax - ymin", ymax - ymin)?;
        ensure!(
            x.checked_add(w).is_some() && y.checked_add(h).is_some(),
            "the box extent overflows"
        );

        Ok(XYWH { x, y, w, h })
    }
}

/// Parse one record, tagging failures with the record `index`.
pub fn adapt_record(index: usize, record: &Value) -> Result<XYWH<i64>, SegmentError> {
    let record = AnnotationRecord::deserialize(record).map_err(|err| {
        SegmentError::MalformedAnnotation {
            index,
            reason: err.to_string(),
        }
    })?;
    record
        .to_xywh()
        .map_err(|err| SegmentError::MalformedAnnotation {
            index,
            reason: format!("{:#}", err),
        })
}

pub fn adapt_records(records: &[Value]) -> Result<Vec<XYWH<i64>>, SegmentError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| adapt_record(index, record))
        .collect()
}
