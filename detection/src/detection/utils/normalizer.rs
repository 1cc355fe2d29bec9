use crate::detection::utils::detector::RawDetection;
use crate::detection::utils::label_table::{self, BACKGROUND_CLASS_ID};
use common::detection::record::{BoundingBox, DetectionRecord};

/// Filters raw candidate detections into normalized records. A candidate is
/// kept iff its confidence is strictly above the threshold and its class is
/// not the background sentinel. Relative order is preserved and boxes are
/// copied verbatim, so repeated runs over identical input are reproducible.
pub fn normalize(raw: &[RawDetection], threshold: f64) -> Result<Vec<DetectionRecord>, String> {
    let mut records = Vec::new();
    for detection in raw {
        if detection.class_id == BACKGROUND_CLASS_ID {
            continue;
        }
        if detection.confidence <= threshold {
            continue;
        }
        let label = label_table::lookup(detection.class_id)?;
        let [x1, y1, x2, y2] = detection.bbox;
        records.push(DetectionRecord {
            label: label.to_string(),
            confidence: detection.confidence,
            bbox: BoundingBox { x1, y1, x2, y2 },
        });
    }
    Ok(records)
}
