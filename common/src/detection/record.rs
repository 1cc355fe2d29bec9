use serde::{Deserialize, Serialize};

/// Axis-aligned box in absolute pixel coordinates. Coordinates are carried
/// verbatim from the capability output, so `x1 < x2` is not guaranteed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One normalized detection as it appears on the wire. The label field is
/// serialized as `class` for compatibility with existing consumers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DetectionRecord {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

/// The detection service response document. `image_with_boxes` is the
/// artifact name only, never a storage path; callers resolve it through
/// the service's `/outputs` surface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DetectionResponse {
    pub filename: String,
    pub detections: Vec<DetectionRecord>,
    pub detection_count: usize,
    pub image_with_boxes: String,
}

impl DetectionResponse {
    pub fn new(filename: String, detections: Vec<DetectionRecord>, image_with_boxes: String) -> Self {
        Self {
            filename,
            detection_count: detections.len(),
            detections,
            image_with_boxes,
        }
    }
}
