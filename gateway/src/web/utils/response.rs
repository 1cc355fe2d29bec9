use common::detection::record::DetectionRecord;
use serde::Serialize;

#[derive(Serialize)]
pub struct UploadResult {
    pub success: bool,
    pub detections: Vec<DetectionRecord>,
    pub json_file: String,
    pub image_file: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new<T: Into<String>>(error: T) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details<T: Into<String>, U: Into<String>>(error: T, details: U) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
