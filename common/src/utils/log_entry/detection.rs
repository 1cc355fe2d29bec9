use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionEntry {
    #[error("Processing image {0}")]
    TaskStart(String),
    #[error("Detection complete, {0} objects found")]
    TaskComplete(usize),
    #[error("Failed to decode image: {0}")]
    DecodeError(String),
    #[error("Detector process failed: {0}")]
    InferenceError(String),
    #[error("Class id {0} is outside the label table")]
    UnknownClassId(usize),
    #[error("Failed to encode annotated image: {0}")]
    EncodeError(String),
}

impl From<DetectionEntry> for String {
    #[inline(always)]
    fn from(value: DetectionEntry) -> Self {
        value.to_string()
    }
}
