use crate::detection::detector_manager::DetectorManager;
use crate::detection::utils::normalizer::normalize;
use crate::detection::utils::renderer::{self, RenderStyle};
use crate::utils::config::Config;
use crate::utils::logging::*;
use common::detection::record::DetectionResponse;
use image::RgbImage;
use sanitize_filename::sanitize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::task::spawn_blocking;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Object detector not initialized")]
    ServiceUnavailable,
    #[error("Error processing image: {0}")]
    Processing(String),
}

/// One uploaded image as collected from the multipart payload.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The detection request pipeline: validate, persist the scratch upload,
/// decode, infer, filter, render, encode. Fixed sequencing, no retries; the
/// loaded capability is the only state shared with other requests.
pub async fn handle_detect(upload: UploadedImage) -> Result<DetectionResponse, DetectError> {
    if !upload.content_type.starts_with("image/") {
        return Err(DetectError::InvalidInput("File must be an image".to_string()));
    }
    let detector = DetectorManager::detector().await.ok_or(DetectError::ServiceUnavailable)?;
    let config = Config::now().await;
    let sanitized_file_name = sanitize(&upload.filename);
    if sanitized_file_name.is_empty() {
        return Err(DetectError::InvalidInput("Invalid filename".to_string()));
    }
    // Request-scoped names keep concurrent requests from colliding on disk.
    let request_id = Uuid::new_v4();
    let upload_name = format!("{request_id}_{sanitized_file_name}");
    let output_name = format!("{request_id}_detected_{sanitized_file_name}");
    let upload_path = Path::new(&config.upload_folder).join(&upload_name);
    let output_path = Path::new(&config.output_folder).join(&output_name);

    logging_information!(DetectionEntry::TaskStart(upload.filename.clone()));
    // Full failure details stay in the log; response bodies carry a generic
    // message with no internal paths or process output.
    if let Err(err) = fs::write(&upload_path, &upload.bytes).await {
        logging_error!(IoEntry::WriteFileError(upload_path.display(), err));
        return Err(DetectError::Processing("failed to store uploaded image".to_string()));
    }

    let image = decode_image(upload_path.clone()).await?;
    let raw = match detector.infer(&upload_path).await {
        Ok(raw) => raw,
        Err(err) => {
            logging_error!(DetectionEntry::InferenceError(err));
            return Err(DetectError::Processing("inference failed".to_string()));
        }
    };
    let detections = normalize(&raw, config.confidence_threshold)
        .map_err(DetectError::Processing)?;

    let style = RenderStyle::from_config(&config);
    let records = detections.clone();
    spawn_blocking(move || {
        let annotated = renderer::render(&image, &records, &style);
        annotated.save(&output_path)
            .map_err(|err| DetectionEntry::EncodeError(err.to_string()).to_string())
    })
    .await
    .map_err(|err| DetectError::Processing(err.to_string()))?
    .map_err(DetectError::Processing)?;

    logging_information!(DetectionEntry::TaskComplete(detections.len()));
    Ok(DetectionResponse::new(upload.filename, detections, output_name))
}

async fn decode_image(path: PathBuf) -> Result<RgbImage, DetectError> {
    spawn_blocking(move || {
        image::open(&path)
            .map(|image| image.to_rgb8())
            .map_err(|err| DetectionEntry::DecodeError(err.to_string()).to_string())
    })
    .await
    .map_err(|err| DetectError::Processing(err.to_string()))?
    .map_err(DetectError::Processing)
}
