use crate::utils::config::Config;
use crate::utils::logging::*;
use common::detection::record::DetectionResponse;
use std::path::Path;
use tokio::fs;
use uuid::Uuid;

pub struct StoredArtifacts {
    pub json_file: String,
    pub image_file: String,
}

/// Writes the detection JSON and the annotated image under one request id.
/// Both payloads are already in memory, so a failure never leaves a JSON
/// record pointing at an image that was not stored.
pub async fn persist(detection: &DetectionResponse, image_bytes: &[u8]) -> Result<StoredArtifacts, String> {
    let config = Config::now().await;
    let request_id = Uuid::new_v4();
    let extension = Path::new(&detection.image_with_boxes)
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or("png");
    let json_file = format!("{request_id}_detections.json");
    let image_file = format!("{request_id}_detected_image.{extension}");
    let json_path = Path::new(&config.output_folder).join(&json_file);
    let image_path = Path::new(&config.output_folder).join(&image_file);

    let json_bytes = serde_json::to_vec_pretty(detection)
        .map_err(|err| IoEntry::SerdeSerializeError(err).to_string())?;
    fs::write(&json_path, json_bytes).await
        .map_err(|err| IoEntry::WriteFileError(json_path.display(), err).to_string())?;
    if let Err(err) = fs::write(&image_path, image_bytes).await {
        let _ = fs::remove_file(&json_path).await;
        return Err(IoEntry::WriteFileError(image_path.display(), err).to_string());
    }
    Ok(StoredArtifacts { json_file, image_file })
}
