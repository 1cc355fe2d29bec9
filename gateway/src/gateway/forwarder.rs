use crate::utils::config::Config;
use common::detection::record::DetectionResponse;
use lazy_static::lazy_static;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

lazy_static! {
    static ref HTTP_CLIENT: Client = Client::new();
}

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("File must be an image")]
    InvalidUpload,
    #[error("Detection service unreachable: {0}")]
    Unreachable(String),
    #[error("Detection service returned status {status}")]
    Failure { status: u16, body: String },
    #[error("Detection service returned an invalid response: {0}")]
    Malformed(String),
}

/// One uploaded file as collected from the multipart payload.
#[derive(Debug, Clone)]
pub struct ForwardUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Relays the upload to the detection service and validates the body against
/// the shared response schema; a document that does not deserialize is a
/// malformed exchange. Upstream error bodies are carried back verbatim so
/// the caller can surface them.
pub async fn forward(upload: ForwardUpload) -> Result<DetectionResponse, UpstreamError> {
    let config = Config::now().await;
    let part = Part::bytes(upload.bytes)
        .file_name(upload.filename)
        .mime_str(&upload.content_type)
        .map_err(|_| UpstreamError::InvalidUpload)?;
    let form = Form::new().part("file", part);
    let response = HTTP_CLIENT
        .post(format!("{}/detect", config.detection_service_url))
        .multipart(form)
        .send()
        .await
        .map_err(|err| UpstreamError::Unreachable(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Failure { status: status.as_u16(), body });
    }
    response.json::<DetectionResponse>().await
        .map_err(|err| UpstreamError::Malformed(err.to_string()))
}

/// Pulls the annotated image named by a detection response. The upstream
/// advertised the artifact, so a failed fetch counts as a malformed exchange.
pub async fn fetch_artifact(artifact_name: &str) -> Result<Vec<u8>, UpstreamError> {
    let config = Config::now().await;
    let response = HTTP_CLIENT
        .get(format!("{}/outputs/{}", config.detection_service_url, artifact_name))
        .send()
        .await
        .map_err(|err| UpstreamError::Unreachable(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Malformed(format!("artifact {artifact_name} missing, status {status}")));
    }
    let bytes = response.bytes().await
        .map_err(|err| UpstreamError::Malformed(err.to_string()))?;
    Ok(bytes.to_vec())
}
