use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

/// One raw candidate detection as emitted by the capability. Box corners are
/// absolute pixel coordinates; the capability does not guarantee that they
/// are ordered or inside the image bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDetection {
    pub class_id: usize,
    pub confidence: f64,
    #[serde(rename = "box")]
    pub bbox: [f64; 4],
}

/// The inference capability. Implementations own the model entirely; the
/// pipeline only depends on this contract. Implementations must be safe for
/// concurrent invocation by independent in-flight requests.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn infer(&self, image_path: &Path) -> Result<Vec<RawDetection>, String>;
}
