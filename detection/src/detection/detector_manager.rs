use crate::detection::utils::detector::Detector;
use crate::detection::utils::process_detector::ProcessDetector;
use crate::utils::config::Config;
use crate::utils::logging::*;
use lazy_static::lazy_static;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

lazy_static! {
    static ref DETECTOR_MANAGER: RwLock<DetectorManager> = RwLock::new(DetectorManager::new());
}

/// Owns the one process-wide capability handle. Load happens once at
/// startup; a failed load leaves the handle empty and every request is
/// answered with ServiceUnavailable until the process restarts.
pub struct DetectorManager {
    detector: Option<Arc<dyn Detector>>,
}

impl DetectorManager {
    fn new() -> Self {
        Self {
            detector: None,
        }
    }

    pub async fn instance() -> RwLockReadGuard<'static, Self> {
        DETECTOR_MANAGER.read().await
    }

    pub async fn instance_mut() -> RwLockWriteGuard<'static, Self> {
        DETECTOR_MANAGER.write().await
    }

    pub async fn run() {
        let config = Config::now().await;
        match ProcessDetector::load(&config).await {
            Ok(detector) => {
                Self::install(Arc::new(detector)).await;
                logging_information!(SystemEntry::DetectorReady);
            }
            Err(err) => logging_error!(SystemEntry::DetectorUnavailable(err)),
        }
    }

    pub async fn install(detector: Arc<dyn Detector>) {
        Self::instance_mut().await.detector = Some(detector);
    }

    pub async fn uninstall() {
        Self::instance_mut().await.detector = None;
    }

    pub async fn detector() -> Option<Arc<dyn Detector>> {
        Self::instance().await.detector.clone()
    }

    pub async fn ready() -> bool {
        Self::instance().await.detector.is_some()
    }
}
