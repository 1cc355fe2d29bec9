use crate::detection::utils::detector::{Detector, RawDetection};
use crate::utils::config::Config;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command as AsyncCommand;

/// Child-process inference capability: the model lives in an external
/// interpreter + script pair which receives the scratch image path as its
/// single argument and prints the raw predictions as a JSON array on stdout.
/// Each invocation spawns an independent process, so concurrent requests
/// never contend on shared model state.
#[derive(Debug)]
pub struct ProcessDetector {
    command: String,
    script: PathBuf,
}

impl ProcessDetector {
    /// Probes the capability once at process start. A missing script or an
    /// interpreter that cannot be spawned is a permanent initialization
    /// failure, surfaced as ServiceUnavailable until restart.
    pub async fn load(config: &Config) -> Result<Self, String> {
        let script = PathBuf::from(&config.detector_script);
        if !fs::try_exists(&script).await.unwrap_or(false) {
            let script = script.display();
            return Err(format!("Detector script {script} not found"));
        }
        let probe = AsyncCommand::new(&config.detector_command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        if let Err(err) = probe {
            let command = &config.detector_command;
            return Err(format!("Unable to spawn detector interpreter {command}: {err}"));
        }
        Ok(Self {
            command: config.detector_command.clone(),
            script,
        })
    }
}

#[async_trait]
impl Detector for ProcessDetector {
    async fn infer(&self, image_path: &Path) -> Result<Vec<RawDetection>, String> {
        let output = AsyncCommand::new(&self.command)
            .arg(&self.script)
            .arg(image_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| format!("Failed to spawn detector process: {err}"))?;
        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("Detector process exit with code {code}: {}", stderr.trim()));
        }
        serde_json::from_slice::<Vec<RawDetection>>(&output.stdout)
            .map_err(|err| format!("Malformed detector output: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_fails_when_script_is_missing() {
        let mut config = Config::default();
        config.detector_script = "no/such/script.py".to_string();
        let result = ProcessDetector::load(&config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("not found"));
    }

    #[test]
    fn raw_predictions_parse_from_capability_json() {
        let stdout = r#"[
            {"class_id": 17, "confidence": 0.92, "box": [10.0, 10.0, 100.0, 100.0]},
            {"class_id": 1, "confidence": 0.3, "box": [0.0, 0.0, 5.0, 5.0]}
        ]"#;
        let raw: Vec<RawDetection> = serde_json::from_str(stdout).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].class_id, 17);
        assert_eq!(raw[0].bbox, [10.0, 10.0, 100.0, 100.0]);
    }
}
