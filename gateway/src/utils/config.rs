use crate::utils::logging::*;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use tokio::sync::RwLock;

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::new());
}

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub http_server_bind_port: u16, //port
    pub bind_retry_duration: u64, //seconds
    pub output_folder: String, //path
    pub detection_service_url: String, //base url, no trailing slash
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_server_bind_port: 8080,
            bind_retry_duration: 3,
            output_folder: "output".to_string(),
            detection_service_url: "http://localhost:8000".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = match fs::read_to_string("./gateway.toml") {
            Ok(toml_string) => {
                match toml::from_str::<ConfigTable>(&toml_string) {
                    Ok(config_table) => {
                        let config = config_table.config;
                        if !Self::validate(&config) {
                            logging_console!(emergency_entry!("Config", SystemEntry::InvalidConfig));
                            panic!("Invalid configuration file");
                        }
                        config
                    }
                    Err(err) => {
                        logging_console!(emergency_entry!("Config", SystemEntry::InvalidConfig, err.to_string()));
                        panic!("Unable to parse configuration file");
                    }
                }
            }
            Err(_) => {
                logging_console!(warning_entry!("Config", SystemEntry::ConfigNotFound));
                Config::default()
            }
        };
        // Deployment override, takes precedence over the file.
        if let Ok(url) = env::var("DETECTION_SERVICE_URL") {
            config.detection_service_url = url;
        }
        config.detection_service_url = config.detection_service_url.trim_end_matches('/').to_string();
        config
    }

    pub async fn now() -> Config {
        CONFIG.read().await.clone()
    }

    pub async fn update(config: Config) {
        *CONFIG.write().await = config
    }

    pub fn validate(config: &Config) -> bool {
        Config::validate_second(config.bind_retry_duration)
            && Config::validate_folder(&config.output_folder)
            && Config::validate_url(&config.detection_service_url)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_folder(folder: &str) -> bool {
        !folder.is_empty()
    }

    fn validate_url(url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }
}

// Tests that rewrite the process-wide config take this lock so they cannot
// interleave.
#[cfg(test)]
pub(crate) mod test_support {
    use tokio::sync::Mutex;

    pub static SERIAL: Mutex<()> = Mutex::const_new(());
}
