use crate::utils::logging::*;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
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
    pub upload_folder: String, //path
    pub output_folder: String, //path
    pub confidence_threshold: f64, //strict lower bound
    pub detector_command: String, //interpreter
    pub detector_script: String, //path
    pub border_width: u32, //pixels
    pub border_color: [u8; 3], //RGB
    pub text_color: [u8; 3], //RGB
    pub font_size: f32, //pixels
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_server_bind_port: 8000,
            bind_retry_duration: 3,
            upload_folder: "uploads".to_string(),
            output_folder: "outputs".to_string(),
            confidence_threshold: 0.5,
            detector_command: "python3".to_string(),
            detector_script: "script/ssd_detect.py".to_string(),
            border_width: 2,
            border_color: [0, 255, 0],
            text_color: [0, 255, 0],
            font_size: 20.0,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        match fs::read_to_string("./detection.toml") {
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
        }
    }

    pub async fn now() -> Config {
        CONFIG.read().await.clone()
    }

    pub async fn update(config: Config) {
        *CONFIG.write().await = config
    }

    pub fn validate(config: &Config) -> bool {
        Config::validate_second(config.bind_retry_duration)
            && Config::validate_threshold(config.confidence_threshold)
            && Config::validate_folder(&config.upload_folder)
            && Config::validate_folder(&config.output_folder)
            && Config::validate_border_width(config.border_width)
            && Config::validate_font_size(config.font_size)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_threshold(threshold: f64) -> bool {
        (0.0..1.0).contains(&threshold)
    }

    fn validate_folder(folder: &str) -> bool {
        !folder.is_empty()
    }

    fn validate_border_width(width: u32) -> bool {
        width > 0_u32
    }

    fn validate_font_size(size: f32) -> bool {
        size > 0_f32
    }
}
