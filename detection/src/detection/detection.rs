use crate::detection::detector_manager::DetectorManager;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::api::detect;
use actix_web::{App, HttpServer};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;

pub struct Detection;

impl Detection {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        Config::now().await;
        Self::create_folders().await;
        DetectorManager::run().await;
        let http_server = loop {
            let config = Config::now().await;
            let http_server = HttpServer::new(|| {
                let cors = actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600);
                App::new()
                    .wrap(cors)
                    .service(detect::initialize())
            })
            .bind(format!("0.0.0.0:{}", config.http_server_bind_port));
            match http_server {
                Ok(http_server) => break http_server,
                Err(err) => {
                    logging_critical!(NetworkEntry::BindPortError(err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                }
            }
        };
        logging_information!(SystemEntry::WebReady);
        logging_information!(SystemEntry::InitializeComplete);
        logging_information!(SystemEntry::Online);
        if let Err(err) = http_server.run().await {
            logging_emergency!(SystemEntry::WebPanic(err));
        }
    }

    pub async fn terminate() {
        logging_information!(SystemEntry::Terminating);
        logging_information!(SystemEntry::TerminateComplete);
    }

    // Idempotent setup: scratch and artifact folders come from config and
    // may already exist.
    async fn create_folders() {
        let config = Config::now().await;
        for folder in [&config.upload_folder, &config.output_folder] {
            if let Err(err) = fs::create_dir_all(folder).await {
                logging_error!(IoEntry::CreateDirectoryError(Path::new(folder).display(), err));
            }
        }
    }
}
