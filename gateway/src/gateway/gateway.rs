use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::api::{download, upload};
use crate::web::page::home;
use actix_web::{App, HttpServer};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;

pub struct Gateway;

impl Gateway {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        Config::now().await;
        Self::create_folders().await;
        let http_server = loop {
            let config = Config::now().await;
            // The root scope matches every path, so it is registered last.
            let http_server = HttpServer::new(|| {
                let cors = actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600);
                App::new()
                    .wrap(cors)
                    .service(upload::initialize())
                    .service(download::initialize())
                    .service(home::initialize())
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

    async fn create_folders() {
        let config = Config::now().await;
        if let Err(err) = fs::create_dir_all(&config.output_folder).await {
            logging_error!(IoEntry::CreateDirectoryError(Path::new(&config.output_folder).display(), err));
        }
    }
}
