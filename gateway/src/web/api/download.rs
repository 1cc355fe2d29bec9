use crate::utils::config::Config;
use crate::web::utils::response::ErrorBody;
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, Scope, get, web};
use sanitize_filename::sanitize;
use std::path::Path;

pub fn initialize() -> Scope {
    web::scope("/download")
        .service(download)
}

// The path segment is sanitized and resolved only inside the output folder,
// never as an arbitrary server path.
#[get("/{filename}")]
async fn download(req: HttpRequest, filename: web::Path<String>) -> impl Responder {
    let sanitized_file_name = sanitize(filename.into_inner());
    if sanitized_file_name.is_empty() {
        return HttpResponse::NotFound().json(ErrorBody::new("File not found"));
    }
    let config = Config::now().await;
    let file_path = Path::new(&config.output_folder).join(&sanitized_file_name);
    match NamedFile::open_async(&file_path).await {
        Ok(named_file) => {
            let cd = ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(sanitized_file_name)],
            };
            named_file
                .set_content_disposition(cd)
                .set_content_type(mime_guess::from_path(&file_path).first_or_octet_stream())
                .into_response(&req)
        }
        Err(_) => HttpResponse::NotFound().json(ErrorBody::new("File not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn download_scenarios() {
        let _serial = crate::utils::config::test_support::SERIAL.lock().await;
        let output_dir = tempfile::tempdir().unwrap();
        std::fs::write(output_dir.path().join("stored.json"), b"{}").unwrap();
        let mut config = Config::default();
        config.output_folder = output_dir.path().to_string_lossy().to_string();
        Config::update(config).await;
        let app = test::init_service(App::new().service(initialize())).await;

        let request = test::TestRequest::get().uri("/download/stored.json").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = test::TestRequest::get().uri("/download/missing.json").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "File not found");

        // Traversal-shaped names resolve inside the output folder only.
        let request = test::TestRequest::get().uri("/download/..%2F..%2Fetc%2Fpasswd").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
