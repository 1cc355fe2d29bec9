use crate::detection::detector_manager::DetectorManager;
use crate::detection::pipeline::{self, DetectError, UploadedImage};
use crate::utils::config::Config;
use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, Scope, get, post, web};
use futures::{StreamExt, TryStreamExt};
use sanitize_filename::sanitize;
use serde::Serialize;
use serde_json::json;
use std::path::Path;

pub fn initialize() -> Scope {
    web::scope("")
        .service(root)
        .service(health)
        .service(detect)
        .service(download_output)
}

#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

#[get("/")]
async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Object detection service",
        "status": "healthy",
    }))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "detector_ready": DetectorManager::ready().await,
    }))
}

#[post("/detect")]
async fn detect(payload: Multipart) -> impl Responder {
    let upload = match collect_file_field(payload).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return bad_request("Multipart field 'file' is missing"),
        Err(_) => return bad_request("Invalid payload"),
    };
    match pipeline::handle_detect(upload).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => {
            let status = match err {
                DetectError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                DetectError::ServiceUnavailable | DetectError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            HttpResponse::build(status).json(ErrorDetail { detail: err.to_string() })
        }
    }
}

#[get("/outputs/{filename}")]
async fn download_output(req: HttpRequest, filename: web::Path<String>) -> impl Responder {
    let sanitized_file_name = sanitize(filename.into_inner());
    if sanitized_file_name.is_empty() {
        return HttpResponse::NotFound().json(ErrorDetail { detail: "File not found".to_string() });
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
        Err(_) => HttpResponse::NotFound().json(ErrorDetail { detail: "File not found".to_string() }),
    }
}

fn bad_request(detail: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorDetail { detail: detail.to_string() })
}

async fn collect_file_field(mut payload: Multipart) -> Result<Option<UploadedImage>, ()> {
    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = match field.content_disposition() {
            Some(content_disposition) => content_disposition,
            None => return Err(()),
        };
        let field_name = match content_disposition.get_name() {
            Some(field_name) => field_name.to_string(),
            None => return Err(()),
        };
        let filename = content_disposition.get_filename().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(|mime| mime.to_string()).unwrap_or_default();
        if field_name != "file" {
            continue;
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|_| ())?;
            bytes.extend_from_slice(&data);
        }
        return Ok(Some(UploadedImage { filename, content_type, bytes }));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use image::{Rgb, RgbImage};

    fn png_bytes() -> Vec<u8> {
        let image = RgbImage::from_pixel(32, 32, Rgb([1, 2, 3]));
        let mut bytes = Vec::new();
        image.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();
        bytes
    }

    fn multipart_body(filename: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
        let boundary = "------------------------detectiontest";
        let mut body = Vec::new();
        body.extend_from_slice(format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        ).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    #[actix_web::test]
    async fn http_surface_scenarios() {
        let _serial = crate::detection::detector_manager::test_support::SERIAL.lock().await;
        let app = test::init_service(App::new().service(initialize())).await;

        let request = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["status"], "healthy");

        DetectorManager::uninstall().await;
        let request = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["detector_ready"], false);

        // Non-image upload is rejected with 400 before any processing.
        let (content_type, payload) = multipart_body("note.txt", "text/plain", b"hello");
        let request = test::TestRequest::post()
            .uri("/detect")
            .insert_header(("content-type", content_type))
            .set_payload(payload)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["detail"], "File must be an image");

        // Unloaded capability: image uploads get a 500 with the taxonomy
        // detail until restart.
        let (content_type, payload) = multipart_body("cat.png", "image/png", &png_bytes());
        let request = test::TestRequest::post()
            .uri("/detect")
            .insert_header(("content-type", content_type))
            .set_payload(payload)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["detail"], "Object detector not initialized");

        // Unknown artifact name is a 404.
        let request = test::TestRequest::get().uri("/outputs/no_such_artifact.png").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Traversal-shaped names resolve inside the output folder only.
        let request = test::TestRequest::get().uri("/outputs/..%2F..%2Fetc%2Fpasswd").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
