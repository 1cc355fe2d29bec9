use crate::gateway::forwarder::{self, ForwardUpload, UpstreamError};
use crate::gateway::result_store;
use crate::utils::logging::*;
use crate::web::utils::response::{ErrorBody, UploadResult};
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Scope, post, web};
use futures::{StreamExt, TryStreamExt};

pub fn initialize() -> Scope {
    web::scope("/upload")
        .service(upload)
}

#[post("")]
async fn upload(payload: Multipart) -> impl Responder {
    let upload = match collect_file_field(payload).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return HttpResponse::BadRequest().json(ErrorBody::new("No file provided")),
        Err(_) => return HttpResponse::BadRequest().json(ErrorBody::new("Invalid payload")),
    };
    if !upload.content_type.starts_with("image/") {
        return HttpResponse::BadRequest().json(ErrorBody::new("File must be an image"));
    }
    let detection = match forwarder::forward(upload).await {
        Ok(detection) => detection,
        Err(err) => return upstream_error_response(err).await,
    };
    let image_bytes = match forwarder::fetch_artifact(&detection.image_with_boxes).await {
        Ok(image_bytes) => image_bytes,
        Err(err) => return upstream_error_response(err).await,
    };
    match result_store::persist(&detection, &image_bytes).await {
        Ok(stored) => {
            HttpResponse::Ok().json(UploadResult {
                success: true,
                detections: detection.detections,
                json_file: stored.json_file,
                image_file: stored.image_file,
            })
        }
        Err(err) => {
            logging_error!("Failed to store detection results", err.clone());
            HttpResponse::InternalServerError().json(ErrorBody::with_details("Failed to store detection results", err))
        }
    }
}

async fn upstream_error_response(err: UpstreamError) -> HttpResponse {
    match err {
        UpstreamError::InvalidUpload => HttpResponse::BadRequest().json(ErrorBody::new("File must be an image")),
        UpstreamError::Unreachable(details) => {
            logging_error!(NetworkEntry::UpstreamUnreachable(details.clone()));
            HttpResponse::BadGateway().json(ErrorBody::with_details("Detection service unreachable", details))
        }
        UpstreamError::Failure { status, body } => {
            logging_warning!(NetworkEntry::UpstreamFailure(status));
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            HttpResponse::build(status).json(ErrorBody::with_details("Detection service error", body))
        }
        UpstreamError::Malformed(details) => {
            logging_error!(NetworkEntry::UpstreamMalformed(details.clone()));
            HttpResponse::BadGateway().json(ErrorBody::with_details("Detection service returned an invalid response", details))
        }
    }
}

async fn collect_file_field(mut payload: Multipart) -> Result<Option<ForwardUpload>, ()> {
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
        return Ok(Some(ForwardUpload { filename, content_type, bytes }));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::Config;
    use actix_web::{App, HttpServer, test};
    use serde_json::json;

    fn multipart_body(filename: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
        let boundary = "------------------------gatewaytest";
        let mut body = Vec::new();
        body.extend_from_slice(format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        ).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    async fn stub_detect(_body: web::Bytes) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "filename": "cat.png",
            "detections": [
                {"class": "cat", "confidence": 0.92, "bbox": {"x1": 10.0, "y1": 10.0, "x2": 100.0, "y2": 100.0}}
            ],
            "detection_count": 1,
            "image_with_boxes": "stub_detected_cat.png",
        }))
    }

    async fn stub_output(name: web::Path<String>) -> HttpResponse {
        if name.as_str() == "stub_detected_cat.png" {
            HttpResponse::Ok().content_type("image/png").body(&b"fake png bytes"[..])
        } else {
            HttpResponse::NotFound().finish()
        }
    }

    async fn stub_reject(_body: web::Bytes) -> HttpResponse {
        HttpResponse::BadRequest().json(json!({"detail": "File must be an image"}))
    }

    async fn stub_malformed(_body: web::Bytes) -> HttpResponse {
        HttpResponse::Ok().json(json!({"image_with_boxes": "x.png"}))
    }

    #[derive(Clone, Copy)]
    enum StubMode {
        Detect,
        Reject,
        Malformed,
    }

    fn spawn_stub(mode: StubMode) -> std::net::SocketAddr {
        let factory = move || {
            let detect_route = match mode {
                StubMode::Detect => web::post().to(stub_detect),
                StubMode::Reject => web::post().to(stub_reject),
                StubMode::Malformed => web::post().to(stub_malformed),
            };
            App::new()
                .route("/detect", detect_route)
                .route("/outputs/{name}", web::get().to(stub_output))
        };
        let server = HttpServer::new(factory)
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        addr
    }

    // Config and the output folder are process-wide, so the gateway
    // scenarios run as one sequential test.
    #[actix_web::test]
    async fn upload_scenarios() {
        let _serial = crate::utils::config::test_support::SERIAL.lock().await;
        let output_dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().service(initialize())).await;

        let set_upstream = |url: String| {
            let folder = output_dir.path().to_string_lossy().to_string();
            async move {
                let mut config = Config::default();
                config.output_folder = folder;
                config.detection_service_url = url;
                Config::update(config).await;
            }
        };

        // Non-image upload never leaves the gateway.
        set_upstream("http://127.0.0.1:9".to_string()).await;
        let (content_type, payload) = multipart_body("note.txt", "text/plain", b"hello");
        let request = test::TestRequest::post()
            .uri("/upload")
            .insert_header(("content-type", content_type))
            .set_payload(payload)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "File must be an image");

        // Unreachable detection service: 502, nothing persisted.
        let (content_type, payload) = multipart_body("cat.png", "image/png", b"pretend png");
        let request = test::TestRequest::post()
            .uri("/upload")
            .insert_header(("content-type", content_type))
            .set_payload(payload)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Detection service unreachable");
        assert!(body["details"].is_string());
        assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);

        // Upstream rejection is forwarded with its status and body.
        let reject_addr = spawn_stub(StubMode::Reject);
        set_upstream(format!("http://{reject_addr}")).await;
        let (content_type, payload) = multipart_body("cat.png", "image/png", b"pretend png");
        let request = test::TestRequest::post()
            .uri("/upload")
            .insert_header(("content-type", content_type))
            .set_payload(payload)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Detection service error");
        assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);

        // A body that does not satisfy the shared response schema is never
        // reported as success and nothing is persisted.
        let malformed_addr = spawn_stub(StubMode::Malformed);
        set_upstream(format!("http://{malformed_addr}")).await;
        let (content_type, payload) = multipart_body("cat.png", "image/png", b"pretend png");
        let request = test::TestRequest::post()
            .uri("/upload")
            .insert_header(("content-type", content_type))
            .set_payload(payload)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Detection service returned an invalid response");
        assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);

        // Full round trip: forward, fetch the artifact, persist both files.
        let stub_addr = spawn_stub(StubMode::Detect);
        set_upstream(format!("http://{stub_addr}")).await;
        let (content_type, payload) = multipart_body("cat.png", "image/png", b"pretend png");
        let request = test::TestRequest::post()
            .uri("/upload")
            .insert_header(("content-type", content_type))
            .set_payload(payload)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["detections"].as_array().unwrap().len(), 1);
        assert_eq!(body["detections"][0]["class"], "cat");
        let json_file = body["json_file"].as_str().unwrap();
        let image_file = body["image_file"].as_str().unwrap();
        assert!(json_file.ends_with("_detections.json"));
        assert!(image_file.ends_with("_detected_image.png"));
        let stored_json = std::fs::read(output_dir.path().join(json_file)).unwrap();
        let stored: serde_json::Value = serde_json::from_slice(&stored_json).unwrap();
        assert_eq!(stored["detection_count"], 1);
        assert_eq!(stored["image_with_boxes"], "stub_detected_cat.png");
        let stored_image = std::fs::read(output_dir.path().join(image_file)).unwrap();
        assert_eq!(stored_image, b"fake png bytes");
    }
}
