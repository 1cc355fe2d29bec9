use crate::utils::static_files::StaticFiles;
use actix_web::{HttpResponse, Responder, Scope, get, web};

pub fn initialize() -> Scope {
    web::scope("")
        .service(home)
}

#[get("/")]
async fn home() -> impl Responder {
    match StaticFiles::get("html/upload.html") {
        Some(file) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(file.data),
        None => HttpResponse::NotFound().body("Not Found"),
    }
}
