use detection::detection::detection::Detection;

#[actix_web::main]
async fn main() {
    Detection::run().await;
    Detection::terminate().await;
}
