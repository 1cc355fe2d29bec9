use gateway::gateway::gateway::Gateway;

#[actix_web::main]
async fn main() {
    Gateway::run().await;
    Gateway::terminate().await;
}
