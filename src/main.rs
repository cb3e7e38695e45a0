//! confab: real-time chat backend.

#[tokio::main]
async fn main() {
    confab::server::run().await;
}
