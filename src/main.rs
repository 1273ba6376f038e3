#[tokio::main]
async fn main() {
    if let Err(e) = mathmentor_be::start_server().await {
        tracing::error!("Server stopped: {}", e);
        eprintln!("Server stopped: {e}");
        std::process::exit(1);
    }
}
