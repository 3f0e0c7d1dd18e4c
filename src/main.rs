#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = estate_api::config::config();
    tracing::info!("Starting Estate API in {:?} mode", config.environment);

    if let Err(e) = estate_api::routes::serve().await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
