use std::sync::{Arc, Mutex};

use flowboard::infrastructure::config::ServiceConfig;
use flowboard::interfaces::http;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .try_init();

    let config = match ServiceConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {}", err);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Flowboard listening on http://{}:{} (data dir: {})",
        config.host,
        config.port,
        config.data_dir.display()
    );

    let logs = Arc::new(Mutex::new(Vec::new()));
    http::start_server(config, logs)?.await
}
