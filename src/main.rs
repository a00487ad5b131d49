use tracing_subscriber::EnvFilter;

use consultorio::api::{server, ApiContext};
use consultorio::config::{self, AppConfig};
use consultorio::db;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = AppConfig::from_env();

    // Ensure the schema once at startup, on its own connection. A
    // missing CONSULTORIO_DB is not fatal here — requests report it.
    match cfg.db_path.as_deref() {
        Some(path) => match db::open_database(path) {
            Ok(_) => tracing::info!(path = %path.display(), "database ready"),
            Err(e) => tracing::error!("database init failed: {e}"),
        },
        None => tracing::warn!(
            "{} is not set; database-backed routes will fail until it is",
            config::DB_ENV
        ),
    }

    if let Err(e) = server::run(ApiContext::new(cfg)).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
