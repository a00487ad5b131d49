use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Consultorio";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming the SQLite database file. Without it
/// the process still starts, but every database-backed route fails at
/// connection-acquisition time.
pub const DB_ENV: &str = "CONSULTORIO_DB";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "consultorio";

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the SQLite file. `None` means unconfigured.
    pub db_path: Option<PathBuf>,
    pub bind_addr: SocketAddr,
    pub page_size: u32,
    /// The fixed credential pair for the login gate. Compared with
    /// exact string equality; there is no user management here.
    pub username: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let db_path = std::env::var(DB_ENV).ok().map(PathBuf::from);

        let bind_addr = std::env::var("CONSULTORIO_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| DEFAULT_BIND.parse().expect("default bind address parses"));

        let page_size = std::env::var("CONSULTORIO_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let username =
            std::env::var("CONSULTORIO_USER").unwrap_or_else(|_| DEFAULT_USERNAME.into());
        let password =
            std::env::var("CONSULTORIO_PASS").unwrap_or_else(|_| DEFAULT_PASSWORD.into());

        Self {
            db_path,
            bind_addr,
            page_size,
            username,
            password,
        }
    }

    pub fn credentials(&self) -> (&str, &str) {
        (&self.username, &self.password)
    }
}

pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}
