//! Shared state and session-cookie plumbing for the HTTP layer.

use std::sync::{Arc, Mutex};

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::config::{self, AppConfig};
use crate::db;
use crate::session::SessionStore;

/// Name of the cookie carrying the opaque session id.
pub const SESSION_COOKIE: &str = "consultorio_session";

/// Shared context for all routes and middleware.
///
/// Handlers acquire their own connection through [`ApiContext::open_db`]
/// once per request and thread it through the repository calls; the
/// connection closes when it drops at the end of the handler, on every
/// outcome.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<Mutex<SessionStore>>,
}

impl ApiContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
        }
    }

    /// Open the request's database connection.
    ///
    /// An unset `CONSULTORIO_DB` surfaces here as a configuration
    /// failure — deliberately at acquisition time, not at startup, so
    /// the login routes keep working without a database.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        let path = self
            .config
            .db_path
            .as_deref()
            .ok_or_else(|| ApiError::Configuration(format!("{} is not set", config::DB_ENV)))?;
        db::open_database(path).map_err(ApiError::from)
    }
}

/// Extract the session id from the request's Cookie header, if any.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Set-Cookie value establishing a session.
pub fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Set-Cookie value clearing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
