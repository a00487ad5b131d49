//! Login and logout.
//!
//! `GET,POST /login` — the only routes reachable while anonymous.
//! `GET /logout` — drops the session and sends the client back to /login.
//!
//! Credentials are a fixed pair compared by exact string equality.
//! No hashing: they are configuration constants, not user records —
//! a known weakness the deployment docs call out.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{
    clear_session_cookie, session_cookie, session_id_from_headers, ApiContext,
};
use crate::session::credentials_match;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginView {
    pub fields: [&'static str; 2],
}

/// `GET /login` — names the fields the login form submits.
pub async fn login_form() -> Json<LoginView> {
    Json(LoginView {
        fields: ["username", "password"],
    })
}

/// `POST /login` — exact-match the fixed credential pair; on success
/// issue a session cookie and send the client to the patient list.
pub async fn login(
    State(ctx): State<ApiContext>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    if !credentials_match(ctx.config.credentials(), &form.username, &form.password) {
        tracing::warn!(username = %form.username, "rejected login attempt");
        return Err(ApiError::InvalidCredentials);
    }

    let session_id = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.login()
    };
    tracing::info!("login succeeded");

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&session_id))]),
        Redirect::to("/"),
    )
        .into_response())
}

/// `GET /logout` — always lands on /login, session or not.
pub async fn logout(State(ctx): State<ApiContext>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(session_id) = session_id_from_headers(&headers) {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.logout(&session_id);
    }

    Ok((
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/login"),
    )
        .into_response())
}
