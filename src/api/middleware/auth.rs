//! Login gate middleware.
//!
//! Every protected route passes through here. Anonymous callers are
//! redirected to `/login` without the handler ever running; callers
//! with a live session pass through, which also refreshes the
//! session's idle timer.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::api::error::ApiError;
use crate::api::types::{session_id_from_headers, ApiContext};
use crate::session::AuthState;

pub async fn require_login(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_login_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_login_inner(
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let state = match session_id_from_headers(req.headers()) {
        Some(session_id) => {
            let mut sessions = ctx
                .sessions
                .lock()
                .map_err(|_| ApiError::Internal("session lock".into()))?;
            sessions.state(&session_id)
        } // MutexGuard dropped here, before any .await
        None => AuthState::Anonymous,
    };

    if state == AuthState::Anonymous {
        return Ok(Redirect::to("/login").into_response());
    }

    Ok(next.run(req).await)
}
