//! Route table and middleware layering.
//!
//! Every data route sits behind the login gate; only `/login` and
//! `/logout` bypass it. Handlers get `ApiContext` via `State`, the
//! middleware via `Extension` (injected as the outermost layer).

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::AppConfig;

/// Build the full application router.
pub fn app_router(config: AppConfig) -> Router {
    build_router(ApiContext::new(config))
}

pub(crate) fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route("/", get(endpoints::patients::index))
        .route(
            "/add_patient",
            get(endpoints::patients::add_form).post(endpoints::patients::add),
        )
        .route("/patient_details/:id", get(endpoints::patients::details))
        .route(
            "/edit_patient/:id",
            get(endpoints::patients::edit_form).post(endpoints::patients::edit),
        )
        .route("/delete_patient/:id", post(endpoints::patients::delete))
        .route(
            "/add_medical_record/:patient_id",
            get(endpoints::records::add_form).post(endpoints::records::add),
        )
        .route(
            "/edit_medical_record/:id",
            get(endpoints::records::edit_form).post(endpoints::records::edit),
        )
        .route("/delete_medical_record/:id", post(endpoints::records::delete))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_login))
        // Extension must be outermost so the middleware can extract ApiContext
        .layer(axum::Extension(ctx.clone()));

    // Login and logout stay reachable while anonymous
    let unprotected = Router::new()
        .route(
            "/login",
            get(endpoints::auth::login_form).post(endpoints::auth::login),
        )
        .route("/logout", get(endpoints::auth::logout))
        .with_state(ctx);

    protected.merge(unprotected)
}
