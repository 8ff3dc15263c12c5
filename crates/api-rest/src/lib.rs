//! # API REST
//!
//! Box API v2.0 compatible REST surface over `box-core`.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (API key, `As-User`, CORS, error bodies)
//!
//! All mapping and update logic lives in `box-core`; handlers only pick the acting user, build a
//! [`BoxContext`] and return the serialised result.

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod error;
pub mod handlers;

use axum::{
    http::HeaderMap,
    middleware,
    routing::get,
    Router,
};
use box_core::{BoxContext, BoxResult, CoreConfig, MemoryRepository};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;
pub use handlers::HealthRes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    repo: MemoryRepository,
    cfg: Arc<CoreConfig>,
    default_user: String,
    api_key: Option<String>,
}

impl AppState {
    /// `default_user` acts for requests without an `As-User` header. When `api_key` is set,
    /// every `/2.0` request must present it as a bearer token.
    pub fn new(
        repo: MemoryRepository,
        cfg: Arc<CoreConfig>,
        default_user: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            repo,
            cfg,
            default_user: default_user.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Runs `f` against a fresh session acting for the request's user.
    fn with_context<T>(
        &self,
        headers: &HeaderMap,
        f: impl FnOnce(&BoxContext<'_>) -> BoxResult<T>,
    ) -> BoxResult<T> {
        let session = self
            .repo
            .session(auth::acting_user(headers, &self.default_user));
        let ctx = BoxContext::new(&session, &self.repo, &self.repo, self.cfg.as_ref());
        f(&ctx)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_folder,
        handlers::put_folder,
        handlers::get_folder_items,
        handlers::get_file,
    ),
    components(schemas(HealthRes))
)]
pub struct ApiDoc;

/// Builds the full router: Box endpoints behind the API key, plus health and Swagger UI.
pub fn router(state: AppState) -> Router {
    let box_api = Router::new()
        .route(
            "/2.0/folders/:id",
            get(handlers::get_folder).put(handlers::put_folder),
        )
        .route("/2.0/folders/:id/items", get(handlers::get_folder_items))
        .route("/2.0/files/:id", get(handlers::get_file))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(box_api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
