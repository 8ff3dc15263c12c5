use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use box_core::config::{path_separator_from_env_value, resolve_seed_file};
use box_core::constants::{DEFAULT_FIELDS, DEFAULT_LIMIT, DEFAULT_OFFSET};
use box_core::{CoreConfig, MemoryRepository};

/// Main entry point for the Box-compatible server
///
/// Resolves configuration once, seeds the in-memory repository and serves the REST API.
///
/// # Environment Variables
/// - `BOX_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `BOX_SEED_FILE`: repository seed (default: bundled `fixtures/repository.yaml`)
/// - `BOX_PATH_SEPARATOR`: separator used to count path segments (default: "/")
/// - `BOX_DEFAULT_USER`: login acting for requests without `As-User` (default: "Administrator")
/// - `API_KEY`: bearer key required on `/2.0` endpoints when set
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration or the seed file is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("box_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("box_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("BOX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::new(
        path_separator_from_env_value(std::env::var("BOX_PATH_SEPARATOR").ok()),
        DEFAULT_LIMIT.into(),
        DEFAULT_OFFSET.into(),
        DEFAULT_FIELDS.into(),
    )?);

    let seed_file = resolve_seed_file(std::env::var("BOX_SEED_FILE").ok().map(PathBuf::from))?;
    let repo = MemoryRepository::from_yaml_file(&seed_file)?;

    let default_user =
        std::env::var("BOX_DEFAULT_USER").unwrap_or_else(|_| "Administrator".into());
    let api_key = std::env::var("API_KEY").ok();
    if api_key.is_none() {
        tracing::warn!("API_KEY not set; /2.0 endpoints are unauthenticated");
    }

    let app = router(AppState::new(repo, cfg, default_user, api_key));

    tracing::info!("++ Starting Box REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
