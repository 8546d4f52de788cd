//! Taleboard API server entry point.

use std::error::Error;
use std::sync::{Arc, Mutex};

use axum::Router;
use taleboard_api::config::ServerConfig;
use taleboard_api::routes;
use taleboard_api::state::AppState;
use taleboard_board::domain::layout::LayoutConfig;
use taleboard_core::rng::{RandomSource, SeededRng};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Taleboard API server");

    let config = ServerConfig::from_env()?;

    let rng = match config.board_seed {
        Some(seed) => {
            tracing::info!(seed, "using seeded board RNG");
            SeededRng::new(seed)
        }
        None => SeededRng::from_entropy(),
    };
    let rng: Arc<Mutex<dyn RandomSource + Send>> = Arc::new(Mutex::new(rng));
    let app_state = AppState::new(rng, LayoutConfig::default());

    // TODO: Replace CorsLayer::permissive() with the session layer's origin.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/boards", routes::boards::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
