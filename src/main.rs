use axum::Router;
use monotrack_rs::{config, routes, state};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monotrack_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    tracing::info!("Storing routes and markers under {}", config.data_dir.display());
    let max_body_size = config.max_body_size;
    let port = config.port;
    let state = state::AppState::new(config);

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::session::router())
        .merge(routes::fixes::router())
        .merge(routes::history::router())
        .merge(routes::markers::router())
        .merge(routes::stats::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("MonoTrack-RS listening on {}", addr);
    tracing::info!("Session: GET http://{}/api/session", addr);
    tracing::info!("Fixes: POST http://{}/api/fixes", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
