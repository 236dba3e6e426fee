use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spindj_api::{build_app, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "spindj_api=debug,spindj_recommender=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let port = config.port;

    tracing::info!(
        similar_limit = config.pipeline().similar_limit,
        tag_limit = config.pipeline().tag_limit,
        resolve_concurrency = config.pipeline().resolve_concurrency,
        isolate_tag_failures = config.pipeline().isolate_tag_failures,
        "Starting SpinDJ API server on port {}",
        port
    );

    let state = AppState::from_config(config)?;
    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Authorize Spotify at http://localhost:{}/login", port);

    axum::serve(listener, app).await?;

    Ok(())
}
