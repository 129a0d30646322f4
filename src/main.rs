use mimalloc::MiMalloc;
use striv::{config, routes, state};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "striv=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    let port = config.port;
    let max_file_size = config.max_file_size;
    tracing::info!(
        "Moving speed threshold {} m/s, batch limit {} files",
        config.min_moving_speed_mps,
        config.max_batch_files
    );
    let state = state::AppState::new(config);

    let app = routes::router()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Striv listening on {}", addr);
    tracing::info!("Analyze tracks: POST http://{}/api/tracks/analyze", addr);
    tracing::info!("Upload activity: POST http://{}/api/activities/upload", addr);

    axum::serve(listener, app).await
}
