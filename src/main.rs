use augur::{api, config::Config, services::SignalService, sources::BinanceClient, AppState};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    config
        .strategy
        .indicators
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid indicator configuration: {}", e))?;
    info!("Starting Augur server on {}:{}", config.host, config.port);

    let binance = Arc::new(BinanceClient::new(
        config.binance_api_url.clone(),
        config.binance_api_key.clone(),
    ));
    let signal_service = Arc::new(SignalService::new(
        binance,
        config.strategy,
        config.candle_cache_ttl,
    ));

    // Periodically drop expired candle windows
    if !config.candle_cache_ttl.is_zero() {
        let signal_service = signal_service.clone();
        let interval = config.candle_cache_ttl.max(Duration::from_secs(1));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                signal_service.purge_cache();
            }
        });
    }

    let state = AppState {
        config: config.clone(),
        signal_service,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Augur server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
