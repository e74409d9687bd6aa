use portfolio_gate::{
    AppState,
    config::{AppConfig, Env},
    create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: loads configuration, sets up logging, and serves the session API.
#[tokio::main]
async fn main() {
    // 1. Configuration
    dotenv::dotenv().ok();

    // 2. Logging filter. RUST_LOG wins over the development defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portfolio_gate=debug,tower_http=info".into());

    // The output format depends on the environment, and `AppConfig::load` already
    // logs, so the subscriber goes up first.
    let env = Env::detect();

    if env == Env::Production {
        // PROD: JSON lines for the log aggregator.
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    let config = AppConfig::load_for(env);
    tracing::info!("Application starting in {:?} mode", config.env);
    if config.env == Env::Local {
        tracing::info!("session cookies are issued without the Secure attribute");
    }

    // 3. Router and server startup
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState { config });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly");
}
