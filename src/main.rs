use axum::serve;
use movies_db_rust::build_app;
use movies_db_rust::config::AppConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)      // Default to Info for everything
        .filter_module("sqlx", LevelFilter::Warn)  // Suppress sqlx Debug logs
        .parse_default_env()
        .init();

    log::info!("Movies DB: catalog and collections server");

    // Load configuration
    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{}, storage={:?}, movie_api={}",
        config.server.host,
        config.server.port,
        config.storage,
        config.movie_api.url
    );

    let app = build_app(&config).await?;
    run_server(app, &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Movies DB server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
