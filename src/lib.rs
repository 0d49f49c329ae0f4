pub mod api;
pub mod config;
pub mod external;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export logic types
pub use logic::{
    list_movies, register_user, CatalogError, CatalogOperations, CatalogResult,
    CollectionWorkflow, MovieListing,
};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, RequestCounter, Store};

use crate::api::handlers::AppState;
use crate::config::{AppConfig, StorageBackend};
use crate::external::{HttpMovieSource, MovieSource};
use std::sync::Arc;

/// Build the application router for the configured storage backend
pub async fn build_app(config: &AppConfig) -> anyhow::Result<axum::Router> {
    let movie_source: Arc<dyn MovieSource> = Arc::new(HttpMovieSource::from_config(&config.movie_api)?);
    let load_seed = std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true";

    match config.storage {
        StorageBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let postgres_store = PostgresStore::new(&database_url, config.max_connections()).await?;

            log::info!("Running database migrations...");
            postgres_store.migrate().await?;

            app_with_store(Arc::new(postgres_store), movie_source, load_seed).await
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; data is lost on shutdown");
            app_with_store(Arc::new(MemoryStore::new()), movie_source, load_seed).await
        }
    }
}

async fn app_with_store<S: Store + 'static>(
    store: Arc<S>,
    movie_source: Arc<dyn MovieSource>,
    load_seed: bool,
) -> anyhow::Result<axum::Router> {
    // Load seed data for demonstration (optional)
    if load_seed {
        let inserted = seed::load_seed_data(store.as_ref()).await?;
        log::info!("Seed data loaded: {} movies inserted", inserted);
    }

    Ok(routes::create_router(AppState::new(store, movie_source)))
}
