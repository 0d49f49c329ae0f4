use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::api::handlers::AppState;
use crate::api::{collection_handlers, handlers, middleware::count_requests, user_handlers};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>(state: AppState<S>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Users
        .route("/register/", post(user_handlers::register::<S>))
        // Movies: listing merges the external catalog, the rest is plain CRUD
        .route(
            "/movies/",
            get(handlers::list_movies::<S>).post(handlers::create_movie::<S>),
        )
        .route(
            "/movies/:id/",
            get(handlers::get_movie::<S>)
                .put(handlers::replace_movie::<S>)
                .patch(handlers::patch_movie::<S>)
                .delete(handlers::delete_movie::<S>),
        )
        // Collection workflow
        .route(
            "/collections/create/",
            post(collection_handlers::create_collection::<S>),
        )
        .route(
            "/collections/update/:id/",
            put(collection_handlers::update_collection::<S>),
        )
        .route(
            "/collections/delete/:id/",
            axum::routing::delete(collection_handlers::delete_collection::<S>),
        )
        // Collection CRUD
        .route(
            "/collections/",
            get(collection_handlers::list_collections::<S>)
                .post(collection_handlers::create_empty_collection::<S>),
        )
        .route(
            "/collections/:id/",
            get(collection_handlers::get_collection::<S>)
                .put(collection_handlers::replace_collection::<S>)
                .patch(collection_handlers::patch_collection::<S>)
                .delete(collection_handlers::delete_collection::<S>),
        )
        // Diagnostics
        .route("/request_count/", get(handlers::get_request_count::<S>))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            count_requests::<S>,
        ))
        .with_state(state)
}
