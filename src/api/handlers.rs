use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::extractors::{IdPath, JsonBody};
use crate::external::MovieSource;
use crate::logic::{self, CatalogError, CatalogOperations, MovieListing};
use crate::model::{Id, MovieInput, MovieRecord};
use crate::store::request_counter::{RequestCounter, TOTAL_REQUESTS_KEY};
use crate::store::traits::Store;

/// Shared state handed to every handler
pub struct AppState<S> {
    pub store: Arc<S>,
    pub movie_source: Arc<dyn MovieSource>,
    pub request_counter: Arc<RequestCounter>,
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, movie_source: Arc<dyn MovieSource>) -> Self {
        Self {
            store,
            movie_source,
            request_counter: Arc::new(RequestCounter::new()),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            movie_source: self.movie_source.clone(),
            request_counter: self.request_counter.clone(),
        }
    }
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a catalog failure onto its HTTP status and `{"error": ...}` body
pub fn error_response(err: CatalogError) -> ApiError {
    let status = match &err {
        CatalogError::Validation(_) | CatalogError::Conflict(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::UpstreamUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        CatalogError::Internal(e) => {
            log::error!("Internal error: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse::new(&err.to_string())))
}

pub async fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found.")))
}

/// GET /movies/
/// External catalog results next to the locally stored movies
pub async fn list_movies<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<MovieListing>, ApiError> {
    let listing = logic::list_movies(state.movie_source.as_ref(), state.store.as_ref())
        .await
        .map_err(error_response)?;
    Ok(Json(listing))
}

/// POST /movies/
pub async fn create_movie<S: Store>(
    State(state): State<AppState<S>>,
    JsonBody(input): JsonBody<MovieInput>,
) -> Result<(StatusCode, Json<MovieRecord>), ApiError> {
    let movie = CatalogOperations::create_movie(state.store.as_ref(), input)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(movie.into())))
}

/// GET /movies/{id}/
pub async fn get_movie<S: Store>(
    State(state): State<AppState<S>>,
    IdPath(id): IdPath<Id>,
) -> Result<Json<MovieRecord>, ApiError> {
    let movie = CatalogOperations::get_movie(state.store.as_ref(), id)
        .await
        .map_err(error_response)?;
    Ok(Json(movie.into()))
}

/// PUT /movies/{id}/
pub async fn replace_movie<S: Store>(
    State(state): State<AppState<S>>,
    IdPath(id): IdPath<Id>,
    JsonBody(input): JsonBody<MovieInput>,
) -> Result<Json<MovieRecord>, ApiError> {
    let movie = CatalogOperations::update_movie(state.store.as_ref(), id, input, false)
        .await
        .map_err(error_response)?;
    Ok(Json(movie.into()))
}

/// PATCH /movies/{id}/
pub async fn patch_movie<S: Store>(
    State(state): State<AppState<S>>,
    IdPath(id): IdPath<Id>,
    JsonBody(input): JsonBody<MovieInput>,
) -> Result<Json<MovieRecord>, ApiError> {
    let movie = CatalogOperations::update_movie(state.store.as_ref(), id, input, true)
        .await
        .map_err(error_response)?;
    Ok(Json(movie.into()))
}

/// DELETE /movies/{id}/
pub async fn delete_movie<S: Store>(
    State(state): State<AppState<S>>,
    IdPath(id): IdPath<Id>,
) -> Result<StatusCode, ApiError> {
    CatalogOperations::delete_movie(state.store.as_ref(), id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /request_count/
pub async fn get_request_count<S: Store>(
    State(state): State<AppState<S>>,
) -> Json<HashMap<&'static str, u64>> {
    Json(HashMap::from([(
        TOTAL_REQUESTS_KEY,
        state.request_counter.read(),
    )]))
}
