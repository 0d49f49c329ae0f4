use crate::api::extractors::JsonBody;
use crate::api::handlers::{error_response, ApiError, AppState};
use crate::logic::register_user;
use crate::model::{MessageResponse, RegisterRequest};
use crate::store::traits::Store;
use axum::{extract::State, http::StatusCode, response::Json};

/// POST /register/
pub async fn register<S: Store>(
    State(state): State<AppState<S>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    register_user(state.store.as_ref(), req)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}
