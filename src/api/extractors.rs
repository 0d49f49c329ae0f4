use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::handlers::{ApiError, ErrorResponse};

/// JSON request body that rejects with a 400 `{"error": ...}` response
/// instead of axum's plain-text rejection
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// Integer path parameters. A segment that does not parse matches no route,
/// so it is answered like any other unknown URL.
#[derive(Debug, Clone)]
pub struct IdPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(IdPath(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    log::debug!("Rejected request body: {}", rejection.body_text());

    let message = match rejection {
        JsonRejection::JsonDataError(_) => "Request body has missing or mistyped fields.",
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON.",
        JsonRejection::MissingJsonContentType(_) => {
            "Request body must be sent with Content-Type: application/json."
        }
        _ => "Request body could not be read.",
    };
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    log::debug!("Rejected path parameters: {}", rejection.body_text());

    match rejection {
        PathRejection::FailedToDeserializePathParams(_) => {
            (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found.")))
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Internal server error")),
        ),
    }
}
