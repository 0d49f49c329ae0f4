use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::handlers::AppState;

/// Count every inbound request, whatever its route or outcome
pub async fn count_requests<S>(
    State(state): State<AppState<S>>,
    request: Request,
    next: Next,
) -> Response
where
    S: Send + Sync + 'static,
{
    state.request_counter.increment();
    next.run(request).await
}
