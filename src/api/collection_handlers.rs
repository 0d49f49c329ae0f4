use crate::api::extractors::{IdPath, JsonBody};
use crate::api::handlers::{error_response, ApiError, AppState};
use crate::logic::{CatalogOperations, CollectionWorkflow};
use crate::model::{
    CollectionCreatedResponse, CollectionDetail, CollectionInput, CollectionSummary,
    CreateCollectionRequest, Id, MessageResponse, UpdateCollectionRequest,
};
use crate::store::traits::Store;
use axum::{extract::State, http::StatusCode, response::Json};

/// POST /collections/create/
/// Create a collection and fill it with the listed movies
pub async fn create_collection<S: Store>(
    State(state): State<AppState<S>>,
    JsonBody(req): JsonBody<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<CollectionCreatedResponse>), ApiError> {
    let collection_id = CollectionWorkflow::create(state.store.as_ref(), req)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(CollectionCreatedResponse {
            message: "Collection created successfully".to_string(),
            collection_id,
        }),
    ))
}

/// GET /collections/{id}/
pub async fn get_collection<S: Store>(
    State(state): State<AppState<S>>,
    IdPath(id): IdPath<Id>,
) -> Result<Json<CollectionDetail>, ApiError> {
    let detail = CollectionWorkflow::get(state.store.as_ref(), id)
        .await
        .map_err(error_response)?;
    Ok(Json(detail))
}

/// PUT /collections/update/{id}/
/// Replace the membership (and optionally the name) of a collection
pub async fn update_collection<S: Store>(
    State(state): State<AppState<S>>,
    IdPath(id): IdPath<Id>,
    JsonBody(req): JsonBody<UpdateCollectionRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    CollectionWorkflow::update(state.store.as_ref(), id, req)
        .await
        .map_err(error_response)?;
    Ok(Json(MessageResponse::new("Collection updated successfully")))
}

/// DELETE /collections/delete/{id}/ and DELETE /collections/{id}/
pub async fn delete_collection<S: Store>(
    State(state): State<AppState<S>>,
    IdPath(id): IdPath<Id>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    CollectionWorkflow::delete(state.store.as_ref(), id)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::NO_CONTENT,
        Json(MessageResponse::new("Collection deleted successfully")),
    ))
}

/// GET /collections/
pub async fn list_collections<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<CollectionSummary>>, ApiError> {
    let collections = CatalogOperations::list_collections(state.store.as_ref())
        .await
        .map_err(error_response)?;
    Ok(Json(collections))
}

/// POST /collections/
/// Create an empty collection from a name
pub async fn create_empty_collection<S: Store>(
    State(state): State<AppState<S>>,
    JsonBody(input): JsonBody<CollectionInput>,
) -> Result<(StatusCode, Json<CollectionSummary>), ApiError> {
    let collection = CatalogOperations::create_collection(state.store.as_ref(), input)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(collection.into())))
}

/// PUT /collections/{id}/
pub async fn replace_collection<S: Store>(
    State(state): State<AppState<S>>,
    IdPath(id): IdPath<Id>,
    JsonBody(input): JsonBody<CollectionInput>,
) -> Result<Json<CollectionSummary>, ApiError> {
    let collection = CatalogOperations::rename_collection(state.store.as_ref(), id, input, false)
        .await
        .map_err(error_response)?;
    Ok(Json(collection.into()))
}

/// PATCH /collections/{id}/
pub async fn patch_collection<S: Store>(
    State(state): State<AppState<S>>,
    IdPath(id): IdPath<Id>,
    JsonBody(input): JsonBody<CollectionInput>,
) -> Result<Json<CollectionSummary>, ApiError> {
    let collection = CatalogOperations::rename_collection(state.store.as_ref(), id, input, true)
        .await
        .map_err(error_response)?;
    Ok(Json(collection.into()))
}
