use crate::logic::error::{CatalogError, CatalogResult};
use crate::model::{
    CollectionDetail, CreateCollectionRequest, Id, MovieItem, MovieRef, UpdateCollectionRequest,
    MAX_COLLECTION_NAME_LENGTH,
};
use crate::store::traits::{CollectionStore, MovieStore};

/// Create/read/update/delete orchestration over collections and their movies.
///
/// Mutations are applied step by step without a surrounding transaction: when a
/// movie lookup fails halfway, everything written before it stays written.
pub struct CollectionWorkflow;

impl CollectionWorkflow {
    /// Create an unowned collection and add the listed movies to it.
    /// Returns the new collection id.
    pub async fn create<S>(store: &S, request: CreateCollectionRequest) -> CatalogResult<Id>
    where
        S: MovieStore + CollectionStore + ?Sized,
    {
        let name = match request.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(CatalogError::Validation(
                    "Collection name is required.".to_string(),
                ))
            }
        };
        validate_name_length(&name)?;

        let collection = store.create_collection(&name, None).await?;
        log::info!("Created collection {} ('{}')", collection.id, collection.name);

        Self::add_movies(store, collection.id, &request.movies).await?;

        Ok(collection.id)
    }

    pub async fn get<S>(store: &S, id: Id) -> CatalogResult<CollectionDetail>
    where
        S: MovieStore + CollectionStore + ?Sized,
    {
        let collection = store
            .get_collection(id)
            .await?
            .ok_or_else(CatalogError::collection_not_found)?;

        let movies = store
            .list_collection_movies(id)
            .await?
            .into_iter()
            .map(|movie| MovieRef {
                external_id: movie.external_id,
            })
            .collect();

        Ok(CollectionDetail {
            id: collection.id,
            name: collection.name,
            movies,
        })
    }

    /// Replace the membership of a collection and optionally rename it.
    ///
    /// The current membership is cleared before the replacement list is looked
    /// up. If a movie is missing the collection keeps whatever was re-added up to
    /// that point and the rename is not applied.
    pub async fn update<S>(store: &S, id: Id, request: UpdateCollectionRequest) -> CatalogResult<()>
    where
        S: MovieStore + CollectionStore + ?Sized,
    {
        store
            .get_collection(id)
            .await?
            .ok_or_else(CatalogError::collection_not_found)?;
        if let Some(name) = &request.name {
            validate_name_length(name)?;
        }

        store.clear_collection_movies(id).await?;
        Self::add_movies(store, id, &request.movies).await?;

        if let Some(name) = &request.name {
            store.rename_collection(id, name).await?;
        }
        log::info!("Updated collection {}", id);

        Ok(())
    }

    pub async fn delete<S>(store: &S, id: Id) -> CatalogResult<()>
    where
        S: MovieStore + CollectionStore + ?Sized,
    {
        if !store.delete_collection(id).await? {
            return Err(CatalogError::collection_not_found());
        }
        log::info!("Deleted collection {}", id);
        Ok(())
    }

    /// Add movies one at a time, stopping at the first unknown external id
    async fn add_movies<S>(store: &S, collection_id: Id, items: &[MovieItem]) -> CatalogResult<()>
    where
        S: MovieStore + CollectionStore + ?Sized,
    {
        for item in items {
            let movie = match item.lookup_key() {
                Some(external_id) => store.find_by_external_id(external_id).await?,
                None => None,
            };
            let Some(movie) = movie else {
                log::warn!(
                    "Collection {}: movie with external_id {} does not exist",
                    collection_id,
                    item.display_key()
                );
                return Err(CatalogError::unknown_external_id(&item.display_key()));
            };

            store.add_movie_to_collection(collection_id, movie.id).await?;
        }
        Ok(())
    }
}

pub(crate) fn validate_name_length(name: &str) -> CatalogResult<()> {
    if name.chars().count() > MAX_COLLECTION_NAME_LENGTH {
        return Err(CatalogError::Validation(format!(
            "Ensure the collection name has no more than {} characters.",
            MAX_COLLECTION_NAME_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExternalId, MovieRecord};
    use crate::store::MemoryStore;

    async fn store_with_movies(external_ids: &[ExternalId]) -> MemoryStore {
        let store = MemoryStore::new();
        for &external_id in external_ids {
            store
                .insert_movie(MovieRecord {
                    external_id,
                    title: format!("Movie {}", external_id),
                    description: "Test movie".to_string(),
                    genre: "Drama".to_string(),
                })
                .await
                .unwrap();
        }
        store
    }

    fn create_request(name: Option<&str>, external_ids: &[ExternalId]) -> CreateCollectionRequest {
        CreateCollectionRequest {
            name: name.map(str::to_string),
            movies: external_ids.iter().copied().map(MovieItem::new).collect(),
        }
    }

    fn member_ids(detail: &CollectionDetail) -> Vec<ExternalId> {
        detail.movies.iter().map(|m| m.external_id).collect()
    }

    #[tokio::test]
    async fn test_create_empty_collection() {
        let store = store_with_movies(&[]).await;

        let id = CollectionWorkflow::create(&store, create_request(Some("Watch later"), &[]))
            .await
            .unwrap();
        let detail = CollectionWorkflow::get(&store, id).await.unwrap();

        assert_eq!(detail.id, id);
        assert_eq!(detail.name, "Watch later");
        assert!(detail.movies.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_movies() {
        let store = store_with_movies(&[1, 2]).await;

        let id = CollectionWorkflow::create(&store, create_request(Some("Favorites"), &[1, 2, 1]))
            .await
            .unwrap();
        let detail = CollectionWorkflow::get(&store, id).await.unwrap();

        assert_eq!(detail.name, "Favorites");
        assert_eq!(member_ids(&detail), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let store = store_with_movies(&[]).await;

        for name in [None, Some(""), Some("   ")] {
            let err = CollectionWorkflow::create(&store, create_request(name, &[]))
                .await
                .unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }
        assert!(store.list_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_keeps_partial_state_on_unknown_movie() {
        let store = store_with_movies(&[1]).await;

        let err = CollectionWorkflow::create(&store, create_request(Some("Partial"), &[1, 404]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Movie with external_id 404 does not exist.");

        // The collection and the first movie were committed before the failure
        let collections = store.list_collections().await.unwrap();
        assert_eq!(collections.len(), 1);
        let detail = CollectionWorkflow::get(&store, collections[0].id).await.unwrap();
        assert_eq!(detail.name, "Partial");
        assert_eq!(member_ids(&detail), vec![1]);
    }

    #[tokio::test]
    async fn test_item_without_external_id_is_not_found() {
        let store = store_with_movies(&[1]).await;
        let request = CreateCollectionRequest {
            name: Some("Odd".to_string()),
            movies: vec![MovieItem::default()],
        };

        let err = CollectionWorkflow::create(&store, request).await.unwrap_err();
        assert_eq!(err.to_string(), "Movie with external_id null does not exist.");
    }

    #[tokio::test]
    async fn test_get_missing_collection() {
        let store = store_with_movies(&[]).await;
        let err = CollectionWorkflow::get(&store, 42).await.unwrap_err();
        assert_eq!(err.to_string(), "Collection not found.");
    }

    #[tokio::test]
    async fn test_update_replaces_name_and_membership() {
        let store = store_with_movies(&[1, 2, 3]).await;
        let id = CollectionWorkflow::create(&store, create_request(Some("Old"), &[1, 2]))
            .await
            .unwrap();

        let update = UpdateCollectionRequest {
            name: Some("New".to_string()),
            movies: vec![MovieItem::new(3)],
        };
        CollectionWorkflow::update(&store, id, update).await.unwrap();

        let detail = CollectionWorkflow::get(&store, id).await.unwrap();
        assert_eq!(detail.name, "New");
        assert_eq!(member_ids(&detail), vec![3]);
    }

    #[tokio::test]
    async fn test_update_without_movies_clears_membership() {
        let store = store_with_movies(&[1]).await;
        let id = CollectionWorkflow::create(&store, create_request(Some("Keep name"), &[1]))
            .await
            .unwrap();

        CollectionWorkflow::update(&store, id, UpdateCollectionRequest::default())
            .await
            .unwrap();

        let detail = CollectionWorkflow::get(&store, id).await.unwrap();
        assert_eq!(detail.name, "Keep name");
        assert!(detail.movies.is_empty());
    }

    #[tokio::test]
    async fn test_update_with_unknown_movie_leaves_membership_cleared() {
        let store = store_with_movies(&[1, 2]).await;
        let id = CollectionWorkflow::create(&store, create_request(Some("Before"), &[1, 2]))
            .await
            .unwrap();

        let update = UpdateCollectionRequest {
            name: Some("After".to_string()),
            movies: vec![MovieItem::new(999)],
        };
        let err = CollectionWorkflow::update(&store, id, update).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));

        // Membership was cleared and is not restored; the rename never happened
        let detail = CollectionWorkflow::get(&store, id).await.unwrap();
        assert!(detail.movies.is_empty());
        assert_eq!(detail.name, "Before");
    }

    #[tokio::test]
    async fn test_update_missing_collection() {
        let store = store_with_movies(&[]).await;
        let err = CollectionWorkflow::update(&store, 7, UpdateCollectionRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Collection not found.");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = store_with_movies(&[1]).await;
        let id = CollectionWorkflow::create(&store, create_request(Some("Temp"), &[1]))
            .await
            .unwrap();

        CollectionWorkflow::delete(&store, id).await.unwrap();

        assert!(matches!(
            CollectionWorkflow::get(&store, id).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            CollectionWorkflow::delete(&store, id).await,
            Err(CatalogError::NotFound(_))
        ));
        // Movies survive their collections
        assert!(store.find_by_external_id(1).await.unwrap().is_some());
    }
}
