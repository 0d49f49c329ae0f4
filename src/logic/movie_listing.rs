use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::external::MovieSource;
use crate::logic::error::{CatalogError, CatalogResult};
use crate::model::MovieRecord;
use crate::store::traits::MovieStore;

/// Upstream results and local movies, side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieListing {
    pub api_movies: Vec<Value>,
    pub db_movies: Vec<MovieRecord>,
}

/// Fetch the external catalog and read the local one.
///
/// An unreachable upstream or an empty upstream result fails the whole call;
/// local movies are never returned on their own. The two lists are not merged,
/// so a movie present in both shows up twice.
pub async fn list_movies<M>(source: &dyn MovieSource, store: &M) -> CatalogResult<MovieListing>
where
    M: MovieStore + ?Sized,
{
    let api_movies = match source.fetch_movies().await {
        Some(movies) if !movies.is_empty() => movies,
        _ => return Err(CatalogError::UpstreamUnavailable),
    };
    log::debug!("Movies fetched from API: {}", api_movies.len());

    let db_movies = store
        .list_movies()
        .await?
        .into_iter()
        .map(MovieRecord::from)
        .collect();

    Ok(MovieListing {
        api_movies,
        db_movies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    struct FixedSource(Option<Vec<Value>>);

    #[async_trait::async_trait]
    impl MovieSource for FixedSource {
        async fn fetch_movies(&self) -> Option<Vec<Value>> {
            self.0.clone()
        }
    }

    async fn store_with_movie() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_movie(MovieRecord {
                external_id: 1,
                title: "Heat".to_string(),
                description: "Crime".to_string(),
                genre: "Thriller".to_string(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_lists_both_sources_without_dedup() {
        let store = store_with_movie().await;
        let source = FixedSource(Some(vec![json!({"external_id": 1, "title": "Heat"})]));

        let listing = list_movies(&source, &store).await.unwrap();
        assert_eq!(listing.api_movies.len(), 1);
        assert_eq!(listing.db_movies.len(), 1);
        assert_eq!(listing.db_movies[0].external_id, 1);
    }

    #[tokio::test]
    async fn test_absent_upstream_fails() {
        let store = store_with_movie().await;
        let err = list_movies(&FixedSource(None), &store).await.unwrap_err();
        assert!(matches!(err, CatalogError::UpstreamUnavailable));
    }

    #[tokio::test]
    async fn test_empty_upstream_fails() {
        let store = store_with_movie().await;
        let err = list_movies(&FixedSource(Some(vec![])), &store).await.unwrap_err();
        assert!(matches!(err, CatalogError::UpstreamUnavailable));
    }
}
