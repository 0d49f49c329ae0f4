use crate::logic::collection_workflow::validate_name_length;
use crate::logic::error::{CatalogError, CatalogResult};
use crate::model::{
    Collection, CollectionInput, CollectionSummary, Id, Movie, MovieInput, MovieRecord,
};
use crate::store::traits::{CollectionStore, MovieStore, UniqueViolation};

const DUPLICATE_EXTERNAL_ID: &str = "external_id: movie with this external id already exists.";

/// Plain record-level CRUD over movies and collections, without membership handling
pub struct CatalogOperations;

impl CatalogOperations {
    pub async fn get_movie<S: MovieStore + ?Sized>(store: &S, id: Id) -> CatalogResult<Movie> {
        store
            .get_movie(id)
            .await?
            .ok_or_else(CatalogError::movie_not_found)
    }

    pub async fn create_movie<S: MovieStore + ?Sized>(
        store: &S,
        input: MovieInput,
    ) -> CatalogResult<Movie> {
        let record = input.into_record().map_err(CatalogError::Validation)?;
        ensure_external_id_free(store, &record, None).await?;

        let movie = store
            .insert_movie(record)
            .await
            .map_err(duplicate_external_id)?;
        log::info!("Created movie {} (external_id {})", movie.id, movie.external_id);
        Ok(movie)
    }

    /// Replace a movie. With `partial` only the fields present in the input change.
    pub async fn update_movie<S: MovieStore + ?Sized>(
        store: &S,
        id: Id,
        input: MovieInput,
        partial: bool,
    ) -> CatalogResult<Movie> {
        let existing = Self::get_movie(store, id).await?;

        let updated = if partial {
            input.apply_to(&existing)
        } else {
            input.into_record().map(|record| Movie {
                id,
                external_id: record.external_id,
                title: record.title,
                description: record.description,
                genre: record.genre,
            })
        };
        let updated = updated.map_err(CatalogError::Validation)?;
        ensure_external_id_free(store, &updated.to_record(), Some(id)).await?;

        if !store
            .update_movie(updated.clone())
            .await
            .map_err(duplicate_external_id)?
        {
            return Err(CatalogError::movie_not_found());
        }
        Ok(updated)
    }

    pub async fn delete_movie<S: MovieStore + ?Sized>(store: &S, id: Id) -> CatalogResult<()> {
        if !store.delete_movie(id).await? {
            return Err(CatalogError::movie_not_found());
        }
        log::info!("Deleted movie {}", id);
        Ok(())
    }

    pub async fn list_collections<S: CollectionStore + ?Sized>(
        store: &S,
    ) -> CatalogResult<Vec<CollectionSummary>> {
        Ok(store
            .list_collections()
            .await?
            .into_iter()
            .map(CollectionSummary::from)
            .collect())
    }

    /// Create an empty, unowned collection from its name alone
    pub async fn create_collection<S: CollectionStore + ?Sized>(
        store: &S,
        input: CollectionInput,
    ) -> CatalogResult<Collection> {
        let name = required_name(input)?;
        Ok(store.create_collection(&name, None).await?)
    }

    /// Rename a collection. Membership is left untouched.
    pub async fn rename_collection<S: CollectionStore + ?Sized>(
        store: &S,
        id: Id,
        input: CollectionInput,
        partial: bool,
    ) -> CatalogResult<Collection> {
        let mut collection = store
            .get_collection(id)
            .await?
            .ok_or_else(CatalogError::collection_not_found)?;

        if partial && input.name.is_none() {
            return Ok(collection);
        }
        let name = required_name(input)?;
        if !store.rename_collection(id, &name).await? {
            return Err(CatalogError::collection_not_found());
        }
        collection.name = name;
        Ok(collection)
    }
}

fn required_name(input: CollectionInput) -> CatalogResult<String> {
    match input.name {
        Some(name) if !name.trim().is_empty() => {
            validate_name_length(&name)?;
            Ok(name)
        }
        Some(_) => Err(CatalogError::Validation(
            "name: This field may not be blank.".to_string(),
        )),
        None => Err(CatalogError::Validation(
            "name: This field is required.".to_string(),
        )),
    }
}

/// Reject a write that would give two movies the same external id
async fn ensure_external_id_free<S: MovieStore + ?Sized>(
    store: &S,
    record: &MovieRecord,
    current: Option<Id>,
) -> CatalogResult<()> {
    match store.find_by_external_id(record.external_id).await? {
        Some(other) if Some(other.id) != current => {
            Err(CatalogError::Validation(DUPLICATE_EXTERNAL_ID.to_string()))
        }
        _ => Ok(()),
    }
}

/// A concurrent writer can take the external id between the check and the write
fn duplicate_external_id(err: anyhow::Error) -> CatalogError {
    if err.is::<UniqueViolation>() {
        CatalogError::Validation(DUPLICATE_EXTERNAL_ID.to_string())
    } else {
        CatalogError::Internal(err)
    }
}
