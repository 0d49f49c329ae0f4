use crate::model::{Collection, ExternalId, Id, Movie, MovieRecord, NewUser, User};
use anyhow::Result;

/// A write collided with a unique constraint. Stores return it inside
/// `anyhow::Error`; callers check for it with `Error::is`.
#[derive(Debug, thiserror::Error)]
#[error("duplicate value for unique field `{field}`")]
pub struct UniqueViolation {
    pub field: &'static str,
}

/// Catalog of locally stored movies
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    async fn get_movie(&self, id: Id) -> Result<Option<Movie>>;
    /// Look up a movie by its third-party catalog id
    async fn find_by_external_id(&self, external_id: ExternalId) -> Result<Option<Movie>>;
    /// All movies, ordered by store id
    async fn list_movies(&self) -> Result<Vec<Movie>>;
    async fn insert_movie(&self, record: MovieRecord) -> Result<Movie>;
    /// Replace every field of an existing movie. Returns false if it does not exist.
    async fn update_movie(&self, movie: Movie) -> Result<bool>;
    /// Delete a movie together with its collection memberships
    async fn delete_movie(&self, id: Id) -> Result<bool>;
}

/// Collections and their membership links to movies
#[async_trait::async_trait]
pub trait CollectionStore: Send + Sync {
    async fn get_collection(&self, id: Id) -> Result<Option<Collection>>;
    /// All collections, ordered by store id
    async fn list_collections(&self) -> Result<Vec<Collection>>;
    async fn create_collection(&self, name: &str, owner: Option<Id>) -> Result<Collection>;
    async fn rename_collection(&self, id: Id, name: &str) -> Result<bool>;
    /// Delete a collection; its membership links go with it
    async fn delete_collection(&self, id: Id) -> Result<bool>;
    /// Add a movie to a collection. Adding an existing member is a no-op.
    async fn add_movie_to_collection(&self, collection_id: Id, movie_id: Id) -> Result<()>;
    async fn clear_collection_movies(&self, collection_id: Id) -> Result<()>;
    /// Member movies, ordered by store id
    async fn list_collection_movies(&self, collection_id: Id) -> Result<Vec<Movie>>;
}

/// Registered user identities
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: NewUser) -> Result<User>;
}

pub trait Store: MovieStore + CollectionStore + UserStore + Send + Sync {}
