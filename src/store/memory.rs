use anyhow::{bail, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Collection, ExternalId, Id, Movie, MovieRecord, NewUser, User};
use crate::store::traits::{CollectionStore, MovieStore, Store, UniqueViolation, UserStore};

#[derive(Debug, Default)]
struct MemoryState {
    movies: BTreeMap<Id, Movie>,
    collections: BTreeMap<Id, Collection>,
    /// (collection_id, movie_id) membership links
    memberships: BTreeSet<(Id, Id)>,
    users: BTreeMap<Id, User>,
    next_movie_id: Id,
    next_collection_id: Id,
    next_user_id: Id,
}

fn next_id(counter: &mut Id) -> Id {
    *counter += 1;
    *counter
}

/// Process-local store with the same semantics as the PostgreSQL schema:
/// unique external ids and usernames, cascading membership removal.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MovieStore for MemoryStore {
    async fn get_movie(&self, id: Id) -> Result<Option<Movie>> {
        Ok(self.state.read().movies.get(&id).cloned())
    }

    async fn find_by_external_id(&self, external_id: ExternalId) -> Result<Option<Movie>> {
        let state = self.state.read();
        Ok(state
            .movies
            .values()
            .find(|movie| movie.external_id == external_id)
            .cloned())
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        Ok(self.state.read().movies.values().cloned().collect())
    }

    async fn insert_movie(&self, record: MovieRecord) -> Result<Movie> {
        let mut state = self.state.write();
        if state.movies.values().any(|m| m.external_id == record.external_id) {
            return Err(UniqueViolation { field: "external_id" }.into());
        }

        let id = next_id(&mut state.next_movie_id);
        let movie = Movie {
            id,
            external_id: record.external_id,
            title: record.title,
            description: record.description,
            genre: record.genre,
        };
        state.movies.insert(id, movie.clone());
        Ok(movie)
    }

    async fn update_movie(&self, movie: Movie) -> Result<bool> {
        let mut state = self.state.write();
        if !state.movies.contains_key(&movie.id) {
            return Ok(false);
        }
        if state
            .movies
            .values()
            .any(|m| m.id != movie.id && m.external_id == movie.external_id)
        {
            return Err(UniqueViolation { field: "external_id" }.into());
        }

        state.movies.insert(movie.id, movie);
        Ok(true)
    }

    async fn delete_movie(&self, id: Id) -> Result<bool> {
        let mut state = self.state.write();
        if state.movies.remove(&id).is_none() {
            return Ok(false);
        }
        state.memberships.retain(|(_, movie_id)| *movie_id != id);
        Ok(true)
    }
}

#[async_trait::async_trait]
impl CollectionStore for MemoryStore {
    async fn get_collection(&self, id: Id) -> Result<Option<Collection>> {
        Ok(self.state.read().collections.get(&id).cloned())
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.state.read().collections.values().cloned().collect())
    }

    async fn create_collection(&self, name: &str, owner: Option<Id>) -> Result<Collection> {
        let mut state = self.state.write();
        if let Some(owner_id) = owner {
            if !state.users.contains_key(&owner_id) {
                bail!("User {} does not exist", owner_id);
            }
        }

        let id = next_id(&mut state.next_collection_id);
        let collection = Collection {
            id,
            name: name.to_string(),
            owner,
        };
        state.collections.insert(id, collection.clone());
        Ok(collection)
    }

    async fn rename_collection(&self, id: Id, name: &str) -> Result<bool> {
        let mut state = self.state.write();
        match state.collections.get_mut(&id) {
            Some(collection) => {
                collection.name = name.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_collection(&self, id: Id) -> Result<bool> {
        let mut state = self.state.write();
        if state.collections.remove(&id).is_none() {
            return Ok(false);
        }
        state.memberships.retain(|(collection_id, _)| *collection_id != id);
        Ok(true)
    }

    async fn add_movie_to_collection(&self, collection_id: Id, movie_id: Id) -> Result<()> {
        let mut state = self.state.write();
        if !state.collections.contains_key(&collection_id) {
            bail!("Collection {} does not exist", collection_id);
        }
        if !state.movies.contains_key(&movie_id) {
            bail!("Movie {} does not exist", movie_id);
        }
        state.memberships.insert((collection_id, movie_id));
        Ok(())
    }

    async fn clear_collection_movies(&self, collection_id: Id) -> Result<()> {
        self.state
            .write()
            .memberships
            .retain(|(id, _)| *id != collection_id);
        Ok(())
    }

    async fn list_collection_movies(&self, collection_id: Id) -> Result<Vec<Movie>> {
        let state = self.state.read();
        let mut movies: Vec<Movie> = state
            .memberships
            .range((collection_id, Id::MIN)..=(collection_id, Id::MAX))
            .filter_map(|(_, movie_id)| state.movies.get(movie_id).cloned())
            .collect();
        movies.sort_by_key(|movie| movie.id);
        Ok(movies)
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.read();
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut state = self.state.write();
        if state.users.values().any(|u| u.username == user.username) {
            return Err(UniqueViolation { field: "username" }.into());
        }

        let id = next_id(&mut state.next_user_id);
        let user = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            date_joined: user.date_joined,
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }
}

impl Store for MemoryStore {}
