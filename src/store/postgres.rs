use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};

use crate::model::{Collection, ExternalId, Id, Movie, MovieRecord, NewUser, User};
use crate::store::traits::{CollectionStore, MovieStore, Store, UniqueViolation, UserStore};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

/// PostgreSQL `unique_violation`
const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Surface a unique constraint hit as `UniqueViolation`, anything else with context
fn unique_or_context(err: sqlx::Error, field: &'static str, context: &'static str) -> anyhow::Error {
    let is_unique = err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .map_or(false, |code| code == UNIQUE_VIOLATION_CODE);

    if is_unique {
        UniqueViolation { field }.into()
    } else {
        anyhow::Error::new(err).context(context)
    }
}

fn movie_from_row(row: &PgRow) -> Movie {
    Movie {
        id: row.get("id"),
        external_id: row.get("external_id"),
        title: row.get("title"),
        description: row.get("description"),
        genre: row.get("genre"),
    }
}

fn collection_from_row(row: &PgRow) -> Collection {
    Collection {
        id: row.get("id"),
        name: row.get("name"),
        owner: row.get("owner_id"),
    }
}

#[async_trait::async_trait]
impl MovieStore for PostgresStore {
    async fn get_movie(&self, id: Id) -> Result<Option<Movie>> {
        let row = sqlx::query("SELECT id, external_id, title, description, genre FROM movies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch movie")?;

        Ok(row.as_ref().map(movie_from_row))
    }

    async fn find_by_external_id(&self, external_id: ExternalId) -> Result<Option<Movie>> {
        let row = sqlx::query(
            "SELECT id, external_id, title, description, genre FROM movies WHERE external_id = $1",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch movie by external id")?;

        Ok(row.as_ref().map(movie_from_row))
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        let rows = sqlx::query("SELECT id, external_id, title, description, genre FROM movies ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list movies")?;

        Ok(rows.iter().map(movie_from_row).collect())
    }

    async fn insert_movie(&self, record: MovieRecord) -> Result<Movie> {
        let row = sqlx::query(
            r#"
            INSERT INTO movies (external_id, title, description, genre)
            VALUES ($1, $2, $3, $4)
            RETURNING id, external_id, title, description, genre
            "#,
        )
        .bind(record.external_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.genre)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_or_context(e, "external_id", "Failed to insert movie"))?;

        Ok(movie_from_row(&row))
    }

    async fn update_movie(&self, movie: Movie) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET external_id = $2, title = $3, description = $4, genre = $5
            WHERE id = $1
            "#,
        )
        .bind(movie.id)
        .bind(movie.external_id)
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(&movie.genre)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or_context(e, "external_id", "Failed to update movie"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_movie(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete movie")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl CollectionStore for PostgresStore {
    async fn get_collection(&self, id: Id) -> Result<Option<Collection>> {
        let row = sqlx::query("SELECT id, name, owner_id FROM collections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch collection")?;

        Ok(row.as_ref().map(collection_from_row))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let rows = sqlx::query("SELECT id, name, owner_id FROM collections ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list collections")?;

        Ok(rows.iter().map(collection_from_row).collect())
    }

    async fn create_collection(&self, name: &str, owner: Option<Id>) -> Result<Collection> {
        let row = sqlx::query(
            "INSERT INTO collections (name, owner_id) VALUES ($1, $2) RETURNING id, name, owner_id",
        )
        .bind(name)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create collection")?;

        Ok(collection_from_row(&row))
    }

    async fn rename_collection(&self, id: Id, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE collections SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
            .context("Failed to rename collection")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_collection(&self, id: Id) -> Result<bool> {
        // collection_movies rows are removed by ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete collection")?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_movie_to_collection(&self, collection_id: Id, movie_id: Id) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO collection_movies (collection_id, movie_id)
            VALUES ($1, $2)
            ON CONFLICT (collection_id, movie_id) DO NOTHING
            "#,
        )
        .bind(collection_id)
        .bind(movie_id)
        .execute(&self.pool)
        .await
        .context("Failed to add movie to collection")?;

        Ok(())
    }

    async fn clear_collection_movies(&self, collection_id: Id) -> Result<()> {
        sqlx::query("DELETE FROM collection_movies WHERE collection_id = $1")
            .bind(collection_id)
            .execute(&self.pool)
            .await
            .context("Failed to clear collection movies")?;

        Ok(())
    }

    async fn list_collection_movies(&self, collection_id: Id) -> Result<Vec<Movie>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.external_id, m.title, m.description, m.genre
            FROM movies m
            JOIN collection_movies cm ON cm.movie_id = m.id
            WHERE cm.collection_id = $1
            ORDER BY m.id
            "#,
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list collection movies")?;

        Ok(rows.iter().map(movie_from_row).collect())
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, password_hash, date_joined FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            date_joined: row.get("date_joined"),
        }))
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, date_joined)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.date_joined)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_or_context(e, "username", "Failed to create user"))?;

        Ok(User {
            id: row.get("id"),
            username: user.username,
            password_hash: user.password_hash,
            date_joined: user.date_joined,
        })
    }
}

impl Store for PostgresStore {}
