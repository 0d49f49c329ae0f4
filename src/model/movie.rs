use crate::model::{ExternalId, Id};
use serde::{Deserialize, Serialize};

/// A catalog item mirrored locally from the external movie source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Id,
    pub external_id: ExternalId, // Unique across the catalog
    pub title: String,
    pub description: String,
    pub genre: String,
}

impl Movie {
    pub fn to_record(&self) -> MovieRecord {
        MovieRecord {
            external_id: self.external_id,
            title: self.title.clone(),
            description: self.description.clone(),
            genre: self.genre.clone(),
        }
    }
}

/// Public representation of a movie, without the store-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub external_id: ExternalId,
    pub title: String,
    pub description: String,
    pub genre: String,
}

impl From<Movie> for MovieRecord {
    fn from(movie: Movie) -> Self {
        Self {
            external_id: movie.external_id,
            title: movie.title,
            description: movie.description,
            genre: movie.genre,
        }
    }
}

/// Request body for movie writes. Every field is optional at the wire level so
/// that missing fields surface as validation errors instead of parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieInput {
    pub external_id: Option<ExternalId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
}

impl MovieInput {
    /// Full validation, used by create and full update.
    pub fn into_record(self) -> Result<MovieRecord, String> {
        let missing: Vec<&str> = [
            ("external_id", self.external_id.is_none()),
            ("title", self.title.is_none()),
            ("description", self.description.is_none()),
            ("genre", self.genre.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(format!("{}: This field is required.", missing.join(", ")));
        }

        let record = MovieRecord {
            external_id: self.external_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
        };
        record.check_lengths()?;
        Ok(record)
    }

    /// Partial update: only fields present in the input are replaced.
    pub fn apply_to(self, movie: &Movie) -> Result<Movie, String> {
        let updated = Movie {
            id: movie.id,
            external_id: self.external_id.unwrap_or(movie.external_id),
            title: self.title.unwrap_or_else(|| movie.title.clone()),
            description: self.description.unwrap_or_else(|| movie.description.clone()),
            genre: self.genre.unwrap_or_else(|| movie.genre.clone()),
        };
        updated.to_record().check_lengths()?;
        Ok(updated)
    }
}

pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_GENRE_LENGTH: usize = 100;

impl MovieRecord {
    fn check_lengths(&self) -> Result<(), String> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("genre", &self.genre),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{}: This field may not be blank.", field));
            }
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(format!(
                "title: Ensure this field has no more than {} characters.",
                MAX_TITLE_LENGTH
            ));
        }
        if self.genre.chars().count() > MAX_GENRE_LENGTH {
            return Err(format!(
                "genre: Ensure this field has no more than {} characters.",
                MAX_GENRE_LENGTH
            ));
        }
        Ok(())
    }
}
