use crate::model::{ExternalId, Id};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_COLLECTION_NAME_LENGTH: usize = 255;

/// A named, optionally owned set of movies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: Id,
    pub name: String,
    pub owner: Option<Id>, // None for collections created without a user
}

/// Reference to a member movie, by catalog id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRef {
    pub external_id: ExternalId,
}

/// Full view of a collection including its membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDetail {
    pub id: Id,
    pub name: String,
    pub movies: Vec<MovieRef>,
}

/// Summary representation used by the generic collection endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub name: String,
}

impl From<Collection> for CollectionSummary {
    fn from(collection: Collection) -> Self {
        Self {
            name: collection.name,
        }
    }
}

/// One entry of the `movies` array in collection write requests.
///
/// The id is kept as raw JSON: numeric strings are accepted the same way as
/// numbers, anything else is reported back verbatim as an unknown movie.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieItem {
    #[serde(default)]
    pub external_id: Option<Value>,
}

impl MovieItem {
    pub fn new(external_id: ExternalId) -> Self {
        Self {
            external_id: Some(Value::from(external_id)),
        }
    }

    /// The lookup key, if the item carries a usable integer id
    pub fn lookup_key(&self) -> Option<ExternalId> {
        match self.external_id.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Rendering of the requested id for error messages
    pub fn display_key(&self) -> String {
        match &self.external_id {
            None | Some(Value::Null) => "null".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub movies: Vec<MovieItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCollectionRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub movies: Vec<MovieItem>,
}

/// Body of the generic collection create/update endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionInput {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionCreatedResponse {
    pub message: String,
    pub collection_id: Id,
}
