use serde::{Deserialize, Serialize};

/// Store-assigned primary key.
pub type Id = i64;

/// Identifier of a movie in the third-party catalog.
pub type ExternalId = i64;

/// Confirmation body returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
