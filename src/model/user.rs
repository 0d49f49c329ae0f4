use crate::model::Id;
use serde::{Deserialize, Serialize};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

const HASH_ALGORITHM: &str = "pbkdf2_sha256";
/// Iteration count for new hashes. Stored hashes carry their own count.
pub const PASSWORD_ITERATIONS: u32 = 600_000;
const DERIVED_KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // "pbkdf2_sha256$<iterations>$<salt>$<hex key>"
    pub date_joined: String,   // ISO 8601 timestamp
}

impl User {
    pub fn verify_password(&self, password: &str) -> bool {
        let mut parts = self.password_hash.splitn(4, '$');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(HASH_ALGORITHM), Some(iterations), Some(salt), Some(key)) => {
                match iterations.parse::<u32>() {
                    Ok(iterations) if iterations > 0 => {
                        derive_key(password, salt, iterations) == key
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

/// Input model for registering a user. Both fields are optional at the wire
/// level so that missing ones are reported with a readable message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// A user ready to be stored, with the password already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub date_joined: String,
}

impl NewUser {
    pub fn new(username: String, password: &str) -> Self {
        Self {
            username,
            password_hash: hash_password(password),
            date_joined: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// PBKDF2-HMAC-SHA256 of the password with a random salt
pub fn hash_password(password: &str) -> String {
    hash_password_with_iterations(password, PASSWORD_ITERATIONS)
}

pub fn hash_password_with_iterations(password: &str, iterations: u32) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    let key = derive_key(password, &salt, iterations);
    format!("{}${}${}${}", HASH_ALGORITHM, iterations, salt, key)
}

fn derive_key(password: &str, salt: &str, iterations: u32) -> String {
    let mut key = [0u8; DERIVED_KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    hex::encode(key)
}
