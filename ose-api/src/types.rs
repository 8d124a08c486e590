//! Request and response bodies for the OSE backend.

use ose_core::{CharacterData, GeneratedCharacter};
use serde::{Deserialize, Serialize};

/// Response of `POST api/auth/token` and `POST api/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default, alias = "ttl")]
    pub expires_in: Option<i64>,
}

/// Body of `POST api/v1/characters/`.
///
/// The character's fields are flattened next to the owning ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCharacterRequest {
    #[serde(flatten)]
    pub character: GeneratedCharacter,
    pub user_id: i64,
    pub game_session_id: i64,
}

impl CreateCharacterRequest {
    pub fn new(character: GeneratedCharacter, user_id: i64, game_session_id: i64) -> Self {
        Self {
            character,
            user_id,
            game_session_id,
        }
    }
}

/// A character record as returned by the backend.
///
/// Only the fields the client validates are typed; the rest stay in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCharacter {
    pub id: i64,
    #[serde(flatten)]
    pub data: CharacterData,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Backend health, with defaults filled in for fields the server omits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: default_status(),
            version: default_version(),
        }
    }
}

fn default_status() -> String {
    "connected".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl HealthStatus {
    /// Read a health body leniently: anything that is not an object maps to
    /// the defaults, and null or non-string fields are replaced.
    pub fn from_body(body: &serde_json::Value) -> Self {
        let field = |name: &str| {
            body.get(name)
                .and_then(|value| value.as_str())
                .map(str::to_string)
        };
        Self {
            status: field("status").unwrap_or_else(default_status),
            version: field("version").unwrap_or_else(default_version),
        }
    }
}
