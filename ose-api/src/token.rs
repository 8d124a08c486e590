//! JWT access-token claims.
//!
//! The client only reads claims; signatures are checked by the backend.

use crate::ApiError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifetime used when a token carries no usable expiry.
pub const DEFAULT_COOKIE_LIFETIME_SECS: i64 = 86_400;

/// Claims read from an access token payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
    /// Some backends emit the id as a string.
    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT, with or without a `Bearer ` prefix.
    pub fn decode(token: &str) -> Result<Self, ApiError> {
        let token = strip_bearer(token);
        let segments: Vec<&str> = token.split('.').collect();
        let [_, payload, _] = segments.as_slice() else {
            return Err(ApiError::InvalidToken(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| ApiError::InvalidToken(format!("payload is not base64url: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidToken(format!("payload is not JSON: {e}")))
    }

    /// Missing expiry counts as expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.map_or(true, |exp| exp < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }

    /// Seconds until expiry, or a day when that is not positive.
    pub fn cookie_lifetime(&self, now: i64) -> i64 {
        match self.exp {
            Some(exp) if exp - now > 0 => exp - now,
            _ => DEFAULT_COOKIE_LIFETIME_SECS,
        }
    }
}

pub fn strip_bearer(token: &str) -> &str {
    let token = token.trim();
    token.strip_prefix("Bearer ").unwrap_or(token)
}

pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(id)) => Some(id),
        Some(RawId::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}
