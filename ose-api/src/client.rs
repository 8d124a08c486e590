//! The backend client.

use crate::config::ApiConfig;
use crate::token::{unix_now, TokenClaims};
use crate::types::{
    CreateCharacterRequest, HealthStatus, StoredCharacter, TokenResponse, UserProfile,
};
use crate::ApiError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

const CHARACTERS: &str = "api/v1/characters/";

/// Health endpoints, tried in order until one answers.
const HEALTH_ENDPOINTS: [&str; 3] = ["health", "api/v1/health", "api/health"];

/// OSE backend client.
///
/// Holds the bearer token from the last successful login or refresh.
#[derive(Debug, Clone)]
pub struct OseClient {
    client: reqwest::Client,
    config: ApiConfig,
    token: Option<String>,
}

impl OseClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            token: None,
        })
    }

    /// Create a client from `OSE_API_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ApiConfig::from_env()?)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Claims of the stored token.
    pub fn claims(&self) -> Result<TokenClaims, ApiError> {
        TokenClaims::decode(self.token.as_deref().ok_or(ApiError::NoToken)?)
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Exchange credentials for an access token and store it.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let form = [
            ("username", username),
            ("password", password),
            ("grant_type", "password"),
        ];
        let request = self
            .request(Method::POST, "api/auth/token")?
            .form(&form);
        let response: TokenResponse = self.execute(request, "api/auth/token").await?;

        let lifetime = TokenClaims::decode(&response.access_token)
            .map(|claims| claims.cookie_lifetime(unix_now()))
            .ok();
        debug!(username, lifetime_secs = ?lifetime, "logged in");
        self.token = Some(response.access_token.clone());
        Ok(response)
    }

    /// Log in with the configured credentials.
    pub async fn authenticate(&mut self) -> Result<TokenResponse, ApiError> {
        let (username, password) = self.config.credentials()?;
        let (username, password) = (username.to_string(), password.to_string());
        self.login(&username, &password).await
    }

    /// Claims of a usable token, logging in again when the stored one is
    /// missing, unreadable or expired.
    pub async fn ensure_authenticated(&mut self) -> Result<TokenClaims, ApiError> {
        match self.claims() {
            Ok(claims) if !claims.is_expired() => return Ok(claims),
            Ok(_) => debug!("stored token expired"),
            Err(ApiError::NoToken) => {}
            Err(e) => debug!(error = %e, "stored token unreadable"),
        }
        self.authenticate().await?;
        self.claims()
    }

    /// Swap the stored token for a fresh one.
    pub async fn refresh(&mut self, username: &str) -> Result<TokenResponse, ApiError> {
        if self.token.is_none() {
            return Err(ApiError::NoToken);
        }
        let request = self
            .request(Method::POST, "api/auth/refresh")?
            .json(&serde_json::json!({ "username": username }));
        let response: TokenResponse = self.execute(request, "api/auth/refresh").await?;

        self.token = Some(response.access_token.clone());
        Ok(response)
    }

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.get("api/auth/me").await
    }

    // ========================================================================
    // Characters
    // ========================================================================

    pub async fn list_characters(&self) -> Result<Vec<StoredCharacter>, ApiError> {
        self.get(CHARACTERS).await
    }

    pub async fn get_character(&self, id: i64) -> Result<StoredCharacter, ApiError> {
        self.get(&format!("{CHARACTERS}{id}")).await
    }

    pub async fn create_character(
        &self,
        character: &CreateCharacterRequest,
    ) -> Result<StoredCharacter, ApiError> {
        self.send_json(Method::POST, CHARACTERS, character).await
    }

    pub async fn update_character(
        &self,
        id: i64,
        changes: &serde_json::Value,
    ) -> Result<StoredCharacter, ApiError> {
        self.send_json(Method::PUT, &format!("{CHARACTERS}{id}"), changes)
            .await
    }

    pub async fn delete_character(&self, id: i64) -> Result<(), ApiError> {
        let endpoint = format!("{CHARACTERS}{id}");
        let request = self.request(Method::DELETE, &endpoint)?;
        self.execute::<serde_json::Value>(request, &endpoint).await?;
        Ok(())
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Try the health endpoints in order and return the first answer.
    ///
    /// Returns the last error if none of them respond successfully.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let mut last_error = None;
        for endpoint in HEALTH_ENDPOINTS {
            let request = self.request(Method::GET, endpoint)?;
            match self.execute::<serde_json::Value>(request, endpoint).await {
                Ok(body) => return Ok(HealthStatus::from_body(&body)),
                Err(e) => {
                    debug!(endpoint, error = %e, "health check failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| ApiError::Network("no health endpoint".to_string())))
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, endpoint)?;
        self.execute(request, endpoint).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(method, endpoint)?.json(body);
        self.execute(request, endpoint).await
    }

    fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.config.endpoint_url(endpoint);
        debug!(%method, %url, "request");
        Ok(self.client.request(method, url).headers(self.build_headers()?))
    }

    fn build_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| ApiError::InvalidToken(format!("not a valid header: {e}")))?,
            );
        }
        Ok(headers)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = error_detail(&body);
            warn!(endpoint, status = status.as_u16(), %message, "backend error");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(endpoint, status = status.as_u16(), bytes = body.len(), "response");

        // Empty success bodies (204, bare DELETE) read as JSON null
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// The `detail` field of an error body, or `"Unknown error"`.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("detail")? {
            serde_json::Value::String(detail) => Some(detail.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}
