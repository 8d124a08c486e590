//! Client configuration.

use crate::ApiError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the OSE backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: None,
            password: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from the environment, reading `.env` first if present.
    ///
    /// - `OSE_API_URL` (default `http://localhost:8000`)
    /// - `OSE_API_USERNAME`, `OSE_API_PASSWORD`
    /// - `OSE_API_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout = match non_empty("OSE_API_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ApiError::Config(format!("OSE_API_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: non_empty("OSE_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            username: non_empty("OSE_API_USERNAME"),
            password: non_empty("OSE_API_PASSWORD"),
            timeout: Duration::from_secs(timeout),
        })
    }

    /// Username and password, or `NoCredentials` if either is unset.
    pub fn credentials(&self) -> Result<(&str, &str), ApiError> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok((username, password))
            }
            _ => Err(ApiError::NoCredentials),
        }
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }
}

/// Join a base URL and endpoint with exactly one slash between them.
fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:8000/", "/api/health"),
            "http://localhost:8000/api/health"
        );
        assert_eq!(
            join_url("http://localhost:8000", "api/health"),
            "http://localhost:8000/api/health"
        );
        assert_eq!(join_url("http://x//", "//health"), "http://x/health");
    }

    #[test]
    fn test_endpoint_url() {
        let config = ApiConfig::new("https://ose.example.org/");
        assert_eq!(
            config.endpoint_url("api/v1/characters/3"),
            "https://ose.example.org/api/v1/characters/3"
        );
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_lookup() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("OSE_API_URL", "https://ose.example.org"),
            ("OSE_API_USERNAME", "gm"),
            ("OSE_API_PASSWORD", "secret"),
            ("OSE_API_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://ose.example.org");
        assert_eq!(config.credentials().unwrap(), ("gm", "secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bad_timeout() {
        let result = ApiConfig::from_lookup(lookup_from(&[("OSE_API_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_missing_credentials() {
        let config = ApiConfig::default();
        assert!(matches!(config.credentials(), Err(ApiError::NoCredentials)));

        let config = ApiConfig::default().with_credentials("gm", "");
        assert!(matches!(config.credentials(), Err(ApiError::NoCredentials)));
    }
}
