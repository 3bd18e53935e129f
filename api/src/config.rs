use crate::client::{ApiError, ApiResult};
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend connection settings, resolved once at startup and handed to
/// [`crate::ArenaApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), timeout: DEFAULT_TIMEOUT }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Ok(Self { base_url: normalize_base_url(base_url.into())?, timeout: DEFAULT_TIMEOUT })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the environment:
    /// - `ARENA_API_URL`: backend base URL (default `http://localhost:3333`)
    /// - `ARENA_API_TIMEOUT_SECS`: per-request timeout (default 10)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let base_url = lookup("ARENA_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let timeout = match lookup("ARENA_API_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ApiError::Config(format!("ARENA_API_TIMEOUT_SECS={raw:?}: {e}"))
                })?;
                Duration::from_secs(secs)
            }
            _ => DEFAULT_TIMEOUT,
        };

        Ok(Self::new(base_url)?.with_timeout(timeout))
    }

    pub fn collection_url(&self, path: &str) -> String {
        format!("{}/{path}/", self.base_url)
    }

    /// `{base}/{path}/{id}` with `id` percent-encoded as a single segment.
    pub fn item_url(&self, path: &str, id: &str) -> ApiResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("base URL {:?}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("base URL {:?} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(path)
            .push(id);
        Ok(url)
    }
}

fn normalize_base_url(raw: String) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::Config(format!("base URL must be http(s): {raw:?}")));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn env_overrides_and_trailing_slash_is_trimmed() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("ARENA_API_URL", "https://api.example.com/v1/"),
            ("ARENA_API_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.collection_url("referee"), "https://api.example.com/v1/referee/");
        assert_eq!(
            config.item_url("sports", "s1").unwrap().as_str(),
            "https://api.example.com/v1/sports/s1"
        );
    }

    #[test]
    fn item_ids_stay_one_path_segment() {
        let config = ApiConfig::default();
        assert_eq!(config.item_url("sports", "s1").unwrap().as_str(), "http://localhost:3333/sports/s1");
        let url = config.item_url("sports", "a/b?x=1").unwrap();
        assert_eq!(url.path(), "/sports/a%2Fb%3Fx=1");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn blank_url_falls_back_to_default() {
        let config = ApiConfig::from_lookup(lookup(&[("ARENA_API_URL", "  ")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn bad_values_are_config_errors() {
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[("ARENA_API_URL", "localhost:3333")])),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[("ARENA_API_TIMEOUT_SECS", "soon")])),
            Err(ApiError::Config(_))
        ));
    }
}
