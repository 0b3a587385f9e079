//! Client configuration loaded from the environment.
//!
//! Values come from process environment variables, with a `.env` file in the
//! working directory loaded first when present.

use std::path::PathBuf;

/// Default tracker address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the tracker (`ISSUESYNC_URL`).
    pub base_url: String,
    /// Authentication token (`ISSUESYNC_TOKEN`).
    pub token: Option<String>,
    /// Cassette file to record tracker traffic into (`ISSUESYNC_RECORD`).
    pub record_path: Option<PathBuf>,
    /// Cassette file to replay tracker traffic from (`ISSUESYNC_REPLAY`).
    pub replay_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), token: None, record_path: None, replay_path: None }
    }
}

impl ClientConfig {
    /// Loads `.env` (if any) and reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error string if the configuration is inconsistent.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is the common case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error string if both recording and replaying are requested
    /// or the base URL is not an http(s) URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let base_url = get("ISSUESYNC_URL")
            .map_or_else(|| DEFAULT_BASE_URL.to_string(), |url| url.trim_end_matches('/').to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(format!("ISSUESYNC_URL must be an http(s) URL, got {base_url}"));
        }

        let config = Self {
            base_url,
            token: get("ISSUESYNC_TOKEN"),
            record_path: get("ISSUESYNC_RECORD").map(PathBuf::from),
            replay_path: get("ISSUESYNC_REPLAY").map(PathBuf::from),
        };

        if config.record_path.is_some() && config.replay_path.is_some() {
            return Err("ISSUESYNC_RECORD and ISSUESYNC_REPLAY cannot be set together".to_string());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ISSUESYNC_URL", "https://sonar.example.com/"),
            ("ISSUESYNC_TOKEN", "squ_123"),
            ("ISSUESYNC_RECORD", "/tmp/out.cassette.yaml"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://sonar.example.com");
        assert_eq!(config.token.as_deref(), Some("squ_123"));
        assert_eq!(config.record_path, Some(PathBuf::from("/tmp/out.cassette.yaml")));
        assert!(config.replay_path.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = ClientConfig::from_lookup(lookup(&[("ISSUESYNC_TOKEN", "  ")])).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn rejects_record_and_replay_together() {
        let result = ClientConfig::from_lookup(lookup(&[
            ("ISSUESYNC_RECORD", "a.yaml"),
            ("ISSUESYNC_REPLAY", "b.yaml"),
        ]));
        assert!(result.unwrap_err().contains("cannot be set together"));
    }

    #[test]
    fn rejects_non_http_url() {
        let result = ClientConfig::from_lookup(lookup(&[("ISSUESYNC_URL", "ftp://tracker")]));
        assert!(result.is_err());
    }
}
