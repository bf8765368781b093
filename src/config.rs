//! Client configuration.

use serde::Deserialize;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Collection and reference endpoints.
    #[serde(default)]
    pub endpoints: Endpoints,
}

/// Backend connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL every endpoint is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_studies")]
    pub studies: String,
    #[serde(default = "default_assays")]
    pub assays: String,
    #[serde(default = "default_programs")]
    pub programs: String,
    #[serde(default = "default_users")]
    pub users: String,
    #[serde(default = "default_assay_types")]
    pub assay_types: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn default_studies() -> String {
    "/api/study".to_string()
}

fn default_assays() -> String {
    "/api/assay".to_string()
}

fn default_programs() -> String {
    "/api/program".to_string()
}

fn default_users() -> String {
    "/api/user".to_string()
}

fn default_assay_types() -> String {
    "/api/assaytype".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            studies: default_studies(),
            assays: default_assays(),
            programs: default_programs(),
            users: default_users(),
            assay_types: default_assay_types(),
        }
    }
}

impl BackendConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `STUDY_FILTER_ENV`)
    /// 3. Environment variables with `STUDY_FILTER` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("STUDY_FILTER_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("STUDY_FILTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = serde_json::from_str(r#"{"backend": {"base_url": "http://lab:9000"}}"#).unwrap();
        assert_eq!(config.backend.base_url, "http://lab:9000");
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.endpoints.assay_types, "/api/assaytype");
    }
}
