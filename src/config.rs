use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable consulted when no API key is passed explicitly
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Upper bound the comment listing endpoint accepts for `maxResults`
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configuration for the comment harvester
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API settings
    pub api: ApiConfig,

    /// Pagination and filtering settings
    pub scrape: ScrapeConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the YouTube Data API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Comments requested per page (capped at 100)
    pub page_size: u32,

    /// Video ids starting with this prefix are unfilled template values
    pub placeholder_prefix: String,

    /// Retry behaviour for failed page requests
    pub retry: RetryPolicy,
}

/// Bounded retry with exponential backoff around a single page request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure (0 = never retry)
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds, doubled on each attempt
    pub backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the CSV file
    pub output_dir: PathBuf,

    /// CSV file name inside `output_dir`
    pub file_name: String,

    /// Write the `video_title` column
    pub include_video_title: bool,

    /// Log level used when RUST_LOG is unset
    pub log_level: String,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_ms: 0,
        }
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> std::time::Duration {
        let factor = 1u64 << attempt.min(16);
        std::time::Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_ms: 500,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_seconds: 30,
            user_agent: concat!("comment-harvest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            placeholder_prefix: "YOUR_".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data/raw"),
            file_name: "comments.csv".to_string(),
            include_video_title: true,
            log_level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            scrape: ScrapeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, falling back to defaults.
    /// Environment overrides are applied on top in both cases.
    pub fn load() -> Result<Self, ConfigError> {
        let config_paths = ["comment-harvest.toml", "config/comment-harvest.toml"];

        for path in &config_paths {
            let path = Path::new(path);
            if path.exists() {
                let config = Self::from_file(path)?;
                tracing::info!("📄 Loaded configuration from: {}", path.display());
                return Ok(config.with_env_overrides());
            }
        }

        Ok(Self::default().with_env_overrides())
    }

    /// Load configuration from an explicit TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `COMMENT_HARVEST_*` environment variables
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(output_dir) = std::env::var("COMMENT_HARVEST_OUTPUT_DIR") {
            self.output.output_dir = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("COMMENT_HARVEST_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        if let Ok(base_url) = std::env::var("COMMENT_HARVEST_API_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(retries) = std::env::var("COMMENT_HARVEST_MAX_RETRIES") {
            match retries.parse() {
                Ok(n) => self.scrape.retry.max_retries = n,
                Err(_) => tracing::warn!("Ignoring invalid COMMENT_HARVEST_MAX_RETRIES: {}", retries),
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scrape.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be greater than 0".into()));
        }

        if self.scrape.placeholder_prefix.is_empty() {
            return Err(ConfigError::Invalid("placeholder_prefix must not be empty".into()));
        }

        if self.output.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid("output file_name must not be empty".into()));
        }

        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api base_url must not be empty".into()));
        }

        Ok(())
    }

    /// Full path of the CSV output file
    pub fn output_path(&self) -> PathBuf {
        self.output.output_dir.join(&self.output.file_name)
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Comment Harvest Configuration:\n\
            - API: {}\n\
            - Page size: {}\n\
            - Max retries: {}\n\
            - Output: {}",
            self.api.base_url,
            self.scrape.page_size.min(MAX_PAGE_SIZE),
            self.scrape.retry.max_retries,
            self.output_path().display(),
        )
    }
}

/// Opaque API key, resolved once at startup
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Explicit value first, then the `YOUTUBE_API_KEY` environment variable.
    pub fn resolve(explicit: Option<String>) -> Result<Self, ConfigError> {
        Self::resolve_with(explicit, |name| std::env::var(name).ok())
    }

    /// Same as [`resolve`](Self::resolve) with an injectable environment lookup
    pub fn resolve_with<F>(explicit: Option<String>, env_lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        explicit
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env_lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty()))
            .map(|key| Self(key.trim().to_string()))
            .ok_or(ConfigError::MissingCredential { env_var: API_KEY_ENV })
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.api.base_url = base_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.config.scrape.page_size = page_size;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.config.scrape.retry = retry;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.output_dir = dir;
        self
    }

    pub fn include_video_title(mut self, include: bool) -> Self {
        self.config.output.include_video_title = include;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scrape.page_size, 100);
        assert_eq!(config.scrape.placeholder_prefix, "YOUR_");
        assert_eq!(config.output_path(), PathBuf::from("data/raw/comments.csv"));
        assert!(config.output.include_video_title);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_base_url("http://127.0.0.1:1234")
            .with_page_size(20)
            .with_retry(RetryPolicy::none())
            .include_video_title(false)
            .build();

        assert_eq!(config.api.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.scrape.page_size, 20);
        assert_eq!(config.scrape.retry.max_retries, 0);
        assert!(!config.output.include_video_title);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let config = ConfigBuilder::new().with_page_size(0).build();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("comment-harvest.toml");
        std::fs::write(
            &path,
            "[output]\noutput_dir = \"out\"\n\n[scrape.retry]\nmax_retries = 5\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.output_dir, PathBuf::from("out"));
        assert_eq!(config.output.file_name, "comments.csv");
        assert_eq!(config.scrape.retry.max_retries, 5);
        assert_eq!(config.scrape.retry.backoff_ms, 500);
        assert_eq!(config.scrape.page_size, 100);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "[output\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_retry_backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff_ms: 100,
        };
        assert_eq!(policy.delay_for(0).as_millis(), 100);
        assert_eq!(policy.delay_for(1).as_millis(), 200);
        assert_eq!(policy.delay_for(2).as_millis(), 400);
    }

    #[test]
    fn test_credential_prefers_explicit_value() {
        let credential = ApiCredential::resolve_with(Some("explicit".into()), |_| Some("from-env".into())).unwrap();
        assert_eq!(credential.expose(), "explicit");
    }

    #[test]
    fn test_credential_falls_back_to_env() {
        let credential = ApiCredential::resolve_with(None, |name| {
            assert_eq!(name, API_KEY_ENV);
            Some("from-env".into())
        })
        .unwrap();
        assert_eq!(credential.expose(), "from-env");

        let blank_explicit = ApiCredential::resolve_with(Some("   ".into()), |_| Some("from-env".into())).unwrap();
        assert_eq!(blank_explicit.expose(), "from-env");
    }

    #[test]
    fn test_missing_credential_is_fatal() {
        let result = ApiCredential::resolve_with(None, |_| None);
        assert!(matches!(result, Err(ConfigError::MissingCredential { .. })));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = ApiCredential::new("secret-key");
        assert!(!format!("{:?}", credential).contains("secret-key"));
    }
}
