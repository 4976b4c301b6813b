//! Client configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{ClientError, ClientResult};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "http://www.PharmaAtOncePreDeploy.somee.com/api";

/// What an import does when the bulk submit request fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkSubmitPolicy {
    /// Keep the in-memory merge and report a warning
    #[default]
    Advisory,
    /// Roll the merge back and fail the import
    Strict,
}

impl FromStr for BulkSubmitPolicy {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(Self::Advisory),
            "strict" => Ok(Self::Strict),
            other => Err(ClientError::Config(format!(
                "unknown bulk submit policy: {other}"
            ))),
        }
    }
}

/// Client configuration for the warehouse API
///
/// # Environment variables
///
/// | Variable | Default |
/// |----------|---------|
/// | PHARMA_API_URL | `DEFAULT_BASE_URL` |
/// | PHARMA_TIMEOUT_SECS | 30 |
/// | PHARMA_PAGE_SIZE | 10 |
/// | PHARMA_BULK_SUBMIT | advisory |
/// | LOG_LEVEL | info |
/// | LOG_JSON | false |
/// | LOG_DIR | (none, console only) |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, no trailing slash
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Rows per page for orders and medicines
    pub page_size: usize,

    pub bulk_submit_policy: BulkSubmitPolicy,

    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: 30,
            page_size: 10,
            bulk_submit_policy: BulkSubmitPolicy::Advisory,
            log_level: "info".to_string(),
            log_json: false,
            log_dir: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("PHARMA_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout_secs: env::var("PHARMA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            page_size: env::var("PHARMA_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            bulk_submit_policy: env::var("PHARMA_BULK_SUBMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bulk_submit_policy),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: env::var("LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.log_json),
            log_dir: env::var("LOG_DIR").ok().map(PathBuf::from),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_bulk_submit_policy(mut self, policy: BulkSubmitPolicy) -> Self {
        self.bulk_submit_policy = policy;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> ClientResult<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "base url must be http(s): {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
