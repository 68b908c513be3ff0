/// Configuration management
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the conversation service (e.g. "https://api.example.com")
    pub base_url: String,

    /// How long an archive toggle may wait for confirmation before the
    /// optimistic fallback fires
    pub archive_timeout: Duration,

    /// Delay before the reconciliation refresh that follows a confirmed
    /// archive toggle
    pub reconcile_delay: Duration,

    /// Per-request timeout for the HTTP client (delete and block have no
    /// engine-level timeout of their own)
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            archive_timeout: Duration::from_secs(10),
            reconcile_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Default timings against a specific service URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
