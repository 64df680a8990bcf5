//! Gateway configuration from the environment.

/// Default backend URL for local development.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Connection settings for the Lectern backend.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base HTTP URL, without a trailing slash.
    pub base_url: String,
    /// Bearer credential obtained from the session (issuance is the
    /// shell's concern, not this crate's).
    pub bearer_token: String,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            bearer_token: bearer_token.into(),
        }
    }

    /// Load configuration from the environment (`LECTERN_API_URL`,
    /// `LECTERN_API_TOKEN`), reading a `.env` file if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("LECTERN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let bearer_token = std::env::var("LECTERN_API_TOKEN").unwrap_or_default();

        Self::new(base_url, bearer_token)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_stripped() {
        let config = GatewayConfig::new("http://api.example.com//", "t");
        assert_eq!(config.base_url, "http://api.example.com");
    }

    #[test]
    fn plain_url_unchanged() {
        let config = GatewayConfig::new(DEFAULT_API_URL, "t");
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }
}
