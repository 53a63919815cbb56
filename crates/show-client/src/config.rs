//! Backend Configuration

/// Where the show server lives
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Scheme, host and port without a trailing slash
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read `SHOW_BACKEND_URL`
    pub fn from_env() -> Self {
        std::env::var("SHOW_BACKEND_URL")
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let config = BackendConfig::new("https://show.test/");
        assert_eq!(config.url("/api/products"), "https://show.test/api/products");
        assert_eq!(config.url("health"), "https://show.test/health");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(BackendConfig::default().url("/health"), "http://localhost:3000/health");
    }
}
