use std::env;

/// Client settings: which API host to talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Reads `CATFISH_API_URL`, falling back to the local development address
    pub fn from_env() -> Self {
        Self::from_value(env::var("CATFISH_API_URL").ok())
    }

    fn from_value(value: Option<String>) -> Self {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(url) => Self::new(url.trim()),
            None => Self::new(Self::DEFAULT_BASE_URL),
        }
    }

    pub fn uploads_url(&self) -> String {
        format!("{}/api/uploads", self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_local_address() {
        assert_eq!(ClientConfig::from_value(None).base_url, "http://localhost:8000");
        assert_eq!(
            ClientConfig::from_value(Some("  ".to_string())).base_url,
            "http://localhost:8000"
        );
    }

    #[test]
    fn test_trailing_slash_is_dropped() {
        let config = ClientConfig::from_value(Some("https://api.example.com/".to_string()));
        assert_eq!(config.uploads_url(), "https://api.example.com/api/uploads");
    }
}
