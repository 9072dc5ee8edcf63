const fn api_host() -> &'static str {
    if let Some(host) = option_env!("MICROWAVE_API_HOST") {
        host
    } else {
        "localhost"
    }
}

const fn api_port() -> u16 {
    if let Some(port) = option_env!("MICROWAVE_API_PORT") {
        const_str::parse!(port, u16)
    } else {
        5000
    }
}

/// `https` when built with `MICROWAVE_API_SECURE=true` (or `1`)
const fn api_scheme() -> &'static str {
    if let Some(secure) = option_env!("MICROWAVE_API_SECURE") {
        if const_str::eq_ignore_ascii_case!(secure, "true") || const_str::equal!(secure, "1") {
            return "https";
        }
    }
    "http"
}

const API_HOST: &str = api_host();
const API_PORT: u16 = api_port();
const API_SCHEME: &str = api_scheme();

/// Backend URL baked in at compile time, used when nothing is passed at runtime
pub const DEFAULT_API_URL: &str = const_str::concat!(API_SCHEME, "://", API_HOST, ":", API_PORT);

/// Header carrying the admin secret on `/admin` requests
pub const ADMIN_SECRET_HEADER: &str = "X-Admin-Secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash
    pub base_url: String,
    /// Secret for admin endpoints, admin calls fail without it
    pub admin_secret: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            admin_secret: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, admin_secret: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            admin_secret: admin_secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert!(config.admin_secret.is_none());
    }

    #[test]
    fn test_trailing_slash() {
        let config = ApiConfig::new("https://microwaves.example.com/", None);
        assert_eq!(
            config.url("/buildings"),
            "https://microwaves.example.com/buildings"
        );
        assert_eq!(
            config.url("microwaves/4/broken"),
            "https://microwaves.example.com/microwaves/4/broken"
        );
    }

    #[test]
    fn test_empty_secret() {
        let config = ApiConfig::new("http://localhost:5000", Some(String::new()));
        assert!(config.admin_secret.is_none());
    }
}
