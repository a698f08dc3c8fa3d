use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

pub const API_URL_VAR: &str = "CF_API_URL";
pub const LISTEN_ADDR_VAR: &str = "CF_LISTEN_ADDR";
pub const REQUEST_TIMEOUT_VAR: &str = "CF_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the company service; always ends with `/`.
    pub api_base_url: Url,
    pub listen_addr: SocketAddr,
    /// `None` lets a hung request wait forever.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            config = config.with_api_url(&url)?;
        }
        if let Some(addr) = lookup(LISTEN_ADDR_VAR) {
            config = config.with_listen_addr(&addr)?;
        }
        if let Some(secs) = lookup(REQUEST_TIMEOUT_VAR) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{} must be a number of seconds", REQUEST_TIMEOUT_VAR)))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, raw: &str) -> Result<Self> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(self)
    }

    pub fn with_listen_addr(mut self, raw: &str) -> Result<Self> {
        self.listen_addr = raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address '{}': {}", raw, e)))?;
        Ok(self)
    }
}

/// Parses an `http(s)` base URL and makes sure relative endpoint paths join
/// under it rather than replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!("unsupported scheme in {}", raw)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            (API_URL_VAR, "https://companies.example/api"),
            (LISTEN_ADDR_VAR, "0.0.0.0:8080"),
            (REQUEST_TIMEOUT_VAR, "15"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://companies.example/api/");
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[(API_URL_VAR, "not a url")])).is_err());
        assert!(Config::from_lookup(lookup(&[(API_URL_VAR, "ftp://host/")])).is_err());
        assert!(Config::from_lookup(lookup(&[(LISTEN_ADDR_VAR, "nowhere")])).is_err());
        assert!(Config::from_lookup(lookup(&[(REQUEST_TIMEOUT_VAR, "soon")])).is_err());
    }

    #[test]
    fn test_base_url_joins_under_path() {
        let base = parse_base_url("http://host:8000/v1?x=1").unwrap();
        assert_eq!(
            base.join("similar_companies/").unwrap().as_str(),
            "http://host:8000/v1/similar_companies/"
        );
    }
}
