use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::query::{self, SearchQuery};
use crate::types::{ProfileEnvelope, SearchEnvelope};
use crate::{Error, Result};

/// The two read-only endpoints of the company service.
#[async_trait]
pub trait CompanyApi: Send + Sync {
    /// `GET /similar_companies/`
    async fn similar_companies(&self, query: &SearchQuery) -> Result<SearchEnvelope>;

    /// `GET /company_profile/`. `None` means the body was valid JSON but not
    /// an object.
    async fn company_profile(&self, name: &str) -> Result<Option<ProfileEnvelope>>;
}

pub struct HttpCompanyApi {
    client: Client,
    base_url: Url,
}

impl HttpCompanyApi {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.clone(),
        })
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str, query: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))?;
        url.set_query(Some(query));
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl fmt::Debug for HttpCompanyApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCompanyApi")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[async_trait]
impl CompanyApi for HttpCompanyApi {
    async fn similar_companies(&self, query: &SearchQuery) -> Result<SearchEnvelope> {
        let url = self.endpoint(query::SIMILAR_COMPANIES_PATH, &query.to_query_string())?;
        let body = self.get_json(url).await?;
        SearchEnvelope::from_value(body)
    }

    async fn company_profile(&self, name: &str) -> Result<Option<ProfileEnvelope>> {
        let url = self.endpoint(query::COMPANY_PROFILE_PATH, &query::profile_query_string(name))?;
        let body = self.get_json(url).await?;
        Ok(ProfileEnvelope::from_value(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let api = HttpCompanyApi::with_client(
            Client::new(),
            crate::config::parse_base_url("http://localhost:8000/api").unwrap(),
        );
        let url = api
            .endpoint(
                query::SIMILAR_COMPANIES_PATH,
                &SearchQuery::new("A&B").with_location("NY").to_query_string(),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/similar_companies/?name=A%26B&location=NY"
        );

        let url = api
            .endpoint(query::COMPANY_PROFILE_PATH, &query::profile_query_string("Acme Inc"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/company_profile/?name=Acme%20Inc");
    }

    #[test]
    fn test_debug_hides_client() {
        let api = HttpCompanyApi::new(&Config::default()).unwrap();
        let debug = format!("{:?}", api);
        assert!(debug.contains("<reqwest::Client>"));
        assert!(debug.contains("127.0.0.1:8000"));
    }
}
