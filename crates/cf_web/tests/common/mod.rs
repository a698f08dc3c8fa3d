use async_trait::async_trait;
use cf_core::{CompanyApi, Error, ProfileEnvelope, Result, SearchEnvelope, SearchQuery};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// In-memory company service that records what it was asked for.
#[derive(Default)]
pub struct FakeApi {
    pub companies: Value,
    /// Served instead of `companies` from the second search on.
    pub later_companies: Option<Value>,
    pub delays: HashMap<String, Duration>,
    pub failing_profiles: Vec<String>,
    pub searches: Mutex<Vec<SearchQuery>>,
    pub profiles: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_companies(companies: Value) -> Self {
        Self {
            companies,
            ..Default::default()
        }
    }

    pub fn then_companies(mut self, companies: Value) -> Self {
        self.later_companies = Some(companies);
        self
    }

    pub fn delay(mut self, key: &str, millis: u64) -> Self {
        self.delays.insert(key.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn fail_profile(mut self, name: &str) -> Self {
        self.failing_profiles.push(name.to_string());
        self
    }

    pub fn requested_profiles(&self) -> Vec<String> {
        self.profiles.lock().unwrap().clone()
    }

    pub fn requested_searches(&self) -> Vec<SearchQuery> {
        self.searches.lock().unwrap().clone()
    }

    async fn pause(&self, key: &str) {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl CompanyApi for FakeApi {
    async fn similar_companies(&self, query: &SearchQuery) -> Result<SearchEnvelope> {
        let issued = {
            let mut searches = self.searches.lock().unwrap();
            searches.push(query.clone());
            searches.len()
        };
        self.pause(&query.name).await;
        let mut companies = match &self.later_companies {
            Some(later) if issued > 1 => later.clone(),
            _ => self.companies.clone(),
        };
        if companies.is_null() {
            companies = json!([{"name": query.name}]);
        }
        SearchEnvelope::from_value(json!({"similar_companies": {"companies": companies}}))
    }

    async fn company_profile(&self, name: &str) -> Result<Option<ProfileEnvelope>> {
        self.profiles.lock().unwrap().push(name.to_string());
        self.pause(name).await;
        if self.failing_profiles.iter().any(|n| n == name) {
            return Err(Error::Status(500));
        }
        Ok(ProfileEnvelope::from_value(json!({
            "company": name,
            "profile": {"Name": name, "Industry": "Testing"},
            "sources": ["https://example.com/source"]
        })))
    }
}
