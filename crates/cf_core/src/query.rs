use std::borrow::Cow;

use serde::{Deserialize, Serialize};

pub const SIMILAR_COMPANIES_PATH: &str = "similar_companies/";
pub const COMPANY_PROFILE_PATH: &str = "company_profile/";

/// The three search form inputs. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub name: String,
    pub location: String,
    pub industry: String,
}

impl SearchQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    /// `name` is always sent; `location` and `industry` only when non-empty.
    pub fn to_query_string(&self) -> String {
        let mut query = format!("name={}", encode_component(&self.name));
        if !self.location.is_empty() {
            query.push_str("&location=");
            query.push_str(&encode_component(&self.location));
        }
        if !self.industry.is_empty() {
            query.push_str("&industry=");
            query.push_str(&encode_component(&self.industry));
        }
        query
    }
}

pub fn profile_query_string(name: &str) -> String {
    format!("name={}", encode_component(name))
}

/// Percent-encodes everything outside `A-Z a-z 0-9 - _ . ~`.
pub fn encode_component(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
