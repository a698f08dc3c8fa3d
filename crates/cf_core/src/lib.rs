pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod types;

pub use api::{CompanyApi, HttpCompanyApi};
pub use classify::FailureKind;
pub use config::Config;
pub use error::Error;
pub use query::SearchQuery;
pub use types::{
    CompanyProfile, CompanySummary, Entry, Executive, FieldValue, NewsItem, ProfileEnvelope,
    SearchEnvelope, Section,
};

pub type Result<T> = std::result::Result<T, Error>;

/// Literal substituted for any absent field.
pub const PLACEHOLDER: &str = "N/A";
