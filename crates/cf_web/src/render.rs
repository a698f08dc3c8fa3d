//! Pure renderers turning decoded payloads into container markup.
//!
//! Every interpolated value is HTML-escaped and every link target is
//! restricted to `http`, `https` and `mailto`.

use std::borrow::Cow;

use cf_core::{
    CompanyProfile, CompanySummary, Entry, Executive, FieldValue, NewsItem, ProfileEnvelope,
    Section, PLACEHOLDER,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;
use thiserror::Error;
use url::Url;

pub const NO_COMPANIES: &str = r#"<p class="alert alert-warning">No companies found.</p>"#;
pub const NO_PROFILE: &str = r#"<p class="alert alert-danger">No profile data available.</p>"#;
pub const PROFILE_ERROR: &str = r#"<p class="alert alert-danger">Error displaying profile.</p>"#;

const NEWS_TITLE_DEFAULT: &str = "Update";
const NEWS_SUMMARY_DEFAULT: &str = "No summary available.";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("field '{field}' cannot be shown as text: {value}")]
    Unrenderable { field: &'static str, value: Value },

    #[error("malformed {section} entry: {value}")]
    MalformedEntry { section: &'static str, value: Value },

    #[error("malformed profile: {0}")]
    MalformedProfile(Value),
}

/// A rendered company table plus the click key of every row, captured from
/// the company name at render time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionTable {
    html: String,
    keys: Vec<Option<String>>,
}

impl SelectionTable {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn row_count(&self) -> usize {
        self.keys.len()
    }

    /// `None` for an unknown row or a row rendered without a name.
    pub fn key(&self, row: usize) -> Option<&str> {
        self.keys.get(row).and_then(|key| key.as_deref())
    }
}

fn text(value: &str) -> Cow<'_, str> {
    encode_text(value)
}

fn attr(value: &str) -> Cow<'_, str> {
    encode_double_quoted_attribute(value)
}

/// True when the text before the first `:` can only be a URL scheme.
fn has_scheme(raw: &str) -> bool {
    match raw.split_once(':') {
        Some((scheme, _)) => !scheme.is_empty() && !scheme.contains(['/', '.']),
        None => false,
    }
}

/// Link target for `raw`, or `#` when it is not a web or mail link.
/// Scheme-less values such as `www.acme.com` or `acme.com:8080/x` are read
/// as `https`.
pub fn safe_href(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "#".to_string();
    }

    let parsed = if has_scheme(raw) {
        Url::parse(raw)
    } else {
        Url::parse(&format!("https://{}", raw.trim_start_matches('/')))
    };

    match parsed {
        Ok(url) if matches!(url.scheme(), "http" | "https" | "mailto") => {
            attr(url.as_str()).into_owned()
        }
        _ => "#".to_string(),
    }
}

fn href_for(field: &FieldValue) -> String {
    field.as_text().map(safe_href).unwrap_or_else(|| "#".to_string())
}

/// Escaped text of `value`, `default` when it is missing.
fn field<'a>(
    name: &'static str,
    value: &'a FieldValue,
    default: &'a str,
) -> Result<Cow<'a, str>, RenderError> {
    value
        .try_display_or(default)
        .map(text)
        .map_err(|v| RenderError::Unrenderable {
            field: name,
            value: v.clone(),
        })
}

fn record<'a, T>(section: &'static str, entry: &'a Entry<T>) -> Result<&'a T, RenderError> {
    match entry {
        Entry::Record(record) => Ok(record),
        Entry::Malformed(value) => Err(RenderError::MalformedEntry {
            section,
            value: value.clone(),
        }),
    }
}

/// Company table for the search panel. An empty or absent list gives only
/// the "No companies found." notice and no rows.
pub fn render_selection(companies: &Section<Entry<CompanySummary>>) -> SelectionTable {
    if companies.is_empty() {
        return SelectionTable {
            html: NO_COMPANIES.to_string(),
            keys: Vec::new(),
        };
    }

    let missing = CompanySummary::default();
    let mut html = String::from(r#"<h3 class="mb-3">Select a Company</h3>"#);
    html.push_str(r#"<table class="table table-hover table-bordered table-sleek">"#);
    html.push_str(r#"<thead class="table-light"><tr><th>Name</th><th>Location</th><th>Industry</th></tr></thead>"#);
    html.push_str("<tbody>");

    let mut keys = Vec::with_capacity(companies.items().len());
    for (row, entry) in companies.items().iter().enumerate() {
        let company = match entry {
            Entry::Record(company) => company,
            Entry::Malformed(value) => {
                tracing::debug!("Rendering malformed company entry as placeholders: {}", value);
                &missing
            }
        };

        let key = company.name.as_text().map(str::to_string);
        let name_attr = key
            .as_deref()
            .map(|name| format!(r#" data-name="{}""#, attr(name)))
            .unwrap_or_default();

        html.push_str(&format!(
            r#"<tr class="clickable-row" data-row="{}"{}><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            row,
            name_attr,
            text(company.name.display_or(PLACEHOLDER)),
            text(company.location.display_or(PLACEHOLDER)),
            text(company.industry.display_or(PLACEHOLDER)),
        ));
        keys.push(key);
    }

    html.push_str("</tbody></table>");
    SelectionTable { html, keys }
}

/// Markup for the profile panel. Never fails: a payload that cannot be
/// rendered yields [`PROFILE_ERROR`] instead of a partial card.
pub fn render_profile(envelope: Option<&ProfileEnvelope>) -> String {
    let Some(envelope) = envelope else {
        return NO_PROFILE.to_string();
    };
    let Some(profile) = envelope.profile() else {
        return NO_PROFILE.to_string();
    };

    match try_render_profile(profile, &envelope.sources) {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Error displaying profile: {}", e);
            PROFILE_ERROR.to_string()
        }
    }
}

pub fn try_render_profile(
    profile: &Entry<CompanyProfile>,
    sources: &Section<FieldValue>,
) -> Result<String, RenderError> {
    let profile = match profile {
        Entry::Record(profile) => profile,
        Entry::Malformed(value) => return Err(RenderError::MalformedProfile(value.clone())),
    };

    let mut html = String::from(r#"<div class="card"><div class="card-body">"#);
    html.push_str(&format!(
        r#"<h3 class="card-title">{}</h3>"#,
        field("Name", &profile.name, PLACEHOLDER)?
    ));
    html.push_str(&summary_line("Location", field("Location", &profile.location, PLACEHOLDER)?));
    html.push_str(&summary_line("Industry", field("Industry", &profile.industry, PLACEHOLDER)?));
    html.push_str(&link_line("Website", &profile.website)?);
    html.push_str(&link_line("LinkedIn", &profile.linkedin)?);
    html.push_str(&summary_line(
        "Founded Year",
        field("Founded Year", &profile.founded_year, PLACEHOLDER)?,
    ));
    html.push_str(&summary_line(
        "Number of Employees",
        field("Number of Employees", &profile.employees, PLACEHOLDER)?,
    ));
    html.push_str(&summary_line("Revenue", field("Revenue", &profile.revenue, PLACEHOLDER)?));
    html.push_str(&summary_line(
        "Stock Price",
        field("Stock Price", &profile.stock_price, PLACEHOLDER)?,
    ));

    if !profile.top_executives.is_empty() {
        html.push_str(&executives_section(profile.top_executives.items())?);
    }
    if !profile.latest_news.is_empty() {
        html.push_str(&news_section(profile.latest_news.items())?);
    }
    if !sources.is_empty() {
        html.push_str(&sources_section(sources.items())?);
    }

    html.push_str("</div></div>");
    Ok(html)
}

fn summary_line(label: &str, value: Cow<'_, str>) -> String {
    format!("<p><strong>{}:</strong> {}</p>", label, value)
}

fn link_line(label: &'static str, value: &FieldValue) -> Result<String, RenderError> {
    let shown = field(label, value, PLACEHOLDER)?;
    Ok(format!(
        r#"<p><strong>{}:</strong> <a href="{}" target="_blank" rel="noopener" class="link-primary">{}</a></p>"#,
        label,
        href_for(value),
        shown
    ))
}

fn collapsible(id: &str, heading: &str, summary: &str, body: &str) -> String {
    format!(
        r#"<h4 class="mt-4 mb-3">{heading}</h4><details id="{id}" class="accordion" open><summary class="accordion-button">{summary}</summary><div class="accordion-body">{body}</div></details>"#
    )
}

fn executives_section(executives: &[Entry<Executive>]) -> Result<String, RenderError> {
    let mut rows = String::new();
    for entry in executives {
        let exec = record("Top Executives", entry)?;
        rows.push_str(&format!(
            r#"<tr><td>{}</td><td>{}</td><td><a href="{}" target="_blank" rel="noopener" class="link-info">Link</a></td><td>{}</td></tr>"#,
            field("Executive Name", &exec.name, PLACEHOLDER)?,
            field("Executive Position", &exec.position, PLACEHOLDER)?,
            href_for(&exec.linkedin),
            field("Executive Email", &exec.email, PLACEHOLDER)?,
        ));
    }

    let table = format!(
        r#"<table class="table table-striped table-bordered"><thead class="table-light"><tr><th>Name</th><th>Position</th><th>LinkedIn</th><th>Email</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    );
    Ok(collapsible("executivesCollapse", "Top Executives", "Executives", &table))
}

fn sentiment_class(label: &str) -> &'static str {
    match label.trim().to_ascii_lowercase().as_str() {
        "positive" => "positive",
        "negative" => "negative",
        "neutral" => "neutral",
        _ => "other",
    }
}

fn news_section(news: &[Entry<NewsItem>]) -> Result<String, RenderError> {
    let mut cards = String::new();
    for entry in news {
        let item = record("Latest News", entry)?;
        let sentiment = match item.sentiment.try_display_or("") {
            Ok("") => String::new(),
            Ok(label) => format!(
                r#"<span class="sentiment sentiment-{}">Sentiment: {}</span>"#,
                sentiment_class(label),
                text(label)
            ),
            Err(value) => {
                return Err(RenderError::Unrenderable {
                    field: "News Sentiment",
                    value: value.clone(),
                })
            }
        };

        cards.push_str(&format!(
            r#"<div class="card mb-2"><div class="card-body"><h6 class="card-title">{}</h6><p class="card-text">{}</p><p>Date: {}</p>{}</div></div>"#,
            field("News Title", &item.title, NEWS_TITLE_DEFAULT)?,
            field("News Summary", &item.summary, NEWS_SUMMARY_DEFAULT)?,
            field("News Date", &item.date, PLACEHOLDER)?,
            sentiment,
        ));
    }
    Ok(collapsible("newsCollapse", "Latest News", "News", &cards))
}

fn sources_section(sources: &[FieldValue]) -> Result<String, RenderError> {
    let mut html = String::from(r#"<h4 class="mt-4 mb-3">Sources</h4>"#);
    for source in sources {
        html.push_str(&format!(
            r#"<p><a href="{}" target="_blank" rel="noopener" class="link-secondary">{}</a></p>"#,
            href_for(source),
            field("Source", source, PLACEHOLDER)?
        ));
    }
    Ok(html)
}
