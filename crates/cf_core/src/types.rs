use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A scalar payload field as the server sent it.
///
/// Absent keys and falsy values (`null`, `false`, `0`, `""`) collapse into
/// `Missing` here so renderers only ever decide between text and placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Missing,
    Text(String),
    /// An object or array where a scalar was expected.
    Unrenderable(Value),
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text of the field, or `default` when it is missing or cannot be shown.
    pub fn display_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.as_text().unwrap_or(default)
    }

    /// Like [`display_or`](Self::display_or), but hands back the offending
    /// value instead of hiding it.
    pub fn try_display_or<'a>(&'a self, default: &'a str) -> std::result::Result<&'a str, &'a Value> {
        match self {
            FieldValue::Missing => Ok(default),
            FieldValue::Text(s) => Ok(s),
            FieldValue::Unrenderable(value) => Err(value),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        if is_falsy(&value) {
            return FieldValue::Missing;
        }
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Number(n) => FieldValue::Text(n.to_string()),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            other @ (Value::Array(_) | Value::Object(_)) => FieldValue::Unrenderable(other),
            Value::Null => FieldValue::Missing,
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}

/// One element of a repeating section.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    Record(T),
    /// Not an object, or an object that could not be read as `T`.
    Malformed(Value),
}

impl<T: DeserializeOwned> Entry<T> {
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Entry::Malformed(value);
        }
        match T::deserialize(&value) {
            Ok(record) => Entry::Record(record),
            Err(e) => {
                tracing::debug!("Keeping malformed entry: {}", e);
                Entry::Malformed(value)
            }
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Entry<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Entry::from_value)
    }
}

/// An optional ordered sequence. Anything other than a JSON array reads as
/// absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<T>(Option<Vec<T>>);

impl<T> Default for Section<T> {
    fn default() -> Self {
        Section(None)
    }
}

impl<T> Section<T> {
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// True when absent or present with no items.
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn items(&self) -> &[T] {
        self.0.as_deref().unwrap_or(&[])
    }
}

impl<T: DeserializeOwned> Section<T> {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let items = items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<std::result::Result<Vec<T>, _>>()?;
                Ok(Section(Some(items)))
            }
            _ => Ok(Section(None)),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Section<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Section::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompanySummary {
    pub name: FieldValue,
    pub location: FieldValue,
    pub industry: FieldValue,
}

/// Body of `GET /similar_companies/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchEnvelope {
    pub companies: Section<Entry<CompanySummary>>,
}

impl SearchEnvelope {
    /// `similar_companies` must be present. `companies` inside it may be
    /// missing or falsy, but anything else that is not an array is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let similar = value
            .get("similar_companies")
            .filter(|v| !v.is_null())
            .ok_or_else(|| Error::InvalidResponse("missing similar_companies".to_string()))?;

        let companies = match similar.get("companies") {
            Some(companies @ Value::Array(_)) => Section::from_value(companies.clone())?,
            Some(companies) if !is_falsy(companies) => {
                return Err(Error::InvalidResponse(format!(
                    "companies is not a list: {}",
                    companies
                )));
            }
            _ => Section::default(),
        };
        Ok(Self { companies })
    }
}

/// Reads `key` from `map`, falling back to its lowercase spelling when the
/// capitalized one is missing or falsy.
fn either_case(map: &Map<String, Value>, key: &str) -> FieldValue {
    let field = map.get(key).cloned().map(FieldValue::from).unwrap_or_default();
    if !field.is_missing() {
        return field;
    }
    map.get(&key.to_lowercase())
        .cloned()
        .map(FieldValue::from)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Executive {
    pub name: FieldValue,
    pub position: FieldValue,
    pub linkedin: FieldValue,
    pub email: FieldValue,
}

impl<'de> Deserialize<'de> for Executive {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            name: either_case(&map, "Name"),
            position: either_case(&map, "Position"),
            linkedin: either_case(&map, "LinkedIn"),
            email: either_case(&map, "Email"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsItem {
    pub title: FieldValue,
    pub date: FieldValue,
    pub summary: FieldValue,
    pub sentiment: FieldValue,
}

impl<'de> Deserialize<'de> for NewsItem {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            title: either_case(&map, "Title"),
            date: either_case(&map, "Date"),
            summary: either_case(&map, "Summary"),
            sentiment: either_case(&map, "Sentiment"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    #[serde(rename = "Name")]
    pub name: FieldValue,
    #[serde(rename = "Location")]
    pub location: FieldValue,
    #[serde(rename = "Industry")]
    pub industry: FieldValue,
    #[serde(rename = "Website")]
    pub website: FieldValue,
    #[serde(rename = "LinkedIn")]
    pub linkedin: FieldValue,
    #[serde(rename = "Founded Year")]
    pub founded_year: FieldValue,
    #[serde(rename = "Number of Employees")]
    pub employees: FieldValue,
    #[serde(rename = "Revenue")]
    pub revenue: FieldValue,
    #[serde(rename = "Stock Price")]
    pub stock_price: FieldValue,
    #[serde(rename = "Top Executives")]
    pub top_executives: Section<Entry<Executive>>,
    #[serde(rename = "Latest News")]
    pub latest_news: Section<Entry<NewsItem>>,
}

/// Body of `GET /company_profile/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileEnvelope {
    pub company: FieldValue,
    pub profile: Option<Entry<CompanyProfile>>,
    pub sources: Section<FieldValue>,
}

impl ProfileEnvelope {
    /// Returns `None` when the body is not a JSON object at all.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            return None;
        };

        let profile = map
            .remove("profile")
            .filter(|v| !is_falsy(v))
            .map(Entry::from_value);
        let company = map.remove("company").map(FieldValue::from).unwrap_or_default();
        let sources = map
            .remove("sources")
            .map(|v| Section::from_value(v).unwrap_or_default())
            .unwrap_or_default();

        Some(Self {
            company,
            profile,
            sources,
        })
    }

    pub fn profile(&self) -> Option<&Entry<CompanyProfile>> {
        self.profile.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_falsy_values_are_missing() {
        for value in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            assert!(FieldValue::from(value).is_missing());
        }
        assert_eq!(FieldValue::from(json!(1998)), FieldValue::Text("1998".to_string()));
        assert_eq!(FieldValue::from(json!(true)).as_text(), Some("true"));
        assert!(matches!(
            FieldValue::from(json!({"year": 1998})),
            FieldValue::Unrenderable(_)
        ));
    }

    #[test]
    fn test_display_or_hides_unrenderable() {
        let field = FieldValue::from(json!(["a", "b"]));
        assert_eq!(field.display_or("N/A"), "N/A");
        assert!(field.try_display_or("N/A").is_err());
        assert_eq!(FieldValue::Missing.try_display_or("N/A"), Ok("N/A"));
    }

    #[test]
    fn test_search_envelope_requires_similar_companies() {
        assert!(SearchEnvelope::from_value(json!({})).is_err());
        assert!(SearchEnvelope::from_value(json!({"similar_companies": null})).is_err());
        assert!(SearchEnvelope::from_value(json!([])).is_err());

        let envelope = SearchEnvelope::from_value(json!({"similar_companies": {}})).unwrap();
        assert!(envelope.companies.is_absent());

        let envelope = SearchEnvelope::from_value(json!({"similar_companies": ["x"]})).unwrap();
        assert!(envelope.companies.is_empty());
    }

    #[test]
    fn test_search_envelope_reads_companies() {
        let envelope = SearchEnvelope::from_value(json!({
            "similar_companies": {"companies": [
                {"name": "Acme", "location": "NY"},
                "stray"
            ]}
        }))
        .unwrap();

        let items = envelope.companies.items();
        assert_eq!(items.len(), 2);
        match &items[0] {
            Entry::Record(company) => {
                assert_eq!(company.name.as_text(), Some("Acme"));
                assert_eq!(company.location.as_text(), Some("NY"));
                assert!(company.industry.is_missing());
            }
            other => panic!("expected record, got {:?}", other),
        }
        assert!(matches!(items[1], Entry::Malformed(_)));
    }

    #[test]
    fn test_profile_envelope_shapes() {
        assert!(ProfileEnvelope::from_value(json!(null)).is_none());
        assert!(ProfileEnvelope::from_value(json!([1, 2])).is_none());

        let envelope = ProfileEnvelope::from_value(json!({"company": "Acme"})).unwrap();
        assert!(envelope.profile().is_none());

        let envelope = ProfileEnvelope::from_value(json!({"profile": null})).unwrap();
        assert!(envelope.profile().is_none());

        let envelope = ProfileEnvelope::from_value(json!({"profile": "oops"})).unwrap();
        assert!(matches!(envelope.profile(), Some(Entry::Malformed(_))));

        let envelope = ProfileEnvelope::from_value(json!({"profile": {}})).unwrap();
        assert!(matches!(envelope.profile(), Some(Entry::Record(_))));
    }

    #[test]
    fn test_profile_fields_and_sections() {
        let envelope = ProfileEnvelope::from_value(json!({
            "company": "Acme",
            "profile": {
                "Name": "Acme Corp",
                "Founded Year": 1998,
                "Top Executives": [{"Name": "Jane", "Position": "CEO", "LinkedIn": "https://linkedin.com/in/jane"}],
                "Latest News": [{"title": "Q3", "summary": "Up", "sentiment": "Positive"}]
            },
            "sources": ["https://acme.example"]
        }))
        .unwrap();

        let Some(Entry::Record(profile)) = envelope.profile() else {
            panic!("expected a profile record");
        };
        assert_eq!(profile.name.as_text(), Some("Acme Corp"));
        assert_eq!(profile.founded_year.as_text(), Some("1998"));
        assert!(profile.revenue.is_missing());
        assert_eq!(profile.top_executives.items().len(), 1);

        match &profile.latest_news.items()[0] {
            Entry::Record(news) => {
                assert_eq!(news.title.as_text(), Some("Q3"));
                assert_eq!(news.sentiment.as_text(), Some("Positive"));
                assert!(news.date.is_missing());
            }
            other => panic!("expected news record, got {:?}", other),
        }
        assert_eq!(envelope.sources.items()[0].as_text(), Some("https://acme.example"));
    }

    #[test]
    fn test_search_envelope_rejects_non_list_companies() {
        for companies in [json!("Acme"), json!({"name": "Acme"}), json!(3)] {
            let result = SearchEnvelope::from_value(json!({"similar_companies": {"companies": companies}}));
            assert!(matches!(result, Err(Error::InvalidResponse(_))));
        }

        for companies in [json!(null), json!(""), json!(false)] {
            let envelope =
                SearchEnvelope::from_value(json!({"similar_companies": {"companies": companies}})).unwrap();
            assert!(envelope.companies.is_absent());
        }
    }

    #[test]
    fn test_news_with_both_spellings_prefers_capitalized() {
        let news: NewsItem = serde_json::from_value(json!({
            "Title": "Q3",
            "Summary": "Up",
            "Sentiment": "Positive",
            "summary": "Up again",
            "sentiment": "Negative"
        }))
        .unwrap();
        assert_eq!(news.title.as_text(), Some("Q3"));
        assert_eq!(news.summary.as_text(), Some("Up"));
        assert_eq!(news.sentiment.as_text(), Some("Positive"));
        assert!(news.date.is_missing());

        let news: NewsItem = serde_json::from_value(json!({"Sentiment": "", "sentiment": "Neutral"})).unwrap();
        assert_eq!(news.sentiment.as_text(), Some("Neutral"));
    }

    #[test]
    fn test_executive_with_both_spellings() {
        let entry: Entry<Executive> = Entry::from_value(json!({
            "Name": "Jane",
            "name": "jane",
            "position": "CEO",
            "LinkedIn": "https://linkedin.com/in/jane",
            "linkedin": "https://linkedin.com/in/other"
        }));
        let Entry::Record(exec) = entry else {
            panic!("expected an executive record");
        };
        assert_eq!(exec.name.as_text(), Some("Jane"));
        assert_eq!(exec.position.as_text(), Some("CEO"));
        assert_eq!(exec.linkedin.as_text(), Some("https://linkedin.com/in/jane"));
        assert!(exec.email.is_missing());
    }

    #[test]
    fn test_non_array_sections_are_absent() {
        let profile: CompanyProfile = serde_json::from_value(json!({
            "Top Executives": "none listed",
            "Latest News": {"Title": "x"}
        }))
        .unwrap();
        assert!(profile.top_executives.is_absent());
        assert!(profile.latest_news.is_absent());
    }
}
