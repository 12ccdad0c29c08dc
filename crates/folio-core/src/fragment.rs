//! Parsed document fragments.
//!
//! A document-parsing provider returns one [`ContentFragment`] per logical
//! section of a statement. Each carries raw text and a metadata map whose
//! `type` entry classifies the section.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Classification of a fragment, derived from its metadata `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Headline figures: total value and risk score.
    PortfolioSummary,
    /// Sector weights, zero or more per fragment.
    SectorAllocation,
    /// A single position.
    Holding,
    /// Portfolio-level risk statistics.
    RiskMetrics,
    /// Month-end values over time.
    HistoricalPerformance,
    /// Any other tag, or no tag at all (empty string).
    Unrecognized(String),
}

impl FragmentKind {
    /// Classify a metadata tag. Unknown or absent tags map to
    /// [`FragmentKind::Unrecognized`].
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("portfolio_summary") => Self::PortfolioSummary,
            Some("sector_allocation") => Self::SectorAllocation,
            Some("holding") => Self::Holding,
            Some("risk_metrics") => Self::RiskMetrics,
            Some("historical_performance") => Self::HistoricalPerformance,
            Some(other) => Self::Unrecognized(other.to_string()),
            None => Self::Unrecognized(String::new()),
        }
    }

    /// Returns the wire tag for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PortfolioSummary => "portfolio_summary",
            Self::SectorAllocation => "sector_allocation",
            Self::Holding => "holding",
            Self::RiskMetrics => "risk_metrics",
            Self::HistoricalPerformance => "historical_performance",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Returns true for the five known categories.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrecognized(tag) if tag.is_empty() => write!(f, "untagged"),
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

impl Serialize for FragmentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FragmentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(Some(&tag)))
    }
}

/// Fragment metadata: the classification tag plus any provider fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentMetadata {
    /// Raw classification tag. A non-string tag is kept in its JSON form,
    /// so it classifies as unrecognized.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag: Option<String>,

    /// Remaining provider fields (page number, symbol, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl FragmentMetadata {
    /// Metadata carrying only a tag.
    #[must_use]
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            fields: Map::new(),
        }
    }

    /// Returns a string field, if present and a string.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

fn deserialize_tag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(tag) => Some(tag),
        other => Some(other.to_string()),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One unit of parsed-document output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentFragment {
    /// Free text of the section.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    /// Classification and provider metadata.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: FragmentMetadata,
}

impl ContentFragment {
    /// Create a fragment with the given tag and text.
    #[must_use]
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: FragmentMetadata::tagged(tag),
        }
    }

    /// Attach an extra metadata field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.fields.insert(name.into(), value.into());
        self
    }

    /// Classification of this fragment.
    #[must_use]
    pub fn kind(&self) -> FragmentKind {
        FragmentKind::from_tag(self.metadata.tag.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(
            FragmentKind::from_tag(Some("portfolio_summary")),
            FragmentKind::PortfolioSummary
        );
        assert_eq!(
            FragmentKind::from_tag(Some("historical_performance")),
            FragmentKind::HistoricalPerformance
        );
        assert_eq!(
            FragmentKind::from_tag(Some("footnote")),
            FragmentKind::Unrecognized("footnote".into())
        );
        assert!(!FragmentKind::from_tag(None).is_recognized());
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!(!FragmentKind::from_tag(Some("Holding")).is_recognized());
    }

    #[test]
    fn test_deserialize_provider_shape() {
        let raw = json!({
            "text": "Symbol: AAPL",
            "metadata": { "type": "holding", "page": 2, "symbol": "AAPL" }
        });
        let fragment: ContentFragment = serde_json::from_value(raw).unwrap();

        assert_eq!(fragment.kind(), FragmentKind::Holding);
        assert_eq!(fragment.metadata.fields["page"], json!(2));
        assert_eq!(fragment.metadata.str_field("symbol"), Some("AAPL"));
    }

    #[test]
    fn test_deserialize_without_type() {
        let raw = json!({ "text": "mock content", "metadata": { "page": 1 } });
        let fragment: ContentFragment = serde_json::from_value(raw).unwrap();

        assert_eq!(fragment.kind(), FragmentKind::Unrecognized(String::new()));
        assert_eq!(fragment.kind().to_string(), "untagged");
    }

    #[test]
    fn test_deserialize_irregular_provider_fields() {
        let raw = json!([
            { "text": "Total Value: $1,000", "metadata": { "type": "portfolio_summary" } },
            { "text": "chart", "metadata": { "type": 7 } },
            { "text": null, "metadata": { "type": "holding" } },
            { "text": "footer", "metadata": null },
            { "text": "caption", "metadata": { "type": null } }
        ]);
        let fragments: Vec<ContentFragment> = serde_json::from_value(raw).unwrap();

        assert_eq!(fragments.len(), 5);
        assert_eq!(fragments[0].kind(), FragmentKind::PortfolioSummary);
        assert_eq!(fragments[1].kind(), FragmentKind::Unrecognized("7".into()));
        assert_eq!(fragments[2].text, "");
        assert_eq!(fragments[2].kind(), FragmentKind::Holding);
        assert_eq!(fragments[3].metadata, FragmentMetadata::default());
        assert!(!fragments[4].kind().is_recognized());
    }

    #[test]
    fn test_serialize_keeps_type_key() {
        let fragment = ContentFragment::new("risk_metrics", "Beta: 1.1").with_field("page", 4);
        let value = serde_json::to_value(&fragment).unwrap();

        assert_eq!(value["metadata"]["type"], "risk_metrics");
        assert_eq!(value["metadata"]["page"], 4);
    }
}
