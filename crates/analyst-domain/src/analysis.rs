//! Analysis module - narratives and the sources that back them

use serde::{Deserialize, Serialize};

/// A citation record supporting a narrative
///
/// Only `uri` is guaranteed. Endpoints that know a page title may send it;
/// any other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    /// Link target
    pub uri: String,

    /// Human-readable title, when the endpoint provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Source {
    /// Create a source with only a URI
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: None,
        }
    }

    /// Attach a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Text to show for this source: the title if present and non-blank, else the URI
    pub fn label(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.uri,
        }
    }
}

/// A successful analysis: formatted narrative plus sources in display order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnalysisResult {
    /// Narrative text in formatted markup (Markdown)
    pub narrative: String,

    /// Sources, in the order the endpoint returned them
    pub sources: Vec<Source>,
}

impl AnalysisResult {
    /// Create a result
    pub fn new(narrative: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            narrative: narrative.into(),
            sources,
        }
    }

    /// Create a result with no sources
    pub fn narrative_only(narrative: impl Into<String>) -> Self {
        Self::new(narrative, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_ignores_unknown_fields() {
        let json = r#"{"uri": "https://a.com", "score": 0.9}"#;
        let source: Source = serde_json::from_str(json).unwrap();
        assert_eq!(source, Source::new("https://a.com"));
    }

    #[test]
    fn test_source_requires_uri() {
        let json = r#"{"title": "no link"}"#;
        assert!(serde_json::from_str::<Source>(json).is_err());
    }

    #[test]
    fn test_source_label() {
        assert_eq!(Source::new("https://a.com").label(), "https://a.com");
        assert_eq!(
            Source::new("https://a.com").with_title("Q3 filing").label(),
            "Q3 filing"
        );
        assert_eq!(
            Source::new("https://a.com").with_title("  ").label(),
            "https://a.com"
        );
    }

    #[test]
    fn test_untitled_source_serializes_uri_only() {
        let json = serde_json::to_string(&Source::new("https://a.com")).unwrap();
        assert_eq!(json, r#"{"uri":"https://a.com"}"#);
    }
}
