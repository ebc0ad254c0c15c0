//! JSON bodies exchanged with the analysis endpoint.

use analyst_domain::{AnalysisResult, Source};
use serde::{Deserialize, Serialize};

/// Request body: `{ "query": "<text>" }`
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    /// Query text exactly as typed
    pub query: &'a str,
}

/// Success body
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    /// Narrative in formatted markup
    pub analysis: String,

    /// Citation records; absent or null means none
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
}

impl AnalyzeResponse {
    /// Convert into the domain result
    pub fn into_result(self) -> AnalysisResult {
        AnalysisResult::new(self.analysis, self.sources.unwrap_or_default())
    }
}

/// Error body returned with a non-success status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(AnalyzeRequest { query: "x" }).unwrap();
        assert_eq!(body, serde_json::json!({ "query": "x" }));
    }

    #[test]
    fn test_response_with_sources() {
        let json = r#"{
            "analysis": "**Strong** quarter",
            "sources": [
                {"uri": "https://a.com"},
                {"uri": "https://b.com", "title": "B"}
            ]
        }"#;

        let result = serde_json::from_str::<AnalyzeResponse>(json)
            .unwrap()
            .into_result();
        assert_eq!(result.narrative, "**Strong** quarter");
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].uri, "https://a.com");
        assert_eq!(result.sources[1].title.as_deref(), Some("B"));
    }

    #[test]
    fn test_response_without_sources() {
        let result = serde_json::from_str::<AnalyzeResponse>(r#"{"analysis": "ok"}"#)
            .unwrap()
            .into_result();
        assert!(result.sources.is_empty());
    }

    #[test]
    fn test_response_with_null_sources() {
        let result = serde_json::from_str::<AnalyzeResponse>(r#"{"analysis": "ok", "sources": null}"#)
            .unwrap()
            .into_result();
        assert!(result.sources.is_empty());
    }

    #[test]
    fn test_response_missing_analysis_is_rejected() {
        assert!(serde_json::from_str::<AnalyzeResponse>(r#"{"sources": []}"#).is_err());
    }

    #[test]
    fn test_error_body_without_message() {
        let body: ErrorResponse = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());
    }
}
