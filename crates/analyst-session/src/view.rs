//! Presentation layer: a pure mapping from a session snapshot to page structure.
//!
//! Nothing here holds state. Calling [`render_page`] twice on the same
//! snapshot gives equal pages.

use crate::controller::SessionSnapshot;
use crate::markdown::{self, Document};
use analyst_domain::{SessionState, Source};
use serde::Serialize;

/// Heading above the output region
pub const REPORT_HEADING: &str = "Senior Analyst Report:";

/// Narrative shown before the first submission
pub const IDLE_PLACEHOLDER: &str = "Your grounded financial analysis will appear here.";

/// Hint text of the empty query box
pub const QUERY_PLACEHOLDER: &str =
    "e.g., Summarize Tesla's last quarter earnings and provide a risk outlook.";

/// Submit control label when ready
pub const SUBMIT_LABEL: &str = "GET ANALYSIS";

/// Submit control label while a request is outstanding
pub const SUBMIT_BUSY_LABEL: &str = "ANALYZING...";

/// Text next to the busy indicator
pub const BUSY_TEXT: &str = "Consulting Senior Analyst Data...";

/// Label above the source links
pub const SOURCES_LABEL: &str = "Sources Used:";

/// The query input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryBox {
    /// Current text
    pub text: String,
    /// Hint shown when the text is empty
    pub placeholder: &'static str,
    /// False while a request is outstanding
    pub editable: bool,
}

/// The submit control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    /// Button label
    pub label: &'static str,
    /// False while a request is outstanding
    pub enabled: bool,
}

/// Busy indicator shown while a request is outstanding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusyIndicator {
    /// Text next to the spinner
    pub text: &'static str,
}

/// What fills the output region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    /// Placeholder narrative before the first submission
    Placeholder {
        /// Rendered placeholder
        document: Document,
    },
    /// Waiting for the endpoint
    Pending,
    /// Rendered narrative of a successful analysis
    Narrative {
        /// Rendered narrative
        document: Document,
    },
    /// Error message in place of a narrative
    Error {
        /// Message to show
        message: String,
    },
}

/// The output region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Region heading
    pub heading: &'static str,
    /// Region content
    pub body: ReportBody,
}

/// A link to one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLink {
    /// Link target
    pub href: String,
    /// Link text
    pub label: String,
    /// Following the link must leave the current page in place
    pub opens_new_context: bool,
}

impl From<&Source> for SourceLink {
    fn from(source: &Source) -> Self {
        Self {
            href: source.uri.clone(),
            label: source.label().to_string(),
            opens_new_context: true,
        }
    }
}

/// Labeled list of source links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceList {
    /// List label
    pub label: &'static str,
    /// Links in display order
    pub links: Vec<SourceLink>,
}

/// Everything on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    /// Query input
    pub query_box: QueryBox,
    /// Submit control
    pub submit: SubmitControl,
    /// Present only while a request is outstanding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy: Option<BusyIndicator>,
    /// Output region
    pub report: Report,
    /// Present only for a successful analysis with at least one source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<SourceList>,
}

/// Map a snapshot to the page structure
pub fn render_page(snapshot: &SessionSnapshot) -> PageView {
    let in_flight = snapshot.state.is_in_flight();

    let query_box = QueryBox {
        text: snapshot.query_text.clone(),
        placeholder: QUERY_PLACEHOLDER,
        editable: !in_flight,
    };

    let submit = SubmitControl {
        label: if in_flight {
            SUBMIT_BUSY_LABEL
        } else {
            SUBMIT_LABEL
        },
        enabled: !in_flight,
    };

    let busy = in_flight.then_some(BusyIndicator { text: BUSY_TEXT });

    let body = match &snapshot.state {
        SessionState::Idle => ReportBody::Placeholder {
            document: markdown::render(IDLE_PLACEHOLDER),
        },
        SessionState::InFlight { .. } => ReportBody::Pending,
        SessionState::Succeeded(result) => ReportBody::Narrative {
            document: markdown::render(&result.narrative),
        },
        SessionState::Failed(error) => ReportBody::Error {
            message: error.message.clone(),
        },
    };

    let sources = match snapshot.state.sources() {
        [] => None,
        sources => Some(SourceList {
            label: SOURCES_LABEL,
            links: sources.iter().map(SourceLink::from).collect(),
        }),
    };

    PageView {
        query_box,
        submit,
        busy,
        report: Report {
            heading: REPORT_HEADING,
            body,
        },
        sources,
    }
}

impl SessionSnapshot {
    /// Shorthand for [`render_page`]
    pub fn view(&self) -> PageView {
        render_page(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::Block;
    use analyst_domain::{AnalysisResult, ErrorInfo, Query};

    fn snapshot(state: SessionState) -> SessionSnapshot {
        SessionSnapshot {
            query_text: "x".to_string(),
            state,
        }
    }

    #[test]
    fn test_idle_page() {
        let page = render_page(&SessionSnapshot::default());

        assert!(page.query_box.editable);
        assert_eq!(page.query_box.text, "");
        assert!(page.submit.enabled);
        assert_eq!(page.submit.label, SUBMIT_LABEL);
        assert!(page.busy.is_none());
        assert!(page.sources.is_none());
        match page.report.body {
            ReportBody::Placeholder { document } => {
                assert_eq!(document.plain_text(), IDLE_PLACEHOLDER)
            }
            other => panic!("Expected placeholder, got {:?}", other),
        }
    }

    #[test]
    fn test_in_flight_page_disables_input() {
        let page = render_page(&snapshot(SessionState::InFlight {
            query: Query::parse("x").unwrap(),
        }));

        assert!(!page.query_box.editable);
        assert!(!page.submit.enabled);
        assert_eq!(page.submit.label, SUBMIT_BUSY_LABEL);
        assert_eq!(page.busy, Some(BusyIndicator { text: BUSY_TEXT }));
        assert_eq!(page.report.body, ReportBody::Pending);
        assert!(page.sources.is_none());
    }

    #[test]
    fn test_succeeded_page_with_sources() {
        let page = render_page(&snapshot(SessionState::Succeeded(AnalysisResult::new(
            "**Strong** quarter",
            vec![
                Source::new("https://a.com"),
                Source::new("https://b.com").with_title("B"),
            ],
        ))));

        assert!(page.submit.enabled);
        match &page.report.body {
            ReportBody::Narrative { document } => match &document.blocks[0] {
                Block::Paragraph { spans } => {
                    assert_eq!(spans[0].text, "Strong");
                    assert!(spans[0].style.bold);
                }
                other => panic!("Expected paragraph, got {:?}", other),
            },
            other => panic!("Expected narrative, got {:?}", other),
        }

        let sources = page.sources.expect("source list");
        assert_eq!(sources.label, SOURCES_LABEL);
        assert_eq!(sources.links.len(), 2);
        assert_eq!(sources.links[0].href, "https://a.com");
        assert_eq!(sources.links[0].label, "https://a.com");
        assert_eq!(sources.links[1].label, "B");
        assert!(sources.links.iter().all(|l| l.opens_new_context));
    }

    #[test]
    fn test_succeeded_page_without_sources_has_no_list() {
        let page = render_page(&snapshot(SessionState::Succeeded(
            AnalysisResult::narrative_only("ok"),
        )));
        assert!(page.sources.is_none());
    }

    #[test]
    fn test_failed_page_shows_message_only() {
        let page = render_page(&snapshot(SessionState::Failed(ErrorInfo::new(
            "rate limited",
        ))));

        assert_eq!(
            page.report.body,
            ReportBody::Error {
                message: "rate limited".to_string()
            }
        );
        assert!(page.sources.is_none());
        assert!(page.query_box.editable);
    }

    #[test]
    fn test_json_shape() {
        let page = render_page(&snapshot(SessionState::Failed(ErrorInfo::new("boom"))));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["report"]["body"]["kind"], "error");
        assert_eq!(json["report"]["body"]["message"], "boom");
        assert!(json.get("busy").is_none());
        assert!(json.get("sources").is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use analyst_domain::{AnalysisResult, ErrorInfo};
    use proptest::prelude::*;

    fn arb_state() -> impl Strategy<Value = SessionState> {
        prop_oneof![
            Just(SessionState::Idle),
            ("[ -~]{0,200}", proptest::collection::vec("https://[a-z]{1,10}\\.com", 0..5)).prop_map(
                |(narrative, uris)| {
                    SessionState::Succeeded(AnalysisResult::new(
                        narrative,
                        uris.into_iter().map(Source::new).collect(),
                    ))
                }
            ),
            "[ -~]{0,80}".prop_map(|m| SessionState::Failed(ErrorInfo::new(m))),
        ]
    }

    proptest! {
        /// Property: rendering is idempotent
        #[test]
        fn test_render_twice_is_equal(query_text in "[ -~]{0,40}", state in arb_state()) {
            let snapshot = SessionSnapshot { query_text, state };
            prop_assert_eq!(render_page(&snapshot), render_page(&snapshot));
        }

        /// Property: a source list appears exactly when the state has sources
        #[test]
        fn test_source_list_matches_state(state in arb_state()) {
            let snapshot = SessionSnapshot { query_text: String::new(), state };
            let page = render_page(&snapshot);
            let expected = snapshot.state.sources().len();
            prop_assert_eq!(page.sources.map(|s| s.links.len()).unwrap_or(0), expected);
        }
    }
}
