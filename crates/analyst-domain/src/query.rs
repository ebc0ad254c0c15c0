//! Query module - validated snapshots of user-entered text

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Returned when the query text is empty once surrounding whitespace is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("query text is empty")]
pub struct EmptyQuery;

/// A query that is allowed to go out to the endpoint.
///
/// The text is kept exactly as the user typed it; only the blank check uses
/// the trimmed form. Holding a `Query` is proof the text was not blank when
/// the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Snapshot `text` as a query, rejecting blank input
    ///
    /// # Examples
    ///
    /// ```
    /// use analyst_domain::Query;
    ///
    /// let query = Query::parse("  Summarize Tesla's last quarter ").unwrap();
    /// assert_eq!(query.as_str(), "  Summarize Tesla's last quarter ");
    ///
    /// assert!(Query::parse(" \t\n").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, EmptyQuery> {
        if is_blank(text) {
            return Err(EmptyQuery);
        }
        Ok(Self(text.to_string()))
    }

    /// Get the query text as typed
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the query text in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a `Query` can never be blank
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// True when `text` has nothing but whitespace in it
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: whitespace-only text never becomes a query
        #[test]
        fn test_whitespace_never_parses(text in "[ \t\r\n\u{000B}\u{000C}\u{2003}]*") {
            prop_assert!(Query::parse(&text).is_err());
        }

        /// Property: any text with a visible character parses and is kept as typed
        #[test]
        fn test_visible_text_parses(prefix in "[ \t]*", body in "[a-zA-Z0-9?'.]{1,40}", suffix in "[ \n]*") {
            let text = format!("{prefix}{body}{suffix}");
            let query = Query::parse(&text).unwrap();
            prop_assert_eq!(query.as_str(), text.as_str());
        }
    }
}
