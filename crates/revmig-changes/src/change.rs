//! Origin changes
//!
//! Provides [`Change`], one origin revision consumed by a migration run,
//! and [`ChangeId`], its opaque reference.

use crate::author::Author;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Opaque origin reference (commit sha, changelist number, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    /// Create new id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw reference string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ChangeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChangeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One origin revision
///
/// Immutable once built. Labels keep insertion order and may repeat,
/// so each name maps to every value seen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    id: ChangeId,
    author: Author,
    message: String,
    date: DateTime<Utc>,
    #[serde(default)]
    labels: IndexMap<String, Vec<String>>,
}

impl Change {
    /// Create new change without labels
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<ChangeId>,
        author: Author,
        message: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            author,
            message: message.into(),
            date,
            labels: IndexMap::new(),
        }
    }

    /// Add a label value, returning the updated change
    #[inline]
    #[must_use]
    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Origin reference
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ChangeId {
        &self.id
    }

    /// Author
    #[inline]
    #[must_use]
    pub fn author(&self) -> &Author {
        &self.author
    }

    /// Full message
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, trimmed
    #[inline]
    #[must_use]
    pub fn first_line_message(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// Commit date
    #[inline]
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// All labels
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &IndexMap<String, Vec<String>> {
        &self.labels
    }

    /// Last value of a label, if present
    #[inline]
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .get(name)
            .and_then(|values| values.last())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn change() -> Change {
        Change::new(
            "abc123",
            Author::new("Jane", "jane@example.com"),
            "  Fix parser\n\nLonger body",
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        )
    }

    #[test]
    fn change_accessors() {
        let c = change();
        assert_eq!(c.id().as_str(), "abc123");
        assert_eq!(c.author().name(), "Jane");
        assert_eq!(c.first_line_message(), "Fix parser");
        assert!(c.labels().is_empty());
    }

    #[test]
    fn label_last_value_wins() {
        let c = change()
            .with_label("BUG", "1")
            .with_label("REVIEWER", "bob")
            .with_label("BUG", "2");

        assert_eq!(c.label("BUG"), Some("2"));
        assert_eq!(c.labels()["BUG"], vec!["1", "2"]);
        assert_eq!(c.label("MISSING"), None);
    }

    #[test]
    fn first_line_of_empty_message() {
        let c = Change::new("x", Author::new("a", ""), "", Utc::now());
        assert_eq!(c.first_line_message(), "");
    }

    #[test]
    fn change_serde_roundtrip() {
        let c = change().with_label("BUG", "7");
        let json = serde_json::to_string(&c).unwrap();
        let back: Change = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
