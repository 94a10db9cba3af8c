//! Category labels and their normalized identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized category identifier.
///
/// Labels that normalize to the same identifier are the same category for
/// filtering and removal. The empty identifier is the implicit
/// "no category" bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Normalizes a raw label into its identifier.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self(normalize(Some(label)))
    }

    /// Returns the "no category" identifier.
    #[must_use]
    pub const fn uncategorized() -> Self {
        Self(String::new())
    }

    /// Returns `true` for the "no category" identifier.
    #[must_use]
    pub const fn is_uncategorized(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CategoryId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A label bucket derived from the tasks that reference it.
///
/// The first-seen raw label is what gets displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    label: String,
    id: CategoryId,
}

impl Category {
    /// Creates a category from a raw label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let id = CategoryId::from_label(&label);
        Self { label, id }
    }

    /// Returns the raw label as first typed.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the normalized identifier.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        &self.id
    }
}

/// Normalizes a category label.
///
/// Whitespace runs collapse to one space, surrounding whitespace is
/// dropped and the result is lower-cased. A missing label maps to the
/// empty identifier.
///
/// ```
/// use taskboard::task::domain::normalize;
///
/// assert_eq!(normalize(Some(" Cat1  ")), "cat1");
/// assert_eq!(normalize(Some("Day   Job")), "day job");
/// assert_eq!(normalize(None), "");
/// ```
#[must_use]
pub fn normalize(label: Option<&str>) -> String {
    label
        .map(|raw| {
            raw.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
        })
        .unwrap_or_default()
}
