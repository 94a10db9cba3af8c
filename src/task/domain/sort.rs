//! Sort criteria and the title collation they rely on.

use super::{Task, TaskDomainError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Ordering criterion requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortChoice {
    /// Title, A to Z.
    AlphaAsc,
    /// Title, Z to A.
    AlphaDesc,
    /// Deadline, earliest first.
    DateAsc,
    /// Deadline, latest first.
    DateDesc,
}

impl SortChoice {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlphaAsc => "alpha_asc",
            Self::AlphaDesc => "alpha_desc",
            Self::DateAsc => "date_asc",
            Self::DateDesc => "date_desc",
        }
    }

    /// Compares two tasks under this criterion.
    #[must_use]
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::AlphaAsc => collate(a.title(), b.title()),
            Self::AlphaDesc => collate(b.title(), a.title()),
            Self::DateAsc => a.deadline().cmp(&b.deadline()),
            Self::DateDesc => b.deadline().cmp(&a.deadline()),
        }
    }
}

impl FromStr for SortChoice {
    type Err = TaskDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "alpha_asc" => Ok(Self::AlphaAsc),
            "alpha_desc" => Ok(Self::AlphaDesc),
            "date_asc" => Ok(Self::DateAsc),
            "date_desc" => Ok(Self::DateDesc),
            other => Err(TaskDomainError::UnknownSortChoice(other.to_owned())),
        }
    }
}

impl fmt::Display for SortChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compares two strings the way a human reading a list expects.
///
/// Letters compare ignoring case and common Latin accents first, then by
/// accent, then lower case before upper case, then by code point.
///
/// ```
/// use std::cmp::Ordering;
/// use taskboard::task::domain::collate;
///
/// assert_eq!(collate("apple", "Banana"), Ordering::Less);
/// assert_eq!(collate("a", "A"), Ordering::Less);
/// assert_eq!(collate("été", "ete"), Ordering::Greater);
/// ```
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| lowered(a).cmp(lowered(b)))
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

fn lowered(value: &str) -> impl Iterator<Item = char> + '_ {
    value.chars().flat_map(char::to_lowercase)
}

fn primary_key(value: &str) -> impl Iterator<Item = char> + '_ {
    lowered(value).map(fold_accent)
}

fn case_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(left, right)| left != right)
        .map_or(Ordering::Equal, |(left, right)| {
            match (left.is_lowercase(), right.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        })
}

const fn fold_accent(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
