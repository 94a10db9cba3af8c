//! Status buckets and the single-trigger advance state machine.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Work state of a task. Every task sits in exactly one bucket.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Pending,
    /// Work is under way.
    Progress,
    /// Work is finished.
    Completed,
}

impl TaskStatus {
    /// All buckets in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Progress, Self::Completed];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Progress => "progress",
            Self::Completed => "completed",
        }
    }

    /// Returns the destination of the advance trigger, or `None` when the
    /// trigger is a no-op for this state.
    #[must_use]
    pub const fn advance(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Progress),
            Self::Progress => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Returns the effect played when leaving this state, if any.
    #[must_use]
    pub const fn advance_effect(self) -> Option<EffectKind> {
        match self {
            Self::Pending => Some(EffectKind::Advance),
            Self::Progress => Some(EffectKind::Complete),
            Self::Completed => None,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "progress" => Ok(Self::Progress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded-duration visual effect the view plays before a task moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Pending to progress (swipe right).
    Advance,
    /// Progress to completed (swipe left).
    Complete,
    /// Task deletion.
    Remove,
}
