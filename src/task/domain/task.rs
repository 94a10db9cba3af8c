//! Task record and its editable content.

use super::{CategoryId, SortIndex, TaskDomainError, TaskId, TaskStatus};
use chrono::{NaiveDate, NaiveTime};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Storage and command-line format of deadlines.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` deadline.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDeadline`] when the value is not a
/// calendar date in that format.
pub fn parse_deadline(value: &str) -> Result<NaiveDate, TaskDomainError> {
    NaiveDate::parse_from_str(value.trim(), DEADLINE_FORMAT)
        .map_err(|_| TaskDomainError::InvalidDeadline(value.to_owned()))
}

/// User-editable content of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskData {
    /// Display name. Not validated.
    pub title: String,
    /// Free-text category; empty means uncategorized.
    #[serde(default)]
    pub category: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Calendar deadline.
    pub deadline: NaiveDate,
    /// Urgent flag.
    #[serde(default)]
    pub urgent: bool,
    /// Highlight flag.
    #[serde(default)]
    pub highlight: bool,
}

impl TaskData {
    /// Creates content with the required fields and everything else empty.
    #[must_use]
    pub fn new(title: impl Into<String>, deadline: NaiveDate) -> Self {
        Self {
            title: title.into(),
            category: String::new(),
            description: String::new(),
            deadline,
            urgent: false,
            highlight: false,
        }
    }

    /// Sets the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the urgent flag.
    #[must_use]
    pub const fn with_urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    /// Sets the highlight flag.
    #[must_use]
    pub const fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Returns the normalized category identifier.
    #[must_use]
    pub fn category_id(&self) -> CategoryId {
        CategoryId::from_label(&self.category)
    }
}

/// A tracked unit of work.
///
/// The outdated marker is derived when the record is built from content
/// and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    #[serde(flatten)]
    data: TaskData,
    status: TaskStatus,
    sort_index: SortIndex,
    #[serde(skip)]
    outdated: bool,
}

impl Task {
    /// Creates a task and stamps its outdated marker against `clock`.
    #[must_use]
    pub fn new(
        id: TaskId,
        data: TaskData,
        status: TaskStatus,
        sort_index: SortIndex,
        clock: &impl Clock,
    ) -> Self {
        let outdated = is_past(data.deadline, clock);
        Self {
            id,
            data,
            status,
            sort_index,
            outdated,
        }
    }

    /// Returns a copy carrying new content. Status and rank are kept and
    /// the outdated marker is re-derived.
    #[must_use]
    pub fn with_data(&self, data: TaskData, clock: &impl Clock) -> Self {
        Self::new(self.id, data, self.status, self.sort_index, clock)
    }

    /// Returns a copy in another bucket. The outdated marker is kept.
    #[must_use]
    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Returns a copy with another rank.
    #[must_use]
    pub fn with_sort_index(&self, sort_index: SortIndex) -> Self {
        Self {
            sort_index,
            ..self.clone()
        }
    }

    /// Re-derives the outdated marker, used after loading from storage.
    pub fn restamp(&mut self, clock: &impl Clock) {
        self.outdated = is_past(self.data.deadline, clock);
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the editable content.
    #[must_use]
    pub const fn data(&self) -> &TaskData {
        &self.data
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.data.title
    }

    /// Returns the raw category label.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.data.category
    }

    /// Returns the normalized category identifier.
    #[must_use]
    pub fn category_id(&self) -> CategoryId {
        self.data.category_id()
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> NaiveDate {
        self.data.deadline
    }

    /// Returns the status bucket.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the persisted rank.
    #[must_use]
    pub const fn sort_index(&self) -> SortIndex {
        self.sort_index
    }

    /// Returns whether the deadline had passed when the marker was stamped.
    #[must_use]
    pub const fn is_outdated(&self) -> bool {
        self.outdated
    }
}

/// A deadline counts from the start of its day in UTC.
fn is_past(deadline: NaiveDate, clock: &impl Clock) -> bool {
    deadline.and_time(NaiveTime::MIN).and_utc() < clock.utc()
}
