//! Derived index of the categories referenced by tasks.

use crate::task::domain::{Category, CategoryId};
use tracing::debug;

/// Categories currently referenced by at least one task, in first-seen
/// order.
///
/// The index never owns tasks. Removal asks the caller whether any task
/// still references the identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    categories: Vec<Category>,
}

impl CategoryIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Tracks the category of `label` if it is not tracked yet.
    ///
    /// Returns the category when it was just created. The "no category"
    /// bucket is never tracked.
    pub fn ensure(&mut self, label: &str) -> Option<Category> {
        let category = Category::new(label);
        if category.id().is_uncategorized() || self.contains(category.id()) {
            return None;
        }
        debug!(category = %category.id(), label, "category created");
        self.categories.push(category.clone());
        Some(category)
    }

    /// Drops the category of `label` unless `is_referenced` still reports a
    /// task for it.
    ///
    /// Returns the category when it was just removed.
    pub fn reconcile(
        &mut self,
        label: &str,
        is_referenced: impl Fn(&CategoryId) -> bool,
    ) -> Option<Category> {
        let id = CategoryId::from_label(label);
        if id.is_uncategorized() || is_referenced(&id) {
            return None;
        }
        let position = self
            .categories
            .iter()
            .position(|category| category.id() == &id)?;
        let removed = self.categories.remove(position);
        debug!(category = %id, "category removed");
        Some(removed)
    }

    /// Returns whether `id` is tracked.
    #[must_use]
    pub fn contains(&self, id: &CategoryId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the tracked category for `id`.
    #[must_use]
    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id() == id)
    }

    /// Returns the tracked categories in first-seen order.
    #[must_use]
    pub const fn categories(&self) -> &[Category] {
        self.categories.as_slice()
    }

    /// Returns the number of tracked categories.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` when no category is tracked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
