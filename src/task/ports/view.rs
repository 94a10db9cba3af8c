//! View-layer port: the display collaborator the task store drives.
//!
//! The store never knows how tasks are drawn. It obtains an opaque
//! [`ViewHandle`] per task and hands it back for later updates, effects and
//! removal.

use crate::task::domain::{Category, EffectKind, Task};
use async_trait::async_trait;
use std::fmt;

/// Opaque display handle issued by a [`TaskView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(u64);

impl ViewHandle {
    /// Wraps a view-specific handle value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the view-specific handle value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display contract used by the task store.
#[async_trait]
pub trait TaskView: Send + Sync {
    /// Draws a newly admitted task in its status bucket.
    fn render(&self, task: &Task) -> ViewHandle;

    /// Redraws a task after its content or bucket changed.
    fn refresh(&self, handle: ViewHandle, task: &Task);

    /// Drops the display element of a removed task. The handle is not used
    /// again afterwards.
    fn detach(&self, handle: ViewHandle);

    /// Plays a bounded-duration effect and resolves once it has finished.
    async fn play_effect(&self, handle: ViewHandle, kind: EffectKind);

    /// Announces a category that became referenced.
    fn notify_category_created(&self, category: &Category);

    /// Announces a category that is no longer referenced.
    fn notify_category_removed(&self, category: &Category);
}
