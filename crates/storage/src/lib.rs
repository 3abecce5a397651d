use domain::{DiscussionId, ViewKind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[cfg(test)]
mod fixtures;
mod repo;
mod state;

pub use repo::pages::{ApplyOutcome, LoadKind, LoadTicket};
pub use state::FeedSnapshot;

use state::FeedState;

/// In-memory comment collection for one view.
///
/// Cheap to clone; clones share the same state. The lock is only held for
/// short synchronous sections and never across an `.await`.
#[derive(Clone)]
pub struct FeedStore {
    pub(crate) inner: Arc<Mutex<FeedState>>,
    view: ViewKind,
}

impl FeedStore {
    pub fn new(view: ViewKind) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FeedState::default())),
            view,
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.lock().snapshot()
    }

    pub fn discussion_id(&self) -> Option<DiscussionId> {
        self.lock().discussion_id
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn has_next(&self) -> bool {
        self.lock().has_next
    }

    pub fn total_elements(&self) -> u64 {
        self.lock().total_elements
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// The end-of-list marker exists only for a non-empty feed that is not loading.
    pub fn sentinel_mounted(&self) -> bool {
        let st = self.lock();
        !st.closed && st.total_elements > 0 && !st.is_loading
    }

    /// Tears the view down. Results arriving afterwards are discarded.
    pub fn close(&self) {
        let mut st = self.lock();
        st.closed = true;
        st.generation += 1;
        tracing::debug!(view = ?self.view, "feed store closed");
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
