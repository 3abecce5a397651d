use domain::FeedResult;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::feed::{Feed, LoadOutcome};

/// What the renderer reports about the end-of-list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelEvent {
    Visible,
    Hidden,
}

/// Turns sentinel visibility into next-page loads, at most one at a time.
#[derive(Clone)]
pub struct SentinelLoader {
    feed: Feed,
}

impl SentinelLoader {
    pub fn new(feed: Feed) -> Self {
        Self { feed }
    }

    /// Whether the sentinel is currently observed. It is detached while a
    /// page is in flight, never mounted for an empty feed, and gone for good
    /// once the last page has arrived.
    pub fn is_attached(&self) -> bool {
        let store = self.feed.store();
        store.sentinel_mounted() && store.has_next()
    }

    /// Handles one visibility event. Returns the spawned load, if any.
    ///
    /// The guard is taken before spawning, so events arriving while the
    /// load runs find the sentinel detached and are dropped.
    pub fn on_visible(&self) -> Option<JoinHandle<FeedResult<LoadOutcome>>> {
        if !self.is_attached() {
            debug!(view = ?self.feed.view(), "sentinel detached, visibility ignored");
            return None;
        }
        let ticket = self.feed.store().begin_next_page()?;
        let feed = self.feed.clone();
        Some(tokio::spawn(async move { feed.complete(ticket).await }))
    }

    /// Consumes visibility events until the stream closes or the view unmounts.
    /// Returns how many loads were started.
    pub async fn run(self, mut events: mpsc::Receiver<SentinelEvent>) -> usize {
        let unmounted = self.feed.unmounted();
        let mut started = 0;
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(SentinelEvent::Visible) => {
                        if self.on_visible().is_some() {
                            started += 1;
                        }
                    }
                    Some(SentinelEvent::Hidden) => {}
                    None => break,
                },
                _ = unmounted.cancelled() => break,
            }
        }
        debug!(view = ?self.feed.view(), started, "sentinel loader stopped");
        started
    }
}
