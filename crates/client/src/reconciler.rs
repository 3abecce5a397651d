use adapter::{DiscussionSource, ForumBackend};
use domain::{
    Discussion, DiscussionId, FeedEvent, FeedResult, ForwardState, ListContext, ViewKind,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::feed::{Feed, LoadOutcome, PageSource};

/// Scoped re-fetch requests. Each one refreshes exactly its own data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Fired after a vote on a digest comment; ranking may have changed.
    Digest,
    /// Fired after a report completes; moderation state may have changed.
    Discussion,
}

/// Holds the digest view and the discussion metadata for one discussion.
///
/// The full view never shares state with it: it receives the held
/// discussion through [`ForwardState`] and paginates on its own.
pub struct Reconciler {
    discussion_id: DiscussionId,
    api: Arc<dyn ForumBackend>,
    digest: Feed,
    discussion: Mutex<Option<Discussion>>,
    events: broadcast::Sender<FeedEvent>,
}

impl Reconciler {
    pub fn new(
        discussion_id: DiscussionId,
        api: Arc<dyn ForumBackend>,
        events: broadcast::Sender<FeedEvent>,
    ) -> Self {
        let digest = Feed::new(ViewKind::Digest, PageSource::Best, api.clone(), events.clone());
        Self {
            discussion_id,
            api,
            digest,
            discussion: Mutex::new(None),
            events,
        }
    }

    pub fn discussion_id(&self) -> DiscussionId {
        self.discussion_id
    }

    pub fn digest(&self) -> &Feed {
        &self.digest
    }

    pub fn discussion(&self) -> Option<Discussion> {
        self.discussion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Initial paint: metadata and digest are fetched side by side.
    pub async fn load(&self) -> FeedResult<()> {
        let (discussion, digest) = futures::join!(
            self.refresh_discussion(),
            self.digest.load_first_page(self.discussion_id)
        );
        if discussion?.is_blocked() {
            debug!(discussion_id = %self.discussion_id, "blocked discussion, digest stays hidden");
            return Ok(());
        }
        digest?;
        Ok(())
    }

    pub async fn fire(&self, trigger: RefreshTrigger) -> FeedResult<()> {
        debug!(discussion_id = %self.discussion_id, ?trigger, "refresh triggered");
        match trigger {
            RefreshTrigger::Digest => self.refresh_digest().await.map(|_| ()),
            RefreshTrigger::Discussion => self.refresh_discussion().await.map(|_| ()),
        }
    }

    pub async fn refresh_digest(&self) -> FeedResult<LoadOutcome> {
        self.digest.refresh(self.discussion_id).await
    }

    pub async fn refresh_discussion(&self) -> FeedResult<Discussion> {
        let fetched = self.api.fetch_discussion(self.discussion_id).await?;
        if self.digest.is_unmounted() {
            return Ok(fetched);
        }
        *self.discussion.lock().unwrap_or_else(PoisonError::into_inner) = Some(fetched.clone());
        info!(
            discussion_id = %self.discussion_id,
            comment_count = fetched.comment_count,
            is_report = fetched.is_report,
            "discussion refreshed"
        );
        let _ = self.events.send(FeedEvent::DiscussionRefreshed(fetched.clone()));
        Ok(fetched)
    }

    /// State handed to the full view so it can paint without a metadata fetch.
    pub fn forward(&self, list: ListContext) -> ForwardState {
        let state = ForwardState::new(self.discussion_id, list);
        match self.discussion() {
            Some(d) => state.with_discussion(d),
            None => state,
        }
    }

    pub fn unmount(&self) {
        self.digest.unmount();
    }
}
