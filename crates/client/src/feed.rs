use adapter::{CommentSource, ForumBackend};
use domain::{Comment, DiscussionId, FeedEvent, FeedResult, ViewKind};
use std::sync::Arc;
use storage::{ApplyOutcome, FeedSnapshot, FeedStore, LoadTicket};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How a view gets its comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// Cursor-paginated list endpoint.
    Paginated,
    /// Top-ranked comments, fetched wholesale.
    Best,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { appended: usize },
    /// The guard was held or there was nothing left to load.
    Skipped,
    /// The view was reset or unmounted before the response arrived.
    Discarded,
}

/// One view's comment feed: a store plus the endpoint that fills it.
#[derive(Clone)]
pub struct Feed {
    store: FeedStore,
    source: PageSource,
    api: Arc<dyn ForumBackend>,
    events: broadcast::Sender<FeedEvent>,
    unmounted: CancellationToken,
}

impl Feed {
    pub fn new(
        view: ViewKind,
        source: PageSource,
        api: Arc<dyn ForumBackend>,
        events: broadcast::Sender<FeedEvent>,
    ) -> Self {
        Self {
            store: FeedStore::new(view),
            source,
            api,
            events,
            unmounted: CancellationToken::new(),
        }
    }

    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.store.snapshot()
    }

    pub fn view(&self) -> ViewKind {
        self.store.view()
    }

    pub fn unmounted(&self) -> CancellationToken {
        self.unmounted.clone()
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted.is_cancelled()
    }

    /// Tears the view down; anything still in flight is dropped on arrival.
    pub fn unmount(&self) {
        self.store.close();
        self.unmounted.cancel();
    }

    pub async fn load_first_page(&self, discussion_id: DiscussionId) -> FeedResult<LoadOutcome> {
        let Some(ticket) = self.store.begin_first_page(discussion_id) else {
            return Ok(LoadOutcome::Skipped);
        };
        self.emit_reset(discussion_id);
        self.complete(ticket).await
    }

    pub async fn load_next_page(&self) -> FeedResult<LoadOutcome> {
        let Some(ticket) = self.store.begin_next_page() else {
            return Ok(LoadOutcome::Skipped);
        };
        self.complete(ticket).await
    }

    /// Drops every loaded item and starts again from the first page,
    /// superseding any load in flight.
    pub async fn invalidate_and_reload(&self, discussion_id: DiscussionId) -> FeedResult<LoadOutcome> {
        let Some(ticket) = self.store.begin_reload(discussion_id) else {
            return Ok(LoadOutcome::Skipped);
        };
        self.emit_reset(discussion_id);
        self.complete(ticket).await
    }

    /// Wholesale re-fetch that keeps the current items on screen until the
    /// new ones arrive. A refresh requested while one is in flight is folded
    /// into a single follow-up fetch.
    pub async fn refresh(&self, discussion_id: DiscussionId) -> FeedResult<LoadOutcome> {
        let Some(mut ticket) = self.store.begin_refresh(discussion_id) else {
            return Ok(LoadOutcome::Skipped);
        };
        loop {
            let outcome = self.complete(ticket).await;
            match self.store.continue_refresh(discussion_id) {
                Some(next) => ticket = next,
                None => return outcome,
            }
        }
    }

    /// Patches vote counts of an already-loaded comment.
    pub fn merge_vote_result(&self, updated: &Comment) -> Option<Comment> {
        let merged = self.store.merge_vote(updated)?;
        let _ = self.events.send(FeedEvent::CommentUpdated {
            view: self.view(),
            comment: merged.clone(),
        });
        Some(merged)
    }

    /// Second half of a load whose guard was already taken.
    pub(crate) async fn complete(&self, ticket: LoadTicket) -> FeedResult<LoadOutcome> {
        let discussion_id = ticket.discussion_id;
        let result = match self.source {
            PageSource::Paginated => self
                .api
                .fetch_page(discussion_id, ticket.cursor.clone())
                .await
                .map(|page| self.store.apply_page(&ticket, page)),
            PageSource::Best => self
                .api
                .fetch_best(discussion_id)
                .await
                .map(|items| self.store.replace_all(&ticket, items)),
        };

        match result {
            Ok(ApplyOutcome::Applied { appended }) => {
                let _ = self.events.send(FeedEvent::PageApplied {
                    view: self.view(),
                    discussion_id,
                    appended,
                    total_elements: self.store.total_elements(),
                    has_next: self.store.has_next(),
                });
                Ok(LoadOutcome::Applied { appended })
            }
            Ok(ApplyOutcome::Discarded) => Ok(LoadOutcome::Discarded),
            Err(e) => {
                if self.store.fail_load(&ticket) == ApplyOutcome::Discarded {
                    info!(view = ?self.view(), %discussion_id, "failed load for a superseded view ignored");
                    return Ok(LoadOutcome::Discarded);
                }
                warn!(view = ?self.view(), %discussion_id, error = %e, "comment load failed");
                let _ = self.events.send(FeedEvent::LoadFailed {
                    view: self.view(),
                    discussion_id,
                    error: e.clone(),
                });
                Err(e)
            }
        }
    }

    fn emit_reset(&self, discussion_id: DiscussionId) {
        let _ = self.events.send(FeedEvent::FeedReset {
            view: self.view(),
            discussion_id,
        });
    }
}
