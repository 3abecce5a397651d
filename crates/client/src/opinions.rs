//! Controller for the full, paginated opinions list of one discussion.

use adapter::{CommentMutations, DiscussionSource, ForumBackend};
use domain::{
    Comment, CommentId, Discussion, DiscussionId, FeedError, FeedEvent, FeedResult, ForwardState,
    ListContext, MutationCommand, Navigation, NewComment, Reaction, Route, ViewKind, VoteType,
};
use std::sync::Arc;
use storage::FeedSnapshot;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::feed::{Feed, LoadOutcome, PageSource};
use crate::loader::SentinelLoader;
use crate::selection::{ReportResolution, ReportTarget, Selection};
use crate::session::Viewer;

pub struct OpinionsController {
    discussion_id: DiscussionId,
    api: Arc<dyn ForumBackend>,
    feed: Feed,
    discussion: Option<Discussion>,
    viewer: Viewer,
    list: ListContext,
    selection: Selection,
    events: broadcast::Sender<FeedEvent>,
}

impl OpinionsController {
    pub fn new(
        api: Arc<dyn ForumBackend>,
        viewer: Viewer,
        state: ForwardState,
        events: broadcast::Sender<FeedEvent>,
    ) -> Self {
        let feed = Feed::new(
            ViewKind::Full,
            PageSource::Paginated,
            api.clone(),
            events.clone(),
        );
        Self {
            discussion_id: state.discussion_id,
            api,
            feed,
            discussion: state.discussion,
            viewer,
            list: state.list,
            selection: Selection::default(),
            events,
        }
    }

    /// First paint. Metadata is only fetched when it was not forwarded.
    pub async fn mount(&mut self) -> FeedResult<LoadOutcome> {
        if self.discussion.is_none() {
            let fetched = self.api.fetch_discussion(self.discussion_id).await?;
            self.store_discussion(fetched);
        }
        self.feed.load_first_page(self.discussion_id).await
    }

    /// Route re-entry with another discussion: selections close and the
    /// feed starts over.
    pub async fn switch_discussion(&mut self, state: ForwardState) -> FeedResult<LoadOutcome> {
        self.selection.clear();
        self.discussion_id = state.discussion_id;
        self.discussion = state.discussion;
        self.list = state.list;
        self.mount().await
    }

    pub fn unmount(&mut self) {
        self.selection.clear();
        self.feed.unmount();
    }

    pub fn discussion_id(&self) -> DiscussionId {
        self.discussion_id
    }

    pub fn discussion(&self) -> Option<&Discussion> {
        self.discussion.as_ref()
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.feed.snapshot()
    }

    /// Count shown in the screen title.
    pub fn total_elements(&self) -> u64 {
        self.feed.store().total_elements()
    }

    pub fn loader(&self) -> SentinelLoader {
        SentinelLoader::new(self.feed.clone())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Composers stay hidden on completed discussions.
    pub fn can_compose(&self) -> bool {
        self.discussion.as_ref().map_or(true, |d| d.accepts_comments())
    }

    pub fn can_report(&self) -> bool {
        self.discussion
            .as_ref()
            .map_or(true, |d| self.viewer.can_report(d))
    }

    pub async fn load_next_page(&self) -> FeedResult<LoadOutcome> {
        self.feed.load_next_page().await
    }

    /// Votes and patches the full list only; the digest is not touched.
    pub async fn vote(&self, comment_id: CommentId, reaction: Reaction) -> FeedResult<Comment> {
        let updated = self
            .api
            .submit(MutationCommand::Vote {
                comment_id,
                reaction,
            })
            .await?;
        self.feed.merge_vote_result(&updated);
        Ok(updated)
    }

    pub async fn submit_comment(&mut self, vote_type: VoteType, body: &str) -> FeedResult<LoadOutcome> {
        self.ensure_composable()?;
        let created = self
            .api
            .submit(MutationCommand::CreateComment(NewComment::new(
                self.discussion_id,
                vote_type,
                body,
            )))
            .await?;
        info!(discussion_id = %self.discussion_id, comment_id = %created.comment_id, "comment created");
        self.selection.close_reply();
        self.feed.invalidate_and_reload(self.discussion_id).await
    }

    pub fn toggle_reply(&mut self, comment_id: CommentId) {
        self.selection.toggle_reply(comment_id);
    }

    /// Posts a reply to the comment whose composer is open, then reloads
    /// from the first page since reply placement is decided by the server.
    pub async fn submit_reply(&mut self, vote_type: VoteType, body: &str) -> FeedResult<LoadOutcome> {
        self.ensure_composable()?;
        let parent_comment_id = self.selection.active_reply_target().ok_or_else(|| {
            FeedError::InvalidArgument("no reply composer is open".to_string())
        })?;
        let created = self
            .api
            .submit(MutationCommand::CreateReply {
                parent_comment_id,
                comment: NewComment::new(self.discussion_id, vote_type, body),
            })
            .await?;
        info!(
            discussion_id = %self.discussion_id,
            %parent_comment_id,
            comment_id = %created.comment_id,
            "reply created"
        );
        self.selection.close_reply();
        self.feed.invalidate_and_reload(self.discussion_id).await
    }

    pub fn on_report_requested(&mut self, comment_id: CommentId) {
        self.selection.open_report(ReportTarget::Comment(comment_id));
    }

    pub async fn on_report_resolved(&mut self, resolution: ReportResolution) -> FeedResult<()> {
        if self.selection.resolve_report(&resolution).is_none() {
            return Ok(());
        }
        match self.api.fetch_discussion(self.discussion_id).await {
            Ok(d) => {
                self.store_discussion(d);
                Ok(())
            }
            Err(e) => {
                warn!(discussion_id = %self.discussion_id, error = %e, "metadata refresh after report failed");
                Err(e)
            }
        }
    }

    /// Back to the detail screen matching the discussion's status.
    pub fn back(&self) -> Navigation {
        let completed = self.discussion.as_ref().is_some_and(|d| d.is_completed());
        let route = if completed {
            Route::CompletedDetail(self.discussion_id)
        } else {
            Route::InProgressDetail(self.discussion_id)
        };
        let mut state = ForwardState::new(self.discussion_id, self.list.clone());
        state.discussion = self.discussion.clone();
        Navigation { route, state }
    }

    /// Late metadata for an unmounted view is dropped.
    fn store_discussion(&mut self, discussion: Discussion) {
        if self.feed.is_unmounted() {
            return;
        }
        self.discussion = Some(discussion.clone());
        let _ = self.events.send(FeedEvent::DiscussionRefreshed(discussion));
    }

        fn ensure_composable(&self) -> FeedResult<()> {
        if self.can_compose() {
            Ok(())
        } else {
            Err(FeedError::InvalidArgument(
                "discussion is not accepting comments".to_string(),
            ))
        }
    }
}
