//! Controller for the in-progress discussion screen: metadata, the
//! best-comments digest and the top-level composer.

use adapter::{CommentMutations, ForumBackend};
use domain::{
    Comment, CommentId, Discussion, FeedError, FeedEvent, FeedResult, ForwardState, ListContext,
    MutationCommand, Navigation, NewComment, Reaction, Route, VoteType,
};
use std::sync::Arc;
use storage::FeedSnapshot;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::reconciler::{Reconciler, RefreshTrigger};
use crate::selection::{ReportResolution, ReportTarget, Selection};
use crate::session::Viewer;

pub struct DetailController {
    api: Arc<dyn ForumBackend>,
    reconciler: Reconciler,
    viewer: Viewer,
    list: ListContext,
    selection: Selection,
}

impl DetailController {
    pub fn new(
        api: Arc<dyn ForumBackend>,
        viewer: Viewer,
        state: ForwardState,
        events: broadcast::Sender<FeedEvent>,
    ) -> Self {
        let reconciler = Reconciler::new(state.discussion_id, api.clone(), events);
        Self {
            api,
            reconciler,
            viewer,
            list: state.list,
            selection: Selection::default(),
        }
    }

    pub async fn mount(&self) -> FeedResult<()> {
        self.reconciler.load().await
    }

    pub fn unmount(&mut self) {
        self.selection.clear();
        self.reconciler.unmount();
    }

    pub fn discussion(&self) -> Option<Discussion> {
        self.reconciler.discussion()
    }

    pub fn best_comments(&self) -> FeedSnapshot {
        self.reconciler.digest().snapshot()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Blocked discussions hide their body, digest and composer.
    pub fn is_hidden(&self) -> bool {
        self.discussion().is_some_and(|d| d.is_blocked())
    }

    pub fn can_compose(&self) -> bool {
        self.discussion().is_some_and(|d| d.accepts_comments())
    }

    pub fn can_report(&self) -> bool {
        self.discussion().is_some_and(|d| self.viewer.can_report(&d))
    }

    /// Votes on a digest comment, then re-ranks the digest.
    pub async fn vote(&self, comment_id: CommentId, reaction: Reaction) -> FeedResult<Comment> {
        let updated = self
            .api
            .submit(MutationCommand::Vote {
                comment_id,
                reaction,
            })
            .await?;
        self.reconciler.digest().merge_vote_result(&updated);
        if let Err(e) = self.reconciler.fire(RefreshTrigger::Digest).await {
            warn!(%comment_id, error = %e, "digest refresh after vote failed");
        }
        Ok(updated)
    }

    /// Posts a top-level comment and hands over to the full list.
    pub async fn submit_comment(&self, vote_type: VoteType, body: &str) -> FeedResult<Navigation> {
        if !self.can_compose() {
            return Err(FeedError::InvalidArgument(
                "discussion is not accepting comments".to_string(),
            ));
        }
        let discussion_id = self.reconciler.discussion_id();
        let created = self
            .api
            .submit(MutationCommand::CreateComment(NewComment::new(
                discussion_id,
                vote_type,
                body,
            )))
            .await?;
        info!(%discussion_id, comment_id = %created.comment_id, "comment created");

        if let Err(e) = self.reconciler.fire(RefreshTrigger::Discussion).await {
            warn!(%discussion_id, error = %e, "metadata refresh after comment failed");
        }
        Ok(self.open_full_view())
    }

    /// `None` reports the discussion itself.
    pub fn on_report_requested(&mut self, comment_id: Option<CommentId>) -> bool {
        if comment_id.is_none() && !self.can_report() {
            return false;
        }
        let target = comment_id.map_or(ReportTarget::Discussion, ReportTarget::Comment);
        self.selection.open_report(target);
        true
    }

    pub async fn on_report_resolved(&mut self, resolution: ReportResolution) -> FeedResult<()> {
        if self.selection.resolve_report(&resolution).is_none() {
            return Ok(());
        }
        self.reconciler.fire(RefreshTrigger::Discussion).await
    }

    pub fn open_full_view(&self) -> Navigation {
        Navigation {
            route: Route::Opinions(self.reconciler.discussion_id()),
            state: self.reconciler.forward(self.list.clone()),
        }
    }

    pub fn back(&self) -> Navigation {
        Navigation {
            route: Route::DiscussionList,
            state: ForwardState::new(self.reconciler.discussion_id(), self.list.clone()),
        }
    }
}
