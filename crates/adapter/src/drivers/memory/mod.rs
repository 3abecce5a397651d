//! Process-local backend with the same rules as the real forum API.
//!
//! Used by the CLI in offline mode and by tests that need realistic
//! pagination and vote toggling without a server.

mod seed;
mod state;

use async_trait::async_trait;
use domain::{
    Comment, CommentId, Cursor, Discussion, DiscussionId, FeedError, FeedResult, NewComment,
    Page, Reaction,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

use crate::traits::{CommentMutations, CommentSource, DiscussionSource};
use state::MemoryState;

#[derive(Clone, Debug)]
pub struct MemoryConfig {
    pub page_size: usize,
    pub best_limit: usize,
    /// Nickname of the signed-in viewer. `None` rejects every write.
    pub viewer: Option<String>,
    pub seed_demo: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            best_limit: 3,
            viewer: Some("guest".to_string()),
            seed_demo: false,
        }
    }
}

#[derive(Clone)]
pub struct MemoryForum {
    inner: Arc<Mutex<MemoryState>>,
    config: MemoryConfig,
}

impl MemoryForum {
    pub fn new(config: MemoryConfig) -> Self {
        let mut state = MemoryState::default();
        if config.seed_demo {
            seed::demo(&mut state);
            info!(
                discussions = state.discussions.len(),
                comments = state.comments.len(),
                "memory backend seeded"
            );
        }
        Self {
            inner: Arc::new(Mutex::new(state)),
            config,
        }
    }

    pub fn insert_discussion(&self, discussion: Discussion) {
        self.lock()
            .discussions
            .insert(discussion.discussion_id, discussion);
    }

    /// Stores a comment as-is, keeping its id. Used to seed fixtures.
    pub fn insert_comment(&self, comment: Comment) {
        self.lock().insert(comment);
    }

    pub fn delete_comment(&self, comment_id: CommentId) -> bool {
        self.lock().remove(comment_id)
    }

    /// Stands in for the external report modal submitting a report.
    pub fn mark_reported(&self, discussion_id: DiscussionId) {
        if let Some(d) = self.lock().discussions.get_mut(&discussion_id) {
            d.is_report = true;
        }
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    pub fn best_calls(&self) -> usize {
        self.lock().best_calls
    }

    pub fn discussion_calls(&self) -> usize {
        self.lock().discussion_calls
    }

    fn viewer(&self) -> FeedResult<&str> {
        self.config
            .viewer
            .as_deref()
            .ok_or_else(|| FeedError::Unauthorized("sign in to continue".to_string()))
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CommentSource for MemoryForum {
    async fn fetch_page(
        &self,
        discussion_id: DiscussionId,
        cursor: Option<Cursor>,
    ) -> FeedResult<Page> {
        let mut st = self.lock();
        st.list_calls += 1;
        st.visible_discussion(discussion_id)?;
        st.page(discussion_id, cursor.as_ref(), self.config.page_size)
    }

    async fn fetch_best(&self, discussion_id: DiscussionId) -> FeedResult<Vec<Comment>> {
        let mut st = self.lock();
        st.best_calls += 1;
        st.visible_discussion(discussion_id)?;
        Ok(st.best(discussion_id, self.config.best_limit))
    }
}

#[async_trait]
impl DiscussionSource for MemoryForum {
    async fn fetch_discussion(&self, discussion_id: DiscussionId) -> FeedResult<Discussion> {
        let mut st = self.lock();
        st.discussion_calls += 1;
        st.discussions
            .get(&discussion_id)
            .cloned()
            .ok_or_else(|| FeedError::NotFound(format!("discussion {}", discussion_id)))
    }
}

#[async_trait]
impl CommentMutations for MemoryForum {
    async fn vote(&self, comment_id: CommentId, reaction: Reaction) -> FeedResult<Comment> {
        self.viewer()?;
        self.lock().toggle_vote(comment_id, reaction)
    }

    async fn create_comment(&self, comment: &NewComment) -> FeedResult<Comment> {
        let author = self.viewer()?.to_string();
        comment.validate()?;
        self.lock().create(comment, None, author)
    }

    async fn create_reply(
        &self,
        parent_comment_id: CommentId,
        comment: &NewComment,
    ) -> FeedResult<Comment> {
        let author = self.viewer()?.to_string();
        comment.validate()?;
        self.lock().create(comment, Some(parent_comment_id), author)
    }
}
