use crate::FeedStore;
use domain::{Comment, CommentId};
use tracing::debug;

impl FeedStore {
    /// Patches the vote fields of the matching item in place.
    ///
    /// Returns the patched copy, or `None` when the comment is not loaded in
    /// this view; the next full fetch of the view will pick the counts up.
    pub fn merge_vote(&self, updated: &Comment) -> Option<Comment> {
        let mut st = self.lock();
        if st.closed {
            return None;
        }
        let Some(&pos) = st.index.get(&updated.comment_id) else {
            debug!(view = ?self.view(), comment_id = %updated.comment_id, "vote result for unloaded comment dropped");
            return None;
        };
        let item = &mut st.items[pos];
        item.apply_vote(updated);
        Some(item.clone())
    }

    pub fn get(&self, comment_id: CommentId) -> Option<Comment> {
        let st = self.lock();
        st.index.get(&comment_id).map(|&pos| st.items[pos].clone())
    }

    pub fn contains(&self, comment_id: CommentId) -> bool {
        self.lock().index.contains_key(&comment_id)
    }
}
