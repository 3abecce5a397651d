use domain::{Comment, CommentId, Cursor, DiscussionId};
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct FeedState {
    pub discussion_id: Option<DiscussionId>,
    pub items: Vec<Comment>,
    pub index: HashMap<CommentId, usize>,
    pub cursor: Option<Cursor>,
    pub has_next: bool,
    pub is_loading: bool,
    pub total_elements: u64,
    // bumped on every reset so in-flight results from before it can be recognised
    pub generation: u64,
    pub closed: bool,
    pub stale: bool,
}

impl FeedState {
    pub fn reset(&mut self, discussion_id: DiscussionId) {
        self.discussion_id = Some(discussion_id);
        self.items.clear();
        self.index.clear();
        self.cursor = None;
        self.has_next = false;
        self.total_elements = 0;
        self.stale = false;
        self.generation += 1;
    }

    pub fn append(&mut self, comments: Vec<Comment>) {
        for comment in comments {
            let pos = self.items.len();
            self.index.insert(comment.comment_id, pos);
            self.items.push(comment);
        }
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            discussion_id: self.discussion_id,
            items: self.items.clone(),
            cursor: self.cursor.clone(),
            has_next: self.has_next,
            is_loading: self.is_loading,
            total_elements: self.total_elements,
        }
    }
}

/// Point-in-time copy handed to renderers and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub discussion_id: Option<DiscussionId>,
    pub items: Vec<Comment>,
    pub cursor: Option<Cursor>,
    pub has_next: bool,
    pub is_loading: bool,
    pub total_elements: u64,
}

impl FeedSnapshot {
    pub fn ids(&self) -> Vec<CommentId> {
        self.items.iter().map(|c| c.comment_id).collect()
    }
}
