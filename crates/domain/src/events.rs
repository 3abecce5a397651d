use crate::error::FeedError;
use crate::models::{Comment, Discussion, DiscussionId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Digest,
    Full,
}

/// State changes a renderer can subscribe to instead of reaching into stores.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    FeedReset {
        view: ViewKind,
        discussion_id: DiscussionId,
    },
    PageApplied {
        view: ViewKind,
        discussion_id: DiscussionId,
        appended: usize,
        total_elements: u64,
        has_next: bool,
    },
    LoadFailed {
        view: ViewKind,
        discussion_id: DiscussionId,
        error: FeedError,
    },
    CommentUpdated {
        view: ViewKind,
        comment: Comment,
    },
    DiscussionRefreshed(Discussion),
}
