mod commands;
mod error;
mod events;
mod models;
mod navigation;
pub mod protocol;

pub use commands::{MutationCommand, NewComment};
pub use error::{FeedError, FeedResult};
pub use events::{FeedEvent, ViewKind};
pub use models::{
    Comment, CommentId, Cursor, Discussion, DiscussionId, DiscussionStatus, Page, Reaction,
    ViewStatus, VoteType,
};
pub use navigation::{ForwardState, ListContext, Navigation, Route};
