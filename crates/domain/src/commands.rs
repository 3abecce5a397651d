use crate::error::FeedError;
use crate::models::{CommentId, DiscussionId, Reaction, VoteType};

/// A comment or reply as typed into a composer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub discussion_id: DiscussionId,
    pub vote_type: VoteType,
    pub body: String,
}

impl NewComment {
    pub fn new(discussion_id: DiscussionId, vote_type: VoteType, body: impl Into<String>) -> Self {
        Self {
            discussion_id,
            vote_type,
            body: body.into(),
        }
    }

    /// Local pre-check only; the server validates again.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.body.trim().is_empty() {
            return Err(FeedError::InvalidArgument(
                "comment body cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationCommand {
    Vote {
        comment_id: CommentId,
        reaction: Reaction,
    },
    CreateComment(NewComment),
    CreateReply {
        parent_comment_id: CommentId,
        comment: NewComment,
    },
}

impl MutationCommand {
    pub fn validate(&self) -> Result<(), FeedError> {
        match self {
            MutationCommand::Vote { .. } => Ok(()),
            MutationCommand::CreateComment(c) => c.validate(),
            MutationCommand::CreateReply { comment, .. } => comment.validate(),
        }
    }

    /// Creation changes the element count and server-side ranking.
    pub fn creates_comment(&self) -> bool {
        !matches!(self, MutationCommand::Vote { .. })
    }
}
