use async_trait::async_trait;
use domain::{
    Comment, CommentId, Cursor, Discussion, DiscussionId, FeedResult, MutationCommand, NewComment,
    Page, Reaction,
};

/// Read side of the comment endpoints.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// `None` cursor means the first page. Order is the server's.
    async fn fetch_page(
        &self,
        discussion_id: DiscussionId,
        cursor: Option<Cursor>,
    ) -> FeedResult<Page>;

    /// Top-ranked comments, no pagination envelope.
    async fn fetch_best(&self, discussion_id: DiscussionId) -> FeedResult<Vec<Comment>>;
}

#[async_trait]
pub trait DiscussionSource: Send + Sync {
    async fn fetch_discussion(&self, discussion_id: DiscussionId) -> FeedResult<Discussion>;
}

/// Write side. Every call returns the server's post-mutation record.
#[async_trait]
pub trait CommentMutations: Send + Sync {
    async fn vote(&self, comment_id: CommentId, reaction: Reaction) -> FeedResult<Comment>;

    async fn create_comment(&self, comment: &NewComment) -> FeedResult<Comment>;

    async fn create_reply(
        &self,
        parent_comment_id: CommentId,
        comment: &NewComment,
    ) -> FeedResult<Comment>;

    async fn submit(&self, cmd: MutationCommand) -> FeedResult<Comment> {
        cmd.validate()?;
        match cmd {
            MutationCommand::Vote {
                comment_id,
                reaction,
            } => self.vote(comment_id, reaction).await,
            MutationCommand::CreateComment(comment) => self.create_comment(&comment).await,
            MutationCommand::CreateReply {
                parent_comment_id,
                comment,
            } => self.create_reply(parent_comment_id, &comment).await,
        }
    }
}

pub trait ForumBackend: CommentSource + DiscussionSource + CommentMutations {}

impl<T> ForumBackend for T where T: CommentSource + DiscussionSource + CommentMutations {}
