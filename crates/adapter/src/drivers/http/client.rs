use async_trait::async_trait;
use domain::protocol::{ListEnvelope, VoteEnvelope, WriteCommentRequest};
use domain::{
    Comment, CommentId, Cursor, Discussion, DiscussionId, FeedError, FeedResult, NewComment,
    Page, Reaction,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::errors::{decode_error, status_error, transport_error};
use crate::traits::{CommentMutations, CommentSource, DiscussionSource};

#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Bearer token from the external session; `None` browses anonymously.
    pub token: Option<String>,
}

#[derive(Clone)]
pub struct HttpForumClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpForumClient {
    pub fn new(config: HttpConfig) -> FeedResult<Self> {
        let base_url = sanitize_base_url(config.base_url);
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FeedError::Transient(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url,
            token: config.token,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> FeedResult<T> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }
        resp.json::<T>().await.map_err(decode_error)
    }
}

#[async_trait]
impl CommentSource for HttpForumClient {
    async fn fetch_page(
        &self,
        discussion_id: DiscussionId,
        cursor: Option<Cursor>,
    ) -> FeedResult<Page> {
        let mut req = self
            .client
            .get(self.url(&format!("/discussions/{}/comments", discussion_id)));
        if let Some(cursor) = &cursor {
            req = req.query(&[("lastId", cursor.as_str())]);
        }
        debug!(%discussion_id, cursor = ?cursor, "GET comment page");
        let env: ListEnvelope = self.send_json(req).await?;
        Page::try_from(env)
    }

    async fn fetch_best(&self, discussion_id: DiscussionId) -> FeedResult<Vec<Comment>> {
        let req = self
            .client
            .get(self.url(&format!("/discussions/{}/comments/best", discussion_id)));
        self.send_json(req).await
    }
}

#[async_trait]
impl DiscussionSource for HttpForumClient {
    async fn fetch_discussion(&self, discussion_id: DiscussionId) -> FeedResult<Discussion> {
        let req = self
            .client
            .get(self.url(&format!("/discussions/{}", discussion_id)));
        self.send_json(req).await
    }
}

#[async_trait]
impl CommentMutations for HttpForumClient {
    async fn vote(&self, comment_id: CommentId, reaction: Reaction) -> FeedResult<Comment> {
        let req = self.client.post(self.url(&format!(
            "/comments/{}/{}",
            comment_id,
            reaction.endpoint()
        )));
        let env: VoteEnvelope = self.send_json(req).await?;
        env.into_comment()
    }

    async fn create_comment(&self, comment: &NewComment) -> FeedResult<Comment> {
        comment.validate()?;
        let req = self
            .client
            .post(self.url(&format!("/discussions/{}/comments", comment.discussion_id)))
            .json(&WriteCommentRequest {
                vote_type: comment.vote_type,
                content: comment.body.clone(),
            });
        self.send_json(req).await
    }

    async fn create_reply(
        &self,
        parent_comment_id: CommentId,
        comment: &NewComment,
    ) -> FeedResult<Comment> {
        comment.validate()?;
        let req = self
            .client
            .post(self.url(&format!(
                "/discussions/{}/comments/{}/replies",
                comment.discussion_id, parent_comment_id
            )))
            .json(&WriteCommentRequest {
                vote_type: comment.vote_type,
                content: comment.body.clone(),
            });
        self.send_json(req).await
    }
}

fn sanitize_base_url(mut base: String) -> String {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{}", base);
    }
    while base.ends_with('/') {
        base.pop();
    }
    base
}

#[cfg(test)]
mod tests {
    use super::sanitize_base_url;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slashes() {
        assert_eq!(sanitize_base_url("api.local:8080//".into()), "http://api.local:8080");
        assert_eq!(sanitize_base_url("https://x.io/api/".into()), "https://x.io/api");
    }
}
