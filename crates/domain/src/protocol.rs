//! Wire envelopes exchanged with the forum endpoints.

use crate::error::FeedError;
use crate::models::{Comment, Cursor, Page, VoteType};
use serde::{Deserialize, Serialize};

/// Any other `result` is a failure; only a message naming a deleted comment is a conflict.
pub const RESULT_SUCCESS: &str = "success";

/// Body of the cursor-paginated list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope {
    #[serde(default)]
    pub content: Vec<Comment>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub last_id: Option<Cursor>,
    #[serde(default)]
    pub total_elements: u64,
}

impl TryFrom<ListEnvelope> for Page {
    type Error = FeedError;

    fn try_from(env: ListEnvelope) -> Result<Self, Self::Error> {
        if env.has_next && env.last_id.is_none() {
            return Err(FeedError::Transient(
                "list response has a next page but no lastId".to_string(),
            ));
        }
        Ok(Page {
            items: env.content,
            has_next: env.has_next,
            next_cursor: if env.has_next { env.last_id } else { None },
            total_elements: env.total_elements,
        })
    }
}

impl From<Page> for ListEnvelope {
    fn from(page: Page) -> Self {
        ListEnvelope {
            content: page.items,
            has_next: page.has_next,
            last_id: page.next_cursor,
            total_elements: page.total_elements,
        }
    }
}

/// Body of the like/dislike endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteEnvelope {
    pub result: String,
    #[serde(default)]
    pub data: Option<Comment>,
    #[serde(default)]
    pub message: Option<String>,
}

impl VoteEnvelope {
    pub fn success(comment: Comment) -> Self {
        Self {
            result: RESULT_SUCCESS.to_string(),
            data: Some(comment),
            message: None,
        }
    }

    pub fn into_comment(self) -> Result<Comment, FeedError> {
        if self.result != RESULT_SUCCESS {
            let reason = self.message.unwrap_or(self.result);
            let deleted = {
                let lower = reason.to_lowercase();
                lower.contains("deleted") || lower.contains("no longer exists")
            };
            return Err(if deleted {
                FeedError::Conflict(reason)
            } else {
                FeedError::Transient(reason)
            });
        }
        self.data.ok_or_else(|| {
            FeedError::Transient("vote succeeded but returned no comment".to_string())
        })
    }
}

/// Request body shared by the comment and reply endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteCommentRequest {
    pub vote_type: VoteType,
    pub content: String,
}
