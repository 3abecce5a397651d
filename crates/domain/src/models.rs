use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscussionId(i64);

impl DiscussionId {
    pub fn new(raw: i64) -> Result<Self, String> {
        if raw <= 0 {
            return Err(format!("Discussion ID must be positive, got {}", raw));
        }
        Ok(Self(raw))
    }

    pub fn new_unchecked(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DiscussionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque continuation token handed back by the list endpoint.
///
/// The server sends `lastId` as either a number or a string; both are kept
/// as text and passed back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<CommentId> for Cursor {
    fn from(id: CommentId) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCursor {
            Number(i64),
            Text(String),
        }

        Ok(match RawCursor::deserialize(deserializer)? {
            RawCursor::Number(n) => Cursor(n.to_string()),
            RawCursor::Text(s) => Cursor(s),
        })
    }
}

/// Side the author took in the debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    For,
    Against,
    Neutral,
}

/// The viewer's own reaction to a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    pub fn endpoint(self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: CommentId,
    pub discussion_id: DiscussionId,
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,
    #[serde(alias = "memberName")]
    pub author_name: String,
    pub vote_type: VoteType,
    #[serde(rename = "content", alias = "body")]
    pub body: String,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub dislike_count: u32,
    #[serde(default)]
    pub viewer_vote: Option<Reaction>,
    pub created_at: NaiveDateTime,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }

    /// Copies the vote-related fields of `updated` onto `self`.
    /// Identity, body and position are left alone.
    pub fn apply_vote(&mut self, updated: &Comment) {
        self.like_count = updated.like_count;
        self.dislike_count = updated.dislike_count;
        self.viewer_vote = updated.viewer_vote;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscussionStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewStatus {
    #[default]
    Normal,
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub discussion_id: DiscussionId,
    #[serde(default)]
    pub title: String,
    /// Topic text shown on the detail screen.
    #[serde(default, rename = "content", alias = "body")]
    pub body: String,
    pub status: DiscussionStatus,
    #[serde(default)]
    pub view_status: ViewStatus,
    #[serde(alias = "memberName")]
    pub author_name: String,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub is_report: bool,
}

impl Discussion {
    pub fn is_blocked(&self) -> bool {
        self.view_status == ViewStatus::Blocked
    }

    pub fn is_completed(&self) -> bool {
        self.status == DiscussionStatus::Completed
    }

    /// Whether a composer may be shown at all. The server still validates.
    pub fn accepts_comments(&self) -> bool {
        !self.is_completed() && !self.is_blocked()
    }

    pub fn is_authored_by(&self, nickname: Option<&str>) -> bool {
        nickname.is_some_and(|n| n == self.author_name)
    }
}

/// One fetched window of the comment list, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Comment>,
    pub has_next: bool,
    pub next_cursor: Option<Cursor>,
    pub total_elements: u64,
}

impl Page {
    pub fn empty(total_elements: u64) -> Self {
        Self {
            items: Vec::new(),
            has_next: false,
            next_cursor: None,
            total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_accepts_numbers_and_strings() {
        let n: Cursor = serde_json::from_str("42").unwrap();
        let s: Cursor = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(n.as_str(), "42");
        assert_eq!(s.as_str(), "abc");
    }

    #[test]
    fn comment_reads_camel_case_wire_format() {
        let raw = r#"{
            "commentId": 7,
            "discussionId": 3,
            "parentCommentId": null,
            "memberName": "ferris",
            "voteType": "AGAINST",
            "content": "no way",
            "likeCount": 2,
            "dislikeCount": 1,
            "viewerVote": "LIKE",
            "createdAt": "2024-11-20T09:30:00"
        }"#;
        let c: Comment = serde_json::from_str(raw).unwrap();
        assert_eq!(c.comment_id, CommentId::new(7));
        assert_eq!(c.author_name, "ferris");
        assert_eq!(c.vote_type, VoteType::Against);
        assert_eq!(c.viewer_vote, Some(Reaction::Like));
        assert!(!c.is_reply());
    }

    #[test]
    fn discussion_id_rejects_non_positive() {
        assert!(DiscussionId::new(0).is_err());
        assert!(DiscussionId::new(-3).is_err());
        assert_eq!(DiscussionId::new(9).unwrap().get(), 9);
    }

    #[test]
    fn completed_or_blocked_discussions_refuse_composers() {
        let mut d = Discussion {
            discussion_id: DiscussionId::new(1).unwrap(),
            title: String::new(),
            body: String::new(),
            status: DiscussionStatus::InProgress,
            view_status: ViewStatus::Normal,
            author_name: "host".into(),
            comment_count: 0,
            is_report: false,
        };
        assert!(d.accepts_comments());
        d.status = DiscussionStatus::Completed;
        assert!(!d.accepts_comments());
        d.status = DiscussionStatus::InProgress;
        d.view_status = ViewStatus::Blocked;
        assert!(!d.accepts_comments());
        assert!(d.is_authored_by(Some("host")));
        assert!(!d.is_authored_by(None));
    }

    #[test]
    fn discussion_topic_text_travels_as_content() {
        let raw = r#"{
            "discussionId": 4,
            "title": "t",
            "content": "the topic",
            "status": "COMPLETED",
            "memberName": "host"
        }"#;
        let d: Discussion = serde_json::from_str(raw).unwrap();
        assert_eq!(d.body, "the topic");
        assert_eq!(d.view_status, ViewStatus::Normal);
        assert!(d.is_completed());

        let back = serde_json::to_value(&d).unwrap();
        assert_eq!(back["content"], "the topic");
    }
}
