#![allow(dead_code)]

use adapter::{CommentMutations, CommentSource, DiscussionSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{
    Comment, CommentId, Cursor, Discussion, DiscussionId, DiscussionStatus, FeedError, FeedEvent,
    FeedResult, NewComment, Page, Reaction, ViewStatus, VoteType,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{broadcast, Semaphore};

pub fn d1() -> DiscussionId {
    DiscussionId::new_unchecked(1)
}

pub fn comment(id: i64) -> Comment {
    Comment {
        comment_id: CommentId::new(id),
        discussion_id: d1(),
        parent_comment_id: None,
        author_name: format!("user{}", id),
        vote_type: VoteType::For,
        body: format!("comment {}", id),
        like_count: 0,
        dislike_count: 0,
        viewer_vote: None,
        created_at: NaiveDate::from_ymd_opt(2024, 11, 20)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap(),
    }
}

pub fn liked(id: i64, likes: u32) -> Comment {
    let mut c = comment(id);
    c.like_count = likes;
    c
}

pub fn page(ids: &[i64], last: Option<i64>, total: u64) -> Page {
    Page {
        items: ids.iter().copied().map(comment).collect(),
        has_next: last.is_some(),
        next_cursor: last.map(|l| Cursor::new(l.to_string())),
        total_elements: total,
    }
}

pub fn discussion(status: DiscussionStatus, author: &str) -> Discussion {
    Discussion {
        discussion_id: d1(),
        title: "Should the four-day week be the default?".into(),
        body: String::new(),
        status,
        view_status: ViewStatus::Normal,
        author_name: author.into(),
        comment_count: 0,
        is_report: false,
    }
}

pub fn events() -> broadcast::Sender<FeedEvent> {
    broadcast::channel(64).0
}

pub async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..10_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

/// Backend answering from fixed scripts, optionally holding every list or
/// best fetch until the test releases it.
pub struct Scripted {
    pages: Mutex<HashMap<Option<String>, FeedResult<Page>>>,
    best: Mutex<Vec<Comment>>,
    best_failure: Mutex<Option<FeedError>>,
    discussion: Mutex<Discussion>,
    votes: Mutex<HashMap<CommentId, FeedResult<Comment>>>,
    gate: Option<Semaphore>,
    page_calls: AtomicUsize,
    best_calls: AtomicUsize,
    discussion_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
}

impl Scripted {
    pub fn open() -> Self {
        Self::with_gate(None)
    }

    pub fn gated() -> Self {
        Self::with_gate(Some(Semaphore::new(0)))
    }

    fn with_gate(gate: Option<Semaphore>) -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            best: Mutex::new(Vec::new()),
            best_failure: Mutex::new(None),
            discussion: Mutex::new(discussion(DiscussionStatus::InProgress, "host")),
            votes: Mutex::new(HashMap::new()),
            gate,
            page_calls: AtomicUsize::new(0),
            best_calls: AtomicUsize::new(0),
            discussion_calls: AtomicUsize::new(0),
            mutation_calls: AtomicUsize::new(0),
        }
    }

    pub fn script(&self, cursor: Option<&str>, result: FeedResult<Page>) {
        self.pages
            .lock()
            .unwrap()
            .insert(cursor.map(str::to_string), result);
    }

    pub fn script_best(&self, comments: Vec<Comment>) {
        *self.best.lock().unwrap() = comments;
    }

    /// Makes every following best-comments fetch fail, or succeed again with `None`.
    pub fn fail_best(&self, error: Option<FeedError>) {
        *self.best_failure.lock().unwrap() = error;
    }

    pub fn script_vote_for(&self, comment_id: CommentId, result: FeedResult<Comment>) {
        self.votes.lock().unwrap().insert(comment_id, result);
    }

    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn best_calls(&self) -> usize {
        self.best_calls.load(Ordering::SeqCst)
    }

    pub fn discussion_calls(&self) -> usize {
        self.discussion_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait]
impl CommentSource for Scripted {
    async fn fetch_page(
        &self,
        _discussion_id: DiscussionId,
        cursor: Option<Cursor>,
    ) -> FeedResult<Page> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        let key = cursor.map(|c| c.as_str().to_string());
        self.pages
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(Page::empty(0)))
    }

    async fn fetch_best(&self, _discussion_id: DiscussionId) -> FeedResult<Vec<Comment>> {
        self.best_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        if let Some(error) = self.best_failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.best.lock().unwrap().clone())
    }
}

#[async_trait]
impl DiscussionSource for Scripted {
    async fn fetch_discussion(&self, _discussion_id: DiscussionId) -> FeedResult<Discussion> {
        self.discussion_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.discussion.lock().unwrap().clone())
    }
}

#[async_trait]
impl CommentMutations for Scripted {
    async fn vote(&self, comment_id: CommentId, _reaction: Reaction) -> FeedResult<Comment> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.votes
            .lock()
            .unwrap()
            .get(&comment_id)
            .cloned()
            .unwrap_or_else(|| Err(FeedError::Conflict(format!("comment {}", comment_id))))
    }

    async fn create_comment(&self, comment: &NewComment) -> FeedResult<Comment> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut c = self::comment(100);
        c.body = comment.body.clone();
        Ok(c)
    }

    async fn create_reply(
        &self,
        parent_comment_id: CommentId,
        comment: &NewComment,
    ) -> FeedResult<Comment> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut c = self::comment(101);
        c.parent_comment_id = Some(parent_comment_id);
        c.body = comment.body.clone();
        Ok(c)
    }
}
