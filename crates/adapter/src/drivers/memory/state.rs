use chrono::Utc;
use domain::{
    Comment, CommentId, Cursor, Discussion, DiscussionId, FeedError, FeedResult, NewComment,
    Page, Reaction,
};
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct MemoryState {
    pub discussions: HashMap<DiscussionId, Discussion>,
    // creation order
    pub comments: Vec<Comment>,
    pub last_comment_id: i64,
    pub list_calls: usize,
    pub best_calls: usize,
    pub discussion_calls: usize,
}

impl MemoryState {
    pub fn insert(&mut self, comment: Comment) {
        self.last_comment_id = self.last_comment_id.max(comment.comment_id.get());
        if let Some(d) = self.discussions.get_mut(&comment.discussion_id) {
            d.comment_count += 1;
        }
        self.comments.push(comment);
    }

    pub fn remove(&mut self, comment_id: CommentId) -> bool {
        let Some(pos) = self.comments.iter().position(|c| c.comment_id == comment_id) else {
            return false;
        };
        let removed = self.comments.remove(pos);
        if let Some(d) = self.discussions.get_mut(&removed.discussion_id) {
            d.comment_count = d.comment_count.saturating_sub(1);
        }
        true
    }

    /// Comment lists are hidden for blocked or unknown discussions.
    pub fn visible_discussion(&self, discussion_id: DiscussionId) -> FeedResult<&Discussion> {
        match self.discussions.get(&discussion_id) {
            Some(d) if !d.is_blocked() => Ok(d),
            _ => Err(FeedError::NotFound(format!("discussion {}", discussion_id))),
        }
    }

    /// Top-level comments in creation order, each followed by its thread.
    fn threaded(&self, discussion_id: DiscussionId) -> Vec<&Comment> {
        let own: Vec<&Comment> = self
            .comments
            .iter()
            .filter(|c| c.discussion_id == discussion_id)
            .collect();
        let by_id: HashMap<CommentId, &Comment> = own.iter().map(|c| (c.comment_id, *c)).collect();

        let root_of = |c: &Comment| {
            let mut cur = c;
            for _ in 0..own.len() {
                match cur.parent_comment_id.and_then(|p| by_id.get(&p)) {
                    Some(parent) => cur = *parent,
                    None => break,
                }
            }
            cur.comment_id
        };

        let mut out = Vec::with_capacity(own.len());
        for top in own.iter().filter(|c| !c.is_reply()) {
            out.push(*top);
            out.extend(
                own.iter()
                    .filter(|c| c.is_reply() && root_of(**c) == top.comment_id)
                    .copied(),
            );
        }
        out
    }

    pub fn page(
        &self,
        discussion_id: DiscussionId,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> FeedResult<Page> {
        let ordered = self.threaded(discussion_id);
        let total = ordered.len() as u64;

        let start = match cursor {
            None => 0,
            Some(cursor) => {
                let last: i64 = cursor.as_str().parse().map_err(|_| {
                    FeedError::InvalidArgument(format!("malformed cursor {}", cursor))
                })?;
                match ordered.iter().position(|c| c.comment_id.get() == last) {
                    Some(pos) => pos + 1,
                    None => return Ok(Page::empty(total)),
                }
            }
        };

        let items: Vec<Comment> = ordered
            .iter()
            .skip(start)
            .take(page_size.max(1))
            .map(|c| (*c).clone())
            .collect();
        let has_next = start + items.len() < ordered.len();
        let next_cursor = if has_next {
            items.last().map(|c| Cursor::from(c.comment_id))
        } else {
            None
        };

        Ok(Page {
            items,
            has_next,
            next_cursor,
            total_elements: total,
        })
    }

    pub fn best(&self, discussion_id: DiscussionId, limit: usize) -> Vec<Comment> {
        let mut ranked: Vec<&Comment> = self
            .comments
            .iter()
            .filter(|c| c.discussion_id == discussion_id && c.like_count > 0)
            .collect();
        ranked.sort_by(|a, b| {
            b.like_count
                .cmp(&a.like_count)
                .then(a.comment_id.cmp(&b.comment_id))
        });
        ranked.into_iter().take(limit).cloned().collect()
    }

    pub fn toggle_vote(&mut self, comment_id: CommentId, reaction: Reaction) -> FeedResult<Comment> {
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.comment_id == comment_id)
            .ok_or_else(|| FeedError::Conflict(format!("comment {} no longer exists", comment_id)))?;

        match comment.viewer_vote {
            Some(Reaction::Like) => comment.like_count = comment.like_count.saturating_sub(1),
            Some(Reaction::Dislike) => {
                comment.dislike_count = comment.dislike_count.saturating_sub(1)
            }
            None => {}
        }
        if comment.viewer_vote == Some(reaction) {
            comment.viewer_vote = None;
        } else {
            match reaction {
                Reaction::Like => comment.like_count += 1,
                Reaction::Dislike => comment.dislike_count += 1,
            }
            comment.viewer_vote = Some(reaction);
        }
        Ok(comment.clone())
    }

    pub fn create(
        &mut self,
        new: &NewComment,
        parent: Option<CommentId>,
        author_name: String,
    ) -> FeedResult<Comment> {
        let discussion = self
            .discussions
            .get(&new.discussion_id)
            .ok_or_else(|| FeedError::NotFound(format!("discussion {}", new.discussion_id)))?;
        if discussion.is_completed() {
            return Err(FeedError::InvalidArgument(
                "discussion is already completed".to_string(),
            ));
        }
        if let Some(parent_id) = parent {
            let belongs = self
                .comments
                .iter()
                .any(|c| c.comment_id == parent_id && c.discussion_id == new.discussion_id);
            if !belongs {
                return Err(FeedError::NotFound(format!(
                    "comment {} in discussion {}",
                    parent_id, new.discussion_id
                )));
            }
        }

        let comment = Comment {
            comment_id: CommentId::new(self.last_comment_id + 1),
            discussion_id: new.discussion_id,
            parent_comment_id: parent,
            author_name,
            vote_type: new.vote_type,
            body: new.body.clone(),
            like_count: 0,
            dislike_count: 0,
            viewer_vote: None,
            created_at: Utc::now().naive_utc(),
        };
        self.insert(comment.clone());
        Ok(comment)
    }
}
