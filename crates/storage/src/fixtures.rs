use chrono::NaiveDate;
use domain::{Comment, CommentId, Cursor, DiscussionId, Page, VoteType};

pub fn comment(id: i64) -> Comment {
    Comment {
        comment_id: CommentId::new(id),
        discussion_id: DiscussionId::new_unchecked(1),
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

pub fn page(ids: &[i64], last: Option<i64>, total: u64) -> Page {
    Page {
        items: ids.iter().copied().map(comment).collect(),
        has_next: last.is_some(),
        next_cursor: last.map(|l| Cursor::new(l.to_string())),
        total_elements: total,
    }
}
