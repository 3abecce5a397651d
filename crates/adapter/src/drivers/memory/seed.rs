use chrono::{Duration, NaiveDate};
use domain::{
    Comment, CommentId, Discussion, DiscussionId, DiscussionStatus, ViewStatus, VoteType,
};

use super::state::MemoryState;

const OPINIONS: [(&str, VoteType, &str); 6] = [
    ("minji", VoteType::For, "Four-day weeks raise output per hour."),
    ("junho", VoteType::Against, "Customer-facing teams cannot just disappear on Fridays."),
    ("sora", VoteType::Neutral, "It depends on whether the pilot keeps salaries flat."),
    ("dae", VoteType::For, "Burnout costs more than one extra day of coverage."),
    ("eun", VoteType::Against, "Compressed hours just move the fatigue around."),
    ("hyun", VoteType::For, "Every trial so far reported lower attrition."),
];

/// Three discussions: one open with a long threaded feed, one completed,
/// one blocked by moderation.
pub fn demo(state: &mut MemoryState) {
    let open = discussion(
        1,
        "Should the four-day work week be the default?",
        DiscussionStatus::InProgress,
        ViewStatus::Normal,
    );
    let closed = discussion(
        2,
        "Is remote work here to stay?",
        DiscussionStatus::Completed,
        ViewStatus::Normal,
    );
    let blocked = discussion(3, "[removed]", DiscussionStatus::InProgress, ViewStatus::Blocked);
    for d in [open, closed, blocked] {
        state.discussions.insert(d.discussion_id, d);
    }

    let base = NaiveDate::from_ymd_opt(2024, 11, 20)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap_or_default();

    let mut next_id = 1;
    for round in 0..4u32 {
        for (i, (author, vote_type, body)) in OPINIONS.iter().enumerate() {
            let id = next_id;
            next_id += 1;
            let likes = (i as u32 * 7 + round * 3) % 11;
            state.insert(Comment {
                comment_id: CommentId::new(id),
                discussion_id: DiscussionId::new_unchecked(1),
                parent_comment_id: None,
                author_name: author.to_string(),
                vote_type: *vote_type,
                body: body.to_string(),
                like_count: likes,
                dislike_count: (i as u32 + round) % 3,
                viewer_vote: None,
                created_at: base + Duration::minutes(id),
            });
            if i % 3 == 0 {
                let reply_id = next_id;
                next_id += 1;
                state.insert(Comment {
                    comment_id: CommentId::new(reply_id),
                    discussion_id: DiscussionId::new_unchecked(1),
                    parent_comment_id: Some(CommentId::new(id)),
                    author_name: "moderator".to_string(),
                    vote_type: VoteType::Neutral,
                    body: format!("Replying to {}: do you have a source?", author),
                    like_count: 0,
                    dislike_count: 0,
                    viewer_vote: None,
                    created_at: base + Duration::minutes(reply_id),
                });
            }
        }
    }
}

fn discussion(
    id: i64,
    title: &str,
    status: DiscussionStatus,
    view_status: ViewStatus,
) -> Discussion {
    Discussion {
        discussion_id: DiscussionId::new_unchecked(id),
        title: title.to_string(),
        body: String::new(),
        status,
        view_status,
        author_name: "host".to_string(),
        comment_count: 0,
        is_report: false,
    }
}
