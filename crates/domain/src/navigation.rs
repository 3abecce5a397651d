use crate::models::{Discussion, DiscussionId};
use serde::{Deserialize, Serialize};

/// Where the discussion list was when the user left it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContext {
    #[serde(default)]
    pub prev_active_tab: Option<String>,
    #[serde(default)]
    pub prev_search: Option<String>,
    #[serde(default)]
    pub prev_sort: Option<String>,
    #[serde(default)]
    pub prev_scroll_left: Option<f64>,
}

/// State carried across a view transition. Must survive a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardState {
    pub discussion_id: DiscussionId,
    #[serde(default)]
    pub discussion: Option<Discussion>,
    #[serde(default)]
    pub list: ListContext,
}

impl ForwardState {
    pub fn new(discussion_id: DiscussionId, list: ListContext) -> Self {
        Self {
            discussion_id,
            discussion: None,
            list,
        }
    }

    pub fn with_discussion(mut self, discussion: Discussion) -> Self {
        self.discussion = Some(discussion);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    DiscussionList,
    InProgressDetail(DiscussionId),
    CompletedDetail(DiscussionId),
    Opinions(DiscussionId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::DiscussionList => "/forum/list".to_string(),
            Route::InProgressDetail(id) => format!("/forum/inprogress/{}", id),
            Route::CompletedDetail(id) => format!("/forum/completed/{}", id),
            Route::Opinions(id) => format!("/forum/opinions/{}", id),
        }
    }
}

/// A transition requested by a controller; the router decides how to carry it.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub route: Route,
    pub state: ForwardState,
}
