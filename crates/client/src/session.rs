use domain::Discussion;

/// The signed-in viewer as reported by the external session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub nickname: Option<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn named(nickname: impl Into<String>) -> Self {
        Self {
            nickname: Some(nickname.into()),
        }
    }

    pub fn is_author_of(&self, discussion: &Discussion) -> bool {
        discussion.is_authored_by(self.nickname.as_deref())
    }

    /// Authors cannot report their own discussion, and blocked
    /// discussions have nothing left to report.
    pub fn can_report(&self, discussion: &Discussion) -> bool {
        !self.is_author_of(discussion) && !discussion.is_blocked()
    }
}
