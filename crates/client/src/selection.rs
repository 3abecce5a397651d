use domain::CommentId;
use tracing::debug;

/// How the external report modal closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportResolution {
    Submitted { reason: String },
    Cancelled,
}

/// What a report targets: the discussion itself, or one of its comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    Discussion,
    Comment(CommentId),
}

/// Ephemeral UI selections owned by one view controller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    active_reply_target: Option<CommentId>,
    report_target: Option<ReportTarget>,
}

impl Selection {
    pub fn active_reply_target(&self) -> Option<CommentId> {
        self.active_reply_target
    }

    /// Opening the composer on the comment that already has it closes it.
    pub fn toggle_reply(&mut self, comment_id: CommentId) {
        if self.active_reply_target == Some(comment_id) {
            self.active_reply_target = None;
        } else {
            self.active_reply_target = Some(comment_id);
        }
    }

    pub fn close_reply(&mut self) {
        self.active_reply_target = None;
    }

    pub fn report_modal_open(&self) -> bool {
        self.report_target.is_some()
    }

    pub fn report_target(&self) -> Option<ReportTarget> {
        self.report_target
    }

    /// The comment under report, if the open report is about a comment.
    pub fn selected_report_target(&self) -> Option<CommentId> {
        match self.report_target {
            Some(ReportTarget::Comment(id)) => Some(id),
            _ => None,
        }
    }

    pub fn open_report(&mut self, target: ReportTarget) {
        debug!(?target, "report modal opened");
        self.report_target = Some(target);
    }

    /// Closes the modal. Returns the target only if a report was submitted.
    pub fn resolve_report(&mut self, resolution: &ReportResolution) -> Option<ReportTarget> {
        let target = self.report_target.take()?;
        match resolution {
            ReportResolution::Submitted { .. } => Some(target),
            ReportResolution::Cancelled => None,
        }
    }

    pub fn clear(&mut self) {
        self.active_reply_target = None;
        self.report_target = None;
    }
}
