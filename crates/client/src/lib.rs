pub mod config;
mod detail;
mod feed;
mod loader;
mod opinions;
mod reconciler;
mod selection;
mod session;

pub use detail::DetailController;
pub use feed::{Feed, LoadOutcome, PageSource};
pub use loader::{SentinelEvent, SentinelLoader};
pub use opinions::OpinionsController;
pub use reconciler::{Reconciler, RefreshTrigger};
pub use selection::{ReportResolution, ReportTarget, Selection};
pub use session::Viewer;
