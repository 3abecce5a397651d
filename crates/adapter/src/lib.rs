mod drivers;
mod traits;

pub use drivers::http::{HttpConfig, HttpForumClient};
pub use drivers::memory::{MemoryConfig, MemoryForum};
pub use traits::{CommentMutations, CommentSource, DiscussionSource, ForumBackend};

use domain::FeedResult;
use std::sync::Arc;
use tracing::info;

#[derive(Clone, Debug)]
pub enum BackendConfig {
    Http(HttpConfig),
    Memory(MemoryConfig),
}

pub fn connect(config: BackendConfig) -> FeedResult<Arc<dyn ForumBackend>> {
    let backend: Arc<dyn ForumBackend> = match config {
        BackendConfig::Http(http_conf) => {
            info!("Connecting to forum API at {}", http_conf.base_url);
            Arc::new(HttpForumClient::new(http_conf)?)
        }
        BackendConfig::Memory(mem_conf) => {
            info!("Using in-memory forum backend (seeded: {})", mem_conf.seed_demo);
            Arc::new(MemoryForum::new(mem_conf))
        }
    };
    Ok(backend)
}
