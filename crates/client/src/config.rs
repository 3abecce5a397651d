use adapter::{BackendConfig, HttpConfig, MemoryConfig};
use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const ENV_PREFIX: &str = "FORUM_";

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub backend: BackendSettings,
    pub feed: FeedSettings,
    pub demo: DemoSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub token: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BackendSettings {
    pub mode: BackendMode,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    Http,
    Memory,
}

#[derive(Deserialize, Clone, Debug)]
pub struct FeedSettings {
    pub page_size: usize,
    pub best_limit: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DemoSettings {
    pub discussion_id: i64,
    pub viewer: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::build(&run_mode, collect_env_vars(std::env::vars()))
    }

    fn build(run_mode: &str, env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let env_json = serde_json::to_string(&env_map)
            .map_err(|e| ConfigError::Message(format!("environment is not serializable: {}", e)))?;

        let s = config::Config::builder()
            .set_default("api.base_url", "http://127.0.0.1:8080/api")?
            .set_default("api.timeout_secs", 15)?
            .set_default("backend.mode", "memory")?
            .set_default("feed.page_size", 10)?
            .set_default("feed.best_limit", 3)?
            .set_default("demo.discussion_id", 1)?
            .set_default("demo.viewer", "guest")?
            .add_source(config::File::with_name("forum").required(false))
            .add_source(config::File::with_name(&format!("forum.{}", run_mode)).required(false))
            .add_source(config::File::from_str(&env_json, config::FileFormat::Json))
            .build()?;

        s.try_deserialize()
    }

    pub fn backend_config(&self) -> BackendConfig {
        match self.backend.mode {
            BackendMode::Http => BackendConfig::Http(HttpConfig {
                base_url: self.api.base_url.clone(),
                timeout: Duration::from_secs(self.api.timeout_secs),
                token: self.api.token.clone(),
            }),
            BackendMode::Memory => BackendConfig::Memory(MemoryConfig {
                page_size: self.feed.page_size,
                best_limit: self.feed.best_limit,
                viewer: self.demo.viewer.clone(),
                seed_demo: true,
            }),
        }
    }
}

/// `FORUM_API__BASE_URL=...` becomes `api.base_url`.
fn collect_env_vars(vars: impl Iterator<Item = (String, String)>) -> HashMap<String, String> {
    vars.filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .map(|(k, v)| {
            let key = k
                .trim_start_matches(ENV_PREFIX)
                .replace("__", ".")
                .to_lowercase();
            (key, v)
        })
        .collect()
}
