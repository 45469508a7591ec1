//! 標準環境変数解決実装（std::env を委譲）

use crate::ports::outbound::EnvResolver;
use common::error::Error;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl EnvResolver for StdEnvResolver {
    fn resolve_home_dir(&self) -> Result<PathBuf, Error> {
        if let Some(home) = non_empty_var("RECIPES_HOME") {
            return Ok(PathBuf::from(home));
        }

        let config_base = non_empty_var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| non_empty_var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok_or_else(|| Error::env("HOME is not set"))?;

        Ok(config_base.join("recipes"))
    }

    fn api_url_from_env(&self) -> Option<String> {
        non_empty_var("RECIPES_API_URL")
    }
}
