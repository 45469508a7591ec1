//! Outbound ポートの実装

pub mod config;
pub mod confirm;
pub mod http_recipe_api;
pub mod json_db_recipe_api;
pub mod sigint_checker;
pub mod std_env_resolver;
pub mod terminal;

pub use config::load_settings_file;
pub use confirm::{AssumeNo, AssumeYes, StdinConfirm};
pub use http_recipe_api::HttpRecipeApi;
pub use json_db_recipe_api::JsonDbRecipeApi;
pub use sigint_checker::{NoopInterruptChecker, SigintChecker};
pub use std_env_resolver::StdEnvResolver;
pub use terminal::TerminalListView;
