//! 配線: 設定を重ね合わせ、標準アダプタで UseCase を組み立てる

use std::path::Path;
use std::sync::Arc;

use common::adapter::{FanoutLog, FileJsonLog, StderrLog};
use common::error::Error;
use common::http::HttpTransport;
use common::ports::outbound::{emit, Log, LogLevel, LogRecord};

use crate::adapter::{
    load_settings_file, AssumeNo, HttpRecipeApi, JsonDbRecipeApi, NoopInterruptChecker, SigintChecker,
    StdEnvResolver, StdinConfirm, TerminalListView,
};
use crate::cli::Config;
use crate::domain::{RecipesCommand, Settings};
use crate::ports::outbound::{Confirm, EnvResolver, InterruptChecker, ListView, RecipeApi};
use crate::usecase::{RecipeStore, RecipesUseCase};

const LOG_FILE_NAME: &str = "log.jsonl";

/// 配線で組み立てたポート群（main の Command ディスパッチで利用）
pub struct App {
    pub settings: Settings,
    pub logger: Arc<dyn Log>,
    pub recipes_use_case: RecipesUseCase,
    pub list_view: Arc<dyn ListView>,
}

/// 既定値 → `<home>/config.json` → RECIPES_API_URL → `--api-url`
pub fn resolve_settings(config: &Config, env_resolver: &dyn EnvResolver, home: &Path) -> Result<Settings, Error> {
    let mut settings = Settings::default();
    if let Some(file) = load_settings_file(home)? {
        settings = settings.merge_file(file);
    }
    if let Some(url) = env_resolver.api_url_from_env() {
        settings.api_url = url;
    }
    if let Some(url) = config.api_url.as_ref().filter(|u| !u.trim().is_empty()) {
        settings.api_url = url.clone();
    }
    if settings.log_file.is_none() {
        settings.log_file = Some(home.join(LOG_FILE_NAME));
    }
    Ok(settings)
}

fn wire_logger(settings: &Settings, verbose: bool) -> Arc<dyn Log> {
    let mut logs: Vec<Arc<dyn Log>> = Vec::new();
    if let Some(path) = &settings.log_file {
        logs.push(Arc::new(FileJsonLog::new(path)));
    }
    if verbose {
        logs.push(Arc::new(StderrLog::new(LogLevel::Debug)));
    }
    Arc::new(FanoutLog::new(logs))
}

fn wire_api(config: &Config, settings: &Settings) -> Result<Arc<dyn RecipeApi>, Error> {
    Ok(match &config.db {
        Some(path) => Arc::new(JsonDbRecipeApi::open(path)?),
        None => Arc::new(HttpRecipeApi::new(HttpTransport::new(
            &settings.api_url,
            settings.timeout(),
        )?)),
    })
}

/// Ctrl+C の監視は browse のときだけ登録する
fn wire_interrupt(command: &RecipesCommand, logger: &dyn Log) -> Arc<dyn InterruptChecker> {
    if !matches!(command, RecipesCommand::Browse { .. }) {
        return Arc::new(NoopInterruptChecker);
    }
    match SigintChecker::install() {
        Ok(checker) => Arc::new(checker),
        Err(e) => {
            emit(
                logger,
                LogRecord::new(LogLevel::Warn, "failed to install Ctrl+C handler")
                    .layer("wiring")
                    .field("error", e.to_string()),
            );
            Arc::new(NoopInterruptChecker)
        }
    }
}

pub fn wire_recipes(config: &Config) -> Result<App, Error> {
    wire_recipes_with(config, &StdEnvResolver)
}

/// 環境変数の解決を差し替えられる入口（テスト用）
pub fn wire_recipes_with(config: &Config, env_resolver: &dyn EnvResolver) -> Result<App, Error> {
    let home = env_resolver.resolve_home_dir()?;
    let settings = resolve_settings(config, env_resolver, &home)?;
    let logger = wire_logger(&settings, config.verbose);

    let api = wire_api(config, &settings)?;
    let store = Arc::new(RecipeStore::new(api, Arc::clone(&logger)));
    let confirm: Arc<dyn Confirm> = if config.non_interactive {
        Arc::new(AssumeNo)
    } else {
        Arc::new(StdinConfirm)
    };
    let interrupt = wire_interrupt(&config.command, logger.as_ref());

    let recipes_use_case = RecipesUseCase::new(store, confirm, interrupt, Arc::clone(&logger), settings.timeout());

    Ok(App {
        settings,
        logger,
        recipes_use_case,
        list_view: Arc::new(TerminalListView),
    })
}
