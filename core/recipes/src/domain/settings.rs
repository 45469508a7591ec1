//! 実行設定（既定値 → config.json → 環境変数 → CLI の順に上書き）

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// バックエンドのベース URL（`/recipes` はこの下）
    pub api_url: String,
    pub timeout_ms: u64,
    /// 検索語入力の静止待ち時間
    pub debounce_ms: u64,
    /// JSONL ログの出力先。None なら home 直下の log.jsonl
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// config.json の値で上書きする（書かれているキーだけ）
    pub fn merge_file(mut self, file: SettingsFile) -> Self {
        if let Some(v) = file.api_url.filter(|s| !s.trim().is_empty()) {
            self.api_url = v;
        }
        if let Some(v) = file.timeout_ms {
            self.timeout_ms = v;
        }
        if let Some(v) = file.debounce_ms {
            self.debounce_ms = v;
        }
        if let Some(v) = file.log_file {
            self.log_file = Some(v);
        }
        self
    }
}

/// config.json の中身（全キー省略可）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    pub api_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub debounce_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}
