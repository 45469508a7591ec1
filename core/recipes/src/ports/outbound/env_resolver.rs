//! 環境変数解決 Outbound ポート
//!
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use common::error::Error;
use std::path::PathBuf;

/// 実装は `adapter::StdEnvResolver` やテスト用の固定値など。
pub trait EnvResolver: Send + Sync {
    /// recipes のホームディレクトリ
    ///
    /// 優先順位:
    /// 1. RECIPES_HOME
    /// 2. $XDG_CONFIG_HOME/recipes
    /// 3. $HOME/.config/recipes
    fn resolve_home_dir(&self) -> Result<PathBuf, Error>;

    /// RECIPES_API_URL（空なら None）
    fn api_url_from_env(&self) -> Option<String>;
}
