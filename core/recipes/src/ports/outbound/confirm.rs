//! 破壊的操作の確認 Outbound ポート

use common::error::Error;

pub trait Confirm: Send + Sync {
    /// true なら続行
    fn confirm(&self, prompt: &str) -> Result<bool, Error>;
}
