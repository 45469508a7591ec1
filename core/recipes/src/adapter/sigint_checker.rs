//! browse 中の Ctrl+C を検知する InterruptChecker 実装
//!
//! 登録は wiring が browse を組み立てるときだけ行う。他のコマンドでは既定の SIGINT 動作
//! （即終了）のまま。browse のループは 100ms ごとに `is_interrupted` を見て検索セッションを閉じる。

use crate::ports::outbound::InterruptChecker;
use common::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct SigintChecker {
    stop_requested: Arc<AtomicBool>,
}

impl SigintChecker {
    /// プロセス全体の SIGINT ハンドラを登録する（1 プロセスにつき 1 回まで）
    pub fn install() -> Result<Self, Error> {
        let stop_requested = Arc::new(AtomicBool::new(false));
        let on_signal = Arc::clone(&stop_requested);
        ctrlc::set_handler(move || on_signal.store(true, Ordering::SeqCst))
            .map_err(|e| Error::system(format!("Failed to install Ctrl+C handler: {}", e)))?;
        Ok(Self { stop_requested })
    }
}

impl InterruptChecker for SigintChecker {
    fn is_interrupted(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }
}

/// browse 以外のコマンドと、ハンドラを登録できなかった browse で使う
#[derive(Debug, Default)]
pub struct NoopInterruptChecker;

impl InterruptChecker for NoopInterruptChecker {
    fn is_interrupted(&self) -> bool {
        false
    }
}
