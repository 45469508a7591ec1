//! Ctrl+C（SIGINT）等による割り込みを検知する Outbound ポート
//!
//! browse の入力待ちループがポーリングし、true なら検索セッションを閉じて終了する。

pub trait InterruptChecker: Send + Sync {
    fn is_interrupted(&self) -> bool;
}
