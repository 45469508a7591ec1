//! キャンセルトークン
//!
//! ビューが破棄されたら cancel() し、後から届いた非同期結果は捨てる。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// clone したトークン同士でフラグを共有する
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
