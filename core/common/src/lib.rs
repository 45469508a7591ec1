//! recipes 共通ライブラリ
//!
//! エラー型・構造化ログ・HTTP トランスポート・キャンセルトークンを提供します。

/// エラーハンドリング
pub mod error;

/// JSON over HTTP
pub mod http;

/// キャンセルトークン
pub mod cancel;

pub mod ports;
pub mod adapter;
