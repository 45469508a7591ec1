//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（REST・画面・環境変数・確認プロンプト等）を使うための trait

pub mod inbound;
pub mod outbound;
