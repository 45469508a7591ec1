//! Outbound ポート: アプリが外界（ログ等）を使うための trait

pub mod log;

pub use log::{emit, now_iso8601, Log, LogLevel, LogRecord};
