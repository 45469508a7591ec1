//! アダプター（Outbound ポートの標準実装）

pub mod file_json_log;

pub use file_json_log::{FanoutLog, FileJsonLog, NoopLog, StderrLog};
