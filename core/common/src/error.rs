//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。終了コードは sysexits 準拠。

/// エラー型
///
/// バリアントごとに終了コードが決まる（`exit_code()`）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 引数不正（64）
    #[error("{0}")]
    InvalidArgument(String),
    /// 入力値の検証失敗（65）。リクエストは送られていない。
    #[error("Validation failed: {0}")]
    Validation(String),
    /// 対象が存在しない（66）
    #[error("Not found: {0}")]
    NotFound(String),
    /// 内部エラー（70）
    #[error("{0}")]
    System(String),
    /// 通信エラー・HTTP エラー応答（74）
    #[error("{0}")]
    Http(String),
    /// JSON のエンコード／デコード失敗（74）
    #[error("{0}")]
    Json(String),
    /// ファイル I/O（74）
    #[error("{0}")]
    Io(String),
    /// 設定・環境変数の不備（78）
    #[error("{0}")]
    Env(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    /// プロセス終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::Validation(_) => 65,
            Self::NotFound(_) => 66,
            Self::System(_) => 70,
            Self::Http(_) | Self::Json(_) | Self::Io(_) => 74,
            Self::Env(_) => 78,
        }
    }

    /// 使い方の表示が必要なエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
