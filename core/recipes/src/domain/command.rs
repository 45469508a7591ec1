//! recipes コマンドの enum（Command Pattern）
//!
//! 各バリアントがブラウザ版の 1 画面・1 操作に対応する。

use crate::domain::{FavoriteFilter, RecipeDraft, RecipeId, RecipePatch, RecipeQuery};

/// recipes の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum RecipesCommand {
    /// ヘルプ表示
    Help,
    /// 一覧（検索・フィルタ付き、1 回だけ取得）
    List { query: RecipeQuery },
    /// 詳細（ID で解決してから表示）
    Show { id: RecipeId },
    /// 新規作成
    Create { draft: RecipeDraft },
    /// 編集。指定のないフィールドは現在の値を引き継ぐ
    Update { id: RecipeId, patch: RecipePatch },
    /// 削除（assume_yes でなければ確認する）
    Delete { id: RecipeId, assume_yes: bool },
    /// お気に入りの反転
    Favorite { id: RecipeId },
    /// 対話的な検索（デバウンス + 最新のみ反映）
    Browse {
        filter: FavoriteFilter,
        debounce_ms: Option<u64>,
    },
}

impl RecipesCommand {
    /// ログ用の短い名前
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::List { .. } => "list",
            Self::Show { .. } => "show",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Favorite { .. } => "favorite",
            Self::Browse { .. } => "browse",
        }
    }
}
