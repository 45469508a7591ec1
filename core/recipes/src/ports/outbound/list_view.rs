//! 一覧画面の Outbound ポート
//!
//! SearchSession が最新の結果とローディング状態をここへ流す。
//! 失敗しても検索は止めない（ログに残して次へ）。

use crate::domain::{Recipe, RecipeQuery};
use common::error::Error;

pub trait ListView: Send + Sync {
    fn set_loading(&self, loading: bool) -> anyhow::Result<()>;

    fn show_recipes(&self, query: &RecipeQuery, recipes: &[Recipe]) -> anyhow::Result<()>;

    fn show_error(&self, query: &RecipeQuery, error: &Error) -> anyhow::Result<()>;
}
