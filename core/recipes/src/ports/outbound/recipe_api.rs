//! レシピ REST API の Outbound ポート
//!
//! `recipes` コレクションに対する 5 操作。実装は HttpRecipeApi（REST）と JsonDbRecipeApi（db.json）。

use crate::domain::{Recipe, RecipeDraft, RecipeId, RecipePatch, RecipeQuery};
use common::error::Error;

pub trait RecipeApi: Send + Sync {
    /// `GET /recipes?q=..&isFavorite=..`
    fn list(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, Error>;

    /// `GET /recipes/:id`。無ければ `Error::NotFound`
    fn get(&self, id: &RecipeId) -> Result<Recipe, Error>;

    /// `POST /recipes`。ID はサーバーが払い出す
    fn create(&self, draft: &RecipeDraft) -> Result<Recipe, Error>;

    /// `PATCH /recipes/:id`。更新後の全フィールドを返す
    fn update(&self, id: &RecipeId, patch: &RecipePatch) -> Result<Recipe, Error>;

    /// `DELETE /recipes/:id`。削除したレコードを返さないサーバーもあるので Option
    fn delete(&self, id: &RecipeId) -> Result<Option<Recipe>, Error>;
}
