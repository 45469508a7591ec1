//! REST バックエンド（json-server 互換）への RecipeApi 実装

use crate::domain::{Recipe, RecipeDraft, RecipeId, RecipePatch, RecipeQuery};
use crate::ports::outbound::RecipeApi;
use common::error::Error;
use common::http::HttpTransport;
use serde_json::Value;

const COLLECTION: &str = "recipes";

pub struct HttpRecipeApi {
    transport: HttpTransport,
}

impl HttpRecipeApi {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    fn item_path(id: &RecipeId) -> [&str; 2] {
        [COLLECTION, id.as_str()]
    }
}

impl RecipeApi for HttpRecipeApi {
    fn list(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, Error> {
        self.transport.get(&[COLLECTION], &query.to_params())
    }

    fn get(&self, id: &RecipeId) -> Result<Recipe, Error> {
        self.transport.get(&Self::item_path(id), &[])
    }

    fn create(&self, draft: &RecipeDraft) -> Result<Recipe, Error> {
        self.transport.post(&[COLLECTION], draft)
    }

    fn update(&self, id: &RecipeId, patch: &RecipePatch) -> Result<Recipe, Error> {
        self.transport.patch(&Self::item_path(id), patch)
    }

    fn delete(&self, id: &RecipeId) -> Result<Option<Recipe>, Error> {
        // json-server は版によって `{}` か削除したレコードを返す
        let body: Value = self.transport.delete(&Self::item_path(id))?;
        Ok(serde_json::from_value(body).ok())
    }
}
