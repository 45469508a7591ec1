//! レシピのドメイン型
//!
//! ワイヤ上のフィールド名は camelCase（`imageUrl`, `isFavorite`）。

use serde::{Deserialize, Deserializer, Serialize};

/// バックエンドが払い出すレシピ ID（不透明な文字列）
///
/// json-server の版によって文字列と数値の両方があり得るため、どちらも文字列として受ける。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for RecipeId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(serde_json::Number),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Self(s),
            Repr::Number(n) => Self(n.to_string()),
        })
    }
}

/// レシピ 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    /// 表示順に意味がある。重複可。
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image_url: String,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Recipe {
    /// 編集フォームの初期値
    pub fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
            image_url: self.image_url.clone(),
            is_favorite: self.is_favorite,
        }
    }
}

/// 新規作成の本文（ID なし）。編集時の「全フィールド」としても使う。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image_url: String,
    #[serde(default)]
    pub is_favorite: bool,
}

impl RecipeDraft {
    /// 各フィールドの前後の空白を落とす
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            ingredients: self
                .ingredients
                .into_iter()
                .map(|i| i.trim().to_string())
                .collect(),
            instructions: self.instructions.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
            is_favorite: self.is_favorite,
        }
    }

    pub fn into_recipe(self, id: RecipeId) -> Recipe {
        Recipe {
            id,
            title: self.title,
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            image_url: self.image_url,
            is_favorite: self.is_favorite,
        }
    }
}

/// PATCH の本文。None のフィールドは送らない。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl RecipePatch {
    /// お気に入りだけを変える狭い PATCH
    pub fn favorite(value: bool) -> Self {
        Self {
            is_favorite: Some(value),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 指定されたフィールドだけを置き換える
    pub fn apply_to(&self, recipe: &mut Recipe) {
        if let Some(v) = &self.title {
            recipe.title = v.clone();
        }
        if let Some(v) = &self.description {
            recipe.description = v.clone();
        }
        if let Some(v) = &self.ingredients {
            recipe.ingredients = v.clone();
        }
        if let Some(v) = &self.instructions {
            recipe.instructions = v.clone();
        }
        if let Some(v) = &self.image_url {
            recipe.image_url = v.clone();
        }
        if let Some(v) = self.is_favorite {
            recipe.is_favorite = v;
        }
    }
}

impl From<RecipeDraft> for RecipePatch {
    fn from(d: RecipeDraft) -> Self {
        Self {
            title: Some(d.title),
            description: Some(d.description),
            ingredients: Some(d.ingredients),
            instructions: Some(d.instructions),
            image_url: Some(d.image_url),
            is_favorite: Some(d.is_favorite),
        }
    }
}
