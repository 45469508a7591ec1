//! 検索条件（自由文 + お気に入りフィルタ）とクエリパラメータへの変換
//!
//! 絞り込みはサーバー側のみで行う。クライアントで再フィルタしない。

use common::error::Error;
use std::str::FromStr;

/// お気に入りの 3 値フィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteFilter {
    #[default]
    All,
    Favorited,
    Unfavorited,
}

impl FavoriteFilter {
    /// `isFavorite` に渡す値。All のときはパラメータ自体を付けない。
    pub fn as_param(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Favorited => Some(true),
            Self::Unfavorited => Some(false),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Favorited => "favorited",
            Self::Unfavorited => "unfavorited",
        }
    }
}

impl FromStr for FavoriteFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "favorited" | "fav" | "favorites" => Ok(Self::Favorited),
            "unfavorited" | "unfav" => Ok(Self::Unfavorited),
            other => Err(Error::invalid_argument(format!(
                "Unknown favorite filter '{}' (expected all, favorited or unfavorited)",
                other
            ))),
        }
    }
}

/// 一覧取得の条件
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeQuery {
    pub text: String,
    pub favorite: FavoriteFilter,
}

impl RecipeQuery {
    pub fn new(text: impl Into<String>, favorite: FavoriteFilter) -> Self {
        Self {
            text: text.into(),
            favorite,
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    /// 空白だけの検索語は「検索なし」
    pub fn search_text(&self) -> Option<&str> {
        let t = self.text.trim();
        (!t.is_empty()).then_some(t)
    }

    /// `GET /recipes` のクエリパラメータ（`q`, `isFavorite`）
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(text) = self.search_text() {
            params.push(("q", text.to_string()));
        }
        if let Some(fav) = self.favorite.as_param() {
            params.push(("isFavorite", fav.to_string()));
        }
        params
    }
}
