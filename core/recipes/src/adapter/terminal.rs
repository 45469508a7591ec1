//! 端末への表示（一覧・詳細の整形と browse 用 ListView）

use crate::domain::{Recipe, RecipeQuery};
use crate::ports::outbound::ListView;
use anyhow::Context;
use common::error::Error;
use std::io::{self, Write};

/// 一覧の 1 行: `★ 3f2a  Tomato soup`（お気に入りでなければ空白）
pub fn format_summary(recipe: &Recipe) -> String {
    let star = if recipe.is_favorite { '★' } else { ' ' };
    format!("{} {:<6} {}", star, recipe.id, recipe.title)
}

pub fn format_details(recipe: &Recipe) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}{}\n", recipe.title, if recipe.is_favorite { " ★" } else { "" }));
    out.push_str(&format!("id: {}\n", recipe.id));
    out.push_str(&format!("image: {}\n", recipe.image_url));
    out.push('\n');
    out.push_str(&format!("{}\n", recipe.description));
    out.push_str("\nIngredients:\n");
    for ingredient in &recipe.ingredients {
        out.push_str(&format!("  - {}\n", ingredient));
    }
    out.push_str("\nInstructions:\n");
    for line in recipe.instructions.lines() {
        out.push_str(&format!("  {}\n", line));
    }
    out
}

/// 検索条件の見出し: `"soup" (favorited)`
pub fn describe_query(query: &RecipeQuery) -> String {
    match query.search_text() {
        Some(text) => format!("\"{}\" ({})", text, query.favorite.as_str()),
        None => format!("(no search) ({})", query.favorite.as_str()),
    }
}

/// browse 用: 結果は stdout、ローディングとエラーは stderr
#[derive(Debug, Default)]
pub struct TerminalListView;

impl ListView for TerminalListView {
    fn set_loading(&self, loading: bool) -> anyhow::Result<()> {
        if loading {
            let mut err = io::stderr().lock();
            writeln!(err, "loading...").context("write loading indicator")?;
        }
        Ok(())
    }

    fn show_recipes(&self, query: &RecipeQuery, recipes: &[Recipe]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "== {}: {} recipe(s)", describe_query(query), recipes.len()).context("write list header")?;
        for recipe in recipes {
            writeln!(out, "{}", format_summary(recipe)).context("write list entry")?;
        }
        out.flush().context("flush stdout")?;
        Ok(())
    }

    fn show_error(&self, query: &RecipeQuery, error: &Error) -> anyhow::Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "search {} failed: {}", describe_query(query), error).context("write search error")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FavoriteFilter, RecipeDraft, RecipeId};

    fn soup() -> Recipe {
        RecipeDraft {
            title: "Tomato soup".into(),
            description: "Warm and simple".into(),
            ingredients: vec!["tomatoes".into(), "salt".into()],
            instructions: "Simmer.\nBlend.".into(),
            image_url: "/soup.png".into(),
            is_favorite: true,
        }
        .into_recipe(RecipeId::new("3f2a"))
    }

    #[test]
    fn test_summary_marks_favorites() {
        assert_eq!(format_summary(&soup()), "★ 3f2a   Tomato soup");
        let plain = Recipe {
            is_favorite: false,
            ..soup()
        };
        assert!(format_summary(&plain).starts_with("  3f2a"));
    }

    #[test]
    fn test_details_keep_ingredient_order() {
        let text = format_details(&soup());
        let tomatoes = text.find("- tomatoes").unwrap();
        let salt = text.find("- salt").unwrap();
        assert!(tomatoes < salt);
        assert!(text.contains("  Blend."));
    }

    #[test]
    fn test_describe_query() {
        assert_eq!(
            describe_query(&RecipeQuery::new(" soup ", FavoriteFilter::Favorited)),
            "\"soup\" (favorited)"
        );
        assert_eq!(describe_query(&RecipeQuery::all()), "(no search) (all)");
    }
}
