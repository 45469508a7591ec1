//! 送信前の入力検証（フォームのバリデータに相当）
//!
//! ここで弾いたものは Store にもサーバーにも届かない。失敗したフィールドはまとめて返す。

use crate::domain::RecipeDraft;
use common::error::Error;
use regex::Regex;

pub const TITLE_MIN: usize = 3;
pub const DESCRIPTION_MIN: usize = 10;
pub const INSTRUCTIONS_MIN: usize = 20;

/// http(s) の URL か、アップロード先などのサーバー相対パス
const IMAGE_URL_PATTERN: &str = r"^(https?://[^\s/]+(/\S*)?|/\S+)$";

/// 1 フィールド分の検証エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 下書きを検証する（前後の空白は無視して長さを数える）
pub fn validate_draft(draft: &RecipeDraft) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    check_min_len(&mut errors, "title", &draft.title, TITLE_MIN);
    check_min_len(&mut errors, "description", &draft.description, DESCRIPTION_MIN);
    check_min_len(&mut errors, "instructions", &draft.instructions, INSTRUCTIONS_MIN);

    if draft.ingredients.is_empty() {
        errors.push(FieldError {
            field: "ingredients",
            message: "at least one ingredient is required".to_string(),
        });
    }
    for (i, ingredient) in draft.ingredients.iter().enumerate() {
        if ingredient.trim().is_empty() {
            errors.push(FieldError {
                field: "ingredients",
                message: format!("ingredient #{} is empty", i + 1),
            });
        }
    }

    let image_url = draft.image_url.trim();
    if image_url.is_empty() {
        errors.push(FieldError {
            field: "imageUrl",
            message: "is required".to_string(),
        });
    } else if !image_url_is_valid(image_url) {
        errors.push(FieldError {
            field: "imageUrl",
            message: format!("'{}' is not an http(s) URL or a /path", image_url),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// 検証して `Error::Validation` に畳み込む
pub fn ensure_valid(draft: &RecipeDraft) -> Result<(), Error> {
    validate_draft(draft).map_err(|errors| {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Error::validation(joined)
    })
}

fn check_min_len(errors: &mut Vec<FieldError>, field: &'static str, value: &str, min: usize) {
    let len = value.trim().chars().count();
    if len == 0 {
        errors.push(FieldError {
            field,
            message: "is required".to_string(),
        });
    } else if len < min {
        errors.push(FieldError {
            field,
            message: format!("must be at least {} characters", min),
        });
    }
}

fn image_url_is_valid(url: &str) -> bool {
    match Regex::new(IMAGE_URL_PATTERN) {
        Ok(re) => re.is_match(url),
        Err(_) => false,
    }
}
