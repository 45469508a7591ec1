//! recipes 固有のドメイン型（型と不変条件）

pub mod command;
pub mod query;
pub mod recipe;
pub mod settings;
pub mod validation;

pub use command::RecipesCommand;
pub use query::{FavoriteFilter, RecipeQuery};
pub use recipe::{Recipe, RecipeDraft, RecipeId, RecipePatch};
pub use settings::{Settings, SettingsFile};
pub use validation::{ensure_valid, validate_draft, FieldError};
