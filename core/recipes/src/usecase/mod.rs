pub(crate) mod app;
pub(crate) mod search;
pub(crate) mod store;

pub(crate) use app::{DeleteOutcome, RecipesUseCase};
pub(crate) use search::SearchSession;
pub(crate) use store::{RecipeStore, Resolution};
