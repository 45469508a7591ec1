//! Outbound ポート: アプリが外界を使うための trait

pub mod confirm;
pub mod env_resolver;
pub mod interrupt_checker;
pub mod list_view;
pub mod recipe_api;

pub use confirm::Confirm;
pub use env_resolver::EnvResolver;
pub use interrupt_checker::InterruptChecker;
pub use list_view::ListView;
pub use recipe_api::RecipeApi;
