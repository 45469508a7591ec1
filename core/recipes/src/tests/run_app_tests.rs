use super::{recipe, RecordingView, ViewEvent};
use crate::cli::Config;
use crate::domain::{FavoriteFilter, Recipe, RecipeDraft, RecipeId, RecipePatch, RecipeQuery, RecipesCommand};
use crate::ports::inbound::UseCaseRunner;
use crate::ports::outbound::{EnvResolver, ListView};
use crate::wiring::wire_recipes_with;
use common::error::Error;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

struct TempHome {
    home: PathBuf,
}

impl EnvResolver for TempHome {
    fn resolve_home_dir(&self) -> Result<PathBuf, Error> {
        Ok(self.home.clone())
    }

    fn api_url_from_env(&self) -> Option<String> {
        None
    }
}

struct Env {
    dir: tempfile::TempDir,
}

impl Env {
    fn new(seed: &[Recipe]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        if !seed.is_empty() {
            let doc = serde_json::json!({ "recipes": seed });
            std::fs::write(dir.path().join("db.json"), doc.to_string()).unwrap();
        }
        Self { dir }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("db.json")
    }

    fn config(&self, command: RecipesCommand) -> Config {
        Config {
            non_interactive: true,
            db: Some(self.db()),
            command,
            ..Default::default()
        }
    }

    fn run(&self, command: RecipesCommand) -> Result<i32, Error> {
        let config = self.config(command);
        let home = TempHome {
            home: self.dir.path().join("home"),
        };
        let app = wire_recipes_with(&config, &home)?;
        let runner = crate::Runner { app };
        runner.run(config)
    }

    fn stored(&self) -> Vec<Recipe> {
        stored_in(&self.db())
    }
}

fn stored_in(path: &Path) -> Vec<Recipe> {
    let text = std::fs::read_to_string(path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    serde_json::from_value(doc["recipes"].clone()).unwrap()
}

fn valid_draft() -> RecipeDraft {
    RecipeDraft {
        title: "  Lemon pasta ".into(),
        description: "Bright and quick weeknight dinner".into(),
        ingredients: vec!["pasta".into(), "lemon".into(), "parmesan".into()],
        instructions: "Boil the pasta, then toss with lemon and cheese.".into(),
        image_url: "https://example.com/lemon.jpg".into(),
        is_favorite: false,
    }
}

#[test]
fn test_run_app_with_help() {
    let env = Env::new(&[]);
    assert_eq!(env.run(RecipesCommand::Help).unwrap(), 0);
    let log = std::fs::read_to_string(env.dir.path().join("home").join("log.jsonl")).unwrap();
    assert!(log.contains("\"command\":\"help\""));
}

#[test]
fn test_run_app_create_persists_normalized_record() {
    let env = Env::new(&[]);
    let code = env
        .run(RecipesCommand::Create {
            draft: valid_draft(),
        })
        .unwrap();
    assert_eq!(code, 0);

    let stored = env.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Lemon pasta");
    assert_eq!(stored[0].ingredients, vec!["pasta", "lemon", "parmesan"]);
}

#[test]
fn test_run_app_invalid_create_sends_nothing() {
    let env = Env::new(&[]);
    let draft = RecipeDraft {
        title: "ab".into(),
        ..valid_draft()
    };
    let err = env.run(RecipesCommand::Create { draft }).unwrap_err();
    assert_eq!(err.exit_code(), 65);
    assert!(err.to_string().contains("title"));
    assert!(!env.db().exists());
}

#[test]
fn test_run_app_list_and_show() {
    let env = Env::new(&[recipe("a", "Soup", false)]);
    assert_eq!(
        env.run(RecipesCommand::List {
            query: RecipeQuery::new("soup", FavoriteFilter::All)
        })
        .unwrap(),
        0
    );
    assert_eq!(
        env.run(RecipesCommand::Show {
            id: RecipeId::new("a")
        })
        .unwrap(),
        0
    );
}

#[test]
fn test_run_app_show_missing_is_not_found() {
    let env = Env::new(&[recipe("a", "Soup", false)]);
    let err = env
        .run(RecipesCommand::Show {
            id: RecipeId::new("nope"),
        })
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.exit_code(), 66);
}

#[test]
fn test_run_app_update_merges_with_current_values() {
    let env = Env::new(&[recipe("a", "Soup", false), recipe("b", "Pasta", true)]);
    let patch = RecipePatch {
        title: Some("Miso soup".into()),
        ..Default::default()
    };
    env.run(RecipesCommand::Update {
        id: RecipeId::new("a"),
        patch,
    })
    .unwrap();

    let stored = env.stored();
    assert_eq!(stored[0].title, "Miso soup");
    assert_eq!(stored[0].ingredients, recipe("a", "Soup", false).ingredients);
    assert_eq!(stored[1], recipe("b", "Pasta", true));
}

#[test]
fn test_run_app_update_requires_a_field() {
    let env = Env::new(&[recipe("a", "Soup", false)]);
    let err = env
        .run(RecipesCommand::Update {
            id: RecipeId::new("a"),
            patch: RecipePatch::default(),
        })
        .unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn test_run_app_update_validates_merged_record() {
    let env = Env::new(&[recipe("a", "Soup", false)]);
    let patch = RecipePatch {
        instructions: Some("too short".into()),
        ..Default::default()
    };
    let err = env
        .run(RecipesCommand::Update {
            id: RecipeId::new("a"),
            patch,
        })
        .unwrap_err();
    assert_eq!(err.exit_code(), 65);
    assert_eq!(env.stored()[0], recipe("a", "Soup", false));
}

#[test]
fn test_run_app_favorite_toggles() {
    let env = Env::new(&[recipe("a", "Soup", false)]);
    let favorite = || RecipesCommand::Favorite {
        id: RecipeId::new("a"),
    };

    env.run(favorite()).unwrap();
    assert!(env.stored()[0].is_favorite);
    env.run(favorite()).unwrap();
    assert!(!env.stored()[0].is_favorite);
}

#[test]
fn test_run_app_delete_needs_confirmation() {
    let env = Env::new(&[recipe("a", "Soup", false), recipe("b", "Pasta", false)]);

    // --no-interactive で -y なしなら削除しない
    let code = env
        .run(RecipesCommand::Delete {
            id: RecipeId::new("a"),
            assume_yes: false,
        })
        .unwrap();
    assert_eq!(code, 1);
    assert_eq!(env.stored().len(), 2);

    let code = env
        .run(RecipesCommand::Delete {
            id: RecipeId::new("a"),
            assume_yes: true,
        })
        .unwrap();
    assert_eq!(code, 0);
    let remaining: Vec<_> = env.stored().into_iter().map(|r| r.id).collect();
    assert_eq!(remaining, vec![RecipeId::new("b")]);
}

#[test]
fn test_run_app_writes_lifecycle_log() {
    let env = Env::new(&[recipe("a", "Soup", false)]);
    env.run(RecipesCommand::List {
        query: RecipeQuery::all(),
    })
    .unwrap();

    let log = std::fs::read_to_string(env.dir.path().join("home").join("log.jsonl")).unwrap();
    assert!(log.contains("\"command started\""));
    assert!(log.contains("\"command finished\""));
    assert!(log.contains("\"recipes fetched\""));
}

#[test]
fn test_browse_reads_lines_until_end_of_input() {
    let env = Env::new(&[
        recipe("a", "Tomato soup", true),
        recipe("b", "Tomato salad", false),
        recipe("c", "Pasta", true),
    ]);
    // Browse 以外で配線して Ctrl+C ハンドラを登録しない
    let config = env.config(RecipesCommand::List {
        query: RecipeQuery::all(),
    });
    let home = TempHome {
        home: env.dir.path().join("home"),
    };
    let app = wire_recipes_with(&config, &home).unwrap();
    let view = Arc::new(RecordingView::default());

    app.recipes_use_case
        .browse(
            Arc::clone(&view) as Arc<dyn ListView>,
            FavoriteFilter::All,
            Duration::from_millis(10),
            Cursor::new("tomato\n:fav\n"),
        )
        .unwrap();

    let last = view
        .events()
        .into_iter()
        .rev()
        .find(|e| matches!(e, ViewEvent::Recipes(..)));
    assert_eq!(
        last,
        Some(ViewEvent::Recipes(
            RecipeQuery::new("tomato", FavoriteFilter::Favorited),
            vec!["a".to_string()]
        ))
    );
    assert_eq!(view.last_loading(), Some(false));
}

#[test]
fn test_browse_quit_stops_reading() {
    let env = Env::new(&[recipe("a", "Soup", false)]);
    // Browse 以外で配線して Ctrl+C ハンドラを登録しない
    let config = env.config(RecipesCommand::List {
        query: RecipeQuery::all(),
    });
    let home = TempHome {
        home: env.dir.path().join("home"),
    };
    let app = wire_recipes_with(&config, &home).unwrap();
    let view = Arc::new(RecordingView::default());

    app.recipes_use_case
        .browse(
            Arc::clone(&view) as Arc<dyn ListView>,
            FavoriteFilter::All,
            Duration::from_secs(30),
            Cursor::new(":q\nsoup\n"),
        )
        .unwrap();

    assert!(!view.rendered_texts().contains(&"soup".to_string()));
}
