//! 結合テストと共通のテストダブル

mod run_app_tests;

use crate::adapter::JsonDbRecipeApi;
use crate::domain::{Recipe, RecipeDraft, RecipeId, RecipePatch, RecipeQuery};
use crate::ports::outbound::{ListView, RecipeApi};
use common::adapter::NoopLog;
use common::error::Error;
use common::ports::outbound::Log;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub(crate) const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// メモリ上の db に委譲しつつ、呼び出しごとに「保留」と「失敗」を差し込める RecipeApi
///
/// 差し込みは呼び出し開始時に取り出すので、どの呼び出しに効くかは呼び出し順で決まる。
pub(crate) struct TestApi {
    db: JsonDbRecipeApi,
    holds: Mutex<VecDeque<(Op, Receiver<()>)>>,
    failures: Mutex<VecDeque<(Op, Error)>>,
    calls: Mutex<Vec<Op>>,
    queries: Mutex<Vec<RecipeQuery>>,
    completed: AtomicUsize,
}

impl TestApi {
    pub(crate) fn new(recipes: Vec<Recipe>) -> Arc<Self> {
        Arc::new(Self {
            db: JsonDbRecipeApi::in_memory(recipes),
            holds: Mutex::new(VecDeque::new()),
            failures: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
        })
    }

    /// 次の `op` 呼び出しを、返した Sender に送るまで止める
    pub(crate) fn hold(&self, op: Op) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.holds.lock().unwrap().push_back((op, rx));
        tx
    }

    /// 次の `op` 呼び出しを `err` で失敗させる
    pub(crate) fn fail_next(&self, op: Op, err: Error) {
        self.failures.lock().unwrap().push_back((op, err));
    }

    pub(crate) fn calls(&self, op: Op) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    pub(crate) fn list_queries(&self) -> Vec<RecipeQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn take<T>(queue: &Mutex<VecDeque<(Op, T)>>, op: Op) -> Option<T> {
        let mut q = queue.lock().unwrap();
        let pos = q.iter().position(|(o, _)| *o == op)?;
        q.remove(pos).map(|(_, v)| v)
    }

    fn call<T>(&self, op: Op, f: impl FnOnce() -> Result<T, Error>) -> Result<T, Error> {
        let hold = Self::take(&self.holds, op);
        let failure = Self::take(&self.failures, op);
        self.calls.lock().unwrap().push(op);
        if let Some(rx) = hold {
            let _ = rx.recv_timeout(WAIT);
        }
        let result = match failure {
            Some(err) => Err(err),
            None => f(),
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

impl RecipeApi for TestApi {
    fn list(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, Error> {
        self.queries.lock().unwrap().push(query.clone());
        self.call(Op::List, || self.db.list(query))
    }

    fn get(&self, id: &RecipeId) -> Result<Recipe, Error> {
        self.call(Op::Get, || self.db.get(id))
    }

    fn create(&self, draft: &RecipeDraft) -> Result<Recipe, Error> {
        self.call(Op::Create, || self.db.create(draft))
    }

    fn update(&self, id: &RecipeId, patch: &RecipePatch) -> Result<Recipe, Error> {
        self.call(Op::Update, || self.db.update(id, patch))
    }

    fn delete(&self, id: &RecipeId) -> Result<Option<Recipe>, Error> {
        self.call(Op::Delete, || self.db.delete(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewEvent {
    Loading(bool),
    Recipes(RecipeQuery, Vec<String>),
    Error(RecipeQuery, String),
}

/// 描画内容を記録する ListView
#[derive(Default)]
pub(crate) struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub(crate) fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    /// 描画された一覧の検索語（順番どおり）
    pub(crate) fn rendered_texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Recipes(q, _) => Some(q.text),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_loading(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Loading(v) => Some(v),
            _ => None,
        })
    }
}

impl ListView for RecordingView {
    fn set_loading(&self, loading: bool) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(ViewEvent::Loading(loading));
        Ok(())
    }

    fn show_recipes(&self, query: &RecipeQuery, recipes: &[Recipe]) -> anyhow::Result<()> {
        let ids = recipes.iter().map(|r| r.id.to_string()).collect();
        self.events.lock().unwrap().push(ViewEvent::Recipes(query.clone(), ids));
        Ok(())
    }

    fn show_error(&self, query: &RecipeQuery, error: &Error) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(ViewEvent::Error(query.clone(), error.to_string()));
        Ok(())
    }
}

pub(crate) fn noop_log() -> Arc<dyn Log> {
    Arc::new(NoopLog)
}

pub(crate) fn recipe(id: &str, title: &str, favorite: bool) -> Recipe {
    RecipeDraft {
        title: title.to_string(),
        description: format!("{} for a quiet evening", title),
        ingredients: vec!["water".to_string(), "salt".to_string()],
        instructions: "Combine everything and cook until done.".to_string(),
        image_url: format!("https://example.com/{}.jpg", id),
        is_favorite: favorite,
    }
    .into_recipe(RecipeId::new(id))
}

pub(crate) fn ids(recipes: &[Recipe]) -> Vec<String> {
    recipes.iter().map(|r| r.id.to_string()).collect()
}

/// 条件が成り立つまで待つ（WAIT で打ち切り）
pub(crate) fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}
