//! recipes のユースケース（Store と各ポートを束ねる）
//!
//! 画面遷移に相当する振る舞いもここで決める。
//! - 詳細・編集の前に Store で 1 件解決する。解決に失敗したら表示中を消して呼び出し元へ返す
//! - 作成・編集は送信前に検証し、通らなければ Store に触れない
//! - 削除は確認を経てから

use crate::domain::{ensure_valid, FavoriteFilter, Recipe, RecipeDraft, RecipeId, RecipePatch, RecipeQuery};
use crate::ports::outbound::{Confirm, InterruptChecker, ListView};
use crate::usecase::search::SearchSession;
use crate::usecase::store::{RecipeStore, Resolution};
use common::error::Error;
use common::ports::outbound::{emit, Log, LogLevel, LogRecord};
use std::io::BufRead;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const INPUT_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Option<Recipe>),
    Declined,
}

/// browse の 1 行入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseLine {
    Quit,
    Filter(FavoriteFilter),
    Text(String),
    /// `:` で始まる未知のコマンド
    Unknown(String),
}

impl BrowseLine {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(cmd) = trimmed.strip_prefix(':') else {
            return Self::Text(line.trim_end_matches(['\r', '\n']).to_string());
        };
        match cmd.trim() {
            "q" | "quit" => Self::Quit,
            "all" => Self::Filter(FavoriteFilter::All),
            "fav" => Self::Filter(FavoriteFilter::Favorited),
            "unfav" => Self::Filter(FavoriteFilter::Unfavorited),
            other => match other.strip_prefix("filter ").map(|f| f.parse::<FavoriteFilter>()) {
                Some(Ok(filter)) => Self::Filter(filter),
                _ => Self::Unknown(trimmed.to_string()),
            },
        }
    }
}

pub struct RecipesUseCase {
    pub store: Arc<RecipeStore>,
    pub confirm: Arc<dyn Confirm>,
    pub interrupt: Arc<dyn InterruptChecker>,
    pub log: Arc<dyn Log>,
    /// browse 終了時に最後の検索を待つ上限の基準
    pub request_timeout: Duration,
}

impl RecipesUseCase {
    pub fn new(
        store: Arc<RecipeStore>,
        confirm: Arc<dyn Confirm>,
        interrupt: Arc<dyn InterruptChecker>,
        log: Arc<dyn Log>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            store,
            confirm,
            interrupt,
            log,
            request_timeout,
        }
    }

    fn record(&self, rec: LogRecord) {
        emit(self.log.as_ref(), rec.layer("usecase").kind("app"));
    }

    pub fn list(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, Error> {
        Ok(match self.store.fetch_all(query)? {
            Resolution::Applied(recipes) => recipes,
            Resolution::Superseded => self.store.recipes(),
        })
    }

    pub fn show(&self, id: &RecipeId) -> Result<Recipe, Error> {
        self.resolve(id)
    }

    /// 詳細・編集画面へ入る前の 1 件解決
    fn resolve(&self, id: &RecipeId) -> Result<Recipe, Error> {
        match self.store.fetch_by_id(id) {
            Ok(Resolution::Applied(recipe)) => Ok(recipe),
            Ok(Resolution::Superseded) => self
                .store
                .current()
                .filter(|r| &r.id == id)
                .ok_or_else(|| Error::system(format!("Lookup of recipe '{}' was superseded", id))),
            Err(e) => {
                self.store.clear_current();
                Err(e)
            }
        }
    }

    pub fn create(&self, draft: RecipeDraft) -> Result<Recipe, Error> {
        let draft = draft.normalized();
        ensure_valid(&draft)?;
        self.store.create(&draft)
    }

    /// 現在の値に `patch` を重ねたもの全体を検証してから送る
    pub fn update(&self, id: &RecipeId, patch: RecipePatch) -> Result<Recipe, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_argument("Nothing to update: give at least one field"));
        }
        let mut merged = self.resolve(id)?;
        patch.apply_to(&mut merged);
        let draft = merged.to_draft().normalized();
        ensure_valid(&draft)?;
        self.store.update(id, &RecipePatch::from(draft))
    }

    pub fn delete(&self, id: &RecipeId, assume_yes: bool) -> Result<DeleteOutcome, Error> {
        if !assume_yes && !self.confirm.confirm(&format!("Delete recipe {}?", id))? {
            self.record(LogRecord::new(LogLevel::Info, "delete declined").field("id", id.as_str()));
            return Ok(DeleteOutcome::Declined);
        }
        self.store.delete(id).map(DeleteOutcome::Deleted)
    }

    /// 現在の値を解決して反転する
    pub fn toggle_favorite(&self, id: &RecipeId) -> Result<Recipe, Error> {
        let current = self.resolve(id)?;
        self.store.toggle_favorite(id, !current.is_favorite)
    }

    /// 1 行ずつ読んで検索セッションへ流す
    ///
    /// `:q`、入力の終わり、Ctrl+C のいずれかで終わる。入力の終わりでは最後の検索が表示されるまで待つ。
    pub fn browse<R>(
        &self,
        view: Arc<dyn ListView>,
        filter: FavoriteFilter,
        debounce: Duration,
        input: R,
    ) -> Result<(), Error>
    where
        R: BufRead + Send + 'static,
    {
        let session = SearchSession::start(
            Arc::clone(&self.store),
            view,
            Arc::clone(&self.log),
            filter,
            debounce,
        );

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        let reason = loop {
            match rx.recv_timeout(INPUT_POLL) {
                Ok(line) => match BrowseLine::parse(&line) {
                    BrowseLine::Quit => break "quit",
                    BrowseLine::Filter(f) => session.set_filter(f),
                    BrowseLine::Text(text) => session.set_text(text),
                    BrowseLine::Unknown(cmd) => {
                        eprintln!("unknown command {} (use :all, :fav, :unfav or :q)", cmd);
                    }
                },
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if self.interrupt.is_interrupted() {
                        break "interrupted";
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    if !session.settle(debounce + self.request_timeout) {
                        self.record(LogRecord::new(LogLevel::Warn, "last search did not settle"));
                    }
                    break "end of input";
                }
            }
        };

        session.close();
        self.record(LogRecord::new(LogLevel::Info, "browse finished").field("reason", reason));
        Ok(())
    }
}
