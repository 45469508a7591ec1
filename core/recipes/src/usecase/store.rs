//! レシピ Store: 一覧キャッシュと「表示中の 1 件」を持ち、変更のたびにサーバー応答で同期する
//!
//! - キャッシュに残るのは常にサーバーの応答。楽観的な仮の値は成功時に応答で置き換え、失敗時に元へ戻す
//! - 一覧・表示中の 1 件はそれぞれチケットを持ち、最新の取得だけを反映する
//! - 状態のロックはネットワーク呼び出しをまたいで保持しない
//! - 同じ ID への同時更新は調停しない（後から届いた応答が勝つ）

use crate::domain::{Recipe, RecipeDraft, RecipeId, RecipePatch, RecipeQuery};
use crate::ports::outbound::RecipeApi;
use common::error::Error;
use common::ports::outbound::{emit, Log, LogLevel, LogRecord};
use std::sync::{Arc, Mutex, MutexGuard};

/// 取得結果がキャッシュに反映されたか
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Applied(T),
    /// 応答が届く前に同じスロットへ新しい取得が発行された
    Superseded,
}

impl<T> Resolution<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(v) => Some(v),
            Self::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// 一覧スロットの予約（`reserve_list` で取り、`fetch_reserved` で使い切る）
#[derive(Debug, PartialEq, Eq)]
pub struct ListTicket(u64);

#[derive(Debug, Default)]
struct StoreState {
    recipes: Vec<Recipe>,
    current: Option<Recipe>,
    list_ticket: u64,
    current_ticket: u64,
}

impl StoreState {
    /// 一覧と表示中の 1 件のうち `id` のものを `updated` で置き換える（位置は保つ）
    fn replace(&mut self, id: &RecipeId, updated: &Recipe) -> bool {
        let mut replaced = false;
        if let Some(entry) = self.recipes.iter_mut().find(|r| &r.id == id) {
            *entry = updated.clone();
            replaced = true;
        }
        if let Some(current) = self.current.as_mut().filter(|r| &r.id == id) {
            *current = updated.clone();
            replaced = true;
        }
        replaced
    }
}

/// 楽観的に書き換える前の値
struct Tentative {
    prior_entry: Option<Recipe>,
    prior_current: Option<Recipe>,
}

/// セッションに 1 つ。wiring で生成し Arc で配る。
pub struct RecipeStore {
    api: Arc<dyn RecipeApi>,
    log: Arc<dyn Log>,
    state: Mutex<StoreState>,
}

impl RecipeStore {
    pub fn new(api: Arc<dyn RecipeApi>, log: Arc<dyn Log>) -> Self {
        Self {
            api,
            log,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, rec: LogRecord) {
        emit(self.log.as_ref(), rec.layer("usecase").kind("store"));
    }

    fn record_failure(&self, op: &str, id: Option<&RecipeId>, e: &Error) {
        let mut rec = LogRecord::new(LogLevel::Warn, format!("{} failed", op))
            .field("error", e.to_string());
        if let Some(id) = id {
            rec = rec.field("id", id.as_str());
        }
        self.record(rec);
    }

    /// キャッシュ中の一覧（スナップショット）
    pub fn recipes(&self) -> Vec<Recipe> {
        self.state().recipes.clone()
    }

    /// 表示中の 1 件
    pub fn current(&self) -> Option<Recipe> {
        self.state().current.clone()
    }

    /// キャッシュから ID で引く（一覧 → 表示中の順）
    pub fn get(&self, id: &RecipeId) -> Option<Recipe> {
        let s = self.state();
        s.recipes
            .iter()
            .find(|r| &r.id == id)
            .or_else(|| s.current.as_ref().filter(|r| &r.id == id))
            .cloned()
    }

    /// 詳細画面を離れたとき。取得中の応答も反映しない。
    pub fn clear_current(&self) {
        let mut s = self.state();
        s.current = None;
        s.current_ticket += 1;
    }

    /// 一覧スロットのチケットを取る（以前に取ったチケットの応答はすべて Superseded になる）
    ///
    /// 発行順とチケット順を揃えたい呼び出し側は、取得を別スレッドへ渡す前にここで予約する。
    pub fn reserve_list(&self) -> ListTicket {
        let mut s = self.state();
        s.list_ticket += 1;
        ListTicket(s.list_ticket)
    }

    /// 一覧を取得してキャッシュを丸ごと置き換える（マージしない）
    ///
    /// 失敗時はキャッシュを変えない。新しい取得に追い越された応答は成功・失敗とも Superseded。
    pub fn fetch_all(&self, query: &RecipeQuery) -> Result<Resolution<Vec<Recipe>>, Error> {
        let ticket = self.reserve_list();
        self.fetch_reserved(ticket, query)
    }

    /// 予約済みのチケットで一覧を取得する
    pub fn fetch_reserved(&self, ticket: ListTicket, query: &RecipeQuery) -> Result<Resolution<Vec<Recipe>>, Error> {
        let ListTicket(ticket) = ticket;
        let result = self.api.list(query);

        let mut s = self.state();
        if s.list_ticket != ticket {
            drop(s);
            self.record(
                LogRecord::new(LogLevel::Debug, "list response superseded")
                    .field("ticket", ticket)
                    .field("ok", result.is_ok()),
            );
            return Ok(Resolution::Superseded);
        }
        match result {
            Ok(recipes) => {
                s.recipes = recipes.clone();
                drop(s);
                self.record(
                    LogRecord::new(LogLevel::Info, "recipes fetched")
                        .field("q", query.search_text().unwrap_or(""))
                        .field("filter", query.favorite.as_str())
                        .field("count", recipes.len()),
                );
                Ok(Resolution::Applied(recipes))
            }
            Err(e) => {
                drop(s);
                self.record_failure("fetch_all", None, &e);
                Err(e)
            }
        }
    }

    /// 1 件取得して「表示中」に置く（毎回上書き）
    pub fn fetch_by_id(&self, id: &RecipeId) -> Result<Resolution<Recipe>, Error> {
        let ticket = {
            let mut s = self.state();
            s.current_ticket += 1;
            s.current_ticket
        };

        let result = self.api.get(id);

        let mut s = self.state();
        if s.current_ticket != ticket {
            drop(s);
            self.record(
                LogRecord::new(LogLevel::Debug, "recipe response superseded")
                    .field("id", id.as_str())
                    .field("ticket", ticket),
            );
            return Ok(Resolution::Superseded);
        }
        match result {
            Ok(recipe) => {
                s.current = Some(recipe.clone());
                drop(s);
                self.record(LogRecord::new(LogLevel::Info, "recipe fetched").field("id", id.as_str()));
                Ok(Resolution::Applied(recipe))
            }
            Err(e) => {
                drop(s);
                self.record_failure("fetch_by_id", Some(id), &e);
                Err(e)
            }
        }
    }

    /// 作成して、サーバーが払い出した ID 付きのレコードを末尾に追加する
    pub fn create(&self, draft: &RecipeDraft) -> Result<Recipe, Error> {
        let created = self.api.create(draft).map_err(|e| {
            self.record_failure("create", None, &e);
            e
        })?;
        self.state().recipes.push(created.clone());
        self.record(LogRecord::new(LogLevel::Info, "recipe created").field("id", created.id.as_str()));
        Ok(created)
    }

    /// PATCH して、同じ ID のエントリをサーバー応答そのもので置き換える
    ///
    /// キャッシュに無い ID は追加しない。
    pub fn update(&self, id: &RecipeId, patch: &RecipePatch) -> Result<Recipe, Error> {
        let updated = self.api.update(id, patch).map_err(|e| {
            self.record_failure("update", Some(id), &e);
            e
        })?;
        let replaced = self.state().replace(id, &updated);
        self.record(
            LogRecord::new(LogLevel::Info, "recipe updated")
                .field("id", id.as_str())
                .field("cached", replaced),
        );
        Ok(updated)
    }

    /// 二段階の楽観的更新
    ///
    /// 1. `edit` をキャッシュ（一覧・表示中）へ即時適用し、元の値を覚える
    /// 2. 成功したらサーバー応答で置き換える
    /// 3. 失敗したら覚えておいた値へ戻してからエラーを返す
    pub fn apply_optimistic<F>(&self, id: &RecipeId, edit: F, patch: &RecipePatch) -> Result<Recipe, Error>
    where
        F: Fn(&mut Recipe),
    {
        let tentative = {
            let mut s = self.state();
            let prior_entry = s.recipes.iter_mut().find(|r| &r.id == id).map(|r| {
                let prior = r.clone();
                edit(r);
                prior
            });
            let prior_current = s.current.as_mut().filter(|r| &r.id == id).map(|r| {
                let prior = r.clone();
                edit(r);
                prior
            });
            Tentative {
                prior_entry,
                prior_current,
            }
        };

        match self.api.update(id, patch) {
            Ok(confirmed) => {
                self.state().replace(id, &confirmed);
                self.record(LogRecord::new(LogLevel::Info, "optimistic update confirmed").field("id", id.as_str()));
                Ok(confirmed)
            }
            Err(e) => {
                self.rollback(id, tentative);
                self.record_failure("optimistic update (rolled back)", Some(id), &e);
                Err(e)
            }
        }
    }

    fn rollback(&self, id: &RecipeId, tentative: Tentative) {
        let mut s = self.state();
        if let Some(prior) = tentative.prior_entry {
            if let Some(entry) = s.recipes.iter_mut().find(|r| &r.id == id) {
                *entry = prior;
            }
        }
        if let Some(prior) = tentative.prior_current {
            if let Some(current) = s.current.as_mut().filter(|r| &r.id == id) {
                *current = prior;
            }
        }
    }

    /// お気に入りを `value` にする（楽観的、失敗時は元に戻る）
    pub fn toggle_favorite(&self, id: &RecipeId, value: bool) -> Result<Recipe, Error> {
        self.apply_optimistic(id, |r| r.is_favorite = value, &RecipePatch::favorite(value))
    }

    /// 削除して一覧から外す。表示中ならそれも消す。
    ///
    /// 戻り値はサーバーが返したレコード、無ければキャッシュにあったもの。
    pub fn delete(&self, id: &RecipeId) -> Result<Option<Recipe>, Error> {
        let from_server = self.api.delete(id).map_err(|e| {
            self.record_failure("delete", Some(id), &e);
            e
        })?;

        let cached = {
            let mut s = self.state();
            let cached = s
                .recipes
                .iter()
                .position(|r| &r.id == id)
                .map(|pos| s.recipes.remove(pos));
            if s.current.as_ref().is_some_and(|r| &r.id == id) {
                s.current = None;
                s.current_ticket += 1;
            }
            cached
        };
        self.record(LogRecord::new(LogLevel::Info, "recipe deleted").field("id", id.as_str()));
        Ok(from_server.or(cached))
    }
}
