//! 一覧画面の検索セッション
//!
//! 入力（検索語・フィルタ）をワーカースレッドで受け、次の規則で Store の `fetch_all` を発行する。
//!
//! - 検索語は入力が 300ms（設定可）途切れてから採用する
//! - 直前に採用した検索語と同じなら発行しない
//! - フィルタの変更は待たずに即発行する（検索語は最後に採用したものを使う）
//! - 新しい発行は前の発行を無効にする。結果は最新の発行のものだけ描画する
//! - ローディング表示は発行で点き、最新の発行が解決したら消える
//! - close（または drop）後は何も描画しない

use crate::domain::{FavoriteFilter, Recipe, RecipeQuery};
use crate::ports::outbound::ListView;
use crate::usecase::store::{RecipeStore, Resolution};
use common::cancel::CancelToken;
use common::error::Error;
use common::ports::outbound::{emit, Log, LogLevel, LogRecord};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

enum Input {
    Text(String),
    Filter(FavoriteFilter),
    /// 待機中の検索語を今すぐ採用し、採用したら ack を返す
    Flush(Sender<()>),
}

#[derive(Debug, Default)]
struct Slot {
    latest: u64,
    loading: bool,
}

/// 発行と描画。描画は slot のロック内で行い、古い結果が新しい結果を上書きしないようにする。
struct Dispatcher {
    store: Arc<RecipeStore>,
    view: Arc<dyn ListView>,
    log: Arc<dyn Log>,
    cancel: CancelToken,
    slot: Mutex<Slot>,
    idle: Condvar,
}

impl Dispatcher {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, rec: LogRecord) {
        emit(self.log.as_ref(), rec.layer("usecase").kind("search"));
    }

    fn render(&self, what: &str, result: anyhow::Result<()>) {
        if let Err(e) = result {
            self.record(
                LogRecord::new(LogLevel::Warn, "view update failed")
                    .field("what", what)
                    .field("error", e.to_string()),
            );
        }
    }

    fn issue(self: &Arc<Self>, query: RecipeQuery) {
        if self.cancel.is_cancelled() {
            return;
        }
        // Store のチケットは取得スレッドではなくここで、発行順に取る
        let (generation, ticket) = {
            let mut slot = self.slot();
            slot.latest += 1;
            let ticket = self.store.reserve_list();
            if !slot.loading {
                slot.loading = true;
                self.render("loading", self.view.set_loading(true));
            }
            (slot.latest, ticket)
        };
        self.record(
            LogRecord::new(LogLevel::Debug, "search issued")
                .field("q", query.search_text().unwrap_or(""))
                .field("filter", query.favorite.as_str())
                .field("generation", generation),
        );

        let this = Arc::clone(self);
        thread::spawn(move || {
            let result = this.store.fetch_reserved(ticket, &query);
            this.deliver(generation, &query, result);
        });
    }

    fn deliver(&self, generation: u64, query: &RecipeQuery, result: Result<Resolution<Vec<Recipe>>, Error>) {
        let mut slot = self.slot();
        if self.cancel.is_cancelled() || slot.latest != generation {
            drop(slot);
            self.record(LogRecord::new(LogLevel::Debug, "search result dropped").field("generation", generation));
            return;
        }
        match result {
            Ok(Resolution::Applied(recipes)) => self.render("recipes", self.view.show_recipes(query, &recipes)),
            // 同じ Store を使う別の呼び出しに追い越された。キャッシュはそちらの結果。
            Ok(Resolution::Superseded) => {}
            Err(e) => self.render("error", self.view.show_error(query, &e)),
        }
        slot.loading = false;
        self.render("loading", self.view.set_loading(false));
        self.idle.notify_all();
    }

    fn wait_idle(&self, timeout: Duration) -> bool {
        let slot = self.slot();
        let (slot, _) = self
            .idle
            .wait_timeout_while(slot, timeout, |s| s.loading && !self.cancel.is_cancelled())
            .unwrap_or_else(|e| e.into_inner());
        !slot.loading
    }
}

/// 一覧画面 1 つ分の検索セッション
pub struct SearchSession {
    tx: Option<Sender<Input>>,
    dispatcher: Arc<Dispatcher>,
    worker: Option<JoinHandle<()>>,
}

impl SearchSession {
    /// 開始時に検索語なし + `filter` で 1 回取得する
    pub fn start(
        store: Arc<RecipeStore>,
        view: Arc<dyn ListView>,
        log: Arc<dyn Log>,
        filter: FavoriteFilter,
        debounce: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let dispatcher = Arc::new(Dispatcher {
            store,
            view,
            log,
            cancel: CancelToken::new(),
            slot: Mutex::new(Slot::default()),
            idle: Condvar::new(),
        });
        let worker_dispatcher = Arc::clone(&dispatcher);
        let worker = thread::spawn(move || run_worker(rx, worker_dispatcher, filter, debounce));
        Self {
            tx: Some(tx),
            dispatcher,
            worker: Some(worker),
        }
    }

    fn send(&self, input: Input) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(input);
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.send(Input::Text(text.into()));
    }

    pub fn set_filter(&self, filter: FavoriteFilter) {
        self.send(Input::Filter(filter));
    }

    /// 入力が途切れたものとして待機中の検索語を採用し、最新の取得が解決するまで待つ
    ///
    /// 時間内に解決したら true。
    pub fn settle(&self, timeout: Duration) -> bool {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.send(Input::Flush(ack_tx));
        if ack_rx.recv_timeout(timeout).is_err() {
            return false;
        }
        self.dispatcher.wait_idle(timeout)
    }

    pub fn is_loading(&self) -> bool {
        self.dispatcher.slot().loading
    }

    /// 以降に届く結果は描画しない。取得中のリクエスト自体は止めない。
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.dispatcher.cancel.cancel();
        self.dispatcher.idle.notify_all();
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(rx: Receiver<Input>, dispatcher: Arc<Dispatcher>, mut filter: FavoriteFilter, debounce: Duration) {
    let mut acted_text = String::new();
    let mut pending: Option<(String, Instant)> = None;

    dispatcher.issue(RecipeQuery::new(acted_text.clone(), filter));

    loop {
        if dispatcher.cancel.is_cancelled() {
            break;
        }
        let input = match &pending {
            Some((_, deadline)) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(input) => Some(input),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(input) => Some(input),
                Err(_) => break,
            },
        };

        match input {
            Some(Input::Text(text)) => pending = Some((text, Instant::now() + debounce)),
            Some(Input::Filter(next)) => {
                if next != filter {
                    filter = next;
                    dispatcher.issue(RecipeQuery::new(acted_text.clone(), filter));
                }
            }
            Some(Input::Flush(ack)) => {
                if let Some((text, _)) = pending.take() {
                    adopt(&dispatcher, &mut acted_text, text, filter);
                }
                let _ = ack.send(());
            }
            // 静止期間が明けた
            None => {
                if let Some((text, _)) = pending.take() {
                    adopt(&dispatcher, &mut acted_text, text, filter);
                }
            }
        }
    }
}

fn adopt(dispatcher: &Arc<Dispatcher>, acted_text: &mut String, text: String, filter: FavoriteFilter) {
    if text == *acted_text {
        return;
    }
    *acted_text = text;
    dispatcher.issue(RecipeQuery::new(acted_text.clone(), filter));
}
