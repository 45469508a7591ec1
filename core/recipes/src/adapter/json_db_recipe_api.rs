//! ローカルの db.json（json-server と同じ形）を直接読み書きする RecipeApi 実装
//!
//! サーバーを立てずに CLI を使うため、またテストの実バックエンドとして使う。
//! ドキュメントの `recipes` 以外のキーは読み込んだまま書き戻す。

use crate::domain::{Recipe, RecipeDraft, RecipeId, RecipePatch, RecipeQuery};
use crate::ports::outbound::RecipeApi;
use common::error::Error;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

const COLLECTION: &str = "recipes";
/// ID は下位 16 bit（4 桁 16 進）
const ID_SPACE: u64 = 0xffff;

struct Document {
    /// `recipes` 以外のキー
    rest: Map<String, Value>,
    recipes: Vec<Recipe>,
}

pub struct JsonDbRecipeApi {
    path: Option<PathBuf>,
    doc: Mutex<Document>,
    seq: AtomicU64,
}

impl JsonDbRecipeApi {
    /// ファイルに書き戻さない（テスト用）
    pub fn in_memory(recipes: Vec<Recipe>) -> Self {
        Self {
            path: None,
            doc: Mutex::new(Document {
                rest: Map::new(),
                recipes,
            }),
            seq: AtomicU64::new(0),
        }
    }

    /// `path` が無ければ空のコレクションで始め、最初の変更時に作成する
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(text) => parse_document(&path, &text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Document {
                rest: Map::new(),
                recipes: Vec::new(),
            },
            Err(e) => return Err(Error::io_msg(format!("{}: {}", path.display(), e))),
        };
        Ok(Self {
            path: Some(path),
            doc: Mutex::new(doc),
            seq: AtomicU64::new(0),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn doc(&self) -> MutexGuard<'_, Document> {
        self.doc.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 変更後のコレクションを書き出してから確定する（書けなければ何も変えない）
    fn commit(&self, doc: &mut Document, recipes: Vec<Recipe>) -> Result<(), Error> {
        if let Some(path) = &self.path {
            let mut out = doc.rest.clone();
            out.insert(COLLECTION.to_string(), serde_json::to_value(&recipes)?);
            let text = serde_json::to_string_pretty(&Value::Object(out))?;
            write_replacing(path, &text)?;
        }
        doc.recipes = recipes;
        Ok(())
    }

    /// 4 桁 16 進の ID（ドキュメント内で一意）
    fn next_id(&self, taken: &[Recipe]) -> Result<RecipeId, Error> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64)
            .unwrap_or(0);
        let start = nanos ^ self.seq.fetch_add(1, Ordering::Relaxed).wrapping_mul(0x9E37);
        let taken: HashSet<&str> = taken.iter().map(|r| r.id.as_str()).collect();
        (0..=ID_SPACE)
            .map(|step| format!("{:04x}", start.wrapping_add(step) & ID_SPACE))
            .find(|id| !taken.contains(id.as_str()))
            .map(RecipeId::new)
            .ok_or_else(|| Error::system("id space exhausted"))
    }
}

fn parse_document(path: &Path, text: &str) -> Result<Document, Error> {
    let invalid = |detail: String| Error::json(format!("Invalid database {}: {}", path.display(), detail));
    if text.trim().is_empty() {
        return Ok(Document {
            rest: Map::new(),
            recipes: Vec::new(),
        });
    }
    let mut rest = match serde_json::from_str::<Value>(text).map_err(|e| invalid(e.to_string()))? {
        Value::Object(map) => map,
        _ => return Err(invalid("top level must be an object".to_string())),
    };
    let recipes = match rest.remove(COLLECTION) {
        Some(v) => serde_json::from_value(v).map_err(|e| invalid(e.to_string()))?,
        None => Vec::new(),
    };
    Ok(Document { rest, recipes })
}

fn write_replacing(path: &Path, text: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// json-server の `q` と同じく、文字列フィールドのどれかに大文字小文字を無視して含まれるか
fn matches_text(recipe: &Recipe, needle: &str) -> bool {
    fn walk(v: &Value, needle: &str) -> bool {
        match v {
            Value::String(s) => s.to_lowercase().contains(needle),
            Value::Array(items) => items.iter().any(|i| walk(i, needle)),
            Value::Object(map) => map.values().any(|i| walk(i, needle)),
            _ => false,
        }
    }
    serde_json::to_value(recipe)
        .map(|v| walk(&v, &needle.to_lowercase()))
        .unwrap_or(false)
}

fn not_found(id: &RecipeId) -> Error {
    Error::not_found(format!("Recipe '{}' not found", id))
}

impl RecipeApi for JsonDbRecipeApi {
    fn list(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, Error> {
        let doc = self.doc();
        let text = query.search_text();
        let favorite = query.favorite.as_param();
        Ok(doc
            .recipes
            .iter()
            .filter(|r| favorite.map_or(true, |f| r.is_favorite == f))
            .filter(|r| text.map_or(true, |t| matches_text(r, t)))
            .cloned()
            .collect())
    }

    fn get(&self, id: &RecipeId) -> Result<Recipe, Error> {
        self.doc()
            .recipes
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    fn create(&self, draft: &RecipeDraft) -> Result<Recipe, Error> {
        let mut doc = self.doc();
        let created = draft.clone().into_recipe(self.next_id(&doc.recipes)?);
        let mut recipes = doc.recipes.clone();
        recipes.push(created.clone());
        self.commit(&mut doc, recipes)?;
        Ok(created)
    }

    fn update(&self, id: &RecipeId, patch: &RecipePatch) -> Result<Recipe, Error> {
        let mut doc = self.doc();
        let mut recipes = doc.recipes.clone();
        let entry = recipes
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| not_found(id))?;
        patch.apply_to(entry);
        let updated = entry.clone();
        self.commit(&mut doc, recipes)?;
        Ok(updated)
    }

    fn delete(&self, id: &RecipeId) -> Result<Option<Recipe>, Error> {
        let mut doc = self.doc();
        let mut recipes = doc.recipes.clone();
        let pos = recipes
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| not_found(id))?;
        let removed = recipes.remove(pos);
        self.commit(&mut doc, recipes)?;
        Ok(Some(removed))
    }
}
