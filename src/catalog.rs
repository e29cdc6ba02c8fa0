//! The collection store: the authoritative in-memory registry of catalog
//! records, with snapshot persistence on every mutation.
//!
//! Every public operation takes the state lock once and runs to completion
//! inside it, so no caller can observe a partially applied mutation. The
//! snapshot write happens after the in-memory commit; its failure is logged
//! and never reaches the caller.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::form::{FormValue, RawInput};
use crate::normalize;
use crate::product::Product;
use crate::query::{self, GameFilter, PageRequest, PageResult};
use crate::snapshot;

/// Id lookup policy: stored and requested ids are compared by their string
/// representation, so `"7"` and `7` address the same record.
fn ids_equal(stored: i64, requested: &str) -> bool {
    stored.to_string() == requested
}

struct CatalogState {
    games: Vec<Product>,
    next_id: i64,
}

/// In-memory catalog with best-effort snapshot persistence.
pub struct Catalog {
    state: Mutex<CatalogState>,
    config: Config,
}

impl Catalog {
    /// Restore the collection from the configured snapshot, falling back to
    /// the bundled seed dataset when the snapshot is missing or unusable.
    /// Every loaded record is re-normalized (a no-op for canonical records)
    /// and duplicate or id-less records are dropped.
    pub fn init(config: Config) -> Self {
        let records = snapshot::load(&config.snapshot_path).unwrap_or_else(snapshot::seed);
        let catalog = Self::seeded(config, records);
        {
            let state = catalog.lock();
            info!(
                target: "catalog",
                records = state.games.len(),
                next_id = state.next_id,
                "catalog initialized"
            );
        }
        catalog
    }

    /// Build a store from explicit raw records instead of the snapshot.
    /// The records go through the same normalization and dedup as a load.
    pub fn seeded(config: Config, records: Vec<Value>) -> Self {
        let games = adopt(records);
        let next_id = games.iter().map(|g| g.id).max().map_or(1, |max| max + 1);
        Self {
            state: Mutex::new(CatalogState { games, next_id }),
            config,
        }
    }

    /// Flush a final snapshot and consume the store.
    pub fn teardown(self) {
        let state = self.lock();
        self.persist(&state);
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        // A panicking writer leaves the last committed state behind; keep
        // serving it instead of poisoning every later caller.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Independent copy of every record.
    pub fn list(&self) -> Vec<Product> {
        self.lock().games.clone()
    }

    /// Exact-match lookup under the string-equality id policy.
    pub fn get_by_id(&self, id: &str) -> Option<Product> {
        self.lock().games.iter().find(|g| ids_equal(g.id, id)).cloned()
    }

    /// Filtered, paginated view of the collection.
    pub fn query(&self, filter: &GameFilter, page: PageRequest) -> PageResult<Product> {
        query::run(&self.lock().games, filter, page)
    }

    /// Normalize the input, assign the next id, append, persist.
    pub fn create(&self, input: RawInput) -> Product {
        let patch = normalize::normalize(&input.into_record());
        let mut state = self.lock();
        let mut game = Product::from_patch(&patch);
        game.id = state.next_id;
        state.next_id += 1;
        state.games.push(game.clone());
        self.persist(&state);
        game
    }

    /// Shallow-merge the normalized input over an existing record.
    /// Fields absent from the input are retained; `None` when the id does
    /// not resolve.
    pub fn update(&self, id: &str, input: RawInput) -> Option<Product> {
        let patch = normalize::normalize(&input.into_record());
        let mut state = self.lock();
        let game = state.games.iter_mut().find(|g| ids_equal(g.id, id))?;
        game.apply_patch(&patch);
        let updated = game.clone();
        self.persist(&state);
        Some(updated)
    }

    /// Delete a record; `false` when the id does not resolve.
    pub fn remove(&self, id: &str) -> bool {
        let mut state = self.lock();
        let Some(index) = state.games.iter().position(|g| ids_equal(g.id, id)) else {
            return false;
        };
        state.games.remove(index);
        self.persist(&state);
        true
    }

    /// Credit available keys from a key-batch payload.
    ///
    /// A form submission whose `Keys` field is a file attachment is worth
    /// one fixed batch (the attachment's content is not parsed); an explicit
    /// JSON array is worth its length; any other shape adds nothing.
    pub fn add_keys(&self, id: &str, payload: RawInput) -> Option<Product> {
        let added = self.key_batch(&payload);
        let mut state = self.lock();
        let game = state.games.iter_mut().find(|g| ids_equal(g.id, id))?;
        game.count += added;
        let updated = game.clone();
        self.persist(&state);
        Some(updated)
    }

    fn key_batch(&self, payload: &RawInput) -> u64 {
        match payload {
            RawInput::Form(form) => match form.get("Keys") {
                Some(FormValue::File { .. }) => self.config.keys_per_batch,
                _ => 0,
            },
            RawInput::Json(Value::Array(keys)) => keys.len() as u64,
            RawInput::Json(_) => 0,
        }
    }

    fn persist(&self, state: &CatalogState) {
        if let Err(err) = snapshot::save(&self.config.snapshot_path, &state.games) {
            warn!(
                target: "catalog",
                error = %err,
                path = %self.config.snapshot_path.display(),
                "snapshot write failed; in-memory state remains authoritative"
            );
        }
    }
}

/// Turn raw records into canonical ones: normalize each, drop records with
/// no usable id, and keep only the first occurrence of each id.
fn adopt(records: Vec<Value>) -> Vec<Product> {
    let mut games: Vec<Product> = Vec::new();
    for record in records {
        let patch = normalize::normalize(&record);
        let Some(id) = patch.get("id").and_then(record_id) else {
            warn!(target: "catalog", "dropping record without a usable id");
            continue;
        };
        if games.iter().any(|g| g.id == id) {
            warn!(target: "catalog", id, "dropping record with duplicate id");
            continue;
        }
        let mut game = Product::from_patch(&patch);
        game.id = id;
        games.push(game);
    }
    games
}

/// Record ids load liberally: an integer, or a string holding one.
fn record_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
