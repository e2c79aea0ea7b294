use super::backend::{AreaHandle, StorageBackend};
use super::context::StoreContext;
use super::selector::SelectorState;
use super::BackendKind;
use crate::codec::{decode, encode, Encoding};
use crate::error::{RecipeError, Result};
use crate::model::{canonical_fields, Field, Recipe};
use crate::normalize::{normalize_rows, Normalizer};
use crate::query::{categories, RecipeQuery};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::{debug, info, warn};

/// Immutable view of the record set at one point in time.
pub type Snapshot = Arc<Vec<Recipe>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub backend: BackendKind,
    pub state: SelectorState,
    pub writable: bool,
    pub directory_grant_available: bool,
    pub location: Option<String>,
    pub records: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Records now in the store.
    pub imported: usize,
    /// Rows dropped for row-local defects.
    pub skipped: usize,
    /// Rows that repeated an earlier id and replaced it.
    pub duplicates: usize,
}

/// Backend facts that only change on open or grant, readable without the
/// context lock.
#[derive(Debug, Clone)]
struct BackendInfo {
    backend: BackendKind,
    state: SelectorState,
    writable: bool,
    directory_grant_available: bool,
    location: Option<String>,
}

impl BackendInfo {
    fn of(ctx: &StoreContext) -> Self {
        Self {
            backend: ctx.active_kind(),
            state: ctx.state(),
            writable: ctx.is_writable(),
            directory_grant_available: ctx.directory_grant_available(),
            location: ctx.active().map(|b| b.location()),
        }
    }
}

/// Records as read from a backend or the seed.
struct Loaded {
    records: Vec<Recipe>,
    /// At least one row had no id and got a synthesized one.
    synthesized: bool,
}

impl Loaded {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            synthesized: false,
        }
    }
}

/// The record set and its write-through to the active backend.
///
/// Mutations are serialized on the context lock. Each one builds the next set
/// off to the side, writes it, and only then swaps it in, so a failed write
/// leaves memory untouched. Readers clone the current `Arc` and never wait on
/// a write in progress.
pub struct RecipeStore {
    context: Mutex<StoreContext>,
    records: RwLock<Snapshot>,
    info: RwLock<BackendInfo>,
}

impl RecipeStore {
    /// Probe the context's backends, then load from the selected one.
    pub fn open(mut context: StoreContext) -> Result<Self> {
        context.probe()?;
        let info = BackendInfo::of(&context);
        let store = Self {
            context: Mutex::new(context),
            records: RwLock::new(Arc::new(Vec::new())),
            info: RwLock::new(info),
        };
        store.load()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreContext>> {
        self.context
            .lock()
            .map_err(|_| RecipeError::Store("Store context lock poisoned".to_string()))
    }

    pub fn snapshot(&self) -> Snapshot {
        let guard = self.records.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    fn swap(&self, records: Vec<Recipe>) -> Snapshot {
        let next = Arc::new(records);
        let mut guard = self.records.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&next);
        next
    }

    /// Re-read the active backend and replace the in-memory set.
    ///
    /// When the backend holds no records, the network seed (if configured)
    /// fills the set. Seeded records that already carry ids are not written
    /// back until the first mutation.
    pub fn load(&self) -> Result<Snapshot> {
        let ctx = self.lock()?;
        let loaded = read_records(&ctx, true)?;
        info!(count = loaded.records.len(), backend = %ctx.active_kind(), "Loaded recipes");
        Ok(self.settle(&ctx, loaded))
    }

    /// Swap in freshly read records. Ids synthesized during the read are
    /// written through once so the next open sees the same ids; if that write
    /// fails the records are still used.
    fn settle(&self, ctx: &StoreContext, loaded: Loaded) -> Snapshot {
        if loaded.synthesized && ctx.is_writable() {
            match self.write_through(ctx, loaded.records.clone()) {
                Ok(snapshot) => {
                    info!(count = snapshot.len(), "Persisted synthesized ids");
                    return snapshot;
                }
                Err(e) => warn!(error = %e, "Could not persist synthesized ids"),
            }
        }
        self.swap(loaded.records)
    }

    pub fn get(&self, id: &str) -> Option<Recipe> {
        self.snapshot().iter().find(|r| r.id == id).cloned()
    }

    pub fn query(&self, query: &RecipeQuery) -> Vec<Recipe> {
        query.apply(&self.snapshot())
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.snapshot())
    }

    /// Insert or replace by id. An empty id gets a fresh one that does not
    /// collide with any record in the store.
    pub fn put(&self, recipe: Recipe) -> Result<Recipe> {
        let ctx = self.lock()?;
        self.upsert(&ctx, recipe)
    }

    /// Replace a record that must already exist. The existence check and the
    /// write happen under the same lock, so a concurrent delete is not undone.
    pub fn replace_existing(&self, recipe: Recipe) -> Result<Recipe> {
        let ctx = self.lock()?;
        let id = recipe.id.trim();
        if id.is_empty() || !self.snapshot().iter().any(|r| r.id == id) {
            return Err(RecipeError::RecordNotFound(recipe.id.clone()));
        }
        self.upsert(&ctx, recipe)
    }

    fn upsert(&self, ctx: &StoreContext, recipe: Recipe) -> Result<Recipe> {
        ensure_writable(ctx)?;

        let current = self.snapshot();
        let mut normalizer = Normalizer::with_reserved(current.iter().map(|r| r.id.clone()));
        let normalized = normalizer.normalize(&recipe.to_row());

        let mut next = current.as_ref().clone();
        match next.iter_mut().find(|r| r.id == normalized.id) {
            Some(slot) => *slot = normalized.clone(),
            None => next.push(normalized.clone()),
        }

        self.write_through(ctx, next)?;
        info!(id = %normalized.id, "Saved recipe");
        Ok(normalized)
    }

    /// Remove by id. Returns false, without writing, when the id is absent.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let ctx = self.lock()?;
        ensure_writable(&ctx)?;

        let current = self.snapshot();
        if !current.iter().any(|r| r.id == id) {
            debug!(id, "Delete of unknown recipe ignored");
            return Ok(false);
        }
        let next: Vec<Recipe> = current.iter().filter(|r| r.id != id).cloned().collect();
        self.write_through(&ctx, next)?;
        info!(id, "Deleted recipe");
        Ok(true)
    }

    /// Replace the whole set in one write. Ids repeated in `recipes` keep the
    /// last occurrence. An empty `recipes` clears the store.
    pub fn bulk_replace(&self, recipes: Vec<Recipe>) -> Result<Snapshot> {
        let ctx = self.lock()?;
        ensure_writable(&ctx)?;

        let mut normalizer = Normalizer::new();
        let normalized = recipes
            .iter()
            .map(|r| normalizer.normalize(&r.to_row()))
            .collect();
        let (records, duplicates) = dedupe(normalized);
        if duplicates > 0 {
            debug!(duplicates, "Duplicate ids collapsed");
        }
        self.write_through(&ctx, records)
    }

    /// Decode interchange text and bulk-replace the set with it. A text that
    /// fails to decode leaves both memory and the backend untouched.
    pub fn import_text(&self, text: &str) -> Result<ImportReport> {
        let ctx = self.lock()?;
        ensure_writable(&ctx)?;

        let decoded = decode(text)?;
        let (records, duplicates) = dedupe(normalize_rows(&decoded.rows));
        let stored = self.write_through(&ctx, records)?;
        let report = ImportReport {
            imported: stored.len(),
            skipped: decoded.skipped,
            duplicates,
        };
        info!(?report, "Imported recipes");
        Ok(report)
    }

    pub fn export_text(&self, encoding: Encoding) -> String {
        encode(&self.snapshot(), &canonical_fields(), encoding)
    }

    /// Write the current set to the active backend again.
    pub fn write_now(&self) -> Result<usize> {
        let ctx = self.lock()?;
        ensure_writable(&ctx)?;
        let records = self.snapshot().as_ref().clone();
        let stored = self.write_through(&ctx, records)?;
        Ok(stored.len())
    }

    /// Make a user-granted directory the active backend and replace the
    /// in-memory set with whatever the directory holds.
    pub fn grant_directory(&self, backend: Box<dyn StorageBackend>) -> Result<Snapshot> {
        let mut ctx = self.lock()?;
        ctx.grant_directory(backend)?;
        *self.info.write().unwrap_or_else(|e| e.into_inner()) = BackendInfo::of(&ctx);
        let loaded = read_records(&ctx, false)?;
        info!(count = loaded.records.len(), "Loaded recipes from granted directory");
        Ok(self.settle(&ctx, loaded))
    }

    /// A named sub-area of the active backend, created if needed.
    pub fn asset_area(&self, name: &str) -> Result<AreaHandle> {
        let ctx = self.lock()?;
        match ctx.active() {
            Some(backend) => backend.ensure_sub_area(name),
            None => Err(RecipeError::AssetAreaUnavailable(BackendKind::None)),
        }
    }

    /// Never waits on a write in progress.
    pub fn status(&self) -> Result<StoreStatus> {
        let info = self.info.read().unwrap_or_else(|e| e.into_inner()).clone();
        Ok(StoreStatus {
            backend: info.backend,
            state: info.state,
            writable: info.writable,
            directory_grant_available: info.directory_grant_available,
            location: info.location,
            records: self.snapshot().len(),
        })
    }

    /// Encode, hand to the backend, then swap in the decoded result of what
    /// was written. Memory changes only after the backend confirms.
    fn write_through(&self, ctx: &StoreContext, records: Vec<Recipe>) -> Result<Snapshot> {
        let backend = match ctx.active() {
            Some(backend) if backend.is_writable() => backend,
            _ => return Err(RecipeError::NoWritableBackend),
        };

        let text = encode(&records, &canonical_fields(), Encoding::Native);
        backend.write_all(&text).map_err(|e| match e {
            RecipeError::NoWritableBackend => e,
            other => RecipeError::write_failed(backend.kind(), other),
        })?;
        debug!(backend = %backend.kind(), count = records.len(), "Wrote records");

        let persisted = normalize_rows(&decode(&text)?.rows);
        Ok(self.swap(persisted))
    }
}

fn ensure_writable(ctx: &StoreContext) -> Result<()> {
    if ctx.is_writable() {
        Ok(())
    } else {
        Err(RecipeError::NoWritableBackend)
    }
}

fn read_records(ctx: &StoreContext, allow_seed: bool) -> Result<Loaded> {
    if ctx.active_kind() == BackendKind::NetworkSeedOnly {
        return Ok(ctx.active().map(read_seed).unwrap_or_else(Loaded::empty));
    }

    let stored = match ctx.active() {
        Some(backend) => backend.read_all()?,
        None => None,
    };
    let loaded = match stored {
        Some(text) => decode_records(&text)?,
        None => Loaded::empty(),
    };
    if loaded.records.is_empty() && allow_seed {
        return Ok(ctx.seed().map(read_seed).unwrap_or_else(Loaded::empty));
    }
    Ok(loaded)
}

/// The seed never fails the caller; anything wrong with it means "no seed".
fn read_seed(seed: &dyn StorageBackend) -> Loaded {
    let text = match seed.read_all() {
        Ok(Some(text)) => text,
        Ok(None) => return Loaded::empty(),
        Err(e) => {
            warn!(error = %e, "Seed unavailable");
            return Loaded::empty();
        }
    };
    match decode_records(&text) {
        Ok(loaded) => {
            info!(count = loaded.records.len(), "Using seed collection");
            loaded
        }
        Err(e) => {
            warn!(error = %e, "Seed collection is malformed");
            Loaded::empty()
        }
    }
}

fn decode_records(text: &str) -> Result<Loaded> {
    let decoded = decode(text)?;
    if decoded.skipped > 0 {
        warn!(skipped = decoded.skipped, "Some stored rows were unreadable");
    }
    let synthesized = decoded
        .rows
        .iter()
        .any(|row| row.field(Field::Id).map_or(true, |id| id.trim().is_empty()));
    let (records, _) = dedupe(normalize_rows(&decoded.rows));
    Ok(Loaded {
        records,
        synthesized,
    })
}

/// Collapse repeated ids. The last occurrence wins but keeps the position of
/// the first. Returns the number of collapsed rows.
fn dedupe(recipes: Vec<Recipe>) -> (Vec<Recipe>, usize) {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Recipe> = Vec::with_capacity(recipes.len());
    let mut duplicates = 0;
    for recipe in recipes {
        match positions.get(&recipe.id) {
            Some(&index) => {
                out[index] = recipe;
                duplicates += 1;
            }
            None => {
                positions.insert(recipe.id.clone(), out.len());
                out.push(recipe);
            }
        }
    }
    (out, duplicates)
}
