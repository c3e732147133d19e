//! Generic in-memory record store.
//!
//! [`MemoryStore`] is the single source of truth for one domain (todos,
//! calendar entries).  It holds records in insertion order behind a
//! [`tokio::sync::RwLock`], hands out snapshot copies on reads, and applies
//! every mutation under a single write guard so no two mutations interleave.
//!
//! Nothing is persisted: a store lives exactly as long as the handle that
//! owns it.  The composing application decides whether that is one store per
//! process or one per session.

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

// ── record contract ──────────────────────────────────────────────────

/// A record that can live in a [`MemoryStore`].
///
/// `Draft` carries the caller-supplied fields for a new record and `Patch`
/// the fields of an update.  Both constructors normalize and validate their
/// input; returning an error leaves the store untouched.
pub trait Record: Clone + Send + Sync + 'static {
    /// Fields supplied when creating a record.
    type Draft: Send;
    /// Fields supplied when updating a record.
    type Patch: Send;

    /// Entity name used in log lines and error messages.
    const ENTITY: &'static str;

    /// The record's immutable id.
    fn id(&self) -> &str;

    /// Build a new record from a draft and a freshly generated id.
    fn from_draft(id: String, draft: Self::Draft) -> StoreResult<Self>;

    /// Build the replacement for `self` with `patch` applied.
    ///
    /// The returned record must keep `self.id()`.
    fn patched(&self, patch: Self::Patch) -> StoreResult<Self>;
}

// ── store ────────────────────────────────────────────────────────────

/// An insertion-ordered, in-memory collection of records.
#[derive(Debug)]
pub struct MemoryStore<R> {
    records: RwLock<Vec<R>>,
}

impl<R: Record> MemoryStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with `records`.
    ///
    /// Fails if two of the seed records share an id.
    pub fn with_records(records: Vec<R>) -> StoreResult<Self> {
        for (i, record) in records.iter().enumerate() {
            if records[..i].iter().any(|r| r.id() == record.id()) {
                return Err(StoreError::DuplicateId {
                    entity: R::ENTITY,
                    id: record.id().to_owned(),
                });
            }
        }
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    /// Return a snapshot of all records in insertion order.
    pub async fn list(&self) -> Vec<R> {
        self.records.read().await.clone()
    }

    /// Return a copy of the record with the given id.
    pub async fn get(&self, id: &str) -> Option<R> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    /// Create a record from `draft` and append it.
    pub async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let id = Uuid::now_v7().to_string();
        let record = R::from_draft(id, draft)?;

        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::DuplicateId {
                entity: R::ENTITY,
                id: record.id().to_owned(),
            });
        }
        records.push(record.clone());

        debug!(entity = R::ENTITY, id = %record.id(), "record created");
        Ok(record)
    }

    /// Replace the record with the given id by one with `patch` applied.
    ///
    /// Returns `Ok(None)` when no record has that id.
    pub async fn update(&self, id: &str, patch: R::Patch) -> StoreResult<Option<R>> {
        self.update_with(id, move |current| current.patched(patch))
            .await
    }

    /// Atomically replace the record with the given id by `f(current)`.
    ///
    /// `f` runs under the write guard, so the read and the replacement are
    /// one critical section.  If `f` fails the stored record is unchanged.
    pub async fn update_with<F>(&self, id: &str, f: F) -> StoreResult<Option<R>>
    where
        F: FnOnce(&R) -> StoreResult<R> + Send,
    {
        let mut records = self.records.write().await;
        let Some(slot) = records.iter_mut().find(|r| r.id() == id) else {
            debug!(entity = R::ENTITY, id = %id, "update skipped, record not found");
            return Ok(None);
        };

        let replacement = f(&*slot)?;
        if replacement.id() != id {
            return Err(StoreError::InvalidArgument(format!(
                "{} update must preserve id `{id}`",
                R::ENTITY
            )));
        }
        *slot = replacement.clone();

        debug!(entity = R::ENTITY, id = %id, "record updated");
        Ok(Some(replacement))
    }

    /// Remove the record with the given id.
    ///
    /// Returns whether a record was removed.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        let removed = records.len() != before;

        debug!(entity = R::ENTITY, id = %id, removed, "record delete");
        Ok(removed)
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Drop every record.
    pub async fn clear(&self) {
        self.records.write().await.clear();
        debug!(entity = R::ENTITY, "store cleared");
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim `value` and reject it if nothing is left.
pub(crate) fn non_empty(field: &str, value: &str) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidArgument(format!(
            "`{field}` must not be empty"
        )));
    }
    Ok(trimmed.to_owned())
}

// ── tests ────────────────────────────────────────────────────────────
