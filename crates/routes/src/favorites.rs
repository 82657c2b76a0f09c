//! Favorite routes, reconciled against a remote store.
//!
//! A favorite is identified by its destination rounded to five decimals.
//! The store may hold duplicates (written by other clients or by older
//! versions); unsaving removes every record with the key, so a toggle always
//! ends in a clean state.

use async_trait::async_trait;
use chrono::Utc;
use clearway_core::{Error, Result};
use clearway_geo::{Coordinate, PositionKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Store key for a destination: `"lat,lng"` at five decimals, or `""` for an
/// invalid position. An empty key never matches a stored favorite.
pub fn build_key(lat: f64, lng: f64) -> String {
    PositionKey::favorite(&Coordinate::new(lat, lng))
        .map(PositionKey::into_string)
        .unwrap_or_default()
}

/// A saved route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRoute {
    /// Destination key, see [`build_key`]
    pub key: String,
    /// Start label
    pub from: String,
    /// Destination name
    pub to: String,
    /// Destination address
    pub to_address: String,
    /// Destination latitude
    pub to_lat: f64,
    /// Destination longitude
    pub to_lng: f64,
    /// Distance label at save time
    pub distance_label: String,
    /// Duration label at save time
    pub duration_label: String,
    /// Save time, epoch millis
    pub saved_at_ms: i64,
}

/// Caller-supplied part of a favorite; the reconciler fills in the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteDraft {
    /// Start label
    pub from: String,
    /// Destination name
    pub to: String,
    /// Destination address
    pub to_address: String,
    /// Distance label
    pub distance_label: String,
    /// Duration label
    pub duration_label: String,
}

/// A favorite with its store id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFavorite {
    /// Store-assigned id
    pub id: String,
    /// The record
    #[serde(flatten)]
    pub favorite: FavoriteRoute,
}

/// Outcome of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteState {
    /// A record now exists
    Favorited,
    /// No record exists any more
    Unfavorited,
}

/// CRUD access to one user's favorites.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Every record with `key`.
    async fn find_by_key(&self, key: &str) -> Result<Vec<StoredFavorite>>;

    /// Adds a record and returns its id.
    async fn insert(&self, favorite: FavoriteRoute) -> Result<String>;

    /// Removes a record. Removing a missing id is not an error.
    async fn delete_by_id(&self, id: &str) -> Result<()>;

    /// Every record, in no particular order.
    async fn list_all(&self) -> Result<Vec<StoredFavorite>>;
}

/// Process-local favorites store.
#[derive(Debug, Default)]
pub struct InMemoryFavoritesStore {
    records: Mutex<BTreeMap<String, FavoriteRoute>>,
    next_id: AtomicU64,
}

impl InMemoryFavoritesStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavoritesStore {
    async fn find_by_key(&self, key: &str) -> Result<Vec<StoredFavorite>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .iter()
            .filter(|(_, f)| !key.is_empty() && f.key == key)
            .map(|(id, f)| StoredFavorite {
                id: id.clone(),
                favorite: f.clone(),
            })
            .collect())
    }

    async fn insert(&self, favorite: FavoriteRoute) -> Result<String> {
        let id = format!("fav-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), favorite);
        Ok(id)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<StoredFavorite>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .iter()
            .map(|(id, f)| StoredFavorite {
                id: id.clone(),
                favorite: f.clone(),
            })
            .collect())
    }
}

type KeyLock = Arc<tokio::sync::Mutex<()>>;

/// Keeps favorite toggles consistent for one store.
///
/// Check-then-write sequences for the same key run one at a time through a
/// single reconciler. Other clients writing the same store are not
/// coordinated with.
pub struct FavoritesReconciler<S> {
    store: S,
    locks: Mutex<HashMap<String, KeyLock>>,
}

impl<S: FavoritesStore> FavoritesReconciler<S> {
    /// Reconciler over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// True if any record exists for `destination`. Invalid positions are
    /// never favorites.
    pub async fn is_favorite(&self, destination: Coordinate) -> Result<bool> {
        let key = build_key(destination.lat, destination.lng);
        if key.is_empty() {
            return Ok(false);
        }
        Ok(!self.store.find_by_key(&key).await?.is_empty())
    }

    /// Flips the favorite state of `destination`, stamping a new record with
    /// the current time.
    ///
    /// `build` runs only when a record is about to be inserted.
    pub async fn toggle<F>(&self, destination: Coordinate, build: F) -> Result<FavoriteState>
    where
        F: FnOnce() -> FavoriteDraft + Send,
    {
        self.toggle_at(destination, build, Utc::now().timestamp_millis())
            .await
    }

    /// [`FavoritesReconciler::toggle`] with an explicit save time.
    ///
    /// If records exist for the destination all of them are deleted,
    /// otherwise exactly one is inserted.
    pub async fn toggle_at<F>(
        &self,
        destination: Coordinate,
        build: F,
        now_ms: i64,
    ) -> Result<FavoriteState>
    where
        F: FnOnce() -> FavoriteDraft + Send,
    {
        let key = build_key(destination.lat, destination.lng);
        if key.is_empty() {
            return Err(Error::invalid_coordinate(destination.lat, destination.lng)
                .with_context("favorite destination"));
        }

        let lock = self.key_lock(&key);
        let outcome = {
            let _held = lock.lock().await;
            self.toggle_locked(&key, destination, build, now_ms).await
        };
        self.release_key_lock(&key, lock);
        outcome
    }

    async fn toggle_locked<F>(
        &self,
        key: &str,
        destination: Coordinate,
        build: F,
        now_ms: i64,
    ) -> Result<FavoriteState>
    where
        F: FnOnce() -> FavoriteDraft + Send,
    {
        let existing = self.store.find_by_key(key).await?;
        if !existing.is_empty() {
            for record in &existing {
                self.store.delete_by_id(&record.id).await?;
            }
            info!(key, removed = existing.len(), "Favorite removed");
            return Ok(FavoriteState::Unfavorited);
        }

        let draft = build();
        let favorite = FavoriteRoute {
            key: key.to_string(),
            from: draft.from,
            to: draft.to,
            to_address: draft.to_address,
            to_lat: destination.lat,
            to_lng: destination.lng,
            distance_label: draft.distance_label,
            duration_label: draft.duration_label,
            saved_at_ms: now_ms,
        };
        let id = self.store.insert(favorite).await?;
        info!(key, id = %id, "Favorite saved");
        Ok(FavoriteState::Favorited)
    }

    /// All favorites, most recently saved first.
    pub async fn list(&self) -> Result<Vec<StoredFavorite>> {
        let mut favorites = self.store.list_all().await?;
        favorites.sort_by(|a, b| b.favorite.saved_at_ms.cmp(&a.favorite.saved_at_ms));
        debug!(count = favorites.len(), "Listed favorites");
        Ok(favorites)
    }

    fn key_lock(&self, key: &str) -> KeyLock {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key.to_string()).or_default())
    }

    fn release_key_lock(&self, key: &str, lock: KeyLock) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Map entry plus ours: nobody else is waiting
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(key);
        }
    }
}
