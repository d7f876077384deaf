//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable store using JSON serialization.
//! It uses atomic file writes (write-to-temp + rename) to prevent corruption on
//! crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: served from memory; the file is loaded once on open
//! - **Write**: O(n), serializes and rewrites the entire dataset
//! - **Best for**: a single metro area's worth of listings and feedback

use crate::clock::{Clock, SystemClock};
use crate::domain::error::{FinderError, Result};
use crate::domain::{Feedback, Listing, ListingId, NewFeedback, NewListing};
use crate::storage::backend::ListingStore;
use crate::storage::models::{StoreData, STORE_FORMAT_VERSION};
use crate::trust::Counter;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// JSON file store.
///
/// The dataset is kept in memory and rewritten to disk after every mutation,
/// so a successful write call means the change is durable.
///
/// See [`StoreData`] for the file format.
#[derive(Debug)]
pub struct JsonStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy, loaded on open.
    data: Mutex<StoreData>,

    clock: Arc<dyn Clock>,
}

impl JsonStore {
    /// Creates or opens a JSON store.
    ///
    /// If the file exists, loads existing data. Otherwise starts empty; the
    /// file is created on the first write. Parent directories are created
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File was written by a newer format version
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use iftaar_finder::storage::JsonStore;
    ///
    /// let store = JsonStore::open("/tmp/iftaar/listings.json")?;
    /// # Ok::<(), iftaar_finder::FinderError>(())
    /// ```
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_clock(file_path, Arc::new(SystemClock))
    }

    /// Like [`JsonStore::open`], stamping records with `clock`.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::open`].
    pub fn open_with_clock(file_path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(
            listings = data.listings.len(),
            feedback = data.feedback.len(),
            "JSON store ready"
        );

        Ok(Self {
            file_path,
            data: Mutex::new(data),
            clock,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreData = serde_json::from_str(&contents)?;

        if data.version > STORE_FORMAT_VERSION {
            return Err(FinderError::Storage(format!(
                "store file version {} is newer than supported version {STORE_FORMAT_VERSION}",
                data.version
            )));
        }

        Ok(data)
    }

    /// Writes to a temporary file first, then renames it over the target.
    fn save_to_file(&self, data: &StoreData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "store saved");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreData>> {
        self.data
            .lock()
            .map_err(|e| FinderError::Storage(format!("JSON store lock poisoned: {e}")))
    }

    /// Applies `change` to a copy of the data and commits it only if the file
    /// write succeeds, so memory never runs ahead of disk.
    fn mutate<T>(&self, change: impl FnOnce(&mut StoreData) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let value = change(&mut next)?;
        self.save_to_file(&next)?;
        *guard = next;
        Ok(value)
    }
}

#[async_trait]
impl ListingStore for JsonStore {
    async fn list_listings(&self) -> Result<Vec<Listing>> {
        let _span = tracing::debug_span!("json_list_listings").entered();
        Ok(self.lock()?.listings_newest_first())
    }

    async fn list_feedback(&self, listing_id: &ListingId) -> Result<Vec<Feedback>> {
        let _span = tracing::debug_span!("json_list_feedback", listing_id = %listing_id).entered();
        Ok(self.lock()?.feedback_newest_first(listing_id))
    }

    async fn create_listing(&self, fields: &NewListing) -> Result<Listing> {
        let _span = tracing::debug_span!("json_create_listing", name = %fields.name).entered();
        let now = self.clock.now_millis();
        self.mutate(|data| Ok(data.insert_listing(fields, now)))
    }

    async fn create_feedback(&self, fields: &NewFeedback) -> Result<()> {
        let _span = tracing::debug_span!("json_create_feedback", listing_id = %fields.listing_id).entered();
        let now = self.clock.now_millis();
        self.mutate(|data| {
            data.insert_feedback(fields, now);
            Ok(())
        })
    }

    async fn read_counter(&self, listing_id: &ListingId, counter: Counter) -> Result<u32> {
        self.lock()?.read_counter(listing_id, counter)
    }

    async fn write_counter(&self, listing_id: &ListingId, counter: Counter, value: u32) -> Result<()> {
        let _span = tracing::debug_span!("json_write_counter", listing_id = %listing_id, ?counter, value).entered();
        self.mutate(|data| data.write_counter(listing_id, counter, value))
    }

    async fn increment_counter(&self, listing_id: &ListingId, counter: Counter) -> Result<u32> {
        let _span = tracing::debug_span!("json_increment_counter", listing_id = %listing_id, ?counter).entered();
        self.mutate(|data| data.increment_counter(listing_id, counter))
    }
}
