//! Iftaar Finder: discovery and community trust engine for free iftaar listings.
//!
//! The crate turns a collection of community-submitted meal listings plus the
//! user's live position into a ranked, filtered view, and turns community
//! confirmations and disputes into a per-listing trust signal.
//!
//! - Haversine distance ranking with text and category filters
//! - Crowd verification: three confirmations make a listing verified
//! - Pin-drop or device-location placement for new listings
//! - Pluggable async store with in-memory and JSON-file backends
//! - Session-scoped read-through cache invalidated on every write

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host UI / map surface                              │  ← renders view models
//! └─────────────────────────────────────────────────────┘
//!                        │ Events
//! ┌─────────────────────────────────────────────────────┐
//! │  Interaction layer (app/)                           │
//! │  - Event handling, selection state machine          │
//! │  - Session runtime executing actions                │
//! │  - View model computation (ui/)                     │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Discovery     │   │ Lifecycle     │   │ Location      │
//! │ (discovery/)  │   │ (lifecycle)   │   │ (location)    │
//! │ - Filters     │   │ - Validation  │   │ - Provider    │
//! │ - Ranking     │   │ - Query cache │   │ - Timeout     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────┐
//! │  Trust model (trust) and store trait (storage/)     │
//! │  - Memory and JSON backends                         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/), clock, infrastructure paths,     │
//! │  observability                                      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! store_path = "~/.local/share/iftaar-finder/listings.json"
//! location_timeout_secs = 10
//! high_accuracy = true
//! default_category = "nearby"
//! counter_update = "read-modify-write"
//! trace_level = "debug"
//! log_file = "finder.log"
//! ```
//!
//! Relative paths are placed under the per-user data directory. Without a
//! `store_path` the session runs on an in-memory store.
//!
//! # Example
//!
//! ```
//! use iftaar_finder::app::Event;
//! use iftaar_finder::domain::Coordinate;
//! use iftaar_finder::location::StaticLocation;
//! use iftaar_finder::{open_session, Config};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> iftaar_finder::Result<()> {
//! let provider = Arc::new(StaticLocation::at(Coordinate::new(22.36, 91.78)));
//! let mut session = open_session(&Config::default(), provider)?;
//!
//! session.dispatch(Event::Start).await?;
//! assert_eq!(session.state().user_position, Some(Coordinate::new(22.36, 91.78)));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cache;
pub mod clock;
pub mod discovery;
pub mod domain;
pub mod infrastructure;
pub mod lifecycle;
pub mod location;
pub mod observability;
pub mod storage;
pub mod trust;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event, Session};
pub use discovery::Category;
pub use domain::{FinderError, Result};
pub use lifecycle::ListingCoordinator;
pub use trust::CounterUpdate;

use location::{LocationOptions, LocationProvider, LocationService};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use storage::{JsonStore, ListingStore, MemoryStore};

/// Engine configuration.
///
/// Built from TOML ([`Config::from_toml_str`], [`Config::from_file`]) or from
/// the flat string map host runtimes pass to plugins ([`Config::from_map`]).
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON store file. `~` is expanded; relative paths go under the data
    /// directory. `None` selects the in-memory store.
    pub store_path: Option<String>,

    /// Upper bound on one location request. Default: 10
    pub location_timeout_secs: u64,

    /// Ask the provider for a precise fix. Default: `true`
    pub high_accuracy: bool,

    /// Category selected when a session starts. Default: `all`
    pub default_category: Category,

    /// How feedback bumps listing counters. Default: `read-modify-write`
    pub counter_update: CounterUpdate,

    /// `EnvFilter` directive used when `RUST_LOG` is unset. Default: `"info"`
    pub trace_level: Option<String>,

    /// Log to this rotating file instead of stderr.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            location_timeout_secs: location::DEFAULT_LOCATION_TIMEOUT.as_secs(),
            high_accuracy: true,
            default_category: Category::All,
            counter_update: CounterUpdate::ReadModifyWrite,
            trace_level: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Parses a flat string map.
    ///
    /// Unparseable values fall back to their defaults and are logged; unknown
    /// keys are ignored. Blank strings count as absent.
    ///
    /// ```
    /// use iftaar_finder::{Category, Config, CounterUpdate};
    /// use std::collections::BTreeMap;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("default_category".to_string(), "nearby".to_string());
    /// map.insert("counter_update".to_string(), "atomic".to_string());
    /// map.insert("location_timeout_secs".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.default_category, Category::Nearby);
    /// assert_eq!(config.counter_update, CounterUpdate::Atomic);
    /// assert_eq!(config.location_timeout_secs, 10);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        Self {
            store_path: get("store_path").map(String::from),
            location_timeout_secs: parse_or(
                get("location_timeout_secs"),
                "location_timeout_secs",
                defaults.location_timeout_secs,
            ),
            high_accuracy: parse_or(get("high_accuracy"), "high_accuracy", defaults.high_accuracy),
            default_category: parse_or(
                get("default_category"),
                "default_category",
                defaults.default_category,
            ),
            counter_update: parse_or(get("counter_update"), "counter_update", defaults.counter_update),
            trace_level: get("trace_level").map(String::from),
            log_file: get("log_file").map(String::from),
        }
    }

    /// Parses TOML.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] for malformed TOML, unknown keys, or
    /// values of the wrong type.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| FinderError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise see
    /// [`Config::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            FinderError::Config(message) => FinderError::Config(format!("{}: {message}", path.display())),
            other => other,
        })
    }

    /// Resolved JSON store location, `None` for the in-memory store.
    #[must_use]
    pub fn resolved_store_path(&self) -> Option<PathBuf> {
        self.store_path.as_deref().map(infrastructure::resolve_data_path)
    }

    #[must_use]
    pub const fn location_options(&self) -> LocationOptions {
        LocationOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_secs(self.location_timeout_secs),
        }
    }
}

fn parse_or<T>(raw: Option<&str>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::parse::<T>) {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            tracing::warn!(key, error = %e, "invalid config value, using default");
            default
        }
        None => default,
    }
}

/// Builds the store selected by `config`.
///
/// # Errors
///
/// Returns an error if the JSON store file cannot be opened or parsed.
pub fn open_store(config: &Config) -> Result<Arc<dyn ListingStore>> {
    match config.resolved_store_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "using JSON store");
            Ok(Arc::new(JsonStore::open(path)?))
        }
        None => {
            tracing::info!("using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Opens the configured store and wires a [`Session`] around it.
///
/// # Errors
///
/// See [`open_store`].
pub fn open_session(config: &Config, provider: Arc<dyn LocationProvider>) -> Result<Session> {
    let store = open_store(config)?;
    let coordinator = ListingCoordinator::new(store, config.counter_update);
    let location = LocationService::new(provider, config.location_options());

    tracing::debug!(
        category = %config.default_category,
        counter_update = %config.counter_update,
        "session opened"
    );
    Ok(Session::new(AppState::new(config.default_category), coordinator, location))
}
