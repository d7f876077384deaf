//! Storage layer for listings and feedback.
//!
//! This module provides the store abstraction the engine talks to, plus two
//! bundled backends.
//!
//! # Modules
//!
//! - `backend`: async [`ListingStore`] trait
//! - `models`: shared in-memory dataset and on-disk format
//! - `memory`: process-local backend
//! - `json`: JSON file backend with atomic writes

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::ListingStore;
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use models::StoreData;
