//! Interaction layer: state, events, actions, and the session runtime.
//!
//! The layer follows a unidirectional data flow:
//!
//! ```text
//! User / map input → Event → handle_event → AppState mutation → Actions
//!                      ↑                                           ↓
//!                      └────────── Session executes, responds ─────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effects emitted by the handler
//! - [`handler`]: event processing and state transitions
//! - [`modes`]: the coordinate-source state machine and tabs
//! - [`state`]: session state and view model computation
//! - [`runtime`]: executes actions against the coordinator and location service

pub mod actions;
pub mod handler;
pub mod modes;
pub mod runtime;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{LocationPurpose, LocationSelection, Tab};
pub use runtime::Session;
pub use state::{AppState, Notice, NoticeLevel};
