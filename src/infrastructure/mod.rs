//! Environment and filesystem helpers.

pub mod paths;

pub use paths::{default_data_dir, expand_tilde, resolve_data_path};
