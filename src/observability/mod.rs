//! Structured logging setup.
//!
//! Library code only emits `tracing` spans and events. Hosts call
//! [`init_tracing`] once to route them to stderr or a rotating log file.
//!
//! Level resolution, highest priority first:
//! 1. `RUST_LOG`
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. `"info"`
//!
//! # Modules
//!
//! - [`init`]: subscriber installation
//! - [`file_writer`]: size-rotating log file

pub mod file_writer;
mod init;

pub use file_writer::RotatingLog;
pub use init::init_tracing;
