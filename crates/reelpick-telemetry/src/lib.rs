#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Telemetry primitives shared across the Reelpick workspace.
//!
//! This crate centralises logging setup and per-invocation trace context so
//! the library crates and the CLI emit consistently shaped events.
//! Layout: init.rs (subscriber installation), context.rs (trace ids and spans),
//! error.rs (telemetry errors).

pub mod context;
pub mod error;
pub mod init;

pub use context::{
    current_command, current_trace_id, invocation_span, new_trace_id, with_invocation_context,
};
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
