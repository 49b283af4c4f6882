//! Structured logging to stderr, with optional OTLP span export.
//!
//! # Telemetry invariants
//!
//! - **No secret or plaintext bytes** appear in any span attribute or log
//!   field; only resource names, lengths, and checksums do.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::{init_telemetry, TelemetryGuard};
