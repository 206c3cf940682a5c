//! # Portly Common
//!
//! Domain types shared by the scanning engine and its front-ends.
//!
//! * **[`network`]**: targets, port ranges, scan requests, per-port results and persisted records.
//! * **[`services`]**: the static port to service-name table.
//! * **[`config`]**: explicit run configuration (timeouts, output path, verbosity).
//! * **[`error`]**: the error taxonomy surfaced to callers.

pub mod config;
pub mod error;
pub mod network;
pub mod services;

pub use error::ScanError;
