#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc,      // Errors are the DeliveryError variants throughout
    clippy::module_name_repetitions, // e.g. ConfigError in config module
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

//! Logbeat forwards error-level log events to Opbeat's error intake API.
//!
//! The pipeline is `LogEvent` → [`payload::build_payload`] →
//! [`sender::build_request`] → [`sender::ErrorClient::notify`]. Logging
//! frameworks plug in through the [`hook::Hook`] trait; `tracing` users can
//! install [`hook::HookLayer`] directly.

pub mod app;
pub mod config;
pub mod domain;
pub mod hook;
pub mod payload;
pub mod sender;

pub use config::{Config, ConfigError};
pub use domain::{DeliveryError, FieldValue, Fields, LogEvent, Severity};
pub use hook::{Hook, HookLayer, LogbeatHook};
pub use payload::{ErrorPayload, Machine};
pub use sender::ErrorClient;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version embedded in the `logger` field and the User-Agent header.
pub const LOGBEAT_VERSION: &str = VERSION;
