//! Domain layer for logbeat.
//!
//! Contains the canonical types shared across all modules:
//! - `LogEvent`: One log call, as handed over by the logging framework
//! - `FieldValue`: Typed value of a structured field
//! - `Severity`: Log severity (Panic/Fatal/Error/Warn/Info/Debug/Trace)
//! - `DeliveryError`: Everything that can go wrong delivering a report

pub mod error;
pub mod event;
pub mod field;
pub mod severity;

pub use error::DeliveryError;
pub use event::LogEvent;
pub use field::{FieldValue, Fields};
pub use severity::{ParseSeverityError, Severity};
