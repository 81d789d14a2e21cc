//! Payload builder: maps a [`LogEvent`] onto Opbeat's error schema.

mod machine;

pub use machine::Machine;

use crate::LOGBEAT_VERSION;
use crate::domain::{DeliveryError, Fields, LogEvent, Severity};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// Structured fields of the event, forwarded verbatim.
pub type Extra = Fields;

/// One error report as accepted by the intake API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub extra: Extra,
    pub level: String,
    pub logger: String,
    #[serde(default, skip_serializing_if = "Machine::is_empty")]
    pub machine: Machine,
    pub message: String,
    pub timestamp: String,
}

impl ErrorPayload {
    pub fn to_json(&self) -> Result<Vec<u8>, DeliveryError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Builds the report for `event`. Never fails; an unresolved host simply
/// leaves `machine` empty.
pub fn build_payload(event: &LogEvent, machine: &Machine) -> ErrorPayload {
    ErrorPayload {
        extra: event.fields.clone(),
        level: normalize_level(event.level).to_string(),
        logger: logger_name(),
        machine: machine.clone(),
        message: event.message.clone(),
        timestamp: event.time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    }
}

/// Maps a severity onto the intake's level vocabulary.
pub fn normalize_level(level: Severity) -> &'static str {
    match level {
        Severity::Panic => "critical",
        other => other.as_str(),
    }
}

pub fn logger_name() -> String {
    format!("logbeat-{LOGBEAT_VERSION}")
}
