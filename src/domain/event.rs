use super::field::{FieldValue, Fields};
use super::severity::Severity;
use chrono::{DateTime, TimeZone, Utc};

/// A single log call handed over by the logging framework.
///
/// Field values keep their JSON type (strings, numbers, booleans, ...) all
/// the way to the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub level: Severity,
    pub message: String,
    pub fields: Fields,
    pub time: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: Fields::new(),
            time: Utc::now(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Sets the event time; any time zone is converted to UTC.
    pub fn at<Tz: TimeZone>(mut self, time: DateTime<Tz>) -> Self {
        self.time = time.with_timezone(&Utc);
        self
    }
}
