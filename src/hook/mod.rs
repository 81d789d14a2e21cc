//! Integration surface for logging frameworks.

mod layer;

pub use layer::{ErrorSink, HookLayer};

use crate::domain::{DeliveryError, LogEvent, Severity};
use crate::sender::ErrorClient;

#[cfg(test)]
use mockall::automock;

/// What a logging framework needs from a delivery hook.
#[cfg_attr(test, automock)]
pub trait Hook: Send + Sync {
    /// Severities the hook wants to receive. Fixed for the hook's lifetime.
    fn interested_levels(&self) -> &'static [Severity];

    /// Delivers one event. The caller decides what to do with an error.
    fn handle(&self, event: &LogEvent) -> Result<(), DeliveryError>;
}

/// Reports panics, fatal errors and errors to Opbeat.
#[derive(Debug, Clone)]
pub struct LogbeatHook {
    pub org_id: String,
    pub app_id: String,
    client: ErrorClient,
}

impl LogbeatHook {
    pub const LEVELS: &'static [Severity] = &[Severity::Panic, Severity::Fatal, Severity::Error];

    pub fn new(org: &str, app: &str, token: &str) -> Result<Self, DeliveryError> {
        Ok(Self {
            org_id: org.to_string(),
            app_id: app.to_string(),
            client: ErrorClient::new(org, app, token)?,
        })
    }

    /// Hook around an already configured client.
    pub fn with_client(org: &str, app: &str, client: ErrorClient) -> Self {
        Self {
            org_id: org.to_string(),
            app_id: app.to_string(),
            client,
        }
    }

    pub fn client(&self) -> &ErrorClient {
        &self.client
    }
}

impl Hook for LogbeatHook {
    fn interested_levels(&self) -> &'static [Severity] {
        Self::LEVELS
    }

    fn handle(&self, event: &LogEvent) -> Result<(), DeliveryError> {
        self.client.notify(event).map(|_| ())
    }
}
