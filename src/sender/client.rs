use super::request::{build_request, endpoint};
use super::runtime::{DeliveryGuard, off_runtime};
use crate::domain::{DeliveryError, LogEvent};
use crate::payload::{Machine, build_payload};
use reqwest::blocking::{Client, ClientBuilder, Response};
use std::mem::ManuallyDrop;
use std::time::Duration;
use tracing::{debug, trace};

/// Upper bound on a whole delivery attempt.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// reqwest runs the TLS handshake inside the connect phase, so this is
/// enforced through the connect timeout.
pub const TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivers error reports to the intake API.
///
/// Configuration is fixed at construction; the client is safe to share
/// between threads and holds no per-delivery state. It can be created,
/// used and dropped from inside a tokio runtime.
#[derive(Clone)]
pub struct ErrorClient {
    endpoint: String,
    http: Transport,
    machine: Machine,
    token: String,
}

impl ErrorClient {
    pub fn new(org: &str, app: &str, token: impl Into<String>) -> Result<Self, DeliveryError> {
        Self::with_endpoint(endpoint(org, app), token)
    }

    /// Client posting to an explicit URL instead of the derived intake one.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, DeliveryError> {
        let http = off_runtime(|| {
            ClientBuilder::new()
                .timeout(REQUEST_TIMEOUT)
                .connect_timeout(CONNECT_TIMEOUT.max(TLS_HANDSHAKE_TIMEOUT))
                .build()
        })
        .map_err(|_| DeliveryError::WorkerPanicked)?
        .map_err(DeliveryError::ClientBuild)?;

        let client = Self {
            endpoint: endpoint.into(),
            http: Transport(ManuallyDrop::new(http)),
            machine: Machine::current(),
            token: token.into(),
        };

        debug!(
            endpoint = %client.endpoint,
            hostname = %client.machine.hostname,
            "Created error intake client"
        );

        Ok(client)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Sends one report for `event`.
    ///
    /// Any HTTP status comes back as `Ok`; only serialization, request
    /// construction and transport failures are errors. Blocks the caller for
    /// at most [`REQUEST_TIMEOUT`]; inside a tokio runtime the request runs
    /// on a separate thread.
    pub fn notify(&self, event: &LogEvent) -> Result<Response, DeliveryError> {
        off_runtime(|| self.deliver(event)).map_err(|_| DeliveryError::WorkerPanicked)?
    }

    fn deliver(&self, event: &LogEvent) -> Result<Response, DeliveryError> {
        let _guard = DeliveryGuard::enter();
        let payload = build_payload(event, &self.machine);
        let request = build_request(&payload, &self.endpoint, &self.token)?;

        let response = self.http.execute(request)?;

        trace!(
            status = response.status().as_u16(),
            level = %payload.level,
            "Delivered error report"
        );

        Ok(response)
    }
}

/// Blocking client whose last handle is released off any runtime thread.
#[derive(Clone)]
struct Transport(ManuallyDrop<Client>);

impl Transport {
    fn execute(&self, request: reqwest::blocking::Request) -> reqwest::Result<Response> {
        self.0.execute(request)
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        // SAFETY: `self.0` is not touched again after this point.
        let client = unsafe { ManuallyDrop::take(&mut self.0) };
        let _ = off_runtime(move || drop(client));
    }
}

impl std::fmt::Debug for ErrorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorClient")
            .field("endpoint", &self.endpoint)
            .field("machine", &self.machine)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}
