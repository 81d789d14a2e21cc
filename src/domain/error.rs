use thiserror::Error;

/// Errors returned while turning a log event into a delivered report.
///
/// A non-2xx response is not an error at this layer; it comes back as a
/// normal response for the caller to interpret.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Request construction error: {0}")]
    RequestConstruction(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("Delivery thread panicked")]
    WorkerPanicked,
}

impl DeliveryError {
    pub fn is_transport(&self) -> bool {
        matches!(self, DeliveryError::Transport(_))
    }
}
