pub mod client;
pub mod request;
pub(crate) mod runtime;

pub use client::{CONNECT_TIMEOUT, ErrorClient, REQUEST_TIMEOUT, TLS_HANDSHAKE_TIMEOUT};
pub use request::{INTAKE_HOST, PROJECT_URL, bearer_auth, build_request, endpoint, user_agent};
