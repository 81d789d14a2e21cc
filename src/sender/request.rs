use crate::LOGBEAT_VERSION;
use crate::domain::DeliveryError;
use crate::payload::ErrorPayload;
use reqwest::Method;
use reqwest::blocking::{Body, Request};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

pub const INTAKE_HOST: &str = "intake.opbeat.com";
pub const PROJECT_URL: &str = "https://github.com/xentek/logbeat";

/// Intake URL for an organization/app pair.
pub fn endpoint(org: &str, app: &str) -> String {
    format!("https://{INTAKE_HOST}/api/v1/organizations/{org}/apps/{app}/errors/")
}

pub fn bearer_auth(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn user_agent() -> String {
    format!("Logbeat/{LOGBEAT_VERSION} (+{PROJECT_URL})")
}

/// Serializes `payload` and wraps it in an authenticated POST to `endpoint`.
pub fn build_request(
    payload: &ErrorPayload,
    endpoint: &str,
    token: &str,
) -> Result<Request, DeliveryError> {
    let body = payload.to_json()?;

    let url = Url::parse(endpoint).map_err(|e| {
        DeliveryError::RequestConstruction(format!("Invalid endpoint URL '{endpoint}': {e}"))
    })?;

    let mut request = Request::new(Method::POST, url);
    *request.headers_mut() = build_headers(token)?;
    *request.body_mut() = Some(Body::from(body));

    Ok(request)
}

fn build_headers(token: &str) -> Result<HeaderMap, DeliveryError> {
    let mut headers = HeaderMap::with_capacity(3);

    let mut auth = HeaderValue::from_str(&bearer_auth(token)).map_err(|e| {
        DeliveryError::RequestConstruction(format!("Invalid secret token: {e}"))
    })?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&user_agent()).map_err(|e| {
            DeliveryError::RequestConstruction(format!("Invalid user agent: {e}"))
        })?,
    );

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LogEvent, Severity};
    use crate::payload::{Machine, build_payload};
    use serde_json::Value;

    const ENDPOINT: &str =
        "https://intake.opbeat.com/api/v1/organizations/TEST_ORG_ID/apps/TEST_APP_ID/errors/";

    fn payload() -> ErrorPayload {
        let event = LogEvent::new(Severity::Panic, "boom").with_field("k", "v");
        build_payload(&event, &Machine::new("host-a"))
    }

    #[test]
    fn test_endpoint_format() {
        assert_eq!(endpoint("TEST_ORG_ID", "TEST_APP_ID"), ENDPOINT);
        assert_eq!(
            endpoint("ACME", "web"),
            "https://intake.opbeat.com/api/v1/organizations/ACME/apps/web/errors/"
        );
        assert_eq!(endpoint("ACME", "web"), endpoint("ACME", "web"));
    }

    #[test]
    fn test_bearer_auth() {
        assert_eq!(bearer_auth("TEST_TOKEN"), "Bearer TEST_TOKEN");
    }

    #[test]
    fn test_user_agent() {
        assert_eq!(
            user_agent(),
            "Logbeat/0.0.3 (+https://github.com/xentek/logbeat)"
        );
    }

    #[test]
    fn test_request_method_url_and_headers() {
        let request = build_request(&payload(), ENDPOINT, "TEST_TOKEN").unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().as_str(), ENDPOINT);

        let headers = request.headers();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[AUTHORIZATION], "Bearer TEST_TOKEN");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(
            headers[USER_AGENT],
            "Logbeat/0.0.3 (+https://github.com/xentek/logbeat)"
        );
    }

    #[test]
    fn test_request_body_is_payload_json() {
        let payload = payload();
        let request = build_request(&payload, ENDPOINT, "TEST_TOKEN").unwrap();

        let bytes = request.body().and_then(Body::as_bytes).unwrap();
        let body: Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(body, serde_json::to_value(&payload).unwrap());
        assert_eq!(body["level"], "critical");
        assert_eq!(body["extra"]["k"], "v");
    }

    #[test]
    fn test_malformed_endpoint_is_rejected() {
        let err = build_request(&payload(), "not a url", "TEST_TOKEN").unwrap_err();
        assert!(matches!(err, DeliveryError::RequestConstruction(_)));
    }

    #[test]
    fn test_non_finite_field_is_surfaced() {
        let event = LogEvent::new(Severity::Error, "boom").with_field("ratio", f64::INFINITY);
        let payload = build_payload(&event, &Machine::new("host-a"));

        let err = build_request(&payload, ENDPOINT, "TEST_TOKEN").unwrap_err();
        assert!(matches!(err, DeliveryError::Serialization(_)));
    }

    #[test]
    fn test_token_with_control_characters_is_rejected() {
        let err = build_request(&payload(), ENDPOINT, "bad\ntoken").unwrap_err();
        assert!(matches!(err, DeliveryError::RequestConstruction(_)));
    }
}
