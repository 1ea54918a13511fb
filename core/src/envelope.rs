//! Uniform result envelope and failure classification.
//!
//! # Design
//! Every public pipeline operation returns an [`Envelope`] instead of a
//! `Result` — "errors are values" across the whole client surface. Callers
//! check [`Envelope::status`] before touching the payload; nothing in the
//! pipeline panics or propagates an error type upward.
//!
//! [`classify`] maps a transport failure's free-text message onto a status
//! by scanning for literal decimal code substrings. The scheme is crude on
//! purpose: existing callers depend on its exact edge behavior, so it is
//! reproduced rather than replaced with structured codes.

/// Outcome status carried by every [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Success,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
}

impl ApiStatus {
    /// Numeric HTTP form of the status.
    pub fn code(self) -> u16 {
        match self {
            ApiStatus::Success => 200,
            ApiStatus::BadRequest => 400,
            ApiStatus::Unauthorized => 401,
            ApiStatus::Forbidden => 403,
            ApiStatus::NotFound => 404,
            ApiStatus::InternalServerError => 500,
            ApiStatus::BadGateway => 502,
            ApiStatus::ServiceUnavailable => 503,
            ApiStatus::GatewayTimeout => 504,
        }
    }

    pub fn is_success(self) -> bool {
        self == ApiStatus::Success
    }
}

/// Uniform success/failure wrapper returned by every pipeline operation.
///
/// Invariant: `payload` is `Some` exactly when `status` is
/// [`ApiStatus::Success`]; on any failure path the payload is absent and
/// `error` holds the failure detail. Both constructors uphold this, so code
/// that goes through them cannot produce a mixed state.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub status: ApiStatus,
    pub payload: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(payload: T) -> Self {
        Self {
            status: ApiStatus::Success,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failure(status: ApiStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            payload: None,
            error: Some(detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Carry a failure over to a different payload type. Any payload is
    /// dropped, so this is only meaningful on failure envelopes.
    pub fn recast<U>(self) -> Envelope<U> {
        Envelope {
            status: self.status,
            payload: None,
            error: self.error,
        }
    }
}

/// Classify a transport failure message by its embedded status-code text.
///
/// Checks run in a fixed order and the first hit wins. The match is a plain
/// substring scan — a message containing "1404" also matches "404". That
/// ambiguity ships as-is; callers rely on the historical mapping.
pub fn classify(message: &str) -> ApiStatus {
    const CODES: [(&str, ApiStatus); 7] = [
        ("400", ApiStatus::BadRequest),
        ("401", ApiStatus::Unauthorized),
        ("403", ApiStatus::Forbidden),
        ("404", ApiStatus::NotFound),
        ("502", ApiStatus::BadGateway),
        ("503", ApiStatus::ServiceUnavailable),
        ("504", ApiStatus::GatewayTimeout),
    ];
    for (needle, status) in CODES {
        if message.contains(needle) {
            return status;
        }
    }
    ApiStatus::InternalServerError
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_carries_payload_and_no_error() {
        let envelope = Envelope::success(5);
        assert!(envelope.is_success());
        assert_eq!(envelope.payload, Some(5));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn failure_envelope_has_no_payload() {
        let envelope: Envelope<i32> = Envelope::failure(ApiStatus::NotFound, "gone");
        assert!(!envelope.is_success());
        assert!(envelope.payload.is_none());
        assert_eq!(envelope.error.as_deref(), Some("gone"));
    }

    #[test]
    fn recast_keeps_status_and_detail() {
        let envelope: Envelope<i32> = Envelope::failure(ApiStatus::BadGateway, "upstream hiccup");
        let recast: Envelope<String> = envelope.recast();
        assert_eq!(recast.status, ApiStatus::BadGateway);
        assert_eq!(recast.error.as_deref(), Some("upstream hiccup"));
    }

    #[test]
    fn classify_finds_404_anywhere_in_the_message() {
        assert_eq!(
            classify("GET https://example.test/api/v2/get_case/7: 404 Not Found"),
            ApiStatus::NotFound
        );
        assert_eq!(classify("404"), ApiStatus::NotFound);
    }

    #[test]
    fn classify_service_unavailable_message() {
        assert_eq!(
            classify("Server returned 503 Service Unavailable"),
            ApiStatus::ServiceUnavailable
        );
    }

    #[test]
    fn classify_unmatched_message_is_internal_error() {
        assert_eq!(
            classify("connection reset by peer"),
            ApiStatus::InternalServerError
        );
        assert_eq!(classify(""), ApiStatus::InternalServerError);
    }

    #[test]
    fn classify_checks_codes_in_declaration_order() {
        // Both 401 and 404 appear; 401 is checked first.
        assert_eq!(
            classify("got 404 after auth failed with 401"),
            ApiStatus::Unauthorized
        );
    }

    #[test]
    fn classify_substring_scan_is_knowingly_naive() {
        // "1404" contains "404" — historical behavior, kept.
        assert_eq!(classify("request id 1404 failed"), ApiStatus::NotFound);
    }

    #[test]
    fn classify_each_mapped_code() {
        assert_eq!(classify("status 400"), ApiStatus::BadRequest);
        assert_eq!(classify("status 401"), ApiStatus::Unauthorized);
        assert_eq!(classify("status 403"), ApiStatus::Forbidden);
        assert_eq!(classify("status 502"), ApiStatus::BadGateway);
        assert_eq!(classify("status 504"), ApiStatus::GatewayTimeout);
    }
}
