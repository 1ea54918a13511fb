//! HTTP transport boundary for the host-does-IO pattern.
//!
//! # Design
//! `HttpRequest` and `HttpResponse` describe one exchange as plain data; the
//! `Transport` trait is the single seam through which the client reaches the
//! network. The core never opens a socket itself — hosts plug in whatever
//! blocking HTTP stack they already use, which keeps the pipeline
//! deterministic and easy to drive from a scripted double in tests.
//!
//! All fields use owned types (`String`, `Vec`) so requests can be recorded,
//! cloned, and replayed freely.

use crate::error::TransportError;

/// HTTP method for a request. The remote API expresses every mutation as a
/// POST, so only two verbs exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// Built by the client's dispatcher; executed by a [`Transport`]
/// implementation.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// A blocking, one-exchange-per-call HTTP transport.
///
/// Implementations must surface non-success HTTP statuses as a
/// [`TransportError`] whose message contains the decimal status code — the
/// dispatcher's failure classification reads the code out of that text.
/// Timeouts, TLS, and retries are entirely the transport's concern; the
/// pipeline imposes none of its own.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Shared references dispatch through to the underlying transport, so one
/// agent can serve several clients.
impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
