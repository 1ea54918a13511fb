//! Error types for the client pipeline.
//!
//! # Design
//! Public pipeline operations never return these directly — failures are
//! folded into [`Envelope`](crate::envelope::Envelope) statuses. They exist
//! for the two internal seams that do fail as values: the transport raising
//! an exchange failure, and JSON material refusing to decode.

use std::fmt;

/// Failure raised by a [`Transport`](crate::http::Transport) implementation.
///
/// Carries only a free-text message. When the exchange died on an HTTP
/// status, the message is expected to contain the decimal status code, which
/// is what [`classify`](crate::envelope::classify) matches on.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}

/// Failure decoding bulk-response material into typed entities.
#[derive(Debug)]
pub enum DecodeError {
    /// One element of a raw list failed to decode; the index points at the
    /// offending array position.
    Element { index: usize, detail: String },

    /// A bulk page was missing the expected array, or its shape was
    /// otherwise unusable.
    Page(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Element { index, detail } => {
                write!(f, "element {index} did not decode: {detail}")
            }
            DecodeError::Page(detail) => write!(f, "malformed bulk page: {detail}"),
        }
    }
}

impl std::error::Error for DecodeError {}
