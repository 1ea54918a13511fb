//! Typed, blocking client for the TestHub test-management API.
//!
//! # Overview
//! Each logical operation (create/read/update/close/delete a resource)
//! builds a canonical `/api/v2/{op}_{resource}` address, issues one blocking
//! exchange through an injected [`Transport`], and folds the outcome into a
//! uniform [`Envelope`] — callers inspect a status, never catch an error.
//!
//! # Design
//! - The transport is a collaborator, not a dependency: the core owns
//!   request building, failure classification, pagination, and decoding,
//!   while the host owns sockets, TLS, and timeouts.
//! - Bulk endpoints are aggregated across their `_links.next` cursor chain
//!   into one ordered sequence.
//! - Entities decode through `serde::Deserialize` — the one capability every
//!   entity kind implements — so the list decoder stays entity-agnostic.
//! - The project list and the priority-level lookup are computed once per
//!   client lifetime and never invalidated.

pub mod client;
pub mod decode;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
pub mod types;

pub use client::Client;
pub use decode::{decode_list, BulkPage};
pub use endpoint::{Endpoint, Operation, Resource};
pub use envelope::{classify, ApiStatus, Envelope};
pub use error::{DecodeError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use types::{
    Case, CreateCase, CreateProject, CreateRun, CreateSection, Priority, Project, Run, Section,
    UpdateCase, UpdateRun, User,
};
