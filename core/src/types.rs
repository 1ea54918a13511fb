//! Entity DTOs for the test-management API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates. The remote
//! service sends more fields than are modeled here — serde drops unknown
//! fields, so the subset below is the supported surface. Every entity derives
//! `Deserialize`, which is the decode contract the list decoder dispatches
//! through.

use serde::{Deserialize, Serialize};

/// A test case, owned by a section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Case {
    pub id: u64,
    pub title: String,
    pub section_id: u64,
    pub priority_id: Option<u64>,
    pub refs: Option<String>,
}

/// A project — the top-level container for suites, sections, and runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub announcement: Option<String>,
    pub is_completed: bool,
}

/// A case priority. `priority` is the severity level (higher = more severe);
/// the server may omit it for unranked entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Priority {
    pub id: u64,
    pub name: String,
    pub short_name: Option<String>,
    pub priority: Option<i64>,
    pub is_default: bool,
}

/// A test run within a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Run {
    pub id: u64,
    pub name: String,
    pub project_id: u64,
    pub description: Option<String>,
    pub is_completed: bool,
}

/// A section grouping cases, optionally nested under a parent section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub id: u64,
    pub name: String,
    pub parent_id: Option<u64>,
}

/// A user account on the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

/// Payload for creating a case. `title` is required and validated before any
/// request goes out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCase {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refs: Option<String>,
}

/// Payload for updating a case. Only the fields present in the JSON are
/// applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refs: Option<String>,
}

/// Payload for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcement: Option<String>,
}

/// Payload for creating a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRun {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for updating a run; partial, like [`UpdateCase`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRun {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for creating a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSection {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}
