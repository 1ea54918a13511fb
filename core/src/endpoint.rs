//! Canonical endpoint addressing.
//!
//! # Design
//! Every API operation lives at `/api/v2/{operation}_{resource}` with up to
//! two trailing identifier segments and a verbatim query-option suffix. An
//! [`Endpoint`] gathers those parts as a plain value; [`Endpoint::address`]
//! renders them. Rendering is pure and total — no identifier validation, no
//! escaping, no failure path. Callers own well-formedness.

/// The operation half of an endpoint name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Add,
    Update,
    Close,
    Delete,
}

impl Operation {
    pub fn token(self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Close => "close",
            Operation::Delete => "delete",
        }
    }
}

/// The resource half of an endpoint name.
///
/// Each resource has a singular token (single-object endpoints) and a plural
/// token (bulk endpoints). The plural token doubles as the array key under
/// which bulk responses wrap their items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Case,
    Project,
    Priority,
    Run,
    Section,
    User,
}

impl Resource {
    pub fn singular(self) -> &'static str {
        match self {
            Resource::Case => "case",
            Resource::Project => "project",
            Resource::Priority => "priority",
            Resource::Run => "run",
            Resource::Section => "section",
            Resource::User => "user",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Resource::Case => "cases",
            Resource::Project => "projects",
            Resource::Priority => "priorities",
            Resource::Run => "runs",
            Resource::Section => "sections",
            Resource::User => "users",
        }
    }
}

/// Descriptor for one endpoint address: operation, resource, up to two
/// identifiers, and a raw query-option string.
///
/// The secondary identifier has a numeric and a textual form; when both are
/// set, the numeric one wins.
#[derive(Debug, Clone)]
pub struct Endpoint {
    operation: Operation,
    resource: Resource,
    bulk: bool,
    id1: Option<u64>,
    id2: Option<u64>,
    id2_text: Option<String>,
    options: Option<String>,
}

impl Endpoint {
    /// Descriptor for a single-object endpoint (`get_case`, `add_run`, …).
    pub fn single(operation: Operation, resource: Resource) -> Self {
        Self {
            operation,
            resource,
            bulk: false,
            id1: None,
            id2: None,
            id2_text: None,
            options: None,
        }
    }

    /// Descriptor for a bulk endpoint (`get_cases`, `get_projects`, …).
    pub fn bulk(operation: Operation, resource: Resource) -> Self {
        Self {
            bulk: true,
            ..Self::single(operation, resource)
        }
    }

    pub fn id1(mut self, id: u64) -> Self {
        self.id1 = Some(id);
        self
    }

    pub fn id2(mut self, id: u64) -> Self {
        self.id2 = Some(id);
        self
    }

    pub fn id2_text(mut self, id: impl Into<String>) -> Self {
        self.id2_text = Some(id.into());
        self
    }

    /// Raw query-option string, appended to the address verbatim. The caller
    /// supplies its own leading `?`.
    pub fn options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Render the canonical relative address.
    pub fn address(&self) -> String {
        let token = if self.bulk {
            self.resource.plural()
        } else {
            self.resource.singular()
        };
        let mut address = format!("/api/v2/{}_{}", self.operation.token(), token);
        if let Some(id1) = self.id1 {
            address.push_str(&format!("/{id1}"));
        }
        if let Some(id2) = self.id2 {
            address.push_str(&format!("/{id2}"));
        } else if let Some(id2_text) = &self.id2_text {
            address.push('/');
            address.push_str(id2_text);
        }
        if let Some(options) = &self.options {
            address.push_str(options);
        }
        address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_get_with_one_id() {
        let address = Endpoint::single(Operation::Get, Resource::Case)
            .id1(42)
            .address();
        assert_eq!(address, "/api/v2/get_case/42");
    }

    #[test]
    fn bulk_uses_plural_token() {
        let address = Endpoint::bulk(Operation::Get, Resource::Case)
            .id1(1)
            .address();
        assert_eq!(address, "/api/v2/get_cases/1");
    }

    #[test]
    fn options_are_appended_verbatim() {
        let address = Endpoint::bulk(Operation::Get, Resource::Section)
            .id1(7)
            .options("?limit=50&offset=100")
            .address();
        assert_eq!(address, "/api/v2/get_sections/7?limit=50&offset=100");
    }

    #[test]
    fn numeric_id2_wins_over_textual() {
        let address = Endpoint::single(Operation::Get, Resource::User)
            .id1(3)
            .id2(9)
            .id2_text("someone@example.test")
            .address();
        assert_eq!(address, "/api/v2/get_user/3/9");
    }

    #[test]
    fn textual_id2_fills_in_when_numeric_absent() {
        let address = Endpoint::single(Operation::Get, Resource::User)
            .id2_text("someone@example.test")
            .address();
        assert_eq!(address, "/api/v2/get_user/someone@example.test");
    }

    #[test]
    fn close_and_delete_tokens() {
        let close = Endpoint::single(Operation::Close, Resource::Run)
            .id1(12)
            .address();
        assert_eq!(close, "/api/v2/close_run/12");

        let delete = Endpoint::single(Operation::Delete, Resource::Project)
            .id1(4)
            .address();
        assert_eq!(delete, "/api/v2/delete_project/4");
    }

    #[test]
    fn bare_endpoint_has_no_trailing_segments() {
        let address = Endpoint::bulk(Operation::Get, Resource::Priority).address();
        assert_eq!(address, "/api/v2/get_priorities");
    }
}
