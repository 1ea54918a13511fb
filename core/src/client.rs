//! Synchronous client for the test-management API.
//!
//! # Design
//! `Client` holds the configuration computed once at construction (trimmed
//! base URL, encoded credential header), an injected [`Transport`], and the
//! two lazily computed caches. Nothing is mutated after construction; each
//! dispatch builds its own request and envelope, so concurrent dispatches
//! from separate threads are independent.
//!
//! Three pipeline operations carry the whole client: [`Client::dispatch`]
//! for single-object exchanges, [`Client::fetch_all_pages`] for cursor-driven
//! bulk aggregation, and the cached accessors ([`Client::projects`],
//! [`Client::priority_level`]). Every resource operation below them is a few
//! lines of endpoint assembly over that surface.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::decode::{decode_list, BulkPage};
use crate::endpoint::{Endpoint, Operation, Resource};
use crate::envelope::{classify, ApiStatus, Envelope};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{
    Case, CreateCase, CreateProject, CreateRun, CreateSection, Priority, Project, Run, Section,
    UpdateCase, UpdateRun, User,
};

/// Blocking client over an injected transport.
pub struct Client<T> {
    base_url: String,
    auth_header: String,
    transport: T,
    projects: OnceCell<Vec<Project>>,
    priority_levels: OnceCell<HashMap<u64, i64>>,
}

impl<T: Transport> Client<T> {
    /// Build a client for the service at `base_url`, authenticating every
    /// request as `user` with `api_key`. The credential header is encoded
    /// here, once; the client never re-reads the inputs.
    pub fn new(base_url: &str, user: &str, api_key: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {}", STANDARD.encode(format!("{user}:{api_key}"))),
            transport,
            projects: OnceCell::new(),
            priority_levels: OnceCell::new(),
        }
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    /// Execute one exchange and decode the response body into `P`.
    ///
    /// Failures never propagate: a transport failure is classified by its
    /// message text, a decode failure maps to `InternalServerError`, and
    /// either way the caller gets a failure envelope.
    pub fn dispatch<P: DeserializeOwned>(
        &self,
        address: &str,
        method: HttpMethod,
        body: Option<Value>,
    ) -> Envelope<P> {
        let response = match self.exchange(address, method, body) {
            Ok(response) => response,
            Err((status, message)) => return Envelope::failure(status, message),
        };
        match serde_json::from_str(&response.body) {
            Ok(payload) => Envelope::success(payload),
            // Not run through classify(): a serde message could contain a
            // coincidental digit run and land on a bogus status.
            Err(err) => Envelope::failure(
                ApiStatus::InternalServerError,
                format!("response body for {address} did not decode: {err}"),
            ),
        }
    }

    /// Execute one exchange whose success response carries no body worth
    /// decoding (deletes).
    pub fn dispatch_empty(
        &self,
        address: &str,
        method: HttpMethod,
        body: Option<Value>,
    ) -> Envelope<()> {
        match self.exchange(address, method, body) {
            Ok(_) => Envelope::success(()),
            Err((status, message)) => Envelope::failure(status, message),
        }
    }

    /// Fetch every page of a bulk endpoint, concatenating decoded items in
    /// cursor-traversal order.
    ///
    /// The `_links.next` cursor is used verbatim as the next address, so it
    /// gets the same base-URL prefixing as a hand-built one. A failure on
    /// any page aborts aggregation and surfaces that page's envelope; the
    /// prefix aggregated so far is discarded. Cursor chains are followed
    /// without a bound.
    pub fn fetch_all_pages<P: DeserializeOwned>(
        &self,
        address: &str,
        key: &str,
    ) -> Envelope<Vec<P>> {
        let mut items = Vec::new();
        let mut address = address.to_string();
        loop {
            let mut page = self.dispatch::<Value>(&address, HttpMethod::Get, None);
            let Some(body) = page.payload.take() else {
                return page.recast();
            };
            let page = match BulkPage::parse(&body, key) {
                Ok(page) => page,
                Err(err) => return Envelope::failure(ApiStatus::InternalServerError, err.to_string()),
            };
            let mut decoded = match decode_list(&page.items) {
                Ok(decoded) => decoded,
                Err(err) => return Envelope::failure(ApiStatus::InternalServerError, err.to_string()),
            };
            debug!(%address, items = decoded.len(), "aggregated page");
            items.append(&mut decoded);
            match page.next {
                Some(next) => address = next,
                None => return Envelope::success(items),
            }
        }
    }

    fn exchange(
        &self,
        address: &str,
        method: HttpMethod,
        body: Option<Value>,
    ) -> Result<HttpResponse, (ApiStatus, String)> {
        debug!(?method, %address, "dispatch");
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, address),
            headers: vec![
                ("authorization".to_string(), self.auth_header.clone()),
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            body: body.map(|value| value.to_string()),
        };
        match self.transport.execute(request) {
            Ok(response) => Ok(response),
            Err(err) => {
                let message = err.to_string();
                let status = classify(&message);
                warn!(%address, status = ?status, error = %message, "exchange failed");
                Err((status, message))
            }
        }
    }

    // ------------------------------------------------------------------
    // Lazy caches
    // ------------------------------------------------------------------

    /// The full project list, fetched once per client lifetime on first
    /// access and served from the cache thereafter — even when the fetch
    /// failed (empty list) and even if the remote data changes later.
    pub fn projects(&self) -> &[Project] {
        self.projects
            .get_or_init(|| self.get_projects().payload.unwrap_or_default())
    }

    /// Severity level for a priority identifier, from a lookup built once on
    /// first access. Priorities without a level are not in the map.
    pub fn priority_level(&self, priority_id: u64) -> Option<i64> {
        self.priority_levels
            .get_or_init(|| {
                self.get_priorities()
                    .payload
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|p| p.priority.map(|level| (p.id, level)))
                    .collect()
            })
            .get(&priority_id)
            .copied()
    }

    // ------------------------------------------------------------------
    // Cases
    // ------------------------------------------------------------------

    pub fn get_case(&self, case_id: u64) -> Envelope<Case> {
        let address = Endpoint::single(Operation::Get, Resource::Case)
            .id1(case_id)
            .address();
        self.dispatch(&address, HttpMethod::Get, None)
    }

    pub fn get_cases(&self, project_id: u64, options: Option<&str>) -> Envelope<Vec<Case>> {
        let mut endpoint = Endpoint::bulk(Operation::Get, Resource::Case).id1(project_id);
        if let Some(options) = options {
            endpoint = endpoint.options(options);
        }
        self.fetch_all_pages(&endpoint.address(), Resource::Case.plural())
    }

    pub fn add_case(&self, section_id: u64, case: &CreateCase) -> Envelope<Case> {
        if case.title.trim().is_empty() {
            return Envelope::failure(ApiStatus::BadRequest, "case title is required");
        }
        let body = match encode(case) {
            Ok(body) => body,
            Err(envelope) => return envelope,
        };
        let address = Endpoint::single(Operation::Add, Resource::Case)
            .id1(section_id)
            .address();
        self.dispatch(&address, HttpMethod::Post, Some(body))
    }

    pub fn update_case(&self, case_id: u64, case: &UpdateCase) -> Envelope<Case> {
        let body = match encode(case) {
            Ok(body) => body,
            Err(envelope) => return envelope,
        };
        let address = Endpoint::single(Operation::Update, Resource::Case)
            .id1(case_id)
            .address();
        self.dispatch(&address, HttpMethod::Post, Some(body))
    }

    pub fn delete_case(&self, case_id: u64) -> Envelope<()> {
        let address = Endpoint::single(Operation::Delete, Resource::Case)
            .id1(case_id)
            .address();
        self.dispatch_empty(&address, HttpMethod::Post, None)
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub fn get_project(&self, project_id: u64) -> Envelope<Project> {
        let address = Endpoint::single(Operation::Get, Resource::Project)
            .id1(project_id)
            .address();
        self.dispatch(&address, HttpMethod::Get, None)
    }

    pub fn get_projects(&self) -> Envelope<Vec<Project>> {
        let address = Endpoint::bulk(Operation::Get, Resource::Project).address();
        self.fetch_all_pages(&address, Resource::Project.plural())
    }

    pub fn add_project(&self, project: &CreateProject) -> Envelope<Project> {
        if project.name.trim().is_empty() {
            return Envelope::failure(ApiStatus::BadRequest, "project name is required");
        }
        let body = match encode(project) {
            Ok(body) => body,
            Err(envelope) => return envelope,
        };
        let address = Endpoint::single(Operation::Add, Resource::Project).address();
        self.dispatch(&address, HttpMethod::Post, Some(body))
    }

    pub fn delete_project(&self, project_id: u64) -> Envelope<()> {
        let address = Endpoint::single(Operation::Delete, Resource::Project)
            .id1(project_id)
            .address();
        self.dispatch_empty(&address, HttpMethod::Post, None)
    }

    // ------------------------------------------------------------------
    // Runs
    // ------------------------------------------------------------------

    pub fn get_run(&self, run_id: u64) -> Envelope<Run> {
        let address = Endpoint::single(Operation::Get, Resource::Run)
            .id1(run_id)
            .address();
        self.dispatch(&address, HttpMethod::Get, None)
    }

    pub fn get_runs(&self, project_id: u64, options: Option<&str>) -> Envelope<Vec<Run>> {
        let mut endpoint = Endpoint::bulk(Operation::Get, Resource::Run).id1(project_id);
        if let Some(options) = options {
            endpoint = endpoint.options(options);
        }
        self.fetch_all_pages(&endpoint.address(), Resource::Run.plural())
    }

    pub fn add_run(&self, project_id: u64, run: &CreateRun) -> Envelope<Run> {
        if run.name.trim().is_empty() {
            return Envelope::failure(ApiStatus::BadRequest, "run name is required");
        }
        let body = match encode(run) {
            Ok(body) => body,
            Err(envelope) => return envelope,
        };
        let address = Endpoint::single(Operation::Add, Resource::Run)
            .id1(project_id)
            .address();
        self.dispatch(&address, HttpMethod::Post, Some(body))
    }

    pub fn update_run(&self, run_id: u64, run: &UpdateRun) -> Envelope<Run> {
        let body = match encode(run) {
            Ok(body) => body,
            Err(envelope) => return envelope,
        };
        let address = Endpoint::single(Operation::Update, Resource::Run)
            .id1(run_id)
            .address();
        self.dispatch(&address, HttpMethod::Post, Some(body))
    }

    /// Close a run. The closed run comes back in the payload.
    pub fn close_run(&self, run_id: u64) -> Envelope<Run> {
        let address = Endpoint::single(Operation::Close, Resource::Run)
            .id1(run_id)
            .address();
        self.dispatch(&address, HttpMethod::Post, None)
    }

    // ------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------

    pub fn get_section(&self, section_id: u64) -> Envelope<Section> {
        let address = Endpoint::single(Operation::Get, Resource::Section)
            .id1(section_id)
            .address();
        self.dispatch(&address, HttpMethod::Get, None)
    }

    pub fn get_sections(&self, project_id: u64, options: Option<&str>) -> Envelope<Vec<Section>> {
        let mut endpoint = Endpoint::bulk(Operation::Get, Resource::Section).id1(project_id);
        if let Some(options) = options {
            endpoint = endpoint.options(options);
        }
        self.fetch_all_pages(&endpoint.address(), Resource::Section.plural())
    }

    pub fn add_section(&self, project_id: u64, section: &CreateSection) -> Envelope<Section> {
        if section.name.trim().is_empty() {
            return Envelope::failure(ApiStatus::BadRequest, "section name is required");
        }
        let body = match encode(section) {
            Ok(body) => body,
            Err(envelope) => return envelope,
        };
        let address = Endpoint::single(Operation::Add, Resource::Section)
            .id1(project_id)
            .address();
        self.dispatch(&address, HttpMethod::Post, Some(body))
    }

    // ------------------------------------------------------------------
    // Priorities
    // ------------------------------------------------------------------

    pub fn get_priorities(&self) -> Envelope<Vec<Priority>> {
        let address = Endpoint::bulk(Operation::Get, Resource::Priority).address();
        self.fetch_all_pages(&address, Resource::Priority.plural())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub fn get_user(&self, user_id: u64) -> Envelope<User> {
        let address = Endpoint::single(Operation::Get, Resource::User)
            .id1(user_id)
            .address();
        self.dispatch(&address, HttpMethod::Get, None)
    }

    /// Look a user up by email — the textual secondary-identifier form of
    /// endpoint addressing.
    pub fn get_user_by_email(&self, email: &str) -> Envelope<User> {
        if email.trim().is_empty() {
            return Envelope::failure(ApiStatus::BadRequest, "email is required");
        }
        let address = Endpoint::single(Operation::Get, Resource::User)
            .id2_text(email)
            .address();
        self.dispatch(&address, HttpMethod::Get, None)
    }

    pub fn get_users(&self) -> Envelope<Vec<User>> {
        let address = Endpoint::bulk(Operation::Get, Resource::User).address();
        self.fetch_all_pages(&address, Resource::User.plural())
    }
}

fn encode<P, B: Serialize>(body: &B) -> Result<Value, Envelope<P>> {
    serde_json::to_value(body).map_err(|err| {
        Envelope::failure(
            ApiStatus::InternalServerError,
            format!("request payload did not serialize: {err}"),
        )
    })
}
