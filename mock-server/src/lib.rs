use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub announcement: Option<String>,
    pub is_completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Case {
    pub id: u64,
    pub title: String,
    pub section_id: u64,
    pub priority_id: Option<u64>,
    pub refs: Option<String>,
    pub project_id: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Run {
    pub id: u64,
    pub name: String,
    pub project_id: u64,
    pub description: Option<String>,
    pub is_completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Section {
    pub id: u64,
    pub name: String,
    pub parent_id: Option<u64>,
    pub project_id: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Priority {
    pub id: u64,
    pub name: String,
    pub short_name: Option<String>,
    pub priority: Option<i64>,
    pub is_default: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct CreateCase {
    pub title: String,
    pub priority_id: Option<u64>,
    pub refs: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCase {
    pub title: Option<String>,
    pub priority_id: Option<u64>,
    pub refs: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub announcement: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRun {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRun {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateSection {
    pub name: String,
    pub parent_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Default)]
pub struct Hub {
    projects: BTreeMap<u64, Project>,
    cases: BTreeMap<u64, Case>,
    runs: BTreeMap<u64, Run>,
    sections: BTreeMap<u64, Section>,
    priorities: Vec<Priority>,
    users: BTreeMap<u64, User>,
    next_id: u64,
}

impl Hub {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Hub>>;

pub fn app() -> Router {
    let hub = Hub {
        priorities: seed_priorities(),
        users: seed_users(),
        ..Hub::default()
    };
    let db: Db = Arc::new(RwLock::new(hub));
    Router::new()
        .route("/api/v2/get_case/{id}", get(get_case))
        .route("/api/v2/get_cases/{project_id}", get(get_cases))
        .route("/api/v2/add_case/{section_id}", post(add_case))
        .route("/api/v2/update_case/{id}", post(update_case))
        .route("/api/v2/delete_case/{id}", post(delete_case))
        .route("/api/v2/get_project/{id}", get(get_project))
        .route("/api/v2/get_projects", get(get_projects))
        .route("/api/v2/add_project", post(add_project))
        .route("/api/v2/delete_project/{id}", post(delete_project))
        .route("/api/v2/get_run/{id}", get(get_run))
        .route("/api/v2/get_runs/{project_id}", get(get_runs))
        .route("/api/v2/add_run/{project_id}", post(add_run))
        .route("/api/v2/update_run/{id}", post(update_run))
        .route("/api/v2/close_run/{id}", post(close_run))
        .route("/api/v2/get_section/{id}", get(get_section))
        .route("/api/v2/get_sections/{project_id}", get(get_sections))
        .route("/api/v2/add_section/{project_id}", post(add_section))
        .route("/api/v2/get_priorities", get(get_priorities))
        .route("/api/v2/get_user/{key}", get(get_user))
        .route("/api/v2/get_users", get(get_users))
        .layer(middleware::from_fn(require_auth))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// Every route demands a credential header, like the real service.
async fn require_auth(request: Request, next: Next) -> Result<Response, StatusCode> {
    if request.headers().contains_key(header::AUTHORIZATION) {
        Ok(next.run(request).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn seed_priorities() -> Vec<Priority> {
    vec![
        Priority { id: 1, name: "Low".into(), short_name: Some("P4".into()), priority: Some(1), is_default: false },
        Priority { id: 2, name: "Medium".into(), short_name: Some("P3".into()), priority: Some(2), is_default: true },
        Priority { id: 3, name: "High".into(), short_name: Some("P2".into()), priority: Some(3), is_default: false },
        Priority { id: 4, name: "Critical".into(), short_name: Some("P1".into()), priority: Some(4), is_default: false },
        Priority { id: 5, name: "Unranked".into(), short_name: None, priority: None, is_default: false },
    ]
}

fn seed_users() -> BTreeMap<u64, User> {
    let users = [
        User { id: 901, name: "Dana Winter".into(), email: "dana@testhub.example".into(), is_active: true },
        User { id: 902, name: "Priya Nair".into(), email: "priya@testhub.example".into(), is_active: false },
    ];
    users.into_iter().map(|u| (u.id, u)).collect()
}

/// Wrap one page of `all` in the bulk-response shape: items under `key`,
/// `_links.next` pointing at the following page or null on the last one.
fn bulk_page<T: Serialize>(key: &str, all: Vec<T>, base: &str, query: &PageQuery) -> Json<Value> {
    let limit = query.limit.unwrap_or(250);
    let offset = query.offset.unwrap_or(0);
    let total = all.len();
    let page: Vec<T> = all.into_iter().skip(offset).take(limit).collect();
    let next = if offset + limit < total {
        Value::from(format!("{base}?limit={limit}&offset={}", offset + limit))
    } else {
        Value::Null
    };
    let mut body = serde_json::Map::new();
    body.insert("offset".to_string(), offset.into());
    body.insert("limit".to_string(), limit.into());
    body.insert("size".to_string(), page.len().into());
    body.insert("_links".to_string(), json!({ "next": next, "prev": Value::Null }));
    body.insert(key.to_string(), serde_json::to_value(page).unwrap_or_default());
    Json(Value::Object(body))
}

// --- cases ---

async fn get_case(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Case>, StatusCode> {
    let hub = db.read().await;
    hub.cases.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_cases(
    State(db): State<Db>,
    Path(project_id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Json<Value> {
    let hub = db.read().await;
    let cases: Vec<Case> = hub
        .cases
        .values()
        .filter(|c| c.project_id == project_id)
        .cloned()
        .collect();
    bulk_page("cases", cases, &format!("/api/v2/get_cases/{project_id}"), &query)
}

async fn add_case(
    State(db): State<Db>,
    Path(section_id): Path<u64>,
    Json(input): Json<CreateCase>,
) -> Result<Json<Case>, StatusCode> {
    if input.title.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut hub = db.write().await;
    let project_id = hub
        .sections
        .get(&section_id)
        .map(|s| s.project_id)
        .ok_or(StatusCode::BAD_REQUEST)?;
    let case = Case {
        id: hub.allocate_id(),
        title: input.title,
        section_id,
        priority_id: input.priority_id,
        refs: input.refs,
        project_id,
    };
    hub.cases.insert(case.id, case.clone());
    Ok(Json(case))
}

async fn update_case(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateCase>,
) -> Result<Json<Case>, StatusCode> {
    let mut hub = db.write().await;
    let case = hub.cases.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        case.title = title;
    }
    if let Some(priority_id) = input.priority_id {
        case.priority_id = Some(priority_id);
    }
    if let Some(refs) = input.refs {
        case.refs = Some(refs);
    }
    Ok(Json(case.clone()))
}

async fn delete_case(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut hub = db.write().await;
    hub.cases.remove(&id).map(|_| StatusCode::OK).ok_or(StatusCode::NOT_FOUND)
}

// --- projects ---

async fn get_project(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Project>, StatusCode> {
    let hub = db.read().await;
    hub.projects.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_projects(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Value> {
    let hub = db.read().await;
    let projects: Vec<Project> = hub.projects.values().cloned().collect();
    bulk_page("projects", projects, "/api/v2/get_projects", &query)
}

async fn add_project(
    State(db): State<Db>,
    Json(input): Json<CreateProject>,
) -> Result<Json<Project>, StatusCode> {
    if input.name.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut hub = db.write().await;
    let project = Project {
        id: hub.allocate_id(),
        name: input.name,
        announcement: input.announcement,
        is_completed: false,
    };
    hub.projects.insert(project.id, project.clone());
    Ok(Json(project))
}

async fn delete_project(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut hub = db.write().await;
    hub.projects.remove(&id).map(|_| StatusCode::OK).ok_or(StatusCode::NOT_FOUND)
}

// --- runs ---

async fn get_run(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Run>, StatusCode> {
    let hub = db.read().await;
    hub.runs.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_runs(
    State(db): State<Db>,
    Path(project_id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Json<Value> {
    let hub = db.read().await;
    let runs: Vec<Run> = hub
        .runs
        .values()
        .filter(|r| r.project_id == project_id)
        .cloned()
        .collect();
    bulk_page("runs", runs, &format!("/api/v2/get_runs/{project_id}"), &query)
}

async fn add_run(
    State(db): State<Db>,
    Path(project_id): Path<u64>,
    Json(input): Json<CreateRun>,
) -> Result<Json<Run>, StatusCode> {
    if input.name.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut hub = db.write().await;
    if !hub.projects.contains_key(&project_id) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let run = Run {
        id: hub.allocate_id(),
        name: input.name,
        project_id,
        description: input.description,
        is_completed: false,
    };
    hub.runs.insert(run.id, run.clone());
    Ok(Json(run))
}

async fn update_run(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateRun>,
) -> Result<Json<Run>, StatusCode> {
    let mut hub = db.write().await;
    let run = hub.runs.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        run.name = name;
    }
    if let Some(description) = input.description {
        run.description = Some(description);
    }
    Ok(Json(run.clone()))
}

async fn close_run(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Run>, StatusCode> {
    let mut hub = db.write().await;
    let run = hub.runs.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    run.is_completed = true;
    Ok(Json(run.clone()))
}

// --- sections ---

async fn get_section(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Section>, StatusCode> {
    let hub = db.read().await;
    hub.sections.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_sections(
    State(db): State<Db>,
    Path(project_id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Json<Value> {
    let hub = db.read().await;
    let sections: Vec<Section> = hub
        .sections
        .values()
        .filter(|s| s.project_id == project_id)
        .cloned()
        .collect();
    bulk_page(
        "sections",
        sections,
        &format!("/api/v2/get_sections/{project_id}"),
        &query,
    )
}

async fn add_section(
    State(db): State<Db>,
    Path(project_id): Path<u64>,
    Json(input): Json<CreateSection>,
) -> Result<Json<Section>, StatusCode> {
    if input.name.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut hub = db.write().await;
    if !hub.projects.contains_key(&project_id) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let section = Section {
        id: hub.allocate_id(),
        name: input.name,
        parent_id: input.parent_id,
        project_id,
    };
    hub.sections.insert(section.id, section.clone());
    Ok(Json(section))
}

// --- priorities ---

async fn get_priorities(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Value> {
    let hub = db.read().await;
    bulk_page(
        "priorities",
        hub.priorities.clone(),
        "/api/v2/get_priorities",
        &query,
    )
}

// --- users ---

async fn get_user(
    State(db): State<Db>,
    Path(key): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let hub = db.read().await;
    // Numeric key looks up by id, anything else by email.
    let user = match key.parse::<u64>() {
        Ok(id) => hub.users.get(&id).cloned(),
        Err(_) => hub.users.values().find(|u| u.email == key).cloned(),
    };
    user.map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_users(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Value> {
    let hub = db.read().await;
    let users: Vec<User> = hub.users.values().cloned().collect();
    bulk_page("users", users, "/api/v2/get_users", &query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_query(limit: Option<usize>, offset: Option<usize>) -> PageQuery {
        PageQuery { limit, offset }
    }

    #[test]
    fn bulk_page_links_to_the_next_page() {
        let Json(body) = bulk_page(
            "cases",
            vec![1, 2, 3, 4, 5],
            "/api/v2/get_cases/1",
            &page_query(Some(2), None),
        );
        assert_eq!(body["size"], 2);
        assert_eq!(body["cases"], json!([1, 2]));
        assert_eq!(body["_links"]["next"], "/api/v2/get_cases/1?limit=2&offset=2");
    }

    #[test]
    fn bulk_page_last_page_has_null_next() {
        let Json(body) = bulk_page(
            "cases",
            vec![1, 2, 3, 4, 5],
            "/api/v2/get_cases/1",
            &page_query(Some(2), Some(4)),
        );
        assert_eq!(body["size"], 1);
        assert_eq!(body["cases"], json!([5]));
        assert!(body["_links"]["next"].is_null());
    }

    #[test]
    fn bulk_page_defaults_swallow_everything_in_one_page() {
        let Json(body) = bulk_page(
            "projects",
            vec![1, 2, 3],
            "/api/v2/get_projects",
            &page_query(None, None),
        );
        assert_eq!(body["size"], 3);
        assert!(body["_links"]["next"].is_null());
    }

    #[test]
    fn seeded_priorities_have_one_default_and_one_unranked() {
        let priorities = seed_priorities();
        assert_eq!(priorities.iter().filter(|p| p.is_default).count(), 1);
        assert_eq!(priorities.iter().filter(|p| p.priority.is_none()).count(), 1);
    }
}
