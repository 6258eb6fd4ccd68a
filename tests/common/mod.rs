//! In-process mock of the UnibenEngVault API.
//!
//! Each test spawns its own instance on a free port and points the client
//! transport at it; state is inspectable so tests can assert on what the
//! server actually received.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@eng.uniben.edu";
pub const ADMIN_PASSWORD: &str = "Adm1nPass";
const SESSION_COOKIE: &str = "vault_session=sess-1";

#[derive(Default)]
pub struct MockState {
    pub departments: Mutex<Vec<Value>>,
    pub files: Mutex<Vec<Value>>,
    pub courses: Mutex<Vec<Value>>,
    /// Flip to make every authenticated call 401 (session expiry mid-use)
    pub expired: AtomicBool,
    /// Flip to make the logout endpoint fail server-side
    pub fail_logout: AtomicBool,
    /// Every request the server handled, by method+path
    pub requests: Mutex<Vec<String>>,
    pub upload_count: AtomicU64,
}

impl MockState {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn seed_departments(&self, count: usize) {
        let mut departments = self.departments.lock().unwrap();
        *departments = (0..count)
            .map(|i| {
                json!({
                    "id": uuid::Uuid::new_v4(),
                    "dept_name": format!("Department {} Engineering", i),
                    "dept_code": format!("D{:02}", i),
                    "course_count": 0,
                })
            })
            .collect();
    }

    pub fn seed_course(&self, code: &str) -> Value {
        let course = json!({
            "id": uuid::Uuid::new_v4(),
            "course_code": code,
            "semester": "first",
            "credit_load": 3,
            "level_id": uuid::Uuid::new_v4(),
            "title": format!("{} title", code),
            "outline": "outline",
            "is_active": true,
            "department_ids": [],
        });
        self.courses.lock().unwrap().push(course.clone());
        course
    }
}

pub struct MockVault {
    pub base_url: String,
    pub state: Arc<MockState>,
}

pub async fn spawn() -> MockVault {
    let port = portpicker::pick_unused_port().expect("failed to pick free port");
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .expect("failed to bind mock server");

    let state = Arc::new(MockState::default());
    let app = router(Arc::clone(&state));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });

    MockVault { base_url: format!("http://127.0.0.1:{}", port), state }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/v1/auth_session/login", post(login))
        .route("/api/v1/auth_session/logout", delete(logout))
        .route("/api/v1/users/me", get(me))
        .route("/api/v1/departments", post(create_department))
        // Param names are kept uniform per position so the overlapping
        // paged/by-id/nested patterns coexist in one router
        .route("/api/v1/departments/:seg1/:seg2", get(list_departments))
        .route("/api/v1/departments/:seg1", delete(delete_department))
        .route("/api/v1/courses/:seg1/:seg2", get(list_courses))
        .route("/api/v1/courses/:seg1/files", post(upload_file))
        .route("/api/v1/files/:seg1/:seg2/:seg3", get(list_files))
        .route("/api/v1/stats", get(stats))
        .with_state(state)
}

fn record(state: &MockState, line: String) {
    state.requests.lock().unwrap().push(line);
}

fn authed(state: &MockState, headers: &HeaderMap) -> bool {
    if state.expired.load(Ordering::SeqCst) {
        return false;
    }
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |cookies| cookies.contains(SESSION_COOKIE))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))).into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    record(&state, "POST login".to_string());

    let email = body.get("email").and_then(|v| v.as_str()).unwrap_or("");
    let password = body.get("password").and_then(|v| v.as_str()).unwrap_or("");

    if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
        state.expired.store(false, Ordering::SeqCst);
        (
            StatusCode::OK,
            [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
            Json(json!({ "user_id": uuid::Uuid::new_v4() })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "wrong email or password" })),
        )
            .into_response()
    }
}

async fn logout(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    record(&state, "DELETE logout".to_string());

    if state.fail_logout.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "session backend unavailable" })),
        )
            .into_response();
    }
    if !authed(&state, &headers) {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "no session" }))).into_response();
    }
    state.expired.store(true, Ordering::SeqCst);
    Json(json!({})).into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    record(&state, "GET me".to_string());

    if !authed(&state, &headers) {
        return unauthorized();
    }
    Json(json!({
        "id": uuid::Uuid::new_v4(),
        "email": ADMIN_EMAIL,
        "is_admin": true,
    }))
    .into_response()
}

async fn create_department(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST departments".to_string());

    if !authed(&state, &headers) {
        return unauthorized();
    }

    let code = body.get("dept_code").and_then(|v| v.as_str()).unwrap_or("");
    let mut departments = state.departments.lock().unwrap();
    if departments.iter().any(|d| d["dept_code"] == code) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "department code already exists" })),
        )
            .into_response();
    }

    let mut department = body.clone();
    department["id"] = json!(uuid::Uuid::new_v4());
    department["course_count"] = json!(0);
    departments.push(department.clone());
    (StatusCode::CREATED, Json(department)).into_response()
}

async fn list_departments(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path((page_size, page_num)): Path<(usize, usize)>,
) -> Response {
    record(&state, format!("GET departments/{}/{}", page_size, page_num));

    if !authed(&state, &headers) {
        return unauthorized();
    }

    let departments = state.departments.lock().unwrap();
    let start = page_size * page_num.saturating_sub(1);
    let items: Vec<Value> = departments.iter().skip(start).take(page_size).cloned().collect();
    Json(json!({ "items": items, "total": departments.len() })).into_response()
}

async fn delete_department(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    record(&state, format!("DELETE departments/{}", id));

    if !authed(&state, &headers) {
        return unauthorized();
    }

    let mut departments = state.departments.lock().unwrap();
    let before = departments.len();
    departments.retain(|d| d["id"] != id.as_str());
    if departments.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "department does not exist." })),
        )
            .into_response();
    }
    Json(json!({})).into_response()
}

async fn list_courses(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path((page_size, page_num)): Path<(usize, usize)>,
) -> Response {
    record(&state, format!("GET courses/{}/{}", page_size, page_num));

    if !authed(&state, &headers) {
        return unauthorized();
    }

    let courses = state.courses.lock().unwrap();
    let start = page_size * page_num.saturating_sub(1);
    let items: Vec<Value> = courses.iter().skip(start).take(page_size).cloned().collect();
    Json(json!({ "items": items, "total": courses.len() })).into_response()
}

async fn upload_file(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(course_id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    record(&state, format!("POST courses/{}/files", course_id));

    if !authed(&state, &headers) {
        return unauthorized();
    }

    let mut file_name = String::new();
    let mut metadata = json!({});
    while let Ok(Some(part)) = multipart.next_field().await {
        let name = part.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("file") => {
                file_name = part.file_name().unwrap_or("").to_string();
                let _ = part.bytes().await;
            }
            Some("metadata") => {
                let text = part.text().await.unwrap_or_default();
                metadata = serde_json::from_str(&text).unwrap_or(json!({}));
            }
            _ => {}
        }
    }

    // Scripted failure: a well-known name collides server-side
    if file_name == "dup.pdf" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "file already exists for this course" })),
        )
            .into_response();
    }

    state.upload_count.fetch_add(1, Ordering::SeqCst);
    let file = json!({
        "id": uuid::Uuid::new_v4(),
        "file_name": file_name,
        "file_type": metadata.get("file_type").cloned().unwrap_or(json!("note")),
        "status": "pending",
        "session": metadata.get("session").cloned().unwrap_or(Value::Null),
        "course_id": course_id,
    });
    state.files.lock().unwrap().push(file.clone());
    (StatusCode::CREATED, Json(file)).into_response()
}

async fn list_files(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path((status, page_size, page_num)): Path<(String, usize, usize)>,
) -> Response {
    record(&state, format!("GET files/{}/{}/{}", status, page_size, page_num));

    if !authed(&state, &headers) {
        return unauthorized();
    }

    let files = state.files.lock().unwrap();
    let matching: Vec<Value> = files.iter().filter(|f| f["status"] == status.as_str()).cloned().collect();
    let start = page_size * page_num.saturating_sub(1);
    let items: Vec<Value> = matching.iter().skip(start).take(page_size).cloned().collect();
    Json(json!({ "items": items, "total": matching.len() })).into_response()
}

async fn stats(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    record(&state, "GET stats".to_string());

    if !authed(&state, &headers) {
        return unauthorized();
    }
    Json(json!({
        "departments": state.departments.lock().unwrap().len(),
        "files": state.files.lock().unwrap().len(),
        "courses": state.courses.lock().unwrap().len(),
    }))
    .into_response()
}
