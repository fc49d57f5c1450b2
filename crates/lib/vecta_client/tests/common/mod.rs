//! In-process fake of the Vecta backend for integration tests.
//!
//! Every request is recorded. Routing is done by hand in a single fallback
//! handler so tests can inspect and script the backend state directly.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use vecta_client::AppContext;
use vecta_client::config::{ClientConfig, OAuthSettings};
use vecta_client::storage::{KeyValueStore, MemoryStore};

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "secret1";
pub const USER_ID: &str = "user-1";
pub const GOOD_PROVIDER_TOKEN: &str = "provider-token";

/// Backend timestamps come without an offset.
const TIMESTAMP: &str = "2025-05-01T12:00:00.123456";

/// One request as seen by the backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Bytes,
    pub authorized: bool,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Debug, Default)]
pub struct BackendState {
    pub requests: Vec<Recorded>,
    /// `(user_id, email, password)`
    pub users: Vec<(String, String, String)>,
    pub projects: Vec<Value>,
    pub urls: Vec<Value>,
    /// Artificial latency per path.
    pub delays: HashMap<String, Duration>,
    /// Forced error status per `"METHOD path"`.
    pub failures: HashMap<String, StatusCode>,
    next_id: u64,
}

impl BackendState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn project(&self, id: &str) -> Option<&Value> {
        self.projects.iter().find(|p| p["project_id"] == id)
    }

    fn new_url(&mut self, project_id: &str, original_url: &str, status: &str) -> Value {
        let url_id = self.next_id("u");
        let url = json!({
            "url_id": url_id,
            "project_id": project_id,
            "original_url": original_url,
            "status": status,
            "failure_reason": null,
            "submitted_at": TIMESTAMP,
            "last_updated_at": TIMESTAMP,
        });
        self.urls.push(url.clone());
        url
    }

    /// The backend reports duplicates by reference only.
    fn existing_url(&self, project_id: &str, original_url: &str) -> Option<Value> {
        self.urls
            .iter()
            .find(|u| u["project_id"] == project_id && u["original_url"] == original_url)
            .map(|u| {
                json!({
                    "url_id": u["url_id"],
                    "project_id": u["project_id"],
                    "last_updated_at": u["last_updated_at"],
                })
            })
    }
}

type Shared = Arc<Mutex<BackendState>>;

/// Running fake backend bound to an ephemeral port.
pub struct FakeBackend {
    pub base_url: String,
    state: Shared,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let mut state = BackendState::default();
        state
            .users
            .push((USER_ID.into(), EMAIL.into(), PASSWORD.into()));
        let state = Arc::new(Mutex::new(state));

        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend");
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            state,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().expect("backend state")
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state().requests.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn add_project(&self, project_id: &str, name: &str) {
        self.state().projects.push(json!({
            "project_id": project_id,
            "user_id": USER_ID,
            "project_name": name,
            "created_at": TIMESTAMP,
        }));
    }

    /// Seed a URL and return its id.
    pub fn add_url(&self, project_id: &str, original_url: &str, status: &str) -> String {
        let url = self.state().new_url(project_id, original_url, status);
        url["url_id"].as_str().unwrap_or_default().to_string()
    }

    pub fn fail(&self, method: Method, path: &str, status: StatusCode) {
        self.state()
            .failures
            .insert(format!("{method} {path}"), status);
    }

    pub fn delay(&self, path: &str, latency: Duration) {
        self.state().delays.insert(path.to_string(), latency);
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.base_url.clone(),
            store_path: std::env::temp_dir().join("vecta-unused-store.json"),
            oauth: OAuthSettings {
                redirect_uri: "http://localhost:4200/auth/oauth-callback".into(),
                google_client_id: Some("google-client".into()),
                microsoft_client_id: Some("microsoft-client".into()),
            },
        }
    }

    pub fn context_with(&self, store: Arc<dyn KeyValueStore>) -> AppContext {
        AppContext::init(self.config(), store).expect("context")
    }

    /// Fresh, signed-out context backed by memory.
    pub fn context(&self) -> AppContext {
        self.context_with(Arc::new(MemoryStore::new()))
    }

    pub async fn signed_in(&self) -> AppContext {
        let ctx = self.context();
        assert!(ctx.session.login(EMAIL, PASSWORD).await, "login");
        self.state().requests.clear();
        ctx
    }
}

/// JWT carrying `sub` and `exp`, signed with a throwaway key.
pub fn issue_token(sub: &str, exp: i64) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &json!({ "sub": sub, "exp": exp }),
        &EncodingKey::from_secret(b"fake-backend"),
    )
    .expect("encode token")
}

pub fn token_valid_for(sub: &str, secs: i64) -> String {
    issue_token(sub, chrono::Utc::now().timestamp() + secs)
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api/v1/")
        .unwrap_or(uri.path())
        .to_string();
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "));

    let delay = {
        let mut st = state.lock().expect("backend state");
        st.requests.push(Recorded {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            body: body.clone(),
            authorized,
        });
        st.delays.get(&path).copied()
    };
    if let Some(latency) = delay {
        tokio::time::sleep(latency).await;
    }

    let (status, value) = {
        let mut st = state.lock().expect("backend state");
        if let Some(status) = st.failures.get(&format!("{method} {path}")).copied() {
            (status, json!({ "detail": "forced failure" }))
        } else {
            route(&mut st, &method, &path, uri.query(), &body, authorized)
        }
    };

    if status == StatusCode::NO_CONTENT {
        status.into_response()
    } else {
        (status, axum::Json(value)).into_response()
    }
}

fn form(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

fn not_found(what: &str) -> (StatusCode, Value) {
    (StatusCode::NOT_FOUND, json!({ "detail": format!("{what} not found") }))
}

fn route(
    st: &mut BackendState,
    method: &Method,
    path: &str,
    query: Option<&str>,
    body: &[u8],
    authorized: bool,
) -> (StatusCode, Value) {
    let segments: Vec<&str> = path.split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("POST", ["auth", "token"]) => {
            let form = form(body);
            let username = form.get("username").map(String::as_str).unwrap_or("");
            let password = form.get("password").map(String::as_str).unwrap_or("");
            match st
                .users
                .iter()
                .find(|(_, email, pw)| email == username && pw == password)
            {
                Some((id, _, _)) => (
                    StatusCode::OK,
                    json!({ "access_token": token_valid_for(id, 3600), "token_type": "bearer" }),
                ),
                None => (
                    StatusCode::UNAUTHORIZED,
                    json!({ "detail": "Incorrect email or password" }),
                ),
            }
        }
        ("POST", ["users"]) => {
            let req = body_json(body);
            let email = req["email"].as_str().unwrap_or("").to_string();
            let password = req["password"].as_str().unwrap_or("").to_string();
            if st.users.iter().any(|(_, e, _)| *e == email) {
                return (
                    StatusCode::CONFLICT,
                    json!({ "detail": "Email already registered" }),
                );
            }
            let id = st.next_id("user-new-");
            st.users.push((id.clone(), email, password));
            (
                StatusCode::CREATED,
                json!({ "user_id": id, "created_at": TIMESTAMP }),
            )
        }
        ("POST", ["auth", provider @ ("google" | "microsoft")]) => {
            if body_json(body)["token"] == GOOD_PROVIDER_TOKEN {
                let sub = format!("{provider}-user");
                (
                    StatusCode::OK,
                    json!({ "access_token": token_valid_for(&sub, 3600), "token_type": "bearer" }),
                )
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    json!({ "detail": "Invalid provider token" }),
                )
            }
        }
        _ if !authorized => (
            StatusCode::UNAUTHORIZED,
            json!({ "detail": "Not authenticated" }),
        ),
        ("GET", ["users", "me"]) => (
            StatusCode::OK,
            json!({ "user_id": USER_ID, "created_at": TIMESTAMP }),
        ),
        ("GET", ["projects"]) => (StatusCode::OK, Value::Array(st.projects.clone())),
        ("POST", ["projects"]) => {
            let id = st.next_id("p");
            let project = json!({
                "project_id": id,
                "user_id": USER_ID,
                "project_name": body_json(body)["project_name"],
                "created_at": TIMESTAMP,
            });
            st.projects.push(project.clone());
            (StatusCode::CREATED, project)
        }
        ("GET", ["projects", id]) => match st.project(id) {
            Some(p) => (StatusCode::OK, p.clone()),
            None => not_found("Project"),
        },
        ("PATCH", ["projects", id]) => {
            let name = body_json(body)["project_name"].clone();
            match st.projects.iter_mut().find(|p| p["project_id"] == *id) {
                Some(p) => {
                    p["project_name"] = name;
                    (StatusCode::OK, p.clone())
                }
                None => not_found("Project"),
            }
        }
        ("DELETE", ["projects", id]) => {
            if st.project(id).is_none() {
                return not_found("Project");
            }
            st.projects.retain(|p| p["project_id"] != *id);
            st.urls.retain(|u| u["project_id"] != *id);
            (StatusCode::NO_CONTENT, Value::Null)
        }
        (_, ["projects", id, ..]) if st.project(id).is_none() => not_found("Project"),
        ("GET", ["projects", id, "urls"]) => {
            let status = query
                .map(|q| form(q.as_bytes()))
                .and_then(|q| q.get("status").cloned());
            let urls: Vec<Value> = st
                .urls
                .iter()
                .filter(|u| u["project_id"] == *id)
                .filter(|u| status.as_deref().is_none_or(|s| u["status"] == s))
                .cloned()
                .collect();
            (StatusCode::OK, Value::Array(urls))
        }
        ("POST", ["projects", id, "urls"]) => {
            let original_url = body_json(body)["original_url"]
                .as_str()
                .unwrap_or("")
                .to_string();
            if !original_url.starts_with("http://") && !original_url.starts_with("https://") {
                return (
                    StatusCode::BAD_REQUEST,
                    json!({ "detail": "Invalid URL" }),
                );
            }
            if let Some(existing) = st.existing_url(id, &original_url) {
                return (
                    StatusCode::CONFLICT,
                    json!({
                        "detail": {
                            "message": "URL already exists in this project",
                            "existing_url": existing,
                        }
                    }),
                );
            }
            (StatusCode::CREATED, st.new_url(id, &original_url, "pending"))
        }
        ("POST", ["projects", id, "urls:batch"]) => {
            let requested: Vec<String> = body_json(body)["urls"]
                .as_array()
                .map(|a| {
                    a.iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            let mut submitted = Vec::new();
            let mut duplicates = Vec::new();
            for original_url in requested {
                match st.existing_url(id, &original_url) {
                    Some(existing) => duplicates.push(existing),
                    None => submitted.push(st.new_url(id, &original_url, "pending")),
                }
            }
            (
                StatusCode::CREATED,
                json!({ "submitted_urls": submitted, "duplicate_urls": duplicates }),
            )
        }
        ("POST", ["projects", id, "urls", action]) if action.ends_with(":reprocess") => {
            let url_id = action.trim_end_matches(":reprocess");
            match st
                .urls
                .iter_mut()
                .find(|u| u["project_id"] == *id && u["url_id"] == url_id)
            {
                Some(u) => {
                    u["status"] = json!("pending");
                    u["failure_reason"] = Value::Null;
                    (StatusCode::OK, u.clone())
                }
                None => not_found("URL"),
            }
        }
        ("GET", ["projects", id, "urls", url_id]) => match st
            .urls
            .iter()
            .find(|u| u["project_id"] == *id && u["url_id"] == *url_id)
        {
            Some(u) => (StatusCode::OK, u.clone()),
            None => not_found("URL"),
        },
        ("DELETE", ["projects", id, "urls", url_id]) => {
            let before = st.urls.len();
            st.urls
                .retain(|u| !(u["project_id"] == *id && u["url_id"] == *url_id));
            if st.urls.len() == before {
                not_found("URL")
            } else {
                (StatusCode::NO_CONTENT, Value::Null)
            }
        }
        _ => not_found("Route"),
    }
}
