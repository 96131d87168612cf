#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use taskboard_client::config::ClientConfig;
use taskboard_client::session::{LocalStorage, MemoryStorage};
use taskboard_client::ClientApp;

pub const GOOD_PASSWORD: &str = "hunter2";

/// In-process stand-in for the remote resource API
#[derive(Default)]
pub struct RemoteState {
    pub tasks: Mutex<Vec<Value>>,
    pub projects: Mutex<Vec<Value>>,
    /// Authorization header of every request, in arrival order
    pub auth_headers: Mutex<Vec<Option<String>>>,
    issued_tokens: Mutex<HashSet<String>>,
}

impl RemoteState {
    pub fn seen_headers(&self) -> Vec<Option<String>> {
        self.auth_headers.lock().unwrap().clone()
    }

    pub fn task_titles(&self) -> Vec<(u64, String)> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .map(|t| (t["id"].as_u64().unwrap_or(0), t["title"].as_str().unwrap_or("").to_string()))
            .collect()
    }

    fn record(&self, headers: &HeaderMap) -> Option<String> {
        let header = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().unwrap().push(header.clone());
        header
    }

    /// Every resource endpoint requires a token this server issued
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let header = self.record(headers);
        let token = header.as_deref().and_then(|h| h.strip_prefix("Bearer "));
        match token {
            Some(t) if self.issued_tokens.lock().unwrap().contains(t) => Ok(()),
            _ => Err(error(StatusCode::UNAUTHORIZED, "invalid or missing token")),
        }
    }
}

pub struct MockRemote {
    pub base_url: String,
    pub state: Arc<RemoteState>,
}

impl MockRemote {
    /// Client config pointing at this server
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        config.api.base_url = self.base_url.clone();
        config.api.timeout_secs = 5;
        config
    }

    pub fn app(&self) -> ClientApp {
        self.app_with(Arc::new(MemoryStorage::new()))
    }

    pub fn app_with(&self, storage: Arc<dyn LocalStorage>) -> ClientApp {
        ClientApp::new(&self.config(), storage).expect("client app")
    }
}

pub async fn spawn_remote() -> Result<MockRemote> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let state = Arc::new(RemoteState::default());

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/:id", put(update_task).delete(delete_task))
        .route("/api/projects", get(list_projects))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(MockRemote {
        base_url: format!("http://127.0.0.1:{}/api", port),
        state,
    })
}

/// Base URL where nothing is listening
pub fn dead_remote_url() -> String {
    let port = portpicker::pick_unused_port().expect("free port");
    format!("http://127.0.0.1:{}/api", port)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

fn ok(status: StatusCode, data: Value) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

async fn login(State(state): State<Arc<RemoteState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record(&headers);

    let username = body["username"].as_str().unwrap_or_default();
    if body["password"].as_str() != Some(GOOD_PASSWORD) || username.is_empty() {
        return error(StatusCode::UNAUTHORIZED, "invalid credentials");
    }

    let token = format!("tok-{}", username);
    state.issued_tokens.lock().unwrap().insert(token.clone());
    ok(
        StatusCode::OK,
        json!({
            "token": token,
            "user": { "username": username, "email": format!("{}@example.com", username), "id": 42 }
        }),
    )
}

async fn list_tasks(State(state): State<Arc<RemoteState>>, headers: HeaderMap) -> Response {
    if let Err(r) = state.authorize(&headers) {
        return r;
    }
    let tasks = state.tasks.lock().unwrap().clone();
    ok(StatusCode::OK, Value::Array(tasks))
}

async fn create_task(State(state): State<Arc<RemoteState>>, headers: HeaderMap, Json(task): Json<Value>) -> Response {
    if let Err(r) = state.authorize(&headers) {
        return r;
    }
    state.tasks.lock().unwrap().push(task.clone());
    ok(StatusCode::CREATED, task)
}

async fn update_task(
    State(state): State<Arc<RemoteState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(task): Json<Value>,
) -> Response {
    if let Err(r) = state.authorize(&headers) {
        return r;
    }
    let mut tasks = state.tasks.lock().unwrap();
    match tasks.iter_mut().find(|t| t["id"].as_u64() == Some(id)) {
        Some(existing) => {
            *existing = task.clone();
            ok(StatusCode::OK, task)
        }
        None => error(StatusCode::NOT_FOUND, &format!("task {} not found", id)),
    }
}

async fn delete_task(State(state): State<Arc<RemoteState>>, Path(id): Path<u64>, headers: HeaderMap) -> Response {
    if let Err(r) = state.authorize(&headers) {
        return r;
    }
    state.tasks.lock().unwrap().retain(|t| t["id"].as_u64() != Some(id));
    StatusCode::NO_CONTENT.into_response()
}

async fn list_projects(State(state): State<Arc<RemoteState>>, headers: HeaderMap) -> Response {
    if let Err(r) = state.authorize(&headers) {
        return r;
    }
    let projects = state.projects.lock().unwrap().clone();
    ok(StatusCode::OK, Value::Array(projects))
}
