#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use capacity_planner::config::{Config, SyncConfig};
use capacity_planner::state::SharedState;
use capacity_planner::sync::rows::{SheetRow, SheetSnapshot};
use capacity_planner::sync::{Mirror, SyncError, Table};

pub fn test_config() -> Config {
    Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        log_level: "warn".to_string(),
        seed_demo: false,
        sync: SyncConfig {
            debounce: Duration::from_millis(50),
            ..SyncConfig::default()
        },
    }
}

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        self.send(self.client.get(self.url(path)), None).await
    }

    pub async fn get_as(&self, manager: Uuid, path: &str) -> (Value, StatusCode) {
        self.send(self.client.get(self.url(path)), Some(manager)).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        self.send(self.client.post(self.url(path)).json(body), None)
            .await
    }

    pub async fn post_as(&self, manager: Uuid, path: &str, body: &Value) -> (Value, StatusCode) {
        self.send(self.client.post(self.url(path)).json(body), Some(manager))
            .await
    }

    pub async fn put(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        self.send(self.client.put(self.url(path)).json(body), None)
            .await
    }

    pub async fn put_as(&self, manager: Uuid, path: &str, body: &Value) -> (Value, StatusCode) {
        self.send(self.client.put(self.url(path)).json(body), Some(manager))
            .await
    }

    pub async fn delete(&self, path: &str) -> (Value, StatusCode) {
        self.send(self.client.delete(self.url(path)), None).await
    }

    pub async fn delete_as(&self, manager: Uuid, path: &str) -> (Value, StatusCode) {
        self.send(self.client.delete(self.url(path)), Some(manager))
            .await
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        manager: Option<Uuid>,
    ) -> (Value, StatusCode) {
        let req = match manager {
            Some(id) => req.header("x-manager-id", id.to_string()),
            None => req,
        };
        let resp = req.send().await.expect("request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn create_manager(&self, name: &str) -> Value {
        let (body, status) = self
            .post(
                "/api/v1/managers",
                &json!({ "name": name, "email": format!("{}@example.com", name.to_lowercase()) }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create manager failed: {body}");
        body
    }

    pub async fn create_project(&self, name: &str) -> Value {
        let (body, status) = self
            .post(
                "/api/v1/projects",
                &json!({ "name": name, "status": "active" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create project failed: {body}");
        body
    }

    pub async fn create_resource(&self, name: &str, manager_id: Option<&str>) -> Value {
        let (body, status) = self
            .post(
                "/api/v1/resources",
                &json!({
                    "name": name,
                    "role": "Engineer",
                    "department": "Engineering",
                    "manager_id": manager_id,
                    "skills": ["Rust"],
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create resource failed: {body}");
        body
    }

    pub async fn link(&self, project_id: &str, resource_id: &str, percentage: f64) -> (Value, StatusCode) {
        self.post(
            "/api/v1/links",
            &json!({
                "project_id": project_id,
                "resource_id": resource_id,
                "allocation_percentage": percentage,
            }),
        )
        .await
    }

    pub async fn log_hours(
        &self,
        resource_id: &str,
        project_id: &str,
        date: &str,
        forecast: f64,
        actual: f64,
    ) -> Value {
        let (body, status) = self
            .post(
                "/api/v1/time-entries",
                &json!({
                    "resource_id": resource_id,
                    "project_id": project_id,
                    "date": date,
                    "forecast_hours": forecast,
                    "actual_hours": actual,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "log hours failed: {body}");
        body
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(), None).await
}

pub async fn spawn_app_with(config: Config, mirror: Option<Arc<dyn Mirror>>) -> TestApp {
    let state = capacity_planner::build_state(config, mirror);
    let app = capacity_planner::build_app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        addr,
        client: Client::new(),
        state,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MirrorCall {
    Connect,
    PushRecord(Table, String),
    RemoveRecord(Table, Uuid),
    PushAll,
    PullAll,
}

/// In-memory stand-in for the workbook. Records every call and serves
/// whatever snapshot the test puts in `sheets`.
#[derive(Default)]
pub struct MemoryMirror {
    pub calls: Mutex<Vec<MirrorCall>>,
    pub sheets: Mutex<SheetSnapshot>,
    pub failing: AtomicBool,
}

impl MemoryMirror {
    pub fn with_sheets(sheets: SheetSnapshot) -> Self {
        Self {
            sheets: Mutex::new(sheets),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<MirrorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_all_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == MirrorCall::PushAll)
            .count()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn record(&self, call: MirrorCall) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SyncError::Api {
                status: 401,
                message: "token expired".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Mirror for MemoryMirror {
    fn name(&self) -> &str {
        "memory"
    }

    async fn connect(&self) -> Result<(), SyncError> {
        self.record(MirrorCall::Connect)
    }

    async fn push_record(&self, table: Table, record: SheetRow) -> Result<(), SyncError> {
        let id = record
            .get("ID")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.record(MirrorCall::PushRecord(table, id))
    }

    async fn remove_record(&self, table: Table, id: Uuid) -> Result<(), SyncError> {
        self.record(MirrorCall::RemoveRecord(table, id))
    }

    async fn push_all(&self, sheets: SheetSnapshot) -> Result<(), SyncError> {
        self.record(MirrorCall::PushAll)?;
        *self.sheets.lock().unwrap() = sheets;
        Ok(())
    }

    async fn pull_all(&self) -> Result<SheetSnapshot, SyncError> {
        self.record(MirrorCall::PullAll)?;
        Ok(self.sheets.lock().unwrap().clone())
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("missing id").to_string()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
