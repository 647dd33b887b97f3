//! Authenticated client for the incident API.
//!
//! Every call goes through [`ApiClient::send`], which attaches the stored
//! bearer token, turns non-success responses into an [`ApiError`] whose
//! `Display` is the message users see, and drops the stored token when the
//! API answers 401 or 403.

use crate::filter::IncidentFilter;
use crate::model::{
    Evidence, Incident, IncidentAction, IncidentDetail, LoginRequest, LoginResponse, RcaReport,
};
use crate::token::TokenStore;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8088/api";

const REQUEST_FAILED: &str = "API request failed";
const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Unauthorized { status: u16, message: String },
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_http(default_http(), base_url, tokens)
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            tokens,
        }
    }

    /// Same HTTP pool and base URL, different credential slot.
    pub fn with_tokens(&self, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn logout(&self) {
        self.tokens.clear();
    }

    /// Sends `method base+path` with the stored bearer token and decodes the
    /// JSON response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, body).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.tokens.get() {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        tracing::debug!(%method, path, "incident api request");
        let response = req.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if is_auth_failure(status) {
            tracing::warn!(status = status.as_u16(), path, "unauthorized access, clearing stored token");
            self.tokens.clear();
        }
        Err(error_from_response(response, REQUEST_FAILED).await)
    }

    pub async fn list_incidents(&self, filter: &IncidentFilter) -> Result<Vec<Incident>, ApiError> {
        self.request(Method::GET, &filter.incidents_path(), None).await
    }

    pub async fn get_incident(&self, id: &str) -> Result<Incident, ApiError> {
        self.request(Method::GET, &incident_path(id, ""), None).await
    }

    pub async fn list_evidence(&self, id: &str) -> Result<Vec<Evidence>, ApiError> {
        self.request(Method::GET, &incident_path(id, "/evidence"), None)
            .await
    }

    /// The API answers 404 when no report has been generated yet.
    pub async fn get_rca(&self, id: &str) -> Result<Option<RcaReport>, ApiError> {
        match self
            .request::<Option<RcaReport>>(Method::GET, &incident_path(id, "/rca"), None)
            .await
        {
            Ok(report) => Ok(report),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND.as_u16()) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn acknowledge(&self, id: &str) -> Result<Incident, ApiError> {
        self.request(Method::POST, &incident_path(id, "/ack"), None)
            .await
    }

    pub async fn resolve(&self, id: &str) -> Result<Incident, ApiError> {
        self.request(Method::POST, &incident_path(id, "/resolve"), None)
            .await
    }

    /// Loads the incident, then its evidence, then its RCA report. The first
    /// failure aborts the whole load.
    pub async fn load_incident_detail(&self, id: &str) -> Result<IncidentDetail, ApiError> {
        let incident = self.get_incident(id).await?;
        let evidence = self.list_evidence(id).await?;
        let rca = self.get_rca(id).await?;
        Ok(IncidentDetail {
            incident,
            evidence,
            rca,
        })
    }

    /// Runs the mutation, then reloads the whole detail so the page shows
    /// what the API now holds.
    pub async fn apply_action(
        &self,
        id: &str,
        action: IncidentAction,
    ) -> Result<IncidentDetail, ApiError> {
        match action {
            IncidentAction::Acknowledge => self.acknowledge(id).await?,
            IncidentAction::Resolve => self.resolve(id).await?,
        };
        self.load_incident_detail(id).await
    }

    /// Exchanges credentials for a token and keeps it in the token store.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, LOGIN_FAILED).await);
        }

        let data: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.tokens.set(&data.jwt);
        Ok(data)
    }
}

fn default_http() -> reqwest::Client {
    #[cfg(not(target_arch = "wasm32"))]
    {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    }
    #[cfg(target_arch = "wasm32")]
    {
        reqwest::Client::new()
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn incident_path(id: &str, suffix: &str) -> String {
    let id: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("/incidents/{id}{suffix}")
}

async fn error_from_response(response: reqwest::Response, fallback: &str) -> ApiError {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or_default();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(reason, &body, fallback);

    if is_auth_failure(status) {
        ApiError::Unauthorized {
            status: status.as_u16(),
            message,
        }
    } else {
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// A JSON body speaks through its `message` field; anything else falls back
/// to the reason phrase.
fn error_message(reason: &str, body: &str, fallback: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(v) => v
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string(),
        Err(_) if !reason.is_empty() => reason.to_string(),
        Err(_) => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IncidentStatus, IncidentType};
    use crate::token::MemoryTokenStore;
    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Clone, Copy, Default)]
    enum RcaMode {
        #[default]
        Missing,
        Report,
        Broken,
    }

    #[derive(Clone, Default)]
    struct Mock {
        status: Arc<Mutex<String>>,
        rca: Arc<Mutex<RcaMode>>,
        seen_auth: Arc<Mutex<Vec<Option<String>>>>,
        seen_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Mock {
        fn record(&self, headers: &HeaderMap, call: &str) {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string);
            self.seen_auth.lock().expect("lock").push(auth);
            self.calls.lock().expect("lock").push(call.to_string());
        }
    }

    const INCIDENT_ID: &str = "5b1f3c2e-0000-4000-8000-000000000001";

    fn incident_json(status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": INCIDENT_ID,
            "endpointId": "GET /orders",
            "type": "ERROR_SPIKE",
            "status": status,
            "severity": "CRITICAL",
            "detectedAt": "2024-05-01T10:00:05"
        })
    }

    async fn list(
        State(mock): State<Mock>,
        headers: HeaderMap,
        Query(q): Query<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        mock.record(&headers, "list");
        mock.seen_queries.lock().expect("lock").push(q);
        let status = mock.status.lock().expect("lock").clone();
        Json(serde_json::json!([incident_json(&status)]))
    }

    async fn one(
        State(mock): State<Mock>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> axum::response::Response {
        mock.record(&headers, "incident");
        if id != INCIDENT_ID {
            return (
                AxumStatus::NOT_FOUND,
                Json(serde_json::json!({"message": "Incident not found"})),
            )
                .into_response();
        }
        let status = mock.status.lock().expect("lock").clone();
        Json(incident_json(&status)).into_response()
    }

    async fn evidence(State(mock): State<Mock>, headers: HeaderMap) -> Json<serde_json::Value> {
        mock.record(&headers, "evidence");
        Json(serde_json::json!([{
            "id": "ev-1",
            "incidentId": INCIDENT_ID,
            "evidenceType": "METRICS",
            "data": {"currentMetrics": {"errorRate": 0.4}, "baselineMetrics": {"errorRate": 0.01}},
            "createdAt": "2024-05-01T10:00:05"
        }]))
    }

    async fn rca(State(mock): State<Mock>, headers: HeaderMap) -> axum::response::Response {
        mock.record(&headers, "rca");
        let mode = *mock.rca.lock().expect("lock");
        match mode {
            RcaMode::Missing => AxumStatus::NOT_FOUND.into_response(),
            RcaMode::Report => Json(serde_json::json!({
                "id": "rca-1",
                "incidentId": INCIDENT_ID,
                "status": "COMPLETED",
                "rootCauseSummary": "connection pool exhausted after deploy",
                "likelyTrigger": "orders-service 2.3.1",
                "confidence": 0.87,
                "affectedEndpoints": ["GET /orders"],
                "recommendedFixes": ["roll back orders-service"]
            }))
            .into_response(),
            RcaMode::Broken => (
                AxumStatus::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "RCA store unavailable"})),
            )
                .into_response(),
        }
    }

    async fn ack(State(mock): State<Mock>, headers: HeaderMap) -> axum::response::Response {
        mock.record(&headers, "ack");
        let mut status = mock.status.lock().expect("lock");
        if *status != "OPEN" {
            return (AxumStatus::CONFLICT, Json(incident_json(&status))).into_response();
        }
        *status = "ACKNOWLEDGED".into();
        Json(incident_json(&status)).into_response()
    }

    async fn resolve(State(mock): State<Mock>, headers: HeaderMap) -> Json<serde_json::Value> {
        mock.record(&headers, "resolve");
        let mut status = mock.status.lock().expect("lock");
        *status = "RESOLVED".into();
        Json(incident_json(&status))
    }

    async fn login(Json(body): Json<serde_json::Value>) -> axum::response::Response {
        if body["username"] == "oncall" && body["password"] == "hunter2" {
            Json(serde_json::json!({"jwt": "issued-token"})).into_response()
        } else {
            (AxumStatus::UNAUTHORIZED, Json(serde_json::json!({}))).into_response()
        }
    }

    async fn spawn_mock() -> (String, Mock) {
        let mock = Mock::default();
        *mock.status.lock().expect("lock") = "OPEN".into();

        let app = Router::new()
            .route("/api/incidents", get(list))
            .route("/api/incidents/:id", get(one))
            .route("/api/incidents/:id/evidence", get(evidence))
            .route("/api/incidents/:id/rca", get(rca))
            .route("/api/incidents/:id/ack", post(ack))
            .route("/api/incidents/:id/resolve", post(resolve))
            .route("/api/auth/login", post(login))
            .route(
                "/api/denied",
                get(|| async {
                    (
                        AxumStatus::FORBIDDEN,
                        Json(serde_json::json!({"message": "token expired"})),
                    )
                }),
            )
            .route(
                "/api/broken",
                get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "stack trace here") }),
            )
            .route(
                "/api/vague",
                get(|| async { (AxumStatus::BAD_REQUEST, Json(serde_json::json!({"error": "x"}))) }),
            )
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}/api"), mock)
    }

    fn client(base: &str, store: &MemoryTokenStore) -> ApiClient {
        ApiClient::new(base, Arc::new(store.clone()))
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(
            error_message("Bad Request", r#"{"message":"bad id"}"#, REQUEST_FAILED),
            "bad id"
        );
        assert_eq!(
            error_message("Bad Request", r#"{"error":"x"}"#, REQUEST_FAILED),
            REQUEST_FAILED
        );
        assert_eq!(error_message("Bad Gateway", "<html>", REQUEST_FAILED), "Bad Gateway");
        assert_eq!(error_message("", "", LOGIN_FAILED), LOGIN_FAILED);
    }

    #[test]
    fn incident_path_escapes_separators() {
        assert_eq!(incident_path("abc", "/rca"), "/incidents/abc/rca");
        assert_eq!(incident_path("a/b", ""), "/incidents/a%2Fb");
    }

    #[tokio::test]
    async fn attaches_bearer_token_and_filters() {
        let (base, mock) = spawn_mock().await;
        let store = MemoryTokenStore::with_token("tok-1");
        let api = client(&base, &store);

        let filter = IncidentFilter {
            status: Some(IncidentStatus::Open),
            kind: Some(IncidentType::ErrorSpike),
        };
        let incidents = api.list_incidents(&filter).await.expect("list");
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].kind, IncidentType::ErrorSpike);

        let auth = mock.seen_auth.lock().expect("lock").clone();
        assert_eq!(auth, vec![Some("Bearer tok-1".to_string())]);
        let queries = mock.seen_queries.lock().expect("lock").clone();
        assert_eq!(queries[0].get("status").map(String::as_str), Some("OPEN"));
        assert_eq!(queries[0].get("type").map(String::as_str), Some("ERROR_SPIKE"));
    }

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let (base, mock) = spawn_mock().await;
        let api = client(&base, &MemoryTokenStore::default());
        api.list_incidents(&IncidentFilter::default())
            .await
            .expect("list");
        assert_eq!(mock.seen_auth.lock().expect("lock").clone(), vec![None]);
    }

    #[tokio::test]
    async fn forbidden_clears_token_and_surfaces_message() {
        let (base, _mock) = spawn_mock().await;
        let store = MemoryTokenStore::with_token("stale");
        let api = client(&base, &store);

        let err = api
            .request::<serde_json::Value>(Method::GET, "/denied", None)
            .await
            .expect_err("denied");
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "token expired");
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn non_json_error_uses_reason_phrase_and_keeps_token() {
        let (base, _mock) = spawn_mock().await;
        let store = MemoryTokenStore::with_token("keep");
        let api = client(&base, &store);

        let err = api
            .request::<serde_json::Value>(Method::GET, "/broken", None)
            .await
            .expect_err("broken");
        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(store.get().as_deref(), Some("keep"));

        let err = api
            .request::<serde_json::Value>(Method::GET, "/vague", None)
            .await
            .expect_err("vague");
        assert_eq!(err.to_string(), "API request failed");
    }

    #[tokio::test]
    async fn missing_incident_reports_api_message() {
        let (base, _mock) = spawn_mock().await;
        let api = client(&base, &MemoryTokenStore::with_token("t"));
        let err = api.get_incident("nope").await.expect_err("missing");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Incident not found");
    }

    #[tokio::test]
    async fn detail_loads_in_order_and_missing_rca_is_none() {
        let (base, mock) = spawn_mock().await;
        let api = client(&base, &MemoryTokenStore::with_token("t"));

        let detail = api.load_incident_detail(INCIDENT_ID).await.expect("detail");
        assert_eq!(detail.incident.id, INCIDENT_ID);
        assert_eq!(detail.evidence.len(), 1);
        assert!(detail.rca.is_none());

        let calls = mock.calls.lock().expect("lock").clone();
        assert_eq!(calls, vec!["incident", "evidence", "rca"]);
    }

    #[tokio::test]
    async fn detail_carries_an_existing_rca_report() {
        let (base, mock) = spawn_mock().await;
        *mock.rca.lock().expect("lock") = RcaMode::Report;
        let api = client(&base, &MemoryTokenStore::with_token("t"));

        let report = api.get_rca(INCIDENT_ID).await.expect("rca").expect("report");
        assert_eq!(report.confidence, Some(0.87));
        assert_eq!(report.recommended_fixes, vec!["roll back orders-service".to_string()]);

        let detail = api.load_incident_detail(INCIDENT_ID).await.expect("detail");
        let rca = detail.rca.expect("rca in detail");
        assert_eq!(
            rca.root_cause_summary.as_deref(),
            Some("connection pool exhausted after deploy")
        );
        assert_eq!(rca.affected_endpoints, vec!["GET /orders".to_string()]);
    }

    #[tokio::test]
    async fn rca_server_error_fails_the_whole_detail() {
        let (base, mock) = spawn_mock().await;
        *mock.rca.lock().expect("lock") = RcaMode::Broken;
        let store = MemoryTokenStore::with_token("t");
        let api = client(&base, &store);

        let err = api.get_rca(INCIDENT_ID).await.expect_err("rca");
        assert_eq!(err.status(), Some(500));

        let err = api.load_incident_detail(INCIDENT_ID).await.expect_err("detail");
        assert_eq!(err.to_string(), "RCA store unavailable");
        assert_eq!(store.get().as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn detail_load_stops_at_first_failure() {
        let (base, mock) = spawn_mock().await;
        let api = client(&base, &MemoryTokenStore::with_token("t"));

        let err = api.load_incident_detail("nope").await.expect_err("fail");
        assert_eq!(err.to_string(), "Incident not found");
        assert_eq!(mock.calls.lock().expect("lock").clone(), vec!["incident"]);
    }

    #[tokio::test]
    async fn acknowledge_then_resolve() {
        let (base, _mock) = spawn_mock().await;
        let api = client(&base, &MemoryTokenStore::with_token("t"));

        let acked = api.acknowledge(INCIDENT_ID).await.expect("ack");
        assert_eq!(acked.status, IncidentStatus::Acknowledged);

        let err = api.acknowledge(INCIDENT_ID).await.expect_err("second ack");
        assert_eq!(err.status(), Some(409));

        let resolved = api.resolve(INCIDENT_ID).await.expect("resolve");
        assert_eq!(resolved.status, IncidentStatus::Resolved);
    }

    #[tokio::test]
    async fn action_reloads_detail_after_success() {
        let (base, mock) = spawn_mock().await;
        let api = client(&base, &MemoryTokenStore::with_token("t"));

        let detail = api
            .apply_action(INCIDENT_ID, IncidentAction::Acknowledge)
            .await
            .expect("ack");
        assert_eq!(detail.incident.status, IncidentStatus::Acknowledged);
        assert_eq!(
            mock.calls.lock().expect("lock").clone(),
            vec!["ack", "incident", "evidence", "rca"]
        );
    }

    #[tokio::test]
    async fn failed_action_skips_reload() {
        let (base, mock) = spawn_mock().await;
        let api = client(&base, &MemoryTokenStore::with_token("t"));
        *mock.status.lock().expect("lock") = "RESOLVED".into();

        let err = api
            .apply_action(INCIDENT_ID, IncidentAction::Acknowledge)
            .await
            .expect_err("conflict");
        assert_eq!(err.status(), Some(409));
        assert_eq!(mock.calls.lock().expect("lock").clone(), vec!["ack"]);
    }

    #[tokio::test]
    async fn login_stores_token_and_logout_clears_it() {
        let (base, _mock) = spawn_mock().await;
        let store = MemoryTokenStore::default();
        let api = client(&base, &store);

        let out = api.login("oncall", "hunter2").await.expect("login");
        assert_eq!(out.jwt, "issued-token");
        assert_eq!(api.token().as_deref(), Some("issued-token"));

        api.logout();
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn failed_login_falls_back_to_login_failed() {
        let (base, _mock) = spawn_mock().await;
        let store = MemoryTokenStore::default();
        let api = client(&base, &store);

        let err = api.login("oncall", "wrong").await.expect_err("login");
        assert_eq!(err.to_string(), "Login failed");
        assert_eq!(store.get(), None);
    }
}
