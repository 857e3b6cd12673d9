//! A loopback HTTP server that behaves like a hub's management interface.
//!
//! An `axum` router serves `/login`, `/logout`, `/getPreLoginData`,
//! `/snmpGet`, `/snmpSet` and `/walk` over a value map, with the credential
//! cookie checked on every authenticated endpoint. Tests can script error
//! statuses, expire the session, or make the server stop answering.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Router,
    extract::{Query, RawQuery, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use async_hub3::client::AUTH_USERNAME_OID;

use super::fixtures::{PASSWORD, PORT_FORWARD_TABLE, USERNAME, hub_values};

/// A request as seen by the fake hub.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: String,
    pub cookie: Option<String>,
}

#[derive(Debug)]
struct HubState {
    values: BTreeMap<String, String>,
    credential: Option<String>,
    logins: u32,
    statuses: VecDeque<u16>,
    walk_noise: bool,
    hang: bool,
    forget_sessions: bool,
    seen: Vec<SeenRequest>,
}

type SharedState = Arc<Mutex<HubState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, HubState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fake hub bound to a loopback port. The server stops when dropped.
pub struct FakeHub {
    addr: SocketAddr,
    state: SharedState,
    task: JoinHandle<()>,
}

impl FakeHub {
    /// Start a hub holding [`hub_values`].
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(HubState {
            values: hub_values(),
            credential: None,
            logins: 0,
            statuses: VecDeque::new(),
            walk_noise: false,
            hang: false,
            forget_sessions: false,
            seen: Vec::new(),
        }));

        let router = Router::new()
            .route("/login", get(login_handler))
            .route("/logout", get(logout_handler))
            .route("/getPreLoginData", get(pre_login_handler))
            .route("/snmpGet", get(snmp_get_handler))
            .route("/snmpSet", get(snmp_set_handler))
            .route("/walk", get(walk_handler))
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn_with_state(state.clone(), record_request))
            .with_state(state.clone());

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { addr, state, task }
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        lock(&self.state)
    }

    /// `host:port` to pass to the client builder.
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    /// Answer the next requests with these statuses and an empty body.
    pub fn push_statuses(&self, statuses: &[u16]) {
        self.lock().statuses.extend(statuses);
    }

    /// Invalidate the current credential, as the hub does after a timeout.
    pub fn expire_session(&self) {
        self.lock().credential = None;
    }

    /// Issue credentials at login that are never accepted afterwards.
    pub fn set_forget_sessions(&self, forget: bool) {
        self.lock().forget_sessions = forget;
    }

    /// Insert the hub's spurious formatting error line into walk bodies.
    pub fn set_walk_noise(&self, noise: bool) {
        self.lock().walk_noise = noise;
    }

    /// Accept requests but never answer.
    pub fn set_hang(&self, hang: bool) {
        self.lock().hang = hang;
    }

    pub fn value(&self, oid: &str) -> Option<String> {
        self.lock().values.get(oid).cloned()
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().credential.is_some()
    }

    pub fn logins(&self) -> u32 {
        self.lock().logins
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.lock().seen.clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.lock().seen.iter().map(|r| r.path.clone()).collect()
    }
}

impl Drop for FakeHub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn credential_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|c| c.trim().strip_prefix("credential="))
        .map(str::to_string)
}

fn is_authenticated(state: &HubState, headers: &HeaderMap) -> bool {
    let cookie = credential_cookie(headers);
    cookie.is_some() && cookie == state.credential
}

fn empty(status: StatusCode) -> (StatusCode, String) {
    (status, String::new())
}

/// Record every request, then hang or answer with a scripted status
/// before the route runs.
async fn record_request(
    State(state): State<SharedState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let seen = SeenRequest {
        path: request.uri().path().trim_start_matches('/').to_string(),
        query: request.uri().query().unwrap_or_default().to_string(),
        cookie: credential_cookie(&headers),
    };
    let scripted = {
        let mut state = lock(&state);
        state.seen.push(seen);
        if state.hang {
            None
        } else {
            Some(state.statuses.pop_front())
        }
    };
    match scripted {
        // Hold the connection open without answering
        None => std::future::pending().await,
        Some(Some(status)) => {
            let status = StatusCode::from_u16(status).unwrap();
            empty(status).into_response()
        }
        Some(None) => next.run(request).await,
    }
}

async fn login_handler(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let arg = params.get("arg").map(String::as_str).unwrap_or_default();
    let decoded = STANDARD.decode(arg).ok().and_then(|b| String::from_utf8(b).ok());
    if decoded.as_deref() != Some(format!("{}:{}", USERNAME, PASSWORD).as_str()) {
        // The hub answers bad credentials with an empty body
        return empty(StatusCode::OK);
    }
    let mut state = lock(&state);
    state.logins += 1;
    let envelope = format!(
        r#"{{"gwWan":"f","conType":"LAN","muti":"","modelname":"TG2492","family":"Hub3","session":{}}}"#,
        state.logins
    );
    let token = STANDARD.encode(envelope);
    state.credential = (!state.forget_sessions).then(|| token.clone());
    (StatusCode::OK, token)
}

async fn logout_handler(State(state): State<SharedState>, headers: HeaderMap) -> (StatusCode, String) {
    let mut state = lock(&state);
    if !is_authenticated(&state, &headers) {
        return empty(StatusCode::UNAUTHORIZED);
    }
    state.credential = None;
    empty(StatusCode::OK)
}

async fn pre_login_handler() -> (StatusCode, String) {
    (StatusCode::OK, r#"{"gwaddr":"192.168.0.1","gwaddr_v6":""}"#.to_string())
}

async fn snmp_get_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> (StatusCode, String) {
    let query = query.unwrap_or_default();
    let oids: Vec<&str> = query
        .strip_prefix("oids=")
        .and_then(|q| q.split('&').next())
        .unwrap_or_default()
        .split(';')
        .filter(|o| !o.is_empty())
        .collect();
    let state = lock(&state);
    if !is_authenticated(&state, &headers) && oids.iter().any(|o| *o != AUTH_USERNAME_OID) {
        return empty(StatusCode::UNAUTHORIZED);
    }
    let found: BTreeMap<&str, &str> = oids
        .iter()
        .filter_map(|o| state.values.get(*o).map(|v| (*o, v.as_str())))
        .collect();
    (StatusCode::OK, serde_json::to_string(&found).unwrap())
}

async fn snmp_set_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> (StatusCode, String) {
    let mut state = lock(&state);
    if !is_authenticated(&state, &headers) {
        return empty(StatusCode::UNAUTHORIZED);
    }
    let query = query.unwrap_or_default();
    let Some((oid, value)) = query
        .strip_prefix("oid=")
        .and_then(|q| q.rsplit_once(";&"))
        .and_then(|(expr, _)| expr.rsplit_once(';'))
        .and_then(|(assignment, _datatype)| assignment.split_once('='))
    else {
        return (StatusCode::OK, "{}".to_string());
    };
    let value = value.replace("%24", "$");
    if state.values.get(oid) == Some(&value) {
        return empty(StatusCode::NOT_MODIFIED);
    }
    // Row status 6 deletes the whole port forwarding row
    let destroyed = oid
        .strip_prefix(PORT_FORWARD_TABLE)
        .and_then(|rest| rest.strip_prefix(".11."))
        .filter(|_| value == "6");
    if let Some(index) = destroyed {
        let suffix = format!(".{}", index);
        let table = format!("{}.", PORT_FORWARD_TABLE);
        state
            .values
            .retain(|k, _| !(k.starts_with(&table) && k.ends_with(&suffix)));
    } else {
        state.values.insert(oid.to_string(), value.clone());
    }
    let mut echo = serde_json::Map::new();
    echo.insert(oid.to_string(), value.into());
    (StatusCode::OK, serde_json::Value::Object(echo).to_string())
}

async fn walk_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> (StatusCode, String) {
    let state = lock(&state);
    if !is_authenticated(&state, &headers) {
        return empty(StatusCode::UNAUTHORIZED);
    }
    let prefix = query
        .as_deref()
        .and_then(|q| q.strip_prefix("oids="))
        .and_then(|q| q.split_once(';'))
        .map(|(p, _)| format!("{}.", p))
        .unwrap_or_default();
    let mut lines: Vec<String> = state
        .values
        .iter()
        .filter(|(oid, _)| oid.starts_with(&prefix))
        .map(|(oid, value)| format!("{}: {},", serde_json::json!(oid), serde_json::json!(value)))
        .collect();
    if state.walk_noise && !lines.is_empty() {
        lines.insert(lines.len() / 2, "Error in OID formatting!".to_string());
    }
    lines.push(r#""1": "Finish""#.to_string());
    (StatusCode::OK, format!("{{\n{}\n}}", lines.join("\n")))
}
