//! Session management: login, logout and the credential token.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::instrument;
use zeroize::Zeroizing;

use crate::error::{Error, ProtocolErrorKind, Result};
use crate::transport::{Request, Transport};

use super::Client;

/// OID holding the name of the admin user, readable without logging in.
pub const AUTH_USERNAME_OID: &str = "1.3.6.1.4.1.4115.1.20.1.1.5.16.1.2.1";

/// Password the hub ships with.
pub const DEFAULT_PASSWORD: &str = "admin";

/// Credentials and session state for one client.
#[derive(Default)]
pub(crate) struct Session {
    credential: Option<String>,
    username: Option<String>,
    password: Option<Zeroizing<String>>,
    model_name: Option<String>,
    family: Option<String>,
}

impl Session {
    pub(crate) fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub(crate) fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Forget the credential and the stored username/password.
    pub(crate) fn take_credential(&mut self) -> Option<String> {
        self.username = None;
        self.password = None;
        self.credential.take()
    }
}

/// Decoded login response.
///
/// `gwWan` is `t` when the client connects from the WAN side, `conType` the
/// kind of connection, and `muti` names the side of another session that is
/// already logged in, if any.
#[derive(Debug, Default)]
struct LoginEnvelope {
    gw_wan: Option<String>,
    con_type: Option<String>,
    muti: Option<String>,
    modelname: Option<String>,
    family: Option<String>,
}

impl LoginEnvelope {
    /// Parse the decoded JSON object. Non-string scalars are kept as text.
    fn from_json(json: &[u8]) -> Option<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(json).ok()?;
        let field = |key: &str| match map.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        };
        Some(Self {
            gw_wan: field("gwWan"),
            con_type: field("conType"),
            muti: field("muti"),
            modelname: field("modelname"),
            family: field("family"),
        })
    }

    /// Describe another session that is already logged in, if any.
    fn concurrent_session(&self) -> Option<&'static str> {
        let muti = self.muti.as_deref()?;
        match (self.gw_wan.as_deref(), self.con_type.as_deref(), muti) {
            (Some("f"), Some("LAN"), "GW_WAN") => Some("remote user has already logged in"),
            (Some("f"), Some("LAN"), "LAN") => Some("other local user has already logged in"),
            (Some("t"), _, "LAN") => Some("local user has already logged in"),
            (Some("t"), _, "GW_WAN") => Some("other remote user has already logged in"),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct PreLoginData {
    gwaddr: String,
}

impl<T: Transport> Client<T> {
    /// Whether the client holds a credential token.
    pub fn is_logged_in(&self) -> bool {
        self.session.credential.is_some()
    }

    /// User name of the current session.
    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    /// Model name reported by the hub at login.
    pub fn model_name(&self) -> Option<&str> {
        self.session.model_name.as_deref()
    }

    /// Hardware family reported by the hub at login.
    pub fn family(&self) -> Option<&str> {
        self.session.family.as_deref()
    }

    /// Log in.
    ///
    /// Without a `username`, the admin user name is read from the hub first
    /// (this works without a session). A warning is logged if the hub reports
    /// another session; login proceeds regardless, but later requests may be
    /// answered with HTTP 401.
    #[instrument(skip(self, password), err, fields(hub.url = %self.transport.base_url()))]
    pub async fn login(&mut self, username: Option<&str>, password: &str) -> Result<()> {
        let start = Instant::now();
        let username = match username {
            Some(name) => name.to_string(),
            None => {
                let name = self.snmp_get(AUTH_USERNAME_OID).await?;
                tracing::debug!(target: "async_hub3::session", { hub.username = %name }, "using default admin user name");
                name
            }
        };
        let mut backoff = self.config.backoff_unit;
        let result = self
            .login_with(username, Zeroizing::new(password.to_string()), &mut backoff)
            .await;
        self.stats.record("login", start.elapsed());
        result
    }

    /// Log in again with the stored credentials after HTTP 401.
    pub(crate) async fn relogin(&mut self) -> Result<()> {
        let (Some(username), Some(password)) =
            (self.session.username.clone(), self.session.password.clone())
        else {
            return Err(Error::LoginFailed {
                status: 401,
                reason: "no stored credentials".into(),
            });
        };
        let start = Instant::now();
        let mut backoff = self.config.backoff_unit;
        let result = self.login_with(username, password, &mut backoff).await;
        self.stats.record("login", start.elapsed());
        result
    }

    async fn login_with(
        &mut self,
        username: String,
        password: Zeroizing<String>,
        backoff: &mut Duration,
    ) -> Result<()> {
        let arg = Zeroizing::new(STANDARD.encode(format!("{}:{}", username, password.as_str())));
        let [n, ms] = self.nonce.params();
        let request = Request::new("login")
            .param(n.0, n.1)
            .param(ms.0, ms.1)
            .param("arg", arg.as_str());

        let mut budget = self.session_budget();
        let response = self.dispatch(&request, &mut budget, backoff).await?;

        if !response.is_success() {
            if response.status == 401 {
                return Err(Error::LoginFailed {
                    status: 401,
                    reason: "credentials rejected".into(),
                });
            }
            return Err(Error::Transport {
                path: "login".into(),
                status: response.status,
                headers: response.headers,
            });
        }

        let token = response.text().trim().to_string();
        if token.is_empty() {
            return Err(Error::LoginFailed {
                status: response.status,
                reason: "empty response; most likely bad username/password".into(),
            });
        }

        let envelope: LoginEnvelope = STANDARD
            .decode(token.as_bytes())
            .ok()
            .and_then(|json| LoginEnvelope::from_json(&json))
            .ok_or_else(|| Error::LoginFailed {
                status: response.status,
                reason: format!("cannot decode login response: {}", token).into(),
            })?;

        if let Some(who) = envelope.concurrent_session() {
            tracing::warn!(target: "async_hub3::session", { hub.username = %username }, "{}: some requests may fail with HTTP 401", who);
        }

        tracing::debug!(target: "async_hub3::session", { hub.username = %username, hub.model = ?envelope.modelname, hub.family = ?envelope.family }, "logged in");

        self.session.credential = Some(token);
        self.session.username = Some(username);
        self.session.password = Some(password);
        self.session.model_name = envelope.modelname;
        self.session.family = envelope.family;
        Ok(())
    }

    /// Log out. Does nothing when not logged in.
    ///
    /// The session is forgotten even if the hub rejects the request.
    #[instrument(skip(self), err, fields(hub.url = %self.transport.base_url()))]
    pub async fn logout(&mut self) -> Result<()> {
        if !self.is_logged_in() {
            return Ok(());
        }
        let start = Instant::now();
        let request = Request::new("logout").raw_query(self.nonce.query());
        let budget = self.session_budget();
        let result = self.authenticated_get(request, budget).await.map(|_| ());

        self.session.take_credential();
        self.stats.record("logout", start.elapsed());
        tracing::debug!(target: "async_hub3::session", { ok = result.is_ok() }, "logged out");
        result
    }

    /// The hub's LAN address as reported by `/getPreLoginData`.
    ///
    /// This works without logging in.
    #[instrument(skip(self), err, fields(hub.url = %self.transport.base_url()))]
    pub async fn lan_ip_address(&mut self) -> Result<String> {
        let start = Instant::now();
        let request = Request::new("getPreLoginData");
        let budget = self.default_budget();
        let result = self
            .authenticated_get(request, budget)
            .await
            .and_then(|response| {
                serde_json::from_slice::<PreLoginData>(&response.body)
                    .map(|data| data.gwaddr)
                    .map_err(|e| {
                        Error::protocol(
                            "getPreLoginData",
                            ProtocolErrorKind::InvalidJson(e.to_string().into()),
                        )
                    })
            });
        self.stats.record("lan_ip_address", start.elapsed());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::mock_client;
    use crate::transport::Response;

    fn envelope(json: &str) -> LoginEnvelope {
        LoginEnvelope::from_json(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_concurrent_session_detection() {
        let e = envelope(r#"{"gwWan":"f","conType":"LAN","muti":"GW_WAN"}"#);
        assert_eq!(e.concurrent_session(), Some("remote user has already logged in"));

        let e = envelope(r#"{"gwWan":"f","conType":"LAN","muti":"LAN"}"#);
        assert_eq!(e.concurrent_session(), Some("other local user has already logged in"));

        let e = envelope(r#"{"gwWan":"t","conType":"WAN","muti":"LAN"}"#);
        assert_eq!(e.concurrent_session(), Some("local user has already logged in"));

        let e = envelope(r#"{"gwWan":"t","muti":"GW_WAN"}"#);
        assert_eq!(e.concurrent_session(), Some("other remote user has already logged in"));

        let e = envelope(r#"{"gwWan":"f","conType":"LAN","muti":""}"#);
        assert_eq!(e.concurrent_session(), None);

        let e = envelope("{}");
        assert_eq!(e.concurrent_session(), None);
    }

    #[test]
    fn test_envelope_keeps_numeric_fields() {
        let e = envelope(r#"{"modelname":"TG2492LG","family":3}"#);
        assert_eq!(e.modelname.as_deref(), Some("TG2492LG"));
        assert_eq!(e.family.as_deref(), Some("3"));
        assert!(LoginEnvelope::from_json(b"[1,2]").is_none());
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let (mut client, mock) = mock_client();
        mock.queue_login(r#"{"gwWan":"f","conType":"LAN","muti":"","modelname":"TG2492LG","family":"3"}"#);

        client.login(Some("admin"), "hunter2").await.unwrap();

        assert!(client.is_logged_in());
        assert_eq!(client.username(), Some("admin"));
        assert_eq!(client.model_name(), Some("TG2492LG"));
        assert_eq!(client.family(), Some("3"));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path(), "login");
        assert_eq!(requests[0].param("arg"), Some("YWRtaW46aHVudGVyMg=="));
        assert_eq!(requests[0].param("_n").map(str::len), Some(5));
        assert!(requests[0].credential.is_none());
        assert_eq!(client.stats().op("login").unwrap().calls, 1);
    }

    #[tokio::test]
    async fn test_login_reads_default_username() {
        let (mut client, mock) = mock_client();
        mock.queue_json(format!(r#"{{"{}":"root"}}"#, AUTH_USERNAME_OID));
        mock.queue_login("{}");

        client.login(None, DEFAULT_PASSWORD).await.unwrap();

        assert_eq!(client.username(), Some("root"));
        let requests = mock.requests();
        assert_eq!(requests[0].path(), "snmpGet");
        assert_eq!(requests[1].param("arg"), Some("cm9vdDphZG1pbg=="));
    }

    #[tokio::test]
    async fn test_login_empty_body_fails() {
        let (mut client, mock) = mock_client();
        mock.queue_json("");

        let err = client.login(Some("admin"), "wrong").await.unwrap_err();
        assert!(matches!(err, Error::LoginFailed { status: 200, .. }));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_garbage_body_fails() {
        let (mut client, mock) = mock_client();
        mock.queue_json("not base64!");

        let err = client.login(Some("admin"), "pw").await.unwrap_err();
        assert!(matches!(err, Error::LoginFailed { .. }));
    }

    #[tokio::test]
    async fn test_login_401_is_not_retried() {
        let (mut client, mock) = mock_client();
        mock.queue_status(401);

        let err = client.login(Some("admin"), "pw").await.unwrap_err();
        assert!(matches!(err, Error::LoginFailed { status: 401, .. }));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_on_failure() {
        let (mut client, mock) = mock_client();
        mock.queue_login("{}");
        client.login(Some("admin"), "pw").await.unwrap();

        mock.queue_status(401);
        let err = client.logout().await.unwrap_err();
        assert!(matches!(err, Error::AccessDenied { .. }));
        assert!(!client.is_logged_in());
        assert_eq!(client.username(), None);
        // No re-login attempt
        assert_eq!(mock.paths(), vec!["login", "logout"]);
    }

    #[tokio::test]
    async fn test_logout_when_logged_out_is_noop() {
        let (mut client, mock) = mock_client();
        client.logout().await.unwrap();
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_lan_ip_address() {
        let (mut client, mock) = mock_client();
        mock.queue_response(Response::new(200, r#"{"gwaddr":"192.168.0.1","other":1}"#));

        assert_eq!(client.lan_ip_address().await.unwrap(), "192.168.0.1");
        assert_eq!(mock.paths(), vec!["getPreLoginData"]);
    }
}
