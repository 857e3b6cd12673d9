//! Hub client.
//!
//! A [`Client`] owns one session with one hub. Every network operation takes
//! `&mut self`, so a client has at most one request in flight; use separate
//! clients for concurrent work.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> async_hub3::Result<()> {
//! use async_hub3::Client;
//!
//! let mut client = Client::builder("192.168.0.1")
//!     .credentials(None, "secret")
//!     .connect()
//!     .await?;
//!
//! let serial = client.snmp_get("1.3.6.1.4.1.4115.1.20.1.1.5.8.0").await;
//! let serial = client.finish(serial).await?;
//! println!("serial number: {}", serial);
//! # Ok(())
//! # }
//! ```

mod builder;
mod request;
mod session;
mod snmp;
mod walk;

pub use builder::*;
pub use session::{AUTH_USERNAME_OID, DEFAULT_PASSWORD};
pub use snmp::COMMIT_OID;
pub use walk::filter_walk_body;

pub(crate) use request::RetryBudget;

use std::fmt;
use std::time::Duration;

use crate::error::Result;
use crate::stats::Stats;
use crate::transport::{ReqwestTransport, Request, Transport};

use session::Session;

/// Resolved client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Host name or address of the hub.
    pub host: String,
    /// Timeout for each HTTP request.
    pub timeout: Duration,
    /// Re-logins allowed per operation on HTTP 401.
    pub retry_401: u32,
    /// Retries allowed per operation on HTTP 500.
    pub retry_500: u32,
    /// First backoff delay after HTTP 500; doubles on each retry.
    pub backoff_unit: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timeout: Duration::from_secs(30),
            retry_401: 5,
            retry_500: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

/// Default address of a hub on its own LAN.
pub const DEFAULT_HOST: &str = "192.168.0.1";

/// Per-instance request nonce.
///
/// The web interface appends `_n=<5 digits>&_=<epoch ms>` to its requests.
/// Both values are chosen once per client and reused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Nonce {
    n: u32,
    millis: i64,
}

impl Nonce {
    pub(crate) fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut buf = [0u8; 4];
        let random = match getrandom::fill(&mut buf) {
            Ok(()) => u32::from_le_bytes(buf),
            Err(_) => millis as u32,
        };
        Self {
            n: 10000 + random % 90000,
            millis,
        }
    }

    /// `_n=...&_=...`
    pub(crate) fn query(&self) -> String {
        format!("_n={:05}&_={}", self.n, self.millis)
    }

    pub(crate) fn params(&self) -> [(String, String); 2] {
        [
            ("_n".to_string(), format!("{:05}", self.n)),
            ("_".to_string(), self.millis.to_string()),
        ]
    }
}

/// Client for a hub's management interface.
///
/// Generic over transport, with [`ReqwestTransport`] as the default.
/// Dropping a logged-in client logs out in the background; prefer
/// [`close`](Client::close) or [`finish`](Client::finish) to observe the
/// outcome.
pub struct Client<T: Transport = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
    session: Session,
    nonce: Nonce,
    stats: Stats,
    unapplied_settings: bool,
}

impl Client<ReqwestTransport> {
    /// Start building a client for `host`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn example() -> async_hub3::Result<()> {
    /// use async_hub3::Client;
    /// use std::time::Duration;
    ///
    /// let client = Client::builder("192.168.100.1")
    ///     .timeout(Duration::from_secs(10))
    ///     .connect()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(host: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(host)
    }
}

impl<T: Transport> Client<T> {
    /// Create a client with an existing transport.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            session: Session::default(),
            nonce: Nonce::generate(),
            stats: Stats::new(),
            unapplied_settings: false,
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request statistics collected so far.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Whether a `snmp_set` succeeded since the last [`apply_settings`](Client::apply_settings).
    pub fn has_unapplied_settings(&self) -> bool {
        self.unapplied_settings
    }

    /// Log out and consume the client.
    pub async fn close(mut self) -> Result<()> {
        self.logout().await
    }

    /// Log out, then return `result`.
    ///
    /// If `result` is an error it is returned even when logout also fails;
    /// the logout error is only logged. If `result` is a success, a logout
    /// failure is returned instead.
    pub async fn finish<R>(mut self, result: Result<R>) -> Result<R> {
        let logout = self.logout().await;
        match (result, logout) {
            (Err(e), Err(logout_err)) => {
                tracing::warn!(target: "async_hub3::client", { error = %logout_err }, "logout failed after error");
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(_), Err(logout_err)) => Err(logout_err),
            (Ok(value), Ok(())) => Ok(value),
        }
    }
}

impl<T: Transport> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.transport.base_url())
            .field("username", &self.session.username())
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Drop for Client<T> {
    fn drop(&mut self) {
        let Some(credential) = self.session.take_credential() else {
            return;
        };
        let base_url = self.transport.base_url().to_string();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let transport = self.transport.clone();
                let request = Request::new("logout").raw_query(self.nonce.query());
                handle.spawn(async move {
                    match transport.get(&request, Some(&credential)).await {
                        Ok(response) if response.is_success() => {
                            tracing::debug!(target: "async_hub3::client", { hub.url = %base_url }, "logged out on drop");
                        }
                        Ok(response) => {
                            tracing::warn!(target: "async_hub3::client", { hub.url = %base_url, hub.status = response.status }, "logout on drop failed");
                        }
                        Err(e) => {
                            tracing::warn!(target: "async_hub3::client", { hub.url = %base_url, error = %e }, "logout on drop failed");
                        }
                    }
                });
            }
            Err(_) => {
                tracing::warn!(target: "async_hub3::client", { hub.url = %base_url }, "client dropped outside a Tokio runtime; session left logged in");
            }
        }
    }
}
