//! Client builder.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use async_hub3::Client;
//! # use std::time::Duration;
//! # async fn example() -> async_hub3::Result<()> {
//! // Unauthenticated client on the default address
//! let client = Client::builder("192.168.0.1").connect().await?;
//!
//! // Logged in, with a shorter timeout and more patience for HTTP 500
//! let client = Client::builder("192.168.100.1")
//!     .timeout(Duration::from_secs(10))
//!     .retry_500(5)
//!     .credentials(Some("admin"), "secret")
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::transport::{ReqwestTransport, Transport};

use super::{Client, ClientConfig};

/// Builder for [`Client`].
///
/// Created via [`Client::builder()`].
pub struct ClientBuilder {
    config: ClientConfig,
    username: Option<String>,
    password: Option<Zeroizing<String>>,
}

impl ClientBuilder {
    pub(crate) fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        let config = ClientConfig {
            host: if host.is_empty() {
                super::DEFAULT_HOST.to_string()
            } else {
                host
            },
            ..Default::default()
        };
        Self {
            config,
            username: None,
            password: None,
        }
    }

    /// Set the timeout for each HTTP request (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set how many times an operation logs in again after HTTP 401 (default: 5).
    pub fn retry_401(mut self, retries: u32) -> Self {
        self.config.retry_401 = retries;
        self
    }

    /// Set how many times an operation is retried after HTTP 500 (default: 3).
    pub fn retry_500(mut self, retries: u32) -> Self {
        self.config.retry_500 = retries;
        self
    }

    /// Set the first backoff delay after HTTP 500 (default: 1 second).
    ///
    /// The delay doubles after each retry.
    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.config.backoff_unit = unit;
        self
    }

    /// Log in when the client is built.
    ///
    /// Without a username, the hub's admin user name is looked up first.
    pub fn credentials(mut self, username: Option<&str>, password: impl Into<String>) -> Self {
        self.username = username.map(str::to_string);
        self.password = Some(Zeroizing::new(password.into()));
        self
    }

    fn validate(&self) -> Result<()> {
        if self.config.timeout.is_zero() {
            return Err(Error::Config("timeout must be non-zero".into()));
        }
        if self.config.host.contains(char::is_whitespace) {
            return Err(Error::Config(
                format!("invalid host '{}'", self.config.host).into(),
            ));
        }
        Ok(())
    }

    /// Create the client with an HTTP transport, logging in if credentials were given.
    pub async fn connect(self) -> Result<Client<ReqwestTransport>> {
        self.validate()?;
        let transport = ReqwestTransport::new(&self.config.host, self.config.timeout)?;
        self.build(transport).await
    }

    /// Create the client with a pre-supplied transport, logging in if
    /// credentials were given.
    pub async fn build<T: Transport>(self, transport: T) -> Result<Client<T>> {
        self.validate()?;
        let mut client = Client::new(transport, self.config);
        if let Some(password) = self.password {
            client.login(self.username.as_deref(), &password).await?;
        }
        Ok(client)
    }
}
