//! Resilient request layer.
//!
//! The hub's embedded web server randomly answers HTTP 401 to requests with
//! a valid credential, and HTTP 500 when it is busy. Both are retried here:
//! 401 by logging in again with the stored credentials, 500 by sleeping with
//! exponential backoff. The budgets are per call.

use std::time::Duration;

use tracing::Span;

use crate::error::{Error, Result};
use crate::transport::{Request, Response, Transport};

use super::Client;

/// Remaining retries for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryBudget {
    remaining_401: u32,
    remaining_500: u32,
}

impl RetryBudget {
    pub(crate) const fn new(retry_401: u32, retry_500: u32) -> Self {
        Self {
            remaining_401: retry_401,
            remaining_500: retry_500,
        }
    }

    /// Consume one 401 retry, if any remain.
    fn take_401(&mut self) -> bool {
        if self.remaining_401 == 0 {
            return false;
        }
        self.remaining_401 -= 1;
        true
    }

    /// Consume one 500 retry, if any remain.
    fn take_500(&mut self) -> bool {
        if self.remaining_500 == 0 {
            return false;
        }
        self.remaining_500 -= 1;
        true
    }
}

fn transport_error(request: &Request, response: Response) -> Error {
    Error::Transport {
        path: request.path.as_ref().into(),
        status: response.status,
        headers: response.headers,
    }
}

impl<T: Transport> Client<T> {
    /// Budget for ordinary operations, from the client configuration.
    pub(crate) fn default_budget(&self) -> RetryBudget {
        RetryBudget::new(self.config.retry_401, self.config.retry_500)
    }

    /// Budget for login and logout: no re-login on 401.
    pub(crate) fn session_budget(&self) -> RetryBudget {
        RetryBudget::new(0, self.config.retry_500)
    }

    /// Send `request`, retrying HTTP 500 with backoff.
    ///
    /// Returns the first response that is not a retried 500. A 500 after the
    /// budget is spent becomes [`Error::Transport`]. `backoff` carries the
    /// next sleep across calls within one operation.
    pub(crate) async fn dispatch(
        &mut self,
        request: &Request,
        budget: &mut RetryBudget,
        backoff: &mut Duration,
    ) -> Result<Response> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            tracing::debug!(target: "async_hub3::client", { hub.path = %request.path, hub.attempt = attempt, hub.logged_in = self.is_logged_in() }, "sending request");

            let response = self
                .transport
                .get(request, self.session.credential())
                .await?;
            self.stats
                .increment(&format!("received_http_{}", response.status));

            if response.status != 500 {
                return Ok(response);
            }
            if !budget.take_500() {
                tracing::debug!(target: "async_hub3::client", { hub.path = %request.path, hub.attempt = attempt }, "HTTP 500 retries exhausted");
                return Err(transport_error(request, response));
            }

            let delay = *backoff;
            tracing::warn!(target: "async_hub3::client", { hub.path = %request.path, hub.status = 500, delay_ms = delay.as_millis() as u64 }, "got HTTP 500, retrying after backoff");
            tokio::time::sleep(delay).await;
            *backoff = delay.saturating_mul(2);
            self.stats.increment("retries_500");
            self.stats.add_backoff(delay);
        }
    }

    /// Send `request` with the credential cookie, recovering from 401 and 500.
    ///
    /// - HTTP 401 with a session held and budget left: log in again with the
    ///   stored credentials and retry. Otherwise [`Error::AccessDenied`].
    /// - HTTP 500: see [`dispatch`](Self::dispatch).
    /// - 2xx and 304: the response.
    /// - Anything else: [`Error::Transport`].
    pub(crate) async fn authenticated_get(
        &mut self,
        request: Request,
        mut budget: RetryBudget,
    ) -> Result<Response> {
        let mut backoff = self.config.backoff_unit;
        let mut relogins = 0u32;
        loop {
            let response = self.dispatch(&request, &mut budget, &mut backoff).await?;

            if response.status == 401 {
                if self.is_logged_in() && budget.take_401() {
                    relogins += 1;
                    Span::current().record("hub.relogins", relogins);
                    tracing::warn!(target: "async_hub3::client", { hub.path = %request.path, hub.status = 401, hub.relogins = relogins }, "got HTTP 401, logging in again");
                    self.relogin().await?;
                    self.stats.increment("retries_401");
                    continue;
                }
                tracing::debug!(target: "async_hub3::client", { hub.path = %request.path, hub.relogins = relogins }, "access denied");
                return Err(Error::AccessDenied {
                    path: request.path.as_ref().into(),
                });
            }

            if response.is_success() {
                tracing::trace!(target: "async_hub3::client", { hub.path = %request.path, hub.status = response.status, body = %response.text() }, "response body");
                return Ok(response);
            }

            return Err(transport_error(&request, response));
        }
    }
}
