//! HTTP transport built on `reqwest`.

use super::{Request, Response, Transport};
use crate::error::{Error, Result};
use reqwest::header::COOKIE;
use std::time::Duration;

/// HTTP transport to a hub.
///
/// Clone is cheap: `reqwest::Client` is reference counted internally.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport for `host` (a name or address, optionally with port).
    ///
    /// `timeout` bounds every request from connect to the end of the body.
    pub fn new(host: &str, timeout: Duration) -> Result<Self> {
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", host.trim_end_matches('/'))
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| Error::Network {
                url: base_url.clone().into(),
                source,
            })?;

        Ok(Self { client, base_url })
    }

    fn url_for(&self, request: &Request) -> String {
        match &request.raw_query {
            Some(query) => format!("{}/{}?{}", self.base_url, request.path, query),
            None => format!("{}/{}", self.base_url, request.path),
        }
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, request: &Request, credential: Option<&str>) -> Result<Response> {
        let url = self.url_for(request);
        let network_error = |source| Error::Network {
            url: url.as_str().into(),
            source,
        };

        let mut builder = self.client.get(&url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(token) = credential {
            builder = builder.header(COOKIE, format!("credential={}", token));
        }

        tracing::trace!(target: "async_hub3::transport", { hub.url = %url }, "sending request");

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(network_error)?;

        tracing::trace!(target: "async_hub3::transport", { hub.status = status, hub.bytes = body.len() }, "received response");

        Ok(Response {
            status,
            headers,
            body,
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
