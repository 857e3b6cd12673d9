//! Transport layer abstraction.
//!
//! Provides the `Transport` trait and its HTTP implementation. The hub only
//! ever sees `GET` requests, so a transport is little more than "fetch this
//! path with this query and maybe this credential cookie".

mod http;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use http::*;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use crate::error::Result;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use std::borrow::Cow;
use std::future::Future;

/// Client-side transport abstraction.
///
/// # Clone Requirement
///
/// The `Clone` bound is required because a dropped [`Client`](crate::Client)
/// hands a clone of its transport to a background task that logs the
/// session out. Implementations should make clone cheap.
pub trait Transport: Send + Sync + Clone + 'static {
    /// Issue a `GET` request.
    ///
    /// When `credential` is set it is sent as the `credential` cookie.
    /// Any HTTP status is a successful return; interpreting it is up to the
    /// caller.
    fn get(
        &self,
        request: &Request,
        credential: Option<&str>,
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Base URL requests are relative to, e.g. `http://192.168.0.1`.
    fn base_url(&self) -> &str;
}

/// A request to one of the hub's endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Endpoint path without the leading slash, e.g. `snmpGet`.
    pub path: Cow<'static, str>,
    /// Query string passed through verbatim.
    ///
    /// The hub's query syntax (`oids=a;b;&_n=...`) is not form encoding, and
    /// it expects `;` and `%24` exactly as written.
    pub raw_query: Option<String>,
    /// Parameters appended with form encoding.
    pub params: Vec<(String, String)>,
}

impl Request {
    /// Create a request for `path` with no query.
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            path: path.into(),
            raw_query: None,
            params: Vec::new(),
        }
    }

    /// Set the verbatim query string.
    pub fn raw_query(mut self, query: impl Into<String>) -> Self {
        self.raw_query = Some(query.into());
        self
    }

    /// Append a form-encoded parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Path plus raw query, as it appears in logs.
    pub fn display_target(&self) -> String {
        match &self.raw_query {
            Some(query) => format!("/{}?{}", self.path, query),
            None => format!("/{}", self.path),
        }
    }
}

/// A response from the hub.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body.
    pub body: Bytes,
}

impl Response {
    /// Create a response with no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// 2xx and 304 count as success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) || self.status == 304
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
