//! Error types for async-hub3.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.
//!
//! Only two failure modes are recovered internally: HTTP 401 (by logging in
//! again) and HTTP 500 (by backing off). Everything else reaches the caller.

use reqwest::header::HeaderMap;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a wire value could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireErrorKind {
    /// Hex-encoded value without the leading `$`.
    MissingPrefix,
    /// Wrong number of hex digits after the `$`.
    InvalidLength { expected: usize, actual: usize },
    /// Non-hexadecimal character.
    InvalidHex,
    /// Not a decimal integer.
    InvalidInteger,
    /// Date/time fields outside the calendar.
    InvalidDate,
}

impl std::fmt::Display for WireErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPrefix => write!(f, "missing '$' prefix"),
            Self::InvalidLength { expected, actual } => {
                write!(f, "expected {} hex digits, got {}", expected, actual)
            }
            Self::InvalidHex => write!(f, "invalid hex digit"),
            Self::InvalidInteger => write!(f, "invalid decimal integer"),
            Self::InvalidDate => write!(f, "date/time field out of range"),
        }
    }
}

/// Reasons a response body could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    /// Body is not the expected JSON document.
    InvalidJson(Box<str>),
    /// Body is not valid base64.
    InvalidBase64,
    /// A JSON document lacks a required key.
    MissingKey(&'static str),
}

impl std::fmt::Display for ProtocolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(detail) => write!(f, "invalid JSON: {}", detail),
            Self::InvalidBase64 => write!(f, "invalid base64"),
            Self::MissingKey(key) => write!(f, "missing key '{}'", key),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The hub refused the username/password or returned a malformed login envelope.
    #[error("login failed (HTTP {status}): {reason}")]
    LoginFailed { status: u16, reason: Box<str> },

    /// HTTP 401 after the re-login budget was exhausted.
    #[error("access denied for /{path}")]
    AccessDenied { path: Box<str> },

    /// Unexpected HTTP status, including HTTP 500 after the backoff budget.
    #[error("HTTP {status} from /{path}")]
    Transport {
        path: Box<str>,
        status: u16,
        headers: HeaderMap,
    },

    /// Connection failure or timeout talking to the hub.
    #[error("network error requesting {url}: {source}")]
    Network {
        url: Box<str>,
        #[source]
        source: reqwest::Error,
    },

    /// Response body could not be interpreted.
    #[error("protocol error from /{path}: {kind}")]
    Protocol {
        path: Box<str>,
        kind: ProtocolErrorKind,
    },

    /// A wire value could not be decoded.
    #[error("malformed wire value {input:?}: {kind}")]
    MalformedWireValue {
        kind: WireErrorKind,
        input: Box<str>,
    },

    /// A GET response did not contain the requested OID.
    #[error("response did not contain OID {oid}")]
    MissingOid { oid: Box<str> },

    /// The hub refused a SET.
    #[error("hub refused to set OID {oid}: response was {response}")]
    SetRejected { oid: Box<str>, response: Box<str> },

    /// A value cannot be written to the named attribute or field.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: Box<str>, reason: Box<str> },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

impl Error {
    /// Create a wire decode error.
    pub fn wire(kind: WireErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::MalformedWireValue {
            kind,
            input: input.into(),
        }
    }

    /// Create a protocol error.
    pub fn protocol(path: impl Into<Box<str>>, kind: ProtocolErrorKind) -> Self {
        Self::Protocol {
            path: path.into(),
            kind,
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(name: impl Into<Box<str>>, reason: impl Into<Box<str>>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::LoginFailed { status, .. } => Some(*status),
            Self::AccessDenied { .. } => Some(401),
            Self::Transport { status, .. } => Some(*status),
            Self::Network { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error means the session credentials are unusable.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::LoginFailed { .. } | Self::AccessDenied { .. })
    }
}
