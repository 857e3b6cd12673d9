//! Prelude module for convenient imports.
//!
//! ```rust,no_run
//! use async_hub3::prelude::*;
//! ```
//!
//! This imports the [`Client`], the error types, the attribute catalogue
//! types, the wire [`DataType`] and the typed hub views.

pub use crate::attribute::{Attribute, AttributeKind, AttributeValue};
pub use crate::client::Client;
pub use crate::codec::{DataType, IpAddress, MacAddress};
pub use crate::error::{Error, Result};
pub use crate::hub::{Device, IpProtocol, NewPortForward, PortForward, PortRange, WanNetwork};
pub use crate::transport::Transport;
