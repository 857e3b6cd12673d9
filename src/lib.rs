//! # async-hub3
//!
//! Async client for the management interface of Virgin Media Hub 3 (Arris
//! TG2492) routers.
//!
//! The hub's web interface talks to the router with SNMP operations tunnelled
//! through plain HTTP `GET` requests and JSON answers. This crate speaks that
//! dialect:
//!
//! - Session handling with automatic re-login on HTTP 401 and backoff on 500
//! - `snmp_get`, `snmp_set` and `snmp_walk`, plus committing settings
//! - A codec for the hub's `$`-hex encoded addresses, MACs and dates
//! - Table assembly and typed views (WAN networks, DNS, port forwards, devices)
//! - A catalogue of named attributes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_hub3::{Client, attribute};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), async_hub3::Error> {
//!     let mut client = Client::builder("192.168.0.1")
//!         .credentials(None, "secret")
//!         .connect()
//!         .await?;
//!
//!     let result = async {
//!         let attr = attribute::lookup("wan_current_ipaddr_ipv4").unwrap();
//!         let ip = client.read_attribute(attr).await?;
//!         let rules = client.port_forwards().await?;
//!         Ok::<_, async_hub3::Error>((ip, rules))
//!     }
//!     .await;
//!     let (ip, rules) = client.finish(result).await?;
//!
//!     println!("external address: {:?}", ip);
//!     for rule in rules {
//!         println!("{}", rule);
//!     }
//!     Ok(())
//! }
//! ```

pub mod attribute;
pub mod client;
pub mod codec;
pub mod error;
pub mod hub;
pub mod prelude;
pub mod stats;
pub mod table;
pub mod transport;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use attribute::{Attribute, AttributeKind, AttributeValue};
pub use client::{Client, ClientBuilder, ClientConfig};
pub use codec::{DataType, IpAddress, IpVersion, Ipv6Address, MacAddress, WireValue};
pub use error::{Error, ProtocolErrorKind, Result, WireErrorKind};
pub use hub::{Device, IpProtocol, NewPortForward, PortForward, PortRange, WanNetwork};
pub use stats::Stats;
pub use table::{TableRow, assemble_table};
pub use transport::{ReqwestTransport, Request, Response, Transport};

/// Testing utilities exposed via the `testing` feature.
#[cfg(feature = "testing")]
pub mod testing {
    pub use crate::transport::{MockTransport, RecordedRequest};
}
