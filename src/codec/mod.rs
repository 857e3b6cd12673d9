//! Wire value codec for the hub's SNMP-over-JSON dialect.
//!
//! The hub transmits every value as a JSON string. Scalars are plain decimal
//! text, while addresses and dates are a `$` followed by hex digits:
//!
//! | Kind      | Example               | Decoded                |
//! |-----------|-----------------------|------------------------|
//! | IPv4      | `$c2a80464`           | `192.168.4.100`        |
//! | MAC       | `$787b8a6413f5`       | `78:7b:8a:64:13:f5`    |
//! | Timestamp | `$07e2030e10071100`   | `2018-03-14T16:07:17`  |
//! | Integer   | `1500`                | `1500`                 |
//! | Boolean   | `1`                   | `true`                 |
//!
//! A zero-valued address or date conventionally means "not set". Decoders that
//! can see such a value take an explicit `zero_is_none` flag.
//!
//! All functions here are pure: no I/O and no shared state.

mod datatype;
mod decode;
mod encode;
mod types;

pub use datatype::*;
pub use decode::*;
pub use encode::*;
pub use types::*;

/// A value as transmitted by the hub.
pub type WireValue = String;
