//! Typed views over the hub's tables.
//!
//! Each view walks one table with [`Client::snmp_walk`], assembles it with
//! [`assemble_table`](crate::table::assemble_table) and decodes the cells.
//!
//! - [`Client::wan_networks`] and [`Client::dns_servers`]
//! - [`Client::port_forwards`], [`Client::add_port_forward`] and
//!   [`Client::remove_port_forward`]
//! - [`Client::devices`] and [`Client::device`]
//!
//! The hub is slow to answer walks; expect each view to take a few seconds.
//!
//! [`Client::snmp_walk`]: crate::Client::snmp_walk
//! [`Client::wan_networks`]: crate::Client::wan_networks
//! [`Client::dns_servers`]: crate::Client::dns_servers
//! [`Client::port_forwards`]: crate::Client::port_forwards
//! [`Client::add_port_forward`]: crate::Client::add_port_forward
//! [`Client::remove_port_forward`]: crate::Client::remove_port_forward
//! [`Client::devices`]: crate::Client::devices
//! [`Client::device`]: crate::Client::device

mod device;
mod network;
mod portforward;

pub use device::*;
pub use network::*;
pub use portforward::*;

use crate::codec::{IpAddress, IpVersion, decode_ip};
use crate::error::Result;
use crate::table::TableRow;

/// Decode the address in `column`, using the family named by `type_column`.
///
/// Rows with a missing or unknown address type yield `None`.
fn row_ip(
    row: &TableRow,
    type_column: &str,
    column: &str,
    zero_is_none: bool,
) -> Result<Option<IpAddress>> {
    let Some(version) = row.get(type_column).and_then(IpVersion::from_wire) else {
        return Ok(None);
    };
    match row.get(column) {
        Some(wire) => decode_ip(wire, version, zero_is_none),
        None => Ok(None),
    }
}
