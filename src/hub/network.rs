//! WAN networks and DNS servers.

use std::net::Ipv4Addr;

use crate::codec::{IpAddress, decode_int, decode_ipv4};
use crate::error::Result;
use crate::table::assemble_table;
use crate::transport::Transport;
use crate::Client;

use super::row_ip;

/// WAN address table.
pub const WAN_NETWORK_TABLE: &str = "1.3.6.1.4.1.4115.1.20.1.1.1.7.1";

const WAN_NETWORK_COLUMNS: &[(&str, &str)] = &[
    ("2", "addrtype"),
    ("3", "ipaddr"),
    ("4", "prefix"),
    ("5", "gwtype"),
    ("6", "gw"),
    ("7", "iptype"),
    ("8", "netmask"),
    ("9", "prefix_delegation_v6"),
    ("10", "prefix_delegation_v6_len"),
    ("11", "preferred_lifetime_v6"),
    ("12", "valid_lifetime_v6"),
];

/// DNS server table.
pub const DNS_SERVER_TABLE: &str = "1.3.6.1.4.1.4115.1.20.1.1.1.11.2.1";

const DNS_SERVER_COLUMNS: &[(&str, &str)] = &[("2", "addrtype"), ("3", "address")];

/// An external network the hub is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WanNetwork {
    pub ipaddr: Option<IpAddress>,
    pub prefix: Option<i64>,
    pub netmask: Option<Ipv4Addr>,
    pub gw: Option<IpAddress>,
}

impl<T: Transport> Client<T> {
    /// External networks of the hub. A hub can have more than one external
    /// address, typically one per address family.
    ///
    /// Rows without a prefix length are placeholders and are skipped.
    pub async fn wan_networks(&mut self) -> Result<Vec<WanNetwork>> {
        let walk = self.snmp_walk(WAN_NETWORK_TABLE).await?;
        let rows = assemble_table(WAN_NETWORK_TABLE, WAN_NETWORK_COLUMNS, &walk);

        let mut networks = Vec::new();
        for row in &rows {
            let Some(prefix) = row.get("prefix") else {
                continue;
            };
            networks.push(WanNetwork {
                ipaddr: row_ip(row, "addrtype", "ipaddr", true)?,
                prefix: decode_int(prefix, false)?,
                netmask: match row.get("netmask") {
                    Some(wire) => decode_ipv4(wire, true)?,
                    None => None,
                },
                gw: row_ip(row, "addrtype", "gw", true)?,
            });
        }
        tracing::debug!(target: "async_hub3::hub", { hub.rows = rows.len(), hub.networks = networks.len() }, "decoded WAN networks");
        Ok(networks)
    }

    /// DNS servers used by the hub, which it most likely also hands out to
    /// DHCP clients.
    pub async fn dns_servers(&mut self) -> Result<Vec<IpAddress>> {
        let walk = self.snmp_walk(DNS_SERVER_TABLE).await?;
        let mut servers = Vec::new();
        for row in assemble_table(DNS_SERVER_TABLE, DNS_SERVER_COLUMNS, &walk) {
            if let Some(addr) = row_ip(&row, "addrtype", "address", true)? {
                servers.push(addr);
            }
        }
        Ok(servers)
    }
}
