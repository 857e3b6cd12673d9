//! Port forwarding rules.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use tracing::instrument;

use crate::codec::{DataType, IpAddress, IpVersion, decode_int, encode_ipv4};
use crate::error::{Error, Result};
use crate::table::{TableRow, assemble_table};
use crate::transport::Transport;
use crate::Client;

use super::row_ip;

/// Port forwarding table.
pub const PORT_FORWARD_TABLE: &str = "1.3.6.1.4.1.4115.1.20.1.1.4.12.1";

const PORT_FORWARD_COLUMNS: &[(&str, &str)] = &[
    ("1", "index"),
    ("2", "desc"),
    ("3", "ext_port_start"),
    ("4", "ext_port_end"),
    ("5", "proto"),
    ("6", "local_addr_type"),
    ("7", "local_addr"),
    ("9", "local_port_start"),
    ("10", "local_port_end"),
    ("11", "rowstatus"),
];

mod column {
    pub const EXT_PORT_START: u32 = 3;
    pub const EXT_PORT_END: u32 = 4;
    pub const PROTO: u32 = 5;
    pub const LOCAL_ADDR_TYPE: u32 = 6;
    pub const LOCAL_ADDR: u32 = 7;
    pub const LOCAL_PORT_START: u32 = 9;
    pub const LOCAL_PORT_END: u32 = 10;
    pub const ROW_STATUS: u32 = 11;
}

/// Row status values written to the status column.
mod row_status {
    pub const ACTIVE: &str = "1";
    pub const CREATE: &str = "5";
    pub const DESTROY: &str = "6";
}

/// Transport protocol of a forwarding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpProtocol {
    Udp,
    Tcp,
    Both,
}

impl IpProtocol {
    /// Parse the wire value of the protocol column.
    pub fn from_wire(wire: &str) -> Option<Self> {
        match wire.trim() {
            "0" => Some(IpProtocol::Udp),
            "1" => Some(IpProtocol::Tcp),
            "2" => Some(IpProtocol::Both),
            _ => None,
        }
    }

    /// Wire value of this protocol.
    pub const fn as_wire(self) -> &'static str {
        match self {
            IpProtocol::Udp => "0",
            IpProtocol::Tcp => "1",
            IpProtocol::Both => "2",
        }
    }
}

impl fmt::Display for IpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IpProtocol::Udp => "udp",
            IpProtocol::Tcp => "tcp",
            IpProtocol::Both => "both",
        })
    }
}

impl FromStr for IpProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(IpProtocol::Udp),
            "tcp" => Ok(IpProtocol::Tcp),
            "both" | "tcp/udp" => Ok(IpProtocol::Both),
            _ => Err(Error::invalid_value(s, "expected udp, tcp or both")),
        }
    }
}

/// An inclusive port range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    /// Range from `start` to `end` inclusive.
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// A single port.
    pub const fn single(port: u16) -> Self {
        Self::new(port, port)
    }
}

/// `80` for a single port, `6000-6010` for a range.
impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PortRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let port = |p: &str| {
            p.trim()
                .parse::<u16>()
                .map_err(|_| Error::invalid_value(s, "expected PORT or START-END"))
        };
        let range = match s.split_once('-') {
            Some((start, end)) => PortRange::new(port(start)?, port(end)?),
            None => PortRange::single(port(s)?),
        };
        if range.start > range.end {
            return Err(Error::invalid_value(s, "range start is after its end"));
        }
        Ok(range)
    }
}

/// A port forwarding rule as stored on the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortForward {
    /// Table row holding this rule.
    pub index: u32,
    pub description: Option<String>,
    pub ext_ports: PortRange,
    pub protocol: Option<IpProtocol>,
    pub local_addr: Option<IpAddress>,
    pub local_ports: PortRange,
    pub enabled: bool,
}

impl PortForward {
    /// Decode a table row. Rows lacking a port are skipped by the caller.
    fn from_row(row: &TableRow) -> Result<Option<Self>> {
        let port = |name: &str| -> Result<Option<u16>> {
            let Some(wire) = row.get(name) else {
                return Ok(None);
            };
            match decode_int(wire, false)? {
                Some(n) => u16::try_from(n)
                    .map(Some)
                    .map_err(|_| Error::invalid_value(name, format!("port {} out of range", n))),
                None => Ok(None),
            }
        };
        let (Some(ext_start), Some(ext_end), Some(local_start), Some(local_end)) = (
            port("ext_port_start")?,
            port("ext_port_end")?,
            port("local_port_start")?,
            port("local_port_end")?,
        ) else {
            return Ok(None);
        };

        Ok(Some(PortForward {
            index: row.index,
            description: row.get("desc").filter(|d| !d.is_empty()).map(str::to_string),
            ext_ports: PortRange::new(ext_start, ext_end),
            protocol: row.get("proto").and_then(IpProtocol::from_wire),
            local_addr: row_ip(row, "local_addr_type", "local_addr", false)?,
            local_ports: PortRange::new(local_start, local_end),
            enabled: row.get("rowstatus") == Some(row_status::ACTIVE),
        }))
    }
}

impl fmt::Display for PortForward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let proto = self.protocol.map_or("?".to_string(), |p| p.to_string());
        write!(f, "{} {} -> ", proto, self.ext_ports)?;
        match &self.local_addr {
            Some(IpAddress::V4(addr)) => write!(f, "{}", addr)?,
            Some(IpAddress::V6(addr)) => write!(f, "[{}]", addr)?,
            None => f.write_str("?")?,
        }
        write!(f, ":{}", self.local_ports)?;
        if !self.enabled {
            f.write_str(" (disabled)")?;
        }
        Ok(())
    }
}

/// A new forwarding rule to an IPv4 host on the LAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPortForward {
    pub protocol: IpProtocol,
    pub ext_ports: PortRange,
    pub local_addr: Ipv4Addr,
    pub local_ports: PortRange,
}

fn cell_oid(column: u32, index: u32) -> String {
    format!("{}.{}.{}", PORT_FORWARD_TABLE, column, index)
}

impl<T: Transport> Client<T> {
    /// Port forwarding rules, in table order.
    pub async fn port_forwards(&mut self) -> Result<Vec<PortForward>> {
        let walk = self.snmp_walk(PORT_FORWARD_TABLE).await?;
        let mut rules = Vec::new();
        for row in assemble_table(PORT_FORWARD_TABLE, PORT_FORWARD_COLUMNS, &walk) {
            match PortForward::from_row(&row)? {
                Some(rule) => rules.push(rule),
                None => {
                    tracing::debug!(target: "async_hub3::hub", { hub.row = row.index }, "skipping port forward row without ports")
                }
            }
        }
        Ok(rules)
    }

    /// Add a forwarding rule in a new table row and apply it.
    ///
    /// Returns the index of the new row.
    #[instrument(skip(self, rule), err, fields(hub.url = %self.transport().base_url(), hub.ext_ports = %rule.ext_ports))]
    pub async fn add_port_forward(&mut self, rule: &NewPortForward) -> Result<u32> {
        // Rows without ports still occupy their index
        let walk = self.snmp_walk(PORT_FORWARD_TABLE).await?;
        let index = assemble_table(PORT_FORWARD_TABLE, PORT_FORWARD_COLUMNS, &walk)
            .iter()
            .map(|r| r.index)
            .max()
            .map_or(1, |max| max + 1);

        let ext_start = rule.ext_ports.start.to_string();
        let ext_end = rule.ext_ports.end.to_string();
        let local_start = rule.local_ports.start.to_string();
        let local_end = rule.local_ports.end.to_string();
        let local_addr = encode_ipv4(rule.local_addr).to_uppercase();

        // Same order as the hub's web interface
        let cells: [(u32, &str, DataType); 9] = [
            (column::ROW_STATUS, row_status::CREATE, DataType::Integer),
            (column::EXT_PORT_START, &ext_start, DataType::Unsigned32),
            (column::EXT_PORT_END, &ext_end, DataType::Unsigned32),
            (column::PROTO, rule.protocol.as_wire(), DataType::Integer),
            (column::LOCAL_ADDR_TYPE, IpVersion::V4.as_wire(), DataType::Integer),
            (column::LOCAL_ADDR, &local_addr, DataType::OctetString),
            (column::LOCAL_PORT_START, &local_start, DataType::Unsigned32),
            (column::LOCAL_PORT_END, &local_end, DataType::Unsigned32),
            (column::ROW_STATUS, row_status::ACTIVE, DataType::Integer),
        ];
        for (col, value, datatype) in cells {
            self.snmp_set(&cell_oid(col, index), Some(value), Some(datatype))
                .await?;
        }
        self.apply_settings().await?;

        tracing::debug!(target: "async_hub3::hub", { hub.row = index }, "added port forward");
        Ok(index)
    }

    /// Remove every rule matching `protocol` and `ext_ports`.
    ///
    /// Returns the number of rules removed; no match is not an error.
    /// Settings are applied even if a removal fails.
    #[instrument(skip(self), err, fields(hub.url = %self.transport().base_url()))]
    pub async fn remove_port_forward(
        &mut self,
        protocol: IpProtocol,
        ext_ports: PortRange,
    ) -> Result<usize> {
        let removed = self.destroy_port_forwards(protocol, ext_ports).await;
        let applied = self.apply_settings().await;
        let removed = removed?;
        applied?;
        Ok(removed)
    }

    async fn destroy_port_forwards(
        &mut self,
        protocol: IpProtocol,
        ext_ports: PortRange,
    ) -> Result<usize> {
        let matching: Vec<u32> = self
            .port_forwards()
            .await?
            .into_iter()
            .filter(|r| r.protocol == Some(protocol) && r.ext_ports == ext_ports)
            .map(|r| r.index)
            .collect();
        for &index in &matching {
            self.snmp_set(
                &cell_oid(column::ROW_STATUS, index),
                Some(row_status::DESTROY),
                Some(DataType::Integer),
            )
            .await?;
        }
        Ok(matching.len())
    }
}
