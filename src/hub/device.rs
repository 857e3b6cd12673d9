//! LAN devices known to the hub.
//!
//! The hub remembers recently connected devices as well as current ones, so
//! [`Client::devices`] usually returns more than what is online right now.
//! Use [`Client::device_connected`] to tell them apart.

use std::fmt;
use std::net::Ipv4Addr;

use crate::codec::{MacAddress, decode_mac};
use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::Client;

/// Device MAC addresses, indexed by IPv4 address.
pub const DEVICE_MAC_PREFIX: &str = "1.3.6.1.4.1.4115.1.20.1.1.2.4.2.1.4.200.1.4";
const DEVICE_NAME_PREFIX: &str = "1.3.6.1.4.1.4115.1.20.1.1.2.4.2.1.3.200.1.4";
const DEVICE_CONNECTED_PREFIX: &str = "1.3.6.1.4.1.4115.1.20.1.1.2.4.2.1.14.200.1.4";

/// A device on the LAN or WiFi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Device {
    pub ipv4: Ipv4Addr,
    pub mac: MacAddress,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ipv4, self.mac)
    }
}

/// Decode the MAC, treating an empty value as an unknown device.
fn device_mac(wire: &str) -> Result<Option<MacAddress>> {
    if wire.is_empty() {
        return Ok(None);
    }
    decode_mac(wire).map(Some)
}

impl<T: Transport> Client<T> {
    /// All devices the hub knows about, ordered by address.
    pub async fn devices(&mut self) -> Result<Vec<Device>> {
        let walk = self.snmp_walk(DEVICE_MAC_PREFIX).await?;
        let mut devices = Vec::with_capacity(walk.len());
        for (oid, wire) in &walk {
            let Some(ipv4) = oid
                .strip_prefix(DEVICE_MAC_PREFIX)
                .and_then(|rest| rest.strip_prefix('.'))
                .and_then(|ip| ip.parse::<Ipv4Addr>().ok())
            else {
                tracing::debug!(target: "async_hub3::hub", { hub.oid = %oid }, "ignoring entry outside the device table");
                continue;
            };
            if let Some(mac) = device_mac(wire)? {
                devices.push(Device { ipv4, mac });
            }
        }
        devices.sort_by_key(|d| d.ipv4);
        Ok(devices)
    }

    /// The device with address `ipv4`, or `None` if the hub does not know it.
    pub async fn device(&mut self, ipv4: Ipv4Addr) -> Result<Option<Device>> {
        let wire = match self.snmp_get(&format!("{}.{}", DEVICE_MAC_PREFIX, ipv4)).await {
            Ok(wire) => wire,
            Err(Error::MissingOid { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(device_mac(&wire)?.map(|mac| Device { ipv4, mac }))
    }

    /// Whether the device with address `ipv4` is currently connected.
    pub async fn device_connected(&mut self, ipv4: Ipv4Addr) -> Result<bool> {
        let wire = self
            .snmp_get(&format!("{}.{}", DEVICE_CONNECTED_PREFIX, ipv4))
            .await?;
        Ok(wire == "1")
    }

    /// The name the device reported to the hub, usually from its DHCP request.
    pub async fn device_name(&mut self, ipv4: Ipv4Addr) -> Result<Option<String>> {
        let name = self
            .snmp_get(&format!("{}.{}", DEVICE_NAME_PREFIX, ipv4))
            .await?;
        if name.is_empty() || name == "unknown" {
            return Ok(None);
        }
        Ok(Some(name))
    }
}
