//! Catalogue of named hub attributes.
//!
//! Each [`Attribute`] binds a symbolic name to an OID and the [`AttributeKind`]
//! that says how its wire value is decoded. Use [`lookup`] to resolve a name
//! and [`Client::read_attribute`]/[`Client::write_attribute`] to access it.
//!
//! ```rust,no_run
//! # async fn example(client: &mut async_hub3::Client) -> async_hub3::Result<()> {
//! use async_hub3::attribute;
//!
//! let attr = attribute::lookup("wan_current_ipaddr_ipv4").unwrap();
//! if let Some(value) = client.read_attribute(attr).await? {
//!     println!("{} = {}", attr.name, value);
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::net::Ipv4Addr;

use chrono::NaiveDateTime;

use crate::codec::{
    self, DataType, Ipv6Address, MacAddress, WireValue, decode_bool, decode_int, decode_ipv4,
    decode_ipv6, decode_mac, decode_timestamp,
};
use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::Client;

/// How an attribute's wire value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    String,
    Integer,
    Boolean,
    Ipv4,
    Ipv6,
    Mac,
    Timestamp,
}

impl AttributeKind {
    /// Datatype used when writing values of this kind.
    pub const fn datatype(self) -> DataType {
        match self {
            AttributeKind::Integer | AttributeKind::Boolean => DataType::Integer,
            _ => DataType::OctetString,
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::String => "string",
            AttributeKind::Integer => "integer",
            AttributeKind::Boolean => "boolean",
            AttributeKind::Ipv4 => "ipv4",
            AttributeKind::Ipv6 => "ipv6",
            AttributeKind::Mac => "mac",
            AttributeKind::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Address),
    Mac(MacAddress),
    Timestamp(NaiveDateTime),
}

impl AttributeValue {
    /// Kind of this value.
    pub const fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::Integer(_) => AttributeKind::Integer,
            AttributeValue::Boolean(_) => AttributeKind::Boolean,
            AttributeValue::Ipv4(_) => AttributeKind::Ipv4,
            AttributeValue::Ipv6(_) => AttributeKind::Ipv6,
            AttributeValue::Mac(_) => AttributeKind::Mac,
            AttributeValue::Timestamp(_) => AttributeKind::Timestamp,
        }
    }

    /// Decode `wire` as `kind`.
    ///
    /// Zero addresses and timestamps, and empty values, are absent. Zero
    /// integers are kept.
    pub fn decode(kind: AttributeKind, wire: &str) -> Result<Option<Self>> {
        Ok(match kind {
            AttributeKind::String => Some(AttributeValue::String(wire.to_string())),
            AttributeKind::Integer => decode_int(wire, false)?.map(AttributeValue::Integer),
            AttributeKind::Boolean => decode_bool(wire).map(AttributeValue::Boolean),
            AttributeKind::Ipv4 => decode_ipv4(wire, true)?.map(AttributeValue::Ipv4),
            AttributeKind::Ipv6 => decode_ipv6(wire, true)?.map(AttributeValue::Ipv6),
            AttributeKind::Mac if wire.is_empty() => None,
            AttributeKind::Mac => Some(AttributeValue::Mac(decode_mac(wire)?)),
            AttributeKind::Timestamp => decode_timestamp(wire)?.map(AttributeValue::Timestamp),
        })
    }

    /// Encode this value as the hub represents it.
    pub fn encode(&self) -> Result<WireValue> {
        Ok(match self {
            AttributeValue::String(s) => s.clone(),
            AttributeValue::Integer(n) => codec::encode_int(*n),
            AttributeValue::Boolean(b) => codec::encode_bool(*b).to_string(),
            AttributeValue::Ipv4(addr) => codec::encode_ipv4(*addr),
            AttributeValue::Ipv6(addr) => codec::encode_ipv6(*addr),
            AttributeValue::Mac(mac) => codec::encode_mac(*mac),
            AttributeValue::Timestamp(ts) => codec::encode_timestamp(ts)?,
        })
    }

    /// Parse human-readable text as `kind`, e.g. for command-line input.
    ///
    /// Timestamps use `YYYY-MM-DDTHH:MM:SS`. Booleans accept
    /// `true`/`false`/`1`/`0`/`on`/`off`.
    pub fn parse(kind: AttributeKind, text: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::invalid_value(text, reason);
        Ok(match kind {
            AttributeKind::String => AttributeValue::String(text.to_string()),
            AttributeKind::Integer => AttributeValue::Integer(
                text.trim().parse().map_err(|_| invalid("not an integer"))?,
            ),
            AttributeKind::Boolean => match text.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => AttributeValue::Boolean(true),
                "0" | "false" | "off" | "no" => AttributeValue::Boolean(false),
                _ => return Err(invalid("not a boolean")),
            },
            AttributeKind::Ipv4 => AttributeValue::Ipv4(
                text.trim().parse().map_err(|_| invalid("not an IPv4 address"))?,
            ),
            AttributeKind::Ipv6 => AttributeValue::Ipv6(Ipv6Address(
                text.trim().parse().map_err(|_| invalid("not an IPv6 address"))?,
            )),
            AttributeKind::Mac => AttributeValue::Mac(
                text.trim().parse().map_err(|_| invalid("not a MAC address"))?,
            ),
            AttributeKind::Timestamp => AttributeValue::Timestamp(
                NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%dT%H:%M:%S")
                    .map_err(|_| invalid("expected YYYY-MM-DDTHH:MM:SS"))?,
            ),
        })
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Integer(n) => write!(f, "{}", n),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Ipv4(addr) => write!(f, "{}", addr),
            AttributeValue::Ipv6(addr) => write!(f, "{}", addr),
            AttributeValue::Mac(mac) => write!(f, "{}", mac),
            AttributeValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// A named hub value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub oid: &'static str,
    pub kind: AttributeKind,
    pub description: &'static str,
}

const fn attr(
    name: &'static str,
    oid: &'static str,
    kind: AttributeKind,
    description: &'static str,
) -> Attribute {
    Attribute {
        name,
        oid,
        kind,
        description,
    }
}

use AttributeKind::{Boolean, Integer, Ipv4, Ipv6, Mac, String as Text, Timestamp};

/// Every known attribute, ordered by name.
pub static ATTRIBUTES: &[Attribute] = &[
    attr("auth_username", "1.3.6.1.4.1.4115.1.20.1.1.5.16.1.2.1", Text, "Name of the admin user"),
    attr("bootcode_version", "1.3.6.1.4.1.4115.1.20.1.1.5.9.0", Text, "Boot code version"),
    attr("cm_doc30_setup_packetcable_region", "1.3.6.1.4.1.4115.1.3.4.1.3.8.0", Integer, "DOCSIS 3.0 PacketCable region setting"),
    attr("current_time", "1.3.6.1.4.1.4115.1.20.1.1.5.15.0", Timestamp, "Current time on the hub"),
    attr("customer_id", "1.3.6.1.4.1.4115.1.20.1.1.5.14.0", Text, "Customer ID"),
    attr("docsis_base_tod_status", "1.3.6.1.4.1.4115.1.3.4.1.1.14.0", Integer, "Time-of-day provisioning status"),
    attr("esafe_erouter_init_mode_ctrl", "1.3.6.1.4.1.4491.2.1.14.1.5.4.0", Integer, "eSAFE eRouter initialization mode control"),
    attr("firmware_version", "1.3.6.1.4.1.4115.1.20.1.1.5.11.0", Text, "Firmware version"),
    attr("first_install_wizard_completed", "1.3.6.1.4.1.4115.1.20.1.1.5.62.0", Boolean, "Whether the first-install wizard has been completed"),
    attr("hardware_version", "1.3.6.1.4.1.4115.1.20.1.1.5.10.0", Text, "Hardware version"),
    attr("lan_dhcp_enabled", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.9.200", Boolean, "Whether the DHCP server is enabled on the LAN"),
    attr("lan_dhcpv4_leasetime", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.14.200", Integer, "LAN DHCP lease time in seconds"),
    attr("lan_dhcpv4_range_end", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.13.200", Ipv4, "Last address of the LAN DHCP range"),
    attr("lan_dhcpv4_range_start", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.11.200", Ipv4, "First address of the LAN DHCP range"),
    attr("lan_dhcpv6_leasetime", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.33.200", Integer, "LAN DHCPv6 lease time in seconds"),
    attr("lan_dhcpv6_prefixlength", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.29.200", Integer, "LAN DHCPv6 prefix length"),
    attr("lan_dhcpv6_range_start", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.31.200", Ipv6, "First address of the LAN DHCPv6 range"),
    attr("lan_gateway2_ipv4", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.7.200", Ipv4, "Secondary LAN gateway address"),
    attr("lan_gateway_ipv4", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.5.200", Ipv4, "LAN gateway address"),
    attr("lan_parentalcontrols_enabled", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.39.200", Boolean, "Whether parental controls are enabled"),
    attr("lan_subnetmask", "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.3.200", Ipv4, "LAN subnet mask"),
    attr("language", "1.3.6.1.4.1.4115.1.20.1.1.5.6.0", Text, "Web interface language"),
    attr("max_cpe_allowed", "1.3.6.1.4.1.4115.1.3.3.1.1.1.3.1.0", Integer, "MaxCpeAllowed from the cable modem config file"),
    attr("name", "1.3.6.1.4.1.4115.1.20.1.1.5.7.0", Text, "Name of the hub"),
    attr("network_access", "1.3.6.1.4.1.4115.1.3.3.1.1.1.3.2.0", Boolean, "Whether the hub has network access"),
    attr("serial_number", "1.3.6.1.4.1.4115.1.20.1.1.5.8.0", Text, "Serial number"),
    attr("wan_conn_domainname", "1.3.6.1.4.1.4115.1.20.1.1.1.3.0", Text, "Domain name given to the hub by the ISP"),
    attr("wan_conn_hostname", "1.3.6.1.4.1.4115.1.20.1.1.1.2.0", Text, "Host name the hub presents to the ISP"),
    attr("wan_conn_type", "1.3.6.1.4.1.4115.1.20.1.1.1.1.0", Text, "Type of WAN connection"),
    attr("wan_current_gw_ipv4", "1.3.6.1.4.1.4115.1.20.1.1.1.7.1.6.1", Ipv4, "Default IPv4 gateway"),
    attr("wan_current_gw_ipv6", "1.3.6.1.4.1.4115.1.20.1.1.1.7.1.6.2", Ipv6, "Default IPv6 gateway"),
    attr("wan_current_ipaddr_ipv4", "1.3.6.1.4.1.4115.1.20.1.1.1.7.1.3.1", Ipv4, "Current external IPv4 address"),
    attr("wan_current_ipaddr_ipv6", "1.3.6.1.4.1.4115.1.20.1.1.1.7.1.3.2", Ipv6, "Current external IPv6 address"),
    attr("wan_current_netmask", "1.3.6.1.4.1.4115.1.20.1.1.1.7.1.8.1", Ipv4, "WAN network mask"),
    attr("wan_dhcp_duration_ipv4", "1.3.6.1.4.1.4115.1.20.1.1.1.12.3.0", Integer, "Seconds the WAN DHCPv4 lease remains valid"),
    attr("wan_dhcp_duration_ipv6", "1.3.6.1.4.1.4115.1.20.1.1.1.12.7.0", Integer, "Seconds the WAN DHCPv6 lease remains valid"),
    attr("wan_dhcp_expire_ipv4", "1.3.6.1.4.1.4115.1.20.1.1.1.12.4.0", Timestamp, "Expiry of the WAN DHCPv4 lease"),
    attr("wan_dhcp_expire_ipv6", "1.3.6.1.4.1.4115.1.20.1.1.1.12.8.0", Timestamp, "Expiry of the WAN DHCPv6 lease"),
    attr("wan_dhcp_server_ip", "1.3.6.1.4.1.4115.1.20.1.1.1.12.9.0", Ipv4, "DHCP server that leased the WAN address"),
    attr("wan_if_macaddr", "1.3.6.1.4.1.4115.1.20.1.1.1.13.0", Mac, "MAC address of the WAN interface"),
    attr("wan_ip_prov_mode", "1.3.6.1.4.1.4115.1.20.1.1.1.17.0", Text, "eRouter initialization mode"),
    attr("wan_l2tp_enable_idle_timeout", "1.3.6.1.4.1.4115.1.20.1.1.1.10.3.0", Boolean, "Whether the WAN L2TP idle timeout is enabled"),
    attr("wan_l2tp_idle_timeout", "1.3.6.1.4.1.4115.1.20.1.1.1.10.4.0", Integer, "WAN L2TP idle timeout in seconds"),
    attr("wan_l2tp_keepalive_enabled", "1.3.6.1.4.1.4115.1.20.1.1.1.10.8.0", Boolean, "Whether WAN L2TP keepalive is enabled"),
    attr("wan_l2tp_keepalive_timeout", "1.3.6.1.4.1.4115.1.20.1.1.1.10.9.0", Integer, "WAN L2TP keepalive timeout"),
    attr("wan_l2tp_password", "1.3.6.1.4.1.4115.1.20.1.1.1.10.2.0", Text, "WAN L2TP password"),
    attr("wan_l2tp_tunnel_addr", "1.3.6.1.4.1.4115.1.20.1.1.1.10.6.0", Ipv4, "WAN L2TP tunnel server address"),
    attr("wan_l2tp_tunnel_hostname", "1.3.6.1.4.1.4115.1.20.1.1.1.10.7.0", Text, "WAN L2TP tunnel server host name"),
    attr("wan_l2tp_username", "1.3.6.1.4.1.4115.1.20.1.1.1.10.1.0", Text, "WAN L2TP user name"),
    attr("wan_mtu_size", "1.3.6.1.4.1.4115.1.20.1.1.1.4.0", Integer, "MTU on the WAN"),
    attr("wan_use_auto_dns", "1.3.6.1.4.1.4115.1.20.1.1.1.11.1.0", Boolean, "Use DNS servers provided by the ISP"),
    attr("wifi_24ghz_essid", "1.3.6.1.4.1.4115.1.20.1.1.3.22.1.2.10001", Text, "2.4 GHz WiFi network name"),
    attr("wifi_24ghz_password", "1.3.6.1.4.1.4115.1.20.1.1.3.26.1.2.10001", Text, "2.4 GHz WiFi password"),
    attr("wifi_5ghz_essid", "1.3.6.1.4.1.4115.1.20.1.1.3.22.1.2.10101", Text, "5 GHz WiFi network name"),
    attr("wifi_5ghz_password", "1.3.6.1.4.1.4115.1.20.1.1.3.26.1.2.10101", Text, "5 GHz WiFi password"),
];

/// Find an attribute by name.
pub fn lookup(name: &str) -> Option<&'static Attribute> {
    ATTRIBUTES
        .binary_search_by(|a| a.name.cmp(name))
        .ok()
        .map(|i| &ATTRIBUTES[i])
}

/// Text for a `docsis_base_tod_status` code.
pub fn tod_status_text(code: i64) -> Option<&'static str> {
    Some(match code {
        0 => "Not Provisioned",
        1..=3 => "Missing Server Address",
        4 => "Starting Request",
        5 => "Request Failed",
        6 => "No Response Received",
        7 => "Invalid Data Format",
        8 => "Retrieved",
        9 => "Failed",
        _ => return None,
    })
}

/// Render `value` for display, adding status text where the attribute has one.
pub fn display_value(attr: &Attribute, value: &AttributeValue) -> String {
    match (attr.name, value) {
        ("docsis_base_tod_status", AttributeValue::Integer(code)) => match tod_status_text(*code) {
            Some(text) => format!("{} ({})", code, text),
            None => format!("{} (unknown)", code),
        },
        _ => value.to_string(),
    }
}

impl<T: Transport> Client<T> {
    /// Read and decode an attribute. `None` means the hub reports it as unset.
    pub async fn read_attribute(&mut self, attr: &Attribute) -> Result<Option<AttributeValue>> {
        let wire = self.snmp_get(attr.oid).await?;
        AttributeValue::decode(attr.kind, &wire)
    }

    /// Read several attributes in one request.
    ///
    /// Attributes missing from the hub's answer are `None`, like unset ones.
    pub async fn read_attributes(
        &mut self,
        attrs: &[&Attribute],
    ) -> Result<Vec<(&'static str, Option<AttributeValue>)>> {
        let oids: Vec<&str> = attrs.iter().map(|a| a.oid).collect();
        let values = self.snmp_get_many(&oids).await?;
        attrs
            .iter()
            .map(|a| {
                let value = match values.get(a.oid) {
                    Some(wire) => AttributeValue::decode(a.kind, wire)?,
                    None => None,
                };
                Ok((a.name, value))
            })
            .collect()
    }

    /// Encode and write an attribute. The change takes effect after
    /// [`apply_settings`](Client::apply_settings).
    ///
    /// Returns `false` if the hub reported no change.
    pub async fn write_attribute(&mut self, attr: &Attribute, value: &AttributeValue) -> Result<bool> {
        if value.kind() != attr.kind {
            return Err(Error::invalid_value(
                attr.name,
                format!("expected {} value, got {}", attr.kind, value.kind()),
            ));
        }
        let wire = value.encode()?;
        self.snmp_set(attr.oid, Some(&wire), Some(attr.kind.datatype()))
            .await
    }
}
