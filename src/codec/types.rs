//! Native types produced by the wire codec.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A 48-bit MAC address, displayed as six lowercase colon-separated groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// The address octets.
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}

impl std::str::FromStr for MacAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| format!("invalid MAC address '{}'", s))?;
            if part.len() != 2 {
                return Err(format!("invalid MAC address '{}'", s));
            }
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| format!("invalid MAC address '{}'", s))?;
        }
        if parts.next().is_some() {
            return Err(format!("invalid MAC address '{}'", s));
        }
        Ok(MacAddress(octets))
    }
}

/// An IPv6 address displayed in the hub's fully expanded form.
///
/// Unlike [`Ipv6Addr`]'s `Display`, no zero compression is applied: every
/// one of the eight groups is printed as four lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv6Address(pub Ipv6Addr);

impl Ipv6Address {
    /// The underlying standard library address.
    pub const fn addr(&self) -> Ipv6Addr {
        self.0
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(addr: Ipv6Addr) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.0.segments().iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:04x}", group)?;
        }
        Ok(())
    }
}

/// Address family column that accompanies addresses in hub tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    /// InetAddressType ipv4(1).
    V4,
    /// InetAddressType ipv6(2).
    V6,
}

impl IpVersion {
    /// Parse the wire value of an address-type column.
    pub fn from_wire(wire: &str) -> Option<Self> {
        match wire.trim() {
            "1" => Some(IpVersion::V4),
            "2" => Some(IpVersion::V6),
            _ => None,
        }
    }

    /// Wire value of this address type.
    pub const fn as_wire(self) -> &'static str {
        match self {
            IpVersion::V4 => "1",
            IpVersion::V6 => "2",
        }
    }
}

/// An IPv4 or IPv6 address decoded according to an [`IpVersion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpAddress {
    V4(Ipv4Addr),
    V6(Ipv6Address),
}

impl IpAddress {
    /// The address family.
    pub const fn version(&self) -> IpVersion {
        match self {
            IpAddress::V4(_) => IpVersion::V4,
            IpAddress::V6(_) => IpVersion::V6,
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddress::V4(addr) => addr.fmt(f),
            IpAddress::V6(addr) => addr.fmt(f),
        }
    }
}
