//! Wire value decoding.

use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result, WireErrorKind};

use super::types::{IpAddress, IpVersion, Ipv6Address, MacAddress};

/// Decode a `$`-prefixed hex value of exactly `N` bytes.
fn hex_bytes<const N: usize>(wire: &str) -> Result<[u8; N]> {
    let digits = wire
        .strip_prefix('$')
        .ok_or_else(|| Error::wire(WireErrorKind::MissingPrefix, wire))?;

    if digits.len() != N * 2 {
        return Err(Error::wire(
            WireErrorKind::InvalidLength {
                expected: N * 2,
                actual: digits.len(),
            },
            wire,
        ));
    }
    // from_str_radix would accept a leading '+'
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::wire(WireErrorKind::InvalidHex, wire));
    }

    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| Error::wire(WireErrorKind::InvalidHex, wire))?;
    }
    Ok(out)
}

/// Decode an IPv4 address.
///
/// The wire format is `$` followed by 8 hex digits in dotted-quad order,
/// e.g. `"$c2a80464"` is `192.168.4.100`. An empty value and, when
/// `zero_is_none` is set, `0.0.0.0` decode to `None`.
///
/// # Examples
///
/// ```
/// use async_hub3::codec::decode_ipv4;
/// use std::net::Ipv4Addr;
///
/// assert_eq!(decode_ipv4("$c2a80464", true).unwrap(), Some(Ipv4Addr::new(192, 168, 4, 100)));
/// assert_eq!(decode_ipv4("$00000000", true).unwrap(), None);
/// assert_eq!(decode_ipv4("$00000000", false).unwrap(), Some(Ipv4Addr::UNSPECIFIED));
/// ```
pub fn decode_ipv4(wire: &str, zero_is_none: bool) -> Result<Option<Ipv4Addr>> {
    if wire.is_empty() {
        return Ok(None);
    }
    let addr = Ipv4Addr::from(hex_bytes::<4>(wire)?);
    if zero_is_none && addr.is_unspecified() {
        return Ok(None);
    }
    Ok(Some(addr))
}

/// Decode an IPv6 address (`$` followed by 32 hex digits).
///
/// An empty value and, when `zero_is_none` is set, the all-zero address
/// decode to `None`.
pub fn decode_ipv6(wire: &str, zero_is_none: bool) -> Result<Option<Ipv6Address>> {
    if wire.is_empty() {
        return Ok(None);
    }
    let addr = Ipv6Addr::from(hex_bytes::<16>(wire)?);
    if zero_is_none && addr.is_unspecified() {
        return Ok(None);
    }
    Ok(Some(Ipv6Address(addr)))
}

/// Decode an address whose family is given by a companion address-type column.
pub fn decode_ip(wire: &str, version: IpVersion, zero_is_none: bool) -> Result<Option<IpAddress>> {
    match version {
        IpVersion::V4 => Ok(decode_ipv4(wire, zero_is_none)?.map(IpAddress::V4)),
        IpVersion::V6 => Ok(decode_ipv6(wire, zero_is_none)?.map(IpAddress::V6)),
    }
}

/// Decode a MAC address (`$` followed by 12 hex digits).
///
/// ```
/// use async_hub3::codec::decode_mac;
///
/// let mac = decode_mac("$787b8a6413f5").unwrap();
/// assert_eq!(mac.to_string(), "78:7b:8a:64:13:f5");
/// ```
pub fn decode_mac(wire: &str) -> Result<MacAddress> {
    hex_bytes::<6>(wire).map(MacAddress)
}

/// Decode a timestamp.
///
/// The wire format is `$` followed by 16 hex digits: year (4 digits), then
/// month, day, hour, minute, second and one padding byte (2 digits each).
/// `"$07e2030e10071100"` is 2018-03-14 16:07:17.
///
/// Empty values and the all-zero pattern decode to `None`. Fields outside
/// the calendar are rejected rather than wrapped.
pub fn decode_timestamp(wire: &str) -> Result<Option<NaiveDateTime>> {
    if wire.is_empty() {
        return Ok(None);
    }
    let bytes = hex_bytes::<8>(wire)?;
    if bytes.iter().all(|&b| b == 0) {
        return Ok(None);
    }

    let year = u16::from_be_bytes([bytes[0], bytes[1]]);
    let [_, _, month, day, hour, minute, second, _padding] = bytes;

    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
        .and_then(|date| date.and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second)))
        .map(Some)
        .ok_or_else(|| Error::wire(WireErrorKind::InvalidDate, wire))
}

/// Decode a decimal integer.
///
/// An empty value decodes to `None`, as does `0` when `zero_is_none` is set.
pub fn decode_int(wire: &str, zero_is_none: bool) -> Result<Option<i64>> {
    let trimmed = wire.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| Error::wire(WireErrorKind::InvalidInteger, wire))?;
    if zero_is_none && value == 0 {
        return Ok(None);
    }
    Ok(Some(value))
}

/// Decode a boolean: `"0"` is false, an empty value is `None`, anything else is true.
pub fn decode_bool(wire: &str) -> Option<bool> {
    match wire.trim() {
        "" => None,
        "0" => Some(false),
        _ => Some(true),
    }
}
