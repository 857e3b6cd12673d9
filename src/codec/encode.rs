//! Wire value encoding (the inverse of [`decode`](super::decode)).

use std::fmt::Write;
use std::net::Ipv4Addr;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::{Error, Result, WireErrorKind};

use super::types::{Ipv6Address, MacAddress};

/// Encode bytes as `$` followed by lowercase hex.
fn dollar_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(1 + bytes.len() * 2);
    out.push('$');
    for b in bytes {
        // Writing to a String cannot fail
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Encode an IPv4 address as the hub represents it.
///
/// ```
/// use async_hub3::codec::encode_ipv4;
/// use std::net::Ipv4Addr;
///
/// assert_eq!(encode_ipv4(Ipv4Addr::new(192, 168, 4, 100)), "$c2a80464");
/// ```
pub fn encode_ipv4(addr: Ipv4Addr) -> String {
    dollar_hex(&addr.octets())
}

/// Encode an IPv6 address as `$` followed by 32 hex digits.
pub fn encode_ipv6(addr: Ipv6Address) -> String {
    dollar_hex(&addr.0.octets())
}

/// Encode a MAC address as `$` followed by 12 hex digits.
pub fn encode_mac(mac: MacAddress) -> String {
    dollar_hex(&mac.0)
}

/// Encode a timestamp, with a zero padding byte.
///
/// Fails for years that do not fit the 16-bit year field.
pub fn encode_timestamp(ts: &NaiveDateTime) -> Result<String> {
    let year = u16::try_from(ts.year())
        .map_err(|_| Error::wire(WireErrorKind::InvalidDate, ts.to_string()))?;
    let [hi, lo] = year.to_be_bytes();
    Ok(dollar_hex(&[
        hi,
        lo,
        ts.month() as u8,
        ts.day() as u8,
        ts.hour() as u8,
        ts.minute() as u8,
        ts.second() as u8,
        0,
    ]))
}

/// Encode an integer in decimal.
pub fn encode_int(value: i64) -> String {
    value.to_string()
}

/// Encode a boolean as `"1"` or `"0"`.
pub const fn encode_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
