//! Common test fixtures and constants.

use std::collections::BTreeMap;

// =============================================================================
// Credentials
// =============================================================================

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret+/=";

// =============================================================================
// Well-known OIDs
// =============================================================================

pub const SERIAL_NUMBER: &str = "1.3.6.1.4.1.4115.1.20.1.1.5.8.0";
pub const WAN_MTU: &str = "1.3.6.1.4.1.4115.1.20.1.1.1.4.0";
pub const LAN_GATEWAY: &str = "1.3.6.1.4.1.4115.1.20.1.1.2.2.1.5.200";
pub const CURRENT_TIME: &str = "1.3.6.1.4.1.4115.1.20.1.1.5.15.0";
pub const DNS_TABLE: &str = "1.3.6.1.4.1.4115.1.20.1.1.1.11.2.1";
pub const PORT_FORWARD_TABLE: &str = "1.3.6.1.4.1.4115.1.20.1.1.4.12.1";
pub const DEVICE_MACS: &str = "1.3.6.1.4.1.4115.1.20.1.1.2.4.2.1.4.200.1.4";
pub const DEVICE_NAMES: &str = "1.3.6.1.4.1.4115.1.20.1.1.2.4.2.1.3.200.1.4";
pub const DEVICE_CONNECTED: &str = "1.3.6.1.4.1.4115.1.20.1.1.2.4.2.1.14.200.1.4";

// =============================================================================
// Hub contents
// =============================================================================

/// Values of a freshly installed hub with one port forward and two devices.
pub fn hub_values() -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    let mut put = |oid: String, value: &str| {
        values.insert(oid, value.to_string());
    };

    put(async_hub3::client::AUTH_USERNAME_OID.to_string(), USERNAME);
    put(SERIAL_NUMBER.to_string(), "ABC123456789");
    put(WAN_MTU.to_string(), "1500");
    put(LAN_GATEWAY.to_string(), "$c0a80001");
    put(CURRENT_TIME.to_string(), "$07e2030e10071100");

    put(format!("{}.2.1", DNS_TABLE), "1");
    put(format!("{}.3.1", DNS_TABLE), "$c2a80001");
    put(format!("{}.2.2", DNS_TABLE), "1");
    put(format!("{}.3.2", DNS_TABLE), "$08080404");

    let pf = PORT_FORWARD_TABLE;
    put(format!("{pf}.1.1"), "1");
    put(format!("{pf}.2.1"), "ssh");
    put(format!("{pf}.3.1"), "2222");
    put(format!("{pf}.4.1"), "2222");
    put(format!("{pf}.5.1"), "1");
    put(format!("{pf}.6.1"), "1");
    put(format!("{pf}.7.1"), "$c0a8000a");
    put(format!("{pf}.9.1"), "22");
    put(format!("{pf}.10.1"), "22");
    put(format!("{pf}.11.1"), "1");

    put(format!("{}.192.168.0.10", DEVICE_MACS), "$787b8a6413f5");
    put(format!("{}.192.168.0.11", DEVICE_MACS), "$001122334455");
    put(format!("{}.192.168.0.10", DEVICE_NAMES), "laptop");
    put(format!("{}.192.168.0.11", DEVICE_NAMES), "unknown");
    put(format!("{}.192.168.0.10", DEVICE_CONNECTED), "1");
    put(format!("{}.192.168.0.11", DEVICE_CONNECTED), "0");

    values
}
