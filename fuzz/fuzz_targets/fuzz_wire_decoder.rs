#![no_main]

use libfuzzer_sys::fuzz_target;

use async_hub3::AttributeKind;
use async_hub3::AttributeValue;
use async_hub3::codec::{decode_int, decode_ipv4, decode_ipv6, decode_mac, decode_timestamp};

const KINDS: [AttributeKind; 7] = [
    AttributeKind::String,
    AttributeKind::Integer,
    AttributeKind::Boolean,
    AttributeKind::Ipv4,
    AttributeKind::Ipv6,
    AttributeKind::Mac,
    AttributeKind::Timestamp,
];

fuzz_target!(|data: &[u8]| {
    let Ok(wire) = std::str::from_utf8(data) else {
        return;
    };

    let _ = decode_ipv4(wire, true);
    let _ = decode_ipv6(wire, false);
    let _ = decode_mac(wire);
    let _ = decode_int(wire, true);

    // Anything that decodes must encode again
    if let Ok(Some(ts)) = decode_timestamp(wire) {
        let _ = async_hub3::codec::encode_timestamp(&ts);
    }
    for kind in KINDS {
        if let Ok(Some(value)) = AttributeValue::decode(kind, wire) {
            let _ = value.encode();
            let _ = AttributeValue::parse(kind, &value.to_string());
        }
    }
});
