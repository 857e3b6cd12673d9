#![no_main]

use libfuzzer_sys::fuzz_target;

use async_hub3::client::filter_walk_body;

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = std::str::from_utf8(data) {
        let filtered = filter_walk_body(body);
        assert!(filtered.len() <= body.len());
        assert_eq!(filter_walk_body(&filtered), filtered);
    }
});
