#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;

use async_hub3::assemble_table;

// Each input line is `oid=value`; the first line is the table OID.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut lines = text.lines();
    let Some(top) = lines.next() else {
        return;
    };
    let walk: BTreeMap<String, String> = lines
        .filter_map(|line| line.split_once('='))
        .map(|(oid, value)| (oid.to_string(), value.to_string()))
        .collect();

    let rows = assemble_table(top, &[("1", "a"), ("2", "b"), ("10", "c")], &walk);
    for pair in rows.windows(2) {
        assert!(pair[0].index < pair[1].index);
    }
});
