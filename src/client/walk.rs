//! SNMP walk over the hub's `/walk` endpoint.
//!
//! The hub answers a walk with one JSON object of every OID under the
//! requested prefix. Two quirks are cleaned up here: the body sometimes
//! contains a bare `Error in OID formatting!` line that breaks the JSON, and
//! the object ends with a `"1": "Finish"` sentinel entry.

use std::collections::BTreeMap;

use tokio::time::Instant;
use tracing::instrument;

use crate::codec::WireValue;
use crate::error::Result;
use crate::transport::{Request, Transport};

use super::Client;
use super::snmp::parse_value_map;

const OID_FORMATTING_ERROR: &str = "Error in OID formatting!";

/// Drop lines consisting exactly of the hub's spurious formatting error.
///
/// ```
/// use async_hub3::client::filter_walk_body;
///
/// let body = "{\"1.2.1\": \"a\",\nError in OID formatting!\n\"1\": \"Finish\"}";
/// assert_eq!(filter_walk_body(body), "{\"1.2.1\": \"a\",\n\"1\": \"Finish\"}");
/// ```
pub fn filter_walk_body(body: &str) -> String {
    body.split('\n')
        .filter(|line| *line != OID_FORMATTING_ERROR)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a walk body into an OID to value map, without the sentinel entry.
pub(crate) fn parse_walk_body(body: &str) -> Result<BTreeMap<String, WireValue>> {
    let mut values = parse_value_map("walk", &filter_walk_body(body))?;
    if values.get("1").map(String::as_str) == Some("Finish") {
        values.remove("1");
    }
    Ok(values)
}

impl<T: Transport> Client<T> {
    /// Walk all OIDs under `oid`.
    ///
    /// The result is keyed by OID in string order, not OID order. Use
    /// [`assemble_table`](crate::table::assemble_table) to turn a walk of a
    /// table into rows.
    #[instrument(skip(self, oid), err, fields(hub.url = %self.transport.base_url(), hub.oid = %oid, hub.relogins = tracing::field::Empty))]
    pub async fn snmp_walk(&mut self, oid: &str) -> Result<BTreeMap<String, WireValue>> {
        let start = Instant::now();
        let query = format!("oids={};{}", oid, self.nonce.query());
        let budget = self.default_budget();
        let result = self
            .authenticated_get(Request::new("walk").raw_query(query), budget)
            .await
            .and_then(|response| parse_walk_body(&response.text()));
        if let Ok(values) = &result {
            tracing::debug!(target: "async_hub3::client", { hub.oid = oid, hub.entries = values.len() }, "walk complete");
        }
        self.stats.record("snmp_walk", start.elapsed());
        result
    }
}
