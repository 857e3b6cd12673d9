//! SNMP GET and SET over the hub's JSON endpoints.

use std::collections::BTreeMap;

use tokio::time::Instant;
use tracing::instrument;

use crate::codec::{DataType, WireValue};
use crate::error::{Error, ProtocolErrorKind, Result};
use crate::transport::{Request, Response, Transport};

use super::Client;

/// OID that makes saved settings take effect when set to 1.
pub const COMMIT_OID: &str = "1.3.6.1.4.1.4115.1.20.1.1.9.0";

/// Parse a JSON object of OID to value. Non-string values are kept as their
/// JSON text.
pub(crate) fn parse_value_map(path: &str, body: &str) -> Result<BTreeMap<String, WireValue>> {
    let map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(body).map_err(|e| {
            tracing::warn!(target: "async_hub3::client", { hub.path = path, body = body, error = %e }, "response is not a JSON object");
            Error::protocol(path, ProtocolErrorKind::InvalidJson(e.to_string().into()))
        })?;

    Ok(map
        .into_iter()
        .map(|(oid, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (oid, value)
        })
        .collect())
}

/// Build the `oid=value;type` expression for `snmpSet`.
fn set_expression(oid: &str, value: Option<&str>, datatype: Option<DataType>) -> String {
    let mut expr = oid.to_string();
    if let Some(value) = value {
        expr.push('=');
        if datatype == Some(DataType::OctetString) {
            expr.push_str(&value.replace('$', "%24"));
        } else {
            expr.push_str(value);
        }
    }
    expr.push(';');
    if let Some(datatype) = datatype {
        expr.push_str(&datatype.to_string());
    }
    expr
}

impl<T: Transport> Client<T> {
    /// Get a single value.
    ///
    /// Fails with [`Error::MissingOid`] if the hub's answer lacks the OID.
    #[instrument(skip(self, oid), err, fields(hub.url = %self.transport.base_url(), hub.oid = %oid, hub.relogins = tracing::field::Empty))]
    pub async fn snmp_get(&mut self, oid: &str) -> Result<WireValue> {
        let start = Instant::now();
        let result = self.snmp_get_many(&[oid]).await.and_then(|mut values| {
            values
                .remove(oid)
                .ok_or_else(|| Error::MissingOid { oid: oid.into() })
        });
        self.stats.record("snmp_get", start.elapsed());
        result
    }

    /// Get several values in one request.
    ///
    /// The result is keyed by OID. OIDs the hub does not know are usually
    /// absent from the map.
    #[instrument(skip(self, oids), err, fields(hub.url = %self.transport.base_url(), hub.oid_count = oids.len(), hub.relogins = tracing::field::Empty))]
    pub async fn snmp_get_many<S: AsRef<str>>(
        &mut self,
        oids: &[S],
    ) -> Result<BTreeMap<String, WireValue>> {
        let start = Instant::now();
        let mut query = String::from("oids=");
        for oid in oids {
            query.push_str(oid.as_ref());
            query.push(';');
        }
        query.push('&');
        query.push_str(&self.nonce.query());

        let budget = self.default_budget();
        let result = self
            .authenticated_get(Request::new("snmpGet").raw_query(query), budget)
            .await
            .and_then(|response| parse_value_map("snmpGet", &response.text()));
        self.stats.record("snmp_get_many", start.elapsed());
        result
    }

    /// Set a value.
    ///
    /// Returns `false` if the hub answered HTTP 304 (no change), `true` if it
    /// accepted the new value. Accepted values are saved but not in effect
    /// until [`apply_settings`](Client::apply_settings).
    ///
    /// `$` in string values is sent as `%24`.
    #[instrument(skip(self, oid, value), err, fields(hub.url = %self.transport.base_url(), hub.oid = %oid, hub.relogins = tracing::field::Empty))]
    pub async fn snmp_set(
        &mut self,
        oid: &str,
        value: Option<&str>,
        datatype: Option<DataType>,
    ) -> Result<bool> {
        let start = Instant::now();
        let result = self.snmp_set_inner(oid, value, datatype).await;
        self.stats.record("snmp_set", start.elapsed());
        result
    }

    async fn snmp_set_inner(
        &mut self,
        oid: &str,
        value: Option<&str>,
        datatype: Option<DataType>,
    ) -> Result<bool> {
        let query = format!(
            "oid={};&{}",
            set_expression(oid, value, datatype),
            self.nonce.query()
        );
        let budget = self.default_budget();
        let response: Response = self
            .authenticated_get(Request::new("snmpSet").raw_query(query), budget)
            .await?;

        if response.status == 304 {
            tracing::debug!(target: "async_hub3::client", { hub.oid = oid }, "value unchanged");
            return Ok(false);
        }

        let text = response.text();
        let values = parse_value_map("snmpSet", &text)?;
        if !values.contains_key(oid) {
            tracing::warn!(target: "async_hub3::client", { hub.oid = oid, body = %text }, "hub refused to set value");
            return Err(Error::SetRejected {
                oid: oid.into(),
                response: text.as_ref().into(),
            });
        }

        self.unapplied_settings = true;
        Ok(true)
    }

    /// Make saved settings take effect. Does nothing if there are none.
    #[instrument(skip(self), err, fields(hub.url = %self.transport.base_url()))]
    pub async fn apply_settings(&mut self) -> Result<()> {
        if !self.unapplied_settings {
            return Ok(());
        }
        let start = Instant::now();
        let result = self
            .snmp_set(COMMIT_OID, Some("1"), Some(DataType::Integer))
            .await
            .map(|_| ());
        if result.is_ok() {
            self.unapplied_settings = false;
        }
        self.stats.record("apply_settings", start.elapsed());
        result
    }
}
