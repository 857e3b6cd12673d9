//! Datatype tags for SNMP SET expressions.
//!
//! The `snmpSet` endpoint takes `oid=value;type`, where `type` is the decimal
//! BER tag number of the value's ASN.1 type.

/// BER tag numbers accepted by the hub in SET expressions.
pub mod tag {
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    /// Gauge32, also Unsigned32.
    pub const GAUGE32: u8 = 0x42;
}

/// Datatype of a value written with `snmpSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// INTEGER, used for enums, booleans and counters.
    Integer,
    /// OCTET STRING. Literal `$` characters are percent-encoded on the wire.
    OctetString,
    /// Unsigned32, used for port numbers.
    Unsigned32,
}

impl DataType {
    /// The BER tag number for this type.
    pub const fn tag(self) -> u8 {
        match self {
            DataType::Integer => tag::INTEGER,
            DataType::OctetString => tag::OCTET_STRING,
            DataType::Unsigned32 => tag::GAUGE32,
        }
    }

    /// Create from a BER tag number.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            tag::INTEGER => Some(DataType::Integer),
            tag::OCTET_STRING => Some(DataType::OctetString),
            tag::GAUGE32 => Some(DataType::Unsigned32),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for DataType {
    type Err = String;

    /// Parse a type name (`int`, `string`, `port`) or a decimal tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(DataType::Integer),
            "string" | "str" | "octetstring" => Ok(DataType::OctetString),
            "port" | "unsigned" | "unsigned32" | "gauge32" => Ok(DataType::Unsigned32),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(DataType::from_tag)
                .ok_or_else(|| format!("unknown datatype '{}'", s)),
        }
    }
}
