//! Attribute name hints.
//!
//! Lets the CLI tools accept catalogue names wherever an OID is expected, and
//! label OIDs with their names in output.

use crate::attribute::{self, ATTRIBUTES, Attribute};

/// Look up the catalogue attribute for an OID.
pub fn attribute_for(oid: &str) -> Option<&'static Attribute> {
    ATTRIBUTES.iter().find(|a| a.oid == oid)
}

/// Look up the attribute name for an OID.
pub fn lookup(oid: &str) -> Option<&'static str> {
    attribute_for(oid).map(|a| a.name)
}

/// An OID given on the command line, with its attribute if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub oid: String,
    pub attribute: Option<&'static Attribute>,
}

/// Parse an OID in dotted notation or an attribute name.
///
/// Names are matched case-insensitively, with `-` accepted for `_`.
pub fn parse_target(s: &str) -> Result<Target, String> {
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        let valid = s
            .split('.')
            .all(|arc| !arc.is_empty() && arc.bytes().all(|b| b.is_ascii_digit()));
        if !valid {
            return Err(format!("invalid OID '{}'", s));
        }
        return Ok(Target {
            oid: s.to_string(),
            attribute: attribute_for(s),
        });
    }

    let name = s.to_ascii_lowercase().replace('-', "_");
    match attribute::lookup(&name) {
        Some(attr) => Ok(Target {
            oid: attr.oid.to_string(),
            attribute: Some(attr),
        }),
        None => Err(format!(
            "unknown attribute '{}'; use dotted notation or see hub3-info --list",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("1.3.6.1.4.1.4115.1.20.1.1.5.8.0"), Some("serial_number"));
        assert_eq!(lookup("1.3.6.1.99"), None);
    }

    #[test]
    fn test_parse_dotted() {
        let target = parse_target("1.3.6.1.4.1.4115.1.20.1.1.1.4.0").unwrap();
        assert_eq!(target.attribute.map(|a| a.name), Some("wan_mtu_size"));

        let target = parse_target("1.2.3").unwrap();
        assert_eq!(target.oid, "1.2.3");
        assert!(target.attribute.is_none());

        assert!(parse_target("1..2").is_err());
        assert!(parse_target("1.2.").is_err());
        assert!(parse_target("1.2a").is_err());
    }

    #[test]
    fn test_parse_name() {
        let target = parse_target("Serial-Number").unwrap();
        assert_eq!(target.oid, "1.3.6.1.4.1.4115.1.20.1.1.5.8.0");
        assert!(parse_target("no_such_thing").is_err());
    }
}
