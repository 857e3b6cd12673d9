//! Table assembly from walk results.
//!
//! Hub tables are walked as flat maps of `<top>.<column>.<row>[.<more>]` to
//! value. [`assemble_table`] groups those entries into rows using a mapping
//! from column segment to column name.
//!
//! ```
//! use async_hub3::table::assemble_table;
//! use std::collections::BTreeMap;
//!
//! let walk: BTreeMap<String, String> = [
//!     ("1.2.3.2.1", "a1"),
//!     ("1.2.3.3.1", "b1"),
//!     ("1.2.3.2.2", "a2"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let rows = assemble_table("1.2.3", &[("2", "a"), ("3", "b")], &walk);
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[1].index, 2);
//! assert_eq!(rows[1].get("a"), Some("a2"));
//! assert_eq!(rows[1].get("b"), None);
//! ```

use std::collections::BTreeMap;

use crate::codec::WireValue;

/// One table row.
///
/// Every declared column is present in `cells`; columns the walk did not
/// return are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Row index, unique within one walk.
    pub index: u32,
    /// Column name to value.
    pub cells: BTreeMap<String, Option<WireValue>>,
}

impl TableRow {
    /// Value of column `name`, if the walk returned it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells.get(name)?.as_deref()
    }
}

/// Split `oid` below `top_oid` into column segment and row index.
fn locate<'a>(top_oid: &str, oid: &'a str) -> Option<(&'a str, u32)> {
    let rest = oid.strip_prefix(top_oid)?.strip_prefix('.')?;
    let mut segments = rest.split('.');
    let column = segments.next()?;
    let row = segments.next()?.parse().ok()?;
    Some((column, row))
}

/// Group walk entries under `top_oid` into rows.
///
/// `columns` maps the OID segment right after `top_oid` to a column name.
/// The following segment is the row index. Entries outside `top_oid`, with
/// undeclared columns, or with a non-numeric row index are ignored. If two
/// entries land in the same cell, the one with the greater OID wins. Rows
/// are returned in ascending index order.
pub fn assemble_table<'w, I>(top_oid: &str, columns: &[(&str, &str)], walk: I) -> Vec<TableRow>
where
    I: IntoIterator<Item = (&'w String, &'w WireValue)>,
{
    let mut entries: Vec<(u32, &str, &str, &str, &WireValue)> = walk
        .into_iter()
        .filter_map(|(oid, value)| {
            let (column, row) = locate(top_oid, oid)?;
            let (_, name) = columns.iter().find(|(segment, _)| *segment == column)?;
            Some((row, column, oid.as_str(), *name, value))
        })
        .collect();
    entries.sort_by(|a, b| (a.0, a.1, a.2).cmp(&(b.0, b.1, b.2)));

    let mut rows: Vec<TableRow> = Vec::new();
    for (row, _, _, name, value) in entries {
        if rows.last().map(|r| r.index) != Some(row) {
            rows.push(TableRow {
                index: row,
                cells: columns
                    .iter()
                    .map(|(_, name)| (name.to_string(), None))
                    .collect(),
            });
        }
        if let Some(current) = rows.last_mut() {
            current.cells.insert(name.to_string(), Some(value.clone()));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(entries: &[(&str, &str)]) -> BTreeMap<String, WireValue> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_locate() {
        assert_eq!(locate("1.2.3", "1.2.3.4.5"), Some(("4", 5)));
        assert_eq!(locate("1.2.3", "1.2.3.4.5.6.7"), Some(("4", 5)));
        assert_eq!(locate("1.2.3", "1.2.34.5.6"), None);
        assert_eq!(locate("1.2.3", "1.2.3.4"), None);
        assert_eq!(locate("1.2.3", "1.2.3.4.x"), None);
        assert_eq!(locate("1.2.3", "9.9"), None);
    }

    #[test]
    fn test_missing_cells_are_none() {
        let w = walk(&[("9.1.2.1", "a1"), ("9.1.3.1", "b1"), ("9.1.2.2", "a2")]);
        let rows = assemble_table("9.1", &[("2", "a"), ("3", "b")], &w);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].get("a"), Some("a1"));
        assert_eq!(rows[0].get("b"), Some("b1"));
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].get("a"), Some("a2"));
        assert_eq!(rows[1].cells.get("b"), Some(&None));
    }

    #[test]
    fn test_discards_foreign_entries() {
        let w = walk(&[
            ("9.1.2.1", "keep"),
            ("9.1.7.1", "undeclared column"),
            ("9.1.2.x", "bad row"),
            ("9.10.2.1", "sibling table"),
            ("1", "Finish"),
        ]);
        let rows = assemble_table("9.1", &[("2", "a")], &w);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some("keep"));
    }

    #[test]
    fn test_rows_sorted_numerically() {
        let w = walk(&[("9.1.2.10", "ten"), ("9.1.2.9", "nine"), ("9.1.2.100", "hundred")]);
        let rows = assemble_table("9.1", &[("2", "a")], &w);
        let indexes: Vec<u32> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![9, 10, 100]);
    }

    #[test]
    fn test_row_without_declared_columns_is_absent() {
        let w = walk(&[("9.1.5.3", "x"), ("9.1.2.4", "y")]);
        let rows = assemble_table("9.1", &[("2", "a")], &w);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 4);
    }

    #[test]
    fn test_empty_walk() {
        let rows = assemble_table("9.1", &[("2", "a")], &BTreeMap::new());
        assert!(rows.is_empty());
    }
}
