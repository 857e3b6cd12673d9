//! Output formatting for CLI tools.
//!
//! Supports human-readable, JSON, and raw output formats.

use crate::attribute::{AttributeValue, display_value};
use crate::cli::args::OutputFormat;
use crate::cli::hints;
use crate::stats::Stats;
use crate::table::TableRow;
use crate::{Attribute, Error};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

/// A single value result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueEntry {
    pub oid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Value as sent by the hub.
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<String>,
}

impl ValueEntry {
    /// An entry for `oid`, decoded if it names a catalogue attribute.
    pub fn new(oid: impl Into<String>, value: impl Into<String>) -> Self {
        let oid = oid.into();
        let attribute = hints::attribute_for(&oid);
        Self::with_attribute(oid, value, attribute)
    }

    /// An entry decoded as `attribute`, when given.
    pub fn with_attribute(
        oid: impl Into<String>,
        value: impl Into<String>,
        attribute: Option<&Attribute>,
    ) -> Self {
        let value = value.into();
        let decoded = attribute.and_then(|attr| match AttributeValue::decode(attr.kind, &value) {
            Ok(decoded) => decoded.map(|v| display_value(attr, &v)),
            Err(e) => {
                tracing::warn!(target: "async_hub3::cli", { attribute = attr.name, error = %e }, "cannot decode value");
                None
            }
        });
        Self {
            oid: oid.into(),
            name: attribute.map(|a| a.name.to_string()),
            kind: attribute.map(|a| a.kind.to_string()),
            value,
            decoded,
        }
    }
}

/// Result of a GET/WALK operation, ready for output.
#[derive(Debug, Serialize)]
pub struct OperationResult<'a> {
    pub host: &'a str,
    pub results: &'a [ValueEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing_ms: Option<f64>,
}

/// Output context for formatting.
pub struct OutputContext {
    pub format: OutputFormat,
    pub show_timing: bool,
}

impl OutputContext {
    /// Create a new output context with default settings.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            show_timing: false,
        }
    }

    /// Write value results to stdout.
    pub fn write_results(
        &self,
        host: &str,
        entries: &[ValueEntry],
        elapsed: Option<Duration>,
    ) -> io::Result<()> {
        let result = OperationResult {
            host,
            results: entries,
            timing_ms: elapsed
                .filter(|_| self.show_timing)
                .map(|d| d.as_secs_f64() * 1000.0),
        };
        self.write_to(&mut io::stdout().lock(), &result)
    }

    fn write_to<W: Write>(&self, w: &mut W, result: &OperationResult<'_>) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => self.write_human(w, result),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
                writeln!(w, "{}", json)
            }
            OutputFormat::Raw => {
                for entry in result.results {
                    writeln!(w, "{}\t{}", entry.oid, entry.value)?;
                }
                Ok(())
            }
        }
    }

    fn write_human<W: Write>(&self, w: &mut W, result: &OperationResult<'_>) -> io::Result<()> {
        for entry in result.results {
            match &entry.name {
                Some(name) => write!(w, "{} ({})", name, entry.oid)?,
                None => write!(w, "{}", entry.oid)?,
            }
            match (&entry.decoded, &entry.kind) {
                (Some(decoded), Some(kind)) => writeln!(w, " = {}: {}", kind, decoded)?,
                (None, Some(kind)) if entry.value.is_empty() => writeln!(w, " = {}: (unset)", kind)?,
                _ => writeln!(w, " = \"{}\"", entry.value)?,
            }
        }

        if let Some(ms) = result.timing_ms {
            writeln!(w, "\nTiming: {:.1}ms", ms)?;
        }
        Ok(())
    }

    /// Write table rows to stdout.
    pub fn write_rows(&self, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
        write_rows_to(&mut io::stdout().lock(), self.format, headers, rows)
    }
}

fn write_rows_to<W: Write>(
    w: &mut W,
    format: OutputFormat,
    headers: &[&str],
    rows: &[Vec<String>],
) -> io::Result<()> {
    match format {
        OutputFormat::Human => write_table(w, headers, rows),
        OutputFormat::Json => {
            let objects: Vec<BTreeMap<&str, &str>> = rows
                .iter()
                .map(|row| {
                    headers
                        .iter()
                        .zip(row)
                        .filter(|(_, cell)| !cell.is_empty())
                        .map(|(h, cell)| (*h, cell.as_str()))
                        .collect()
                })
                .collect();
            let json = serde_json::to_string_pretty(&objects).map_err(io::Error::other)?;
            writeln!(w, "{}", json)
        }
        OutputFormat::Raw => {
            for row in rows {
                writeln!(w, "{}", row.join("\t"))?;
            }
            Ok(())
        }
    }
}

/// Convert assembled rows to text cells, index first. Absent cells are empty.
pub fn table_cells(columns: &[&str], rows: &[TableRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            std::iter::once(row.index.to_string())
                .chain(
                    columns
                        .iter()
                        .map(|c| row.get(c).unwrap_or_default().to_string()),
                )
                .collect()
        })
        .collect()
}

/// Write a boxed text table.
///
/// ```text
/// +-------+------+
/// | index | name |
/// +-------+------+
/// | 1     | a    |
/// +-------+------+
/// ```
pub fn write_table<W: Write>(w: &mut W, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .fold(h.chars().count(), usize::max)
        })
        .collect();

    let rule: String = widths.iter().fold(String::from("+"), |mut s, &width| {
        s.push_str(&"-".repeat(width + 2));
        s.push('+');
        s
    });

    writeln!(w, "{}", rule)?;
    write_line(w, &widths, headers.iter().copied())?;
    writeln!(w, "{}", rule)?;
    for row in rows {
        let cells = row
            .iter()
            .map(String::as_str)
            .chain(std::iter::repeat(""))
            .take(headers.len());
        write_line(w, &widths, cells)?;
    }
    writeln!(w, "{}", rule)
}

fn write_line<'a, W: Write>(
    w: &mut W,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> io::Result<()> {
    write!(w, "|")?;
    for (cell, &width) in cells.zip(widths) {
        write!(w, " {:<width$} |", cell, width = width)?;
    }
    writeln!(w)
}

/// Write request statistics to stderr.
pub fn write_stats(stats: &Stats) {
    eprint!("{}", stats);
}

/// Write an error message to stderr.
pub fn write_error(err: &Error) {
    eprintln!("Error: {}", err);
    match err {
        Error::AccessDenied { .. } => eprintln!("hint: pass --password or set HUB_PASSWORD"),
        Error::LoginFailed { .. } => eprintln!("hint: check the user name and password"),
        _ => {}
    }
}
