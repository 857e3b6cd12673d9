//! Shared pieces of the `hub3-*` command-line tools.
//!
//! [`args`] holds the connection and output flags every tool accepts,
//! [`hints`] turns attribute names into OIDs, and [`output`] prints values,
//! tables and errors. Requires the `cli` feature.

pub mod args;
pub mod hints;
pub mod output;
