//! hub3-walk: Walk an OID subtree on a hub.
//!
//! Part of the async-hub3 CLI utilities.

use async_hub3::cli::args::{CommonArgs, OutputArgs};
use async_hub3::cli::hints::parse_target;
use async_hub3::cli::output::{OutputContext, ValueEntry, table_cells, write_error, write_stats};
use async_hub3::table::assemble_table;
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;

/// Walk all values under an OID of a Virgin Media Hub 3.
///
/// With --column, the walk is assembled into table rows, e.g.
///
///   hub3-walk 1.3.6.1.4.1.4115.1.20.1.1.1.11.2.1 -c 2=addrtype -c 3=address
#[derive(Debug, Parser)]
#[command(name = "hub3-walk", version, about, verbatim_doc_comment)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// OID of the subtree or table to walk.
    #[arg(value_name = "OID")]
    oid: String,

    /// Table column as SEGMENT=NAME, where SEGMENT is the OID arc after
    /// the walked OID. May be repeated.
    #[arg(short = 'c', long = "column", value_name = "SEGMENT=NAME", value_parser = parse_column)]
    columns: Vec<(String, String)>,
}

fn parse_column(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((segment, name))
            if !segment.is_empty()
                && segment.bytes().all(|b| b.is_ascii_digit())
                && !name.is_empty() =>
        {
            Ok((segment.to_string(), name.to_string()))
        }
        _ => Err(format!("expected SEGMENT=NAME, got '{}'", s)),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.output.init_tracing();

    let target = match parse_target(&args.oid) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut client = match args.common.connect().await {
        Ok(client) => client,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let result = client.snmp_walk(&target.oid).await;
    let elapsed = start.elapsed();
    if args.output.stats {
        write_stats(client.stats());
    }

    let walk = match client.finish(result).await {
        Ok(walk) => walk,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let ctx = OutputContext {
        format: args.output.format,
        show_timing: args.output.timing,
    };
    let written = if args.columns.is_empty() {
        let entries: Vec<ValueEntry> = walk
            .iter()
            .map(|(oid, value)| ValueEntry::new(oid, value))
            .collect();
        ctx.write_results(&args.common.host, &entries, Some(elapsed))
    } else {
        let columns: Vec<(&str, &str)> = args
            .columns
            .iter()
            .map(|(segment, name)| (segment.as_str(), name.as_str()))
            .collect();
        let rows = assemble_table(&target.oid, &columns, &walk);
        let names: Vec<&str> = columns.iter().map(|(_, name)| *name).collect();
        let headers: Vec<&str> = std::iter::once("index").chain(names.iter().copied()).collect();
        ctx.write_rows(&headers, &table_cells(&names, &rows))
    };

    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
