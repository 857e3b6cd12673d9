//! hub3-get: Read values from a hub.
//!
//! Part of the async-hub3 CLI utilities.

use async_hub3::cli::args::{CommonArgs, OutputArgs};
use async_hub3::cli::hints::{Target, parse_target};
use async_hub3::cli::output::{OutputContext, ValueEntry, write_error, write_stats};
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;

/// Read one or more values from a Virgin Media Hub 3.
///
/// Targets are dotted OIDs or attribute names (see `hub3-info --list`).
#[derive(Debug, Parser)]
#[command(name = "hub3-get", version, about, verbatim_doc_comment)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// OIDs or attribute names to read.
    #[arg(required = true, value_name = "TARGET")]
    targets: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.output.init_tracing();

    let targets = match args
        .targets
        .iter()
        .map(|t| parse_target(t))
        .collect::<Result<Vec<Target>, String>>()
    {
        Ok(targets) => targets,
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
    let oids: Vec<&str> = targets.iter().map(|t| t.oid.as_str()).collect();
    let result = client.snmp_get_many(&oids).await;
    let elapsed = start.elapsed();
    if args.output.stats {
        write_stats(client.stats());
    }

    let values = match client.finish(result).await {
        Ok(values) => values,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let mut missing = false;
    let mut entries = Vec::with_capacity(targets.len());
    for target in &targets {
        match values.get(&target.oid) {
            Some(value) => {
                entries.push(ValueEntry::with_attribute(&target.oid, value, target.attribute))
            }
            None => {
                eprintln!("{}: no such OID on this hub", target.oid);
                missing = true;
            }
        }
    }

    let ctx = OutputContext {
        format: args.output.format,
        show_timing: args.output.timing,
    };
    if let Err(e) = ctx.write_results(&args.common.host, &entries, Some(elapsed)) {
        eprintln!("Error writing output: {}", e);
        return ExitCode::FAILURE;
    }

    if missing {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
