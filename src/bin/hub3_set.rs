//! hub3-set: Change values on a hub.
//!
//! Part of the async-hub3 CLI utilities.

use async_hub3::cli::args::{CommonArgs, OutputArgs};
use async_hub3::cli::hints::{Target, parse_target};
use async_hub3::cli::output::{write_error, write_stats};
use async_hub3::{AttributeValue, Client, DataType, Error};
use clap::Parser;
use std::process::ExitCode;

/// Change a value on a Virgin Media Hub 3 and apply it.
///
/// For attribute names the value is given in readable form and encoded
/// automatically (addresses as 192.168.0.1, booleans as on/off, times as
/// 2018-03-14T16:07:17). For raw OIDs the value is sent as given, with the
/// datatype from --type.
#[derive(Debug, Parser)]
#[command(name = "hub3-set", version, about, verbatim_doc_comment)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Datatype for raw OIDs: int, string or port.
    #[arg(short = 'T', long = "type", default_value = "string")]
    datatype: DataType,

    /// Save the value without applying it.
    #[arg(long = "no-apply")]
    no_apply: bool,

    /// OID or attribute name.
    #[arg(value_name = "TARGET", value_parser = parse_target)]
    target: Target,

    /// New value.
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    value: String,
}

/// Wire value and datatype to send.
fn encode(args: &Args) -> async_hub3::Result<(String, DataType)> {
    match args.target.attribute {
        Some(attr) => {
            let value = AttributeValue::parse(attr.kind, &args.value)?;
            Ok((value.encode()?, attr.kind.datatype()))
        }
        None => Ok((args.value.clone(), args.datatype)),
    }
}

async fn run(
    client: &mut Client,
    args: &Args,
    wire: &str,
    datatype: DataType,
) -> async_hub3::Result<bool> {
    let changed = client
        .snmp_set(&args.target.oid, Some(wire), Some(datatype))
        .await?;
    if changed && !args.no_apply {
        client.apply_settings().await?;
    }
    Ok(changed)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.output.init_tracing();

    let (wire, datatype) = match encode(&args) {
        Ok(encoded) => encoded,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if args.common.password.is_none() {
        write_error(&Error::Config("setting values requires --password".into()));
        return ExitCode::FAILURE;
    }

    let mut client = match args.common.connect().await {
        Ok(client) => client,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let result = run(&mut client, &args, &wire, datatype).await;
    if args.output.stats {
        write_stats(client.stats());
    }

    match client.finish(result).await {
        Ok(true) => {
            println!("{} = {}", args.target.oid, wire);
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("{} unchanged", args.target.oid);
            ExitCode::SUCCESS
        }
        Err(e) => {
            write_error(&e);
            ExitCode::FAILURE
        }
    }
}
