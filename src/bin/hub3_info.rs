//! hub3-info: Show an overview of a hub.
//!
//! Part of the async-hub3 CLI utilities.

use async_hub3::attribute::ATTRIBUTES;
use async_hub3::cli::args::{CommonArgs, OutputArgs, OutputFormat};
use async_hub3::cli::output::{OutputContext, ValueEntry, write_error, write_stats, write_table};
use async_hub3::{Client, IpAddress};
use clap::Parser;
use std::fmt::Display;
use std::io::{self, Write};
use std::process::ExitCode;

/// Show attributes, networks, port forwards and devices of a Virgin Media Hub 3.
#[derive(Debug, Parser)]
#[command(name = "hub3-info", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// List the known attributes and exit without contacting the hub.
    #[arg(long = "list")]
    list: bool,

    /// Skip the device list, which is slow to fetch.
    #[arg(long = "no-devices")]
    no_devices: bool,

    /// Include devices that are not currently connected.
    #[arg(long = "all-devices")]
    all_devices: bool,
}

fn cell<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn print_catalogue() -> io::Result<()> {
    let rows: Vec<Vec<String>> = ATTRIBUTES
        .iter()
        .map(|a| {
            vec![
                a.name.to_string(),
                a.kind.to_string(),
                a.oid.to_string(),
                a.description.to_string(),
            ]
        })
        .collect();
    write_table(
        &mut io::stdout().lock(),
        &["name", "type", "oid", "description"],
        &rows,
    )
}

async fn run(client: &mut Client, args: &Args) -> async_hub3::Result<()> {
    let ctx = OutputContext::new(args.output.format);
    let human = args.output.format == OutputFormat::Human;
    let heading = |title: &str| {
        if human {
            println!("\n{}", title);
        }
    };
    let io_err = |e: io::Error| async_hub3::Error::Config(format!("cannot write output: {}", e).into());

    let oids: Vec<&str> = ATTRIBUTES.iter().map(|a| a.oid).collect();
    let values = client.snmp_get_many(&oids).await?;
    let entries: Vec<ValueEntry> = ATTRIBUTES
        .iter()
        .filter_map(|a| {
            values
                .get(a.oid)
                .map(|v| ValueEntry::with_attribute(a.oid, v.as_str(), Some(a)))
        })
        .collect();
    heading("Attributes");
    ctx.write_results(&args.common.host, &entries, None)
        .map_err(io_err)?;

    heading("LAN");
    let lan_ip = client.lan_ip_address().await?;
    ctx.write_rows(
        &["address", "model", "family"],
        &[vec![
            lan_ip,
            client.model_name().unwrap_or_default().to_string(),
            client.family().unwrap_or_default().to_string(),
        ]],
    )
    .map_err(io_err)?;

    heading("WAN networks");
    let rows: Vec<Vec<String>> = client
        .wan_networks()
        .await?
        .iter()
        .map(|n| vec![cell(&n.ipaddr), cell(&n.prefix), cell(&n.netmask), cell(&n.gw)])
        .collect();
    ctx.write_rows(&["ipaddr", "prefix", "netmask", "gw"], &rows)
        .map_err(io_err)?;

    heading("DNS servers");
    let rows: Vec<Vec<String>> = client
        .dns_servers()
        .await?
        .iter()
        .map(|addr: &IpAddress| vec![addr.to_string()])
        .collect();
    ctx.write_rows(&["address"], &rows).map_err(io_err)?;

    heading("Port forwards");
    let rows: Vec<Vec<String>> = client
        .port_forwards()
        .await?
        .iter()
        .map(|r| {
            vec![
                r.index.to_string(),
                r.description.clone().unwrap_or_default(),
                cell(&r.protocol),
                r.ext_ports.to_string(),
                cell(&r.local_addr),
                r.local_ports.to_string(),
                r.enabled.to_string(),
            ]
        })
        .collect();
    ctx.write_rows(
        &["index", "description", "proto", "ext_ports", "local_addr", "local_ports", "enabled"],
        &rows,
    )
    .map_err(io_err)?;

    if !args.no_devices {
        heading("Devices");
        let mut rows = Vec::new();
        for device in client.devices().await? {
            let connected = client.device_connected(device.ipv4).await?;
            if !connected && !args.all_devices {
                continue;
            }
            let name = client.device_name(device.ipv4).await?;
            rows.push(vec![
                device.ipv4.to_string(),
                device.mac.to_string(),
                connected.to_string(),
                name.unwrap_or_default(),
            ]);
        }
        ctx.write_rows(&["ipv4", "mac", "connected", "name"], &rows)
            .map_err(io_err)?;
    }

    io::stdout().flush().map_err(io_err)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.output.init_tracing();

    if args.list {
        return match print_catalogue() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error writing output: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let mut client = match args.common.connect().await {
        Ok(client) => client,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let result = run(&mut client, &args).await;
    if args.output.stats {
        write_stats(client.stats());
    }

    match client.finish(result).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            write_error(&e);
            ExitCode::FAILURE
        }
    }
}
