use crate::{
    cli::{args::Args, output::OutputFormat},
    error::{AppError, ErrorKind},
    scan::{
        pool::ScanLimits,
        range::{IpRange, RangeList},
        ScanParams,
    },
    snmp::SnmpScanParams,
};
use std::net::{Ipv4Addr, ToSocketAddrs};

pub mod args;
pub mod output;
pub mod progress;

/// Structure that holds general parameters for the application.
///
/// This structure groups together the settings related to the application
/// configuration, including CLI and scan settings.
pub struct AppParams {
    pub app: CliParams,
    pub scan: ScanParams,
}

/// Structure that holds parameters for the command-line interface (CLI).
pub struct CliParams {
    pub output: OutputFormat,
}

/// Builds the full application parameters from parsed arguments.
pub fn build_params(args: &Args) -> Result<AppParams, AppError> {
    let mut ranges = RangeList::new();
    for spec in &args.ranges {
        ranges.push(parse_range_spec(spec, args.port)?);
    }

    if ranges.is_empty() {
        return Err(AppError::new(ErrorKind::Cli(
            "At least one range is required.".to_string(),
        )));
    }

    Ok(AppParams {
        app: CliParams {
            output: args.output.clone(),
        },
        scan: ScanParams {
            ranges,
            limits: ScanLimits {
                global: args.global_jobs,
                snmp: args.jobs,
            },
            data_dir: args.data_dir.clone(),
            snmp: SnmpScanParams::from_args(args),
        },
    })
}

/// Parses one range token. Bounded and CIDR forms must be numeric; a plain
/// token may also be a hostname, resolved to a single address.
fn parse_range_spec(spec: &str, port: u16) -> Result<IpRange, AppError> {
    if spec.contains('-') || spec.contains('/') {
        return IpRange::parse(spec);
    }

    match spec.parse::<Ipv4Addr>() {
        Ok(addr) => Ok(IpRange::single(addr)),
        Err(_) => Ok(IpRange::single(resolve_host(spec, port)?)),
    }
}

/// Resolves a hostname to its first IPv4 address.
pub fn resolve_host(host: &str, port: u16) -> Result<Ipv4Addr, AppError> {
    let host_with_port = format!("{host}:{port}");
    let mut addrs_iter = match host_with_port.to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(_) => return Err(AppError::new(ErrorKind::DnsResolution(host.to_string()))),
    };

    addrs_iter
        .find_map(|socket_addr| {
            if let std::net::IpAddr::V4(ipv4_addr) = socket_addr.ip() {
                Some(ipv4_addr)
            } else {
                None
            }
        })
        .ok_or_else(|| AppError::new(ErrorKind::DnsResolution(host.to_string())))
}
