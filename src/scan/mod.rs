use crate::{
    catalog::{load_catalog, CatalogEntry},
    device::DeviceDescriptor,
    error::AppError,
    scan::{
        pool::ScanLimits,
        probe::{probe_host, SnmpProbe},
        range::RangeList,
        sink::DeviceSink,
    },
    snmp::SnmpScanParams,
};
use openssl::provider::Provider;
use std::{
    path::PathBuf,
    sync::{Arc, Once},
};
use tracing::{debug, info};

pub mod pool;
pub mod probe;
pub mod range;
pub mod sink;

/// Everything one scan needs: the address ranges, the concurrency caps, an
/// optional custom probe table directory and the credential bundle.
///
/// Scans are one-shot; concurrent scans from the same process must be
/// serialized by the caller.
#[derive(Debug, Clone)]
pub struct ScanParams {
    pub ranges: RangeList,
    pub limits: ScanLimits,
    pub data_dir: Option<PathBuf>,
    pub snmp: SnmpScanParams,
}

static CRYPTO_INIT: Once = Once::new();

/// Loads the OpenSSL legacy provider so DES privacy and MD5 digests keep
/// working on OpenSSL 3. Idempotent; the provider stays loaded for the rest
/// of the process.
fn init_snmp_crypto() {
    CRYPTO_INIT.call_once(|| match Provider::try_load(None, "legacy", true) {
        Ok(provider) => std::mem::forget(provider),
        Err(e) => eprintln!("Warning: Failed to load OpenSSL Legacy Provider: {e}"),
    });
}

/// Scans the configured ranges and returns every discovered device.
///
/// Per-host failures (unreachable peers, refused sessions, bad credentials
/// for one host) never abort the scan; they only mean that host contributes
/// no descriptor.
pub async fn run(params: &ScanParams) -> Result<Vec<DeviceDescriptor>, AppError> {
    init_snmp_crypto();

    let catalog = Arc::new(load_catalog(params.data_dir.clone())?);
    let sink = Arc::new(DeviceSink::new());

    info!(
        hosts = params.ranges.host_count(),
        entries = catalog.len(),
        "starting SNMP scan"
    );

    pool::drive(params.ranges.iter(), params.limits, |addr| {
        let mut snmp = params.snmp.clone();
        snmp.ip = addr;
        scan_host(snmp, Arc::clone(&catalog), Arc::clone(&sink))
    })
    .await;

    let devices = sink.drain();
    info!(devices = devices.len(), "scan finished");
    Ok(devices)
}

/// One worker: open a session to the peer, run the identification protocol,
/// publish whatever matched. The session closes when the probe drops.
async fn scan_host(snmp: SnmpScanParams, catalog: Arc<Vec<CatalogEntry>>, sink: Arc<DeviceSink>) {
    let mut probe = match SnmpProbe::open(&snmp).await {
        Ok(probe) => probe,
        Err(e) => {
            debug!(peer = %snmp.ip, "skipping host: {e}");
            return;
        }
    };

    probe_host(&mut probe, &snmp, &catalog, &sink).await;
}
