use std::{future::Future, net::Ipv4Addr, sync::Arc};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::warn;

/// Concurrency caps for a scan: one across every scan type in the process,
/// one specific to SNMP probing. A worker holds a ticket from each for its
/// whole lifetime, so at most `min(global, snmp)` probes run at once.
#[derive(Debug, Clone, Copy)]
pub struct ScanLimits {
    pub global: usize,
    pub snmp: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            global: 128,
            snmp: 64,
        }
    }
}

/// Pulls addresses from the iterator and runs one probe per address under
/// the concurrency caps, returning only after every spawned worker has been
/// joined.
///
/// Tickets are acquired in a fixed order (SNMP first, then global) before a
/// worker is spawned and travel into the worker task, so they are released
/// exactly when it terminates. If ticket acquisition ever fails the driver
/// stops spawning but still drains the workers already in flight.
pub(crate) async fn drive<A, F, Fut>(addrs: A, limits: ScanLimits, mut spawn_probe: F)
where
    A: Iterator<Item = Ipv4Addr>,
    F: FnMut(Ipv4Addr) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let snmp_tickets = Arc::new(Semaphore::new(limits.snmp.max(1)));
    let global_tickets = Arc::new(Semaphore::new(limits.global.max(1)));
    let mut workers = JoinSet::new();

    for addr in addrs {
        let Ok(snmp_ticket) = Arc::clone(&snmp_tickets).acquire_owned().await else {
            break;
        };
        let Ok(global_ticket) = Arc::clone(&global_tickets).acquire_owned().await else {
            break;
        };

        let probe = spawn_probe(addr);
        workers.spawn(async move {
            let _tickets = (snmp_ticket, global_ticket);
            probe.await;
        });
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            warn!("scan worker did not terminate cleanly: {e}");
        }
    }
}
