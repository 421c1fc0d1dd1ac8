use crate::device::DeviceDescriptor;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Thread-safe accumulator for discovered devices.
///
/// Workers publish concurrently; the driver drains once after every worker
/// has been joined. Output order is publication order, not address order.
#[derive(Debug, Default)]
pub struct DeviceSink {
    devices: Mutex<Vec<DeviceDescriptor>>,
}

impl DeviceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor unless the same `(peer, mib)` pair was already
    /// published, so repeated matches of one device collapse to one entry.
    pub fn publish(&self, device: DeviceDescriptor) {
        let mut devices = self
            .devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if devices
            .iter()
            .any(|d| d.port == device.port && d.mib() == device.mib())
        {
            debug!(peer = %device.port, mib = device.mib(), "skipping duplicated device");
            return;
        }

        devices.push(device);
    }

    /// Hands the collected devices to the caller and resets the sink.
    pub fn drain(&self) -> Vec<DeviceDescriptor> {
        std::mem::take(
            &mut *self
                .devices
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}
