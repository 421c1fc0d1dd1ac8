use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the scan runs; probes give no per-host feedback, so
/// elapsed time is the only honest signal.
pub fn scan_spinner(host_count: u64) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    let style = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
        .expect("Failed to create progress bar template");

    pb.set_style(style);
    pb.set_message(format!("Scanning {host_count} hosts for SNMP UPS devices..."));
    pb.enable_steady_tick(Duration::from_millis(120));

    pb
}
