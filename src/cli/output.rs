use crate::device::DeviceDescriptor;
use clap::ValueEnum;
use colored::Colorize;
use std::fmt::Display;

#[derive(Debug, Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Display the discovered devices.
///
/// Text output is `ups.conf` material: one section per device, ready to be
/// pasted into the driver configuration.
pub fn show_devices(devices: &[DeviceDescriptor], output: &OutputFormat) {
    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(&devices) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error generating JSON output: {e}"),
        },

        OutputFormat::Text => {
            if devices.is_empty() {
                println!("{}", "No SNMP UPS devices found.".yellow());
                return;
            }

            println!(
                "{} {}\n",
                "Discovered devices:".bright_cyan().bold(),
                devices.len()
            );

            for (index, device) in devices.iter().enumerate() {
                println!("{}", device.to_ups_conf(index + 1));
            }
        }
    }
}
