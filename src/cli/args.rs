use crate::{
    cli::output::OutputFormat,
    snmp::security::{AuthProtocol, PrivacyProtocol, SecurityLevel},
};
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Ranges to scan: single address or hostname, 'start-end', or CIDR
    #[arg(required_unless_present_any = ["init", "profile"])]
    pub ranges: Vec<String>,

    /// Create a default configuration file
    #[arg(long)]
    pub init: bool,

    /// Load a scan profile saved in the configuration file
    #[arg(short = 'P', long)]
    pub profile: Option<String>,

    /// SNMP Service Port
    #[arg(long, default_value_t = 161, help_heading = "SNMP General")]
    pub port: u16,

    /// Timeout in seconds for each SNMP request
    #[arg(short, long, default_value_t = 5, help_heading = "SNMP General")]
    pub timeout: u64,

    /// SNMP Community (v1/v2c); defaults to 'public' when no v3 options are given
    #[arg(short, long, help_heading = "SNMP v1/v2c")]
    pub community: Option<String>,

    /// Security Level (noAuthNoPriv, authNoPriv, authPriv)
    #[arg(short = 'l', long, help_heading = "SNMPv3")]
    pub security_level: Option<SecurityLevel>,

    /// Security Name
    #[arg(short = 'u', long, help_heading = "SNMPv3")]
    pub security_name: Option<String>,

    /// Auth Password
    #[arg(short = 'A', long, help_heading = "SNMPv3")]
    pub auth_password: Option<String>,

    /// Auth Protocol (MD5, SHA, SHA256, SHA384, SHA512); MD5 when omitted
    #[arg(short = 'a', long, help_heading = "SNMPv3")]
    pub auth_protocol: Option<AuthProtocol>,

    /// Privacy Password
    #[arg(short = 'X', long, help_heading = "SNMPv3")]
    pub priv_password: Option<String>,

    /// Privacy Protocol (DES, AES, AES192, AES256); DES when omitted
    #[arg(short = 'x', long, help_heading = "SNMPv3")]
    pub priv_protocol: Option<PrivacyProtocol>,

    /// Maximum concurrent SNMP probes
    #[arg(short = 'j', long, default_value_t = 64, help_heading = "Scan")]
    pub jobs: usize,

    /// Maximum concurrent probes across all scan types
    #[arg(long, default_value_t = 128, help_heading = "Scan")]
    pub global_jobs: usize,

    /// Directory with custom vendor probe tables
    #[arg(short = 'd', long)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}
