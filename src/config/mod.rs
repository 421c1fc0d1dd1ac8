use crate::cli::args::Args;
use crate::error::AppError;
use serde::Deserialize;
use std::path::PathBuf;

/// Represents the main application configuration containing a list of scan profiles.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub profiles: Vec<ScanProfile>,
}

/// Holds the ranges and SNMP credentials for one saved scan.
#[derive(Debug, Deserialize, Clone)]
pub struct ScanProfile {
    pub alias: String,
    pub ranges: Vec<String>,
    pub port: Option<u16>,
    pub community: Option<String>,
    pub security_level: Option<String>,
    pub security_name: Option<String>,
    pub auth_password: Option<String>,
    pub auth_protocol: Option<String>,
    pub priv_password: Option<String>,
    pub priv_protocol: Option<String>,
    pub timeout: Option<u64>,
    pub jobs: Option<usize>,
}

impl Config {
    /// Loads the configuration from the system's standard config directory.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = get_config_path();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Finds a scan profile by its alias.
    pub fn find_by_alias(&self, target: &str) -> Option<&ScanProfile> {
        self.profiles.iter().find(|p| p.alias == target)
    }

    /// Creates a default configuration file if it does not exist.
    pub fn create_default_template() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = get_config_path();

        // Check if file already exists to avoid overwriting
        if path.exists() {
            return Err(format!("Configuration file already exists at: {path:?}").into());
        }

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = r#"# Upscan Profiles
# Define your recurring scans below to launch them via alias.

# Example 1: Office subnet (SNMP v1, default community)
[[profiles]]
alias = "office"
ranges = ["192.168.1.0/24"]
community = "public"

# Example 2: Datacenter rack (SNMP v3)
[[profiles]]
alias = "rack-7"
ranges = ["10.7.0.10-10.7.0.40"]
security_level = "authPriv"
security_name = "upsadmin"
auth_protocol = "SHA"
auth_password = "my_secret_pass"
priv_protocol = "AES"
priv_password = "my_other_pass"
"#;

        // Write file to disk
        std::fs::write(&path, template)?;

        Ok(path)
    }
}

/// Applies a scan profile from the TOML file onto the CLI Args struct.
/// This modifies the `args` in place, overriding CLI defaults. Protocol
/// spellings from the file are validated, unlike typed CLI arguments.
pub fn apply_profile_to_args(args: &mut Args, profile: &ScanProfile) -> Result<(), AppError> {
    if args.ranges.is_empty() {
        args.ranges = profile.ranges.clone();
    }

    if let Some(port) = profile.port {
        args.port = port;
    }

    if let Some(comm) = &profile.community {
        args.community = Some(comm.clone());
    }

    if let Some(level) = &profile.security_level {
        args.security_level = Some(level.parse()?);
    }

    if let Some(name) = &profile.security_name {
        args.security_name = Some(name.clone());
    }

    if let Some(pass) = &profile.auth_password {
        args.auth_password = Some(pass.clone());
    }

    if let Some(proto) = &profile.auth_protocol {
        args.auth_protocol = Some(proto.parse()?);
    }

    if let Some(pass) = &profile.priv_password {
        args.priv_password = Some(pass.clone());
    }

    if let Some(proto) = &profile.priv_protocol {
        args.priv_protocol = Some(proto.parse()?);
    }

    if let Some(t) = profile.timeout {
        args.timeout = t;
    }

    if let Some(jobs) = profile.jobs {
        args.jobs = jobs;
    }

    Ok(())
}

/// Resolves the configuration path based on the OS standard.
fn get_config_path() -> PathBuf {
    use directories::ProjectDirs;

    // Windows: %APPDATA%\allansomensi\upscan\config\upscan.toml
    // Linux: ~/.config/upscan/upscan.toml
    // macOS: ~/Library/Application Support/com.allansomensi.upscan/upscan.toml
    if let Some(proj_dirs) = ProjectDirs::from("com", "allansomensi", "upscan") {
        return proj_dirs.config_dir().join("upscan.toml");
    }

    // Fallback to current directory
    PathBuf::from("upscan.toml")
}
