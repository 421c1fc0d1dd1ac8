mod catalog;
mod cli;
mod config;
mod device;
mod error;
mod scan;
mod snmp;
mod utils;

use clap::Parser;
use cli::args::Args;
use error::{AppError, ErrorKind};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Orchestrates the application flow: configuration loading, argument parsing,
/// and execution of the scan.
async fn run() -> Result<(), AppError> {
    let mut args = Args::parse();

    if args.init {
        let path = config::Config::create_default_template()
            .map_err(|e| AppError::new(ErrorKind::Io(format!("Failed to create config: {e}"))))?;

        println!("✅ Configuration file created at: {path:?}");
        return Ok(());
    }

    // Load saved profiles and merge the requested one with CLI args
    if let Some(alias) = args.profile.clone() {
        let inventory = config::Config::load().unwrap_or_default();

        match inventory.find_by_alias(&alias) {
            Some(profile) => {
                println!("📂 Loading saved profile: '{}'", profile.alias);
                let profile = profile.clone();
                config::apply_profile_to_args(&mut args, &profile)?;
            }
            None => {
                return Err(AppError::new(ErrorKind::Cli(format!(
                    "No saved profile named '{alias}'"
                ))));
            }
        }
    }

    let params = cli::build_params(&args)?;

    let spinner = cli::progress::scan_spinner(params.scan.ranges.host_count());
    let devices = scan::run(&params.scan).await?;
    spinner.finish_and_clear();

    cli::output::show_devices(&devices, &params.app.output);

    Ok(())
}
