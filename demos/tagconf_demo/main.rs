//! # tagconf demo application
//!
//! A sample program that loads its configuration through the full waterfall
//! and prints the result. It exists to demonstrate and manually verify
//! tagconf's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example tagconf_demo -- --workspace demo
//! REDIS_DB=4 cargo run --example tagconf_demo -- -workspace demo -verbose
//! RUST_LOG=tagconf=trace cargo run --example tagconf_demo -- --workspace demo
//! ```
//!
//! ## Sources, lowest to highest priority
//!
//! 1. `./.env`, binding its values without overriding the process environment
//! 2. Environment variables (`REDIS_HOST`, `REDIS_DB`, `TAG`, `ROLE`)
//! 3. Environment variables with the `DEMO_` prefix
//! 4. `./config.yaml`, then `./config.${ENVIRONMENT}.yaml` when `ENVIRONMENT` is set
//! 5. Command-line flags (`--help` lists them)
//! 6. `./.VERSION`
//!
//! Placeholders such as `${HOME}` inside string values are expanded last.

mod config;

use std::process::ExitCode;

use tagconf::{ConfigError, ConfigurationService};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use config::DemoConfig;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn load(config: &mut DemoConfig) -> Result<(), ConfigError> {
    let mut service = ConfigurationService::new(config)
        .load_dotenv()?
        .load_environment_variables("")?
        .load_environment_variables("DEMO")?
        .load_yaml_file("config.yaml")?;

    if service.env_vars().iter().any(|(k, _)| k == "ENVIRONMENT") {
        service = service.load_yaml_file("config.${ENVIRONMENT}.yaml")?;
    }

    service
        .load_command_arguments()?
        .load_resource("")?
        .expand_env("")?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let mut config = DemoConfig::default();
    if let Err(e) = load(&mut config) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let mut service = ConfigurationService::new(&mut config);
    if let Err(e) = service.print() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
