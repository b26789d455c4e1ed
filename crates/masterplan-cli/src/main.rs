use clap::Parser;
use masterplan_cli::{MasterplanCli, MasterplanConfig, init_logging};
use masterplan_engine::PlanError;
use std::process::ExitCode;
use tracing::{info, warn};

fn main() -> ExitCode {
    let cli = MasterplanCli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(PlanError::CustomLandUse(rejected)) = err.downcast_ref::<PlanError>() {
                eprintln!("error[{}]: {rejected}", rejected.code());
                return ExitCode::from(2);
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &MasterplanCli) -> anyhow::Result<String> {
    let config = MasterplanConfig::load()?.apply_profile();
    init_logging(&config.logging, cli.verbose, cli.log_json)?;

    match &config.source {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => warn!("Configuration file not found. Using default configuration."),
    }

    cli.run(&config)
}
