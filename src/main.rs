// excost: exam logistics cost estimator
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use excost::analysis::Estimator;
use excost::cli::{Cli, Commands};
use excost::commands::estimate::EstimateArgs;
use excost::commands::{
    OutputOptions, handle_cities_command, handle_compare_command, handle_config_action,
    handle_error, handle_estimate_command, handle_pricing_action, handle_sweep_command,
};
use excost::config::{Config, expand_home};
use excost::models::Tariff;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json_output = cli.json;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e, json_output);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => expand_home(path),
        None => Config::default_path()?,
    };

    // Config commands manage the file itself, so they run before it is loaded
    if let Commands::Config { action } = cli.command {
        return handle_config_action(action, &config_path, cli.json);
    }

    let config = Config::load_from(&config_path)?;

    // CLI overrides take precedence over config
    let tariff = match &cli.tariff {
        Some(path) => Tariff::load(&expand_home(path))?,
        None => config.load_tariff()?,
    };
    let estimator = Estimator::with_tariff(tariff);

    let output = OutputOptions {
        currency: config.output.currency.clone(),
        decimal_places: config.output.decimal_places,
        json: cli.json || config.json_output(),
        colored: cli.colored || config.output.colored,
    };

    match cli.command {
        Commands::Estimate {
            applicants,
            city,
            modality,
            request,
            export,
            format,
        } => {
            let args = EstimateArgs {
                applicants,
                city,
                modality,
                request,
                export,
                format,
            };
            handle_estimate_command(args, &config.general, &estimator, &output)
        }
        Commands::Sweep {
            from,
            to,
            step,
            city,
            modality,
        } => handle_sweep_command(
            from,
            to,
            step,
            city,
            modality,
            &config.general,
            &estimator,
            &output,
        ),
        Commands::Compare {
            applicants,
            modality,
        } => handle_compare_command(applicants, modality, &config.general, &estimator, &output),
        Commands::Cities => handle_cities_command(estimator.tariff(), &output),
        Commands::Pricing { action } => handle_pricing_action(action, estimator.tariff(), &output),
        Commands::Config { .. } => Ok(()),
    }
}
