use std::path::{Path, PathBuf};

use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    env_file::{redact, write_env_file, EnvFilePathParser, DEFAULT_ENV_FILE},
    network::{Network, NetworkTarget},
    signer::EthereumKeyArgs,
    verbosity::VerbosityArgs,
};

mod account;
mod client;
mod env_file;
mod network;
mod onboarding;
mod signer;
mod system_config;
mod typed_data;
mod verbosity;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(flatten)]
    key: EthereumKeyArgs,
    #[clap(
        long,
        value_parser = EnvFilePathParser,
        default_value = DEFAULT_ENV_FILE,
        help = "Path to write the generated credentials to"
    )]
    output: PathBuf,
    #[clap(flatten)]
    verbosity: VerbosityArgs,
}

#[tokio::main]
async fn main() {
    // Variables already set in the environment take precedence
    if let Err(err) = check_dotenv(dotenvy::dotenv()) {
        eprintln!("{}", format!("Error: {err:#}").red());
        std::process::exit(1);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(cli_error_exit_code(&err));
        }
    };
    cli.verbosity.setup_logging();

    let eth_signer = match cli.key.into_signer() {
        Ok(signer) => signer,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    let targets = Network::ALL.map(|network| network.target());
    match run(&eth_signer, &targets, &cli.output).await {
        Ok(true) => {}
        Ok(false) => {
            log::error!("Onboarding failed for one or more networks");
            std::process::exit(1);
        }
        Err(err) => {
            log::error!("Local Main Error");
            log::error!("{:#}", err);
            eprintln!("{}", format!("Error: {err:?}").red());
            std::process::exit(1);
        }
    }
}

async fn run(
    eth_signer: &PrivateKeySigner,
    targets: &[NetworkTarget],
    output: &Path,
) -> Result<bool> {
    let report = onboarding::onboard(targets, eth_signer).await?;

    write_env_file(output, &report.env_vars)?;
    log::info!("Credentials written to {}", output.display());

    if report.success {
        log::info!("Successfully onboarded to all networks");
        log::info!("Generated environment variables:");
        for (key, value) in report.env_vars.iter() {
            log::info!("{}='{}'", key, redact(value));
        }
    }

    Ok(report.success)
}

/// A missing `.env` file is fine, a malformed one is not.
fn check_dotenv<T>(loaded: dotenvy::Result<T>) -> Result<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(anyhow::anyhow!("unable to load .env file: {}", err)),
    }
}

/// Help and version requests succeed; every argument error exits with 1.
fn cli_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}
