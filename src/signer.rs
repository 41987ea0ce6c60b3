use std::str::FromStr;

use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use colored::Colorize;

pub const ETHEREUM_PRIVATE_KEY_ENV: &str = "ETHEREUM_PRIVATE_KEY";

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("ETHEREUM_PRIVATE_KEY environment variable is required")]
    Missing,
    #[error("invalid Ethereum private key: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Parser)]
pub struct EthereumKeyArgs {
    #[clap(
        long,
        env = ETHEREUM_PRIVATE_KEY_ENV,
        hide_env_values = true,
        help = "Ethereum private key the Paradex accounts are derived from"
    )]
    ethereum_private_key: Option<String>,
}

impl EthereumKeyArgs {
    pub fn into_signer(self) -> Result<PrivateKeySigner, KeyError> {
        let key = match self.ethereum_private_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(KeyError::Missing),
        };

        if std::env::var(ETHEREUM_PRIVATE_KEY_ENV).ok().as_deref() != Some(key.as_str()) {
            eprintln!(
                "{}",
                "WARNING: setting private keys via --ethereum-private-key is generally considered \
                insecure, as they will be stored in your shell history or other log files."
                    .bright_magenta()
            );
        }

        // The parse error may echo the input, so only its kind is reported
        PrivateKeySigner::from_str(key.trim())
            .map_err(|_| KeyError::Invalid("expected 32 bytes of hex".into()))
    }
}
