use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use anyhow::Result;
use indexmap::IndexMap;

use crate::{
    account::ParadexAccount,
    client::{OnboardingError, OnboardingRequest, ParadexClient},
    network::{Network, NetworkTarget},
    system_config::SystemConfig,
    typed_data::{ConstantAction, StarknetDomain},
};

#[derive(Debug)]
pub struct NetworkOutcome {
    pub network: Network,
    pub success: bool,
    pub account: ParadexAccount,
}

#[derive(Debug)]
pub struct OnboardingReport {
    pub success: bool,
    pub env_vars: IndexMap<String, String>,
}

impl NetworkOutcome {
    pub fn env_vars(&self) -> [(String, String); 2] {
        let prefix = self.network.env_prefix();
        [
            (
                format!("PARADEX_{}_ADDRESS", prefix),
                format!("{:#x}", self.account.address),
            ),
            (
                format!("PARADEX_{}_PRIVATE_KEY", prefix),
                format!("{:#x}", self.account.private_key()),
            ),
        ]
    }
}

/// Signs and submits the onboarding message for `account`.
///
/// Rejections and transport failures are logged and reported as `Ok(false)`. Errors are only
/// returned when the request can't be built.
pub async fn perform_onboarding(
    client: &ParadexClient,
    config: &SystemConfig,
    account: &ParadexAccount,
    ethereum_account: Address,
) -> Result<bool> {
    let domain = StarknetDomain::paradex(config.starknet_chain_id_felt()?);
    let message_hash = ConstantAction::onboarding().message_hash(&domain, account.address);
    let signature = account.signing_key.sign(&message_hash)?;

    let request = OnboardingRequest {
        ethereum_account,
        account: account.address,
        public_key: account.public_key(),
        signature,
    };

    match client.onboarding(&request).await {
        Ok(()) => {
            log::info!("Onboarding successful on {}", client.network());
            Ok(true)
        }
        Err(OnboardingError::UnexpectedStatus { status, body }) => {
            log::error!("Status Code: {}", status.as_u16());
            log::error!("Response Text: {}", body);
            log::error!("Unable to POST /onboarding");
            Ok(false)
        }
        Err(err @ OnboardingError::Transport(_)) => {
            log::error!("Error during onboarding: {}", err);
            Ok(false)
        }
    }
}

/// Fetches the network config, derives the account and onboards it.
pub async fn handle_network(
    target: NetworkTarget,
    eth_signer: &PrivateKeySigner,
) -> Result<NetworkOutcome> {
    let network = target.network;
    log::info!("Processing {}...", network);

    let client = ParadexClient::new(target)?;
    let config = client.system_config().await?;
    let account = ParadexAccount::derive(&config, eth_signer)?;

    let success = perform_onboarding(&client, &config, &account, eth_signer.address()).await?;

    Ok(NetworkOutcome {
        network,
        success,
        account,
    })
}

/// Onboards every target in order. A rejected onboarding doesn't stop the remaining targets,
/// but any other error does.
pub async fn onboard(
    targets: &[NetworkTarget],
    eth_signer: &PrivateKeySigner,
) -> Result<OnboardingReport> {
    let mut report = OnboardingReport {
        success: true,
        env_vars: IndexMap::new(),
    };

    for target in targets {
        let outcome = handle_network(target.clone(), eth_signer).await?;

        if !outcome.success {
            log::warn!("Onboarding on {} failed", outcome.network);
        }

        report.success &= outcome.success;
        report.env_vars.extend(outcome.env_vars());
    }

    Ok(report)
}
