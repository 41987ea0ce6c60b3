use alloy::primitives::Address;
use anyhow::Result;
use reqwest::StatusCode;
use serde::Serialize;
use starknet::core::{crypto::Signature, types::Felt};

use crate::{
    env_file::redact,
    network::{Network, NetworkTarget},
    system_config::SystemConfig,
};

pub const ETHEREUM_ACCOUNT_HEADER: &str = "PARADEX-ETHEREUM-ACCOUNT";
pub const STARKNET_ACCOUNT_HEADER: &str = "PARADEX-STARKNET-ACCOUNT";
pub const STARKNET_SIGNATURE_HEADER: &str = "PARADEX-STARKNET-SIGNATURE";

#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
}

/// A signed `POST /onboarding` request.
#[derive(Debug)]
pub struct OnboardingRequest {
    pub ethereum_account: Address,
    pub account: Felt,
    pub public_key: Felt,
    pub signature: Signature,
}

#[derive(Debug, Serialize)]
struct OnboardingBody {
    public_key: String,
}

/// Thin wrapper over the Paradex REST API of a single network.
#[derive(Debug, Clone)]
pub struct ParadexClient {
    http: reqwest::Client,
    target: NetworkTarget,
}

impl OnboardingRequest {
    /// The signature header value: a JSON array of the decimal `r` and `s` strings.
    pub fn signature_header(&self) -> String {
        serde_json::Value::from(vec![
            self.signature.r.to_biguint().to_string(),
            self.signature.s.to_biguint().to_string(),
        ])
        .to_string()
    }

    fn headers(&self) -> [(&'static str, String); 3] {
        [
            (ETHEREUM_ACCOUNT_HEADER, self.ethereum_account.to_string()),
            (STARKNET_ACCOUNT_HEADER, format!("{:#x}", self.account)),
            (STARKNET_SIGNATURE_HEADER, self.signature_header()),
        ]
    }

    /// Same as `headers`, with the account address (a credential file value) redacted.
    fn loggable_headers(&self) -> [(&'static str, String); 3] {
        let mut headers = self.headers();
        headers[1].1 = redact(&headers[1].1);
        headers
    }

    fn body(&self) -> OnboardingBody {
        OnboardingBody {
            public_key: format!("{:#x}", self.public_key),
        }
    }
}

impl ParadexClient {
    pub fn new(target: NetworkTarget) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self { http, target })
    }

    pub fn network(&self) -> Network {
        self.target.network
    }

    pub async fn system_config(&self) -> Result<SystemConfig> {
        let url = self.target.endpoint("system/config");
        log::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            anyhow::bail!(
                "unable to fetch {} system config ({}): {}",
                self.target.network,
                status,
                response.text().await.unwrap_or_default()
            );
        }

        Ok(response.json().await?)
    }

    pub async fn onboarding(&self, request: &OnboardingRequest) -> Result<(), OnboardingError> {
        let url = self.target.endpoint("onboarding");
        let headers = request.headers();
        let body = request.body();

        log::info!("POST {}", url);
        log::info!("Headers: {:?}", request.loggable_headers());
        log::info!("Body: {:?}", body);

        let mut builder = self.http.post(&url).json(&body);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(OnboardingError::UnexpectedStatus {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::net::TcpListener;

    use httpmock::MockServer;
    use starknet::macros::felt;
    use url::Url;

    use super::*;
    use crate::system_config::tests::testnet_config_json;

    pub(crate) fn mock_target(network: Network, server: &MockServer) -> NetworkTarget {
        NetworkTarget {
            network,
            base_url: Url::parse(&server.base_url()).unwrap(),
        }
    }

    fn request() -> OnboardingRequest {
        OnboardingRequest {
            ethereum_account: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse()
                .unwrap(),
            account: felt!("0xabc"),
            public_key: felt!("0x0123"),
            signature: Signature {
                r: Felt::from(12u32),
                s: Felt::from(345u32),
            },
        }
    }

    #[test]
    fn test_signature_header_format() {
        assert_eq!(request().signature_header(), r#"["12","345"]"#);
    }

    #[test]
    fn test_loggable_headers_redact_account() {
        let request = OnboardingRequest {
            account: felt!("0x37ff1c9d89a50b3dd3a4f90e020ea80251b09ba28049efbe4f7d3fec2995c4a"),
            ..request()
        };

        let headers = request.loggable_headers();

        assert_eq!(headers[1], (STARKNET_ACCOUNT_HEADER, "0x37ff1c9d...".to_owned()));
        assert_eq!(headers[0], request.headers()[0]);
        assert_eq!(headers[2], request.headers()[2]);
    }

    #[tokio::test]
    async fn test_onboarding_sends_headers_and_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/onboarding")
                    .header("paradex-ethereum-account", "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
                    .header("paradex-starknet-account", "0xabc")
                    .header("paradex-starknet-signature", r#"["12","345"]"#)
                    .json_body(serde_json::json!({ "public_key": "0x123" }));
                then.status(200);
            })
            .await;

        let client = ParadexClient::new(mock_target(Network::Testnet, &server)).unwrap();
        client.onboarding(&request()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_onboarding_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/onboarding");
                then.status(400).body("NOT_ONBOARDED");
            })
            .await;

        let client = ParadexClient::new(mock_target(Network::Prod, &server)).unwrap();
        match client.onboarding(&request()).await {
            Err(OnboardingError::UnexpectedStatus { status, body }) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body, "NOT_ONBOARDED");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_onboarding_transport_error() {
        // Grab a free port and release it so nothing is listening
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let target = NetworkTarget {
            network: Network::Testnet,
            base_url: Url::parse(&format!("http://127.0.0.1:{port}")).unwrap(),
        };

        let client = ParadexClient::new(target).unwrap();
        assert!(matches!(
            client.onboarding(&request()).await,
            Err(OnboardingError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_system_config() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/system/config");
                then.status(200).json_body(testnet_config_json());
            })
            .await;

        let client = ParadexClient::new(mock_target(Network::Testnet, &server)).unwrap();
        let config = client.system_config().await.unwrap();

        assert_eq!(config.starknet_chain_id, "PRIVATE_SN_POTC_SEPOLIA");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_system_config_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/system/config");
                then.status(503);
            })
            .await;

        let client = ParadexClient::new(mock_target(Network::Testnet, &server)).unwrap();
        assert!(client.system_config().await.is_err());
    }
}
