use std::{fmt::Display, str::FromStr};

use anyhow::Result;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Testnet,
    Prod,
}

/// A network paired with the API endpoint actually contacted for it.
#[derive(Debug, Clone)]
pub struct NetworkTarget {
    pub network: Network,
    pub base_url: Url,
}

impl Network {
    /// Networks in the order they're onboarded.
    pub const ALL: [Network; 2] = [Network::Testnet, Network::Prod];

    pub fn base_url(&self) -> Url {
        // Both literals are valid URLs
        match self {
            Self::Testnet => Url::parse("https://api.testnet.paradex.trade/v1").unwrap(),
            Self::Prod => Url::parse("https://api.prod.paradex.trade/v1").unwrap(),
        }
    }

    /// Prefix used when naming the exported credential variables.
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Self::Testnet => "TESTNET",
            Self::Prod => "PROD",
        }
    }

    pub fn target(&self) -> NetworkTarget {
        NetworkTarget {
            network: *self,
            base_url: self.base_url(),
        }
    }
}

impl NetworkTarget {
    /// Joins `path` onto the base URL, keeping the base path (`/v1`) intact.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "testnet" => Ok(Self::Testnet),
            "prod" => Ok(Self::Prod),
            _ => Err(anyhow::anyhow!("unknown network: {}", s)),
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Testnet => write!(f, "testnet"),
            Self::Prod => write!(f, "prod"),
        }
    }
}
