use anyhow::Result;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use starknet::core::{
    serde::unsigned_field_element::UfeHex, types::Felt, utils::cairo_short_string_to_felt,
};

/// Subset of `GET /system/config` needed for account derivation and onboarding.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Cairo short string, e.g. `PRIVATE_SN_POTC_SEPOLIA`.
    pub starknet_chain_id: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub l1_chain_id: u64,
    #[serde_as(as = "UfeHex")]
    pub paraclear_account_hash: Felt,
    #[serde_as(as = "UfeHex")]
    pub paraclear_account_proxy_hash: Felt,
}

impl SystemConfig {
    pub fn starknet_chain_id_felt(&self) -> Result<Felt> {
        cairo_short_string_to_felt(&self.starknet_chain_id).map_err(|err| {
            anyhow::anyhow!(
                "invalid starknet_chain_id \"{}\": {}",
                self.starknet_chain_id,
                err
            )
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use starknet::macros::{felt, short_string};

    use super::*;

    pub(crate) fn testnet_config_json() -> serde_json::Value {
        serde_json::json!({
            "starknet_gateway_url": "https://potc-testnet-sepolia.starknet.io",
            "starknet_chain_id": "PRIVATE_SN_POTC_SEPOLIA",
            "block_explorer_url": "https://voyager.testnet.paradex.trade/",
            "paraclear_address": "0x286003f7c7bfc3f94e8f0af48b48302e7aee2fb13c23b141479ba00832ef2c6",
            "paraclear_decimals": 8,
            "paraclear_account_proxy_hash": "0x3530cc4759d78042f1b543bf797f5f3d647cde0388c33734cf91b7f7b9314a9",
            "paraclear_account_hash": "0x41cb0280ebadaa75f996d8d92c6f265f6d040bb3ba442e5f86a554f1765244e",
            "l1_chain_id": "11155111",
            "partial_liquidation_share_increment": "0.05"
        })
    }

    pub(crate) fn testnet_config() -> SystemConfig {
        serde_json::from_value(testnet_config_json()).unwrap()
    }

    #[test]
    fn test_parse_system_config() {
        let config = testnet_config();

        assert_eq!(config.l1_chain_id, 11155111);
        assert_eq!(
            config.paraclear_account_hash,
            felt!("0x41cb0280ebadaa75f996d8d92c6f265f6d040bb3ba442e5f86a554f1765244e")
        );
        assert_eq!(
            config.starknet_chain_id_felt().unwrap(),
            short_string!("PRIVATE_SN_POTC_SEPOLIA")
        );
    }

    #[test]
    fn test_numeric_l1_chain_id() {
        let mut json = testnet_config_json();
        json["l1_chain_id"] = serde_json::json!(1);

        let config: SystemConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.l1_chain_id, 1);
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut json = testnet_config_json();
        json.as_object_mut().unwrap().remove("paraclear_account_hash");

        assert!(serde_json::from_value::<SystemConfig>(json).is_err());
    }

    #[test]
    fn test_overlong_chain_id_rejected() {
        let mut config = testnet_config();
        config.starknet_chain_id = "A_CHAIN_ID_THAT_IS_WAY_TOO_LONG_FOR_A_FELT".into();

        assert!(config.starknet_chain_id_felt().is_err());
    }
}
