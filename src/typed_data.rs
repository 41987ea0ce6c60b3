//! Revision 0 Starknet typed data, limited to the flat `felt`-only structs Paradex signs.

use starknet::{
    core::{crypto::compute_hash_on_elements, types::Felt, utils::starknet_keccak},
    macros::short_string,
};

// Cairo string of "StarkNet Message"
const MESSAGE_PREFIX: Felt = short_string!("StarkNet Message");

const DOMAIN_TYPE: &str = "StarkNetDomain(name:felt,chainId:felt,version:felt)";

const CONSTANT_TYPE: &str = "Constant(action:felt)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarknetDomain {
    pub name: Felt,
    pub chain_id: Felt,
    pub version: Felt,
}

/// The `Constant` struct, a single short-string action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantAction {
    pub action: Felt,
}

impl StarknetDomain {
    pub fn paradex(chain_id: Felt) -> Self {
        Self {
            name: short_string!("Paradex"),
            chain_id,
            version: Felt::ONE,
        }
    }

    pub fn struct_hash(&self) -> Felt {
        compute_hash_on_elements(&[
            starknet_keccak(DOMAIN_TYPE.as_bytes()),
            self.name,
            self.chain_id,
            self.version,
        ])
    }
}

impl ConstantAction {
    pub fn onboarding() -> Self {
        Self {
            action: short_string!("Onboarding"),
        }
    }

    pub fn struct_hash(&self) -> Felt {
        compute_hash_on_elements(&[starknet_keccak(CONSTANT_TYPE.as_bytes()), self.action])
    }

    /// Hash to be signed by `account`.
    pub fn message_hash(&self, domain: &StarknetDomain, account: Felt) -> Felt {
        compute_hash_on_elements(&[
            MESSAGE_PREFIX,
            domain.struct_hash(),
            account,
            self.struct_hash(),
        ])
    }
}
