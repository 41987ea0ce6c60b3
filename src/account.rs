use alloy::{
    signers::{local::PrivateKeySigner, SignerSync},
    sol,
    sol_types::{eip712_domain, SolStruct},
};
use anyhow::Result;
use num_bigint::BigUint;
use num_traits::One;
use sha2::{Digest, Sha256};
use starknet::{
    core::{types::Felt, utils::get_contract_address},
    macros::{felt, selector},
    signers::SigningKey,
};

use crate::system_config::SystemConfig;

/// Order of the Stark curve generator.
const EC_ORDER: Felt = felt!("0x0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f");

const STARK_KEY_ACTION: &str = "STARK Key";

sol! {
    struct Constant {
        string action;
    }
}

/// A Paradex account derived from an Ethereum key. The account contract is a proxy whose
/// address is fully determined by the Stark public key and the classes announced in the system
/// config, so no on-chain lookup is needed.
#[derive(Debug, Clone)]
pub struct ParadexAccount {
    pub address: Felt,
    pub signing_key: SigningKey,
}

impl ParadexAccount {
    pub fn derive(config: &SystemConfig, eth_signer: &PrivateKeySigner) -> Result<Self> {
        let seed = stark_key_seed(config.l1_chain_id, eth_signer)?;
        let signing_key = SigningKey::from_secret_scalar(grind_key(&seed));
        let public_key = signing_key.verifying_key().scalar();

        let address = get_contract_address(
            public_key,
            config.paraclear_account_proxy_hash,
            &[
                config.paraclear_account_hash,
                selector!("initialize"),
                Felt::TWO,
                public_key,
                Felt::ZERO,
            ],
            Felt::ZERO,
        );

        Ok(Self {
            address,
            signing_key,
        })
    }

    pub fn public_key(&self) -> Felt {
        self.signing_key.verifying_key().scalar()
    }

    pub fn private_key(&self) -> Felt {
        self.signing_key.secret_scalar()
    }
}

/// Signs the EIP-712 "STARK Key" message and returns the `r` component, which seeds the Stark
/// key. RFC-6979 nonces make this deterministic.
fn stark_key_seed(l1_chain_id: u64, eth_signer: &PrivateKeySigner) -> Result<BigUint> {
    let domain = eip712_domain! {
        name: "Paradex",
        version: "1",
        chain_id: l1_chain_id,
    };
    let message = Constant {
        action: STARK_KEY_ACTION.into(),
    };

    let signature = eth_signer.sign_hash_sync(&message.eip712_signing_hash(&domain))?;

    Ok(BigUint::from_bytes_be(&signature.r().to_be_bytes::<32>()))
}

/// StarkWare key grinding: hashes `seed || index` until the digest falls below the largest
/// multiple of the curve order that fits in 256 bits, then reduces it.
///
/// Both integers are hashed in their shortest big-endian form, with zero encoded as one byte.
fn grind_key(seed: &BigUint) -> Felt {
    let ec_order = EC_ORDER.to_biguint();
    let two_256 = BigUint::one() << 256;
    let max_allowed_value = &two_256 - (&two_256 % &ec_order);

    let seed_bytes = seed.to_bytes_be();
    let mut index = 0u64;

    loop {
        let mut hasher = Sha256::new();
        hasher.update(&seed_bytes);
        hasher.update(BigUint::from(index).to_bytes_be());
        let key = BigUint::from_bytes_be(hasher.finalize().as_slice());

        if key < max_allowed_value {
            return Felt::from_bytes_be_slice(&(key % &ec_order).to_bytes_be());
        }

        index += 1;
    }
}
