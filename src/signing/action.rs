// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Action hashing and signing for the Hyperliquid `/exchange` endpoint.
//!
//! Two signing families exist and must never be interchanged:
//!
//! - **L1 actions** (orders, cancels, leverage, deploys, …) are msgpack-hashed together
//!   with the nonce, optional vault address, and optional expiry into a "phantom agent"
//!   which is signed under the `Exchange` domain. Mainnet and testnet use different
//!   agent sources (`"a"`/`"b"`), so the same logical action signed for one network is
//!   invalid on the other.
//! - **User-signed actions** (transfers, withdrawals, delegation, approvals, …) each
//!   define their own typed-data schema under the `HyperliquidSignTransaction` domain
//!   and discriminate networks through their `hyperliquidChain` field.

use serde::Serialize;

use crate::signing::{
    HyperliquidSignError,
    eip712::{Eip712Domain, Eip712Value, keccak256, signing_digest, struct_hash},
    wallet::{HyperliquidSignature, HyperliquidWallet},
};

/// Domain for L1 action signatures (phantom agent).
pub const EXCHANGE_DOMAIN: Eip712Domain = Eip712Domain {
    name: "Exchange",
    version: "1",
    chain_id: 1337,
    verifying_contract: [0u8; 20],
};

/// Domain for user-signed action signatures.
pub const USER_SIGNED_DOMAIN: Eip712Domain = Eip712Domain {
    name: "HyperliquidSignTransaction",
    version: "1",
    chain_id: 421_614,
    verifying_contract: [0u8; 20],
};

/// The `signatureChainId` every user-signed action carries on the wire.
pub const SIGNATURE_CHAIN_ID: &str = "0x66eee";

const AGENT_TYPE: &str = "Agent(string source,bytes32 connectionId)";

/// Computes the L1 action hash.
///
/// The action is serialized to msgpack (named map encoding, so struct field order is
/// part of the hash), followed by the big-endian nonce, a tagged vault address
/// (`0x00` for none, `0x01` plus the 20 address bytes otherwise), and, when supplied,
/// a `0x00`-tagged big-endian expiry.
///
/// # Errors
///
/// Returns an error if the action cannot be serialized or the vault address is malformed.
pub fn action_hash<T: Serialize>(
    action: &T,
    vault_address: Option<&str>,
    nonce: u64,
    expires_after: Option<u64>,
) -> Result<[u8; 32], HyperliquidSignError> {
    let mut data = rmp_serde::to_vec_named(action)
        .map_err(|e| HyperliquidSignError::Serialization(e.to_string()))?;

    data.extend_from_slice(&nonce.to_be_bytes());

    match vault_address {
        Some(address) => {
            data.push(0x01);
            let bytes = crate::common::parse::parse_address_bytes(address)
                .map_err(HyperliquidSignError::InvalidAddress)?;
            data.extend_from_slice(&bytes);
        }
        None => data.push(0x00),
    }

    if let Some(expires) = expires_after {
        data.push(0x00);
        data.extend_from_slice(&expires.to_be_bytes());
    }

    Ok(keccak256(&data))
}

/// Signs an L1 action for the given network.
///
/// Pure function of its inputs: identical `(action, vault, nonce, expiry, network)`
/// tuples always produce byte-identical signatures.
///
/// # Errors
///
/// Returns an error if hashing or the ECDSA operation fails.
pub fn sign_l1_action<T: Serialize>(
    wallet: &HyperliquidWallet,
    action: &T,
    vault_address: Option<&str>,
    nonce: u64,
    expires_after: Option<u64>,
    is_mainnet: bool,
) -> Result<HyperliquidSignature, HyperliquidSignError> {
    let connection_id = action_hash(action, vault_address, nonce, expires_after)?;

    // Phantom agent: the source discriminates the network.
    let source = if is_mainnet { "a" } else { "b" };
    let agent_hash = struct_hash(
        AGENT_TYPE,
        &[
            Eip712Value::String(source.to_string()),
            Eip712Value::Bytes32(connection_id),
        ],
    );

    wallet.sign_hash(&signing_digest(&EXCHANGE_DOMAIN, agent_hash))
}

/// A user-signed action family with its own typed-data schema.
///
/// Implementors provide the complete type descriptor and the ordered field values;
/// the `hyperliquidChain` field (always first) carries the network discriminator.
/// Because the descriptor and values are defined together per family, one family's
/// schema cannot silently be reused for another.
pub trait UserSignedAction: Serialize {
    /// Complete EIP-712 type descriptor, e.g.
    /// `"HyperliquidTransaction:UsdSend(string hyperliquidChain,string destination,string amount,uint64 time)"`.
    const TYPE_DESCRIPTOR: &'static str;

    /// Field values in descriptor order.
    ///
    /// # Errors
    ///
    /// Returns an error if a field value (e.g. an address) is malformed.
    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError>;
}

/// Signs a user-signed action under the `HyperliquidSignTransaction` domain.
///
/// # Errors
///
/// Returns an error if a field value is malformed or the ECDSA operation fails.
pub fn sign_user_signed_action<T: UserSignedAction>(
    wallet: &HyperliquidWallet,
    action: &T,
) -> Result<HyperliquidSignature, HyperliquidSignError> {
    let values = action.typed_values()?;
    let hash = struct_hash(T::TYPE_DESCRIPTOR, &values);
    wallet.sign_hash(&signing_digest(&USER_SIGNED_DOMAIN, hash))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    const KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn wallet() -> HyperliquidWallet {
        HyperliquidWallet::from_private_key(KEY).unwrap()
    }

    fn sample_action() -> serde_json::Value {
        json!({
            "type": "updateLeverage",
            "asset": 0,
            "isCross": true,
            "leverage": 10,
        })
    }

    #[rstest]
    fn test_action_hash_inputs_all_matter() {
        let action = sample_action();
        let base = action_hash(&action, None, 1_700_000_000_000, None).unwrap();

        assert_eq!(
            base,
            action_hash(&action, None, 1_700_000_000_000, None).unwrap()
        );
        assert_ne!(
            base,
            action_hash(&action, None, 1_700_000_000_001, None).unwrap()
        );
        assert_ne!(
            base,
            action_hash(
                &action,
                Some("0xabcdef0123456789abcdef0123456789abcdef01"),
                1_700_000_000_000,
                None
            )
            .unwrap()
        );
        assert_ne!(
            base,
            action_hash(&action, None, 1_700_000_000_000, Some(1_700_000_060_000)).unwrap()
        );
    }

    #[rstest]
    fn test_action_hash_rejects_malformed_vault() {
        let result = action_hash(&sample_action(), Some("0x1234"), 1, None);
        assert!(matches!(
            result,
            Err(HyperliquidSignError::InvalidAddress(_))
        ));
    }

    #[rstest]
    fn test_sign_l1_action_deterministic() {
        let action = sample_action();
        let first = sign_l1_action(&wallet(), &action, None, 1_700_000_000_000, None, true).unwrap();
        let second =
            sign_l1_action(&wallet(), &action, None, 1_700_000_000_000, None, true).unwrap();

        assert_eq!(first, second);
    }

    #[rstest]
    fn test_sign_l1_action_discriminates_networks() {
        let action = sample_action();
        let mainnet =
            sign_l1_action(&wallet(), &action, None, 1_700_000_000_000, None, true).unwrap();
        let testnet =
            sign_l1_action(&wallet(), &action, None, 1_700_000_000_000, None, false).unwrap();

        assert_ne!(mainnet, testnet);
    }

    #[rstest]
    fn test_user_signed_schema_is_distinct_from_l1() {
        #[derive(Serialize)]
        struct Probe {
            hyperliquid_chain: String,
            nonce: u64,
        }

        impl UserSignedAction for Probe {
            const TYPE_DESCRIPTOR: &'static str =
                "HyperliquidTransaction:Probe(string hyperliquidChain,uint64 nonce)";

            fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
                Ok(vec![
                    Eip712Value::String(self.hyperliquid_chain.clone()),
                    Eip712Value::Uint64(self.nonce),
                ])
            }
        }

        let mainnet = Probe {
            hyperliquid_chain: "Mainnet".to_string(),
            nonce: 1,
        };
        let testnet = Probe {
            hyperliquid_chain: "Testnet".to_string(),
            nonce: 1,
        };

        let sig_mainnet = sign_user_signed_action(&wallet(), &mainnet).unwrap();
        let sig_testnet = sign_user_signed_action(&wallet(), &testnet).unwrap();
        assert_ne!(sig_mainnet, sig_testnet);
        assert_eq!(
            sig_mainnet,
            sign_user_signed_action(&wallet(), &mainnet).unwrap()
        );
    }
}
