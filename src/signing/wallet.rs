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

//! Wallet management for Hyperliquid action signing.
//!
//! Wallets are created from hex-encoded secp256k1 private keys and produce deterministic
//! (RFC6979) recoverable signatures over 32-byte digests.

use std::fmt::Debug;

use k256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};

use crate::signing::{HyperliquidSignError, eip712::keccak256};

/// Wallet for Hyperliquid exchange action signing.
///
/// Holds a secp256k1 private key and its derived EVM address. Immutable once
/// constructed; owned exclusively by the client session and never serialized.
///
/// # Security
///
/// Private key material should be treated as sensitive and never logged.
pub struct HyperliquidWallet {
    signing_key: SigningKey,
    /// Pre-computed EVM address (lowercase hex, `0x`-prefixed).
    address: String,
}

impl Debug for HyperliquidWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(HyperliquidWallet))
            .field("signing_key", &"<redacted>")
            .field("address", &self.address)
            .finish()
    }
}

impl HyperliquidWallet {
    /// Creates a wallet from a hex-encoded private key.
    ///
    /// The key should be a 32-byte secp256k1 scalar encoded as hex, optionally with a
    /// `0x` prefix. The address is derived during construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid hex, the wrong length, or out of curve range.
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, HyperliquidSignError> {
        let key_bytes = hex::decode(private_key_hex.trim_start_matches("0x"))
            .map_err(|e| HyperliquidSignError::InvalidPrivateKey(format!("invalid hex: {e}")))?;

        let signing_key = SigningKey::from_slice(&key_bytes)
            .map_err(|e| HyperliquidSignError::InvalidPrivateKey(e.to_string()))?;

        let address = derive_address(&signing_key);

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Returns the derived EVM address (lowercase hex, `0x`-prefixed).
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Signs a 32-byte digest, producing the venue's `(r, s, v)` signature triple.
    ///
    /// Signing is deterministic: the same digest always yields the same signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the ECDSA signing operation fails.
    pub fn sign_hash(&self, digest: &[u8; 32]) -> Result<HyperliquidSignature, HyperliquidSignError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| HyperliquidSignError::Signing(e.to_string()))?;

        let (r, s) = signature.split_bytes();

        Ok(HyperliquidSignature {
            r: format!("0x{}", hex::encode(r)),
            s: format!("0x{}", hex::encode(s)),
            v: 27 + u64::from(recovery_id.to_byte()),
        })
    }
}

/// ECDSA signature triple as posted to the exchange endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperliquidSignature {
    /// Signature `r` component (`0x`-prefixed hex, 32 bytes).
    pub r: String,
    /// Signature `s` component (`0x`-prefixed hex, 32 bytes).
    pub s: String,
    /// Recovery identifier, offset to 27/28 per Ethereum convention.
    pub v: u64,
}

/// Derives the EVM address from a signing key: the last 20 bytes of the Keccak-256
/// hash of the uncompressed public key (without the 0x04 prefix byte).
fn derive_address(signing_key: &SigningKey) -> String {
    let public_key = signing_key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&public_key.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}
