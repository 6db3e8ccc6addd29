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

//! Wallet management and EIP-712 action signing for the Hyperliquid exchange endpoint.

pub mod action;
pub mod eip712;
pub mod nonce;
pub mod wallet;

use thiserror::Error;

/// A typed error enumeration for the Hyperliquid signing pipeline.
#[derive(Debug, Clone, Error)]
pub enum HyperliquidSignError {
    /// The configured private key could not be parsed into a valid secp256k1 scalar.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
    /// A vault or destination address could not be parsed into 20 bytes.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// The action tree could not be serialized for hashing.
    #[error("Action serialization failed: {0}")]
    Serialization(String),
    /// The injected clock produced a negative reading.
    #[error("Clock returned negative timestamp: {0}")]
    NegativeTimestamp(i64),
    /// The ECDSA signing operation itself failed.
    #[error("Signing failed: {0}")]
    Signing(String),
}
