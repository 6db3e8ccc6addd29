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

//! Minimal EIP-712 typed-data encoding for the closed set of schemas Hyperliquid uses.
//!
//! Hyperliquid signs over flat structs whose fields are only ever `string`, `bytes32`,
//! `uint64`, `address`, or `bool`, so the encoder supports exactly those kinds rather
//! than the full dynamic type grammar. Each schema is represented by its complete type
//! descriptor string (e.g. `"Agent(string source,bytes32 connectionId)"`) and an
//! ordered value slice; mismatching descriptor and values produces an unverifiable
//! signature on the venue side, so schemas are defined once as constants and never
//! assembled ad hoc.

use sha3::{Digest, Keccak256};

/// Computes the Keccak-256 hash of the input.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// EIP-712 domain separator parameters.
///
/// All Hyperliquid domains carry the full field set
/// `(string name, string version, uint256 chainId, address verifyingContract)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eip712Domain {
    pub name: &'static str,
    pub version: &'static str,
    pub chain_id: u64,
    pub verifying_contract: [u8; 20],
}

impl Eip712Domain {
    const TYPE_DESCRIPTOR: &'static str =
        "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

    /// Computes the domain separator hash.
    #[must_use]
    pub fn separator(&self) -> [u8; 32] {
        let mut encoded = Vec::with_capacity(5 * 32);
        encoded.extend_from_slice(&keccak256(Self::TYPE_DESCRIPTOR.as_bytes()));
        encoded.extend_from_slice(&keccak256(self.name.as_bytes()));
        encoded.extend_from_slice(&keccak256(self.version.as_bytes()));
        encoded.extend_from_slice(&pad_u64(self.chain_id));
        encoded.extend_from_slice(&pad_address(&self.verifying_contract));
        keccak256(&encoded)
    }
}

/// A value in one of the field kinds Hyperliquid schemas use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Eip712Value {
    String(String),
    Bytes32([u8; 32]),
    Uint64(u64),
    Address([u8; 20]),
    Bool(bool),
}

impl Eip712Value {
    /// Encodes the value as its 32-byte EIP-712 word.
    #[must_use]
    pub fn encode(&self) -> [u8; 32] {
        match self {
            Self::String(s) => keccak256(s.as_bytes()),
            Self::Bytes32(b) => *b,
            Self::Uint64(n) => pad_u64(*n),
            Self::Address(a) => pad_address(a),
            Self::Bool(b) => pad_u64(u64::from(*b)),
        }
    }
}

/// Computes `hashStruct` for a flat schema: `keccak(typeHash ‖ enc(value_1) ‖ …)`.
///
/// `type_descriptor` is the complete type string including the primary type name and
/// its ordered field list; `values` must be in the same order.
#[must_use]
pub fn struct_hash(type_descriptor: &str, values: &[Eip712Value]) -> [u8; 32] {
    let mut encoded = Vec::with_capacity((values.len() + 1) * 32);
    encoded.extend_from_slice(&keccak256(type_descriptor.as_bytes()));
    for value in values {
        encoded.extend_from_slice(&value.encode());
    }
    keccak256(&encoded)
}

/// Computes the final signing digest: `keccak(0x1901 ‖ domainSeparator ‖ structHash)`.
#[must_use]
pub fn signing_digest(domain: &Eip712Domain, struct_hash: [u8; 32]) -> [u8; 32] {
    let mut data = Vec::with_capacity(2 + 32 + 32);
    data.push(0x19);
    data.push(0x01);
    data.extend_from_slice(&domain.separator());
    data.extend_from_slice(&struct_hash);
    keccak256(&data)
}

fn pad_u64(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

fn pad_address(address: &[u8; 20]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[12..].copy_from_slice(address);
    out
}
