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

//! Parsing and formatting helpers for Hyperliquid wire conventions.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};

/// Normalizes an EVM address to the venue's wire form: lowercase hex with `0x` prefix.
///
/// Callers may pass mixed-case addresses with or without the prefix.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    let stripped = address.strip_prefix("0x").unwrap_or(address);
    format!("0x{}", stripped.to_lowercase())
}

/// Parses an EVM address into its 20 raw bytes.
///
/// # Errors
///
/// Returns an error if the input is not valid hex or not exactly 20 bytes.
pub fn parse_address_bytes(address: &str) -> Result<[u8; 20], String> {
    let stripped = address.strip_prefix("0x").unwrap_or(address);
    let bytes =
        hex::decode(stripped).map_err(|e| format!("invalid address hex '{address}': {e}"))?;
    if bytes.len() != 20 {
        return Err(format!(
            "address must be 20 bytes, was {} ('{address}')",
            bytes.len()
        ));
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Formats a decimal amount the way the venue expects it in JSON string fields:
/// plain notation with trailing zeros trimmed, never scientific notation.
#[must_use]
pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Serializes a [`Decimal`] as a normalized amount string.
///
/// # Errors
///
/// Returns a serializer error if string emission fails.
pub fn serialize_decimal_as_str<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_amount(*value))
}

/// Deserializes a [`Decimal`] from the venue's string representation.
///
/// # Errors
///
/// Returns a deserializer error if the string is not a valid decimal.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<Decimal>().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    #[case("0xABCDEF0123456789abcdef0123456789ABCDEF01", "0xabcdef0123456789abcdef0123456789abcdef01")]
    #[case("abcdef0123456789abcdef0123456789abcdef01", "0xabcdef0123456789abcdef0123456789abcdef01")]
    fn test_normalize_address(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_address(input), expected);
    }

    #[rstest]
    fn test_parse_address_bytes_rejects_bad_input() {
        assert!(parse_address_bytes("0x1234").is_err());
        assert!(parse_address_bytes("not-hex").is_err());
        assert!(parse_address_bytes("0xabcdef0123456789abcdef0123456789abcdef01").is_ok());
    }

    #[rstest]
    #[case(dec!(100.2500), "100.25")]
    #[case(dec!(0.0010), "0.001")]
    #[case(dec!(42), "42")]
    #[case(dec!(0), "0")]
    fn test_format_amount(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(value), expected);
    }
}
