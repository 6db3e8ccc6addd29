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

//! Core constants shared across the Hyperliquid adapter components.

pub const HYPERLIQUID: &str = "HYPERLIQUID";

// HTTP endpoints
pub const HYPERLIQUID_HTTP_URL: &str = "https://api.hyperliquid.xyz";
pub const HYPERLIQUID_HTTP_TESTNET_URL: &str = "https://api.hyperliquid-testnet.xyz";

// WebSocket endpoints
pub const HYPERLIQUID_WS_URL: &str = "wss://api.hyperliquid.xyz/ws";
pub const HYPERLIQUID_WS_TESTNET_URL: &str = "wss://api.hyperliquid-testnet.xyz/ws";

// Endpoint paths (single fixed POST path each)
pub const HYPERLIQUID_INFO_PATH: &str = "/info";
pub const HYPERLIQUID_EXCHANGE_PATH: &str = "/exchange";

/// Spot markets are addressed at this offset above their universe index.
pub const HYPERLIQUID_SPOT_ASSET_OFFSET: u32 = 10_000;

/// Determines whether a configured endpoint URL addresses the testnet deployment.
///
/// Classification is by the literal `"testnet"` substring; any URL without it is
/// treated as mainnet. Misclassifying testnet as mainnet only produces a signature
/// the venue rejects, whereas the reverse would be dangerous, so the default
/// deployment URLs must always contain the substring on testnet.
#[must_use]
pub fn is_testnet_url(url: &str) -> bool {
    url.contains("testnet")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(HYPERLIQUID_HTTP_URL, false)]
    #[case(HYPERLIQUID_HTTP_TESTNET_URL, true)]
    #[case(HYPERLIQUID_WS_TESTNET_URL, true)]
    #[case("https://staging.internal.example.com", false)] // fail-open to mainnet
    fn test_is_testnet_url(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_testnet_url(url), expected);
    }
}
