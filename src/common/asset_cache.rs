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

//! Thread-safe coin symbol to asset-index cache.
//!
//! Every Hyperliquid order, cancel, and margin action addresses assets by their integer
//! index in the venue's universe listing rather than by symbol, so the HTTP client keeps
//! a session-scoped cache populated from the metadata endpoints.
//!
//! # Design
//!
//! The cache itself is pure: [`HyperliquidAssetCache::lookup`] never does I/O, and
//! refreshes install a fully built replacement map in one write so concurrent readers
//! never observe a half-built state. The network fetch happens in the HTTP client with
//! no lock held; concurrent refreshes may race, but each installs a self-consistent
//! snapshot and the last writer wins.

use std::sync::RwLock;

use ahash::AHashMap;

use crate::{
    common::consts::HYPERLIQUID_SPOT_ASSET_OFFSET,
    http::models::{HyperliquidMeta, HyperliquidSpotMeta},
};

/// Session-scoped mapping from uppercased coin symbol to venue asset index.
#[derive(Debug, Default)]
pub struct HyperliquidAssetCache {
    assets: RwLock<AHashMap<String, u32>>,
}

impl HyperliquidAssetCache {
    /// Creates a new empty asset cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the asset index for a coin symbol (case-insensitive).
    ///
    /// Cache-only: never triggers a metadata fetch.
    #[must_use]
    pub fn lookup(&self, coin: &str) -> Option<u32> {
        let assets = self.assets.read().expect("asset cache lock poisoned");
        assets.get(&coin.to_uppercase()).copied()
    }

    /// Replaces the entire cache contents with a freshly built map.
    pub fn install(&self, map: AHashMap<String, u32>) {
        let mut assets = self.assets.write().expect("asset cache lock poisoned");
        *assets = map;
    }

    /// Clears all cached entries.
    ///
    /// Called when the wallet is (re)bound: new credentials imply a fresh session.
    pub fn clear(&self) {
        let mut assets = self.assets.write().expect("asset cache lock poisoned");
        assets.clear();
    }

    /// Returns the number of cached assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.read().expect("asset cache lock poisoned").len()
    }

    /// Returns whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the replacement asset map from venue metadata.
///
/// Perp assets are keyed by uppercased name with their positional universe index,
/// excluding delisted markets. Spot pairs are admitted at `10000 + index` per the
/// venue's spot addressing convention; a perp entry always wins on a name collision.
/// Index positions are preserved exactly as returned, never re-sorted.
#[must_use]
pub fn build_asset_map(
    meta: &HyperliquidMeta,
    spot_meta: Option<&HyperliquidSpotMeta>,
) -> AHashMap<String, u32> {
    let mut map = AHashMap::new();

    if let Some(spot) = spot_meta {
        for (idx, pair) in spot.universe.iter().enumerate() {
            map.insert(
                pair.name.to_uppercase(),
                HYPERLIQUID_SPOT_ASSET_OFFSET + idx as u32,
            );
        }
    }

    for (idx, asset) in meta.universe.iter().enumerate() {
        if asset.is_delisted.unwrap_or(false) {
            continue;
        }
        map.insert(asset.name.to_uppercase(), idx as u32);
    }

    map
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::http::models::{HyperliquidAssetInfo, HyperliquidSpotPair};

    fn meta_with(assets: &[(&str, bool)]) -> HyperliquidMeta {
        HyperliquidMeta {
            universe: assets
                .iter()
                .map(|(name, delisted)| HyperliquidAssetInfo {
                    name: (*name).to_string(),
                    sz_decimals: 3,
                    max_leverage: Some(50),
                    only_isolated: None,
                    is_delisted: if *delisted { Some(true) } else { None },
                })
                .collect(),
        }
    }

    #[rstest]
    fn test_build_excludes_delisted_and_preserves_positions() {
        let meta = meta_with(&[("BTC", false), ("ETH", true), ("SOL", false)]);
        let map = build_asset_map(&meta, None);

        assert_eq!(map.get("BTC"), Some(&0));
        assert_eq!(map.get("ETH"), None);
        assert_eq!(map.get("SOL"), Some(&2)); // positional, not compacted
    }

    #[rstest]
    fn test_lookup_is_case_insensitive_and_pure() {
        let cache = HyperliquidAssetCache::new();
        assert!(cache.lookup("btc").is_none());

        let meta = meta_with(&[("BTC", false)]);
        cache.install(build_asset_map(&meta, None));

        assert_eq!(cache.lookup("btc"), Some(0));
        assert_eq!(cache.lookup("BTC"), Some(0));
    }

    #[rstest]
    fn test_install_replaces_wholesale() {
        let cache = HyperliquidAssetCache::new();
        cache.install(build_asset_map(&meta_with(&[("BTC", false)]), None));
        assert_eq!(cache.lookup("BTC"), Some(0));

        cache.install(build_asset_map(&meta_with(&[("SOL", false)]), None));
        assert!(cache.lookup("BTC").is_none());
        assert_eq!(cache.lookup("SOL"), Some(0));
    }

    #[rstest]
    fn test_spot_offset_and_perp_priority() {
        let meta = meta_with(&[("PURR", false)]);
        let spot = HyperliquidSpotMeta {
            universe: vec![
                HyperliquidSpotPair {
                    name: "PURR/USDC".to_string(),
                    tokens: vec![1, 0],
                    index: 0,
                    is_canonical: true,
                },
                HyperliquidSpotPair {
                    name: "PURR".to_string(),
                    tokens: vec![1, 0],
                    index: 1,
                    is_canonical: false,
                },
            ],
            tokens: vec![],
        };

        let map = build_asset_map(&meta, Some(&spot));
        assert_eq!(map.get("PURR/USDC"), Some(&10_000));
        // Name collision: the perp index wins over the spot entry.
        assert_eq!(map.get("PURR"), Some(&0));
    }

    #[rstest]
    fn test_clear() {
        let cache = HyperliquidAssetCache::new();
        cache.install(build_asset_map(&meta_with(&[("BTC", false)]), None));
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
    }
}
