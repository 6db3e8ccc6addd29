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

//! Typed request builders for the `/info` endpoint.
//!
//! Every info request is a POST to the same path with a `"type"` discriminator plus
//! type-specific fields, so the whole read surface is one closed enum. `startTime` and
//! `endTime` are always epoch milliseconds as JSON numbers, never strings. User and
//! vault addresses are normalized to lowercase hex by the client before requests are
//! built.

use serde::{Deserialize, Serialize};

use crate::common::enums::HyperliquidBarInterval;

/// Order identifier accepted by `orderStatus`: exchange oid or client order id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperliquidOidOrCloid {
    /// Exchange-assigned order id.
    Oid(u64),
    /// Client order id (16-byte hex string).
    Cloid(String),
}

/// Inner body of a `candleSnapshot` request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidCandleSnapshotReq {
    pub coin: String,
    pub interval: HyperliquidBarInterval,
    pub start_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
}

/// The closed set of `/info` request bodies.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HyperliquidInfoRequest {
    Meta {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dex: Option<String>,
    },
    MetaAndAssetCtxs,
    SpotMeta,
    SpotMetaAndAssetCtxs,
    AllMids {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dex: Option<String>,
    },
    L2Book {
        coin: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        n_sig_figs: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mantissa: Option<u32>,
    },
    CandleSnapshot {
        req: HyperliquidCandleSnapshotReq,
    },
    OpenOrders {
        user: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dex: Option<String>,
    },
    FrontendOpenOrders {
        user: String,
    },
    UserFills {
        user: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aggregate_by_time: Option<bool>,
    },
    UserFillsByTime {
        user: String,
        start_time: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_time: Option<u64>,
    },
    UserFunding {
        user: String,
        start_time: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_time: Option<u64>,
    },
    UserNonFundingLedgerUpdates {
        user: String,
        start_time: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_time: Option<u64>,
    },
    FundingHistory {
        coin: String,
        start_time: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_time: Option<u64>,
    },
    OrderStatus {
        user: String,
        oid: HyperliquidOidOrCloid,
    },
    ClearinghouseState {
        user: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dex: Option<String>,
    },
    SpotClearinghouseState {
        user: String,
    },
    ActiveAssetData {
        user: String,
        coin: String,
    },
    Referral {
        user: String,
    },
    SubAccounts {
        user: String,
    },
    UserFees {
        user: String,
    },
    Delegations {
        user: String,
    },
    DelegatorSummary {
        user: String,
    },
    DelegatorHistory {
        user: String,
    },
    DelegatorRewards {
        user: String,
    },
    HistoricalOrders {
        user: String,
    },
    UserTwapSliceFills {
        user: String,
    },
    UserVaultEquities {
        user: String,
    },
    VaultDetails {
        vault_address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user: Option<String>,
    },
    UserRole {
        user: String,
    },
    Portfolio {
        user: String,
    },
    PredictedFundings,
    PerpsAtOpenInterestCap,
    TokenDetails {
        token_id: String,
    },
    SpotDeployState {
        user: String,
    },
    MaxBuilderFee {
        user: String,
        builder: String,
    },
    UserRateLimit {
        user: String,
    },
    ExchangeStatus,
    PerpDexs,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn test_meta_request_shape() {
        let request = HyperliquidInfoRequest::Meta { dex: None };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"type": "meta"}));

        let with_dex = HyperliquidInfoRequest::Meta {
            dex: Some("test".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&with_dex).unwrap(),
            json!({"type": "meta", "dex": "test"})
        );
    }

    #[rstest]
    fn test_time_bounds_are_numbers() {
        let request = HyperliquidInfoRequest::UserFillsByTime {
            user: "0xabc".to_string(),
            start_time: 1_700_000_000_000,
            end_time: Some(1_700_000_100_000),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "userFillsByTime");
        assert!(value["startTime"].is_u64());
        assert!(value["endTime"].is_u64());
    }

    #[rstest]
    fn test_candle_snapshot_nests_req() {
        let request = HyperliquidInfoRequest::CandleSnapshot {
            req: HyperliquidCandleSnapshotReq {
                coin: "BTC".to_string(),
                interval: HyperliquidBarInterval::OneMinute,
                start_time: 1_700_000_000_000,
                end_time: None,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "candleSnapshot");
        assert_eq!(value["req"]["coin"], "BTC");
        assert_eq!(value["req"]["interval"], "1m");
        assert!(!value["req"].as_object().unwrap().contains_key("endTime"));
    }

    #[rstest]
    fn test_order_status_accepts_oid_or_cloid() {
        let by_oid = HyperliquidInfoRequest::OrderStatus {
            user: "0xabc".to_string(),
            oid: HyperliquidOidOrCloid::Oid(42),
        };
        assert_eq!(serde_json::to_value(&by_oid).unwrap()["oid"], json!(42));

        let by_cloid = HyperliquidInfoRequest::OrderStatus {
            user: "0xabc".to_string(),
            oid: HyperliquidOidOrCloid::Cloid("0x1234567890abcdef1234567890abcdef".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&by_cloid).unwrap()["oid"],
            json!("0x1234567890abcdef1234567890abcdef")
        );
    }

    #[rstest]
    fn test_round_trip_preserves_request() {
        let request = HyperliquidInfoRequest::L2Book {
            coin: "ETH".to_string(),
            n_sig_figs: Some(5),
            mantissa: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: HyperliquidInfoRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(
            serde_json::to_value(&back).unwrap(),
            serde_json::to_value(&request).unwrap()
        );
    }
}
