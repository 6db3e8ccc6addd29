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

//! Message definitions for the Hyperliquid WebSocket protocol.
//!
//! Outbound frames are `{method, subscription}`; inbound frames are `{channel, data}`.
//! Inbound decoding is two-stage: the raw frame first, then the payload by a closed
//! channel enum, so unknown channels stay non-fatal while decode failures on known
//! channels are surfaced per message.

use std::{collections::HashMap, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use ustr::Ustr;

use crate::{
    common::enums::{HyperliquidBarInterval, HyperliquidSide, HyperliquidWsMethod},
    http::models::{HyperliquidCandle, HyperliquidL2Book, HyperliquidLevel, HyperliquidUserFill},
    websocket::error::HyperliquidWsError,
};

// -------------------------------------------------------------------------------------------------
// Outbound
// -------------------------------------------------------------------------------------------------

/// Outbound WebSocket request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum HyperliquidWsRequest {
    Subscribe {
        subscription: HyperliquidSubscription,
    },
    Unsubscribe {
        subscription: HyperliquidSubscription,
    },
    /// Application-level heartbeat; the venue answers on the `pong` channel.
    Ping,
}

/// Subscription descriptor for one data channel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HyperliquidSubscription {
    AllMids {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dex: Option<String>,
    },
    Notification {
        user: String,
    },
    WebData2 {
        user: String,
    },
    Candle {
        coin: Ustr,
        interval: HyperliquidBarInterval,
    },
    L2Book {
        coin: Ustr,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        n_sig_figs: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mantissa: Option<u32>,
    },
    Trades {
        coin: Ustr,
    },
    OrderUpdates {
        user: String,
    },
    UserEvents {
        user: String,
    },
    UserFills {
        user: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aggregate_by_time: Option<bool>,
    },
    UserFundings {
        user: String,
    },
    UserNonFundingLedgerUpdates {
        user: String,
    },
    ActiveAssetCtx {
        coin: Ustr,
    },
    ActiveAssetData {
        user: String,
        coin: Ustr,
    },
    UserTwapSliceFills {
        user: String,
    },
    UserTwapHistory {
        user: String,
    },
    Bbo {
        coin: Ustr,
    },
}

impl HyperliquidSubscription {
    /// Returns the wire `type` discriminator for this subscription.
    #[must_use]
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::AllMids { .. } => "allMids",
            Self::Notification { .. } => "notification",
            Self::WebData2 { .. } => "webData2",
            Self::Candle { .. } => "candle",
            Self::L2Book { .. } => "l2Book",
            Self::Trades { .. } => "trades",
            Self::OrderUpdates { .. } => "orderUpdates",
            Self::UserEvents { .. } => "userEvents",
            Self::UserFills { .. } => "userFills",
            Self::UserFundings { .. } => "userFundings",
            Self::UserNonFundingLedgerUpdates { .. } => "userNonFundingLedgerUpdates",
            Self::ActiveAssetCtx { .. } => "activeAssetCtx",
            Self::ActiveAssetData { .. } => "activeAssetData",
            Self::UserTwapSliceFills { .. } => "userTwapSliceFills",
            Self::UserTwapHistory { .. } => "userTwapHistory",
            Self::Bbo { .. } => "bbo",
        }
    }

    /// Canonical fingerprint used to correlate acknowledgements.
    ///
    /// The venue does not echo client correlation ids, only the subscription's own
    /// descriptive fields, so correlation is content-addressed: type, coin, interval,
    /// user, and dex components lower-cased and joined deterministically. Fields that
    /// only shape the data (book sig figs, fill aggregation) are not identity.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut parts: Vec<String> = vec![self.type_str().to_lowercase()];

        let (coin, interval, user, dex) = match self {
            Self::AllMids { dex } => (None, None, None, dex.clone()),
            Self::Notification { user } | Self::WebData2 { user } => {
                (None, None, Some(user.clone()), None)
            }
            Self::Candle { coin, interval } => {
                (Some(*coin), Some(interval.to_string()), None, None)
            }
            Self::L2Book { coin, .. }
            | Self::Trades { coin }
            | Self::ActiveAssetCtx { coin }
            | Self::Bbo { coin } => (Some(*coin), None, None, None),
            Self::OrderUpdates { user }
            | Self::UserEvents { user }
            | Self::UserFills { user, .. }
            | Self::UserFundings { user }
            | Self::UserNonFundingLedgerUpdates { user }
            | Self::UserTwapSliceFills { user }
            | Self::UserTwapHistory { user } => (None, None, Some(user.clone()), None),
            Self::ActiveAssetData { user, coin } => {
                (Some(*coin), None, Some(user.clone()), None)
            }
        };

        if let Some(coin) = coin {
            parts.push(coin.to_lowercase());
        }
        if let Some(interval) = interval {
            parts.push(interval.to_lowercase());
        }
        if let Some(user) = user {
            parts.push(user.to_lowercase());
        }
        if let Some(dex) = dex {
            parts.push(dex.to_lowercase());
        }

        parts.join(":")
    }
}

// -------------------------------------------------------------------------------------------------
// Inbound
// -------------------------------------------------------------------------------------------------

/// Raw inbound frame before payload decoding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidWsFrame {
    pub channel: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The closed set of channels this client understands.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum HyperliquidWsChannel {
    SubscriptionResponse,
    Error,
    Pong,
    AllMids,
    Notification,
    WebData2,
    Candle,
    L2Book,
    Trades,
    OrderUpdates,
    UserEvents,
    UserFills,
    UserFundings,
    UserNonFundingLedgerUpdates,
    ActiveAssetCtx,
    ActiveAssetData,
    UserTwapSliceFills,
    UserTwapHistory,
    Bbo,
}

/// Subscription acknowledgement payload (loosely typed; only `type` inside the echoed
/// descriptor is mandatory).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WsSubscriptionAck {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub subscription: Option<serde_json::Value>,
    #[serde(default)]
    pub err: Option<String>,
}

/// One trade tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsTrade {
    pub coin: Ustr,
    pub side: HyperliquidSide,
    pub px: String,
    pub sz: String,
    pub time: u64,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub tid: Option<u64>,
}

/// Best bid/offer update; `bbo` is `[bid, ask]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsBbo {
    pub coin: Ustr,
    pub time: u64,
    pub bbo: Vec<Option<HyperliquidLevel>>,
}

/// Order summary inside an order update.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsBasicOrder {
    pub coin: Ustr,
    pub side: HyperliquidSide,
    pub limit_px: String,
    pub sz: String,
    pub oid: u64,
    pub timestamp: u64,
    pub orig_sz: String,
    #[serde(default)]
    pub cloid: Option<String>,
    #[serde(default)]
    pub reduce_only: Option<bool>,
}

/// One order status transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsOrderUpdate {
    pub order: WsBasicOrder,
    pub status: String,
    pub status_timestamp: u64,
}

/// User event payload, discriminated by its single key.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WsUserEventData {
    Fills {
        fills: Vec<HyperliquidUserFill>,
    },
    Funding {
        funding: serde_json::Value,
    },
    Liquidation {
        liquidation: serde_json::Value,
    },
    NonUserCancel {
        #[serde(rename = "nonUserCancel")]
        non_user_cancel: Vec<serde_json::Value>,
    },
}

/// Streaming user fills with snapshot marker.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsUserFills {
    #[serde(default)]
    pub is_snapshot: Option<bool>,
    pub user: String,
    pub fills: Vec<HyperliquidUserFill>,
}

/// Streaming user funding payments.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsUserFundings {
    #[serde(default)]
    pub is_snapshot: Option<bool>,
    pub user: String,
    pub fundings: Vec<serde_json::Value>,
}

/// Streaming non-funding ledger updates.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsLedgerUpdates {
    #[serde(default)]
    pub is_snapshot: Option<bool>,
    pub user: String,
    pub non_funding_ledger_updates: Vec<serde_json::Value>,
}

/// Active asset context update (funding/open-interest snapshot for one coin).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsActiveAssetCtx {
    pub coin: Ustr,
    pub ctx: serde_json::Value,
}

/// Active asset data update: the user's current leverage and tradable ranges.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsActiveAssetData {
    pub user: String,
    pub coin: Ustr,
    pub leverage: serde_json::Value,
    pub max_trade_szs: Vec<String>,
    pub available_to_trade: Vec<String>,
    #[serde(default)]
    pub mark_px: Option<String>,
}

/// Mid prices for all coins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsAllMids {
    pub mids: HashMap<String, String>,
}

/// Free-form venue notification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsNotification {
    pub notification: String,
}

/// One decoded inbound message on a known channel.
#[derive(Clone, Debug)]
pub enum HyperliquidWsMessage {
    SubscriptionResponse(WsSubscriptionAck),
    Error(String),
    Pong,
    AllMids(WsAllMids),
    Notification(WsNotification),
    WebData2(serde_json::Value),
    Candle(HyperliquidCandle),
    L2Book(HyperliquidL2Book),
    Trades(Vec<WsTrade>),
    OrderUpdates(Vec<WsOrderUpdate>),
    UserEvents(WsUserEventData),
    UserFills(WsUserFills),
    UserFundings(WsUserFundings),
    UserNonFundingLedgerUpdates(WsLedgerUpdates),
    ActiveAssetCtx(WsActiveAssetCtx),
    ActiveAssetData(WsActiveAssetData),
    UserTwapSliceFills(serde_json::Value),
    UserTwapHistory(serde_json::Value),
    Bbo(WsBbo),
    /// Channel not in the closed set; surfaced as a notification, not an error.
    Unhandled { channel: String },
}

/// Decodes a raw frame into a typed message.
///
/// Unknown channels yield [`HyperliquidWsMessage::Unhandled`]; a decode failure on a
/// known channel is an error for that message only.
///
/// # Errors
///
/// Returns an error if the payload of a known channel fails to decode.
pub fn decode_frame(frame: HyperliquidWsFrame) -> Result<HyperliquidWsMessage, HyperliquidWsError> {
    let Ok(channel) = HyperliquidWsChannel::from_str(&frame.channel) else {
        return Ok(HyperliquidWsMessage::Unhandled {
            channel: frame.channel,
        });
    };

    let data = frame.data;
    let decode_err = |e: serde_json::Error| {
        HyperliquidWsError::MessageDeserialization(format!("channel {channel}: {e}"))
    };

    let message = match channel {
        HyperliquidWsChannel::SubscriptionResponse => {
            HyperliquidWsMessage::SubscriptionResponse(
                serde_json::from_value(data).map_err(decode_err)?,
            )
        }
        HyperliquidWsChannel::Error => HyperliquidWsMessage::Error(
            data.as_str()
                .map(ToString::to_string)
                .unwrap_or_else(|| data.to_string()),
        ),
        HyperliquidWsChannel::Pong => HyperliquidWsMessage::Pong,
        HyperliquidWsChannel::AllMids => {
            HyperliquidWsMessage::AllMids(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::Notification => {
            HyperliquidWsMessage::Notification(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::WebData2 => HyperliquidWsMessage::WebData2(data),
        HyperliquidWsChannel::Candle => {
            HyperliquidWsMessage::Candle(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::L2Book => {
            HyperliquidWsMessage::L2Book(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::Trades => {
            HyperliquidWsMessage::Trades(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::OrderUpdates => {
            HyperliquidWsMessage::OrderUpdates(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::UserEvents => {
            HyperliquidWsMessage::UserEvents(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::UserFills => {
            HyperliquidWsMessage::UserFills(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::UserFundings => {
            HyperliquidWsMessage::UserFundings(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::UserNonFundingLedgerUpdates => {
            HyperliquidWsMessage::UserNonFundingLedgerUpdates(
                serde_json::from_value(data).map_err(decode_err)?,
            )
        }
        HyperliquidWsChannel::ActiveAssetCtx => {
            HyperliquidWsMessage::ActiveAssetCtx(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::ActiveAssetData => {
            HyperliquidWsMessage::ActiveAssetData(serde_json::from_value(data).map_err(decode_err)?)
        }
        HyperliquidWsChannel::UserTwapSliceFills => HyperliquidWsMessage::UserTwapSliceFills(data),
        HyperliquidWsChannel::UserTwapHistory => HyperliquidWsMessage::UserTwapHistory(data),
        HyperliquidWsChannel::Bbo => {
            HyperliquidWsMessage::Bbo(serde_json::from_value(data).map_err(decode_err)?)
        }
    };

    Ok(message)
}

/// A pending subscribe/unsubscribe request awaiting its acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWsRequest {
    pub method: HyperliquidWsMethod,
    pub subscription: HyperliquidSubscription,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn test_subscribe_request_wire_shape() {
        let request = HyperliquidWsRequest::Subscribe {
            subscription: HyperliquidSubscription::Trades {
                coin: Ustr::from("BTC"),
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"method": "subscribe", "subscription": {"type": "trades", "coin": "BTC"}})
        );
    }

    #[rstest]
    fn test_ping_request_wire_shape() {
        assert_eq!(
            serde_json::to_value(HyperliquidWsRequest::Ping).unwrap(),
            json!({"method": "ping"})
        );
    }

    #[rstest]
    fn test_fingerprint_components() {
        let candle = HyperliquidSubscription::Candle {
            coin: Ustr::from("BTC"),
            interval: HyperliquidBarInterval::OneMinute,
        };
        assert_eq!(candle.fingerprint(), "candle:btc:1m");

        let fills = HyperliquidSubscription::UserFills {
            user: "0xABCD".to_string(),
            aggregate_by_time: None,
        };
        assert_eq!(fills.fingerprint(), "userfills:0xabcd");

        let mids = HyperliquidSubscription::AllMids { dex: None };
        assert_eq!(mids.fingerprint(), "allmids");
    }

    #[rstest]
    fn test_fingerprint_ignores_non_identity_fields() {
        let plain = HyperliquidSubscription::L2Book {
            coin: Ustr::from("ETH"),
            n_sig_figs: None,
            mantissa: None,
        };
        let shaped = HyperliquidSubscription::L2Book {
            coin: Ustr::from("ETH"),
            n_sig_figs: Some(5),
            mantissa: Some(2),
        };

        assert_eq!(plain.fingerprint(), shaped.fingerprint());
    }

    #[rstest]
    fn test_decode_unknown_channel_is_unhandled() {
        let frame: HyperliquidWsFrame =
            serde_json::from_value(json!({"channel": "someNewFeed", "data": {"x": 1}})).unwrap();

        let message = decode_frame(frame).unwrap();
        assert!(matches!(
            message,
            HyperliquidWsMessage::Unhandled { ref channel } if channel == "someNewFeed"
        ));
    }

    #[rstest]
    fn test_decode_known_channel_bad_payload_is_error() {
        let frame: HyperliquidWsFrame =
            serde_json::from_value(json!({"channel": "trades", "data": {"not": "an array"}}))
                .unwrap();

        assert!(matches!(
            decode_frame(frame),
            Err(HyperliquidWsError::MessageDeserialization(_))
        ));
    }

    #[rstest]
    fn test_decode_trades() {
        let frame: HyperliquidWsFrame = serde_json::from_value(json!({
            "channel": "trades",
            "data": [{"coin": "BTC", "side": "B", "px": "50000.0", "sz": "0.1", "time": 1_700_000_000_000u64, "tid": 7}]
        }))
        .unwrap();

        let message = decode_frame(frame).unwrap();
        match message {
            HyperliquidWsMessage::Trades(trades) => {
                assert_eq!(trades.len(), 1);
                assert_eq!(trades[0].coin, "BTC");
                assert_eq!(trades[0].side, HyperliquidSide::Buy);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[rstest]
    fn test_decode_pong_without_data() {
        let frame: HyperliquidWsFrame =
            serde_json::from_value(json!({"channel": "pong"})).unwrap();
        assert!(matches!(
            decode_frame(frame).unwrap(),
            HyperliquidWsMessage::Pong
        ));
    }

    #[rstest]
    fn test_subscription_round_trip() {
        let subscription = HyperliquidSubscription::ActiveAssetData {
            user: "0xabc".to_string(),
            coin: Ustr::from("SOL"),
        };

        let json = serde_json::to_string(&subscription).unwrap();
        let back: HyperliquidSubscription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subscription);
    }
}
