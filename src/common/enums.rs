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

//! Enumerations for the Hyperliquid wire protocol.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Order side as encoded in Hyperliquid fills and book levels.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize, Deserialize,
)]
pub enum HyperliquidSide {
    /// Buy / bid side.
    #[serde(rename = "B")]
    #[strum(serialize = "B")]
    Buy,
    /// Sell / ask side.
    #[serde(rename = "A")]
    #[strum(serialize = "A")]
    Sell,
}

/// Time in force for limit orders.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize, Deserialize,
)]
pub enum HyperliquidTif {
    /// Add liquidity only (post only).
    Alo,
    /// Immediate or cancel.
    Ioc,
    /// Good til canceled.
    Gtc,
}

/// Take-profit / stop-loss discriminator for trigger orders.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HyperliquidTpSl {
    Tp,
    Sl,
}

/// Order grouping for batched placements.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize, Deserialize,
)]
pub enum HyperliquidGrouping {
    /// No grouping.
    #[serde(rename = "na")]
    #[strum(serialize = "na")]
    Na,
    /// TP/SL orders grouped with a new position-opening order.
    #[serde(rename = "normalTpsl")]
    #[strum(serialize = "normalTpsl")]
    NormalTpsl,
    /// TP/SL orders attached to an existing position.
    #[serde(rename = "positionTpsl")]
    #[strum(serialize = "positionTpsl")]
    PositionTpsl,
}

/// Candle bar interval as encoded on the wire.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum HyperliquidBarInterval {
    #[serde(rename = "1m")]
    #[strum(serialize = "1m")]
    OneMinute,
    #[serde(rename = "3m")]
    #[strum(serialize = "3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    #[strum(serialize = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    #[strum(serialize = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    #[strum(serialize = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    #[strum(serialize = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    #[strum(serialize = "4h")]
    FourHours,
    #[serde(rename = "8h")]
    #[strum(serialize = "8h")]
    EightHours,
    #[serde(rename = "12h")]
    #[strum(serialize = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    #[strum(serialize = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    #[strum(serialize = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    #[strum(serialize = "1w")]
    OneWeek,
    #[serde(rename = "1M")]
    #[strum(serialize = "1M")]
    OneMonth,
}

/// WebSocket request method.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HyperliquidWsMethod {
    Subscribe,
    Unsubscribe,
}

/// Market classification for assets addressed by the venue.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HyperliquidMarketKind {
    Perp,
    Spot,
}

/// Resulting order state derived from an exchange action response.
///
/// `Unknown` is returned when the response acknowledged the action without reporting a
/// resting or filled order (for example pure cancels, or batches where every entry
/// failed).
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize,
    Deserialize,
)]
pub enum HyperliquidSubmittedStatus {
    /// The order is resting on the book.
    Active,
    /// The order executed immediately.
    Filled,
    /// No order state could be derived from the response.
    #[default]
    Unknown,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_side_wire_encoding() {
        assert_eq!(serde_json::to_string(&HyperliquidSide::Buy).unwrap(), "\"B\"");
        assert_eq!(serde_json::to_string(&HyperliquidSide::Sell).unwrap(), "\"A\"");
    }

    #[rstest]
    fn test_tif_wire_encoding() {
        assert_eq!(serde_json::to_string(&HyperliquidTif::Gtc).unwrap(), "\"Gtc\"");
        assert_eq!(serde_json::to_string(&HyperliquidTif::Alo).unwrap(), "\"Alo\"");
    }

    #[rstest]
    fn test_grouping_wire_encoding() {
        assert_eq!(serde_json::to_string(&HyperliquidGrouping::Na).unwrap(), "\"na\"");
        assert_eq!(
            serde_json::to_string(&HyperliquidGrouping::NormalTpsl).unwrap(),
            "\"normalTpsl\""
        );
    }

    #[rstest]
    #[case(HyperliquidBarInterval::OneMinute, "1m")]
    #[case(HyperliquidBarInterval::OneHour, "1h")]
    #[case(HyperliquidBarInterval::OneMonth, "1M")]
    fn test_bar_interval_roundtrip(#[case] interval: HyperliquidBarInterval, #[case] s: &str) {
        assert_eq!(interval.to_string(), s);
        assert_eq!(s.parse::<HyperliquidBarInterval>().unwrap(), interval);

        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(json, format!("\"{s}\""));
        let back: HyperliquidBarInterval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, interval);
    }

    #[rstest]
    fn test_ws_method_display() {
        assert_eq!(HyperliquidWsMethod::Subscribe.to_string(), "subscribe");
        assert_eq!(HyperliquidWsMethod::Unsubscribe.to_string(), "unsubscribe");
    }
}
