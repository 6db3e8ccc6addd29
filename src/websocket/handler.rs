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

//! WebSocket message handler for Hyperliquid.
//!
//! One handler task per connection processes commands and inbound frames through a
//! single `select!` loop: no two frames are processed concurrently, and events reach
//! the output channel in the exact order frames were received. A decode failure on a
//! known channel is surfaced as an event for that message only; the loop continues.

use std::sync::{Arc, RwLock};

use ahash::AHashMap;
use ustr::Ustr;

use crate::{
    common::enums::{HyperliquidMarketKind, HyperliquidWsMethod},
    websocket::{
        error::HyperliquidWsError,
        messages::{
            HyperliquidSubscription, HyperliquidWsFrame, HyperliquidWsMessage,
            HyperliquidWsRequest, WsActiveAssetCtx, WsActiveAssetData, WsAllMids, WsBbo,
            WsLedgerUpdates, WsNotification, WsOrderUpdate, WsTrade, WsUserEventData, WsUserFills,
            WsUserFundings, decode_frame,
        },
        subscriptions::{SubscriptionOutcome, SubscriptionState},
    },
};
use crate::http::models::{HyperliquidCandle, HyperliquidL2Book};

/// Commands sent from the outer client to the handler task.
#[derive(Debug)]
pub enum HandlerCommand {
    /// Subscribe to the given subscriptions.
    Subscribe {
        subscriptions: Vec<HyperliquidSubscription>,
    },
    /// Unsubscribe from the given subscriptions.
    Unsubscribe {
        subscriptions: Vec<HyperliquidSubscription>,
    },
    /// Stop processing and end the handler task.
    Disconnect,
}

/// Typed event published to the output channel, in frame arrival order.
#[derive(Clone, Debug)]
pub enum HyperliquidWsEvent {
    /// A subscription was confirmed by the venue.
    Subscribed(HyperliquidSubscription),
    /// An unsubscription was confirmed by the venue.
    Unsubscribed(HyperliquidSubscription),
    /// A subscription-level failure (ack error or reconciliation failure).
    SubscriptionError(HyperliquidWsError),
    Trades(Vec<WsTrade>),
    Book(HyperliquidL2Book),
    Bbo(WsBbo),
    Candle(HyperliquidCandle),
    OrderUpdates(Vec<WsOrderUpdate>),
    UserEvents(WsUserEventData),
    UserFills(WsUserFills),
    UserFundings(WsUserFundings),
    LedgerUpdates(WsLedgerUpdates),
    ActiveAssetCtx(WsActiveAssetCtx),
    ActiveAssetData(WsActiveAssetData),
    AllMids(WsAllMids),
    Notification(WsNotification),
    WebData(serde_json::Value),
    TwapSliceFills(serde_json::Value),
    TwapHistory(serde_json::Value),
    /// The venue's error channel; carries its literal message.
    VenueError(String),
    /// A known channel whose payload failed to decode; the read loop continues.
    DecodeError(String),
    /// A channel outside the closed set; informational, never an error.
    Unhandled { channel: String },
    Pong,
}

/// Last-write-wins cache of active-asset-data ticks, keyed by market kind and coin.
///
/// Lets callers read the most recent leverage/available-to-trade snapshot without
/// waiting on a new tick. Entries are overwritten wholesale per key, never merged.
#[derive(Debug, Default)]
pub struct ActiveAssetDataCache {
    inner: RwLock<AHashMap<(HyperliquidMarketKind, Ustr), WsActiveAssetData>>,
}

impl ActiveAssetDataCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest snapshot for a market, if one has arrived.
    #[must_use]
    pub fn get(&self, kind: HyperliquidMarketKind, coin: &Ustr) -> Option<WsActiveAssetData> {
        self.inner
            .read()
            .expect("active asset data lock poisoned")
            .get(&(kind, *coin))
            .cloned()
    }

    /// Stores a snapshot, replacing any previous entry for the key.
    pub fn update(&self, data: WsActiveAssetData) {
        let kind = market_kind_for_coin(&data.coin);
        self.inner
            .write()
            .expect("active asset data lock poisoned")
            .insert((kind, data.coin), data);
    }
}

/// Classifies a coin identifier: spot markets use `@index` or `BASE/QUOTE` forms.
#[must_use]
pub fn market_kind_for_coin(coin: &str) -> HyperliquidMarketKind {
    if coin.starts_with('@') || coin.contains('/') {
        HyperliquidMarketKind::Spot
    } else {
        HyperliquidMarketKind::Perp
    }
}

pub(crate) struct FeedHandler {
    cmd_rx: tokio::sync::mpsc::UnboundedReceiver<HandlerCommand>,
    raw_rx: tokio::sync::mpsc::UnboundedReceiver<String>,
    ws_tx: tokio::sync::mpsc::Sender<HyperliquidWsRequest>,
    subscriptions: Arc<SubscriptionState>,
    asset_data: Arc<ActiveAssetDataCache>,
    event_buffer: Vec<HyperliquidWsEvent>,
}

impl FeedHandler {
    pub(crate) fn new(
        cmd_rx: tokio::sync::mpsc::UnboundedReceiver<HandlerCommand>,
        raw_rx: tokio::sync::mpsc::UnboundedReceiver<String>,
        ws_tx: tokio::sync::mpsc::Sender<HyperliquidWsRequest>,
        subscriptions: Arc<SubscriptionState>,
        asset_data: Arc<ActiveAssetDataCache>,
    ) -> Self {
        Self {
            cmd_rx,
            raw_rx,
            ws_tx,
            subscriptions,
            asset_data,
            event_buffer: Vec::new(),
        }
    }

    /// Returns the next event, processing commands and frames until one is produced.
    ///
    /// Returns `None` when the connection and command channels are both closed or a
    /// disconnect was requested.
    pub(crate) async fn next(&mut self) -> Option<HyperliquidWsEvent> {
        loop {
            if !self.event_buffer.is_empty() {
                return Some(self.event_buffer.remove(0));
            }

            tokio::select! {
                // Commands are drained before frames so a subscribe is always
                // recorded as pending before its ack can be observed.
                biased;

                Some(cmd) = self.cmd_rx.recv() => {
                    match cmd {
                        HandlerCommand::Subscribe { subscriptions } => {
                            self.request(HyperliquidWsMethod::Subscribe, subscriptions).await;
                        }
                        HandlerCommand::Unsubscribe { subscriptions } => {
                            self.request(HyperliquidWsMethod::Unsubscribe, subscriptions).await;
                        }
                        HandlerCommand::Disconnect => {
                            tracing::debug!("Handler received disconnect command");
                            return None;
                        }
                    }
                }

                Some(text) = self.raw_rx.recv() => {
                    if let Some(event) = self.handle_frame(&text) {
                        return Some(event);
                    }
                }

                else => {
                    tracing::debug!("Handler shutting down: channels closed");
                    return None;
                }
            }
        }
    }

    /// Sends subscribe/unsubscribe frames, recording each as pending first so a fast
    /// ack always finds its match; failed sends are rolled back.
    async fn request(
        &mut self,
        method: HyperliquidWsMethod,
        subscriptions: Vec<HyperliquidSubscription>,
    ) {
        for subscription in subscriptions {
            self.subscriptions.enqueue(method, subscription.clone());

            let request = match method {
                HyperliquidWsMethod::Subscribe => HyperliquidWsRequest::Subscribe {
                    subscription: subscription.clone(),
                },
                HyperliquidWsMethod::Unsubscribe => HyperliquidWsRequest::Unsubscribe {
                    subscription: subscription.clone(),
                },
            };

            if let Err(e) = self.ws_tx.send(request).await {
                tracing::error!("Failed to send {method} request: {e}");
                self.subscriptions.rollback(method, &subscription);
                self.event_buffer.push(HyperliquidWsEvent::SubscriptionError(
                    HyperliquidWsError::ClientError(format!(
                        "send failed for {method} {subscription:?}: {e}"
                    )),
                ));
            }
        }
    }

    fn handle_frame(&mut self, text: &str) -> Option<HyperliquidWsEvent> {
        let frame: HyperliquidWsFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to decode frame: {e} | text: {text}");
                return Some(HyperliquidWsEvent::DecodeError(format!("frame: {e}")));
            }
        };

        let message = match decode_frame(frame) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("Failed to decode payload: {e}");
                return Some(HyperliquidWsEvent::DecodeError(e.to_string()));
            }
        };

        let event = match message {
            HyperliquidWsMessage::SubscriptionResponse(ack) => {
                match self.subscriptions.handle_ack(&ack) {
                    Ok(SubscriptionOutcome::Subscribed(sub)) => {
                        HyperliquidWsEvent::Subscribed(sub)
                    }
                    Ok(SubscriptionOutcome::Unsubscribed(sub)) => {
                        HyperliquidWsEvent::Unsubscribed(sub)
                    }
                    Err(e) => {
                        tracing::warn!("Subscription reconciliation failed: {e}");
                        HyperliquidWsEvent::SubscriptionError(e)
                    }
                }
            }
            HyperliquidWsMessage::Error(message) => {
                tracing::warn!("Venue error: {message}");
                HyperliquidWsEvent::VenueError(message)
            }
            HyperliquidWsMessage::Pong => HyperliquidWsEvent::Pong,
            HyperliquidWsMessage::AllMids(mids) => HyperliquidWsEvent::AllMids(mids),
            HyperliquidWsMessage::Notification(n) => HyperliquidWsEvent::Notification(n),
            HyperliquidWsMessage::WebData2(data) => HyperliquidWsEvent::WebData(data),
            HyperliquidWsMessage::Candle(candle) => HyperliquidWsEvent::Candle(candle),
            HyperliquidWsMessage::L2Book(book) => HyperliquidWsEvent::Book(book),
            HyperliquidWsMessage::Trades(trades) => HyperliquidWsEvent::Trades(trades),
            HyperliquidWsMessage::OrderUpdates(updates) => {
                HyperliquidWsEvent::OrderUpdates(updates)
            }
            HyperliquidWsMessage::UserEvents(events) => HyperliquidWsEvent::UserEvents(events),
            HyperliquidWsMessage::UserFills(fills) => HyperliquidWsEvent::UserFills(fills),
            HyperliquidWsMessage::UserFundings(fundings) => {
                HyperliquidWsEvent::UserFundings(fundings)
            }
            HyperliquidWsMessage::UserNonFundingLedgerUpdates(updates) => {
                HyperliquidWsEvent::LedgerUpdates(updates)
            }
            HyperliquidWsMessage::ActiveAssetCtx(ctx) => HyperliquidWsEvent::ActiveAssetCtx(ctx),
            HyperliquidWsMessage::ActiveAssetData(data) => {
                self.asset_data.update(data.clone());
                HyperliquidWsEvent::ActiveAssetData(data)
            }
            HyperliquidWsMessage::UserTwapSliceFills(data) => {
                HyperliquidWsEvent::TwapSliceFills(data)
            }
            HyperliquidWsMessage::UserTwapHistory(data) => HyperliquidWsEvent::TwapHistory(data),
            HyperliquidWsMessage::Bbo(bbo) => HyperliquidWsEvent::Bbo(bbo),
            HyperliquidWsMessage::Unhandled { channel } => {
                tracing::debug!("Unhandled channel: {channel}");
                HyperliquidWsEvent::Unhandled { channel }
            }
        };

        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn asset_data(coin: &str, leverage: u64) -> WsActiveAssetData {
        WsActiveAssetData {
            user: "0xabc".to_string(),
            coin: Ustr::from(coin),
            leverage: json!({"type": "cross", "value": leverage}),
            max_trade_szs: vec!["1".to_string(), "2".to_string()],
            available_to_trade: vec!["100".to_string(), "200".to_string()],
            mark_px: None,
        }
    }

    #[rstest]
    #[case("BTC", HyperliquidMarketKind::Perp)]
    #[case("@142", HyperliquidMarketKind::Spot)]
    #[case("PURR/USDC", HyperliquidMarketKind::Spot)]
    fn test_market_kind_classification(#[case] coin: &str, #[case] expected: HyperliquidMarketKind) {
        assert_eq!(market_kind_for_coin(coin), expected);
    }

    #[rstest]
    fn test_active_asset_data_last_write_wins() {
        let cache = ActiveAssetDataCache::new();
        let coin = Ustr::from("BTC");

        assert!(cache.get(HyperliquidMarketKind::Perp, &coin).is_none());

        cache.update(asset_data("BTC", 10));
        cache.update(asset_data("BTC", 25));

        let latest = cache.get(HyperliquidMarketKind::Perp, &coin).unwrap();
        assert_eq!(latest.leverage["value"], 25);
    }

    #[tokio::test]
    async fn test_handler_preserves_frame_order() {
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
        let (raw_tx, raw_rx) = tokio::sync::mpsc::unbounded_channel();
        let (ws_tx, _ws_rx) = tokio::sync::mpsc::channel(8);

        let mut handler = FeedHandler::new(
            cmd_rx,
            raw_rx,
            ws_tx,
            Arc::new(SubscriptionState::new()),
            Arc::new(ActiveAssetDataCache::new()),
        );

        raw_tx
            .send(json!({"channel": "trades", "data": [{"coin": "BTC", "side": "B", "px": "1", "sz": "1", "time": 1u64}]}).to_string())
            .unwrap();
        raw_tx
            .send(json!({"channel": "trades", "data": "garbage"}).to_string())
            .unwrap();
        raw_tx
            .send(json!({"channel": "pong"}).to_string())
            .unwrap();
        drop(raw_tx);
        drop(cmd_tx);

        // Delivered strictly in arrival order; the decode failure does not stop the loop.
        assert!(matches!(
            handler.next().await,
            Some(HyperliquidWsEvent::Trades(_))
        ));
        assert!(matches!(
            handler.next().await,
            Some(HyperliquidWsEvent::DecodeError(_))
        ));
        assert!(matches!(handler.next().await, Some(HyperliquidWsEvent::Pong)));
        assert!(handler.next().await.is_none());
    }

    #[tokio::test]
    async fn test_handler_routes_acks_through_reconciler() {
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
        let (raw_tx, raw_rx) = tokio::sync::mpsc::unbounded_channel();
        let (ws_tx, mut ws_rx) = tokio::sync::mpsc::channel(8);
        let subscriptions = Arc::new(SubscriptionState::new());

        let mut handler = FeedHandler::new(
            cmd_rx,
            raw_rx,
            ws_tx,
            Arc::clone(&subscriptions),
            Arc::new(ActiveAssetDataCache::new()),
        );

        cmd_tx
            .send(HandlerCommand::Subscribe {
                subscriptions: vec![HyperliquidSubscription::Trades {
                    coin: Ustr::from("BTC"),
                }],
            })
            .unwrap();
        raw_tx
            .send(
                json!({
                    "channel": "subscriptionResponse",
                    "data": {"method": "subscribe", "subscription": {"type": "trades", "coin": "BTC"}}
                })
                .to_string(),
            )
            .unwrap();
        drop(raw_tx);
        drop(cmd_tx);

        let event = handler.next().await.unwrap();
        assert!(matches!(event, HyperliquidWsEvent::Subscribed(_)));
        assert_eq!(subscriptions.active_subscriptions().len(), 1);

        // The subscribe frame went out on the wire.
        let sent = ws_rx.recv().await.unwrap();
        assert!(matches!(sent, HyperliquidWsRequest::Subscribe { .. }));
    }

    #[tokio::test]
    async fn test_handler_updates_asset_data_cache() {
        let (_cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
        let (raw_tx, raw_rx) = tokio::sync::mpsc::unbounded_channel();
        let (ws_tx, _ws_rx) = tokio::sync::mpsc::channel(8);
        let asset_data_cache = Arc::new(ActiveAssetDataCache::new());

        let mut handler = FeedHandler::new(
            cmd_rx,
            raw_rx,
            ws_tx,
            Arc::new(SubscriptionState::new()),
            Arc::clone(&asset_data_cache),
        );

        raw_tx
            .send(
                json!({
                    "channel": "activeAssetData",
                    "data": {
                        "user": "0xabc",
                        "coin": "ETH",
                        "leverage": {"type": "cross", "value": 20},
                        "maxTradeSzs": ["10", "10"],
                        "availableToTrade": ["500", "500"]
                    }
                })
                .to_string(),
            )
            .unwrap();
        drop(raw_tx);

        let event = handler.next().await.unwrap();
        assert!(matches!(event, HyperliquidWsEvent::ActiveAssetData(_)));

        let coin = Ustr::from("ETH");
        assert!(asset_data_cache.get(HyperliquidMarketKind::Perp, &coin).is_some());
    }
}
