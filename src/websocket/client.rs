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

//! WebSocket clients for the Hyperliquid streaming API.
//!
//! The inner client owns the transport: one reader task forwarding text frames in
//! arrival order, one writer task serializing outbound requests, and an application
//! heartbeat (the venue closes idle connections). The outer client layers the handler
//! task, subscription reconciliation, and typed per-channel subscribe methods on top.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use futures_util::{SinkExt, StreamExt};
use tokio::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use ustr::Ustr;

use crate::{
    common::{
        consts::{HYPERLIQUID_WS_TESTNET_URL, HYPERLIQUID_WS_URL},
        enums::{HyperliquidBarInterval, HyperliquidMarketKind},
    },
    websocket::{
        error::HyperliquidWsError,
        handler::{ActiveAssetDataCache, FeedHandler, HandlerCommand, HyperliquidWsEvent},
        messages::{HyperliquidSubscription, HyperliquidWsRequest, WsActiveAssetData},
        subscriptions::SubscriptionState,
    },
};

/// Application heartbeat period; set below the venue's idle timeout.
const HEARTBEAT_SECS: u64 = 30;

const OUTBOUND_CHANNEL_CAPACITY: usize = 1024;

/// Low-level Hyperliquid WebSocket client owning the transport tasks.
#[derive(Debug)]
pub struct HyperliquidWebSocketInnerClient {
    ws_tx: tokio::sync::mpsc::Sender<HyperliquidWsRequest>,
    raw_rx: Option<tokio::sync::mpsc::UnboundedReceiver<String>>,
    closed: Arc<AtomicBool>,
    reader_task: tokio::task::JoinHandle<()>,
    writer_task: tokio::task::JoinHandle<()>,
    heartbeat_task: tokio::task::JoinHandle<()>,
}

impl HyperliquidWebSocketInnerClient {
    /// Connects to the venue and spawns the transport tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a WebSocket URL or the connection fails.
    pub async fn connect(url: &str) -> Result<Self, HyperliquidWsError> {
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(HyperliquidWsError::UrlParsing(format!(
                "URL must start with ws:// or wss://, was: {url}"
            )));
        }

        let (ws_stream, _) = connect_async(url).await?;
        tracing::info!("Hyperliquid WebSocket connected: {url}");

        let (mut sink, mut stream) = ws_stream.split();
        let (ws_tx, mut ws_rx) =
            tokio::sync::mpsc::channel::<HyperliquidWsRequest>(OUTBOUND_CHANNEL_CAPACITY);
        let (raw_tx, raw_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
        let closed = Arc::new(AtomicBool::new(false));

        let closed_flag = Arc::clone(&closed);
        let reader_task = tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if raw_tx.send(text.to_string()).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Binary(data)) => {
                        tracing::debug!("Ignoring binary frame ({} bytes)", data.len());
                    }
                    Ok(Message::Ping(_) | Message::Pong(_)) => {}
                    Ok(Message::Close(frame)) => {
                        tracing::info!("Received close frame: {frame:?}");
                        break;
                    }
                    Ok(Message::Frame(_)) => tracing::warn!("Received raw frame (unexpected)"),
                    Err(e) => {
                        tracing::error!("WebSocket read error: {e}");
                        break;
                    }
                }
            }
            closed_flag.store(true, Ordering::SeqCst);
            tracing::info!("Hyperliquid WebSocket reader finished");
        });

        let writer_task = tokio::spawn(async move {
            while let Some(request) = ws_rx.recv().await {
                let json = match serde_json::to_string(&request) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize WS request: {e}");
                        continue;
                    }
                };
                tracing::debug!("Sending WS message: {json}");
                if let Err(e) = sink.send(Message::Text(json.into())).await {
                    tracing::error!("Failed to send WS message: {e}");
                    break;
                }
            }
            tracing::info!("WebSocket sender task finished");
        });

        let heartbeat_tx = ws_tx.clone();
        let heartbeat_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_SECS));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval.tick().await; // first tick is immediate
            loop {
                interval.tick().await;
                if heartbeat_tx.send(HyperliquidWsRequest::Ping).await.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            ws_tx,
            raw_rx: Some(raw_rx),
            closed,
            reader_task,
            writer_task,
            heartbeat_task,
        })
    }

    /// Returns a sender for outbound requests.
    #[must_use]
    pub fn sender(&self) -> tokio::sync::mpsc::Sender<HyperliquidWsRequest> {
        self.ws_tx.clone()
    }

    /// Takes ownership of the raw inbound frame receiver.
    ///
    /// Returns `None` if it has already been taken.
    pub fn take_raw_receiver(&mut self) -> Option<tokio::sync::mpsc::UnboundedReceiver<String>> {
        self.raw_rx.take()
    }

    /// Sends a raw request on the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer task has stopped.
    pub async fn send(&self, request: HyperliquidWsRequest) -> Result<(), HyperliquidWsError> {
        self.ws_tx
            .send(request)
            .await
            .map_err(|e| HyperliquidWsError::ChannelClosed(e.to_string()))
    }

    /// Returns whether the connection is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.closed.load(Ordering::SeqCst) && !self.reader_task.is_finished()
    }

    /// Terminates the transport tasks; the blocking read returns and the loop exits.
    pub fn disconnect(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.heartbeat_task.abort();
        self.writer_task.abort();
        self.reader_task.abort();
    }
}

/// High-level Hyperliquid WebSocket client with typed subscriptions and event stream.
#[derive(Debug)]
pub struct HyperliquidWebSocketClient {
    url: String,
    inner: Arc<tokio::sync::Mutex<HyperliquidWebSocketInnerClient>>,
    cmd_tx: tokio::sync::mpsc::UnboundedSender<HandlerCommand>,
    rx: Option<tokio::sync::mpsc::UnboundedReceiver<HyperliquidWsEvent>>,
    subscriptions: Arc<SubscriptionState>,
    asset_data: Arc<ActiveAssetDataCache>,
    _driver_task: tokio::task::JoinHandle<()>,
}

impl HyperliquidWebSocketClient {
    /// Connects to the venue and starts the handler task.
    ///
    /// If `url` is `None` the deployment URL is selected by the `testnet` flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(url: Option<String>, testnet: bool) -> Result<Self, HyperliquidWsError> {
        let url = url.unwrap_or_else(|| {
            if testnet {
                HYPERLIQUID_WS_TESTNET_URL.to_string()
            } else {
                HYPERLIQUID_WS_URL.to_string()
            }
        });

        let mut inner = HyperliquidWebSocketInnerClient::connect(&url).await?;
        let raw_rx = inner.take_raw_receiver().ok_or_else(|| {
            HyperliquidWsError::ChannelClosed("raw receiver already taken".to_string())
        })?;

        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel::<HandlerCommand>();
        let (out_tx, out_rx) = tokio::sync::mpsc::unbounded_channel::<HyperliquidWsEvent>();

        let subscriptions = Arc::new(SubscriptionState::new());
        let asset_data = Arc::new(ActiveAssetDataCache::new());

        let ws_tx = inner.sender();
        let handler_subscriptions = Arc::clone(&subscriptions);
        let handler_asset_data = Arc::clone(&asset_data);
        let driver_task = tokio::spawn(async move {
            let mut handler = FeedHandler::new(
                cmd_rx,
                raw_rx,
                ws_tx,
                handler_subscriptions,
                handler_asset_data,
            );
            while let Some(event) = handler.next().await {
                if out_tx.send(event).is_err() {
                    break;
                }
            }
            tracing::debug!("FeedHandler task completed");
        });

        Ok(Self {
            url,
            inner: Arc::new(tokio::sync::Mutex::new(inner)),
            cmd_tx,
            rx: Some(out_rx),
            subscriptions,
            asset_data,
            _driver_task: driver_task,
        })
    }

    /// Returns the URL of this client.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns whether the underlying connection is active.
    pub async fn is_active(&self) -> bool {
        self.inner.lock().await.is_active()
    }

    /// Returns the currently confirmed subscriptions.
    #[must_use]
    pub fn active_subscriptions(&self) -> Vec<HyperliquidSubscription> {
        self.subscriptions.active_subscriptions()
    }

    /// Returns the latest active-asset-data snapshot for a market, if any tick has
    /// arrived, without waiting on a new one.
    #[must_use]
    pub fn active_asset_data(
        &self,
        kind: HyperliquidMarketKind,
        coin: &Ustr,
    ) -> Option<WsActiveAssetData> {
        self.asset_data.get(kind, coin)
    }

    fn send_command(&self, command: HandlerCommand) -> Result<(), HyperliquidWsError> {
        self.cmd_tx
            .send(command)
            .map_err(|e| HyperliquidWsError::ChannelClosed(e.to_string()))
    }

    /// Requests a subscription; confirmation arrives as a [`HyperliquidWsEvent`].
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe(&self, subscription: HyperliquidSubscription) -> Result<(), HyperliquidWsError> {
        self.send_command(HandlerCommand::Subscribe {
            subscriptions: vec![subscription],
        })
    }

    /// Requests an unsubscription; confirmation arrives as a [`HyperliquidWsEvent`].
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn unsubscribe(
        &self,
        subscription: HyperliquidSubscription,
    ) -> Result<(), HyperliquidWsError> {
        self.send_command(HandlerCommand::Unsubscribe {
            subscriptions: vec![subscription],
        })
    }

    /// Subscribes to trades for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_trades(&self, coin: Ustr) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::Trades { coin })
    }

    /// Unsubscribes from trades for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn unsubscribe_trades(&self, coin: Ustr) -> Result<(), HyperliquidWsError> {
        self.unsubscribe(HyperliquidSubscription::Trades { coin })
    }

    /// Subscribes to the L2 book for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_book(&self, coin: Ustr) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::L2Book {
            coin,
            n_sig_figs: None,
            mantissa: None,
        })
    }

    /// Unsubscribes from the L2 book for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn unsubscribe_book(&self, coin: Ustr) -> Result<(), HyperliquidWsError> {
        self.unsubscribe(HyperliquidSubscription::L2Book {
            coin,
            n_sig_figs: None,
            mantissa: None,
        })
    }

    /// Subscribes to best bid/offer updates for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_bbo(&self, coin: Ustr) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::Bbo { coin })
    }

    /// Unsubscribes from best bid/offer updates for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn unsubscribe_bbo(&self, coin: Ustr) -> Result<(), HyperliquidWsError> {
        self.unsubscribe(HyperliquidSubscription::Bbo { coin })
    }

    /// Subscribes to candles for a coin and interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_candle(
        &self,
        coin: Ustr,
        interval: HyperliquidBarInterval,
    ) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::Candle { coin, interval })
    }

    /// Unsubscribes from candles for a coin and interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn unsubscribe_candle(
        &self,
        coin: Ustr,
        interval: HyperliquidBarInterval,
    ) -> Result<(), HyperliquidWsError> {
        self.unsubscribe(HyperliquidSubscription::Candle { coin, interval })
    }

    /// Subscribes to mid prices for all coins.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_all_mids(&self, dex: Option<String>) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::AllMids { dex })
    }

    /// Subscribes to order updates for a user address.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_order_updates(&self, user: &str) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::OrderUpdates {
            user: crate::common::parse::normalize_address(user),
        })
    }

    /// Subscribes to user events (fills, funding, liquidations) for a user address.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_user_events(&self, user: &str) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::UserEvents {
            user: crate::common::parse::normalize_address(user),
        })
    }

    /// Subscribes to streaming fills for a user address.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_user_fills(&self, user: &str) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::UserFills {
            user: crate::common::parse::normalize_address(user),
            aggregate_by_time: None,
        })
    }

    /// Subscribes to streaming funding payments for a user address.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_user_fundings(&self, user: &str) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::UserFundings {
            user: crate::common::parse::normalize_address(user),
        })
    }

    /// Subscribes to non-funding ledger updates for a user address.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_ledger_updates(&self, user: &str) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::UserNonFundingLedgerUpdates {
            user: crate::common::parse::normalize_address(user),
        })
    }

    /// Subscribes to the active asset context for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_active_asset_ctx(&self, coin: Ustr) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::ActiveAssetCtx { coin })
    }

    /// Subscribes to active asset data for a user and coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_active_asset_data(
        &self,
        user: &str,
        coin: Ustr,
    ) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::ActiveAssetData {
            user: crate::common::parse::normalize_address(user),
            coin,
        })
    }

    /// Subscribes to venue notifications for a user address.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_notification(&self, user: &str) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::Notification {
            user: crate::common::parse::normalize_address(user),
        })
    }

    /// Subscribes to the aggregate web data feed for a user address.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler task has stopped.
    pub fn subscribe_web_data(&self, user: &str) -> Result<(), HyperliquidWsError> {
        self.subscribe(HyperliquidSubscription::WebData2 {
            user: crate::common::parse::normalize_address(user),
        })
    }

    /// Escape hatch: sends a raw request on the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer task has stopped.
    pub async fn send_raw(&self, request: HyperliquidWsRequest) -> Result<(), HyperliquidWsError> {
        self.inner.lock().await.send(request).await
    }

    /// Receives the next event from the stream.
    ///
    /// Returns `None` when the connection is closed or the stream has been taken.
    pub async fn next_event(&mut self) -> Option<HyperliquidWsEvent> {
        self.rx.as_mut()?.recv().await
    }

    /// Returns a stream of events from the connection, in frame arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the stream has already been taken.
    pub fn stream(
        &mut self,
    ) -> impl futures_util::Stream<Item = HyperliquidWsEvent> + Send + 'static + use<> {
        let rx = self
            .rx
            .take()
            .expect("Stream receiver already taken");

        async_stream::stream! {
            let mut rx = rx;
            while let Some(event) = rx.recv().await {
                yield event;
            }
        }
    }

    /// Disconnects: stops the handler and terminates the transport tasks.
    pub async fn disconnect(&self) {
        let _ = self.send_command(HandlerCommand::Disconnect);
        self.inner.lock().await.disconnect();
    }
}
