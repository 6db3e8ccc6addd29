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

//! Integration tests for the Hyperliquid WebSocket client against a mock server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use hyperliquid_client::websocket::{
    client::HyperliquidWebSocketClient, handler::HyperliquidWsEvent,
};
use rstest::rstest;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;
use ustr::Ustr;

/// Mock venue: accepts one connection, echoes a subscription ack for every
/// subscribe/unsubscribe request, and pushes one trades frame after the first ack.
async fn spawn_mock_venue() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let (mut sink, mut source) = ws.split();
        let mut acked_first = false;

        while let Some(Ok(message)) = source.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            let request: Value = serde_json::from_str(text.as_str()).unwrap();

            match request["method"].as_str() {
                Some("subscribe") | Some("unsubscribe") => {
                    let ack = json!({
                        "channel": "subscriptionResponse",
                        "data": {
                            "method": request["method"],
                            "subscription": request["subscription"],
                        }
                    });
                    sink.send(Message::Text(ack.to_string().into())).await.unwrap();

                    if !acked_first {
                        acked_first = true;
                        let trades = json!({
                            "channel": "trades",
                            "data": [{
                                "coin": "BTC",
                                "side": "A",
                                "px": "49999.0",
                                "sz": "0.25",
                                "time": 1_700_000_000_000u64,
                                "tid": 1,
                            }]
                        });
                        sink.send(Message::Text(trades.to_string().into())).await.unwrap();

                        // Unsolicited ack for a subscription never requested.
                        let unsolicited = json!({
                            "channel": "subscriptionResponse",
                            "data": {"subscription": {"type": "bbo", "coin": "ETH"}}
                        });
                        sink.send(Message::Text(unsolicited.to_string().into()))
                            .await
                            .unwrap();
                    }
                }
                Some("ping") => {
                    sink.send(Message::Text(json!({"channel": "pong"}).to_string().into()))
                        .await
                        .unwrap();
                }
                _ => {}
            }
        }
    });

    format!("ws://{addr}")
}

async fn next_event(
    stream: &mut (impl futures_util::Stream<Item = HyperliquidWsEvent> + Unpin),
) -> HyperliquidWsEvent {
    tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("timed out waiting for event")
        .expect("stream ended")
}

#[rstest]
#[tokio::test]
async fn test_subscribe_ack_and_data_flow_in_order() {
    let url = spawn_mock_venue().await;
    let mut client = HyperliquidWebSocketClient::connect(Some(url), false).await.unwrap();

    let coin = Ustr::from("BTC");
    client.subscribe_trades(coin).unwrap();

    let mut stream = Box::pin(client.stream());

    // Ack first, then the data frame, exactly in server send order.
    match next_event(&mut stream).await {
        HyperliquidWsEvent::Subscribed(sub) => {
            assert_eq!(sub.fingerprint(), "trades:btc");
        }
        other => panic!("expected Subscribed, was {other:?}"),
    }

    match next_event(&mut stream).await {
        HyperliquidWsEvent::Trades(trades) => {
            assert_eq!(trades.len(), 1);
            assert_eq!(trades[0].px, "49999.0");
        }
        other => panic!("expected Trades, was {other:?}"),
    }

    // The unsolicited bbo ack is tolerated and lands in the registry.
    match next_event(&mut stream).await {
        HyperliquidWsEvent::Subscribed(sub) => {
            assert_eq!(sub.fingerprint(), "bbo:eth");
        }
        other => panic!("expected Subscribed, was {other:?}"),
    }

    let active = client.active_subscriptions();
    assert_eq!(active.len(), 2);

    client.disconnect().await;
}

#[rstest]
#[tokio::test]
async fn test_unsubscribe_removes_from_registry() {
    let url = spawn_mock_venue().await;
    let mut client = HyperliquidWebSocketClient::connect(Some(url), false).await.unwrap();

    let coin = Ustr::from("BTC");
    client.subscribe_trades(coin).unwrap();

    let mut stream = Box::pin(client.stream());

    // Drain: subscribe ack, trades push, unsolicited bbo ack.
    for _ in 0..3 {
        next_event(&mut stream).await;
    }
    assert_eq!(client.active_subscriptions().len(), 2);

    client.unsubscribe_trades(coin).unwrap();
    match next_event(&mut stream).await {
        HyperliquidWsEvent::Unsubscribed(sub) => {
            assert_eq!(sub.fingerprint(), "trades:btc");
        }
        other => panic!("expected Unsubscribed, was {other:?}"),
    }

    let remaining = client.active_subscriptions();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].fingerprint(), "bbo:eth");

    client.disconnect().await;
}
