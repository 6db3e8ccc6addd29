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

//! Streams BTC trades and book updates from the testnet for one minute.

use futures_util::StreamExt;
use hyperliquid_client::websocket::{
    client::HyperliquidWebSocketClient, handler::HyperliquidWsEvent,
};
use ustr::Ustr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut client = HyperliquidWebSocketClient::connect(None, true).await?;
    tracing::info!("Connected: {}", client.url());

    let coin = Ustr::from("BTC");
    client.subscribe_trades(coin)?;
    client.subscribe_book(coin)?;
    client.subscribe_bbo(coin)?;

    let stream = client.stream();
    tokio::pin!(stream);

    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(60);
    loop {
        let event = tokio::select! {
            event = stream.next() => match event {
                Some(event) => event,
                None => break,
            },
            () = tokio::time::sleep_until(deadline) => break,
        };

        match event {
            HyperliquidWsEvent::Subscribed(sub) => tracing::info!("Subscribed: {sub:?}"),
            HyperliquidWsEvent::Trades(trades) => {
                for trade in trades {
                    tracing::info!("{} {} {} @ {}", trade.coin, trade.side, trade.sz, trade.px);
                }
            }
            HyperliquidWsEvent::Book(book) => {
                tracing::info!(
                    "Book {}: {} bid levels, {} ask levels",
                    book.coin,
                    book.levels.first().map_or(0, Vec::len),
                    book.levels.get(1).map_or(0, Vec::len),
                );
            }
            HyperliquidWsEvent::Bbo(bbo) => tracing::info!("BBO {}: {:?}", bbo.coin, bbo.bbo),
            HyperliquidWsEvent::SubscriptionError(e) => tracing::error!("Subscription error: {e}"),
            HyperliquidWsEvent::VenueError(message) => tracing::error!("Venue error: {message}"),
            other => tracing::debug!("Event: {other:?}"),
        }
    }

    client.disconnect().await;
    Ok(())
}
