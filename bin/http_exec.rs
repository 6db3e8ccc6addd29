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

//! Places a deep testnet limit order end to end: metadata, book, sign, post, report.

use std::str::FromStr;

use hyperliquid_client::{
    common::enums::HyperliquidTif, http::client::HyperliquidHttpClient,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let client = HyperliquidHttpClient::from_env()?;
    tracing::info!("Client created (testnet: {})", client.is_testnet());

    let meta = client.info_meta().await?;
    tracing::info!("Universe holds {} assets", meta.universe.len());

    let asset_id = client.asset_id("BTC").await?;
    tracing::info!("BTC asset id: {asset_id}");

    let user = client.get_user_address()?;
    tracing::info!("User address: {user}");

    match client.info_clearinghouse_state(&user).await {
        Ok(state) => tracing::info!(
            "Account value: {}",
            state.margin_summary.account_value
        ),
        Err(e) => tracing::warn!("Failed to fetch account state: {e}"),
    }

    let book = client.info_l2_book("BTC").await?;
    let best_bid = Decimal::from_str(&book.levels[0][0].px)?;
    tracing::info!("Best bid: ${best_bid}");

    // BTC prices must be whole dollars on the venue.
    let limit_price = (best_bid * dec!(0.95)).round();
    tracing::info!("Placing GTC buy 0.001 BTC @ ${limit_price}");

    let report = client
        .place_limit_order(
            "BTC",
            true,
            limit_price,
            dec!(0.001),
            HyperliquidTif::Gtc,
            false,
            None,
        )
        .await?;

    if let Some(error) = &report.error {
        tracing::error!("Submission failed: {error}");
    }
    tracing::info!("Order id: {:?}, status: {}", report.order_id, report.status);

    Ok(())
}
