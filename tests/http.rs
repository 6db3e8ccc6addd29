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

//! Integration tests for the Hyperliquid HTTP client using a mock Axum server.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{Json, Router, extract::State, routing::post};
use hyperliquid_client::{
    common::{credential::HyperliquidCredential, enums::{HyperliquidSubmittedStatus, HyperliquidTif}},
    http::{client::HyperliquidHttpClient, error::HyperliquidHttpError},
};
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

const KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

#[derive(Clone, Default)]
struct AppState {
    meta_fetches: Arc<AtomicUsize>,
    exchange_bodies: Arc<Mutex<Vec<Value>>>,
}

async fn info_handler(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    match body["type"].as_str() {
        Some("meta") => {
            state.meta_fetches.fetch_add(1, Ordering::SeqCst);
            Json(json!({
                "universe": [
                    {"name": "BTC", "szDecimals": 5},
                    {"name": "ETH", "szDecimals": 4, "isDelisted": true},
                    {"name": "SOL", "szDecimals": 2},
                ]
            }))
        }
        Some("spotMeta") => Json(json!({"universe": [], "tokens": []})),
        Some("l2Book") => Json(json!({
            "coin": body["coin"],
            "time": 1_700_000_000_000u64,
            "levels": [
                [{"px": "50000.0", "sz": "1.5", "n": 3}],
                [{"px": "50001.0", "sz": "2.0", "n": 4}],
            ]
        })),
        _ => Json(json!({})),
    }
}

async fn exchange_handler(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    let action_type = body["action"]["type"].as_str().unwrap_or_default().to_string();
    state.exchange_bodies.lock().unwrap().push(body);

    match action_type.as_str() {
        "scheduleCancel" => Json(json!({"status": "Invalid schedule cancel time"})),
        "cancel" => Json(json!({
            "status": "ok",
            "response": {"type": "cancel", "data": {"statuses": ["success"]}}
        })),
        "usdSend" => Json(json!({"status": "ok", "response": {"type": "default"}})),
        _ => Json(json!({
            "status": "ok",
            "response": {"type": "order", "data": {"statuses": [{"resting": {"oid": 123}}]}}
        })),
    }
}

async fn spawn_server(state: AppState) -> String {
    let app = Router::new()
        .route("/info", post(info_handler))
        .route("/exchange", post(exchange_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: String, vault: Option<&str>) -> HyperliquidHttpClient {
    HyperliquidHttpClient::new(
        Some(base_url),
        Some(HyperliquidCredential::new(
            KEY,
            None,
            vault.map(ToString::to_string),
        )),
        Some(5),
        None,
    )
    .unwrap()
}

#[rstest]
#[tokio::test]
async fn test_place_order_end_to_end() {
    let state = AppState::default();
    let base_url = spawn_server(state.clone()).await;
    let client = client(base_url, None);

    let report = client
        .place_limit_order("sol", true, dec!(100.50), dec!(2), HyperliquidTif::Gtc, false, None)
        .await
        .unwrap();

    assert_eq!(report.order_id.as_deref(), Some("123"));
    assert_eq!(report.status, HyperliquidSubmittedStatus::Active);
    assert!(report.error.is_none());

    let bodies = state.exchange_bodies.lock().unwrap();
    let body = &bodies[0];

    // Asset resolved by positional universe index (delisted ETH excluded).
    assert_eq!(body["action"]["type"], "order");
    assert_eq!(body["action"]["orders"][0]["a"], 2);
    assert_eq!(body["action"]["orders"][0]["p"], "100.5");
    assert_eq!(body["action"]["grouping"], "na");

    assert!(body["nonce"].is_u64());
    assert!(body["signature"]["r"].as_str().unwrap().starts_with("0x"));
    assert!(body["signature"]["s"].as_str().unwrap().starts_with("0x"));
    assert!(body["signature"]["v"].is_u64());

    // Vault-capable family with no vault configured: explicit null, not omitted.
    assert!(body.as_object().unwrap().contains_key("vaultAddress"));
    assert_eq!(body["vaultAddress"], Value::Null);
    assert!(!body.as_object().unwrap().contains_key("expiresAfter"));
}

#[rstest]
#[tokio::test]
async fn test_asset_cache_fetches_metadata_once() {
    let state = AppState::default();
    let base_url = spawn_server(state.clone()).await;
    let client = client(base_url, None);

    assert_eq!(client.asset_id("BTC").await.unwrap(), 0);
    assert_eq!(client.asset_id("sol").await.unwrap(), 2);
    assert_eq!(state.meta_fetches.load(Ordering::SeqCst), 1);

    // Delisted symbol: one more refresh attempt, then a hard error.
    let err = client.asset_id("eth").await.unwrap_err();
    assert!(matches!(
        err,
        HyperliquidHttpError::UnknownCoin { ref coin } if coin == "ETH"
    ));
    assert_eq!(state.meta_fetches.load(Ordering::SeqCst), 2);

    // Cache hit afterwards, no further fetch.
    assert_eq!(client.asset_id("SOL").await.unwrap(), 2);
    assert_eq!(state.meta_fetches.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn test_vault_address_attached_lowercased() {
    let state = AppState::default();
    let base_url = spawn_server(state.clone()).await;
    let client = client(
        base_url,
        Some("0xABCDEF0123456789ABCDEF0123456789ABCDEF01"),
    );

    client.cancel_order("btc", 42).await.unwrap();

    let bodies = state.exchange_bodies.lock().unwrap();
    assert_eq!(
        bodies[0]["vaultAddress"],
        json!("0xabcdef0123456789abcdef0123456789abcdef01")
    );
}

#[rstest]
#[tokio::test]
async fn test_user_signed_action_omits_vault_field() {
    let state = AppState::default();
    let base_url = spawn_server(state.clone()).await;
    let client = client(
        base_url,
        Some("0xabcdef0123456789abcdef0123456789abcdef01"),
    );

    client
        .usd_send("0x1111111111111111111111111111111111111111", dec!(25))
        .await
        .unwrap();

    let bodies = state.exchange_bodies.lock().unwrap();
    let body = &bodies[0];

    assert_eq!(body["action"]["type"], "usdSend");
    assert_eq!(body["action"]["signatureChainId"], "0x66eee");
    assert_eq!(body["action"]["hyperliquidChain"], "Mainnet");
    // Never vault scoped: the field is absent entirely, even with a vault configured.
    assert!(!body.as_object().unwrap().contains_key("vaultAddress"));
    // The action time doubles as the envelope nonce.
    assert_eq!(body["action"]["time"], body["nonce"]);
}

#[rstest]
#[tokio::test]
async fn test_outer_status_failure_carries_venue_text() {
    let state = AppState::default();
    let base_url = spawn_server(state.clone()).await;
    let client = client(base_url, None);

    let err = client.schedule_cancel(Some(1_700_000_000_000)).await.unwrap_err();
    assert!(matches!(
        err,
        HyperliquidHttpError::StatusNotOk { ref status } if status == "Invalid schedule cancel time"
    ));
}

#[rstest]
#[tokio::test]
async fn test_cancel_reports_benign_status() {
    let state = AppState::default();
    let base_url = spawn_server(state.clone()).await;
    let client = client(base_url, None);

    let report = client.cancel_order("btc", 7).await.unwrap();
    assert!(report.error.is_none());
    assert_eq!(report.status, HyperliquidSubmittedStatus::Unknown);
    assert!(report.order_id.is_none());
}

#[rstest]
#[tokio::test]
async fn test_l2_book_decodes() {
    let state = AppState::default();
    let base_url = spawn_server(state).await;
    let client = client(base_url, None);

    let book = client.info_l2_book("BTC").await.unwrap();
    assert_eq!(book.coin, "BTC");
    assert_eq!(book.levels[0][0].px, "50000.0");
    assert_eq!(book.levels[1][0].n, 4);
}
