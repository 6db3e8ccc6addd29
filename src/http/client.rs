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

//! Provides the HTTP client integration for the Hyperliquid REST API.
//!
//! Each signed call runs the same pipeline: ensure the wallet is bound, compute (or
//! accept) a nonce, sign the action for the configured network, attach the vault
//! context, POST the envelope, and parse the `{status, response}` result. All failures
//! are surfaced synchronously; this layer never retries.

use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex, RwLock},
    time::Duration,
};

use rust_decimal::Decimal;
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;

use crate::{
    common::{
        asset_cache::{HyperliquidAssetCache, build_asset_map},
        consts::{
            HYPERLIQUID_EXCHANGE_PATH, HYPERLIQUID_HTTP_TESTNET_URL, HYPERLIQUID_HTTP_URL,
            HYPERLIQUID_INFO_PATH, is_testnet_url,
        },
        credential::HyperliquidCredential,
        enums::{HyperliquidBarInterval, HyperliquidGrouping, HyperliquidTif},
        parse::normalize_address,
    },
    http::{
        error::{HyperliquidHttpError, Result},
        models::{
            HyperliquidApproveAgent, HyperliquidApproveBuilderFee, HyperliquidCandle,
            HyperliquidClearinghouseState, HyperliquidConvertToMultiSigUser,
            HyperliquidExchangeRequest, HyperliquidExchangeResponse, HyperliquidExecAction,
            HyperliquidExecCancelByCloidRequest, HyperliquidExecCancelRequest,
            HyperliquidExecLimitParams, HyperliquidExecOrderKind, HyperliquidExecPlaceOrderRequest,
            HyperliquidFundingEntry, HyperliquidL2Book, HyperliquidMeta,
            HyperliquidMetaAndAssetCtxs, HyperliquidOpenOrder, HyperliquidOrderStatusResponse,
            HyperliquidPortfolio, HyperliquidSpotClearinghouseState, HyperliquidSpotMeta,
            HyperliquidSpotMetaAndAssetCtxs, HyperliquidTokenDelegate, HyperliquidUsdClassTransfer,
            HyperliquidUsdSend, HyperliquidUserDexAbstraction, HyperliquidUserFill,
            HyperliquidSpotSend, HyperliquidWithdraw,
        },
        parse::{HyperliquidExecReport, ensure_exchange_response_ok, parse_action_statuses},
        query::{HyperliquidCandleSnapshotReq, HyperliquidInfoRequest, HyperliquidOidOrCloid},
    },
    signing::{
        action::{UserSignedAction, sign_l1_action, sign_user_signed_action},
        nonce::NonceSource,
        wallet::HyperliquidWallet,
    },
};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the Hyperliquid `/info` and `/exchange` endpoints.
///
/// Safe for concurrent use from multiple tasks; each call is synchronous with respect
/// to its network round trip. Multiple sessions (e.g. multiple accounts) should be
/// fully independent instances.
pub struct HyperliquidHttpClient {
    base_url: String,
    is_testnet: bool,
    client: reqwest::Client,
    credential: Option<HyperliquidCredential>,
    wallet: Mutex<Option<Arc<HyperliquidWallet>>>,
    account_address: RwLock<Option<String>>,
    vault_address: RwLock<Option<String>>,
    assets: HyperliquidAssetCache,
    nonces: NonceSource,
    cancellation_token: CancellationToken,
}

impl Debug for HyperliquidHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(HyperliquidHttpClient))
            .field("base_url", &self.base_url)
            .field("is_testnet", &self.is_testnet)
            .field("has_credential", &self.credential.is_some())
            .finish()
    }
}

impl HyperliquidHttpClient {
    /// Creates a new [`HyperliquidHttpClient`].
    ///
    /// `base_url` defaults to the mainnet deployment; the network used for signing is
    /// derived from the URL (see [`is_testnet_url`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(
        base_url: Option<String>,
        credential: Option<HyperliquidCredential>,
        timeout_secs: Option<u64>,
        nonces: Option<NonceSource>,
    ) -> Result<Self> {
        let base_url = base_url.unwrap_or_else(|| HYPERLIQUID_HTTP_URL.to_string());
        let is_testnet = is_testnet_url(&base_url);

        if !is_testnet && base_url != HYPERLIQUID_HTTP_URL {
            // Custom endpoints without the "testnet" substring sign under the mainnet
            // domain; the venue rejects such signatures if the endpoint is actually
            // a testnet deployment.
            tracing::warn!(
                "Custom endpoint '{base_url}' classified as mainnet for signing purposes"
            );
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("hyperliquid-client/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)))
            .build()
            .map_err(|e| HyperliquidHttpError::NetworkError(e.to_string()))?;

        Ok(Self {
            base_url,
            is_testnet,
            client,
            credential,
            wallet: Mutex::new(None),
            account_address: RwLock::new(None),
            vault_address: RwLock::new(None),
            assets: HyperliquidAssetCache::new(),
            nonces: nonces.unwrap_or_default(),
            cancellation_token: CancellationToken::new(),
        })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `HYPERLIQUID_PK` (signing secret), `HYPERLIQUID_ACCOUNT_ADDRESS`,
    /// `HYPERLIQUID_VAULT_ADDRESS`, `HYPERLIQUID_BASE_URL`, and `HYPERLIQUID_TESTNET`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    pub fn from_env() -> Result<Self> {
        let testnet = std::env::var("HYPERLIQUID_TESTNET")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE"))
            .unwrap_or(false);
        let base_url = std::env::var("HYPERLIQUID_BASE_URL").ok().or_else(|| {
            testnet.then(|| HYPERLIQUID_HTTP_TESTNET_URL.to_string())
        });

        let credential = std::env::var("HYPERLIQUID_PK").ok().map(|pk| {
            HyperliquidCredential::new(
                pk,
                std::env::var("HYPERLIQUID_ACCOUNT_ADDRESS").ok(),
                std::env::var("HYPERLIQUID_VAULT_ADDRESS").ok(),
            )
        });

        Self::new(base_url, credential, None, None)
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns whether the client signs for the testnet deployment.
    #[must_use]
    pub fn is_testnet(&self) -> bool {
        self.is_testnet
    }

    /// Cancel all pending HTTP requests.
    pub fn cancel_all_requests(&self) {
        self.cancellation_token.cancel();
    }

    /// Get the cancellation token for this client.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    /// Returns the account address used for user-scoped queries.
    ///
    /// Binds the wallet on first use; the address derived from the signing secret
    /// always wins over a mismatching configured address.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable credential is configured.
    pub fn get_user_address(&self) -> Result<String> {
        self.ensure_wallet()?;
        Ok(self
            .account_address
            .read()
            .expect("account address lock poisoned")
            .clone()
            .expect("account address set during wallet bind"))
    }

    /// Returns the configured vault address, if any (set during wallet bind).
    #[must_use]
    pub fn vault_address(&self) -> Option<String> {
        self.vault_address
            .read()
            .expect("vault address lock poisoned")
            .clone()
    }

    // ---------------------------------------------------------------------------------------------
    // Wallet binding
    // ---------------------------------------------------------------------------------------------

    /// Lazily binds the signing wallet from the configured credential.
    ///
    /// Idempotent under concurrent first use: callers serialize on the wallet mutex
    /// and every caller observes the same wallet instance. A configured address that
    /// disagrees with the derived one is logged, and the derived address wins.
    /// (Re)binding resets the asset cache since new credentials imply a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`HyperliquidHttpError::MissingCredentials`] if no credential or an
    /// empty secret is configured, or a signing error for a malformed key.
    pub fn ensure_wallet(&self) -> Result<Arc<HyperliquidWallet>> {
        let mut guard = self.wallet.lock().expect("wallet lock poisoned");
        if let Some(wallet) = guard.as_ref() {
            return Ok(Arc::clone(wallet));
        }

        let credential = self
            .credential
            .as_ref()
            .ok_or(HyperliquidHttpError::MissingCredentials)?;
        if !credential.has_secret() {
            return Err(HyperliquidHttpError::MissingCredentials);
        }

        let wallet = Arc::new(HyperliquidWallet::from_private_key(credential.private_key())?);

        if let Some(configured) = credential.account_address() {
            let normalized = normalize_address(configured);
            if normalized != wallet.address() {
                tracing::warn!(
                    "Configured address {normalized} does not match derived address {}; \
                     using derived address",
                    wallet.address()
                );
            }
        }
        *self
            .account_address
            .write()
            .expect("account address lock poisoned") = Some(wallet.address().to_string());
        *self
            .vault_address
            .write()
            .expect("vault address lock poisoned") =
            credential.vault_address().map(normalize_address);

        self.assets.clear();
        *guard = Some(Arc::clone(&wallet));

        tracing::debug!("Bound wallet {}", wallet.address());
        Ok(wallet)
    }

    // ---------------------------------------------------------------------------------------------
    // Asset resolution
    // ---------------------------------------------------------------------------------------------

    /// Resolves a coin symbol to its venue asset index.
    ///
    /// Checks the session cache first; on a miss the metadata is fetched (outside any
    /// lock) and the cache rebuilt wholesale before re-checking.
    ///
    /// # Errors
    ///
    /// Returns [`HyperliquidHttpError::UnknownCoin`] if the symbol is still unknown
    /// after a refresh, or a transport error from the metadata fetch.
    pub async fn asset_id(&self, coin: &str) -> Result<u32> {
        if let Some(id) = self.assets.lookup(coin) {
            return Ok(id);
        }

        self.refresh_assets().await?;

        self.assets
            .lookup(coin)
            .ok_or_else(|| HyperliquidHttpError::UnknownCoin {
                coin: coin.to_uppercase(),
            })
    }

    /// Rebuilds the asset cache from the venue's current listings.
    ///
    /// Delisted perp markets are excluded; spot pairs are admitted at their offset
    /// indices. The replacement map is installed atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the perp metadata fetch fails. A spot metadata failure is
    /// tolerated (perp-only cache) since spot listings are an optional extension.
    pub async fn refresh_assets(&self) -> Result<()> {
        let meta = self.info_meta().await?;
        let spot_meta = match self.info_spot_meta().await {
            Ok(spot) => Some(spot),
            Err(e) => {
                tracing::warn!("Spot metadata fetch failed, caching perp assets only: {e}");
                None
            }
        };

        self.assets.install(build_asset_map(&meta, spot_meta.as_ref()));
        tracing::debug!("Asset cache rebuilt with {} entries", self.assets.len());
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------------------------------------

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = tokio::select! {
            result = self.client.post(&url).json(body).send() => result?,
            () = self.cancellation_token.cancelled() => {
                return Err(HyperliquidHttpError::Canceled("client shutdown".to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HyperliquidHttpError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HyperliquidHttpError::JsonError(e.to_string()))
    }

    // ---------------------------------------------------------------------------------------------
    // Info endpoint
    // ---------------------------------------------------------------------------------------------

    /// Posts a raw info request, returning the undecoded JSON payload.
    ///
    /// Escape hatch for endpoints without a typed wrapper.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected HTTP status.
    pub async fn info(&self, request: &HyperliquidInfoRequest) -> Result<serde_json::Value> {
        self.post_json(HYPERLIQUID_INFO_PATH, request).await
    }

    async fn info_typed<T: DeserializeOwned>(&self, request: &HyperliquidInfoRequest) -> Result<T> {
        self.post_json(HYPERLIQUID_INFO_PATH, request).await
    }

    /// Fetches perp market metadata.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_meta(&self) -> Result<HyperliquidMeta> {
        self.info_typed(&HyperliquidInfoRequest::Meta { dex: None }).await
    }

    /// Fetches perp metadata together with per-asset market contexts (array-shaped).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_meta_and_asset_ctxs(&self) -> Result<HyperliquidMetaAndAssetCtxs> {
        self.info_typed(&HyperliquidInfoRequest::MetaAndAssetCtxs).await
    }

    /// Fetches spot market metadata.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_spot_meta(&self) -> Result<HyperliquidSpotMeta> {
        self.info_typed(&HyperliquidInfoRequest::SpotMeta).await
    }

    /// Fetches spot metadata together with asset contexts (array-shaped).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_spot_meta_and_asset_ctxs(&self) -> Result<HyperliquidSpotMetaAndAssetCtxs> {
        self.info_typed(&HyperliquidInfoRequest::SpotMetaAndAssetCtxs).await
    }

    /// Fetches mid prices for all coins.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_all_mids(&self, dex: Option<&str>) -> Result<HashMap<String, String>> {
        self.info_typed(&HyperliquidInfoRequest::AllMids {
            dex: dex.map(ToString::to_string),
        })
        .await
    }

    /// Fetches the L2 order book for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_l2_book(&self, coin: &str) -> Result<HyperliquidL2Book> {
        self.info_typed(&HyperliquidInfoRequest::L2Book {
            coin: coin.to_string(),
            n_sig_figs: None,
            mantissa: None,
        })
        .await
    }

    /// Fetches a candle snapshot; times are epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_candle_snapshot(
        &self,
        coin: &str,
        interval: HyperliquidBarInterval,
        start_time: u64,
        end_time: Option<u64>,
    ) -> Result<Vec<HyperliquidCandle>> {
        self.info_typed(&HyperliquidInfoRequest::CandleSnapshot {
            req: HyperliquidCandleSnapshotReq {
                coin: coin.to_string(),
                interval,
                start_time,
                end_time,
            },
        })
        .await
    }

    /// Fetches open orders for a user.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_open_orders(&self, user: &str) -> Result<Vec<HyperliquidOpenOrder>> {
        self.info_typed(&HyperliquidInfoRequest::OpenOrders {
            user: normalize_address(user),
            dex: None,
        })
        .await
    }

    /// Fetches open orders with frontend annotations (trigger state etc.).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_frontend_open_orders(&self, user: &str) -> Result<Vec<HyperliquidOpenOrder>> {
        self.info_typed(&HyperliquidInfoRequest::FrontendOpenOrders {
            user: normalize_address(user),
        })
        .await
    }

    /// Fetches recent fills for a user.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_user_fills(&self, user: &str) -> Result<Vec<HyperliquidUserFill>> {
        self.info_typed(&HyperliquidInfoRequest::UserFills {
            user: normalize_address(user),
            aggregate_by_time: None,
        })
        .await
    }

    /// Fetches fills for a user inside a time window (epoch ms bounds).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_user_fills_by_time(
        &self,
        user: &str,
        start_time: u64,
        end_time: Option<u64>,
    ) -> Result<Vec<HyperliquidUserFill>> {
        self.info_typed(&HyperliquidInfoRequest::UserFillsByTime {
            user: normalize_address(user),
            start_time,
            end_time,
        })
        .await
    }

    /// Fetches funding payments for a user inside a time window.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_user_funding(
        &self,
        user: &str,
        start_time: u64,
        end_time: Option<u64>,
    ) -> Result<serde_json::Value> {
        self.info(&HyperliquidInfoRequest::UserFunding {
            user: normalize_address(user),
            start_time,
            end_time,
        })
        .await
    }

    /// Fetches non-funding ledger updates (deposits, transfers, withdrawals).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_user_non_funding_ledger_updates(
        &self,
        user: &str,
        start_time: u64,
        end_time: Option<u64>,
    ) -> Result<serde_json::Value> {
        self.info(&HyperliquidInfoRequest::UserNonFundingLedgerUpdates {
            user: normalize_address(user),
            start_time,
            end_time,
        })
        .await
    }

    /// Fetches historical funding rates for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_funding_history(
        &self,
        coin: &str,
        start_time: u64,
        end_time: Option<u64>,
    ) -> Result<Vec<HyperliquidFundingEntry>> {
        self.info_typed(&HyperliquidInfoRequest::FundingHistory {
            coin: coin.to_string(),
            start_time,
            end_time,
        })
        .await
    }

    /// Fetches the status of one order by oid or cloid.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_order_status(
        &self,
        user: &str,
        oid: HyperliquidOidOrCloid,
    ) -> Result<HyperliquidOrderStatusResponse> {
        self.info_typed(&HyperliquidInfoRequest::OrderStatus {
            user: normalize_address(user),
            oid,
        })
        .await
    }

    /// Fetches the perp account state.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_clearinghouse_state(
        &self,
        user: &str,
    ) -> Result<HyperliquidClearinghouseState> {
        self.info_typed(&HyperliquidInfoRequest::ClearinghouseState {
            user: normalize_address(user),
            dex: None,
        })
        .await
    }

    /// Fetches the spot account state.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_spot_clearinghouse_state(
        &self,
        user: &str,
    ) -> Result<HyperliquidSpotClearinghouseState> {
        self.info_typed(&HyperliquidInfoRequest::SpotClearinghouseState {
            user: normalize_address(user),
        })
        .await
    }

    /// Fetches the portfolio period metrics (array-shaped pairs).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_portfolio(&self, user: &str) -> Result<HyperliquidPortfolio> {
        self.info_typed(&HyperliquidInfoRequest::Portfolio {
            user: normalize_address(user),
        })
        .await
    }

    /// Fetches a user-scoped info payload without a dedicated response model.
    ///
    /// Covers referral state, sub-accounts, fees, delegations, historical orders,
    /// TWAP fills, vault equities, roles, rate limits, and similar read endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure.
    pub async fn info_raw(&self, request: HyperliquidInfoRequest) -> Result<serde_json::Value> {
        self.info(&request).await
    }

    // ---------------------------------------------------------------------------------------------
    // Exchange endpoint: L1 actions
    // ---------------------------------------------------------------------------------------------

    /// Posts a signed L1 action with an automatic nonce and no expiry.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn post_action(
        &self,
        action: &HyperliquidExecAction,
    ) -> Result<HyperliquidExchangeResponse> {
        self.post_action_with(action, None, None).await
    }

    /// Posts a signed L1 action with an optional caller-controlled nonce and expiry.
    ///
    /// The nonce override serves ordering-critical and idempotent-retry flows; the
    /// expiry bounds how long the venue may accept the signed action.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn post_action_with(
        &self,
        action: &HyperliquidExecAction,
        nonce_override: Option<u64>,
        expires_after: Option<u64>,
    ) -> Result<HyperliquidExchangeResponse> {
        let wallet = self.ensure_wallet()?;

        let nonce = match nonce_override {
            Some(nonce) => nonce,
            None => self.nonces.next().map_err(HyperliquidHttpError::from)?,
        };

        // Vault scoping: only families that support it carry the field, and then
        // always explicitly (address or null).
        let vault = if action.supports_vault() {
            self.vault_address()
        } else {
            None
        };

        let signature = sign_l1_action(
            &wallet,
            action,
            vault.as_deref(),
            nonce,
            expires_after,
            !self.is_testnet,
        )?;

        let request = HyperliquidExchangeRequest {
            action,
            nonce,
            signature: &signature,
            vault_address: action.supports_vault().then(|| vault),
            expires_after,
        };

        let response: HyperliquidExchangeResponse =
            self.post_json(HYPERLIQUID_EXCHANGE_PATH, &request).await?;
        tracing::debug!("Exchange response status: {}", response.status);
        Ok(response)
    }

    /// Posts a signed L1 action and derives the execution report from the response.
    ///
    /// Partial-batch semantics: the report can carry both a derived order id and the
    /// first per-item failure.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn post_action_exec(
        &self,
        action: &HyperliquidExecAction,
    ) -> Result<HyperliquidExecReport> {
        let response = self.post_action(action).await?;
        parse_action_statuses(&response)
    }

    /// Places a single limit order, resolving the coin to its asset index.
    ///
    /// # Errors
    ///
    /// Returns an error if the coin is unknown or the action fails.
    #[allow(clippy::too_many_arguments)]
    pub async fn place_limit_order(
        &self,
        coin: &str,
        is_buy: bool,
        price: Decimal,
        size: Decimal,
        tif: HyperliquidTif,
        reduce_only: bool,
        cloid: Option<String>,
    ) -> Result<HyperliquidExecReport> {
        let asset = self.asset_id(coin).await?;
        let action = HyperliquidExecAction::Order {
            orders: vec![HyperliquidExecPlaceOrderRequest {
                asset,
                is_buy,
                price,
                size,
                reduce_only,
                kind: HyperliquidExecOrderKind::Limit {
                    limit: HyperliquidExecLimitParams { tif },
                },
                cloid,
            }],
            grouping: HyperliquidGrouping::Na,
            builder: None,
        };
        self.post_action_exec(&action).await
    }

    /// Cancels one order by exchange order id.
    ///
    /// # Errors
    ///
    /// Returns an error if the coin is unknown or the action fails.
    pub async fn cancel_order(&self, coin: &str, oid: u64) -> Result<HyperliquidExecReport> {
        let asset = self.asset_id(coin).await?;
        let action = HyperliquidExecAction::Cancel {
            cancels: vec![HyperliquidExecCancelRequest { asset, oid }],
        };
        self.post_action_exec(&action).await
    }

    /// Cancels one order by client order id.
    ///
    /// # Errors
    ///
    /// Returns an error if the coin is unknown or the action fails.
    pub async fn cancel_order_by_cloid(
        &self,
        coin: &str,
        cloid: &str,
    ) -> Result<HyperliquidExecReport> {
        let asset = self.asset_id(coin).await?;
        let action = HyperliquidExecAction::CancelByCloid {
            cancels: vec![HyperliquidExecCancelByCloidRequest {
                asset,
                cloid: cloid.to_string(),
            }],
        };
        self.post_action_exec(&action).await
    }

    /// Updates leverage for a coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the coin is unknown or the action fails.
    pub async fn update_leverage(
        &self,
        coin: &str,
        is_cross: bool,
        leverage: u32,
    ) -> Result<HyperliquidExchangeResponse> {
        let asset = self.asset_id(coin).await?;
        let action = HyperliquidExecAction::UpdateLeverage {
            asset,
            is_cross,
            leverage,
        };
        let response = self.post_action(&action).await?;
        ensure_exchange_response_ok(&response)?;
        Ok(response)
    }

    /// Arms or clears the dead-man's-switch.
    ///
    /// `time` (epoch ms) is a semantic action field, distinct from the signing nonce.
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails.
    pub async fn schedule_cancel(&self, time: Option<u64>) -> Result<HyperliquidExchangeResponse> {
        let action = HyperliquidExecAction::ScheduleCancel { time };
        let response = self.post_action(&action).await?;
        ensure_exchange_response_ok(&response)?;
        Ok(response)
    }

    /// Posts a no-op action with a caller-controlled nonce, invalidating any
    /// in-flight action signed with the same nonce.
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails.
    pub async fn noop(&self, nonce: u64) -> Result<HyperliquidExchangeResponse> {
        let action = HyperliquidExecAction::Noop {};
        let response = self.post_action_with(&action, Some(nonce), None).await?;
        ensure_exchange_response_ok(&response)?;
        Ok(response)
    }

    // ---------------------------------------------------------------------------------------------
    // Exchange endpoint: user-signed actions
    // ---------------------------------------------------------------------------------------------

    async fn post_user_signed<T>(&self, action: &T, nonce: u64) -> Result<HyperliquidExchangeResponse>
    where
        T: UserSignedAction + Serialize + Sync,
    {
        let wallet = self.ensure_wallet()?;
        let signature = sign_user_signed_action(&wallet, action)?;

        // User-signed families are never vault scoped; the field is omitted entirely.
        let request = HyperliquidExchangeRequest {
            action,
            nonce,
            signature: &signature,
            vault_address: None,
            expires_after: None,
        };

        let response: HyperliquidExchangeResponse =
            self.post_json(HYPERLIQUID_EXCHANGE_PATH, &request).await?;
        ensure_exchange_response_ok(&response)?;
        Ok(response)
    }

    /// Sends USDC to another address.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn usd_send(
        &self,
        destination: &str,
        amount: Decimal,
    ) -> Result<HyperliquidExchangeResponse> {
        let nonce = self.nonces.next().map_err(HyperliquidHttpError::from)?;
        let action = HyperliquidUsdSend::new(!self.is_testnet, destination, amount, nonce);
        self.post_user_signed(&action, nonce).await
    }

    /// Sends a spot token to another address.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn spot_send(
        &self,
        destination: &str,
        token: &str,
        amount: Decimal,
    ) -> Result<HyperliquidExchangeResponse> {
        let nonce = self.nonces.next().map_err(HyperliquidHttpError::from)?;
        let action = HyperliquidSpotSend::new(!self.is_testnet, destination, token, amount, nonce);
        self.post_user_signed(&action, nonce).await
    }

    /// Withdraws USDC via the bridge.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn withdraw(
        &self,
        destination: &str,
        amount: Decimal,
    ) -> Result<HyperliquidExchangeResponse> {
        let nonce = self.nonces.next().map_err(HyperliquidHttpError::from)?;
        let action = HyperliquidWithdraw::new(!self.is_testnet, destination, amount, nonce);
        self.post_user_signed(&action, nonce).await
    }

    /// Transfers USDC between the spot and perp classes.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn usd_class_transfer(
        &self,
        amount: Decimal,
        to_perp: bool,
    ) -> Result<HyperliquidExchangeResponse> {
        let nonce = self.nonces.next().map_err(HyperliquidHttpError::from)?;
        let action = HyperliquidUsdClassTransfer::new(!self.is_testnet, amount, to_perp, nonce);
        self.post_user_signed(&action, nonce).await
    }

    /// Delegates (or undelegates) stake to a validator.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn token_delegate(
        &self,
        validator: &str,
        wei: u64,
        is_undelegate: bool,
    ) -> Result<HyperliquidExchangeResponse> {
        let nonce = self.nonces.next().map_err(HyperliquidHttpError::from)?;
        let action =
            HyperliquidTokenDelegate::new(!self.is_testnet, validator, wei, is_undelegate, nonce);
        self.post_user_signed(&action, nonce).await
    }

    /// Approves an agent wallet for the account.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn approve_agent(
        &self,
        agent_address: &str,
        agent_name: &str,
    ) -> Result<HyperliquidExchangeResponse> {
        let nonce = self.nonces.next().map_err(HyperliquidHttpError::from)?;
        let action =
            HyperliquidApproveAgent::new(!self.is_testnet, agent_address, agent_name, nonce);
        self.post_user_signed(&action, nonce).await
    }

    /// Approves a maximum builder fee rate for a builder address.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn approve_builder_fee(
        &self,
        max_fee_rate: &str,
        builder: &str,
    ) -> Result<HyperliquidExchangeResponse> {
        let nonce = self.nonces.next().map_err(HyperliquidHttpError::from)?;
        let action =
            HyperliquidApproveBuilderFee::new(!self.is_testnet, max_fee_rate, builder, nonce);
        self.post_user_signed(&action, nonce).await
    }

    /// Converts the account to (or from) a multi-sig user.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn convert_to_multi_sig_user(
        &self,
        signers: &str,
    ) -> Result<HyperliquidExchangeResponse> {
        let nonce = self.nonces.next().map_err(HyperliquidHttpError::from)?;
        let action = HyperliquidConvertToMultiSigUser::new(!self.is_testnet, signers, nonce);
        self.post_user_signed(&action, nonce).await
    }

    /// Toggles dex abstraction for the user.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, signing, transport, or envelope failures.
    pub async fn set_user_dex_abstraction(
        &self,
        enabled: bool,
    ) -> Result<HyperliquidExchangeResponse> {
        let nonce = self.nonces.next().map_err(HyperliquidHttpError::from)?;
        let action = HyperliquidUserDexAbstraction::new(!self.is_testnet, enabled, nonce);
        self.post_user_signed(&action, nonce).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;

    const KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
    const KEY_ADDRESS: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";

    fn client_with_credential(credential: Option<HyperliquidCredential>) -> HyperliquidHttpClient {
        HyperliquidHttpClient::new(None, credential, None, None).unwrap()
    }

    #[rstest]
    fn test_default_url_is_mainnet() {
        let client = client_with_credential(None);
        assert_eq!(client.base_url(), HYPERLIQUID_HTTP_URL);
        assert!(!client.is_testnet());
    }

    #[rstest]
    fn test_testnet_url_detection() {
        let client = HyperliquidHttpClient::new(
            Some(HYPERLIQUID_HTTP_TESTNET_URL.to_string()),
            None,
            None,
            None,
        )
        .unwrap();
        assert!(client.is_testnet());
    }

    #[rstest]
    fn test_ensure_wallet_requires_credential() {
        let client = client_with_credential(None);
        assert!(matches!(
            client.ensure_wallet(),
            Err(HyperliquidHttpError::MissingCredentials)
        ));

        let empty = client_with_credential(Some(HyperliquidCredential::new("", None, None)));
        assert!(matches!(
            empty.ensure_wallet(),
            Err(HyperliquidHttpError::MissingCredentials)
        ));
    }

    #[rstest]
    fn test_ensure_wallet_idempotent_under_concurrency() {
        let client = Arc::new(client_with_credential(Some(HyperliquidCredential::new(
            KEY, None, None,
        ))));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let client = Arc::clone(&client);
                std::thread::spawn(move || client.ensure_wallet().unwrap())
            })
            .collect();

        let wallets: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for wallet in &wallets {
            // Every caller observes the same single wallet instance.
            assert!(Arc::ptr_eq(wallet, &wallets[0]));
            assert_eq!(wallet.address(), KEY_ADDRESS);
        }
    }

    #[rstest]
    fn test_derived_address_wins_over_configured() {
        let client = client_with_credential(Some(HyperliquidCredential::new(
            KEY,
            Some("0xABCDEF0123456789abcdef0123456789abcdef01".to_string()),
            None,
        )));

        assert_eq!(client.get_user_address().unwrap(), KEY_ADDRESS);
    }

    #[rstest]
    fn test_vault_address_normalized_at_bind() {
        let client = client_with_credential(Some(HyperliquidCredential::new(
            KEY,
            None,
            Some("0xABCDEF0123456789ABCDEF0123456789ABCDEF01".to_string()),
        )));

        client.ensure_wallet().unwrap();
        assert_eq!(
            client.vault_address().as_deref(),
            Some("0xabcdef0123456789abcdef0123456789abcdef01")
        );
    }

    #[rstest]
    fn test_wallet_bind_clears_asset_cache() {
        let client = client_with_credential(Some(HyperliquidCredential::new(KEY, None, None)));

        let mut map = ahash::AHashMap::new();
        map.insert("BTC".to_string(), 0u32);
        client.assets.install(map);
        assert!(!client.assets.is_empty());

        client.ensure_wallet().unwrap();
        assert!(client.assets.is_empty());
    }
}
