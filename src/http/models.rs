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

//! Data models for the Hyperliquid HTTP API.
//!
//! Monetary fields are decimal strings on the wire (no trailing zeros, no scientific
//! notation); counts and leverage are JSON numbers. Some `/info` responses are
//! array-shaped and decode positionally into named tuple structs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    common::{
        enums::{HyperliquidGrouping, HyperliquidTif, HyperliquidTpSl},
        parse::{deserialize_decimal, normalize_address, parse_address_bytes, serialize_decimal_as_str},
    },
    signing::{
        HyperliquidSignError,
        action::{SIGNATURE_CHAIN_ID, UserSignedAction},
        eip712::Eip712Value,
        wallet::HyperliquidSignature,
    },
};

// -------------------------------------------------------------------------------------------------
// Info responses
// -------------------------------------------------------------------------------------------------

/// One asset entry in the perp universe listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidAssetInfo {
    pub name: String,
    pub sz_decimals: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_leverage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_isolated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_delisted: Option<bool>,
}

/// Perp market metadata: the universe listing whose positions are the asset indices.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidMeta {
    pub universe: Vec<HyperliquidAssetInfo>,
}

/// Per-asset market context (funding, open interest, prices).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidAssetCtx {
    pub funding: String,
    pub open_interest: String,
    pub prev_day_px: String,
    pub day_ntl_vlm: String,
    #[serde(default)]
    pub premium: Option<String>,
    pub oracle_px: String,
    pub mark_px: String,
    #[serde(default)]
    pub mid_px: Option<String>,
    #[serde(default)]
    pub impact_pxs: Option<Vec<String>>,
    #[serde(default)]
    pub day_base_vlm: Option<String>,
}

/// Array-shaped `metaAndAssetCtxs` response: `(metadata, asset contexts)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidMetaAndAssetCtxs(pub HyperliquidMeta, pub Vec<HyperliquidAssetCtx>);

/// One tradable spot pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidSpotPair {
    pub name: String,
    pub tokens: Vec<u32>,
    pub index: u32,
    pub is_canonical: bool,
}

/// One spot token listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidSpotToken {
    pub name: String,
    pub sz_decimals: u32,
    pub wei_decimals: u32,
    pub index: u32,
    pub token_id: String,
    pub is_canonical: bool,
    #[serde(default)]
    pub evm_contract: Option<serde_json::Value>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Spot market metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidSpotMeta {
    pub universe: Vec<HyperliquidSpotPair>,
    pub tokens: Vec<HyperliquidSpotToken>,
}

/// Array-shaped `spotMetaAndAssetCtxs` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidSpotMetaAndAssetCtxs(pub HyperliquidSpotMeta, pub Vec<serde_json::Value>);

/// One price level of the L2 book.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidLevel {
    pub px: String,
    pub sz: String,
    pub n: u32,
}

/// L2 order book snapshot; `levels[0]` are bids, `levels[1]` are asks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidL2Book {
    pub coin: String,
    pub time: u64,
    pub levels: Vec<Vec<HyperliquidLevel>>,
}

/// One candle from a `candleSnapshot` request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidCandle {
    /// Open time (epoch ms).
    pub t: u64,
    /// Close time (epoch ms).
    #[serde(rename = "T")]
    pub t_close: u64,
    /// Coin symbol.
    pub s: String,
    /// Interval label.
    pub i: String,
    pub o: String,
    pub c: String,
    pub h: String,
    pub l: String,
    pub v: String,
    pub n: u32,
}

/// One open order as returned by `openOrders`/`frontendOpenOrders`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidOpenOrder {
    pub coin: String,
    pub side: String,
    pub limit_px: String,
    pub sz: String,
    pub oid: u64,
    pub timestamp: u64,
    pub orig_sz: String,
    #[serde(default)]
    pub cloid: Option<String>,
    #[serde(default)]
    pub reduce_only: Option<bool>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub is_trigger: Option<bool>,
    #[serde(default)]
    pub trigger_px: Option<String>,
    #[serde(default)]
    pub trigger_condition: Option<String>,
}

/// Detail entry of an `orderStatus` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidOrderStatusDetail {
    pub order: HyperliquidOpenOrder,
    pub status: String,
    pub status_timestamp: u64,
}

/// `orderStatus` response: `status` is `"order"` when found, `"unknownOid"` otherwise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidOrderStatusResponse {
    pub status: String,
    #[serde(default)]
    pub order: Option<HyperliquidOrderStatusDetail>,
}

/// One historical user fill.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidUserFill {
    pub coin: String,
    pub px: String,
    pub sz: String,
    pub side: String,
    pub time: u64,
    pub start_position: String,
    pub dir: String,
    pub closed_pnl: String,
    pub hash: String,
    pub oid: u64,
    pub crossed: bool,
    pub fee: String,
    pub tid: u64,
    #[serde(default)]
    pub cloid: Option<String>,
    #[serde(default)]
    pub fee_token: Option<String>,
    #[serde(default)]
    pub builder_fee: Option<String>,
}

/// Margin summary block of the clearinghouse state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidMarginSummary {
    pub account_value: String,
    pub total_ntl_pos: String,
    pub total_raw_usd: String,
    pub total_margin_used: String,
}

/// Leverage configuration of one position.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidLeverage {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: u32,
    #[serde(default)]
    pub raw_usd: Option<String>,
}

/// One perp position.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidPosition {
    pub coin: String,
    pub szi: String,
    pub leverage: HyperliquidLeverage,
    #[serde(default)]
    pub entry_px: Option<String>,
    pub position_value: String,
    pub unrealized_pnl: String,
    pub return_on_equity: String,
    #[serde(default)]
    pub liquidation_px: Option<String>,
    pub margin_used: String,
    pub max_leverage: u32,
    #[serde(default)]
    pub cum_funding: Option<serde_json::Value>,
}

/// Position wrapper with its margin classification.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidAssetPosition {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: HyperliquidPosition,
}

/// Perp account state (`clearinghouseState`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidClearinghouseState {
    pub margin_summary: HyperliquidMarginSummary,
    pub cross_margin_summary: HyperliquidMarginSummary,
    pub cross_maintenance_margin_used: String,
    pub withdrawable: String,
    pub asset_positions: Vec<HyperliquidAssetPosition>,
    pub time: u64,
}

/// One spot token balance.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidSpotBalance {
    pub coin: String,
    pub token: u32,
    pub total: String,
    pub hold: String,
    pub entry_ntl: String,
}

/// Spot account state (`spotClearinghouseState`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidSpotClearinghouseState {
    pub balances: Vec<HyperliquidSpotBalance>,
}

/// One funding history entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidFundingEntry {
    pub coin: String,
    pub funding_rate: String,
    pub premium: String,
    pub time: u64,
}

/// Array-shaped `portfolio` response: `(period label, metrics)` pairs decoded positionally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidPortfolioPeriod(pub String, pub serde_json::Value);

/// Full `portfolio` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidPortfolio(pub Vec<HyperliquidPortfolioPeriod>);

// -------------------------------------------------------------------------------------------------
// Exchange envelope
// -------------------------------------------------------------------------------------------------

/// Outer request envelope posted to `/exchange`.
///
/// `vault_address` is tri-state: omitted entirely for action families that never
/// support vault scoping, explicit `null` when the family supports it but no vault is
/// configured, and the lowercased address otherwise. `expires_after` is emitted only
/// when supplied.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidExchangeRequest<'a, T: Serialize> {
    pub action: &'a T,
    pub nonce: u64,
    pub signature: &'a HyperliquidSignature,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_address: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_after: Option<u64>,
}

/// Response envelope from `/exchange`: `status` is `"ok"` or the venue's error text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidExchangeResponse {
    pub status: String,
    #[serde(default)]
    pub response: Option<HyperliquidExchangeResponseBody>,
}

/// Inner response body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidExchangeResponseBody {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Option<HyperliquidExchangeResponseData>,
}

/// Per-item status block of an action response.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HyperliquidExchangeResponseData {
    #[serde(default)]
    pub statuses: Vec<HyperliquidExecStatus>,
}

/// A resting-order acknowledgement: the order is now active on the book.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidRestingOrder {
    pub oid: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

/// An immediate-execution acknowledgement.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidFilledOrder {
    pub oid: u64,
    pub total_sz: String,
    pub avg_px: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

/// One entry of `response.data.statuses[]`.
///
/// Batched actions may mix these freely, so a call can partially succeed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperliquidExecStatus {
    /// Per-item error with the venue's literal message.
    Error { error: String },
    /// Order resting on the book.
    Resting { resting: HyperliquidRestingOrder },
    /// Order filled immediately.
    Filled { filled: HyperliquidFilledOrder },
    /// Bare string status, e.g. `"success"` or `"waitingForFill"`.
    Status(String),
}

// -------------------------------------------------------------------------------------------------
// L1 exchange actions
// -------------------------------------------------------------------------------------------------

/// Limit order parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HyperliquidExecLimitParams {
    pub tif: HyperliquidTif,
}

/// Trigger (stop/take-profit) order parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidExecTriggerParams {
    pub is_market: bool,
    #[serde(
        serialize_with = "serialize_decimal_as_str",
        deserialize_with = "deserialize_decimal"
    )]
    pub trigger_px: Decimal,
    pub tpsl: HyperliquidTpSl,
}

/// Order kind discriminated by its single wire key (`limit` or `trigger`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperliquidExecOrderKind {
    Limit { limit: HyperliquidExecLimitParams },
    Trigger { trigger: HyperliquidExecTriggerParams },
}

/// One order placement request (wire fields are single letters).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidExecPlaceOrderRequest {
    /// Asset index in the venue universe.
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "b")]
    pub is_buy: bool,
    #[serde(
        rename = "p",
        serialize_with = "serialize_decimal_as_str",
        deserialize_with = "deserialize_decimal"
    )]
    pub price: Decimal,
    #[serde(
        rename = "s",
        serialize_with = "serialize_decimal_as_str",
        deserialize_with = "deserialize_decimal"
    )]
    pub size: Decimal,
    #[serde(rename = "r")]
    pub reduce_only: bool,
    #[serde(rename = "t")]
    pub kind: HyperliquidExecOrderKind,
    /// Client order id (16-byte hex), optional.
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

/// Builder fee attribution for order placements.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidBuilderFee {
    /// Builder address.
    #[serde(rename = "b")]
    pub builder: String,
    /// Fee in tenths of a basis point.
    #[serde(rename = "f")]
    pub fee: u32,
}

/// Cancel by exchange order id.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HyperliquidExecCancelRequest {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "o")]
    pub oid: u64,
}

/// Cancel by client order id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidExecCancelByCloidRequest {
    pub asset: u32,
    pub cloid: String,
}

/// One entry of a batch modify.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidExecModifyRequest {
    pub oid: u64,
    pub order: HyperliquidExecPlaceOrderRequest,
}

/// TWAP order parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidExecTwapRequest {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "b")]
    pub is_buy: bool,
    #[serde(
        rename = "s",
        serialize_with = "serialize_decimal_as_str",
        deserialize_with = "deserialize_decimal"
    )]
    pub size: Decimal,
    #[serde(rename = "r")]
    pub reduce_only: bool,
    /// Duration in minutes.
    #[serde(rename = "m")]
    pub minutes: u32,
    /// Whether slice timing is randomized.
    #[serde(rename = "t")]
    pub randomize: bool,
}

/// Token registration phase of a spot deploy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidRegisterToken2 {
    pub spec: serde_json::Value,
    pub max_gas: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Genesis balance distribution phase of a spot deploy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidGenesis {
    pub token: u32,
    pub max_supply: String,
}

/// Spot pair registration phase of a spot deploy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HyperliquidRegisterSpot {
    pub tokens: Vec<u32>,
}

/// Hyperliquidity registration phase of a spot deploy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidRegisterHyperliquidity {
    pub spot: u32,
    pub start_px: String,
    pub order_sz: String,
    pub n_orders: u32,
}

/// Asset registration payload of a perp deploy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidRegisterAsset {
    pub dex: String,
    pub asset_request: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gas: Option<u64>,
}

/// L1 exchange actions: signed via the msgpack action hash and phantom agent.
///
/// The `type` discriminator and field order are part of the signed bytes, so variants
/// mirror the wire schema exactly. User-signed families (transfers, withdrawals,
/// approvals) are separate types with their own schemas; see the client methods.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HyperliquidExecAction {
    Order {
        orders: Vec<HyperliquidExecPlaceOrderRequest>,
        grouping: HyperliquidGrouping,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        builder: Option<HyperliquidBuilderFee>,
    },
    Cancel {
        cancels: Vec<HyperliquidExecCancelRequest>,
    },
    CancelByCloid {
        cancels: Vec<HyperliquidExecCancelByCloidRequest>,
    },
    Modify {
        oid: u64,
        order: HyperliquidExecPlaceOrderRequest,
    },
    BatchModify {
        modifies: Vec<HyperliquidExecModifyRequest>,
    },
    /// Dead-man's-switch: cancels all orders at `time` (epoch ms); `None` clears it.
    /// `time` is a semantic field distinct from the signing nonce.
    ScheduleCancel {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time: Option<u64>,
    },
    UpdateLeverage {
        asset: u32,
        is_cross: bool,
        leverage: u32,
    },
    UpdateIsolatedMargin {
        asset: u32,
        is_buy: bool,
        /// Margin delta in integer USD notional (micro-USD).
        ntli: i64,
    },
    TwapOrder {
        twap: HyperliquidExecTwapRequest,
    },
    TwapCancel {
        a: u32,
        t: u64,
    },
    VaultTransfer {
        vault_address: String,
        is_deposit: bool,
        /// Amount in micro-USD.
        usd: u64,
    },
    CreateSubAccount {
        name: String,
    },
    SubAccountTransfer {
        sub_account_user: String,
        is_deposit: bool,
        /// Amount in micro-USD.
        usd: u64,
    },
    SubAccountSpotTransfer {
        sub_account_user: String,
        is_deposit: bool,
        token: String,
        amount: String,
    },
    SetReferrer {
        code: String,
    },
    /// Staking deposit from spot balance (amount in wei).
    CDeposit {
        wei: u64,
    },
    /// Staking withdrawal to spot balance (amount in wei).
    CWithdraw {
        wei: u64,
    },
    EvmUserModify {
        using_big_blocks: bool,
    },
    /// Spot deploy: exactly one phase key is populated per call.
    SpotDeploy {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        register_token2: Option<HyperliquidRegisterToken2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        genesis: Option<HyperliquidGenesis>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        register_spot: Option<HyperliquidRegisterSpot>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        register_hyperliquidity: Option<HyperliquidRegisterHyperliquidity>,
    },
    PerpDeploy {
        register_asset: HyperliquidRegisterAsset,
    },
    /// No-op action used to invalidate in-flight nonces.
    Noop {},
}

impl HyperliquidExecAction {
    /// Returns whether this action family supports vault/sub-account scoping.
    ///
    /// Families that support it always emit the envelope field (address or explicit
    /// `null`); families that do not never emit it.
    #[must_use]
    pub fn supports_vault(&self) -> bool {
        matches!(
            self,
            Self::Order { .. }
                | Self::Cancel { .. }
                | Self::CancelByCloid { .. }
                | Self::Modify { .. }
                | Self::BatchModify { .. }
                | Self::ScheduleCancel { .. }
                | Self::UpdateLeverage { .. }
                | Self::UpdateIsolatedMargin { .. }
                | Self::TwapOrder { .. }
                | Self::TwapCancel { .. }
                | Self::Noop {}
        )
    }
}

// -------------------------------------------------------------------------------------------------
// User-signed actions
// -------------------------------------------------------------------------------------------------

fn address_value(address: &str) -> Result<Eip712Value, HyperliquidSignError> {
    parse_address_bytes(address)
        .map(Eip712Value::Address)
        .map_err(HyperliquidSignError::InvalidAddress)
}

/// USDC transfer to another address (`usdSend`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidUsdSend {
    #[serde(rename = "type")]
    kind: &'static str,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub destination: String,
    pub amount: String,
    pub time: u64,
}

impl HyperliquidUsdSend {
    /// Creates a new `usdSend` action; `time` doubles as the signing nonce.
    #[must_use]
    pub fn new(is_mainnet: bool, destination: &str, amount: Decimal, time: u64) -> Self {
        Self {
            kind: "usdSend",
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            hyperliquid_chain: hyperliquid_chain(is_mainnet),
            destination: normalize_address(destination),
            amount: crate::common::parse::format_amount(amount),
            time,
        }
    }
}

impl UserSignedAction for HyperliquidUsdSend {
    const TYPE_DESCRIPTOR: &'static str =
        "HyperliquidTransaction:UsdSend(string hyperliquidChain,string destination,string amount,uint64 time)";

    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
        Ok(vec![
            Eip712Value::String(self.hyperliquid_chain.clone()),
            Eip712Value::String(self.destination.clone()),
            Eip712Value::String(self.amount.clone()),
            Eip712Value::Uint64(self.time),
        ])
    }
}

/// Spot token transfer to another address (`spotSend`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidSpotSend {
    #[serde(rename = "type")]
    kind: &'static str,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub destination: String,
    /// Token descriptor, `"NAME:0xtokenId"`.
    pub token: String,
    pub amount: String,
    pub time: u64,
}

impl HyperliquidSpotSend {
    /// Creates a new `spotSend` action; `time` doubles as the signing nonce.
    #[must_use]
    pub fn new(
        is_mainnet: bool,
        destination: &str,
        token: &str,
        amount: Decimal,
        time: u64,
    ) -> Self {
        Self {
            kind: "spotSend",
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            hyperliquid_chain: hyperliquid_chain(is_mainnet),
            destination: normalize_address(destination),
            token: token.to_string(),
            amount: crate::common::parse::format_amount(amount),
            time,
        }
    }
}

impl UserSignedAction for HyperliquidSpotSend {
    const TYPE_DESCRIPTOR: &'static str =
        "HyperliquidTransaction:SpotSend(string hyperliquidChain,string destination,string token,string amount,uint64 time)";

    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
        Ok(vec![
            Eip712Value::String(self.hyperliquid_chain.clone()),
            Eip712Value::String(self.destination.clone()),
            Eip712Value::String(self.token.clone()),
            Eip712Value::String(self.amount.clone()),
            Eip712Value::Uint64(self.time),
        ])
    }
}

/// USDC withdrawal via the bridge (`withdraw3`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidWithdraw {
    #[serde(rename = "type")]
    kind: &'static str,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub destination: String,
    pub amount: String,
    pub time: u64,
}

impl HyperliquidWithdraw {
    /// Creates a new `withdraw3` action; `time` doubles as the signing nonce.
    #[must_use]
    pub fn new(is_mainnet: bool, destination: &str, amount: Decimal, time: u64) -> Self {
        Self {
            kind: "withdraw3",
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            hyperliquid_chain: hyperliquid_chain(is_mainnet),
            destination: normalize_address(destination),
            amount: crate::common::parse::format_amount(amount),
            time,
        }
    }
}

impl UserSignedAction for HyperliquidWithdraw {
    const TYPE_DESCRIPTOR: &'static str =
        "HyperliquidTransaction:Withdraw(string hyperliquidChain,string destination,string amount,uint64 time)";

    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
        Ok(vec![
            Eip712Value::String(self.hyperliquid_chain.clone()),
            Eip712Value::String(self.destination.clone()),
            Eip712Value::String(self.amount.clone()),
            Eip712Value::Uint64(self.time),
        ])
    }
}

/// Transfer between the perp and spot USD classes (`usdClassTransfer`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidUsdClassTransfer {
    #[serde(rename = "type")]
    kind: &'static str,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub amount: String,
    pub to_perp: bool,
    pub nonce: u64,
}

impl HyperliquidUsdClassTransfer {
    /// Creates a new `usdClassTransfer` action.
    #[must_use]
    pub fn new(is_mainnet: bool, amount: Decimal, to_perp: bool, nonce: u64) -> Self {
        Self {
            kind: "usdClassTransfer",
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            hyperliquid_chain: hyperliquid_chain(is_mainnet),
            amount: crate::common::parse::format_amount(amount),
            to_perp,
            nonce,
        }
    }
}

impl UserSignedAction for HyperliquidUsdClassTransfer {
    const TYPE_DESCRIPTOR: &'static str =
        "HyperliquidTransaction:UsdClassTransfer(string hyperliquidChain,string amount,bool toPerp,uint64 nonce)";

    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
        Ok(vec![
            Eip712Value::String(self.hyperliquid_chain.clone()),
            Eip712Value::String(self.amount.clone()),
            Eip712Value::Bool(self.to_perp),
            Eip712Value::Uint64(self.nonce),
        ])
    }
}

/// Stake delegation to or from a validator (`tokenDelegate`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidTokenDelegate {
    #[serde(rename = "type")]
    kind: &'static str,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub validator: String,
    pub wei: u64,
    pub is_undelegate: bool,
    pub nonce: u64,
}

impl HyperliquidTokenDelegate {
    /// Creates a new `tokenDelegate` action.
    #[must_use]
    pub fn new(
        is_mainnet: bool,
        validator: &str,
        wei: u64,
        is_undelegate: bool,
        nonce: u64,
    ) -> Self {
        Self {
            kind: "tokenDelegate",
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            hyperliquid_chain: hyperliquid_chain(is_mainnet),
            validator: normalize_address(validator),
            wei,
            is_undelegate,
            nonce,
        }
    }
}

impl UserSignedAction for HyperliquidTokenDelegate {
    const TYPE_DESCRIPTOR: &'static str =
        "HyperliquidTransaction:TokenDelegate(string hyperliquidChain,address validator,uint64 wei,bool isUndelegate,uint64 nonce)";

    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
        Ok(vec![
            Eip712Value::String(self.hyperliquid_chain.clone()),
            address_value(&self.validator)?,
            Eip712Value::Uint64(self.wei),
            Eip712Value::Bool(self.is_undelegate),
            Eip712Value::Uint64(self.nonce),
        ])
    }
}

/// Agent wallet approval (`approveAgent`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidApproveAgent {
    #[serde(rename = "type")]
    kind: &'static str,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub agent_address: String,
    pub agent_name: String,
    pub nonce: u64,
}

impl HyperliquidApproveAgent {
    /// Creates a new `approveAgent` action.
    #[must_use]
    pub fn new(is_mainnet: bool, agent_address: &str, agent_name: &str, nonce: u64) -> Self {
        Self {
            kind: "approveAgent",
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            hyperliquid_chain: hyperliquid_chain(is_mainnet),
            agent_address: normalize_address(agent_address),
            agent_name: agent_name.to_string(),
            nonce,
        }
    }
}

impl UserSignedAction for HyperliquidApproveAgent {
    const TYPE_DESCRIPTOR: &'static str =
        "HyperliquidTransaction:ApproveAgent(string hyperliquidChain,address agentAddress,string agentName,uint64 nonce)";

    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
        Ok(vec![
            Eip712Value::String(self.hyperliquid_chain.clone()),
            address_value(&self.agent_address)?,
            Eip712Value::String(self.agent_name.clone()),
            Eip712Value::Uint64(self.nonce),
        ])
    }
}

/// Builder fee approval (`approveBuilderFee`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidApproveBuilderFee {
    #[serde(rename = "type")]
    kind: &'static str,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    /// Maximum fee rate as a percent string, e.g. `"0.001%"`.
    pub max_fee_rate: String,
    pub builder: String,
    pub nonce: u64,
}

impl HyperliquidApproveBuilderFee {
    /// Creates a new `approveBuilderFee` action.
    #[must_use]
    pub fn new(is_mainnet: bool, max_fee_rate: &str, builder: &str, nonce: u64) -> Self {
        Self {
            kind: "approveBuilderFee",
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            hyperliquid_chain: hyperliquid_chain(is_mainnet),
            max_fee_rate: max_fee_rate.to_string(),
            builder: normalize_address(builder),
            nonce,
        }
    }
}

impl UserSignedAction for HyperliquidApproveBuilderFee {
    const TYPE_DESCRIPTOR: &'static str =
        "HyperliquidTransaction:ApproveBuilderFee(string hyperliquidChain,string maxFeeRate,address builder,uint64 nonce)";

    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
        Ok(vec![
            Eip712Value::String(self.hyperliquid_chain.clone()),
            Eip712Value::String(self.max_fee_rate.clone()),
            address_value(&self.builder)?,
            Eip712Value::Uint64(self.nonce),
        ])
    }
}

/// Multi-sig conversion (`convertToMultiSigUser`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidConvertToMultiSigUser {
    #[serde(rename = "type")]
    kind: &'static str,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    /// JSON-encoded signer configuration.
    pub signers: String,
    pub nonce: u64,
}

impl HyperliquidConvertToMultiSigUser {
    /// Creates a new `convertToMultiSigUser` action.
    #[must_use]
    pub fn new(is_mainnet: bool, signers: &str, nonce: u64) -> Self {
        Self {
            kind: "convertToMultiSigUser",
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            hyperliquid_chain: hyperliquid_chain(is_mainnet),
            signers: signers.to_string(),
            nonce,
        }
    }
}

impl UserSignedAction for HyperliquidConvertToMultiSigUser {
    const TYPE_DESCRIPTOR: &'static str =
        "HyperliquidTransaction:ConvertToMultiSigUser(string hyperliquidChain,string signers,uint64 nonce)";

    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
        Ok(vec![
            Eip712Value::String(self.hyperliquid_chain.clone()),
            Eip712Value::String(self.signers.clone()),
            Eip712Value::Uint64(self.nonce),
        ])
    }
}

/// Dex abstraction toggle for the user (`userDexAbstraction`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidUserDexAbstraction {
    #[serde(rename = "type")]
    kind: &'static str,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub enabled: bool,
    pub nonce: u64,
}

impl HyperliquidUserDexAbstraction {
    /// Creates a new `userDexAbstraction` action.
    #[must_use]
    pub fn new(is_mainnet: bool, enabled: bool, nonce: u64) -> Self {
        Self {
            kind: "userDexAbstraction",
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            hyperliquid_chain: hyperliquid_chain(is_mainnet),
            enabled,
            nonce,
        }
    }
}

impl UserSignedAction for HyperliquidUserDexAbstraction {
    const TYPE_DESCRIPTOR: &'static str =
        "HyperliquidTransaction:UserDexAbstraction(string hyperliquidChain,bool enabled,uint64 nonce)";

    fn typed_values(&self) -> Result<Vec<Eip712Value>, HyperliquidSignError> {
        Ok(vec![
            Eip712Value::String(self.hyperliquid_chain.clone()),
            Eip712Value::Bool(self.enabled),
            Eip712Value::Uint64(self.nonce),
        ])
    }
}

fn hyperliquid_chain(is_mainnet: bool) -> String {
    if is_mainnet { "Mainnet" } else { "Testnet" }.to_string()
}
