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

//! Client bindings for the [Hyperliquid](https://hyperliquid.xyz) decentralized perpetual
//! futures and spot exchange.
//!
//! This crate provides connectivity to the Hyperliquid REST and WebSocket APIs:
//!
//! - **HTTP**: the read-only `/info` endpoint family and the signed `/exchange` action
//!   endpoint, including the full EIP-712 action signing pipeline (L1 actions via the
//!   msgpack action hash and phantom agent, user-signed actions via per-family typed-data
//!   schemas) with mainnet/testnet chain discrimination and vault/sub-account scoping.
//! - **WebSocket**: subscription management with acknowledgement reconciliation (the venue
//!   does not echo client correlation ids, so pending requests are matched by a canonical
//!   subscription fingerprint), and an in-order typed event stream over the venue's data
//!   channels (trades, book, BBO, candles, user fills, order updates, funding, ledger,
//!   active asset data).
//!
//! Sessions are fully independent instances: credentials, the asset-index cache, and all
//! subscription state are scoped to one client object, never process-wide.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod common;
pub mod http;
pub mod signing;
pub mod websocket;
