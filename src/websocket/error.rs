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

//! Error structures and enumerations for the Hyperliquid WebSocket integration.

use thiserror::Error;

use crate::common::enums::HyperliquidWsMethod;

/// A typed error enumeration for the Hyperliquid WebSocket client.
#[derive(Debug, Clone, Error)]
pub enum HyperliquidWsError {
    /// The WebSocket URL is malformed.
    #[error("URL parsing error: {0}")]
    UrlParsing(String),
    /// Failure serializing an outbound request.
    #[error("Message serialization error: {0}")]
    MessageSerialization(String),
    /// Failure deserializing an inbound frame or payload.
    #[error("Message deserialization error: {0}")]
    MessageDeserialization(String),
    /// A subscription acknowledgement without the mandatory `type` field.
    #[error("Subscription ack missing mandatory 'type' field")]
    MissingSubscriptionType,
    /// A subscription acknowledgement with an unrecognized method.
    #[error("Unsupported subscription method: {method}")]
    UnsupportedMethod { method: String },
    /// The venue reported a subscription failure; carries its literal message.
    #[error("Subscription {method} failed for {subscription}: {message}")]
    Subscription {
        method: HyperliquidWsMethod,
        subscription: String,
        message: String,
    },
    /// Transport-level failure.
    #[error("WebSocket client error: {0}")]
    ClientError(String),
    /// The connection or an internal channel has closed.
    #[error("WebSocket channel closed: {0}")]
    ChannelClosed(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for HyperliquidWsError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::ClientError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_subscription_error_includes_context() {
        let error = HyperliquidWsError::Subscription {
            method: HyperliquidWsMethod::Unsubscribe,
            subscription: "Trades { coin: \"BTC\" }".to_string(),
            message: "not subscribed".to_string(),
        };

        let text = error.to_string();
        assert!(text.contains("unsubscribe"));
        assert!(text.contains("BTC"));
        assert!(text.contains("not subscribed"));
    }
}
