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

//! Subscription acknowledgement reconciliation.
//!
//! The venue acknowledges subscribe/unsubscribe requests asynchronously and echoes only
//! the subscription's own descriptive fields, never a client correlation id. Pending
//! requests are therefore queued FIFO per canonical fingerprint: a client may
//! legitimately issue the same logical subscribe twice in quick succession (reconnect
//! races), so each fingerprint keys a queue rather than a single slot, and every ack
//! pops at most one method-matching entry from the front.
//!
//! Acks may also arrive unsolicited or duplicated; those are tolerated by
//! reconstructing context from the ack itself. Ack error strings always propagate
//! regardless of whether a pending entry was matched.

use std::{
    collections::VecDeque,
    sync::{Mutex, RwLock},
};

use ahash::AHashMap;

use crate::{
    common::enums::HyperliquidWsMethod,
    websocket::{
        error::HyperliquidWsError,
        messages::{HyperliquidSubscription, PendingWsRequest, WsSubscriptionAck},
    },
};

/// Result of reconciling one acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    /// A subscribe ack was matched (or reconstructed); the subscription is now active.
    Subscribed(HyperliquidSubscription),
    /// An unsubscribe ack was matched (or reconstructed); the subscription is gone.
    Unsubscribed(HyperliquidSubscription),
}

/// Pending-request table plus the registry of confirmed subscriptions.
#[derive(Debug, Default)]
pub struct SubscriptionState {
    pending: Mutex<AHashMap<String, VecDeque<PendingWsRequest>>>,
    active: RwLock<AHashMap<String, HyperliquidSubscription>>,
}

impl SubscriptionState {
    /// Creates a new empty subscription state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request as pending, keyed by the subscription's fingerprint.
    ///
    /// Must happen before the frame can be acknowledged, so callers enqueue before
    /// sending; a fast-arriving ack then always finds its match.
    pub fn enqueue(&self, method: HyperliquidWsMethod, subscription: HyperliquidSubscription) {
        let fingerprint = subscription.fingerprint();
        let mut pending = self.pending.lock().expect("pending lock poisoned");
        pending.entry(fingerprint).or_default().push_back(PendingWsRequest {
            method,
            subscription,
        });
    }

    /// Removes the most recently enqueued matching entry (send failure rollback).
    pub fn rollback(&self, method: HyperliquidWsMethod, subscription: &HyperliquidSubscription) {
        let fingerprint = subscription.fingerprint();
        let mut pending = self.pending.lock().expect("pending lock poisoned");
        if let Some(queue) = pending.get_mut(&fingerprint) {
            if let Some(pos) = queue
                .iter()
                .rposition(|p| p.method == method && &p.subscription == subscription)
            {
                queue.remove(pos);
            }
            if queue.is_empty() {
                pending.remove(&fingerprint);
            }
        }
    }

    /// Pops the first pending entry for the fingerprint matching `method`.
    ///
    /// Returns `None` for unsolicited or duplicated acks; that is not an error.
    #[must_use]
    pub fn dequeue(
        &self,
        method: HyperliquidWsMethod,
        fingerprint: &str,
    ) -> Option<PendingWsRequest> {
        let mut pending = self.pending.lock().expect("pending lock poisoned");
        let queue = pending.get_mut(fingerprint)?;
        let pos = queue.iter().position(|p| p.method == method)?;
        let entry = queue.remove(pos);
        if queue.is_empty() {
            pending.remove(fingerprint);
        }
        entry
    }

    /// Returns the number of pending entries across all fingerprints.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending
            .lock()
            .expect("pending lock poisoned")
            .values()
            .map(VecDeque::len)
            .sum()
    }

    /// Marks a subscription as confirmed. Duplicate adds are benign.
    pub fn confirm(&self, subscription: HyperliquidSubscription) {
        let fingerprint = subscription.fingerprint();
        let mut active = self.active.write().expect("active lock poisoned");
        if active.insert(fingerprint, subscription).is_some() {
            tracing::debug!("Subscription already active, keeping registry entry");
        }
    }

    /// Removes a confirmed subscription. Missing entries are benign.
    pub fn remove(&self, fingerprint: &str) {
        let mut active = self.active.write().expect("active lock poisoned");
        if active.remove(fingerprint).is_none() {
            tracing::debug!("Subscription {fingerprint} not in registry, nothing to remove");
        }
    }

    /// Returns the confirmed subscription for a fingerprint, if any.
    #[must_use]
    pub fn get_active(&self, fingerprint: &str) -> Option<HyperliquidSubscription> {
        self.active
            .read()
            .expect("active lock poisoned")
            .get(fingerprint)
            .cloned()
    }

    /// Returns all confirmed subscriptions.
    #[must_use]
    pub fn active_subscriptions(&self) -> Vec<HyperliquidSubscription> {
        self.active
            .read()
            .expect("active lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Reconciles one acknowledgement against the pending table and registry.
    ///
    /// The ack's echoed descriptor is decoded from its loosely typed representation
    /// (`type` is mandatory, everything else per channel family); the method defaults
    /// to subscribe when unspecified. A matched pending entry is consumed; otherwise
    /// context is reconstructed from the echo (subscribe) or the registry
    /// (unsubscribe). An ack error string always propagates as a typed failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is missing its `type`, cannot be decoded,
    /// the method is unsupported, or the ack reports a venue-side failure.
    pub fn handle_ack(
        &self,
        ack: &WsSubscriptionAck,
    ) -> Result<SubscriptionOutcome, HyperliquidWsError> {
        let descriptor_value = ack
            .subscription
            .clone()
            .unwrap_or(serde_json::Value::Null);

        if descriptor_value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .is_none()
        {
            return Err(HyperliquidWsError::MissingSubscriptionType);
        }

        let descriptor: HyperliquidSubscription = serde_json::from_value(descriptor_value)
            .map_err(|e| {
                HyperliquidWsError::MessageDeserialization(format!(
                    "subscription ack descriptor: {e}"
                ))
            })?;

        let method = match ack.method.as_deref() {
            // The venue may omit the method on echoed acks; subscribe is the
            // fail-open default.
            None | Some("subscribe") => HyperliquidWsMethod::Subscribe,
            Some("unsubscribe") => HyperliquidWsMethod::Unsubscribe,
            Some(other) => {
                return Err(HyperliquidWsError::UnsupportedMethod {
                    method: other.to_string(),
                });
            }
        };

        let fingerprint = descriptor.fingerprint();

        let resolved = match self.dequeue(method, &fingerprint) {
            Some(pending) => pending.subscription,
            None => match method {
                // Unsolicited subscribe ack: synthesize from the server's echo.
                HyperliquidWsMethod::Subscribe => descriptor,
                // Unsolicited unsubscribe ack: prefer the registry's record.
                HyperliquidWsMethod::Unsubscribe => {
                    self.get_active(&fingerprint).unwrap_or(descriptor)
                }
            },
        };

        if let Some(message) = ack.err.as_deref().filter(|m| !m.is_empty()) {
            // An ack error always propagates, matched or not.
            return Err(HyperliquidWsError::Subscription {
                method,
                subscription: format!("{resolved:?}"),
                message: message.to_string(),
            });
        }

        match method {
            HyperliquidWsMethod::Subscribe => {
                self.confirm(resolved.clone());
                Ok(SubscriptionOutcome::Subscribed(resolved))
            }
            HyperliquidWsMethod::Unsubscribe => {
                self.remove(&fingerprint);
                Ok(SubscriptionOutcome::Unsubscribed(resolved))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use ustr::Ustr;

    use super::*;

    fn trades(coin: &str) -> HyperliquidSubscription {
        HyperliquidSubscription::Trades {
            coin: Ustr::from(coin),
        }
    }

    fn subscribe_ack(subscription: serde_json::Value) -> WsSubscriptionAck {
        WsSubscriptionAck {
            method: Some("subscribe".to_string()),
            subscription: Some(subscription),
            err: None,
        }
    }

    #[rstest]
    fn test_acks_match_in_fifo_order() {
        let state = SubscriptionState::new();

        // Two identical logical subscribes before any ack lands.
        state.enqueue(HyperliquidWsMethod::Subscribe, trades("BTC"));
        state.enqueue(HyperliquidWsMethod::Subscribe, trades("BTC"));
        assert_eq!(state.pending_len(), 2);

        let ack = subscribe_ack(json!({"type": "trades", "coin": "BTC"}));

        let first = state.handle_ack(&ack).unwrap();
        assert_eq!(first, SubscriptionOutcome::Subscribed(trades("BTC")));
        assert_eq!(state.pending_len(), 1);

        let second = state.handle_ack(&ack).unwrap();
        assert_eq!(second, SubscriptionOutcome::Subscribed(trades("BTC")));
        assert_eq!(state.pending_len(), 0);
    }

    #[rstest]
    fn test_dequeue_matches_by_method() {
        let state = SubscriptionState::new();

        // Subscribe then quickly unsubscribe before any ack arrives.
        state.enqueue(HyperliquidWsMethod::Subscribe, trades("BTC"));
        state.enqueue(HyperliquidWsMethod::Unsubscribe, trades("BTC"));

        // The unsubscribe ack must not consume the pending subscribe entry.
        let unsub_ack = WsSubscriptionAck {
            method: Some("unsubscribe".to_string()),
            subscription: Some(json!({"type": "trades", "coin": "BTC"})),
            err: None,
        };
        let outcome = state.handle_ack(&unsub_ack).unwrap();
        assert_eq!(outcome, SubscriptionOutcome::Unsubscribed(trades("BTC")));

        let fingerprint = trades("BTC").fingerprint();
        let remaining = state
            .dequeue(HyperliquidWsMethod::Subscribe, &fingerprint)
            .unwrap();
        assert_eq!(remaining.method, HyperliquidWsMethod::Subscribe);
    }

    #[rstest]
    fn test_unsolicited_subscribe_ack_is_tolerated() {
        let state = SubscriptionState::new();

        let ack = subscribe_ack(json!({"type": "l2Book", "coin": "ETH"}));
        let outcome = state.handle_ack(&ack).unwrap();

        // Context reconstructed from the server's echoed fields.
        assert!(matches!(
            outcome,
            SubscriptionOutcome::Subscribed(HyperliquidSubscription::L2Book { coin, .. })
                if coin == "ETH"
        ));
        assert_eq!(state.active_subscriptions().len(), 1);
    }

    #[rstest]
    fn test_unsolicited_unsubscribe_ack_uses_registry() {
        let state = SubscriptionState::new();
        state.confirm(trades("SOL"));

        let ack = WsSubscriptionAck {
            method: Some("unsubscribe".to_string()),
            subscription: Some(json!({"type": "trades", "coin": "SOL"})),
            err: None,
        };

        let outcome = state.handle_ack(&ack).unwrap();
        assert_eq!(outcome, SubscriptionOutcome::Unsubscribed(trades("SOL")));
        assert!(state.active_subscriptions().is_empty());
    }

    #[rstest]
    fn test_missing_type_is_hard_error() {
        let state = SubscriptionState::new();
        let ack = subscribe_ack(json!({"coin": "BTC"}));

        assert!(matches!(
            state.handle_ack(&ack),
            Err(HyperliquidWsError::MissingSubscriptionType)
        ));
    }

    #[rstest]
    fn test_missing_method_defaults_to_subscribe() {
        let state = SubscriptionState::new();
        let ack = WsSubscriptionAck {
            method: None,
            subscription: Some(json!({"type": "trades", "coin": "BTC"})),
            err: None,
        };

        let outcome = state.handle_ack(&ack).unwrap();
        assert!(matches!(outcome, SubscriptionOutcome::Subscribed(_)));
    }

    #[rstest]
    fn test_unsupported_method_is_error() {
        let state = SubscriptionState::new();
        let ack = WsSubscriptionAck {
            method: Some("resubscribe".to_string()),
            subscription: Some(json!({"type": "trades", "coin": "BTC"})),
            err: None,
        };

        assert!(matches!(
            state.handle_ack(&ack),
            Err(HyperliquidWsError::UnsupportedMethod { ref method }) if method == "resubscribe"
        ));
    }

    #[rstest]
    fn test_ack_error_propagates_even_when_matched() {
        let state = SubscriptionState::new();
        state.enqueue(HyperliquidWsMethod::Subscribe, trades("BTC"));

        let ack = WsSubscriptionAck {
            method: Some("subscribe".to_string()),
            subscription: Some(json!({"type": "trades", "coin": "BTC"})),
            err: Some("rate limited".to_string()),
        };

        let err = state.handle_ack(&ack).unwrap_err();
        assert!(matches!(
            err,
            HyperliquidWsError::Subscription { ref message, .. } if message == "rate limited"
        ));
        // The pending entry was still consumed.
        assert_eq!(state.pending_len(), 0);
        // Nothing was confirmed.
        assert!(state.active_subscriptions().is_empty());
    }

    #[rstest]
    fn test_duplicate_confirm_and_missing_remove_are_benign() {
        let state = SubscriptionState::new();
        state.confirm(trades("BTC"));
        state.confirm(trades("BTC"));
        assert_eq!(state.active_subscriptions().len(), 1);

        state.remove(&trades("BTC").fingerprint());
        state.remove(&trades("BTC").fingerprint());
        assert!(state.active_subscriptions().is_empty());
    }

    #[rstest]
    fn test_rollback_removes_most_recent_entry() {
        let state = SubscriptionState::new();
        state.enqueue(HyperliquidWsMethod::Subscribe, trades("BTC"));
        state.enqueue(HyperliquidWsMethod::Subscribe, trades("BTC"));

        state.rollback(HyperliquidWsMethod::Subscribe, &trades("BTC"));
        assert_eq!(state.pending_len(), 1);

        state.rollback(HyperliquidWsMethod::Subscribe, &trades("BTC"));
        assert_eq!(state.pending_len(), 0);

        // Rolling back with nothing pending is a no-op.
        state.rollback(HyperliquidWsMethod::Subscribe, &trades("BTC"));
        assert_eq!(state.pending_len(), 0);
    }
}
