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

//! Nonce generation for signed exchange actions.
//!
//! The venue treats nonces as a monotonic-enough anti-replay token per account. This
//! client derives them from wall-clock milliseconds and does not enforce strict local
//! monotonicity; callers needing explicit ordering (or idempotent retries) pass their
//! own nonce through the execution API.

use std::{fmt::Debug, sync::Arc};

use crate::signing::HyperliquidSignError;

/// Injectable millisecond clock.
pub type UnixMillisClock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Produces request nonces from a wall-clock millisecond source.
///
/// The clock is injectable for deterministic tests and defaults to the system clock.
#[derive(Clone)]
pub struct NonceSource {
    clock: UnixMillisClock,
}

impl Debug for NonceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(NonceSource))
            .field("clock", &"<fn>")
            .finish()
    }
}

impl Default for NonceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSource {
    /// Creates a nonce source backed by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Arc::new(|| chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Creates a nonce source backed by the given clock.
    #[must_use]
    pub fn with_clock(clock: UnixMillisClock) -> Self {
        Self { clock }
    }

    /// Returns the next nonce.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock produces a negative reading (clock misconfiguration).
    pub fn next(&self) -> Result<u64, HyperliquidSignError> {
        let millis = (self.clock)();
        if millis < 0 {
            return Err(HyperliquidSignError::NegativeTimestamp(millis));
        }
        #[allow(clippy::cast_sign_loss, reason = "negative values rejected above")]
        Ok(millis as u64)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_injected_clock() {
        let source = NonceSource::with_clock(Arc::new(|| 1_700_000_000_000));
        assert_eq!(source.next().unwrap(), 1_700_000_000_000);
    }

    #[rstest]
    fn test_negative_clock_rejected() {
        let source = NonceSource::with_clock(Arc::new(|| -1));
        assert!(matches!(
            source.next(),
            Err(HyperliquidSignError::NegativeTimestamp(-1))
        ));
    }

    #[rstest]
    fn test_system_clock_is_positive() {
        let source = NonceSource::new();
        assert!(source.next().unwrap() > 1_600_000_000_000);
    }
}
