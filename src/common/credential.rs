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

//! Hyperliquid credential storage for wallet-based signing.

use core::fmt::Debug;

use zeroize::ZeroizeOnDrop;

/// Credentials for signing Hyperliquid exchange actions.
///
/// Hyperliquid authenticates by wallet signature rather than API key: the secret is a
/// hex-encoded secp256k1 private key (typically an agent/API wallet authorized for the
/// account). An optional account address may be configured when the signing key is an
/// agent wallet acting for a master account, and an optional vault address scopes
/// trading actions to a vault or sub-account.
#[derive(Clone, ZeroizeOnDrop)]
pub struct HyperliquidCredential {
    private_key: Box<str>,
    #[zeroize(skip)]
    account_address: Option<String>,
    #[zeroize(skip)]
    vault_address: Option<String>,
}

impl Debug for HyperliquidCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(HyperliquidCredential))
            .field("private_key", &"<redacted>")
            .field("account_address", &self.account_address)
            .field("vault_address", &self.vault_address)
            .finish()
    }
}

impl HyperliquidCredential {
    /// Creates a new [`HyperliquidCredential`] instance.
    #[must_use]
    pub fn new(
        private_key: impl Into<String>,
        account_address: Option<String>,
        vault_address: Option<String>,
    ) -> Self {
        Self {
            private_key: private_key.into().into_boxed_str(),
            account_address,
            vault_address,
        }
    }

    /// Returns the hex-encoded private key.
    ///
    /// # Safety
    ///
    /// The secret should be handled carefully and never logged or exposed.
    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Returns the configured account address, if any.
    #[must_use]
    pub fn account_address(&self) -> Option<&str> {
        self.account_address.as_deref()
    }

    /// Returns the configured vault address, if any.
    #[must_use]
    pub fn vault_address(&self) -> Option<&str> {
        self.vault_address.as_deref()
    }

    /// Returns whether a non-empty signing secret is present.
    #[must_use]
    pub fn has_secret(&self) -> bool {
        !self.private_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const PRIVATE_KEY: &str = "0x0123456789012345678901234567890123456789012345678901234567890123";

    #[rstest]
    fn test_credential_creation() {
        let credential = HyperliquidCredential::new(
            PRIVATE_KEY,
            Some("0xAbCd000000000000000000000000000000000001".to_string()),
            None,
        );

        assert_eq!(credential.private_key(), PRIVATE_KEY);
        assert!(credential.account_address().is_some());
        assert!(credential.vault_address().is_none());
        assert!(credential.has_secret());
    }

    #[rstest]
    fn test_empty_secret() {
        let credential = HyperliquidCredential::new("", None, None);
        assert!(!credential.has_secret());
    }

    #[rstest]
    fn test_debug_does_not_leak_secret() {
        let credential = HyperliquidCredential::new(PRIVATE_KEY, None, None);
        let debug_string = format!("{credential:?}");

        assert!(!debug_string.contains(&PRIVATE_KEY[6..]));
        assert!(debug_string.contains("<redacted>"));
    }
}
