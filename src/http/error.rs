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

//! Error structures and enumerations for the Hyperliquid HTTP integration.

use thiserror::Error;

use crate::signing::HyperliquidSignError;

/// A typed error enumeration for the Hyperliquid HTTP client.
///
/// None of these errors are retried by this layer; retry policy belongs to the caller.
#[derive(Debug, Clone, Error)]
pub enum HyperliquidHttpError {
    /// Credentials are missing or carry an empty signing secret.
    #[error("Missing credentials for signed request")]
    MissingCredentials,
    /// Failure in the signing pipeline (key, serialization, clock, or ECDSA).
    #[error("Signing error: {0}")]
    Signing(#[from] HyperliquidSignError),
    /// A coin symbol could not be resolved to an asset index, even after a refresh.
    #[error("Unknown coin: {coin}")]
    UnknownCoin { coin: String },
    /// The exchange envelope reported a non-ok status; carries the venue's literal text.
    #[error("Exchange action status not ok: {status}")]
    StatusNotOk { status: String },
    /// A per-item submission error inside an otherwise ok envelope.
    #[error("Action submission error: {message}")]
    Submission { message: String },
    /// A per-item string status that is not a known success value.
    #[error("Action submission status failure: {status}")]
    SubmissionStatus { status: String },
    /// The envelope reported ok but carried no response body.
    #[error("Exchange response missing from envelope")]
    MissingResponse,
    /// The response body carried no statuses to derive an outcome from.
    #[error("Exchange response statuses empty")]
    EmptyStatuses,
    /// Failure during JSON serialization/deserialization.
    #[error("JSON error: {0}")]
    JsonError(String),
    /// Generic network/transport error, propagated verbatim.
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Any unexpected HTTP status from the venue.
    #[error("Unexpected HTTP status code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    /// Request was canceled, typically due to shutdown or disconnect.
    #[error("Request canceled: {0}")]
    Canceled(String),
    /// Parameter validation error raised before any network I/O.
    #[error("Parameter validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for HyperliquidHttpError {
    fn from(error: serde_json::Error) -> Self {
        Self::JsonError(error.to_string())
    }
}

impl From<reqwest::Error> for HyperliquidHttpError {
    fn from(error: reqwest::Error) -> Self {
        Self::NetworkError(error.to_string())
    }
}

/// Convenience result alias for HTTP operations.
pub type Result<T> = std::result::Result<T, HyperliquidHttpError>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_status_not_ok_carries_literal_text() {
        let error = HyperliquidHttpError::StatusNotOk {
            status: "failure".to_string(),
        };
        assert_eq!(error.to_string(), "Exchange action status not ok: failure");
    }

    #[rstest]
    fn test_submission_error_carries_venue_wording() {
        let error = HyperliquidHttpError::Submission {
            message: "insufficient margin".to_string(),
        };
        assert!(error.to_string().contains("insufficient margin"));
    }

    #[rstest]
    fn test_from_json_error() {
        let json_err =
            serde_json::from_str::<serde_json::Value>("not json").expect_err("should fail");
        let error = HyperliquidHttpError::from(json_err);
        assert!(matches!(error, HyperliquidHttpError::JsonError(_)));
    }

    #[rstest]
    fn test_from_sign_error() {
        let error = HyperliquidHttpError::from(HyperliquidSignError::NegativeTimestamp(-5));
        assert!(matches!(error, HyperliquidHttpError::Signing(_)));
        assert!(error.to_string().contains("-5"));
    }
}
