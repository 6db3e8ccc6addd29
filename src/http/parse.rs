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

//! Exchange response envelope parsing.

use crate::{
    common::enums::HyperliquidSubmittedStatus,
    http::{
        error::HyperliquidHttpError,
        models::{HyperliquidExchangeResponse, HyperliquidExecStatus},
    },
};

/// Per-item string statuses the venue reports for accepted non-order work.
const BENIGN_STATUSES: &[&str] = &["success", "waitingForFill", "waitingForTrigger"];

/// Outcome derived from one exchange action response.
///
/// Batched actions can partially succeed: `error` carries the first per-item failure
/// while `order_id` and `status` still reflect whatever could be derived from the
/// remaining items. Callers must not assume an error means no side effect occurred at
/// the venue.
#[derive(Clone, Debug, Default)]
pub struct HyperliquidExecReport {
    /// First order id reported by the response, if any.
    pub order_id: Option<String>,
    /// Derived order state.
    pub status: HyperliquidSubmittedStatus,
    /// First per-item failure encountered, if any.
    pub error: Option<HyperliquidHttpError>,
}

/// Fails unless the envelope status is the literal `"ok"`.
///
/// On failure the venue's status text is carried verbatim and the response body is
/// not consulted.
///
/// # Errors
///
/// Returns [`HyperliquidHttpError::StatusNotOk`] for any non-ok status.
pub fn ensure_exchange_response_ok(
    response: &HyperliquidExchangeResponse,
) -> Result<(), HyperliquidHttpError> {
    if response.status != "ok" {
        return Err(HyperliquidHttpError::StatusNotOk {
            status: response.status.clone(),
        });
    }
    Ok(())
}

/// Derives the execution report from an exchange action response.
///
/// Walks `response.data.statuses[]` classifying each entry: per-item error strings,
/// resting acknowledgements (order active, id assigned), immediate fills, and bare
/// string statuses. The first order id found wins; the first failure is recorded
/// without discarding ids derived from other entries.
///
/// # Errors
///
/// Returns an error if the envelope status is not ok, the response body is missing,
/// or it carries no statuses to derive an outcome from.
pub fn parse_action_statuses(
    response: &HyperliquidExchangeResponse,
) -> Result<HyperliquidExecReport, HyperliquidHttpError> {
    ensure_exchange_response_ok(response)?;

    let body = response
        .response
        .as_ref()
        .ok_or(HyperliquidHttpError::MissingResponse)?;

    let statuses = body
        .data
        .as_ref()
        .map(|data| data.statuses.as_slice())
        .unwrap_or_default();

    if statuses.is_empty() {
        return Err(HyperliquidHttpError::EmptyStatuses);
    }

    let mut report = HyperliquidExecReport::default();

    for status in statuses {
        match status {
            HyperliquidExecStatus::Resting { resting } => {
                if report.order_id.is_none() {
                    report.order_id = Some(resting.oid.to_string());
                    report.status = HyperliquidSubmittedStatus::Active;
                }
            }
            HyperliquidExecStatus::Filled { filled } => {
                if report.order_id.is_none() {
                    report.order_id = Some(filled.oid.to_string());
                    report.status = HyperliquidSubmittedStatus::Filled;
                }
            }
            HyperliquidExecStatus::Error { error } => {
                if report.error.is_none() {
                    report.error = Some(HyperliquidHttpError::Submission {
                        message: error.clone(),
                    });
                }
            }
            HyperliquidExecStatus::Status(status) => {
                if !BENIGN_STATUSES.contains(&status.as_str()) && report.error.is_none() {
                    report.error = Some(HyperliquidHttpError::SubmissionStatus {
                        status: status.clone(),
                    });
                }
            }
        }
    }

    Ok(report)
}
