// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for validation, reference data, and submission.

use thiserror::Error;

/// Field and cross-field validation failures.
///
/// The `#[error]` text is the user-facing inline message shown next to the
/// offending field. All of these are recoverable and re-evaluated on every
/// change; none are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Requestor name is shorter than two characters
    #[error("Requestor name is required")]
    RequestorTooShort,

    /// No origin country selected
    #[error("Country is required")]
    CountryRequired,

    /// Selected country code is not in the reference data
    #[error("Unknown country code")]
    UnknownCountry,

    /// Project code does not match the XXXX-XXXX pattern
    #[error("Project code must be in XXXX-XXXX format with capital letters and digits 1-9")]
    ProjectCodeFormat,

    /// Description is longer than 150 characters
    #[error("Description cannot exceed 150 characters")]
    DescriptionTooLong,

    /// Amount does not parse as a decimal number
    #[error("Amount must be a number")]
    AmountUnparsable,

    /// Amount is zero or negative
    #[error("Amount must be positive")]
    AmountNotPositive,

    /// No payment currency selected
    #[error("Currency is required")]
    CurrencyRequired,

    /// Selected currency code is not in the reference data
    #[error("Unknown currency code")]
    UnknownCurrency,

    /// A date field does not parse as an ISO calendar date
    #[error("Invalid date")]
    DateUnparsable,

    /// Validity start date is not strictly after today + 15 days
    #[error("Start date must be at least 15 days from today")]
    StartDateTooSoon,

    /// Validity end date is not strictly after start + 1 year
    #[error("End date must be at least 1 year after start date")]
    EndDateTooEarly,

    /// Validity end date is after start + 3 years
    #[error("End date cannot be more than 3 years after start date")]
    EndDateTooLate,
}

/// Reference data fetch failures.
///
/// A failed fetch degrades the matching form control to a disabled state;
/// it never blocks the rest of the form.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP transport or non-2xx status from the registry
    #[error("reference data request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The registry responded but carried no usable records
    #[error("reference data payload had no usable records")]
    EmptyPayload,
}

/// Submission failures.
///
/// Surfaced as a single page-level message; the draft is kept intact so the
/// user may resubmit manually.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The remote API answered with a non-2xx status. The body text is
    /// carried verbatim for display.
    #[error("submission rejected ({status}): {body}")]
    Status { status: u16, body: String },

    /// Network-level failure before any response arrived
    #[error("submission request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
