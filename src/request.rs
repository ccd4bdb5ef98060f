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

//! Financing request data model.
//!
//! A request exists in two representations: the raw [`Draft`] exactly as the
//! user typed it, and the typed [`FinancingRequest`] snapshot produced by
//! [`validate_all`](crate::validation::validate_all) once every rule holds.

use crate::base::{CountryCode, CurrencyCode};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight fields of a financing request.
///
/// Serves as the stable key for field-level diagnostics. [`Field::name`]
/// yields the wire name used by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Requestor,
    OriginCountry,
    ProjectCode,
    Description,
    Amount,
    Currency,
    ValidityStartDate,
    ValidityEndDate,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Field; 8] = [
        Field::Requestor,
        Field::OriginCountry,
        Field::ProjectCode,
        Field::Description,
        Field::Amount,
        Field::Currency,
        Field::ValidityStartDate,
        Field::ValidityEndDate,
    ];

    /// The camelCase wire name of the field.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Requestor => "requestor",
            Self::OriginCountry => "originCountry",
            Self::ProjectCode => "projectCode",
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Currency => "currency",
            Self::ValidityStartDate => "validityStartDate",
            Self::ValidityEndDate => "validityEndDate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The in-progress request exactly as entered.
///
/// Every field is raw text. Amounts and dates are parsed during validation
/// so malformed input degrades to a field error instead of failing at the
/// edge. The form controller exclusively owns the draft; nothing else
/// mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub requestor: String,
    pub origin_country: String,
    pub project_code: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
    pub validity_start_date: String,
    pub validity_end_date: String,
}

impl Draft {
    /// Reads one field by key.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Requestor => &self.requestor,
            Field::OriginCountry => &self.origin_country,
            Field::ProjectCode => &self.project_code,
            Field::Description => &self.description,
            Field::Amount => &self.amount,
            Field::Currency => &self.currency,
            Field::ValidityStartDate => &self.validity_start_date,
            Field::ValidityEndDate => &self.validity_end_date,
        }
    }

    /// Writes one field by key.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Requestor => self.requestor = value,
            Field::OriginCountry => self.origin_country = value,
            Field::ProjectCode => self.project_code = value,
            Field::Description => self.description = value,
            Field::Amount => self.amount = value,
            Field::Currency => self.currency = value,
            Field::ValidityStartDate => self.validity_start_date = value,
            Field::ValidityEndDate => self.validity_end_date = value,
        }
    }

    /// True when every field is blank.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

/// A validated financing request snapshot.
///
/// Produced only by the rule engine; immutable once appended to the session
/// history. Serializes with the camelCase field names the remote API
/// expects, dates as ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingRequest {
    pub requestor: String,
    pub origin_country: CountryCode,
    pub project_code: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub validity_start_date: NaiveDate,
    pub validity_end_date: NaiveDate,
}
