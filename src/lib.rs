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

//! # Financing Demo
//!
//! This library implements the intake flow for financing requests: a draft
//! collects requestor identity, a project code, a monetary amount and
//! currency, and a validity date range; a pure rule engine validates it
//! (including the cross-field date arithmetic and the restricted-country
//! currency lock); a gateway posts accepted requests to the remote API; and
//! a session history keeps the successful submissions for display.
//!
//! ## Core Components
//!
//! - [`FormController`]: owns the draft, derives UI state, gates submission
//! - [`validate_all`]: the authoritative rule-engine entry point
//! - [`CountryProvider`] / [`CurrencyProvider`]: cached reference data
//! - [`SubmissionGateway`]: POSTs validated requests to the remote API
//! - [`SessionHistory`]: append-only log of successful submissions
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use financing_demo_rs::reference::{Country, Currency};
//! use financing_demo_rs::{
//!     CountryCode, CurrencyCode, Draft, Field, ValidationContext, validate_all,
//! };
//!
//! let countries = vec![Country {
//!     name: "France".into(),
//!     code: CountryCode::new("FR"),
//!     restricted_currency: false,
//! }];
//! let currencies = vec![Currency {
//!     code: CurrencyCode::new("EUR"),
//!     display_name: "EUR - Euro".into(),
//! }];
//!
//! let mut draft = Draft::default();
//! draft.set(Field::Requestor, "Jane Doe");
//! draft.set(Field::OriginCountry, "FR");
//! draft.set(Field::ProjectCode, "ABCD-1234");
//! draft.set(Field::Description, "Bridge works");
//! draft.set(Field::Amount, "1500.00");
//! draft.set(Field::Currency, "EUR");
//! draft.set(Field::ValidityStartDate, "2026-09-20");
//! draft.set(Field::ValidityEndDate, "2028-09-20");
//!
//! let ctx = ValidationContext {
//!     countries: &countries,
//!     currencies: &currencies,
//!     today: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
//! };
//! let request = validate_all(&draft, &ctx).expect("draft is valid");
//! assert_eq!(request.project_code, "ABCD-1234");
//! ```
//!
//! ## Concurrency
//!
//! Everything is designed for a single-threaded, event-driven caller: the
//! controller exclusively owns the draft, the only suspension points are
//! the two reference fetches and the submission call, and each async result
//! is epoch-tagged so a reset in between discards it.

pub mod base;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod history;
pub mod reference;
pub mod request;
pub mod validation;

pub use base::{CountryCode, CurrencyCode};
pub use controller::{FormController, SubmitOutcome};
pub use error::{FetchError, SubmitError, ValidationError};
pub use gateway::SubmissionGateway;
pub use history::SessionHistory;
pub use reference::{
    Country, CountryProvider, Currency, CurrencyProvider, FORCED_CURRENCY, ReferenceState,
};
pub use request::{Draft, Field, FinancingRequest};
pub use validation::{
    DateWindow, ValidationContext, ValidationErrors, end_date_window, validate_all,
    validate_cross_field, validate_field,
};
