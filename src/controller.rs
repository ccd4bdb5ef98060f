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

//! Form state controller.
//!
//! Single source of truth for the in-progress draft. Two pieces of UI-only
//! state are derived synchronously whenever their trigger field changes: the
//! allowed end-date window (from the start date) and the currency lock flag
//! (from the origin country). The derivations are conveniences for the UI;
//! the authoritative check is always [`validate_all`] at submit time.
//!
//! Every asynchronous operation is tagged with the controller's epoch and
//! its result is discarded if [`FormController::reset`] ran meanwhile, so a
//! late-arriving response is never applied to stale state.

use crate::error::{FetchError, SubmitError};
use crate::gateway::SubmissionGateway;
use crate::history::SessionHistory;
use crate::reference::{
    Country, CountryProvider, Currency, CurrencyProvider, FORCED_CURRENCY, ReferenceState,
    country_by_code,
};
use crate::request::{Draft, Field, FinancingRequest};
use crate::validation::{
    DateWindow, ValidationContext, ValidationErrors, end_date_window, parse_date, validate_all,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; field errors were recorded, nothing was sent.
    Rejected(ValidationErrors),
    /// The gateway accepted the request; history grew and the draft reset.
    Accepted,
    /// The gateway call failed; the draft is intact for a manual retry.
    Failed(String),
    /// A reset happened while the call was in flight; the response was
    /// discarded and nothing was applied.
    Stale,
}

/// Owns the draft and drives validation, submission, and reset.
pub struct FormController {
    draft: Draft,
    errors: ValidationErrors,
    submission_error: Option<String>,
    date_window: Option<DateWindow>,
    currency_locked: bool,
    countries: ReferenceState<Country>,
    currencies: ReferenceState<Currency>,
    /// Bumped by [`reset`](Self::reset); async results from an older epoch
    /// are discarded.
    epoch: u64,
    gateway: SubmissionGateway,
    history: Arc<SessionHistory>,
}

impl FormController {
    pub fn new(gateway: SubmissionGateway, history: Arc<SessionHistory>) -> Self {
        Self {
            draft: Draft::default(),
            errors: ValidationErrors::default(),
            submission_error: None,
            date_window: None,
            currency_locked: false,
            countries: ReferenceState::Loading,
            currencies: ReferenceState::Loading,
            epoch: 0,
            gateway,
            history,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Field-keyed diagnostics from the last submit attempt.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Page-level message from the last failed submission.
    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    /// The allowed end-date window, present once a start date parses.
    pub fn date_window(&self) -> Option<DateWindow> {
        self.date_window
    }

    /// The end-date input stays disabled until a start date is chosen.
    pub fn end_date_enabled(&self) -> bool {
        self.date_window.is_some()
    }

    /// True while the origin country forces the settlement currency.
    pub fn currency_locked(&self) -> bool {
        self.currency_locked
    }

    pub fn countries(&self) -> &ReferenceState<Country> {
        &self.countries
    }

    pub fn currencies(&self) -> &ReferenceState<Currency> {
        &self.currencies
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Records one field edit and recomputes the derived state whose
    /// trigger changed. Edits to a locked currency field are ignored.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if field == Field::Currency && self.currency_locked {
            debug!("ignoring currency edit while the lock is engaged");
            return;
        }
        self.draft.set(field, value.into());
        match field {
            Field::ValidityStartDate => self.recompute_date_window(),
            Field::OriginCountry => self.recompute_currency_lock(),
            _ => {}
        }
    }

    /// Drives the country provider and applies the result unless a reset
    /// intervened.
    pub async fn load_countries(&mut self, provider: &CountryProvider) {
        let epoch = self.epoch;
        let result = provider.load().await;
        self.apply_countries(epoch, result);
    }

    /// Drives the currency provider and applies the result unless a reset
    /// intervened.
    pub async fn load_currencies(&mut self, provider: &CurrencyProvider) {
        let epoch = self.epoch;
        let result = provider.load().await;
        self.apply_currencies(epoch, result);
    }

    /// Validates the draft and, if it holds, submits it.
    ///
    /// Runs [`validate_all`] against the given "today" without trusting any
    /// previously derived UI state. Only a 2xx from the gateway appends to
    /// history and resets the draft; a gateway failure keeps the draft so
    /// the user can retry.
    pub async fn submit(&mut self, today: NaiveDate) -> SubmitOutcome {
        self.submission_error = None;

        let validated = {
            let ctx = ValidationContext {
                countries: self.countries.ready().unwrap_or(&[]),
                currencies: self.currencies.ready().unwrap_or(&[]),
                today,
            };
            validate_all(&self.draft, &ctx)
        };
        let request = match validated {
            Ok(request) => request,
            Err(errors) => {
                debug!(count = errors.len(), "draft rejected by validation");
                self.errors = errors.clone();
                return SubmitOutcome::Rejected(errors);
            }
        };
        self.errors = ValidationErrors::default();

        let epoch = self.epoch;
        let result = self.gateway.submit(&request).await;
        self.apply_submission(epoch, request, result)
    }

    /// Clears the draft, diagnostics, and derived state unconditionally,
    /// and invalidates any in-flight async work.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.draft = Draft::default();
        self.errors = ValidationErrors::default();
        self.submission_error = None;
        self.date_window = None;
        self.currency_locked = false;
    }

    fn recompute_date_window(&mut self) {
        self.date_window =
            parse_date(self.draft.get(Field::ValidityStartDate)).map(end_date_window);
    }

    fn recompute_currency_lock(&mut self) {
        let locked = self
            .countries
            .ready()
            .and_then(|countries| country_by_code(countries, self.draft.get(Field::OriginCountry)))
            .is_some_and(|country| country.restricted_currency);

        self.currency_locked = locked;
        if locked {
            self.draft.set(Field::Currency, FORCED_CURRENCY);
        }
    }

    fn apply_countries(&mut self, epoch: u64, result: Result<Arc<Vec<Country>>, FetchError>) {
        if epoch != self.epoch {
            debug!("discarding stale country load");
            return;
        }
        self.countries = match result {
            Ok(countries) => ReferenceState::Ready(countries),
            Err(error) => ReferenceState::Failed(error.to_string()),
        };
        // A restricted country may already be selected when the data lands.
        self.recompute_currency_lock();
    }

    fn apply_currencies(&mut self, epoch: u64, result: Result<Arc<Vec<Currency>>, FetchError>) {
        if epoch != self.epoch {
            debug!("discarding stale currency load");
            return;
        }
        self.currencies = match result {
            Ok(currencies) => ReferenceState::Ready(currencies),
            Err(error) => ReferenceState::Failed(error.to_string()),
        };
    }

    fn apply_submission(
        &mut self,
        epoch: u64,
        request: FinancingRequest,
        result: Result<(), SubmitError>,
    ) -> SubmitOutcome {
        if epoch != self.epoch {
            debug!("discarding stale submission response");
            return SubmitOutcome::Stale;
        }
        match result {
            Ok(()) => {
                self.history.append(request);
                self.draft = Draft::default();
                self.date_window = None;
                self.currency_locked = false;
                info!("financing request recorded in session history");
                SubmitOutcome::Accepted
            }
            Err(error) => {
                let message = error.to_string();
                self.submission_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }
}
