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

//! Validation rule engine.
//!
//! Pure functions over a [`Draft`], reference data, and an explicit "today".
//! The engine never reads the system clock or any ambient state, so the
//! reactive per-keystroke checks and the submit-time gate run the exact same
//! rules and cannot drift.
//!
//! All date comparisons use calendar-date semantics ([`NaiveDate`]), never
//! time of day, to avoid timezone-boundary flakiness.
//!
//! # Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | requestor | length >= 2 |
//! | originCountry | known code in reference data |
//! | projectCode | `^[A-Z]{4}-[1-9]{4}$` |
//! | description | length <= 150 |
//! | amount | decimal > 0 |
//! | currency | known code; forced to USD for restricted countries |
//! | validityStartDate | strictly after today + 15 days |
//! | validityEndDate | strictly after start + 1 year, at most start + 3 years |

use crate::base::{CountryCode, CurrencyCode};
use crate::error::ValidationError;
use crate::reference::{Country, Currency, FORCED_CURRENCY, country_by_code};
use crate::request::{Draft, Field, FinancingRequest};
use chrono::{Days, Months, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// 4 uppercase ASCII letters, a hyphen, 4 digits each in 1-9.
static PROJECT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}-[1-9]{4}$").expect("static pattern compiles"));

/// Minimum lead time, in days, before the validity window may open.
pub const MIN_START_LEAD_DAYS: u64 = 15;
/// Minimum requestor name length, in characters.
pub const MIN_REQUESTOR_CHARS: usize = 2;
/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 150;

/// Validity period length bounds, in months.
const MIN_PERIOD_MONTHS: u32 = 12;
const MAX_PERIOD_MONTHS: u32 = 36;

/// Reference data and clock input for the rule engine.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub countries: &'a [Country],
    pub currencies: &'a [Currency],
    /// The calendar date to treat as "today". Always passed in explicitly.
    pub today: NaiveDate,
}

/// Field-keyed diagnostics produced by [`validate_all`].
///
/// Holds at most one message per field; field-level rules win over
/// cross-field rules for the same field. Iteration order is stable
/// (form order of [`Field`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    /// The user-facing message for a field, if it has a diagnostic.
    pub fn message(&self, field: Field) -> Option<String> {
        self.errors.get(&field).map(ToString::to_string)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }

    /// Records an error unless the field already carries one.
    fn insert_first(&mut self, field: Field, error: ValidationError) {
        self.errors.entry(field).or_insert(error);
    }
}

/// Inclusive end-date window derived from a chosen start date.
///
/// UI affordance only; the authoritative bounds live in
/// [`validate_cross_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// The `[start + 1 year, start + 3 years]` window offered for the end date.
pub fn end_date_window(start: NaiveDate) -> DateWindow {
    DateWindow {
        min: add_months_clamped(start, MIN_PERIOD_MONTHS),
        max: add_months_clamped(start, MAX_PERIOD_MONTHS),
    }
}

/// Validates a single field against its own constraint.
///
/// Cross-field rules (the date pair, the currency lock) are not applied
/// here; see [`validate_cross_field`].
pub fn validate_field(
    field: Field,
    draft: &Draft,
    ctx: &ValidationContext<'_>,
) -> Result<(), ValidationError> {
    let value = draft.get(field);
    match field {
        Field::Requestor => {
            if value.chars().count() < MIN_REQUESTOR_CHARS {
                return Err(ValidationError::RequestorTooShort);
            }
        }
        Field::OriginCountry => {
            if value.is_empty() {
                return Err(ValidationError::CountryRequired);
            }
            if country_by_code(ctx.countries, value).is_none() {
                return Err(ValidationError::UnknownCountry);
            }
        }
        Field::ProjectCode => {
            if !PROJECT_CODE.is_match(value) {
                return Err(ValidationError::ProjectCodeFormat);
            }
        }
        Field::Description => {
            if value.chars().count() > MAX_DESCRIPTION_CHARS {
                return Err(ValidationError::DescriptionTooLong);
            }
        }
        Field::Amount => match parse_amount(value) {
            None => return Err(ValidationError::AmountUnparsable),
            Some(amount) if amount <= Decimal::ZERO => {
                return Err(ValidationError::AmountNotPositive);
            }
            Some(_) => {}
        },
        Field::Currency => {
            // The lock overrides whatever the control held, so a locked
            // draft never fails on currency.
            if origin_is_restricted(draft, ctx) {
                return Ok(());
            }
            if value.is_empty() {
                return Err(ValidationError::CurrencyRequired);
            }
            if currency_by_code(ctx.currencies, value).is_none() {
                return Err(ValidationError::UnknownCurrency);
            }
        }
        Field::ValidityStartDate | Field::ValidityEndDate => {
            if parse_date(value).is_none() {
                return Err(ValidationError::DateUnparsable);
            }
        }
    }
    Ok(())
}

/// Evaluates the date-pair rules against an explicit "today".
///
/// Returned diagnostics land on the dependent field. When the start date is
/// absent or unparsable the end-date rules are skipped entirely: the end
/// date never errors solely because the start date is missing.
pub fn validate_cross_field(draft: &Draft, today: NaiveDate) -> Vec<(Field, ValidationError)> {
    let mut errors = Vec::new();
    let start = parse_date(draft.get(Field::ValidityStartDate));
    let end = parse_date(draft.get(Field::ValidityEndDate));

    if let Some(start) = start {
        // Strictly after today + 15 days.
        let earliest = today
            .checked_add_days(Days::new(MIN_START_LEAD_DAYS))
            .unwrap_or(NaiveDate::MAX);
        if start <= earliest {
            errors.push((Field::ValidityStartDate, ValidationError::StartDateTooSoon));
        }
    }

    if let (Some(start), Some(end)) = (start, end) {
        let window = end_date_window(start);
        if end <= window.min {
            errors.push((Field::ValidityEndDate, ValidationError::EndDateTooEarly));
        } else if end > window.max {
            // Exactly start + 3 years is still accepted.
            errors.push((Field::ValidityEndDate, ValidationError::EndDateTooLate));
        }
    }

    errors
}

/// The single submit-time entry point.
///
/// Runs every field rule plus the cross-field rules. On success produces the
/// typed snapshot with the restricted-country currency lock applied; on
/// failure returns the field-keyed diagnostics. Calling this twice on the
/// same inputs yields identical results.
pub fn validate_all(
    draft: &Draft,
    ctx: &ValidationContext<'_>,
) -> Result<FinancingRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for field in Field::ALL {
        if let Err(error) = validate_field(field, draft, ctx) {
            errors.insert_first(field, error);
        }
    }
    for (field, error) in validate_cross_field(draft, ctx.today) {
        errors.insert_first(field, error);
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let (Some(amount), Some(start), Some(end)) = (
        parse_amount(draft.get(Field::Amount)),
        parse_date(draft.get(Field::ValidityStartDate)),
        parse_date(draft.get(Field::ValidityEndDate)),
    ) else {
        // The field rules above guarantee these parse; degrade to a format
        // error rather than panicking if that ever stops holding.
        let mut errors = ValidationErrors::default();
        errors.insert_first(Field::ValidityStartDate, ValidationError::DateUnparsable);
        return Err(errors);
    };

    // Restricted origin forces the settlement currency regardless of what
    // the control held when the lock engaged.
    let currency = if origin_is_restricted(draft, ctx) {
        CurrencyCode::new(FORCED_CURRENCY)
    } else {
        CurrencyCode::new(draft.get(Field::Currency))
    };

    Ok(FinancingRequest {
        requestor: draft.get(Field::Requestor).to_owned(),
        origin_country: CountryCode::new(draft.get(Field::OriginCountry)),
        project_code: draft.get(Field::ProjectCode).to_owned(),
        description: draft.get(Field::Description).to_owned(),
        amount,
        currency,
        validity_start_date: start,
        validity_end_date: end,
    })
}

/// Parses an ISO `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn parse_amount(value: &str) -> Option<Decimal> {
    value.trim().parse().ok()
}

fn currency_by_code<'a>(currencies: &'a [Currency], code: &str) -> Option<&'a Currency> {
    currencies
        .iter()
        .find(|currency| currency.code.as_str().eq_ignore_ascii_case(code.trim()))
}

fn origin_is_restricted(draft: &Draft, ctx: &ValidationContext<'_>) -> bool {
    country_by_code(ctx.countries, draft.get(Field::OriginCountry))
        .is_some_and(|country| country.restricted_currency)
}

/// Year arithmetic via whole months so Feb 29 clamps to Feb 28 instead of
/// failing on non-leap targets.
fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::tests::{reference_countries, reference_currencies};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx<'a>(
        countries: &'a [Country],
        currencies: &'a [Currency],
        today: NaiveDate,
    ) -> ValidationContext<'a> {
        ValidationContext {
            countries,
            currencies,
            today,
        }
    }

    #[test]
    fn project_code_accepts_canonical_form() {
        let countries = reference_countries();
        let currencies = reference_currencies();
        let context = ctx(&countries, &currencies, date(2026, 9, 1));

        let mut draft = Draft::default();
        draft.set(Field::ProjectCode, "PROJ-1234");
        assert!(validate_field(Field::ProjectCode, &draft, &context).is_ok());
    }

    #[test]
    fn project_code_rejects_zero_digit() {
        let countries = reference_countries();
        let currencies = reference_currencies();
        let context = ctx(&countries, &currencies, date(2026, 9, 1));

        let mut draft = Draft::default();
        for bad in ["ABCD-1023", "abcd-1234", "ABC-1234", "ABCDE-1234", "ABCD_1234", "ABCD-12345"]
        {
            draft.set(Field::ProjectCode, bad);
            assert_eq!(
                validate_field(Field::ProjectCode, &draft, &context),
                Err(ValidationError::ProjectCodeFormat),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn end_date_boundaries_are_exclusive_then_inclusive() {
        let today = date(2026, 1, 1);
        let mut draft = Draft::default();
        draft.set(Field::ValidityStartDate, "2026-06-01");

        // Exactly start + 1 year: rejected.
        draft.set(Field::ValidityEndDate, "2027-06-01");
        assert_eq!(
            validate_cross_field(&draft, today),
            vec![(Field::ValidityEndDate, ValidationError::EndDateTooEarly)]
        );

        // One day past start + 1 year: accepted.
        draft.set(Field::ValidityEndDate, "2027-06-02");
        assert!(validate_cross_field(&draft, today).is_empty());

        // Exactly start + 3 years: accepted (inclusive upper bound).
        draft.set(Field::ValidityEndDate, "2029-06-01");
        assert!(validate_cross_field(&draft, today).is_empty());

        // One day past start + 3 years: rejected.
        draft.set(Field::ValidityEndDate, "2029-06-02");
        assert_eq!(
            validate_cross_field(&draft, today),
            vec![(Field::ValidityEndDate, ValidationError::EndDateTooLate)]
        );
    }

    #[test]
    fn start_date_boundary_is_exclusive() {
        let today = date(2026, 9, 1);
        let mut draft = Draft::default();

        // Exactly today + 15 days: rejected.
        draft.set(Field::ValidityStartDate, "2026-09-16");
        assert_eq!(
            validate_cross_field(&draft, today),
            vec![(Field::ValidityStartDate, ValidationError::StartDateTooSoon)]
        );

        // today + 16 days: accepted.
        draft.set(Field::ValidityStartDate, "2026-09-17");
        assert!(validate_cross_field(&draft, today).is_empty());
    }

    #[test]
    fn end_date_rules_skipped_without_start_date() {
        let today = date(2026, 9, 1);
        let mut draft = Draft::default();
        draft.set(Field::ValidityEndDate, "2027-01-01");

        // No start date at all.
        assert!(validate_cross_field(&draft, today).is_empty());

        // Unparsable start date behaves the same.
        draft.set(Field::ValidityStartDate, "not-a-date");
        assert!(validate_cross_field(&draft, today).is_empty());
    }

    #[test]
    fn leap_day_start_clamps_instead_of_failing() {
        let window = end_date_window(date(2028, 2, 29));
        assert_eq!(window.min, date(2029, 2, 28));
        assert_eq!(window.max, date(2031, 2, 28));
    }

    #[test]
    fn validate_all_forces_usd_for_restricted_origin() {
        let countries = reference_countries();
        let currencies = reference_currencies();
        let context = ctx(&countries, &currencies, date(2026, 9, 1));

        let mut draft = valid_draft();
        draft.set(Field::OriginCountry, "SA"); // Saudi Arabia, restricted
        draft.set(Field::Currency, "EUR");

        let request = validate_all(&draft, &context).unwrap();
        assert_eq!(request.currency.as_str(), "USD");
    }

    #[test]
    fn validate_all_collects_one_error_per_field() {
        let countries = reference_countries();
        let currencies = reference_currencies();
        let context = ctx(&countries, &currencies, date(2026, 9, 1));

        let draft = Draft::default();
        let errors = validate_all(&draft, &context).unwrap_err();

        assert_eq!(errors.get(Field::Requestor), Some(&ValidationError::RequestorTooShort));
        assert_eq!(errors.get(Field::OriginCountry), Some(&ValidationError::CountryRequired));
        assert_eq!(errors.get(Field::Amount), Some(&ValidationError::AmountUnparsable));
        assert_eq!(errors.get(Field::ValidityStartDate), Some(&ValidationError::DateUnparsable));
        // Empty description is fine.
        assert_eq!(errors.get(Field::Description), None);
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let countries = reference_countries();
        let currencies = reference_currencies();
        let context = ctx(&countries, &currencies, date(2026, 9, 1));

        let mut draft = valid_draft();
        draft.set(Field::OriginCountry, "ZZ");
        draft.set(Field::Currency, "XXX");

        let errors = validate_all(&draft, &context).unwrap_err();
        assert_eq!(errors.get(Field::OriginCountry), Some(&ValidationError::UnknownCountry));
        assert_eq!(errors.get(Field::Currency), Some(&ValidationError::UnknownCurrency));
    }

    #[test]
    fn amount_must_be_positive() {
        let countries = reference_countries();
        let currencies = reference_currencies();
        let context = ctx(&countries, &currencies, date(2026, 9, 1));

        let mut draft = valid_draft();
        for (value, expected) in [
            ("0", ValidationError::AmountNotPositive),
            ("-12.50", ValidationError::AmountNotPositive),
            ("twelve", ValidationError::AmountUnparsable),
        ] {
            draft.set(Field::Amount, value);
            assert_eq!(
                validate_field(Field::Amount, &draft, &context),
                Err(expected.clone()),
                "amount {value}"
            );
        }
    }

    /// A draft that passes every rule when today is 2026-09-01.
    fn valid_draft() -> Draft {
        let mut draft = Draft::default();
        draft.set(Field::Requestor, "Jane Doe");
        draft.set(Field::OriginCountry, "FR");
        draft.set(Field::ProjectCode, "ABCD-1234");
        draft.set(Field::Description, "Bridge works");
        draft.set(Field::Amount, "1500.00");
        draft.set(Field::Currency, "EUR");
        draft.set(Field::ValidityStartDate, "2026-09-20");
        draft.set(Field::ValidityEndDate, "2028-09-20");
        draft
    }
}
