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

//! Reference data: countries and currencies.
//!
//! Two independent read-only lookup tables, each fetched once per session
//! from a public registry and cached. A failed fetch degrades the matching
//! form control to a disabled state without blocking the rest of the form.
//! Once fetched, the data is immutable for the session.

use crate::base::{CountryCode, CurrencyCode};
use crate::error::FetchError;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Countries whose financing requests must settle in [`FORCED_CURRENCY`].
///
/// Membership is an exact string match against the registry's common
/// display name.
pub const OPEC_COUNTRIES: [&str; 13] = [
    "Algeria",
    "Angola",
    "Congo",
    "Equatorial Guinea",
    "Gabon",
    "Iran",
    "Iraq",
    "Kuwait",
    "Libya",
    "Nigeria",
    "Saudi Arabia",
    "United Arab Emirates",
    "Venezuela",
];

/// Settlement currency forced for restricted-currency countries.
pub const FORCED_CURRENCY: &str = "USD";

/// Default country registry endpoint.
pub const COUNTRY_ENDPOINT: &str = "https://restcountries.com/v3.1/all";

/// Default currency registry endpoint.
pub const CURRENCY_ENDPOINT: &str = "https://openexchangerates.org/api/currencies.json";

/// One selectable origin country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    pub code: CountryCode,
    /// True when the country is on the [`OPEC_COUNTRIES`] list.
    pub restricted_currency: bool,
}

/// One selectable payment currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: CurrencyCode,
    /// `"{code} - {name}"`, as shown in the currency select.
    pub display_name: String,
}

/// Looks up a country by code, case-insensitively.
pub fn country_by_code<'a>(countries: &'a [Country], code: &str) -> Option<&'a Country> {
    countries
        .iter()
        .find(|country| country.code.as_str().eq_ignore_ascii_case(code.trim()))
}

/// Lifecycle of one reference lookup as seen by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReferenceState<T> {
    /// Fetch not finished yet; the matching control is disabled.
    #[default]
    Loading,
    /// Data is cached for the rest of the session.
    Ready(Arc<Vec<T>>),
    /// Fetch failed; the control stays disabled, everything else works.
    Failed(String),
}

impl<T> ReferenceState<T> {
    /// The loaded records, or `None` while loading/failed.
    pub fn ready(&self) -> Option<&[T]> {
        match self {
            Self::Ready(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Raw country record as returned by the registry. Only the common display
/// name and the two-letter code are consumed.
#[derive(Debug, Deserialize)]
struct RawCountry {
    #[serde(default)]
    name: Option<RawCountryName>,
    #[serde(default)]
    cca2: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCountryName {
    #[serde(default)]
    common: Option<String>,
}

/// Fetches and caches the country lookup table.
#[derive(Debug)]
pub struct CountryProvider {
    client: reqwest::Client,
    endpoint: String,
    cache: Mutex<Option<Arc<Vec<Country>>>>,
}

impl CountryProvider {
    pub fn new() -> Self {
        Self::with_endpoint(COUNTRY_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            cache: Mutex::new(None),
        }
    }

    /// Returns the session cache, fetching on first use.
    pub async fn load(&self) -> Result<Arc<Vec<Country>>, FetchError> {
        if let Some(cached) = self.cache.lock().clone() {
            return Ok(cached);
        }
        let countries = Arc::new(self.fetch().await?);
        *self.cache.lock() = Some(Arc::clone(&countries));
        Ok(countries)
    }

    /// Fetches the registry and applies the client-side transform: keep
    /// name + code, derive the restricted flag, sort ascending by name.
    pub async fn fetch(&self) -> Result<Vec<Country>, FetchError> {
        let raw: Vec<RawCountry> = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut countries: Vec<Country> = raw
            .into_iter()
            .filter_map(|record| {
                let name = record.name.and_then(|n| n.common)?;
                let code = record.cca2?;
                if name.is_empty() || code.is_empty() {
                    return None;
                }
                let restricted_currency = OPEC_COUNTRIES.contains(&name.as_str());
                Some(Country {
                    name,
                    code: CountryCode::new(code),
                    restricted_currency,
                })
            })
            .collect();
        countries.sort_by_key(|country| country.name.to_lowercase());

        if countries.is_empty() {
            warn!(endpoint = %self.endpoint, "country registry returned no usable records");
            return Err(FetchError::EmptyPayload);
        }
        debug!(count = countries.len(), "loaded country reference data");
        Ok(countries)
    }
}

impl Default for CountryProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches and caches the currency lookup table.
#[derive(Debug)]
pub struct CurrencyProvider {
    client: reqwest::Client,
    endpoint: String,
    cache: Mutex<Option<Arc<Vec<Currency>>>>,
}

impl CurrencyProvider {
    pub fn new() -> Self {
        Self::with_endpoint(CURRENCY_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            cache: Mutex::new(None),
        }
    }

    /// Returns the session cache, fetching on first use.
    pub async fn load(&self) -> Result<Arc<Vec<Currency>>, FetchError> {
        if let Some(cached) = self.cache.lock().clone() {
            return Ok(cached);
        }
        let currencies = Arc::new(self.fetch().await?);
        *self.cache.lock() = Some(Arc::clone(&currencies));
        Ok(currencies)
    }

    /// Fetches the `code -> name` registry mapping. `BTreeMap` gives a
    /// stable code-sorted order for the select.
    pub async fn fetch(&self) -> Result<Vec<Currency>, FetchError> {
        let raw: BTreeMap<String, String> = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let currencies: Vec<Currency> = raw
            .into_iter()
            .map(|(code, name)| Currency {
                display_name: format!("{code} - {name}"),
                code: CurrencyCode::new(code),
            })
            .collect();

        if currencies.is_empty() {
            warn!(endpoint = %self.endpoint, "currency registry returned no usable records");
            return Err(FetchError::EmptyPayload);
        }
        debug!(count = currencies.len(), "loaded currency reference data");
        Ok(currencies)
    }
}

impl Default for CurrencyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Small country table shared by unit tests across the crate.
    pub(crate) fn reference_countries() -> Vec<Country> {
        let mut countries: Vec<Country> = [
            ("France", "FR"),
            ("Germany", "DE"),
            ("Nigeria", "NG"),
            ("Saudi Arabia", "SA"),
            ("Venezuela", "VE"),
        ]
        .into_iter()
        .map(|(name, code)| Country {
            name: name.to_owned(),
            code: CountryCode::new(code),
            restricted_currency: OPEC_COUNTRIES.contains(&name),
        })
        .collect();
        countries.sort_by_key(|country| country.name.to_lowercase());
        countries
    }

    /// Small currency table shared by unit tests across the crate.
    pub(crate) fn reference_currencies() -> Vec<Currency> {
        [("EUR", "Euro"), ("GBP", "British Pound Sterling"), ("USD", "United States Dollar")]
            .into_iter()
            .map(|(code, name)| Currency {
                code: CurrencyCode::new(code),
                display_name: format!("{code} - {name}"),
            })
            .collect()
    }

    #[test]
    fn restricted_flag_tracks_opec_membership() {
        let countries = reference_countries();
        assert!(country_by_code(&countries, "SA").unwrap().restricted_currency);
        assert!(country_by_code(&countries, "NG").unwrap().restricted_currency);
        assert!(!country_by_code(&countries, "FR").unwrap().restricted_currency);
    }

    #[test]
    fn country_lookup_is_case_insensitive() {
        let countries = reference_countries();
        assert!(country_by_code(&countries, "fr").is_some());
        assert!(country_by_code(&countries, " de ").is_some());
        assert!(country_by_code(&countries, "ZZ").is_none());
    }

    #[test]
    fn raw_country_tolerates_missing_fields() {
        let raw: RawCountry = serde_json::from_str("{}").unwrap();
        assert!(raw.name.is_none());
        assert!(raw.cca2.is_none());

        let raw: RawCountry =
            serde_json::from_str(r#"{"name":{"common":"France"},"cca2":"FR"}"#).unwrap();
        assert_eq!(raw.name.unwrap().common.as_deref(), Some("France"));
        assert_eq!(raw.cca2.as_deref(), Some("FR"));
    }

    #[test]
    fn reference_state_defaults_to_loading() {
        let state: ReferenceState<Country> = ReferenceState::default();
        assert!(state.is_loading());
        assert!(state.ready().is_none());
    }

    #[test]
    fn opec_list_matches_source_of_truth() {
        assert_eq!(OPEC_COUNTRIES.len(), 13);
        assert!(OPEC_COUNTRIES.contains(&"Equatorial Guinea"));
        assert!(OPEC_COUNTRIES.contains(&"United Arab Emirates"));
    }
}
