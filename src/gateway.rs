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

//! Submission gateway to the remote financing API.

use crate::error::SubmitError;
use crate::request::FinancingRequest;
use tracing::{info, warn};

/// Default remote API base URL.
pub const DEFAULT_BASE_URL: &str = "http://test-noema-api.azurewebsites.net";

const SUBMIT_PATH: &str = "/api/requests";

/// Sends validated requests to the remote service.
///
/// No retry: a failed submission leaves the caller's draft intact for a
/// manual resubmit. Exactly-once delivery is not guaranteed; a dropped
/// response after a successful send looks like a failure to the caller and
/// a manual retry may duplicate the request server-side.
#[derive(Debug, Clone)]
pub struct SubmissionGateway {
    client: reqwest::Client,
    base_url: String,
}

impl SubmissionGateway {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Points the gateway at a different base URL (tests, staging).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs the request as JSON. Any 2xx is success and the response body
    /// is discarded; a non-2xx carries the server's body text verbatim.
    pub async fn submit(&self, request: &FinancingRequest) -> Result<(), SubmitError> {
        let url = format!("{}{SUBMIT_PATH}", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if status.is_success() {
            info!(project_code = %request.project_code, "financing request accepted");
            return Ok(());
        }

        // The UI shows the server's own words; keep them untouched.
        let body = response.text().await.unwrap_or_default();
        warn!(%status, "financing request rejected");
        Err(SubmitError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl Default for SubmissionGateway {
    fn default() -> Self {
        Self::new()
    }
}
