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

//! Session-scoped history of successful submissions.

use crate::request::FinancingRequest;
use parking_lot::Mutex;

/// Append-only, in-memory log of successfully submitted requests.
///
/// Entries are immutable snapshots kept in submission order, alive only for
/// the current session. Created at session start and shared by `Arc` into
/// whoever needs it; never an ambient global. No persistence, no
/// deduplication.
#[derive(Debug, Default)]
pub struct SessionHistory {
    entries: Mutex<Vec<FinancingRequest>>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successful submission.
    pub fn append(&self, request: FinancingRequest) {
        self.entries.lock().push(request);
    }

    /// Drops every entry (explicit user action).
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Cloned entries in append order.
    pub fn snapshot(&self) -> Vec<FinancingRequest> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
