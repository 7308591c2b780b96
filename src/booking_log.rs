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

//! Thread-safe append-only booking repository.
//!
//! Bookings are only ever created from inside a slot transaction commit;
//! this module provides the storage half of that: an insert guarded against
//! id reuse, id lookup, and creation-ordered export.

use crate::base::BookingId;
use crate::catalog::Booking;
use crate::error::BookingError;
use crossbeam::queue::SegQueue;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// An append-only booking log with duplicate-id detection.
///
/// Combines a [`DashMap`] for O(1) id lookup with a [`SegQueue`] that
/// preserves creation order. All operations are lock-free and safe for
/// concurrent access.
#[derive(Debug)]
pub struct BookingLog {
    /// Records indexed by booking id.
    records: DashMap<BookingId, Arc<Booking>>,

    /// Booking ids in creation order.
    order: SegQueue<BookingId>,
}

impl BookingLog {
    /// Creates a new empty booking log.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            order: SegQueue::new(),
        }
    }

    /// Appends a booking record.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::DuplicateBooking`] if a record with the same
    /// id already exists in the log.
    pub fn push(&self, booking: Booking) -> Result<(), BookingError> {
        let booking_id = booking.id.clone();

        // Entry API for atomic check-and-insert under concurrent pushes
        match self.records.entry(booking_id.clone()) {
            Entry::Occupied(_) => Err(BookingError::DuplicateBooking),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(booking));
                self.order.push(booking_id);
                Ok(())
            }
        }
    }

    /// Looks up a booking record by id.
    pub fn get(&self, booking_id: &BookingId) -> Option<Arc<Booking>> {
        self.records
            .get(booking_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Number of records in the log.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no bookings have been committed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drains the order queue, returning all bookings in creation order.
    ///
    /// Record lookup by id keeps working afterwards, but the ordering is
    /// consumed: this is a one-shot export for when processing is complete.
    pub fn drain_ordered(&self) -> Vec<Arc<Booking>> {
        let mut bookings = Vec::with_capacity(self.records.len());
        while let Some(id) = self.order.pop() {
            if let Some(entry) = self.records.get(&id) {
                bookings.push(Arc::clone(entry.value()));
            }
        }
        bookings
    }
}

impl Default for BookingLog {
    fn default() -> Self {
        Self::new()
    }
}
