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

//! Catalog store contract.
//!
//! The engine does not know how documents are persisted. It requires the
//! small contract below from its store: point reads, a filtered scan of
//! open slots, and an atomic read-check-mutate transaction over a single
//! slot key.

use crate::base::{BookingId, ServiceId, SlotId};
use crate::catalog::{Booking, Service, Slot};
use crate::error::BookingError;

/// Transaction body passed to [`CatalogStore::transact_slot`].
///
/// Receives the slot snapshot read inside the transaction (`None` when the
/// key is absent) and returns either the booking to commit or a typed
/// rejection that aborts the transaction.
pub type SlotTxBody<'a> = &'a mut dyn FnMut(Option<&Slot>) -> Result<Booking, BookingError>;

/// Contract the reservation engine requires from the document store.
///
/// One store instance is shared process-wide; implementations must be safe
/// for concurrent use by many in-flight requests.
pub trait CatalogStore: Send + Sync {
    /// Lists every service snapshot together with its identifier.
    fn services(&self) -> Result<Vec<(ServiceId, Service)>, BookingError>;

    /// Scans slots filtered by service reference and `booked == false`.
    ///
    /// An unknown service yields an empty list, not an error. The result is
    /// a plain consistent read and carries no booking guarantee: a slot
    /// returned here may be claimed by another requester before the caller
    /// acts on it.
    fn open_slots(&self, service_id: &ServiceId) -> Result<Vec<(SlotId, Slot)>, BookingError>;

    /// Point-reads a booking record by id.
    fn booking(&self, booking_id: &BookingId) -> Result<Option<Booking>, BookingError>;

    /// Runs `body` against the slot under the store's isolation and commits
    /// its outcome atomically.
    ///
    /// On `Ok(booking)` the store flips the slot's `booked` flag and
    /// appends the booking as one unit: either both writes apply or
    /// neither. On `Err` nothing is written and the error is returned
    /// unchanged. Transactions touching the same slot key serialize
    /// against each other, so among racing reservations exactly one body
    /// observes `booked == false`.
    ///
    /// Booking creation has no other write path: a booking can only come
    /// into existence through a committed slot transaction, which rules out
    /// orphaned bookings whose slot was never flipped.
    fn transact_slot(
        &self,
        slot_id: &SlotId,
        body: SlotTxBody<'_>,
    ) -> Result<Booking, BookingError>;
}
