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

//! Transactional reservation engine.
//!
//! The [`ReservationEngine`] is the component that grants slots to
//! requesters. It validates an inbound request, then books the slot inside
//! a single atomic store transaction: read the slot, check its `booked`
//! flag, flip the flag and append the booking record as one unit.
//!
//! # Reservation Protocol
//!
//! 1. Validate the request (fail fast; the store is never contacted for
//!    invalid input).
//! 2. Open one store transaction spanning exactly one slot read and two
//!    writes (flag flip + booking append).
//! 3. Inside the transaction body: absent slot aborts with
//!    [`BookingError::SlotNotFound`]; a set `booked` flag aborts with
//!    [`BookingError::SlotAlreadyBooked`]; otherwise the booking is built
//!    from the slot snapshot and committed.
//! 4. Return the new booking's id together with the slot id.
//!
//! # Thread Safety
//!
//! The engine holds no mutable state of its own and takes no locks.
//! Correctness under contention is delegated entirely to the store's
//! transaction isolation: among reservations racing for one slot, exactly
//! one commits and every other observes `booked == true` and is rejected.
//! Reservations for different slots proceed fully in parallel.

use crate::base::{BookingId, ServiceId, SlotId};
use crate::catalog::{Booking, BookingStatus, Slot};
use crate::error::BookingError;
use crate::store::CatalogStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Inbound reservation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// Name of the requester the booking is made for.
    pub name: String,
    /// Service the requester believes the slot belongs to.
    pub service_id: ServiceId,
    /// Slot to reserve.
    pub slot_id: SlotId,
}

impl ReservationRequest {
    /// Names of required fields that are missing or empty, in declaration
    /// order.
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.service_id.0.is_empty() {
            missing.push("service_id");
        }
        if self.slot_id.0.is_empty() {
            missing.push("slot_id");
        }
        missing
    }
}

/// Receipt returned to the caller on a successful reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub booking_id: BookingId,
    pub slot_id: SlotId,
}

/// Reservation engine over a catalog store.
///
/// # Invariants
///
/// - A slot's `booked` flag transitions false -> true at most once, only
///   inside [`ReservationEngine::reserve`].
/// - Exactly one booking record exists per successfully booked slot.
/// - A failed reservation leaves no observable state change.
pub struct ReservationEngine<S> {
    store: S,
}

impl<S: CatalogStore> ReservationEngine<S> {
    /// Creates an engine over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Shared access to the underlying store.
    ///
    /// Useful for the read-only projections that sit outside the
    /// reservation transaction, such as listing services.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reserves a slot for a named requester.
    ///
    /// # Outcomes
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Missing/empty `name`, `service_id`, or `slot_id` | `MissingFields`, store untouched |
    /// | Slot does not exist | `SlotNotFound` |
    /// | Slot already booked | `SlotAlreadyBooked` |
    /// | Slot open | booking committed, receipt returned |
    ///
    /// The conflict outcome is the expected result of losing a race and is
    /// never retried here; callers pick another slot. Store-level failures
    /// surface as [`BookingError::StoreUnavailable`] or
    /// [`BookingError::DuplicateBooking`] with nothing persisted.
    pub fn reserve(&self, request: &ReservationRequest) -> Result<BookingReceipt, BookingError> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(BookingError::MissingFields(missing));
        }

        // One read, two writes; everything else stays outside the
        // transaction so the contended section is as short as possible.
        let booking = self
            .store
            .transact_slot(&request.slot_id, &mut |snapshot: Option<&Slot>| {
                let slot = snapshot.ok_or(BookingError::SlotNotFound)?;
                if slot.booked {
                    return Err(BookingError::SlotAlreadyBooked);
                }
                Ok(build_booking(request, slot))
            })?;

        Ok(BookingReceipt {
            booking_id: booking.id,
            slot_id: request.slot_id.clone(),
        })
    }

    /// Lists open slots for a service.
    ///
    /// An unknown service yields an empty list. The listing is a plain
    /// consistent read: any slot it returns may be claimed before the
    /// caller acts on it, and correctness is enforced at booking time.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::MissingFields`] for an empty service id.
    pub fn available_slots(
        &self,
        service_id: &ServiceId,
    ) -> Result<Vec<(SlotId, Slot)>, BookingError> {
        if service_id.0.is_empty() {
            return Err(BookingError::MissingFields(vec!["service_id"]));
        }
        self.store.open_slots(service_id)
    }

    /// Looks up a booking record by id.
    pub fn booking(&self, booking_id: &BookingId) -> Result<Option<Booking>, BookingError> {
        self.store.booking(booking_id)
    }
}

/// Builds the booking a winning transaction commits, copying the start and
/// end times from the slot snapshot read inside it.
fn build_booking(request: &ReservationRequest, slot: &Slot) -> Booking {
    Booking {
        id: BookingId::generate(),
        requester: request.name.clone(),
        // The client-supplied service reference is recorded verbatim; it is
        // not cross-checked against the slot's own reference.
        service_id: request.service_id.clone(),
        slot_id: request.slot_id.clone(),
        start_time: slot.start_time,
        end_time: slot.end_time,
        status: BookingStatus::Confirmed,
        created_at: Utc::now(),
    }
}
