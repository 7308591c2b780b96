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

//! In-memory catalog store.
//!
//! [`MemoryStore`] implements the [`CatalogStore`] contract with the
//! concurrency behavior the engine assumes from a document store: slot
//! transactions on the same key serialize against each other, transactions
//! on different keys proceed fully in parallel, and a commit applies both
//! writes or neither.
//!
//! # Thread Safety
//!
//! Documents live in [`DashMap`] shards. Each slot additionally sits behind
//! its own [`Mutex`]; that mutex is the serialization point for the slot's
//! reservation transactions.

use crate::base::{BookingId, ServiceId, SlotId};
use crate::booking_log::BookingLog;
use crate::catalog::{Booking, Service, Slot};
use crate::error::BookingError;
use crate::store::{CatalogStore, SlotTxBody};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// In-memory document store with atomic single-slot transactions.
#[derive(Debug)]
pub struct MemoryStore {
    /// Service documents indexed by service id.
    services: DashMap<ServiceId, Service>,
    /// Slot documents indexed by slot id, each behind its own lock.
    slots: DashMap<SlotId, Mutex<Slot>>,
    /// Booking records, append-only.
    bookings: BookingLog,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            slots: DashMap::new(),
            bookings: BookingLog::new(),
        }
    }

    /// Seeds a service document.
    ///
    /// Catalog provisioning happens outside the reservation core; this is
    /// the ingestion surface for it.
    pub fn insert_service(&self, service_id: ServiceId, service: Service) {
        self.services.insert(service_id, service);
    }

    /// Seeds a slot document.
    pub fn insert_slot(&self, slot_id: SlotId, slot: Slot) {
        self.slots.insert(slot_id, Mutex::new(slot));
    }

    /// Number of booking records committed so far.
    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }

    /// Reads a slot snapshot outside any transaction.
    pub fn slot(&self, slot_id: &SlotId) -> Option<Slot> {
        self.slots.get(slot_id).map(|cell| cell.lock().clone())
    }

    /// Drains committed bookings in creation order.
    ///
    /// One-shot export for when processing is complete; see
    /// [`BookingLog::drain_ordered`].
    pub fn drain_bookings(&self) -> Vec<Arc<Booking>> {
        self.bookings.drain_ordered()
    }
}

impl CatalogStore for MemoryStore {
    fn services(&self) -> Result<Vec<(ServiceId, Service)>, BookingError> {
        Ok(self
            .services
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect())
    }

    fn open_slots(&self, service_id: &ServiceId) -> Result<Vec<(SlotId, Slot)>, BookingError> {
        Ok(self
            .slots
            .iter()
            .filter_map(|entry| {
                let slot = entry.value().lock();
                (!slot.booked && slot.service_id == *service_id)
                    .then(|| (entry.key().clone(), slot.clone()))
            })
            .collect())
    }

    fn booking(&self, booking_id: &BookingId) -> Result<Option<Booking>, BookingError> {
        Ok(self.bookings.get(booking_id).map(|record| (*record).clone()))
    }

    fn transact_slot(
        &self,
        slot_id: &SlotId,
        body: SlotTxBody<'_>,
    ) -> Result<Booking, BookingError> {
        let Some(cell) = self.slots.get(slot_id) else {
            // The body decides how an absent key aborts; nothing can be
            // committed against it either way.
            return body(None).and(Err(BookingError::SlotNotFound));
        };

        // Racing transactions on this key serialize here, so exactly one
        // body observes booked == false.
        let mut slot = cell.lock();
        let booking = body(Some(&slot))?;

        // Commit. The append can only fail on an id collision, in which
        // case the flag stays untouched and nothing was written.
        self.bookings.push(booking.clone())?;
        slot.booked = true;
        Ok(booking)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
