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

//! Property-based tests for the reservation engine.
//!
//! These tests verify invariants that should hold for any sequence of
//! reservation attempts: at most one booking per slot, conflict on every
//! attempt after the first, and faithful copying of slot times into the
//! booking record.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use slotbook_rs::{
    BookingError, MemoryStore, ReservationEngine, ReservationRequest, ServiceId, Slot, SlotId,
};
use std::collections::{HashMap, HashSet};

/// Number of slots seeded for sequence properties.
const SLOT_POOL: usize = 5;

fn instant(minutes_offset: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_750_000_000 + minutes_offset * 60, 0).unwrap()
}

fn engine_with_pool() -> ReservationEngine<MemoryStore> {
    let store = MemoryStore::new();
    for i in 0..SLOT_POOL {
        store.insert_slot(
            SlotId(format!("slot-{i}")),
            Slot::open(
                ServiceId("SV1".to_string()),
                instant(30 * i as i64),
                instant(30 * i as i64 + 30),
            ),
        );
    }
    ReservationEngine::new(store)
}

fn request(name: &str, slot: usize) -> ReservationRequest {
    ReservationRequest {
        name: name.to_string(),
        service_id: ServiceId("SV1".to_string()),
        slot_id: SlotId(format!("slot-{slot}")),
    }
}

/// Generate a reservation attempt: a slot index and a requester name.
fn arb_attempt() -> impl Strategy<Value = (usize, String)> {
    (0..SLOT_POOL, "[A-Za-z]{1,12}")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// For any attempt sequence, the first attempt per slot succeeds and
    /// every later attempt on that slot is a conflict.
    #[test]
    fn first_attempt_per_slot_wins(
        attempts in prop::collection::vec(arb_attempt(), 1..40),
    ) {
        let engine = engine_with_pool();
        let mut claimed: HashSet<usize> = HashSet::new();

        for (slot, name) in &attempts {
            let result = engine.reserve(&request(name, *slot));
            if claimed.insert(*slot) {
                prop_assert!(result.is_ok(), "first attempt on slot-{} must win", slot);
            } else {
                prop_assert_eq!(result, Err(BookingError::SlotAlreadyBooked));
            }
        }

        prop_assert_eq!(engine.store().booking_count(), claimed.len());
    }

    /// The booked flag and the booking records stay in one-to-one
    /// correspondence for any attempt sequence.
    #[test]
    fn flags_and_records_are_one_to_one(
        attempts in prop::collection::vec(arb_attempt(), 1..40),
    ) {
        let engine = engine_with_pool();
        for (slot, name) in &attempts {
            let _ = engine.reserve(&request(name, *slot));
        }

        let mut bookings_per_slot: HashMap<SlotId, usize> = HashMap::new();
        for booking in engine.store().drain_bookings() {
            *bookings_per_slot.entry(booking.slot_id.clone()).or_default() += 1;
        }

        for i in 0..SLOT_POOL {
            let slot_id = SlotId(format!("slot-{i}"));
            let booked = engine.store().slot(&slot_id).unwrap().booked;
            let records = bookings_per_slot.get(&slot_id).copied().unwrap_or(0);

            prop_assert!(records <= 1, "slot-{} has {} bookings", i, records);
            prop_assert_eq!(booked, records == 1);
        }
    }

    /// Booking start/end equal the slot's values at the successful read,
    /// for arbitrary slot times.
    #[test]
    fn booking_times_match_slot(
        offset in 0i64..1_000_000,
        duration in 1i64..240,
    ) {
        let start = instant(offset);
        let end = instant(offset + duration);

        let store = MemoryStore::new();
        store.insert_slot(
            SlotId("S1".to_string()),
            Slot::open(ServiceId("SV1".to_string()), start, end),
        );
        let engine = ReservationEngine::new(store);

        let receipt = engine
            .reserve(&ReservationRequest {
                name: "Alice".to_string(),
                service_id: ServiceId("SV1".to_string()),
                slot_id: SlotId("S1".to_string()),
            })
            .unwrap();

        let booking = engine.booking(&receipt.booking_id).unwrap().unwrap();
        prop_assert_eq!(booking.start_time, start);
        prop_assert_eq!(booking.end_time, end);
    }

    /// Once a slot is booked, any number of further attempts under any
    /// names all conflict, and the booking count never moves.
    #[test]
    fn rejection_is_idempotent(
        names in prop::collection::vec("[A-Za-z]{1,12}", 1..10),
    ) {
        let engine = engine_with_pool();
        engine.reserve(&request("Winner", 0)).unwrap();

        for name in &names {
            prop_assert_eq!(
                engine.reserve(&request(name, 0)),
                Err(BookingError::SlotAlreadyBooked)
            );
        }

        prop_assert_eq!(engine.store().booking_count(), 1);
    }
}
