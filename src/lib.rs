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

//! # Slotbook
//!
//! This library provides a slot reservation engine: clients browse offered
//! services, list open time slots, and reserve a slot for a named
//! requester. Many requesters may race for the same slot; the engine
//! guarantees each slot is granted to at most one of them, with no lost
//! updates and no double bookings.
//!
//! ## Core Components
//!
//! - [`ReservationEngine`]: Transactional core that validates and books slots
//! - [`CatalogStore`]: Contract the engine requires from its document store
//! - [`MemoryStore`]: In-memory store with per-slot transaction isolation
//! - [`BookingError`]: Error types for reservation failures
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use slotbook_rs::{
//!     MemoryStore, ReservationEngine, ReservationRequest, ServiceId, Slot, SlotId,
//! };
//!
//! let store = MemoryStore::new();
//! store.insert_slot(
//!     SlotId("haircut-1000".into()),
//!     Slot::open(
//!         ServiceId("haircut".into()),
//!         Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap(),
//!         Utc.with_ymd_and_hms(2025, 6, 2, 10, 30, 0).unwrap(),
//!     ),
//! );
//!
//! let engine = ReservationEngine::new(store);
//! let receipt = engine
//!     .reserve(&ReservationRequest {
//!         name: "Alice".into(),
//!         service_id: ServiceId("haircut".into()),
//!         slot_id: SlotId("haircut-1000".into()),
//!     })
//!     .unwrap();
//!
//! assert_eq!(receipt.slot_id, SlotId("haircut-1000".into()));
//! ```
//!
//! ## Thread Safety
//!
//! The engine holds no shared mutable state and performs no locking of its
//! own. Reservations for different slots run fully in parallel; racing
//! reservations for the same slot serialize inside the store transaction,
//! where exactly one commits and the rest are rejected.

mod base;
mod booking_log;
pub mod catalog;
mod engine;
pub mod error;
mod memory;
mod store;

pub use base::{BookingId, ServiceId, SlotId};
pub use booking_log::BookingLog;
pub use catalog::{Booking, BookingStatus, Service, Slot};
pub use engine::{BookingReceipt, ReservationEngine, ReservationRequest};
pub use error::BookingError;
pub use memory::MemoryStore;
pub use store::{CatalogStore, SlotTxBody};
