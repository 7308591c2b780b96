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

//! Catalog entity types.
//!
//! These mirror the documents the catalog store holds: `services/{id}`,
//! `slots/{id}`, and `bookings/{id}`.

use crate::base::{BookingId, ServiceId, SlotId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An offered service.
///
/// Immutable for this crate's purposes; the catalog is provisioned and
/// managed externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub description: String,
    pub duration_minutes: u32,
}

/// A bookable time slot belonging to a service.
///
/// The `booked` flag transitions false -> true at most once over the slot's
/// lifetime, and only inside the reservation transaction. Cancellation does
/// not exist in this core, so the flag is never reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub service_id: ServiceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booked: bool,
}

impl Slot {
    /// Creates an open slot. Callers must supply `end_time > start_time`.
    pub fn open(
        service_id: ServiceId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        debug_assert!(
            end_time > start_time,
            "slot must end after it starts: {start_time} >= {end_time}"
        );
        Self {
            service_id,
            start_time,
            end_time,
            booked: false,
        }
    }
}

/// Status of a booking record.
///
/// `Confirmed` is the only status this engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

/// Immutable record of a successful reservation.
///
/// A booking's existence is the durable proof that a reservation succeeded;
/// exactly one exists per successfully booked slot. Start and end times are
/// a denormalized snapshot of the slot as read inside the winning
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub requester: String,
    pub service_id: ServiceId,
    pub slot_id: SlotId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}
