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

//! Error types for reservation processing.

use thiserror::Error;

/// Reservation processing errors.
///
/// Four classes of failure: invalid caller input (`MissingFields`), a
/// dangling slot reference (`SlotNotFound`), a lost race against another
/// requester (`SlotAlreadyBooked` — the expected outcome of normal
/// contention, not an operational fault), and store-level failures
/// (`DuplicateBooking`, `StoreUnavailable`). None of these are retried by
/// the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// One or more required request fields are missing or empty
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Referenced slot does not exist
    #[error("slot not found")]
    SlotNotFound,

    /// Slot is already booked
    #[error("slot already booked")]
    SlotAlreadyBooked,

    /// Generated booking ID already exists in the store
    #[error("duplicate booking ID")]
    DuplicateBooking,

    /// Store unreachable or the transaction could not commit
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}
