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

use chrono::{DateTime, Utc};
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use serde::Deserialize;
use slotbook_rs::{
    MemoryStore, ReservationEngine, ReservationRequest, ServiceId, Slot, SlotId,
};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;

/// Slot Reservation Engine - Replay reservation requests against a slot catalog
///
/// Seeds slots from one CSV file, replays reservation requests from another,
/// and writes the resulting booking records to stdout as CSV.
#[derive(Parser, Debug)]
#[command(name = "slotbook-rs")]
#[command(about = "A reservation engine that replays booking request CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with slot documents
    ///
    /// Expected format: slot,service,start,end (RFC 3339 times)
    #[arg(long, value_name = "FILE")]
    slots: PathBuf,

    /// Path to CSV file with reservation requests
    ///
    /// Expected format: name,service,slot
    /// Example: cargo run -- --slots slots.csv requests.csv > bookings.csv
    #[arg(value_name = "FILE")]
    requests: PathBuf,
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    let slots_file = match File::open(&args.slots) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.slots.display(), e);
            process::exit(1);
        }
    };

    let requests_file = match File::open(&args.requests) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.requests.display(), e);
            process::exit(1);
        }
    };

    // Seed the catalog, then replay requests against it
    let store = MemoryStore::new();
    if let Err(e) = seed_slots(&store, BufReader::new(slots_file)) {
        eprintln!("Error reading slot catalog: {}", e);
        process::exit(1);
    }

    let engine = ReservationEngine::new(store);
    if let Err(e) = process_requests(&engine, BufReader::new(requests_file)) {
        eprintln!("Error processing requests: {}", e);
        process::exit(1);
    }

    // Write committed bookings to stdout
    if let Err(e) = write_bookings(&engine, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record for a slot document.
///
/// Fields: `slot, service, start, end`
#[derive(Debug, Deserialize)]
struct SlotRow {
    slot: String,
    service: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl SlotRow {
    /// Converts the row into a slot document keyed by its id.
    ///
    /// Returns `None` for rows with empty ids or a non-positive duration.
    fn into_slot(self) -> Option<(SlotId, Slot)> {
        if self.slot.is_empty() || self.service.is_empty() || self.end <= self.start {
            return None;
        }
        Some((
            SlotId(self.slot),
            Slot::open(ServiceId(self.service), self.start, self.end),
        ))
    }
}

/// Raw CSV record for a reservation request.
///
/// Fields: `name, service, slot`
#[derive(Debug, Deserialize)]
struct RequestRow {
    name: String,
    service: String,
    slot: String,
}

impl RequestRow {
    fn into_request(self) -> ReservationRequest {
        ReservationRequest {
            name: self.name,
            service_id: ServiceId(self.service),
            slot_id: SlotId(self.slot),
        }
    }
}

/// Seeds slot documents from a CSV reader.
///
/// Uses streaming parsing so arbitrarily large catalogs never load into
/// memory at once. Malformed rows are silently skipped.
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn seed_slots<R: Read>(store: &MemoryStore, reader: R) -> Result<usize, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    let mut seeded = 0usize;
    for result in rdr.deserialize::<SlotRow>() {
        match result {
            Ok(row) => {
                let Some((slot_id, slot)) = row.into_slot() else {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping invalid slot row");
                    continue;
                };
                store.insert_slot(slot_id, slot);
                seeded += 1;
            }
            Err(e) => {
                // Skip malformed rows
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed slot row: {}", e);
                continue;
            }
        }
    }

    Ok(seeded)
}

/// Replays reservation requests from a CSV reader, in file order.
///
/// Rejected requests (validation failures, unknown slots, lost races) are
/// skipped without stopping the replay; each slot still ends up with at
/// most one booking.
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn process_requests<R: Read>(
    engine: &ReservationEngine<MemoryStore>,
    reader: R,
) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<RequestRow>() {
        match result {
            Ok(row) => {
                let request = row.into_request();
                if let Err(_e) = engine.reserve(&request) {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping request for slot {}: {}", request.slot_id, _e);
                }
            }
            Err(e) => {
                // Skip malformed rows
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed request row: {}", e);
                continue;
            }
        }
    }

    Ok(())
}

/// Writes committed bookings to a CSV writer, in creation order.
///
/// # CSV Format
///
/// Columns: `id, requester, service_id, slot_id, start_time, end_time,
/// status, created_at`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_bookings<W: Write>(
    engine: &ReservationEngine<MemoryStore>,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for booking in engine.store().drain_bookings() {
        wtr.serialize(&*booking)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotbook_rs::CatalogStore;
    use std::io::Cursor;

    const SLOTS_CSV: &str = "slot,service,start,end\n\
        S1,SV1,2025-06-02T10:00:00Z,2025-06-02T10:30:00Z\n\
        S2,SV1,2025-06-02T11:00:00Z,2025-06-02T11:30:00Z\n";

    fn seeded_engine() -> ReservationEngine<MemoryStore> {
        let store = MemoryStore::new();
        seed_slots(&store, Cursor::new(SLOTS_CSV)).unwrap();
        ReservationEngine::new(store)
    }

    #[test]
    fn seed_parses_slot_rows() {
        let store = MemoryStore::new();
        let seeded = seed_slots(&store, Cursor::new(SLOTS_CSV)).unwrap();

        assert_eq!(seeded, 2);
        let open = store.open_slots(&ServiceId("SV1".to_string())).unwrap();
        assert_eq!(open.len(), 2);
    }

    #[test]
    fn seed_skips_inverted_and_malformed_rows() {
        let csv = "slot,service,start,end\n\
            S1,SV1,2025-06-02T10:30:00Z,2025-06-02T10:00:00Z\n\
            not,a,valid,row\n\
            S2,SV1,2025-06-02T11:00:00Z,2025-06-02T11:30:00Z\n";

        let store = MemoryStore::new();
        let seeded = seed_slots(&store, Cursor::new(csv)).unwrap();

        assert_eq!(seeded, 1);
    }

    #[test]
    fn replay_books_first_request_per_slot() {
        let engine = seeded_engine();
        let requests = "name,service,slot\n\
            Alice,SV1,S1\n\
            Bob,SV1,S1\n\
            Carol,SV1,S2\n";

        process_requests(&engine, Cursor::new(requests)).unwrap();

        assert_eq!(engine.store().booking_count(), 2);
        let open = engine.available_slots(&ServiceId("SV1".to_string())).unwrap();
        assert!(open.is_empty());
    }

    #[test]
    fn replay_skips_invalid_requests() {
        let engine = seeded_engine();
        let requests = "name,service,slot\n\
            ,SV1,S1\n\
            Alice,SV1,no-such-slot\n\
            Bob,SV1,S1\n";

        process_requests(&engine, Cursor::new(requests)).unwrap();

        // Only Bob's request is bookable
        assert_eq!(engine.store().booking_count(), 1);
    }

    #[test]
    fn replay_handles_whitespace() {
        let engine = seeded_engine();
        let requests = "name,service,slot\n Alice , SV1 , S1 \n";

        process_requests(&engine, Cursor::new(requests)).unwrap();

        assert_eq!(engine.store().booking_count(), 1);
    }

    #[test]
    fn output_contains_header_and_booking() {
        let engine = seeded_engine();
        let requests = "name,service,slot\nAlice,SV1,S1\n";
        process_requests(&engine, Cursor::new(requests)).unwrap();

        let mut output = Vec::new();
        write_bookings(&engine, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str
            .contains("id,requester,service_id,slot_id,start_time,end_time,status,created_at"));
        assert!(output_str.contains("Alice"));
        assert!(output_str.contains("confirmed"));
    }

    #[test]
    fn output_preserves_replay_order() {
        let engine = seeded_engine();
        let requests = "name,service,slot\n\
            Carol,SV1,S2\n\
            Alice,SV1,S1\n";
        process_requests(&engine, Cursor::new(requests)).unwrap();

        let bookings = engine.store().drain_bookings();
        let requesters: Vec<_> = bookings.iter().map(|b| b.requester.clone()).collect();
        assert_eq!(requesters, vec!["Carol", "Alice"]);
    }
}
