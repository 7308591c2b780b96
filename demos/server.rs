//! Simple REST API server example for the reservation engine.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `GET /` - Health check
//! - `GET /services` - List offered services
//! - `GET /slots/{service_id}` - List open slots for a service
//! - `POST /book` - Reserve a slot for a named requester
//! - `GET /bookings/{id}` - Get a booking record by id
//!
//! ## Example Usage
//!
//! ```bash
//! # Browse the catalog
//! curl http://localhost:3000/services
//! curl http://localhost:3000/slots/haircut
//!
//! # Reserve a slot
//! curl -X POST http://localhost:3000/book \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Alice", "service_id": "haircut", "slot_id": "haircut-0"}'
//!
//! # Fetch the booking record
//! curl http://localhost:3000/bookings/<booking_id>
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use slotbook_rs::{
    BookingError, BookingId, CatalogStore, MemoryStore, ReservationEngine, ReservationRequest,
    Service, ServiceId, Slot, SlotId,
};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Response DTOs ===

/// Response body for the health check.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Response body for a service snapshot.
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub service_id: String,
    pub name: String,
    pub description: String,
    pub duration_minutes: u32,
}

/// Response body for an open slot snapshot.
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub slot_id: String,
    pub service_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Response body for a successful reservation.
#[derive(Debug, Serialize)]
pub struct BookingCreatedResponse {
    pub message: String,
    pub booking_id: String,
    pub slot_id: String,
}

/// Response body for a booking record.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking_id: String,
    pub requester: String,
    pub service_id: String,
    pub slot_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the reservation engine.
///
/// The engine (and the store inside it) is created once at startup and
/// shared by every in-flight request.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReservationEngine<MemoryStore>>,
}

// === Error Handling ===

/// Wrapper for converting `BookingError` into HTTP responses.
pub struct AppError(BookingError);

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            BookingError::MissingFields(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELDS"),
            BookingError::SlotNotFound => (StatusCode::NOT_FOUND, "SLOT_NOT_FOUND"),
            BookingError::SlotAlreadyBooked => (StatusCode::CONFLICT, "SLOT_ALREADY_BOOKED"),
            BookingError::DuplicateBooking => (StatusCode::CONFLICT, "DUPLICATE_BOOKING"),
            BookingError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// GET / - Health check.
async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Backend is running".to_string(),
    })
}

/// GET /services - List all offered services.
async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let services = state
        .engine
        .store()
        .services()?
        .into_iter()
        .map(|(service_id, service)| ServiceResponse {
            service_id: service_id.0,
            name: service.name,
            description: service.description,
            duration_minutes: service.duration_minutes,
        })
        .collect();

    Ok(Json(services))
}

/// GET /slots/{service_id} - List open slots for a service.
async fn list_slots(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    let slots = state
        .engine
        .available_slots(&ServiceId(service_id))?
        .into_iter()
        .map(|(slot_id, slot)| SlotResponse {
            slot_id: slot_id.0,
            service_id: slot.service_id.0,
            start_time: slot.start_time,
            end_time: slot.end_time,
        })
        .collect();

    Ok(Json(slots))
}

/// POST /book - Reserve a slot.
async fn book_slot(
    State(state): State<AppState>,
    Json(request): Json<ReservationRequest>,
) -> Result<Json<BookingCreatedResponse>, AppError> {
    let receipt = state.engine.reserve(&request)?;
    Ok(Json(BookingCreatedResponse {
        message: "Booking successful".to_string(),
        booking_id: receipt.booking_id.0,
        slot_id: receipt.slot_id.0,
    }))
}

/// GET /bookings/{id} - Get a booking record by id.
async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, (StatusCode, Json<ErrorResponse>)> {
    let booking_id = BookingId(id);

    state
        .engine
        .booking(&booking_id)
        .ok()
        .flatten()
        .map(|booking| {
            Json(BookingResponse {
                booking_id: booking.id.0,
                requester: booking.requester,
                service_id: booking.service_id.0,
                slot_id: booking.slot_id.0,
                start_time: booking.start_time,
                end_time: booking.end_time,
                status: "confirmed".to_string(),
                created_at: booking.created_at,
            })
        })
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Booking not found".to_string(),
                    code: "BOOKING_NOT_FOUND".to_string(),
                }),
            )
        })
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/services", get(list_services))
        .route("/slots/{service_id}", get(list_slots))
        .route("/book", post(book_slot))
        .route("/bookings/{id}", get(get_booking))
        .with_state(state)
}

// === Demo Catalog ===

/// Seeds a small catalog so the endpoints have something to serve.
fn seed_demo_catalog(store: &MemoryStore) {
    store.insert_service(
        ServiceId("haircut".to_string()),
        Service {
            name: "Haircut".to_string(),
            description: "30 minute haircut".to_string(),
            duration_minutes: 30,
        },
    );
    store.insert_service(
        ServiceId("massage".to_string()),
        Service {
            name: "Massage".to_string(),
            description: "60 minute full-body massage".to_string(),
            duration_minutes: 60,
        },
    );

    let opening = Utc::now() + Duration::days(1);
    for hour in 0..4 {
        let start = opening + Duration::minutes(30 * hour);
        store.insert_slot(
            SlotId(format!("haircut-{hour}")),
            Slot::open(
                ServiceId("haircut".to_string()),
                start,
                start + Duration::minutes(30),
            ),
        );
    }
    for hour in 0..2 {
        let start = opening + Duration::hours(hour);
        store.insert_slot(
            SlotId(format!("massage-{hour}")),
            Slot::open(
                ServiceId("massage".to_string()),
                start,
                start + Duration::hours(1),
            ),
        );
    }
}

// === Main ===

#[tokio::main]
async fn main() {
    let store = MemoryStore::new();
    seed_demo_catalog(&store);

    let state = AppState {
        engine: Arc::new(ReservationEngine::new(store)),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Reservation API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  GET  /                     - Health check");
    println!("  GET  /services             - List offered services");
    println!("  GET  /slots/:service_id    - List open slots for a service");
    println!("  POST /book                 - Reserve a slot");
    println!("  GET  /bookings/:id         - Get a booking by ID");

    axum::serve(listener, app).await.unwrap();
}
