use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::Booking;
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize)]
pub struct ValidateTicketRequest {
    pub qr_code: String,
}

#[derive(Serialize)]
struct TicketValidation {
    valid: bool,
    booking: Option<Booking>,
}

fn booking_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Booking with id '{}' was not found", id))
}

pub async fn my_bookings(State(state): State<AppState>, current: CurrentUser) -> Response {
    let bookings = state.bookings.user_bookings(&current.user.id).await;
    success(bookings, "Bookings retrieved")
}

/// Visible to the attendee and to the event's organizer.
pub async fn get_booking(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(booking_id): Path<String>,
) -> Result<Response, AppError> {
    let booking = state
        .bookings
        .booking_by_id(&booking_id)
        .await
        .ok_or_else(|| booking_not_found(&booking_id))?;

    if booking.user_id != current.user.id {
        let organizes = state
            .events
            .get_event(&booking.event_id)
            .await
            .is_some_and(|event| event.organizer.id == current.user.id);
        if !organizes {
            return Err(booking_not_found(&booking_id));
        }
    }
    Ok(success(booking, "Booking retrieved"))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(booking_id): Path<String>,
) -> Result<Response, AppError> {
    let owned = state
        .bookings
        .booking_by_id(&booking_id)
        .await
        .is_some_and(|booking| booking.user_id == current.user.id);
    if !owned {
        return Err(booking_not_found(&booking_id));
    }

    let cancelled = state.bookings.cancel_booking(&booking_id).await?;
    Ok(success(cancelled, "Booking cancelled"))
}

/// Organizers can only validate tickets for their own events.
pub async fn validate_ticket(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<ValidateTicketRequest>,
) -> Result<Response, AppError> {
    current.require_organizer()?;

    let mut booking = state.bookings.validate_ticket(&request.qr_code).await;
    if let Some(found) = &booking {
        let organizes = state
            .events
            .get_event(&found.event_id)
            .await
            .is_some_and(|event| event.organizer.id == current.user.id);
        if !organizes {
            booking = None;
        }
    }

    let payload = TicketValidation {
        valid: booking.is_some(),
        booking,
    };
    Ok(success(payload, "Ticket checked"))
}
