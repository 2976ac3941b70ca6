use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::events::find_event;
use crate::models::{AttendeeInfo, PaymentMethod, TicketLine};
use crate::services::BookingWorkflow;
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct PayRequest {
    pub method: PaymentMethod,
}

pub async fn start_checkout(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let event = find_event(&state, &event_id).await?;
    let workflow = BookingWorkflow::new(event, &current.user);
    let view = workflow.view();
    state.checkouts.insert(workflow).await;

    tracing::info!(checkout_id = %view.id, event_id = %event_id, "Checkout started");
    Ok(created(view, "Checkout started"))
}

pub async fn get_checkout(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(checkout_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let shared = state.checkouts.get_for(checkout_id, &current.user).await?;
    let view = shared.lock().await.view();
    Ok(success(view, "Checkout retrieved"))
}

pub async fn set_tickets(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(checkout_id): Path<Uuid>,
    Json(line): Json<TicketLine>,
) -> Result<Response, AppError> {
    let shared = state.checkouts.get_for(checkout_id, &current.user).await?;
    let mut workflow = shared.lock().await;

    // Clamp against current inventory, not the snapshot taken at start
    let event = find_event(&state, workflow.event_id()).await?;
    workflow.refresh_event(event);
    workflow.set_quantity(&line.ticket_type_id, line.quantity)?;

    Ok(success(workflow.view(), "Tickets updated"))
}

pub async fn set_attendee(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(checkout_id): Path<Uuid>,
    Json(attendee): Json<AttendeeInfo>,
) -> Result<Response, AppError> {
    let shared = state.checkouts.get_for(checkout_id, &current.user).await?;
    let mut workflow = shared.lock().await;
    workflow.set_attendee(attendee)?;
    Ok(success(workflow.view(), "Attendee details updated"))
}

pub async fn next_step(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(checkout_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let shared = state.checkouts.get_for(checkout_id, &current.user).await?;
    let mut workflow = shared.lock().await;
    workflow.next()?;
    Ok(success(workflow.view(), "Moved to next step"))
}

pub async fn previous_step(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(checkout_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let shared = state.checkouts.get_for(checkout_id, &current.user).await?;
    let mut workflow = shared.lock().await;
    workflow.back()?;
    Ok(success(workflow.view(), "Moved to previous step"))
}

pub async fn pay(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(checkout_id): Path<Uuid>,
    Json(request): Json<PayRequest>,
) -> Result<Response, AppError> {
    let shared = state.checkouts.get_for(checkout_id, &current.user).await?;
    let mut workflow = shared.lock().await;
    workflow.pay(&state.bookings, request.method).await?;

    // Confirmed checkouts are done; the bookings live on in the booking service
    state.checkouts.remove(checkout_id).await;
    Ok(success(workflow.view(), "Booking confirmed"))
}
