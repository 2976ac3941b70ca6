use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

use crate::models::{Event, EventUpdate, NewEvent, OrganizerSummary};
use crate::services::SearchFilters;
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

pub(crate) async fn find_event(state: &AppState, event_id: &str) -> Result<Event, AppError> {
    state
        .events
        .get_event(event_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", event_id)))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> Response {
    let events = state.events.search(&filters).await;
    success(events, "Events retrieved")
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let event = find_event(&state, &event_id).await?;
    Ok(success(event, "Event retrieved"))
}

pub async fn organizer_events(
    State(state): State<AppState>,
    Path(organizer_id): Path<String>,
) -> Response {
    let events = state.events.events_by_organizer(&organizer_id).await;
    success(events, "Organizer events retrieved")
}

pub async fn create_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(new_event): Json<NewEvent>,
) -> Result<Response, AppError> {
    current.require_organizer()?;
    let event = state
        .events
        .create_event(OrganizerSummary::from(&current.user), new_event)
        .await?;
    Ok(created(event, "Event created"))
}

pub async fn update_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<String>,
    Json(update): Json<EventUpdate>,
) -> Result<Response, AppError> {
    let event = find_event(&state, &event_id).await?;
    current.require_owner(&event)?;

    let updated = state
        .events
        .update_event(&event_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", event_id)))?;
    Ok(success(updated, "Event updated"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let event = find_event(&state, &event_id).await?;
    current.require_owner(&event)?;

    state.events.delete_event(&event_id).await?;
    Ok(empty_success("Event deleted"))
}

pub async fn event_analytics(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let event = find_event(&state, &event_id).await?;
    current.require_owner(&event)?;

    let analytics = state
        .events
        .event_analytics(&event_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", event_id)))?;
    Ok(success(analytics, "Analytics retrieved"))
}

pub async fn event_bookings(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let event = find_event(&state, &event_id).await?;
    current.require_owner(&event)?;

    let bookings = state.bookings.event_bookings(&event_id).await;
    Ok(success(bookings, "Event bookings retrieved"))
}
