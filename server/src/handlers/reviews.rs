use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;

use crate::handlers::events::find_event;
use crate::models::NewReview;
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// Copies the current mean rating onto the event record.
async fn refresh_event_rating(state: &AppState, event_id: &str) -> Result<(), AppError> {
    state
        .events
        .refresh_rating(event_id, state.reviews.rating_summary(event_id))
        .await
}

pub async fn event_reviews(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    find_event(&state, &event_id).await?;
    let reviews = state.reviews.event_reviews(&event_id).await;
    Ok(success(reviews, "Reviews retrieved"))
}

pub async fn event_rating(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    find_event(&state, &event_id).await?;
    let summary = state.reviews.rating_summary(&event_id).await;
    Ok(success(summary, "Rating retrieved"))
}

pub async fn create_review(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<String>,
    Json(new_review): Json<NewReview>,
) -> Result<Response, AppError> {
    find_event(&state, &event_id).await?;
    let review = state
        .reviews
        .create_review(&event_id, &current.user, new_review)
        .await?;
    refresh_event_rating(&state, &event_id).await?;
    Ok(created(review, "Review created"))
}

pub async fn my_reviews(State(state): State<AppState>, current: CurrentUser) -> Response {
    let reviews = state.reviews.user_reviews(&current.user.id).await;
    success(reviews, "Reviews retrieved")
}

pub async fn mark_helpful(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(review_id): Path<String>,
) -> Result<Response, AppError> {
    if state.reviews.mark_helpful(&review_id).await? {
        Ok(empty_success("Marked as helpful"))
    } else {
        Err(AppError::NotFound(format!(
            "Review with id '{}' was not found",
            review_id
        )))
    }
}

pub async fn delete_review(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(review_id): Path<String>,
) -> Result<Response, AppError> {
    let removed = state
        .reviews
        .delete_review(&review_id, &current.user.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Review with id '{}' was not found", review_id))
        })?;
    refresh_event_rating(&state, &removed.event_id).await?;
    Ok(empty_success("Review deleted"))
}
