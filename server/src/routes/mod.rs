use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{auth, bookings, checkout, events, health_check, reviews};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:id/analytics", get(events::event_analytics))
        .route("/events/:id/bookings", get(events::event_bookings))
        .route(
            "/events/:id/reviews",
            get(reviews::event_reviews).post(reviews::create_review),
        )
        .route("/events/:id/rating", get(reviews::event_rating))
        .route("/events/:id/checkout", post(checkout::start_checkout))
        .route("/organizers/:id/events", get(events::organizer_events))
        .route("/reviews/:id", delete(reviews::delete_review))
        .route("/reviews/:id/helpful", post(reviews::mark_helpful))
        .route("/users/me/reviews", get(reviews::my_reviews))
        .route("/checkouts/:id", get(checkout::get_checkout))
        .route("/checkouts/:id/tickets", put(checkout::set_tickets))
        .route("/checkouts/:id/attendee", put(checkout::set_attendee))
        .route("/checkouts/:id/next", post(checkout::next_step))
        .route("/checkouts/:id/back", post(checkout::previous_step))
        .route("/checkouts/:id/pay", post(checkout::pay))
        .route("/bookings", get(bookings::my_bookings))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id/cancel", post(bookings::cancel_booking))
        .route("/tickets/validate", post(bookings::validate_ticket))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(&config.cors_allowed_origins))
}
