pub mod analytics;
pub mod booking;
pub mod event;
pub mod organizer;
pub mod review;
pub mod ticket;
pub mod transaction;
pub mod user;

pub use analytics::{DailyStat, Demographics, EventAnalytics};
pub use booking::{AttendeeInfo, Booking, BookingStatus, NewBooking};
pub use event::{Coordinates, Event, EventStatus, EventUpdate, Location, NewEvent};
pub use organizer::OrganizerSummary;
pub use review::{NewReview, RatingSummary, Review};
pub use ticket::{NewTicketType, TicketLine, TicketType, TicketTypeUpdate};
pub use transaction::{Payment, PaymentMethod, PaymentStatus};
pub use user::{Preferences, Role, Session, StoredUser, User};

/// Generates a prefixed identifier such as `booking_3f2a...`.
pub fn prefixed_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}
