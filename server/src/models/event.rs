use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::organizer::OrganizerSummary;
use super::ticket::{NewTicketType, TicketType, TicketTypeUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: Location,
    pub capacity: u32,
    pub category: String,
    pub organizer: OrganizerSummary,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub bookings_count: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
}

impl Event {
    /// Cheapest ticket price, or `None` when the event sells no tickets.
    pub fn min_ticket_price(&self) -> Option<Decimal> {
        self.ticket_types.iter().map(|ticket| ticket.price).min()
    }

    pub fn ticket_type(&self, ticket_type_id: &str) -> Option<&TicketType> {
        self.ticket_types
            .iter()
            .find(|ticket| ticket.id == ticket_type_id)
    }

    pub fn ticket_type_mut(&mut self, ticket_type_id: &str) -> Option<&mut TicketType> {
        self.ticket_types
            .iter_mut()
            .find(|ticket| ticket.id == ticket_type_id)
    }

    /// Gross revenue of tickets sold so far.
    pub fn revenue(&self) -> Decimal {
        self.ticket_types
            .iter()
            .map(|ticket| ticket.price * Decimal::from(ticket.sold))
            .sum()
    }
}

/// Payload for creating an event. The organizer is taken from the session.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: Location,
    pub capacity: u32,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub ticket_types: Vec<NewTicketType>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<EventStatus>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<Location>,
    pub capacity: Option<u32>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub ticket_types: Option<Vec<TicketTypeUpdate>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<EventStatus>,
}

impl EventUpdate {
    /// Copies the plain fields onto `event`. Ticket types need their sales
    /// carried over, so `EventService::update_event` merges those.
    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(capacity) = self.capacity {
            event.capacity = capacity;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(images) = self.images {
            event.images = images;
        }
        if let Some(tags) = self.tags {
            event.tags = tags;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
    }
}
