use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Refunded,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendeeInfo {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl AttendeeInfo {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub ticket_type_id: String,
    pub quantity: u32,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub payment_id: String,
    pub qr_code: String,
    pub booked_at: DateTime<Utc>,
    pub attendee_info: AttendeeInfo,
}

/// Booking fields supplied by the caller; the service fills in the rest.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub event_id: String,
    pub user_id: String,
    pub ticket_type_id: String,
    pub quantity: u32,
    pub total_amount: Decimal,
    pub attendee_info: AttendeeInfo,
}
