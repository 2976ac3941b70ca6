use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A priced category of admission with its own inventory.
///
/// `sold` never exceeds `quantity`; inventory changes go through
/// `EventService::reserve_tickets` and `EventService::release_tickets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub sold: u32,
    pub sale_start_date: NaiveDate,
    pub sale_end_date: NaiveDate,
    #[serde(default)]
    pub features: Vec<String>,
}

impl TicketType {
    pub fn available(&self) -> u32 {
        self.quantity.saturating_sub(self.sold)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTicketType {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
    pub sale_start_date: NaiveDate,
    pub sale_end_date: NaiveDate,
    #[serde(default)]
    pub features: Vec<String>,
}

impl NewTicketType {
    pub fn into_ticket_type(self, id: String) -> TicketType {
        TicketType {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            sold: 0,
            sale_start_date: self.sale_start_date,
            sale_end_date: self.sale_end_date,
            features: self.features,
        }
    }
}

/// Ticket type as sent in an event update. `sold` is never accepted from
/// the caller: an `id` naming an existing type keeps its sales, and a type
/// without one starts with none.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketTypeUpdate {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
    pub sale_start_date: NaiveDate,
    pub sale_end_date: NaiveDate,
    #[serde(default)]
    pub features: Vec<String>,
}

impl TicketTypeUpdate {
    pub fn into_ticket_type(self, id: String, sold: u32) -> TicketType {
        TicketType {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            sold,
            sale_start_date: self.sale_start_date,
            sale_end_date: self.sale_end_date,
            features: self.features,
        }
    }
}

/// A requested quantity of one ticket type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLine {
    pub ticket_type_id: String,
    pub quantity: u32,
}
