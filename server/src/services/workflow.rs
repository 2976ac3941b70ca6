//! The four-step booking state machine.
//!
//! `select → details → payment → confirmation`. Guards:
//! - leaving `select` needs at least one ticket,
//! - leaving `details` needs attendee name and email,
//! - reaching `confirmation` needs a successful payment through [`BookingWorkflow::pay`].

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AttendeeInfo, Booking, Event, Payment, PaymentMethod, TicketLine, User};
use crate::services::booking_service::{BookingService, CheckoutRequest};
use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Select,
    Details,
    Payment,
    Confirmation,
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingStep::Select => "select",
            BookingStep::Details => "details",
            BookingStep::Payment => "payment",
            BookingStep::Confirmation => "confirmation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Not allowed during the {0} step")]
    InvalidStep(BookingStep),

    #[error("Select at least one ticket")]
    NoTicketsSelected,

    #[error("Attendee name and email are required")]
    MissingAttendeeDetails,

    #[error("Unknown ticket type: {0}")]
    UnknownTicketType(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub ticket_type_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub available: u32,
    pub quantity: u32,
}

/// Serializable snapshot of a checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub id: Uuid,
    pub event_id: String,
    pub step: BookingStep,
    pub selections: Vec<SelectionView>,
    pub total_quantity: u32,
    pub total_amount: Decimal,
    pub attendee: AttendeeInfo,
    pub bookings: Vec<Booking>,
    pub payment: Option<Payment>,
}

#[derive(Debug, Clone)]
pub struct BookingWorkflow {
    id: Uuid,
    user_id: String,
    event: Event,
    step: BookingStep,
    /// Requested quantity per ticket type, in the event's ticket order.
    quantities: Vec<u32>,
    attendee: AttendeeInfo,
    bookings: Vec<Booking>,
    payment: Option<Payment>,
}

impl BookingWorkflow {
    /// Starts at `select` with attendee details prefilled from the account.
    pub fn new(event: Event, user: &User) -> Self {
        let quantities = vec![0; event.ticket_types.len()];
        Self {
            id: Uuid::new_v4(),
            user_id: user.id.clone(),
            event,
            step: BookingStep::Select,
            quantities,
            attendee: AttendeeInfo {
                name: user.name.clone(),
                email: user.email.clone(),
                phone: None,
            },
            bookings: Vec::new(),
            payment: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn event_id(&self) -> &str {
        &self.event.id
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn attendee(&self) -> &AttendeeInfo {
        &self.attendee
    }

    pub fn total_quantity(&self) -> u32 {
        self.quantities.iter().sum()
    }

    pub fn total_amount(&self) -> Decimal {
        self.event
            .ticket_types
            .iter()
            .zip(&self.quantities)
            .map(|(ticket, quantity)| ticket.price * Decimal::from(*quantity))
            .sum()
    }

    pub fn lines(&self) -> Vec<TicketLine> {
        self.event
            .ticket_types
            .iter()
            .zip(&self.quantities)
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(ticket, quantity)| TicketLine {
                ticket_type_id: ticket.id.clone(),
                quantity: *quantity,
            })
            .collect()
    }

    fn require(&self, step: BookingStep) -> Result<(), WorkflowError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WorkflowError::InvalidStep(self.step))
        }
    }

    /// Replaces the event snapshot and clamps selections to what is still
    /// available. Ticket types that disappeared drop their selection.
    pub fn refresh_event(&mut self, event: Event) {
        let quantities = event
            .ticket_types
            .iter()
            .map(|ticket| {
                self.event
                    .ticket_types
                    .iter()
                    .position(|old| old.id == ticket.id)
                    .map_or(0, |index| self.quantities[index].min(ticket.available()))
            })
            .collect();
        self.quantities = quantities;
        self.event = event;
    }

    /// Sets the quantity for one ticket type, clamped to `[0, available]`.
    /// Returns the quantity actually applied.
    pub fn set_quantity(&mut self, ticket_type_id: &str, quantity: u32) -> Result<u32, WorkflowError> {
        self.require(BookingStep::Select)?;
        let index = self
            .event
            .ticket_types
            .iter()
            .position(|ticket| ticket.id == ticket_type_id)
            .ok_or_else(|| WorkflowError::UnknownTicketType(ticket_type_id.to_string()))?;

        let applied = quantity.min(self.event.ticket_types[index].available());
        self.quantities[index] = applied;
        Ok(applied)
    }

    pub fn set_attendee(&mut self, attendee: AttendeeInfo) -> Result<(), WorkflowError> {
        match self.step {
            BookingStep::Select | BookingStep::Details => {
                self.attendee = attendee;
                Ok(())
            }
            step => Err(WorkflowError::InvalidStep(step)),
        }
    }

    pub fn next(&mut self) -> Result<BookingStep, WorkflowError> {
        self.step = match self.step {
            BookingStep::Select if self.total_quantity() == 0 => {
                return Err(WorkflowError::NoTicketsSelected)
            }
            BookingStep::Select => BookingStep::Details,
            BookingStep::Details if !self.attendee.is_complete() => {
                return Err(WorkflowError::MissingAttendeeDetails)
            }
            BookingStep::Details => BookingStep::Payment,
            step => return Err(WorkflowError::InvalidStep(step)),
        };
        Ok(self.step)
    }

    pub fn back(&mut self) -> Result<BookingStep, WorkflowError> {
        self.step = match self.step {
            BookingStep::Payment => BookingStep::Details,
            BookingStep::Details => BookingStep::Select,
            step => return Err(WorkflowError::InvalidStep(step)),
        };
        Ok(self.step)
    }

    /// Runs the checkout. On failure the workflow stays at `payment` so the
    /// caller may retry.
    pub async fn pay(
        &mut self,
        bookings: &BookingService,
        method: PaymentMethod,
    ) -> Result<&[Booking], AppError> {
        self.require(BookingStep::Payment)?;

        let request = CheckoutRequest {
            event_id: self.event.id.clone(),
            user_id: self.user_id.clone(),
            lines: self.lines(),
            attendee: self.attendee.clone(),
            method,
        };
        let receipt = bookings.checkout(request).await?;

        self.bookings = receipt.bookings;
        self.payment = Some(receipt.payment);
        self.step = BookingStep::Confirmation;
        Ok(&self.bookings)
    }

    pub fn view(&self) -> CheckoutView {
        let selections = self
            .event
            .ticket_types
            .iter()
            .zip(&self.quantities)
            .map(|(ticket, quantity)| SelectionView {
                ticket_type_id: ticket.id.clone(),
                name: ticket.name.clone(),
                unit_price: ticket.price,
                available: ticket.available(),
                quantity: *quantity,
            })
            .collect();

        CheckoutView {
            id: self.id,
            event_id: self.event.id.clone(),
            step: self.step,
            selections,
            total_quantity: self.total_quantity(),
            total_amount: self.total_amount(),
            attendee: self.attendee.clone(),
            bookings: self.bookings.clone(),
            payment: self.payment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Preferences, Role};
    use crate::services::event_service::EventService;
    use crate::services::latency::Latency;
    use crate::services::payment_gateway::SimulatedGateway;
    use crate::services::seed::sample_events;
    use crate::storage::{MemoryStorage, Storage};
    use chrono::Utc;
    use std::sync::Arc;

    fn attendee_user() -> User {
        User {
            id: "user5".to_string(),
            email: "kim@example.com".to_string(),
            name: "Kim".to_string(),
            role: Role::Attendee,
            avatar: None,
            created_at: Utc::now(),
            preferences: Preferences::default(),
        }
    }

    fn workflow() -> BookingWorkflow {
        BookingWorkflow::new(sample_events().remove(0), &attendee_user())
    }

    async fn booking_service(gateway: SimulatedGateway) -> BookingService {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let events = Arc::new(
            EventService::load(storage.clone(), Latency::disabled(), true)
                .await
                .unwrap(),
        );
        BookingService::load(storage, events, Arc::new(gateway), Latency::disabled())
            .await
            .unwrap()
    }

    #[test]
    fn test_starts_at_select_with_prefilled_attendee() {
        let flow = workflow();
        assert_eq!(flow.step(), BookingStep::Select);
        assert_eq!(flow.attendee().name, "Kim");
        assert_eq!(flow.total_quantity(), 0);
    }

    #[test]
    fn test_cannot_leave_select_without_tickets() {
        let mut flow = workflow();
        assert_eq!(flow.next(), Err(WorkflowError::NoTicketsSelected));
        assert_eq!(flow.step(), BookingStep::Select);
    }

    #[test]
    fn test_quantity_is_clamped_to_available() {
        let mut flow = workflow();
        // ticket2 has 100 - 67 = 33 left
        assert_eq!(flow.set_quantity("ticket2", 50), Ok(33));
        assert_eq!(flow.set_quantity("ticket2", 0), Ok(0));
        assert_eq!(
            flow.set_quantity("ticket9", 1),
            Err(WorkflowError::UnknownTicketType("ticket9".to_string()))
        );
    }

    #[test]
    fn test_totals() {
        let mut flow = workflow();
        flow.set_quantity("ticket1", 2).unwrap();
        flow.set_quantity("ticket2", 1).unwrap();
        assert_eq!(flow.total_quantity(), 3);
        assert_eq!(flow.total_amount(), Decimal::from(2 * 199 + 399));
        assert_eq!(flow.lines().len(), 2);
    }

    #[test]
    fn test_details_require_name_and_email() {
        let mut flow = workflow();
        flow.set_quantity("ticket1", 1).unwrap();
        assert_eq!(flow.next(), Ok(BookingStep::Details));

        flow.set_attendee(AttendeeInfo {
            name: "Kim".to_string(),
            email: "".to_string(),
            phone: None,
        })
        .unwrap();
        assert_eq!(flow.next(), Err(WorkflowError::MissingAttendeeDetails));

        flow.set_attendee(AttendeeInfo {
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            phone: Some("555-0100".to_string()),
        })
        .unwrap();
        assert_eq!(flow.next(), Ok(BookingStep::Payment));
    }

    #[test]
    fn test_back_and_step_guards() {
        let mut flow = workflow();
        assert_eq!(
            flow.back(),
            Err(WorkflowError::InvalidStep(BookingStep::Select))
        );
        flow.set_quantity("ticket1", 1).unwrap();
        flow.next().unwrap();
        flow.next().unwrap();

        // Selection is frozen outside `select`
        assert_eq!(
            flow.set_quantity("ticket1", 2),
            Err(WorkflowError::InvalidStep(BookingStep::Payment))
        );
        // `next` cannot skip the payment
        assert_eq!(
            flow.next(),
            Err(WorkflowError::InvalidStep(BookingStep::Payment))
        );

        assert_eq!(flow.back(), Ok(BookingStep::Details));
        assert_eq!(flow.back(), Ok(BookingStep::Select));
    }

    #[test]
    fn test_refresh_clamps_selection() {
        let mut flow = workflow();
        flow.set_quantity("ticket2", 10).unwrap();

        let mut event = sample_events().remove(0);
        event.ticket_types[1].sold = 95;
        flow.refresh_event(event);
        assert_eq!(flow.view().selections[1].quantity, 5);
    }

    #[tokio::test]
    async fn test_pay_only_from_payment_step() {
        let service = booking_service(SimulatedGateway::always_approve()).await;
        let mut flow = workflow();
        let result = flow.pay(&service, PaymentMethod::Card).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_successful_payment_confirms() {
        let service = booking_service(SimulatedGateway::always_approve()).await;
        let mut flow = workflow();
        flow.set_quantity("ticket1", 2).unwrap();
        flow.next().unwrap();
        flow.next().unwrap();

        let bookings = flow.pay(&service, PaymentMethod::Card).await.unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].quantity, 2);
        assert!(bookings[0].qr_code.starts_with("QR_"));

        let view = flow.view();
        assert_eq!(view.step, BookingStep::Confirmation);
        assert_eq!(view.payment.unwrap().amount, Decimal::from(398));
        assert_eq!(flow.back(), Err(WorkflowError::InvalidStep(BookingStep::Confirmation)));
    }

    #[tokio::test]
    async fn test_failed_payment_stays_at_payment() {
        let service = booking_service(SimulatedGateway::always_decline()).await;
        let mut flow = workflow();
        flow.set_quantity("ticket1", 1).unwrap();
        flow.next().unwrap();
        flow.next().unwrap();

        let result = flow.pay(&service, PaymentMethod::Paypal).await;
        assert!(matches!(result, Err(AppError::PaymentFailed(_))));
        assert_eq!(flow.step(), BookingStep::Payment);
        assert!(flow.view().bookings.is_empty());
    }
}
