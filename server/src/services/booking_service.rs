use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::models::transaction::DEFAULT_CURRENCY;
use crate::models::{
    prefixed_id, AttendeeInfo, Booking, BookingStatus, NewBooking, Payment, PaymentMethod,
    PaymentStatus, TicketLine,
};
use crate::services::event_service::{EventService, ReservedLine};
use crate::services::latency::Latency;
use crate::services::payment_gateway::{PaymentGateway, PaymentGatewayError};
use crate::storage::{keys, load_collection, save_collection, Storage, StorageError};
use crate::utils::error::AppError;

const QR_CODE_LEN: usize = 9;
const PAYMENT_FAILED_MESSAGE: &str = "Payment failed. Please try again.";

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub event_id: String,
    pub user_id: String,
    pub lines: Vec<TicketLine>,
    pub attendee: AttendeeInfo,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub bookings: Vec<Booking>,
    pub payment: Payment,
}

pub struct BookingService {
    storage: Arc<dyn Storage>,
    bookings: RwLock<Vec<Booking>>,
    payments: RwLock<Vec<Payment>>,
    events: Arc<EventService>,
    gateway: Arc<dyn PaymentGateway>,
    latency: Latency,
}

impl BookingService {
    pub async fn load(
        storage: Arc<dyn Storage>,
        events: Arc<EventService>,
        gateway: Arc<dyn PaymentGateway>,
        latency: Latency,
    ) -> Result<Self, StorageError> {
        let bookings = load_collection(storage.as_ref(), keys::BOOKINGS)
            .await?
            .unwrap_or_default();
        let payments = load_collection(storage.as_ref(), keys::PAYMENTS)
            .await?
            .unwrap_or_default();

        Ok(Self {
            storage,
            bookings: RwLock::new(bookings),
            payments: RwLock::new(payments),
            events,
            gateway,
            latency,
        })
    }

    async fn record_payment(&self, payment: Payment) -> Result<(), StorageError> {
        let mut payments = self.payments.write().await;
        let mut staged = payments.clone();
        staged.push(payment);
        save_collection(self.storage.as_ref(), keys::PAYMENTS, &staged).await?;
        *payments = staged;
        Ok(())
    }

    /// Records a completed refund of `amount` against `original`.
    async fn record_refund(&self, original: &Payment, amount: Decimal) -> Result<Payment, StorageError> {
        let refund = Payment {
            id: prefixed_id("refund"),
            amount: -amount,
            currency: original.currency.clone(),
            status: PaymentStatus::Completed,
            method: original.method,
            created_at: Utc::now(),
        };
        self.record_payment(refund.clone()).await?;
        info!(payment_id = %original.id, refund_id = %refund.id, %amount, "Refund recorded");
        Ok(refund)
    }

    async fn store_bookings(&self, new_bookings: &[Booking]) -> Result<(), StorageError> {
        let mut bookings = self.bookings.write().await;
        let mut staged = bookings.clone();
        staged.extend_from_slice(new_bookings);
        save_collection(self.storage.as_ref(), keys::BOOKINGS, &staged).await?;
        *bookings = staged;
        Ok(())
    }

    /// Charges the simulated gateway and records the outcome, declined
    /// payments included.
    pub async fn process_payment(
        &self,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Payment, AppError> {
        self.latency.simulate(Latency::PAYMENT_MS).await;

        let status = match self.gateway.charge(amount, method).await {
            Ok(()) => PaymentStatus::Completed,
            Err(PaymentGatewayError::Declined { .. }) => PaymentStatus::Failed,
            Err(err) => return Err(err.into()),
        };

        let payment = Payment {
            id: prefixed_id("pay"),
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            status,
            method,
            created_at: Utc::now(),
        };
        self.record_payment(payment.clone()).await?;

        info!(payment_id = %payment.id, %amount, ?status, "Payment processed");
        Ok(payment)
    }

    /// Records a confirmed booking paid by `payment`.
    pub async fn create_booking(
        &self,
        new_booking: NewBooking,
        payment: &Payment,
    ) -> Result<Booking, AppError> {
        if !payment.is_completed() {
            return Err(AppError::PaymentFailed(PAYMENT_FAILED_MESSAGE.to_string()));
        }

        let booking = confirmed_booking(new_booking, payment);
        self.store_bookings(std::slice::from_ref(&booking)).await?;

        info!(booking_id = %booking.id, event_id = %booking.event_id, "Booking confirmed");
        Ok(booking)
    }

    /// Reserves inventory, charges, and books one record per ticket type.
    ///
    /// Inventory is released again when the charge does not go through. If
    /// the bookings cannot be stored after a successful charge, the charge
    /// is refunded as well, so retrying does not bill twice.
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutReceipt, AppError> {
        if !request.attendee.is_complete() {
            return Err(AppError::ValidationError(
                "Attendee name and email are required".to_string(),
            ));
        }

        let reserved = self
            .events
            .reserve_tickets(&request.event_id, &request.lines)
            .await?;
        let amount: Decimal = reserved.iter().map(ReservedLine::total).sum();

        let payment = match self.process_payment(amount, request.method).await {
            Ok(payment) if payment.is_completed() => payment,
            outcome => {
                self.release(&request.event_id, &reserved).await;
                return match outcome {
                    Ok(_) => Err(AppError::PaymentFailed(PAYMENT_FAILED_MESSAGE.to_string())),
                    Err(err) => Err(err),
                };
            }
        };

        let bookings: Vec<Booking> = reserved
            .iter()
            .map(|line| {
                let new_booking = NewBooking {
                    event_id: request.event_id.clone(),
                    user_id: request.user_id.clone(),
                    ticket_type_id: line.ticket_type_id.clone(),
                    quantity: line.quantity,
                    total_amount: line.total(),
                    attendee_info: request.attendee.clone(),
                };
                confirmed_booking(new_booking, &payment)
            })
            .collect();

        if let Err(err) = self.store_bookings(&bookings).await {
            error!(payment_id = %payment.id, error = %err, "Bookings not stored, refunding");
            self.release(&request.event_id, &reserved).await;
            if let Err(refund_err) = self.record_refund(&payment, payment.amount).await {
                error!(payment_id = %payment.id, error = %refund_err, "Failed to record refund");
            }
            return Err(err.into());
        }

        for booking in &bookings {
            info!(booking_id = %booking.id, event_id = %booking.event_id, "Booking confirmed");
        }
        Ok(CheckoutReceipt { bookings, payment })
    }

    async fn release(&self, event_id: &str, reserved: &[ReservedLine]) {
        let lines: Vec<TicketLine> = reserved
            .iter()
            .map(|line| TicketLine {
                ticket_type_id: line.ticket_type_id.clone(),
                quantity: line.quantity,
            })
            .collect();
        if let Err(err) = self.events.release_tickets(event_id, &lines).await {
            warn!(event_id, error = %err, "Failed to release reserved tickets");
        }
    }

    pub async fn user_bookings(&self, user_id: &str) -> Vec<Booking> {
        self.latency.simulate(Latency::QUERY_MS).await;
        self.bookings
            .read()
            .await
            .iter()
            .filter(|booking| booking.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn event_bookings(&self, event_id: &str) -> Vec<Booking> {
        self.latency.simulate(Latency::QUERY_MS).await;
        self.bookings
            .read()
            .await
            .iter()
            .filter(|booking| booking.event_id == event_id)
            .cloned()
            .collect()
    }

    pub async fn booking_by_id(&self, id: &str) -> Option<Booking> {
        self.latency.simulate(Latency::LOOKUP_MS).await;
        self.bookings
            .read()
            .await
            .iter()
            .find(|booking| booking.id == id)
            .cloned()
    }

    /// Cancels a confirmed booking, records a refund against its payment
    /// and returns the tickets to inventory.
    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, AppError> {
        self.latency.simulate(Latency::WRITE_MS).await;

        let cancelled = {
            let mut bookings = self.bookings.write().await;
            let index = bookings
                .iter()
                .position(|booking| booking.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Booking '{}' was not found", id)))?;

            if bookings[index].status != BookingStatus::Confirmed {
                return Err(AppError::Conflict(format!(
                    "Booking '{}' cannot be cancelled",
                    id
                )));
            }
            let mut staged = bookings.clone();
            staged[index].status = BookingStatus::Cancelled;
            let cancelled = staged[index].clone();
            save_collection(self.storage.as_ref(), keys::BOOKINGS, &staged).await?;
            *bookings = staged;
            cancelled
        };

        let original = self
            .payments
            .read()
            .await
            .iter()
            .find(|payment| payment.id == cancelled.payment_id)
            .cloned();
        match original {
            Some(original) => {
                self.record_refund(&original, cancelled.total_amount).await?;
            }
            None => warn!(booking_id = %id, "No payment found to refund"),
        }

        let line = TicketLine {
            ticket_type_id: cancelled.ticket_type_id.clone(),
            quantity: cancelled.quantity,
        };
        self.events
            .release_tickets(&cancelled.event_id, &[line])
            .await?;

        info!(booking_id = %id, "Booking cancelled");
        Ok(cancelled)
    }

    #[cfg(test)]
    pub async fn payment_history(&self) -> Vec<Payment> {
        self.payments.read().await.clone()
    }

    /// A ticket is valid when a confirmed booking carries its QR code.
    pub async fn validate_ticket(&self, qr_code: &str) -> Option<Booking> {
        self.latency.simulate(Latency::WRITE_MS).await;
        self.bookings
            .read()
            .await
            .iter()
            .find(|booking| booking.qr_code == qr_code && booking.status == BookingStatus::Confirmed)
            .cloned()
    }
}

fn confirmed_booking(new_booking: NewBooking, payment: &Payment) -> Booking {
    Booking {
        id: prefixed_id("booking"),
        event_id: new_booking.event_id,
        user_id: new_booking.user_id,
        ticket_type_id: new_booking.ticket_type_id,
        quantity: new_booking.quantity,
        total_amount: new_booking.total_amount,
        status: BookingStatus::Confirmed,
        payment_id: payment.id.clone(),
        qr_code: generate_qr_code(),
        booked_at: Utc::now(),
        attendee_info: new_booking.attendee_info,
    }
}

fn generate_qr_code() -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(QR_CODE_LEN)
        .map(char::from)
        .collect();
    format!("QR_{}", code.to_uppercase())
}
