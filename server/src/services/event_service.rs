use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::{
    prefixed_id, DailyStat, Demographics, Event, EventAnalytics, EventStatus, EventUpdate,
    NewEvent, OrganizerSummary, RatingSummary, TicketLine, TicketType, TicketTypeUpdate,
};
use crate::services::latency::Latency;
use crate::services::search::{filter_events, SearchFilters};
use crate::services::seed::sample_events;
use crate::storage::{keys, load_collection, save_collection, Storage, StorageError};
use crate::utils::error::AppError;

/// A reserved ticket line priced at the moment of reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservedLine {
    pub ticket_type_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl ReservedLine {
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

pub struct EventService {
    storage: Arc<dyn Storage>,
    events: RwLock<Vec<Event>>,
    latency: Latency,
}

impl EventService {
    /// Loads the collection, writing the sample events when it was never
    /// stored and `seed` is set.
    pub async fn load(
        storage: Arc<dyn Storage>,
        latency: Latency,
        seed: bool,
    ) -> Result<Self, StorageError> {
        let events = match load_collection::<Event>(storage.as_ref(), keys::EVENTS).await? {
            Some(events) => events,
            None if seed => {
                let events = sample_events();
                save_collection(storage.as_ref(), keys::EVENTS, &events).await?;
                info!(count = events.len(), "Seeded sample events");
                events
            }
            None => Vec::new(),
        };

        Ok(Self {
            storage,
            events: RwLock::new(events),
            latency,
        })
    }

    /// Writes `staged` and only then makes it the live collection, so a
    /// failed write leaves memory matching storage.
    async fn commit(&self, events: &mut Vec<Event>, staged: Vec<Event>) -> Result<(), StorageError> {
        save_collection(self.storage.as_ref(), keys::EVENTS, &staged).await?;
        *events = staged;
        Ok(())
    }

    pub async fn search(&self, filters: &SearchFilters) -> Vec<Event> {
        self.latency.simulate(Latency::QUERY_MS).await;
        let events = self.events.read().await;
        filter_events(events.iter(), filters)
    }

    pub async fn get_event(&self, id: &str) -> Option<Event> {
        self.latency.simulate(Latency::LOOKUP_MS).await;
        self.events
            .read()
            .await
            .iter()
            .find(|event| event.id == id)
            .cloned()
    }

    pub async fn events_by_organizer(&self, organizer_id: &str) -> Vec<Event> {
        self.latency.simulate(Latency::QUERY_MS).await;
        self.events
            .read()
            .await
            .iter()
            .filter(|event| event.organizer.id == organizer_id)
            .cloned()
            .collect()
    }

    pub async fn create_event(
        &self,
        organizer: OrganizerSummary,
        new_event: NewEvent,
    ) -> Result<Event, AppError> {
        self.latency.simulate(Latency::WRITE_MS).await;

        let now = Utc::now();
        let ticket_types = new_event
            .ticket_types
            .into_iter()
            .map(|ticket| ticket.into_ticket_type(prefixed_id("ticket")))
            .collect();

        let event = Event {
            id: prefixed_id("event"),
            title: new_event.title,
            description: new_event.description,
            date: new_event.date,
            time: new_event.time,
            location: new_event.location,
            capacity: new_event.capacity,
            category: new_event.category,
            organizer,
            images: new_event.images,
            ticket_types,
            tags: new_event.tags,
            status: new_event.status.unwrap_or(EventStatus::Published),
            created_at: now,
            updated_at: now,
            bookings_count: 0,
            rating: 0.0,
            review_count: 0,
        };
        validate_event(&event)?;

        let mut events = self.events.write().await;
        let mut staged = events.clone();
        staged.push(event.clone());
        self.commit(&mut events, staged).await?;

        info!(event_id = %event.id, organizer_id = %event.organizer.id, "Event created");
        Ok(event)
    }

    /// Returns `None` when no event has this id.
    ///
    /// Ticket types are matched by id so their sales carry over; a type that
    /// has sales cannot be dropped or cut below what it sold.
    pub async fn update_event(
        &self,
        id: &str,
        mut update: EventUpdate,
    ) -> Result<Option<Event>, AppError> {
        self.latency.simulate(Latency::WRITE_MS).await;

        let mut events = self.events.write().await;
        let Some(index) = events.iter().position(|event| event.id == id) else {
            return Ok(None);
        };

        let mut updated = events[index].clone();
        if let Some(ticket_types) = update.ticket_types.take() {
            updated.ticket_types = merge_ticket_types(&updated.ticket_types, ticket_types)?;
        }
        update.apply(&mut updated);
        updated.updated_at = Utc::now();
        validate_event(&updated)?;

        let mut staged = events.clone();
        staged[index] = updated.clone();
        self.commit(&mut events, staged).await?;

        info!(event_id = %id, "Event updated");
        Ok(Some(updated))
    }

    pub async fn delete_event(&self, id: &str) -> Result<bool, AppError> {
        self.latency.simulate(Latency::QUERY_MS).await;

        let mut events = self.events.write().await;
        let Some(index) = events.iter().position(|event| event.id == id) else {
            return Ok(false);
        };
        let mut staged = events.clone();
        staged.remove(index);
        self.commit(&mut events, staged).await?;

        info!(event_id = %id, "Event deleted");
        Ok(true)
    }

    pub async fn event_analytics(&self, id: &str) -> Option<EventAnalytics> {
        self.latency.simulate(Latency::ANALYTICS_MS).await;
        let events = self.events.read().await;
        let event = events.iter().find(|event| event.id == id)?;
        Some(mock_analytics(event, Utc::now().date_naive()))
    }

    /// Checks every line against current inventory and, only if all fit,
    /// marks the tickets as sold.
    pub async fn reserve_tickets(
        &self,
        event_id: &str,
        lines: &[TicketLine],
    ) -> Result<Vec<ReservedLine>, AppError> {
        let mut events = self.events.write().await;
        let index = events
            .iter()
            .position(|event| event.id == event_id)
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' was not found", event_id)))?;

        let mut staged = events.clone();
        let event = &mut staged[index];
        if event.status != EventStatus::Published {
            return Err(AppError::Conflict(format!(
                "Event '{}' is not open for booking",
                event_id
            )));
        }

        let mut requested: HashMap<&str, u32> = HashMap::new();
        for line in lines.iter().filter(|line| line.quantity > 0) {
            *requested.entry(line.ticket_type_id.as_str()).or_default() += line.quantity;
        }
        if requested.is_empty() {
            return Err(AppError::ValidationError(
                "At least one ticket must be requested".to_string(),
            ));
        }

        for (ticket_type_id, quantity) in &requested {
            let ticket = event.ticket_type(ticket_type_id).ok_or_else(|| {
                AppError::NotFound(format!("Ticket type '{}' was not found", ticket_type_id))
            })?;
            if *quantity > ticket.available() {
                return Err(AppError::Conflict(format!(
                    "Only {} '{}' ticket(s) left",
                    ticket.available(),
                    ticket.name
                )));
            }
        }

        let mut reserved = Vec::with_capacity(requested.len());
        for ticket in event.ticket_types.iter_mut() {
            if let Some(quantity) = requested.get(ticket.id.as_str()) {
                ticket.sold += quantity;
                reserved.push(ReservedLine {
                    ticket_type_id: ticket.id.clone(),
                    quantity: *quantity,
                    unit_price: ticket.price,
                });
            }
        }
        let total: u32 = reserved.iter().map(|line| line.quantity).sum();
        event.bookings_count += total;

        self.commit(&mut events, staged).await?;
        info!(event_id, tickets = total, "Tickets reserved");
        Ok(reserved)
    }

    /// Returns tickets to inventory. A deleted event is skipped.
    pub async fn release_tickets(
        &self,
        event_id: &str,
        lines: &[TicketLine],
    ) -> Result<(), AppError> {
        let mut events = self.events.write().await;
        let Some(index) = events.iter().position(|event| event.id == event_id) else {
            warn!(event_id, "Cannot release tickets for a missing event");
            return Ok(());
        };

        let mut staged = events.clone();
        let event = &mut staged[index];
        let mut released = 0;
        for line in lines {
            if let Some(ticket) = event.ticket_type_mut(&line.ticket_type_id) {
                let quantity = line.quantity.min(ticket.sold);
                ticket.sold -= quantity;
                released += quantity;
            }
        }
        event.bookings_count = event.bookings_count.saturating_sub(released);

        self.commit(&mut events, staged).await?;
        info!(event_id, tickets = released, "Tickets released");
        Ok(())
    }

    /// Stores the rating produced by `summary` on the event.
    ///
    /// `summary` is awaited while the collection is write-locked, so
    /// concurrent refreshes apply in order and the last one reads the
    /// newest reviews.
    pub async fn refresh_rating<F>(&self, event_id: &str, summary: F) -> Result<(), AppError>
    where
        F: Future<Output = RatingSummary>,
    {
        let mut events = self.events.write().await;
        let Some(index) = events.iter().position(|event| event.id == event_id) else {
            return Ok(());
        };
        let summary = summary.await;

        let mut staged = events.clone();
        staged[index].rating = summary.average;
        staged[index].review_count = summary.count;
        self.commit(&mut events, staged).await?;
        Ok(())
    }
}

/// Applies the ticket types of an update on top of the current ones.
fn merge_ticket_types(
    current: &[TicketType],
    incoming: Vec<TicketTypeUpdate>,
) -> Result<Vec<TicketType>, AppError> {
    let mut merged: Vec<TicketType> = Vec::with_capacity(incoming.len());
    for update in incoming {
        let ticket = match update.id.clone() {
            Some(id) => {
                if merged.iter().any(|ticket| ticket.id == id) {
                    return Err(AppError::ValidationError(format!(
                        "Ticket type '{}' is listed more than once",
                        id
                    )));
                }
                let existing = current
                    .iter()
                    .find(|ticket| ticket.id == id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Ticket type '{}' was not found", id))
                    })?;
                if update.quantity < existing.sold {
                    return Err(AppError::Conflict(format!(
                        "Ticket type '{}' already sold {} ticket(s)",
                        existing.name, existing.sold
                    )));
                }
                let sold = existing.sold;
                update.into_ticket_type(id, sold)
            }
            None => update.into_ticket_type(prefixed_id("ticket"), 0),
        };
        merged.push(ticket);
    }

    if let Some(dropped) = current
        .iter()
        .find(|ticket| ticket.sold > 0 && !merged.iter().any(|kept| kept.id == ticket.id))
    {
        return Err(AppError::Conflict(format!(
            "Ticket type '{}' has sales and cannot be removed",
            dropped.name
        )));
    }
    Ok(merged)
}

fn validate_event(event: &Event) -> Result<(), AppError> {
    if event.title.trim().is_empty() {
        return Err(AppError::ValidationError("Title is required".to_string()));
    }
    if event.category.trim().is_empty() {
        return Err(AppError::ValidationError("Category is required".to_string()));
    }
    event.ticket_types.iter().try_for_each(validate_ticket_type)
}

fn validate_ticket_type(ticket: &TicketType) -> Result<(), AppError> {
    if ticket.name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Ticket type name is required".to_string(),
        ));
    }
    if ticket.price.is_sign_negative() {
        return Err(AppError::ValidationError(format!(
            "Ticket type '{}' has a negative price",
            ticket.name
        )));
    }
    if ticket.sold > ticket.quantity {
        return Err(AppError::ValidationError(format!(
            "Ticket type '{}' cannot have fewer tickets than already sold ({})",
            ticket.name, ticket.sold
        )));
    }
    if ticket.sale_start_date > ticket.sale_end_date {
        return Err(AppError::ValidationError(format!(
            "Ticket type '{}' sale window ends before it starts",
            ticket.name
        )));
    }
    Ok(())
}

fn percentages(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
    entries
        .iter()
        .map(|(label, share)| (label.to_string(), *share))
        .collect()
}

/// Random traffic figures around the event's real bookings and revenue.
pub fn mock_analytics(event: &Event, today: NaiveDate) -> EventAnalytics {
    let mut rng = rand::thread_rng();
    let views: u32 = rng.gen_range(100..1100);
    let conversion_rate = (f64::from(event.bookings_count) / f64::from(views) * 100.0).round() as u32;

    let daily_stats = (0..7u64)
        .map(|days_ago| DailyStat {
            date: today.checked_sub_days(Days::new(days_ago)).unwrap_or(today),
            views: rng.gen_range(10..60),
            bookings: rng.gen_range(1..11),
            revenue: Decimal::from(rng.gen_range(100..1100)),
        })
        .collect();

    EventAnalytics {
        event_id: event.id.clone(),
        views,
        bookings: event.bookings_count,
        revenue: event.revenue(),
        conversion_rate,
        daily_stats,
        demographics: Demographics {
            age_groups: percentages(&[
                ("18-24", 25),
                ("25-34", 40),
                ("35-44", 20),
                ("45-54", 10),
                ("55+", 5),
            ]),
            locations: percentages(&[
                ("California", 35),
                ("New York", 25),
                ("Texas", 15),
                ("Florida", 10),
                ("Others", 15),
            ]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, NewTicketType};
    use crate::storage::{FailingStorage, MemoryStorage};
    use chrono::NaiveTime;

    async fn service() -> EventService {
        EventService::load(Arc::new(MemoryStorage::new()), Latency::disabled(), true)
            .await
            .unwrap()
    }

    fn organizer() -> OrganizerSummary {
        OrganizerSummary {
            id: "org9".to_string(),
            name: "Night Owls".to_string(),
            email: "hello@nightowls.test".to_string(),
            avatar: None,
        }
    }

    fn new_event(title: &str) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: "Late night comedy".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            time: NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
            location: Location {
                address: "1 Main St".to_string(),
                city: "Austin".to_string(),
                state: "TX".to_string(),
                zip_code: "73301".to_string(),
                coordinates: None,
            },
            capacity: 50,
            category: "Comedy".to_string(),
            images: vec![],
            ticket_types: vec![NewTicketType {
                name: "Seat".to_string(),
                description: String::new(),
                price: Decimal::new(2500, 2),
                quantity: 5,
                sale_start_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
                sale_end_date: NaiveDate::from_ymd_opt(2026, 11, 19).unwrap(),
                features: vec![],
            }],
            tags: vec!["comedy".to_string()],
            status: None,
        }
    }

    fn line(ticket_type_id: &str, quantity: u32) -> TicketLine {
        TicketLine {
            ticket_type_id: ticket_type_id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_seeds_only_when_collection_missing() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let seeded = EventService::load(storage.clone(), Latency::disabled(), true)
            .await
            .unwrap();
        assert_eq!(seeded.search(&SearchFilters::default()).await.len(), 2);
        seeded.delete_event("1").await.unwrap();

        // Reloading the same store keeps the deletion instead of reseeding
        let reloaded = EventService::load(storage, Latency::disabled(), true)
            .await
            .unwrap();
        assert_eq!(reloaded.search(&SearchFilters::default()).await.len(), 1);

        let empty = EventService::load(Arc::new(MemoryStorage::new()), Latency::disabled(), false)
            .await
            .unwrap();
        assert!(empty.search(&SearchFilters::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_create_event_zeroes_aggregates() {
        let service = service().await;
        let event = service
            .create_event(organizer(), new_event("Open Mic"))
            .await
            .unwrap();

        assert!(event.id.starts_with("event_"));
        assert_eq!(event.status, EventStatus::Published);
        assert_eq!(event.bookings_count, 0);
        assert_eq!(event.review_count, 0);
        assert_eq!(event.ticket_types[0].sold, 0);
        assert_eq!(service.events_by_organizer("org9").await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_event_requires_title() {
        let service = service().await;
        let result = service.create_event(organizer(), new_event("  ")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_event_is_partial() {
        let service = service().await;
        let update = EventUpdate {
            title: Some("Jazz Night (Encore)".to_string()),
            ..Default::default()
        };
        let updated = service.update_event("2", update).await.unwrap().unwrap();

        assert_eq!(updated.title, "Jazz Night (Encore)");
        assert_eq!(updated.category, "Music");
        assert!(updated.updated_at > updated.created_at);

        let missing = service
            .update_event("nope", EventUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    fn ticket_update(ticket: &TicketType) -> TicketTypeUpdate {
        TicketTypeUpdate {
            id: Some(ticket.id.clone()),
            name: ticket.name.clone(),
            description: ticket.description.clone(),
            price: ticket.price,
            quantity: ticket.quantity,
            sale_start_date: ticket.sale_start_date,
            sale_end_date: ticket.sale_end_date,
            features: ticket.features.clone(),
        }
    }

    fn with_tickets(tickets: Vec<TicketTypeUpdate>) -> EventUpdate {
        EventUpdate {
            ticket_types: Some(tickets),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_cannot_shrink_below_sold() {
        let service = service().await;
        let mut ticket = ticket_update(&service.get_event("2").await.unwrap().ticket_types[0]);
        ticket.quantity = 10;
        let result = service.update_event("2", with_tickets(vec![ticket])).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_sales_after_sellout() {
        let service = service().await;
        service
            .reserve_tickets("2", &[line("ticket3", 57)])
            .await
            .unwrap();

        // Renaming a sold-out type keeps its sales
        let mut ticket = ticket_update(&service.get_event("2").await.unwrap().ticket_types[0]);
        ticket.name = "Standard Seating".to_string();
        let updated = service
            .update_event("2", with_tickets(vec![ticket]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.ticket_types[0].sold, 80);
        assert_eq!(updated.ticket_types[0].name, "Standard Seating");

        let result = service.reserve_tickets("2", &[line("ticket3", 1)]).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_ticket_type_rules() {
        let service = service().await;
        let current = service.get_event("1").await.unwrap().ticket_types;

        // Dropping a type that has sales
        let result = service
            .update_event("1", with_tickets(vec![ticket_update(&current[0])]))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let mut unknown = ticket_update(&current[0]);
        unknown.id = Some("ticket_forged".to_string());
        let result = service
            .update_event("1", with_tickets(vec![unknown, ticket_update(&current[1])]))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = service
            .update_event(
                "1",
                with_tickets(vec![ticket_update(&current[0]), ticket_update(&current[0])]),
            )
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        // A new type without an id starts unsold
        let mut extra = ticket_update(&current[1]);
        extra.id = None;
        extra.name = "Student".to_string();
        let updated = service
            .update_event(
                "1",
                with_tickets(vec![
                    ticket_update(&current[0]),
                    ticket_update(&current[1]),
                    extra,
                ]),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.ticket_types.len(), 3);
        assert_eq!(updated.ticket_types[1].sold, 67);
        assert_eq!(updated.ticket_types[2].sold, 0);
        assert!(updated.ticket_types[2].id.starts_with("ticket_"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_inventory_untouched() {
        let storage = Arc::new(FailingStorage::default());
        let service = EventService::load(storage.clone(), Latency::disabled(), true)
            .await
            .unwrap();

        storage.fail_writes(keys::EVENTS);
        let result = service.reserve_tickets("2", &[line("ticket3", 5)]).await;
        assert!(matches!(result, Err(AppError::StorageError(_))));
        assert_eq!(service.get_event("2").await.unwrap().ticket_types[0].sold, 23);

        let result = service.delete_event("2").await;
        assert!(result.is_err());
        assert!(service.get_event("2").await.is_some());

        storage.heal();
        service
            .reserve_tickets("2", &[line("ticket3", 5)])
            .await
            .unwrap();
        assert_eq!(service.get_event("2").await.unwrap().ticket_types[0].sold, 28);
    }

    #[tokio::test]
    async fn test_refresh_rating_reads_summary_under_lock() {
        let service = service().await;
        let summary = async {
            RatingSummary {
                average: 3.5,
                count: 2,
            }
        };
        service.refresh_rating("2", summary).await.unwrap();

        let event = service.get_event("2").await.unwrap();
        assert_eq!(event.rating, 3.5);
        assert_eq!(event.review_count, 2);

        // Unknown events are ignored
        let summary = async {
            RatingSummary {
                average: 0.0,
                count: 0,
            }
        };
        assert!(service.refresh_rating("nope", summary).await.is_ok());
    }

    #[tokio::test]
    async fn test_reserve_never_exceeds_available() {
        let service = service().await;

        // ticket3: 80 total, 23 sold
        let result = service.reserve_tickets("2", &[line("ticket3", 58)]).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let reserved = service
            .reserve_tickets("2", &[line("ticket3", 57)])
            .await
            .unwrap();
        assert_eq!(reserved[0].total(), Decimal::from(45 * 57));

        let event = service.get_event("2").await.unwrap();
        assert_eq!(event.ticket_types[0].sold, 80);
        assert_eq!(event.ticket_types[0].available(), 0);
        assert_eq!(event.bookings_count, 80);

        let result = service.reserve_tickets("2", &[line("ticket3", 1)]).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_reserve_is_all_or_nothing() {
        let service = service().await;
        // VIP has 33 left; the second line fails so the first must not apply
        let result = service
            .reserve_tickets("1", &[line("ticket1", 2), line("ticket2", 34)])
            .await;
        assert!(result.is_err());

        let event = service.get_event("1").await.unwrap();
        assert_eq!(event.ticket_types[0].sold, 145);
        assert_eq!(event.ticket_types[1].sold, 67);
    }

    #[tokio::test]
    async fn test_reserve_rejects_unknown_ticket_and_closed_event() {
        let service = service().await;
        let result = service.reserve_tickets("1", &[line("ticket3", 1)]).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        service
            .update_event(
                "1",
                EventUpdate {
                    status: Some(EventStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let result = service.reserve_tickets("1", &[line("ticket1", 1)]).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_release_returns_inventory() {
        let service = service().await;
        service
            .reserve_tickets("2", &[line("ticket3", 4)])
            .await
            .unwrap();
        service
            .release_tickets("2", &[line("ticket3", 4)])
            .await
            .unwrap();

        let event = service.get_event("2").await.unwrap();
        assert_eq!(event.ticket_types[0].sold, 23);
        assert_eq!(event.bookings_count, 23);

        // Releasing for a deleted event is a no-op
        service.delete_event("2").await.unwrap();
        assert!(service
            .release_tickets("2", &[line("ticket3", 1)])
            .await
            .is_ok());
    }

    #[test]
    fn test_mock_analytics_uses_real_revenue() {
        let event = sample_events().remove(0);
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let analytics = mock_analytics(&event, today);

        assert_eq!(analytics.bookings, 212);
        assert_eq!(analytics.revenue, Decimal::from(145 * 199 + 67 * 399));
        assert!((100..1100).contains(&analytics.views));
        assert_eq!(analytics.daily_stats.len(), 7);
        assert_eq!(analytics.daily_stats[0].date, today);
        assert_eq!(
            analytics.daily_stats[6].date,
            NaiveDate::from_ymd_opt(2026, 10, 10).unwrap()
        );
        assert_eq!(analytics.demographics.age_groups.values().sum::<u32>(), 100);
    }
}
