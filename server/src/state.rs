use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::checkout::DEFAULT_CHECKOUT_TTL;
use crate::services::{
    AuthService, BookingService, CheckoutRegistry, EventService, Latency, PaymentGateway,
    ReviewService,
};
use crate::storage::{Storage, StorageError};

#[derive(Debug, Clone, Copy)]
pub struct ServiceOptions {
    pub latency: Latency,
    pub seed_sample_data: bool,
    pub checkout_ttl: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            latency: Latency::disabled(),
            seed_sample_data: false,
            checkout_ttl: DEFAULT_CHECKOUT_TTL,
        }
    }
}

impl From<&Config> for ServiceOptions {
    fn from(config: &Config) -> Self {
        Self {
            latency: Latency::new(config.simulate_latency),
            seed_sample_data: config.seed_sample_data,
            checkout_ttl: config.checkout_ttl,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
    pub bookings: Arc<BookingService>,
    pub reviews: Arc<ReviewService>,
    pub auth: Arc<AuthService>,
    pub checkouts: Arc<CheckoutRegistry>,
}

impl AppState {
    /// Loads every service from `storage`.
    pub async fn build(
        storage: Arc<dyn Storage>,
        gateway: Arc<dyn PaymentGateway>,
        options: ServiceOptions,
    ) -> Result<Self, StorageError> {
        let events = Arc::new(
            EventService::load(storage.clone(), options.latency, options.seed_sample_data).await?,
        );
        let bookings = Arc::new(
            BookingService::load(storage.clone(), events.clone(), gateway, options.latency).await?,
        );
        let reviews = Arc::new(
            ReviewService::load(storage.clone(), options.latency, options.seed_sample_data)
                .await?,
        );
        let auth = Arc::new(AuthService::load(storage, options.latency).await?);

        Ok(Self {
            events,
            bookings,
            reviews,
            auth,
            checkouts: Arc::new(CheckoutRegistry::with_ttl(options.checkout_ttl)),
        })
    }
}
