pub mod auth_service;
pub mod booking_service;
pub mod checkout;
pub mod event_service;
pub mod latency;
pub mod payment_gateway;
pub mod review_service;
pub mod search;
pub mod seed;
pub mod workflow;

pub use auth_service::AuthService;
pub use booking_service::{BookingService, CheckoutReceipt, CheckoutRequest};
pub use checkout::CheckoutRegistry;
pub use event_service::EventService;
pub use latency::Latency;
pub use payment_gateway::{PaymentGateway, PaymentGatewayError, SimulatedGateway};
pub use review_service::ReviewService;
pub use search::{SearchFilters, SortKey, SortOrder};
pub use workflow::{BookingStep, BookingWorkflow, WorkflowError};
