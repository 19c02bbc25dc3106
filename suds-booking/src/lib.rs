pub mod invoice;
pub mod models;
pub mod pricing;
pub mod repository;
pub mod user;

pub use invoice::invoice_number;
pub use models::{AdminBooking, Booking, BookingItem, BookingStats, BookingStatus, PickupDetails};
pub use pricing::{CartLine, PricingConfig, PricingEngine, PricingError, Quote, Requester};
pub use user::{User, UserType, VerificationStatus};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Booking not found: {0}")]
    NotFound(String),
}
