use async_trait::async_trait;
use uuid::Uuid;

use suds_catalog::CatalogItem;

use crate::models::{AdminBooking, Booking, BookingStats, BookingStatus};
use crate::user::User;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for booking persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a booking with its line items in one transaction.
    async fn create(&self, booking: &Booking) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;

    /// A user's bookings, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    /// All bookings with owner info, newest first, optionally filtered by
    /// status.
    async fn list_all(&self, status: Option<BookingStatus>)
        -> Result<Vec<AdminBooking>, RepoError>;

    /// Persist a new status; last write wins, no version check. Returns the
    /// updated snapshot, or `None` when the booking does not exist.
    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepoError>;

    /// Hard delete. Returns whether a booking was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn stats(&self) -> Result<BookingStats, RepoError>;
}

/// Repository trait for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Students awaiting verification, newest first.
    async fn pending_students(&self) -> Result<Vec<User>, RepoError>;

    /// Approve or reject a student. Returns whether the user existed.
    async fn set_verification(
        &self,
        id: Uuid,
        approved: bool,
        verified_by: Uuid,
    ) -> Result<bool, RepoError>;
}

/// Repository trait for catalog access.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All active items, ordered by numeric id.
    async fn active_items(&self) -> Result<Vec<CatalogItem>, RepoError>;
}
