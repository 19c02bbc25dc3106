use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use suds_booking::models::{AdminBooking, Booking, BookingStats, BookingStatus};
use suds_booking::repository::{BookingRepository, CatalogRepository, RepoError, UserRepository};
use suds_booking::user::{User, UserType, VerificationStatus};
use suds_catalog::{seed_items, CatalogItem};

/// In-memory implementation of all three repositories, for tests and demo
/// runs without a database. Starts out with the stock catalog.
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    bookings: RwLock<Vec<Booking>>,
    items: RwLock<Vec<CatalogItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_items(seed_items())
    }

    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            bookings: RwLock::new(Vec::new()),
            items: RwLock::new(items),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create(&self, booking: &Booking) -> Result<(), RepoError> {
        let mut bookings = self.bookings.write().expect("store lock poisoned");
        bookings.push(booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let bookings = self.bookings.read().expect("store lock poisoned");
        Ok(bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let bookings = self.bookings.read().expect("store lock poisoned");
        let mut mine: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn list_all(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<AdminBooking>, RepoError> {
        let bookings = self.bookings.read().expect("store lock poisoned");
        let users = self.users.read().expect("store lock poisoned");

        let mut all: Vec<AdminBooking> = bookings
            .iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .map(|b| {
                let owner = users.get(&b.user_id);
                AdminBooking {
                    booking: b.clone(),
                    user_name: owner.map(|u| u.name.clone()),
                    user_email: owner.map(|u| u.email.clone()),
                    user_phone: owner.map(|u| u.phone.clone()),
                    user_type: owner.map(|u| u.user_type),
                }
            })
            .collect();
        all.sort_by(|a, b| b.booking.created_at.cmp(&a.booking.created_at));
        Ok(all)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepoError> {
        let mut bookings = self.bookings.write().expect("store lock poisoned");
        match bookings.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.status = status;
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut bookings = self.bookings.write().expect("store lock poisoned");
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        Ok(bookings.len() < before)
    }

    async fn stats(&self) -> Result<BookingStats, RepoError> {
        let bookings = self.bookings.read().expect("store lock poisoned");
        let mut stats = BookingStats::default();
        for b in bookings.iter() {
            stats.total_bookings += 1;
            match b.status {
                BookingStatus::Pending => stats.pending_bookings += 1,
                BookingStatus::Processing => stats.processing_bookings += 1,
                BookingStatus::Completed => stats.completed_bookings += 1,
                BookingStatus::Cancelled => {}
            }
            if b.user_type_at_booking == UserType::Student {
                stats.student_bookings += 1;
            }
            stats.total_revenue += b.final_amount;
            stats.total_revenue_with_gst += b.grand_total;
            stats.total_gst_collected += b.gst_amount;
            stats.total_discounts_given += b.discount_amount;
        }
        Ok(stats)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<(), RepoError> {
        let mut users = self.users.write().expect("store lock poisoned");
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.read().expect("store lock poisoned");
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().expect("store lock poisoned");
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn pending_students(&self) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().expect("store lock poisoned");
        let mut pending: Vec<User> = users
            .values()
            .filter(|u| {
                u.user_type == UserType::Student
                    && u.verification_status == VerificationStatus::Pending
            })
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }

    async fn set_verification(
        &self,
        id: Uuid,
        approved: bool,
        verified_by: Uuid,
    ) -> Result<bool, RepoError> {
        let mut users = self.users.write().expect("store lock poisoned");
        match users.get_mut(&id) {
            Some(user) => {
                user.student_verified = approved;
                user.verification_status = if approved {
                    VerificationStatus::Approved
                } else {
                    VerificationStatus::Rejected
                };
                user.verified_by = Some(verified_by);
                user.verified_at = Some(Utc::now());
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn active_items(&self) -> Result<Vec<CatalogItem>, RepoError> {
        let items = self.items.read().expect("store lock poisoned");
        Ok(items.iter().filter(|i| i.is_active).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use suds_booking::models::PickupDetails;
    use suds_booking::pricing::{CartLine, PricingEngine, Requester};
    use suds_catalog::{Catalog, ServiceKind};

    fn make_booking(user_type: UserType, verified: bool) -> Booking {
        let engine = PricingEngine::default();
        let catalog = Catalog::from_items(seed_items());
        let quote = engine
            .price_cart(
                &[CartLine {
                    id: Some(1),
                    service_type: ServiceKind::Wash,
                    quantity: 25,
                }],
                &catalog,
                &Requester {
                    user_type,
                    student_verified: verified,
                },
            )
            .unwrap();
        Booking::from_quote(
            Uuid::new_v4(),
            PickupDetails {
                date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                time: None,
                address: None,
            },
            quote,
            user_type,
        )
    }

    #[tokio::test]
    async fn update_status_round_trips() {
        let store = MemoryStore::new();
        let booking = make_booking(UserType::Customer, false);
        let id = booking.id;
        BookingRepository::create(&store, &booking).await.unwrap();

        let updated = store
            .update_status(id, BookingStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Completed);

        let found = BookingRepository::find_by_id(&store, id).await.unwrap().unwrap();
        assert_eq!(found.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn update_status_on_missing_booking_is_none() {
        let store = MemoryStore::new();
        let result = store
            .update_status(Uuid::new_v4(), BookingStatus::Processing)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_removes_from_listings() {
        let store = MemoryStore::new();
        let booking = make_booking(UserType::Customer, false);
        let id = booking.id;
        let user_id = booking.user_id;
        BookingRepository::create(&store, &booking).await.unwrap();

        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.list_for_user(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stats_aggregate_revenue_and_counts() {
        let store = MemoryStore::new();
        let student = make_booking(UserType::Student, true);
        let customer = make_booking(UserType::Customer, false);
        BookingRepository::create(&store, &student).await.unwrap();
        BookingRepository::create(&store, &customer).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_bookings, 2);
        assert_eq!(stats.pending_bookings, 2);
        assert_eq!(stats.student_bookings, 1);
        // 800 (discounted) + 1000
        assert_eq!(stats.total_revenue, 1800.0);
        // 944 + 1180
        assert_eq!(stats.total_revenue_with_gst, 2124.0);
        assert_eq!(stats.total_discounts_given, 200.0);
    }
}
