use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use suds_catalog::ServiceKind;

use crate::invoice::invoice_number;
use crate::pricing::Quote;
use crate::user::UserType;
use crate::BookingError;

/// Booking status in the lifecycle.
///
/// `pending` is the initial state; admins move bookings to `processing`,
/// `completed`, or `cancelled`. Transitions are deliberately permissive:
/// only the value set is validated, any of the four may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Processing => "processing",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a wire/storage status string, rejecting anything outside the
    /// four legal values.
    pub fn parse(s: &str) -> Result<BookingStatus, BookingError> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "processing" => Ok(BookingStatus::Processing),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(BookingError::InvalidStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted line item, immutable once created. Name, icon, and unit
/// price are snapshots taken at booking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingItem {
    pub item_id: i64,
    pub item_name: String,
    pub item_icon: String,
    pub service_type: ServiceKind,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

/// Pickup details submitted with the cart. Time and address are optional
/// and fall back to the storage defaults.
#[derive(Debug, Clone)]
pub struct PickupDetails {
    pub date: NaiveDate,
    pub time: Option<String>,
    pub address: Option<String>,
}

/// A booking. Only `status` is mutable after creation; everything else,
/// including the requester's role at booking time, is frozen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub pickup_address: String,
    pub items: Vec<BookingItem>,
    pub total_amount: f64,
    pub discount_amount: f64,
    pub final_amount: f64,
    pub gst_rate: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
    pub gst_amount: f64,
    pub grand_total: f64,
    pub user_type_at_booking: UserType,
    pub status: BookingStatus,
    pub invoice_number: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Assemble a booking from a priced quote.
    ///
    /// The id is allocated here, so the invoice number can be derived
    /// immediately and creation stays a single write.
    pub fn from_quote(
        user_id: Uuid,
        pickup: PickupDetails,
        quote: Quote,
        user_type: UserType,
    ) -> Self {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let items = quote
            .lines
            .into_iter()
            .map(|l| BookingItem {
                item_id: l.item_id,
                item_name: l.item_name,
                item_icon: l.item_icon,
                service_type: l.service_type,
                quantity: l.quantity,
                unit_price: l.unit_price,
                total_price: l.total_price,
            })
            .collect();

        Self {
            id,
            user_id,
            pickup_date: pickup.date,
            pickup_time: pickup.time.unwrap_or_else(|| "10:00".to_string()),
            pickup_address: pickup.address.unwrap_or_default(),
            items,
            total_amount: quote.total_amount,
            discount_amount: quote.discount_amount,
            final_amount: quote.final_amount,
            gst_rate: quote.gst_rate,
            cgst_amount: quote.cgst_amount,
            sgst_amount: quote.sgst_amount,
            gst_amount: quote.gst_amount,
            grand_total: quote.grand_total,
            user_type_at_booking: user_type,
            status: BookingStatus::Pending,
            invoice_number: invoice_number(now, &id.to_string()),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A booking joined with its owner, for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct AdminBooking {
    pub booking: Booking,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub user_type: Option<UserType>,
}

/// Aggregates for the admin dashboard. Revenue figures exclude GST except
/// where named otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingStats {
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub processing_bookings: i64,
    pub completed_bookings: i64,
    pub student_bookings: i64,
    pub total_revenue: f64,
    pub total_revenue_with_gst: f64,
    pub total_gst_collected: f64,
    pub total_discounts_given: f64,
}
