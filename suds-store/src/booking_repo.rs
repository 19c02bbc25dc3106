use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use suds_booking::models::{AdminBooking, Booking, BookingItem, BookingStats, BookingStatus};
use suds_booking::repository::{BookingRepository, RepoError};
use suds_booking::user::UserType;
use suds_catalog::ServiceKind;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn items_for(&self, booking_id: Uuid) -> Result<Vec<BookingItem>, RepoError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT item_id, item_name, item_icon, service_type, quantity, \
                    unit_price, total_price \
             FROM booking_items WHERE booking_id = $1 ORDER BY position",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BookingItem::from).collect())
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    pickup_date: NaiveDate,
    pickup_time: String,
    pickup_address: String,
    total_amount: f64,
    discount_amount: f64,
    final_amount: f64,
    gst_rate: f64,
    cgst_amount: f64,
    sgst_amount: f64,
    gst_amount: f64,
    grand_total: f64,
    user_type_at_booking: String,
    status: String,
    invoice_number: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self, items: Vec<BookingItem>) -> Result<Booking, RepoError> {
        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            pickup_date: self.pickup_date,
            pickup_time: self.pickup_time,
            pickup_address: self.pickup_address,
            items,
            total_amount: self.total_amount,
            discount_amount: self.discount_amount,
            final_amount: self.final_amount,
            gst_rate: self.gst_rate,
            cgst_amount: self.cgst_amount,
            sgst_amount: self.sgst_amount,
            gst_amount: self.gst_amount,
            grand_total: self.grand_total,
            user_type_at_booking: UserType::parse(&self.user_type_at_booking),
            status: BookingStatus::parse(&self.status)?,
            invoice_number: self.invoice_number,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    item_id: i64,
    item_name: String,
    item_icon: String,
    service_type: String,
    quantity: i64,
    unit_price: f64,
    total_price: f64,
}

impl From<ItemRow> for BookingItem {
    fn from(row: ItemRow) -> Self {
        BookingItem {
            item_id: row.item_id,
            item_name: row.item_name,
            item_icon: row.item_icon,
            service_type: ServiceKind::parse(&row.service_type),
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OwnerRow {
    user_name: Option<String>,
    user_email: Option<String>,
    user_phone: Option<String>,
    owner_type: Option<String>,
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    total_bookings: i64,
    pending_bookings: i64,
    processing_bookings: i64,
    completed_bookings: i64,
    student_bookings: i64,
    total_revenue: f64,
    total_revenue_with_gst: f64,
    total_gst_collected: f64,
    total_discounts_given: f64,
}

const BOOKING_COLUMNS: &str = "id, user_id, pickup_date, pickup_time, pickup_address, \
     total_amount, discount_amount, final_amount, gst_rate, cgst_amount, \
     sgst_amount, gst_amount, grand_total, user_type_at_booking, status, \
     invoice_number, notes, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, user_id, pickup_date, pickup_time, pickup_address,
                 total_amount, discount_amount, final_amount, gst_rate,
                 cgst_amount, sgst_amount, gst_amount, grand_total,
                 user_type_at_booking, status, invoice_number, notes,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.pickup_date)
        .bind(&booking.pickup_time)
        .bind(&booking.pickup_address)
        .bind(booking.total_amount)
        .bind(booking.discount_amount)
        .bind(booking.final_amount)
        .bind(booking.gst_rate)
        .bind(booking.cgst_amount)
        .bind(booking.sgst_amount)
        .bind(booking.gst_amount)
        .bind(booking.grand_total)
        .bind(booking.user_type_at_booking.as_str())
        .bind(booking.status.as_str())
        .bind(&booking.invoice_number)
        .bind(&booking.notes)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in booking.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO booking_items
                    (booking_id, position, item_id, item_name, item_icon,
                     service_type, quantity, unit_price, total_price)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(booking.id)
            .bind(position as i32)
            .bind(item.item_id)
            .bind(&item.item_name)
            .bind(&item.item_icon)
            .bind(item.service_type.as_str())
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for(id).await?;
                Ok(Some(row.into_booking(items)?))
            }
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(row.id).await?;
            bookings.push(row.into_booking(items)?);
        }
        Ok(bookings)
    }

    async fn list_all(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<AdminBooking>, RepoError> {
        let base = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings{} ORDER BY created_at DESC",
            if status.is_some() {
                " WHERE status = $1"
            } else {
                ""
            }
        );
        let mut query = sqlx::query_as::<_, BookingRow>(&base);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in rows {
            let owner = sqlx::query_as::<_, OwnerRow>(
                "SELECT name AS user_name, email AS user_email, \
                        phone AS user_phone, user_type AS owner_type \
                 FROM users WHERE id = $1",
            )
            .bind(row.user_id)
            .fetch_optional(&self.pool)
            .await?
            .unwrap_or(OwnerRow {
                user_name: None,
                user_email: None,
                user_phone: None,
                owner_type: None,
            });

            let items = self.items_for(row.id).await?;
            bookings.push(AdminBooking {
                booking: row.into_booking(items)?,
                user_name: owner.user_name,
                user_email: owner.user_email,
                user_phone: owner.user_phone,
                user_type: owner.owner_type.as_deref().map(UserType::parse),
            });
        }
        Ok(bookings)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepoError> {
        let result = sqlx::query("UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        // booking_items cascade
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<BookingStats, RepoError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT COUNT(*)                                              AS total_bookings,
                   COUNT(*) FILTER (WHERE status = 'pending')            AS pending_bookings,
                   COUNT(*) FILTER (WHERE status = 'processing')         AS processing_bookings,
                   COUNT(*) FILTER (WHERE status = 'completed')          AS completed_bookings,
                   COUNT(*) FILTER (WHERE user_type_at_booking = 'student') AS student_bookings,
                   COALESCE(SUM(final_amount), 0)    AS total_revenue,
                   COALESCE(SUM(grand_total), 0)     AS total_revenue_with_gst,
                   COALESCE(SUM(gst_amount), 0)      AS total_gst_collected,
                   COALESCE(SUM(discount_amount), 0) AS total_discounts_given
            FROM bookings
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(BookingStats {
            total_bookings: row.total_bookings,
            pending_bookings: row.pending_bookings,
            processing_bookings: row.processing_bookings,
            completed_bookings: row.completed_bookings,
            student_bookings: row.student_bookings,
            total_revenue: row.total_revenue,
            total_revenue_with_gst: row.total_revenue_with_gst,
            total_gst_collected: row.total_gst_collected,
            total_discounts_given: row.total_discounts_given,
        })
    }
}
