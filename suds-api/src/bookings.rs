use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use suds_booking::models::{AdminBooking, Booking, BookingStatus, PickupDetails};
use suds_booking::pricing::{CartLine, PricingEngine, Requester};
use suds_catalog::Catalog;

use crate::error::AppError;
use crate::middleware::auth::{admin_middleware, auth_middleware, Claims};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/my-bookings", get(my_bookings))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/api/bookings/all", get(all_bookings))
        .route("/api/bookings/stats", get(booking_stats))
        .route("/api/bookings/{id}/status", put(update_status))
        .route("/api/bookings/{id}", delete(delete_booking))
        .layer(middleware::from_fn_with_state(state, admin_middleware));

    protected.merge(admin)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    #[serde(default)]
    items: Vec<CartLine>,
    pickup_date: Option<String>,
    pickup_time: Option<String>,
    address: Option<String>,
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.items.is_empty() {
        return Err(AppError::ValidationError("No items provided".to_string()));
    }
    let date_str = req
        .pickup_date
        .ok_or_else(|| AppError::ValidationError("Pickup date is required".to_string()))?;
    let pickup_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError("Invalid pickup date".to_string()))?;

    let user = state
        .users
        .find_by_id(claims.user_id()?)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;

    let catalog_items = state
        .catalog
        .active_items()
        .await
        .map_err(AppError::internal)?;
    let catalog = Catalog::from_items(catalog_items);

    let engine = PricingEngine::new(state.pricing.clone());
    let quote = engine
        .price_cart(
            &req.items,
            &catalog,
            &Requester {
                user_type: user.user_type,
                student_verified: user.student_verified,
            },
        )
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let booking = Booking::from_quote(
        user.id,
        PickupDetails {
            date: pickup_date,
            time: req.pickup_time,
            address: req.address,
        },
        quote,
        user.user_type,
    );
    state
        .bookings
        .create(&booking)
        .await
        .map_err(AppError::internal)?;
    info!(
        booking_id = %booking.id,
        invoice = %booking.invoice_number,
        grand_total = booking.grand_total,
        "booking created"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Booking confirmed!",
            "data": { "booking": booking_json(&booking) },
        })),
    ))
}

async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Value>, AppError> {
    let bookings = state
        .bookings
        .list_for_user(claims.user_id()?)
        .await
        .map_err(AppError::internal)?;

    let rows: Vec<Value> = bookings.iter().map(booking_json).collect();
    Ok(Json(json!({
        "success": true,
        "data": { "bookings": rows },
    })))
}

#[derive(Debug, Deserialize)]
struct AllBookingsQuery {
    status: Option<String>,
    search: Option<String>,
}

async fn all_bookings(
    State(state): State<AppState>,
    Query(query): Query<AllBookingsQuery>,
) -> Result<Json<Value>, AppError> {
    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(
            BookingStatus::parse(raw)
                .map_err(|_| AppError::ValidationError(format!("Invalid status: {}", raw)))?,
        ),
    };

    let mut bookings = state
        .bookings
        .list_all(status)
        .await
        .map_err(AppError::internal)?;

    if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
        let needle = search.trim().to_lowercase();
        bookings.retain(|b| {
            let name_hit = b
                .user_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle));
            let email_hit = b
                .user_email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&needle));
            name_hit || email_hit
        });
    }

    let rows: Vec<Value> = bookings.iter().map(admin_booking_json).collect();
    Ok(Json(json!({
        "success": true,
        "data": { "bookings": rows },
    })))
}

async fn booking_stats(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let stats = state.bookings.stats().await.map_err(AppError::internal)?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "statistics": {
                "total_bookings": stats.total_bookings,
                "pending_bookings": stats.pending_bookings,
                "processing_bookings": stats.processing_bookings,
                "completed_bookings": stats.completed_bookings,
                "student_bookings": stats.student_bookings,
                "total_revenue": stats.total_revenue,
                "total_revenue_with_gst": stats.total_revenue_with_gst,
                "total_gst_collected": stats.total_gst_collected,
                "total_discounts_given": stats.total_discounts_given,
            },
        },
    })))
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: Option<String>,
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let raw = req
        .status
        .ok_or_else(|| AppError::ValidationError("Status is required".to_string()))?;
    let status = BookingStatus::parse(&raw)
        .map_err(|_| AppError::ValidationError(format!("Invalid status: {}", raw)))?;

    let booking = state
        .bookings
        .update_status(id, status)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;
    info!(booking_id = %id, status = status.as_str(), "booking status updated");

    Ok(Json(json!({
        "success": true,
        "message": format!("Status updated to {}", status),
        "data": { "booking": booking_json(&booking) },
    })))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let removed = state
        .bookings
        .delete(id)
        .await
        .map_err(AppError::internal)?;
    if !removed {
        return Err(AppError::NotFoundError("Booking not found".to_string()));
    }
    info!(booking_id = %id, "booking deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Booking deleted successfully",
    })))
}

fn booking_json(booking: &Booking) -> Value {
    let items: Vec<Value> = booking
        .items
        .iter()
        .map(|item| {
            json!({
                "id": item.item_id,
                "name": item.item_name,
                "icon": item.item_icon,
                "service_type": item.service_type.as_str(),
                "quantity": item.quantity,
                "price": item.unit_price,
                "total": item.total_price,
            })
        })
        .collect();

    json!({
        "id": booking.id,
        "user_id": booking.user_id,
        "pickup_date": booking.pickup_date,
        "pickup_time": booking.pickup_time,
        "pickup_address": booking.pickup_address,
        "items": items,
        "total_amount": booking.total_amount,
        "discount_amount": booking.discount_amount,
        "final_amount": booking.final_amount,
        "gst_rate": booking.gst_rate,
        "cgst_amount": booking.cgst_amount,
        "sgst_amount": booking.sgst_amount,
        "gst_amount": booking.gst_amount,
        "grand_total": booking.grand_total,
        "user_type_at_booking": booking.user_type_at_booking.as_str(),
        "status": booking.status.as_str(),
        "invoice_number": booking.invoice_number,
        "notes": booking.notes,
        "created_at": booking.created_at,
        "updated_at": booking.updated_at,
    })
}

fn admin_booking_json(row: &AdminBooking) -> Value {
    let mut value = booking_json(&row.booking);
    if let Some(object) = value.as_object_mut() {
        object.insert("user_name".to_string(), json!(row.user_name));
        object.insert("user_email".to_string(), json!(row.user_email));
        object.insert("user_phone".to_string(), json!(row.user_phone));
        object.insert(
            "user_type".to_string(),
            json!(row.user_type.map(|t| t.as_str())),
        );
    }
    value
}
