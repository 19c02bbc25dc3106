use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/items", get(list_items))
}

async fn list_items(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let items = state
        .catalog
        .active_items()
        .await
        .map_err(AppError::internal)?;

    let rows: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "id": item.numeric_id,
                "name": item.name,
                "icon": item.icon,
                "category": item.category,
                "prices": {
                    "wash": item.wash_price,
                    "iron": item.iron_price,
                    "dry_clean": item.dry_clean_price,
                    "wash_iron": item.wash_price + item.iron_price,
                },
                "services": {
                    "wash": item.has_wash,
                    "iron": item.has_iron,
                    "dry_clean": item.has_dry_clean,
                    "wash_iron": item.has_wash_iron,
                },
                "student_discount_percent": item.student_discount_percent,
            })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": { "items": rows },
    })))
}
