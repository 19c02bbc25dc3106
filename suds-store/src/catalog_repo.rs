use async_trait::async_trait;
use sqlx::PgPool;

use suds_booking::repository::{CatalogRepository, RepoError};
use suds_catalog::CatalogItem;

pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    numeric_id: i64,
    name: String,
    icon: String,
    category: String,
    wash_price: f64,
    iron_price: f64,
    dry_clean_price: f64,
    has_wash: bool,
    has_iron: bool,
    has_dry_clean: bool,
    has_wash_iron: bool,
    student_discount_percent: f64,
    is_active: bool,
}

impl From<ItemRow> for CatalogItem {
    fn from(row: ItemRow) -> Self {
        CatalogItem {
            numeric_id: row.numeric_id,
            name: row.name,
            icon: row.icon,
            category: row.category,
            wash_price: row.wash_price,
            iron_price: row.iron_price,
            dry_clean_price: row.dry_clean_price,
            has_wash: row.has_wash,
            has_iron: row.has_iron,
            has_dry_clean: row.has_dry_clean,
            has_wash_iron: row.has_wash_iron,
            student_discount_percent: row.student_discount_percent,
            is_active: row.is_active,
        }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn active_items(&self) -> Result<Vec<CatalogItem>, RepoError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT numeric_id, name, icon, category,
                   wash_price, iron_price, dry_clean_price,
                   has_wash, has_iron, has_dry_clean, has_wash_iron,
                   student_discount_percent, is_active
            FROM clothing_items
            WHERE is_active
            ORDER BY numeric_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }
}
