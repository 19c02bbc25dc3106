pub mod catalog;
pub mod item;
pub mod seed;

pub use catalog::Catalog;
pub use item::{CatalogItem, ServiceKind};
pub use seed::seed_items;
