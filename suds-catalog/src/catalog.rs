use std::collections::HashMap;

use crate::item::CatalogItem;

/// Snapshot of the active catalog, keyed by the item's numeric id.
///
/// The numeric id is the stable identifier clients use in carts; it is
/// distinct from the storage primary key. Lookup is a plain map access so a
/// large cart does not rescan the item list per line.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<i64, CatalogItem>,
}

impl Catalog {
    /// Build a catalog from item records, keeping only active ones.
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        let items = items
            .into_iter()
            .filter(|i| i.is_active)
            .map(|i| (i.numeric_id, i))
            .collect();
        Self { items }
    }

    pub fn resolve(&self, numeric_id: i64) -> Option<&CatalogItem> {
        self.items.get(&numeric_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_items;

    #[test]
    fn resolves_by_numeric_id() {
        let catalog = Catalog::from_items(seed_items());
        assert_eq!(catalog.resolve(1).unwrap().name, "Shirt");
        assert_eq!(catalog.resolve(9).unwrap().name, "Suit");
        assert!(catalog.resolve(999).is_none());
    }

    #[test]
    fn inactive_items_are_dropped() {
        let mut items = seed_items();
        items[0].is_active = false;
        let catalog = Catalog::from_items(items);
        assert!(catalog.resolve(1).is_none());
        assert_eq!(catalog.len(), 14);
    }
}
