use crate::item::CatalogItem;

fn item(
    numeric_id: i64,
    name: &str,
    icon: &str,
    category: &str,
    wash: f64,
    iron: f64,
    dry_clean: f64,
    flags: (bool, bool, bool, bool),
) -> CatalogItem {
    CatalogItem {
        numeric_id,
        name: name.to_string(),
        icon: icon.to_string(),
        category: category.to_string(),
        wash_price: wash,
        iron_price: iron,
        dry_clean_price: dry_clean,
        has_wash: flags.0,
        has_iron: flags.1,
        has_dry_clean: flags.2,
        has_wash_iron: flags.3,
        student_discount_percent: 20.0,
        is_active: true,
    }
}

/// The stock catalog used by the database seed and the test fixtures.
pub fn seed_items() -> Vec<CatalogItem> {
    let all = (true, true, true, true);
    let wash_only = (true, false, false, false);
    let no_dry_clean = (true, true, false, true);
    vec![
        item(1, "Shirt", "shirt", "topwear", 40.0, 25.0, 100.0, all),
        item(2, "T-Shirt", "tshirt", "topwear", 30.0, 20.0, 80.0, all),
        item(3, "Pant", "pant", "bottomwear", 50.0, 30.0, 110.0, all),
        item(4, "Jeans", "jeans", "bottomwear", 60.0, 30.0, 120.0, all),
        item(5, "Sweater", "sweater", "topwear", 80.0, 40.0, 130.0, all),
        item(6, "Jacket", "jacket", "outerwear", 100.0, 50.0, 150.0, all),
        item(7, "Dress", "dress", "fullwear", 90.0, 45.0, 140.0, all),
        item(8, "Saree", "saree", "traditionalwear", 120.0, 60.0, 180.0, all),
        item(9, "Suit", "suit", "formalwear", 150.0, 70.0, 200.0, all),
        item(10, "Bedsheet", "bedsheet", "home", 70.0, 35.0, 120.0, no_dry_clean),
        item(11, "Blanket", "blanket", "home", 100.0, 0.0, 0.0, wash_only),
        item(12, "Curtains", "curtains", "home", 80.0, 45.0, 130.0, no_dry_clean),
        item(13, "Towel", "towel", "home", 40.0, 0.0, 0.0, wash_only),
        item(14, "Scarf", "scarf", "accessories", 30.0, 0.0, 0.0, wash_only),
        item(15, "Socks", "socks", "accessories", 15.0, 0.0, 0.0, wash_only),
    ]
}
