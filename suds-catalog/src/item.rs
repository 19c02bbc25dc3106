use serde::{Deserialize, Serialize};

/// Service a clothing item can be booked for.
///
/// The wire format is lenient: an unrecognized value deserializes to
/// `Unknown` instead of failing the whole request, and prices at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Wash,
    Iron,
    DryClean,
    WashIron,
    #[serde(other)]
    Unknown,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Wash => "wash",
            ServiceKind::Iron => "iron",
            ServiceKind::DryClean => "dry_clean",
            ServiceKind::WashIron => "wash_iron",
            ServiceKind::Unknown => "unknown",
        }
    }

    /// Parse a stored service string; anything unrecognized maps to `Unknown`.
    pub fn parse(s: &str) -> ServiceKind {
        match s {
            "wash" => ServiceKind::Wash,
            "iron" => ServiceKind::Iron,
            "dry_clean" => ServiceKind::DryClean,
            "wash_iron" => ServiceKind::WashIron,
            _ => ServiceKind::Unknown,
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clothing item definition with per-service prices.
///
/// Prices are in rupees with two-decimal precision. A capability flag being
/// off means the service is not offered for the item; seed data keeps the
/// matching price at zero, and the price lookup itself does not consult the
/// flags (the flags are catalog metadata for the client).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub numeric_id: i64,
    pub name: String,
    pub icon: String,
    pub category: String,
    pub wash_price: f64,
    pub iron_price: f64,
    pub dry_clean_price: f64,
    pub has_wash: bool,
    pub has_iron: bool,
    pub has_dry_clean: bool,
    pub has_wash_iron: bool,
    pub student_discount_percent: f64,
    pub is_active: bool,
}

impl CatalogItem {
    /// Unit price for the requested service.
    ///
    /// `wash_iron` is the sum of the wash and iron prices; an unknown
    /// service prices at zero rather than erroring.
    pub fn service_price(&self, kind: ServiceKind) -> f64 {
        match kind {
            ServiceKind::Wash => self.wash_price,
            ServiceKind::Iron => self.iron_price,
            ServiceKind::DryClean => self.dry_clean_price,
            ServiceKind::WashIron => self.wash_price + self.iron_price,
            ServiceKind::Unknown => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> CatalogItem {
        CatalogItem {
            numeric_id: 1,
            name: "Shirt".to_string(),
            icon: "shirt".to_string(),
            category: "topwear".to_string(),
            wash_price: 40.0,
            iron_price: 25.0,
            dry_clean_price: 100.0,
            has_wash: true,
            has_iron: true,
            has_dry_clean: true,
            has_wash_iron: true,
            student_discount_percent: 20.0,
            is_active: true,
        }
    }

    #[test]
    fn service_price_per_kind() {
        let item = shirt();
        assert_eq!(item.service_price(ServiceKind::Wash), 40.0);
        assert_eq!(item.service_price(ServiceKind::Iron), 25.0);
        assert_eq!(item.service_price(ServiceKind::DryClean), 100.0);
        assert_eq!(item.service_price(ServiceKind::WashIron), 65.0);
        assert_eq!(item.service_price(ServiceKind::Unknown), 0.0);
    }

    #[test]
    fn unknown_service_deserializes_leniently() {
        let kind: ServiceKind = serde_json::from_str("\"steam_press\"").unwrap();
        assert_eq!(kind, ServiceKind::Unknown);

        let kind: ServiceKind = serde_json::from_str("\"dry_clean\"").unwrap();
        assert_eq!(kind, ServiceKind::DryClean);
    }

    #[test]
    fn service_kind_round_trips_through_storage_string() {
        for kind in [
            ServiceKind::Wash,
            ServiceKind::Iron,
            ServiceKind::DryClean,
            ServiceKind::WashIron,
        ] {
            assert_eq!(ServiceKind::parse(kind.as_str()), kind);
        }
        assert_eq!(ServiceKind::parse("whatever"), ServiceKind::Unknown);
    }
}
