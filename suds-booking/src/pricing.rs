use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use suds_catalog::{Catalog, ServiceKind};

use crate::user::UserType;

/// Round to two decimal places, half away from zero. Every stored monetary
/// field is rounded exactly once, after its own computation, and downstream
/// figures are derived from the already-rounded upstream ones.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Process-wide pricing knobs, injected at startup rather than read ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Total GST rate, split evenly into CGST and SGST.
    pub gst_rate: f64,
    /// Flat student discount percent applied to the subtotal.
    pub student_discount_percent: f64,
    /// When set, the per-item catalog discount percent is used instead of
    /// the flat rate. Off by default.
    pub per_item_student_discount: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            gst_rate: 0.18,
            student_discount_percent: 20.0,
            per_item_student_discount: false,
        }
    }
}

/// Snapshot of the requesting user as the identity layer asserts it. The
/// engine trusts both fields; it never re-derives eligibility.
#[derive(Debug, Clone)]
pub struct Requester {
    pub user_type: UserType,
    pub student_verified: bool,
}

impl Requester {
    fn discount_eligible(&self) -> bool {
        self.user_type == UserType::Student && self.student_verified
    }
}

/// One submitted cart entry. Deserialization is deliberately lenient:
/// clients send ids and quantities as numbers or strings, and a quantity
/// that is missing, unparseable, or non-positive falls back to 1.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    #[serde(default = "unknown_service")]
    pub service_type: ServiceKind,
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: i64,
}

fn unknown_service() -> ServiceKind {
    ServiceKind::Unknown
}

fn default_quantity() -> i64 {
    1
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value))
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value).filter(|q| *q > 0).unwrap_or(1))
}

/// A priced line, snapshotting name/icon and the unit price at booking time
/// so later catalog edits never change historical bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteLine {
    pub item_id: i64,
    pub item_name: String,
    pub item_icon: String,
    pub service_type: ServiceKind,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

/// The full monetary breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub total_amount: f64,
    pub discount_amount: f64,
    pub final_amount: f64,
    pub gst_rate: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
    pub gst_amount: f64,
    pub grand_total: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("No valid items in cart")]
    EmptyCart,
}

/// Computes line totals, the student discount, and the GST split.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Price a cart against the catalog snapshot.
    ///
    /// Lines referencing unknown item ids are skipped, not rejected; only a
    /// cart where nothing resolves is an error. No bound checks beyond the
    /// quantity fallback are performed on prices or quantities.
    pub fn price_cart(
        &self,
        lines: &[CartLine],
        catalog: &Catalog,
        requester: &Requester,
    ) -> Result<Quote, PricingError> {
        let mut quote_lines = Vec::with_capacity(lines.len());
        let mut subtotal = 0.0;
        let mut per_item_discount = 0.0;

        for line in lines {
            let Some(id) = line.id else {
                debug!("cart line without a usable item id, skipping");
                continue;
            };
            let Some(item) = catalog.resolve(id) else {
                debug!(item_id = id, "cart line references unknown item, skipping");
                continue;
            };

            let unit_price = item.service_price(line.service_type);
            let quantity = line.quantity.max(1);
            let total_price = round2(unit_price * quantity as f64);

            subtotal += total_price;
            per_item_discount += total_price * item.student_discount_percent / 100.0;

            quote_lines.push(QuoteLine {
                item_id: item.numeric_id,
                item_name: item.name.clone(),
                item_icon: item.icon.clone(),
                service_type: line.service_type,
                quantity,
                unit_price,
                total_price,
            });
        }

        if quote_lines.is_empty() {
            return Err(PricingError::EmptyCart);
        }

        let total_amount = round2(subtotal);

        let discount_amount = if requester.discount_eligible() {
            if self.config.per_item_student_discount {
                round2(per_item_discount)
            } else {
                round2(total_amount * self.config.student_discount_percent / 100.0)
            }
        } else {
            0.0
        };

        let final_amount = round2(total_amount - discount_amount);
        let half_rate = self.config.gst_rate / 2.0;
        let cgst_amount = round2(final_amount * half_rate);
        let sgst_amount = round2(final_amount * half_rate);
        let gst_amount = round2(cgst_amount + sgst_amount);
        let grand_total = round2(final_amount + gst_amount);

        Ok(Quote {
            lines: quote_lines,
            total_amount,
            discount_amount,
            final_amount,
            gst_rate: self.config.gst_rate,
            cgst_amount,
            sgst_amount,
            gst_amount,
            grand_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use suds_catalog::seed_items;

    fn catalog() -> Catalog {
        Catalog::from_items(seed_items())
    }

    fn line(id: i64, service: ServiceKind, quantity: i64) -> CartLine {
        CartLine {
            id: Some(id),
            service_type: service,
            quantity,
        }
    }

    fn student() -> Requester {
        Requester {
            user_type: UserType::Student,
            student_verified: true,
        }
    }

    fn customer() -> Requester {
        Requester {
            user_type: UserType::Customer,
            student_verified: false,
        }
    }

    #[test]
    fn verified_student_gets_flat_twenty_percent() {
        // 25 shirt washes at 40 = subtotal 1000
        let engine = PricingEngine::default();
        let quote = engine
            .price_cart(&[line(1, ServiceKind::Wash, 25)], &catalog(), &student())
            .unwrap();

        assert_eq!(quote.total_amount, 1000.0);
        assert_eq!(quote.discount_amount, 200.0);
        assert_eq!(quote.final_amount, 800.0);
        assert_eq!(quote.cgst_amount, 72.0);
        assert_eq!(quote.sgst_amount, 72.0);
        assert_eq!(quote.gst_amount, 144.0);
        assert_eq!(quote.grand_total, 944.0);
    }

    #[test]
    fn non_student_pays_full_gst_on_subtotal() {
        let engine = PricingEngine::default();
        let quote = engine
            .price_cart(&[line(1, ServiceKind::Wash, 25)], &catalog(), &customer())
            .unwrap();

        assert_eq!(quote.discount_amount, 0.0);
        assert_eq!(quote.final_amount, 1000.0);
        assert_eq!(quote.cgst_amount, 90.0);
        assert_eq!(quote.sgst_amount, 90.0);
        assert_eq!(quote.grand_total, 1180.0);
    }

    #[test]
    fn unverified_student_gets_no_discount() {
        let engine = PricingEngine::default();
        let requester = Requester {
            user_type: UserType::Student,
            student_verified: false,
        };
        let quote = engine
            .price_cart(&[line(1, ServiceKind::Wash, 25)], &catalog(), &requester)
            .unwrap();
        assert_eq!(quote.discount_amount, 0.0);
        assert_eq!(quote.grand_total, 1180.0);
    }

    #[test]
    fn unknown_items_are_skipped_not_rejected() {
        let engine = PricingEngine::default();
        let quote = engine
            .price_cart(
                &[line(999, ServiceKind::Wash, 2), line(2, ServiceKind::Iron, 1)],
                &catalog(),
                &customer(),
            )
            .unwrap();
        assert_eq!(quote.lines.len(), 1);
        assert_eq!(quote.total_amount, 20.0);
    }

    #[test]
    fn cart_of_only_unknown_items_is_empty() {
        let engine = PricingEngine::default();
        let err = engine
            .price_cart(&[line(998, ServiceKind::Wash, 1)], &catalog(), &customer())
            .unwrap_err();
        assert!(matches!(err, PricingError::EmptyCart));
    }

    #[test]
    fn empty_cart_is_rejected() {
        let engine = PricingEngine::default();
        let err = engine.price_cart(&[], &catalog(), &customer()).unwrap_err();
        assert!(matches!(err, PricingError::EmptyCart));
    }

    #[test]
    fn unknown_service_prices_at_zero_but_line_survives() {
        let engine = PricingEngine::default();
        let quote = engine
            .price_cart(&[line(1, ServiceKind::Unknown, 3)], &catalog(), &customer())
            .unwrap();
        assert_eq!(quote.lines.len(), 1);
        assert_eq!(quote.total_amount, 0.0);
        assert_eq!(quote.grand_total, 0.0);
    }

    #[test]
    fn wash_iron_is_the_sum_of_both_prices() {
        let engine = PricingEngine::default();
        let quote = engine
            .price_cart(&[line(1, ServiceKind::WashIron, 2)], &catalog(), &customer())
            .unwrap();
        // (40 + 25) * 2
        assert_eq!(quote.lines[0].unit_price, 65.0);
        assert_eq!(quote.total_amount, 130.0);
    }

    #[test]
    fn per_item_discount_mode_uses_catalog_percent() {
        let mut items = seed_items();
        items[0].student_discount_percent = 10.0;
        let catalog = Catalog::from_items(items);

        let engine = PricingEngine::new(PricingConfig {
            per_item_student_discount: true,
            ..PricingConfig::default()
        });
        let quote = engine
            .price_cart(&[line(1, ServiceKind::Wash, 25)], &catalog, &student())
            .unwrap();
        assert_eq!(quote.discount_amount, 100.0);
        assert_eq!(quote.final_amount, 900.0);
    }

    #[test]
    fn cart_line_coercions_from_wire() {
        let l: CartLine =
            serde_json::from_value(json!({"id": "3", "serviceType": "wash", "quantity": "4"}))
                .unwrap();
        assert_eq!(l.id, Some(3));
        assert_eq!(l.quantity, 4);

        let l: CartLine = serde_json::from_value(json!({"id": 3, "serviceType": "wash"})).unwrap();
        assert_eq!(l.quantity, 1);

        let l: CartLine =
            serde_json::from_value(json!({"id": 3, "serviceType": "wash", "quantity": "lots"}))
                .unwrap();
        assert_eq!(l.quantity, 1);

        let l: CartLine =
            serde_json::from_value(json!({"id": 3, "serviceType": "wash", "quantity": -2}))
                .unwrap();
        assert_eq!(l.quantity, 1);

        let l: CartLine =
            serde_json::from_value(json!({"id": "garbage", "serviceType": "wash"})).unwrap();
        assert_eq!(l.id, None);
    }

    #[test]
    fn totals_recompose_from_rounded_parts() {
        // Awkward figures to force rounding on every field.
        let mut items = seed_items();
        items[0].wash_price = 33.33;
        let catalog = Catalog::from_items(items);

        let engine = PricingEngine::default();
        let quote = engine
            .price_cart(&[line(1, ServiceKind::Wash, 3)], &catalog, &student())
            .unwrap();

        assert_eq!(quote.cgst_amount, quote.sgst_amount);
        assert_eq!(
            quote.grand_total,
            round2(
                round2(quote.total_amount - quote.discount_amount)
                    + quote.cgst_amount
                    + quote.sgst_amount
            )
        );
    }
}
