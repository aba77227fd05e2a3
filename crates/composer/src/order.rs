//! Order data model
//!
//! Orders arrive as arbitrary JSON; extraction is deliberately lenient
//! on document fields (missing strings become defaults or empty) and
//! strict on line items, whose required fields drive the table and the
//! computed total.

use crate::money::parse_amount;
use crate::{ComposeError, Result};
use serde_json::Value;

/// A validated order, ready for composition
#[derive(Debug, Clone, Default)]
pub struct OrderRecord {
    pub full_name: String,
    pub address: String,
    pub order_id: String,
    pub date_of_order: String,
    pub payment_terms: String,
    pub currency: String,
    pub currency_symbol: String,
    pub delivery: Option<DeliveryDetails>,
    pub items: Vec<LineItem>,
}

/// Delivery block data; the whole block is optional
#[derive(Debug, Clone)]
pub struct DeliveryDetails {
    pub method: String,
    pub estimated_date: String,
    pub shipping_address: String,
    pub tracking_number: Option<String>,
    pub special_instructions: Option<String>,
}

/// One row of the items table
#[derive(Debug, Clone)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub tax: String,
    pub total: String,
    pub material: Option<String>,
    pub color: Option<String>,
    pub process: Option<String>,
    pub finish: Option<String>,
}

impl LineItem {
    /// Human-readable attribute summary for the detailed column set
    pub fn description(&self) -> String {
        [&self.material, &self.color, &self.process, &self.finish]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// String field with a fallback default when missing, null or empty;
/// JSON numbers are stringified rather than discarded
fn string_or(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Optional string field; missing, null or empty becomes None
fn optional_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Required line-item string field
fn item_string(item: &Value, index: usize, field: &'static str) -> Result<String> {
    match item.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ComposeError::MissingItemField { index, field }),
    }
}

/// Line-item quantity: a positive JSON integer or a numeric string
fn item_quantity(item: &Value, index: usize) -> Result<u32> {
    let field = "quantity";
    let raw = item
        .get(field)
        .ok_or(ComposeError::MissingItemField { index, field })?;

    let parsed = match raw {
        Value::Number(n) => n.as_u64().and_then(|q| u32::try_from(q).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };

    match parsed {
        Some(q) if q > 0 => Ok(q),
        _ => Err(ComposeError::BadItemField {
            index,
            field,
            value: raw.to_string(),
            reason: "expected a positive integer".to_string(),
        }),
    }
}

const DELIVERY_KEYS: &[&str] = &[
    "delivery_method",
    "estimated_delivery_date",
    "shipping_address",
    "tracking_number",
    "special_instructions",
];

impl OrderRecord {
    /// Extract and validate an order from request JSON
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ComposeError::InvalidOrder(
                "request body must be a JSON object".to_string(),
            ));
        }

        let delivery = if DELIVERY_KEYS.iter().any(|k| value.get(k).is_some()) {
            Some(DeliveryDetails {
                method: string_or(value, "delivery_method", "Standard Shipping"),
                estimated_date: string_or(value, "estimated_delivery_date", "Not available"),
                shipping_address: string_or(value, "shipping_address", ""),
                tracking_number: optional_string(value, "tracking_number"),
                special_instructions: optional_string(value, "special_instructions"),
            })
        } else {
            None
        };

        let mut items = Vec::new();
        if let Some(Value::Array(products)) = value.get("products") {
            for (index, item) in products.iter().enumerate() {
                if !item.is_object() {
                    return Err(ComposeError::InvalidOrder(format!(
                        "products[{index}] must be a JSON object"
                    )));
                }
                items.push(LineItem {
                    name: item_string(item, index, "name")?,
                    quantity: item_quantity(item, index)?,
                    unit_price: item_string(item, index, "unit_price")?,
                    tax: item_string(item, index, "tax")?,
                    total: item_string(item, index, "total")?,
                    material: optional_string(item, "material"),
                    color: optional_string(item, "color"),
                    process: optional_string(item, "process"),
                    finish: optional_string(item, "finish"),
                });
            }
        }

        Ok(Self {
            full_name: string_or(value, "full_name", ""),
            address: string_or(value, "address", ""),
            order_id: string_or(value, "order_id", ""),
            date_of_order: string_or(value, "date_of_order", ""),
            payment_terms: string_or(value, "payment_terms", ""),
            currency: string_or(value, "currency", "GBP"),
            currency_symbol: string_or(value, "currency_symbol", "£"),
            delivery,
            items,
        })
    }

    /// Sum of the line item totals
    ///
    /// Each `total` must be a symbol-prefixed decimal; any malformed
    /// value fails the whole order.
    pub fn total_amount(&self) -> Result<f64> {
        let mut sum = 0.0;
        for (index, item) in self.items.iter().enumerate() {
            sum += parse_amount(&item.total, &self.currency_symbol).map_err(|source| {
                ComposeError::BadAmount {
                    index,
                    field: "total",
                    value: item.total.clone(),
                    source,
                }
            })?;
        }
        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "full_name": "A. Customer",
            "address": "1 High Street, London",
            "order_id": "ORD-1001",
            "date_of_order": "2024-05-01",
            "payment_terms": "Net 30",
            "shipping_address": "1 High Street, London",
            "tracking_number": "TRK-77",
            "products": [
                {"name": "A1", "quantity": 1, "unit_price": "£10.00", "tax": "£1.00", "total": "£11.00"},
                {"name": "B2", "quantity": "3", "unit_price": "£2.00", "tax": "£0.60", "total": "£6.60",
                 "material": "PLA", "color": "Black"}
            ]
        })
    }

    #[test]
    fn test_from_value_extracts_fields() {
        let order = OrderRecord::from_value(&sample()).unwrap();
        assert_eq!(order.order_id, "ORD-1001");
        assert_eq!(order.currency, "GBP");
        assert_eq!(order.currency_symbol, "£");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].quantity, 3);
        assert_eq!(order.items[1].description(), "PLA, Black");
    }

    #[test]
    fn test_delivery_defaults() {
        let order = OrderRecord::from_value(&sample()).unwrap();
        let delivery = order.delivery.unwrap();
        assert_eq!(delivery.method, "Standard Shipping");
        assert_eq!(delivery.estimated_date, "Not available");
        assert_eq!(delivery.tracking_number.as_deref(), Some("TRK-77"));
        assert_eq!(delivery.special_instructions, None);
    }

    #[test]
    fn test_no_delivery_keys_means_no_block() {
        let order = OrderRecord::from_value(&json!({"order_id": "X"})).unwrap();
        assert!(order.delivery.is_none());
    }

    #[test]
    fn test_numeric_order_id_is_stringified() {
        let order =
            OrderRecord::from_value(&json!({"order_id": 1001, "tracking_number": 42})).unwrap();
        assert_eq!(order.order_id, "1001");
        assert_eq!(order.delivery.unwrap().tracking_number.as_deref(), Some("42"));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = OrderRecord::from_value(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidOrder(_)));
    }

    #[test]
    fn test_missing_item_field() {
        let value = json!({"products": [{"name": "A1", "quantity": 1, "unit_price": "£1.00", "tax": "£0.10"}]});
        let err = OrderRecord::from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::MissingItemField { index: 0, field: "total" }
        ));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let value = json!({"products": [{"name": "A1", "quantity": 0, "unit_price": "£1.00", "tax": "£0.10", "total": "£1.10"}]});
        let err = OrderRecord::from_value(&value).unwrap_err();
        assert!(matches!(err, ComposeError::BadItemField { field: "quantity", .. }));
    }

    #[test]
    fn test_total_amount_sums_items() {
        let order = OrderRecord::from_value(&sample()).unwrap();
        let total = order.total_amount().unwrap();
        assert!((total - 17.60).abs() < 1e-9);
    }

    #[test]
    fn test_total_amount_empty_order_is_zero() {
        let order = OrderRecord::default();
        assert_eq!(order.total_amount().unwrap(), 0.0);
    }

    #[test]
    fn test_total_amount_wrong_symbol_fails() {
        let mut order = OrderRecord::from_value(&sample()).unwrap();
        order.items[1].total = "$6.60".to_string();
        let err = order.total_amount().unwrap_err();
        assert!(matches!(err, ComposeError::BadAmount { index: 1, .. }));
        assert!(err.is_data_error());
    }
}
